//! Tests for bulk import
//!
//! These tests verify:
//! - Mixed valid, comment and malformed lines
//! - Value coercion and embedded colons
//! - JSON Lines and whole-document JSON input
//! - Store::import merges and persists in one pass
//! - `--jsonl` output re-imports losslessly; `--oneline` only for plain values

use std::io::Cursor;

use nobox::import::{self, ImportErrorKind, ImportFormat};
use nobox::output::{self, OutputFormat};
use nobox::record::record;
use nobox::{Entry, FieldValue, JsonDriver, Store, YamlDriver};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_store() -> (TempDir, Store<JsonDriver>) {
    let temp_dir = TempDir::new().unwrap();
    let store = Store::open_path(temp_dir.path(), JsonDriver);
    (temp_dir, store)
}

const MIXED_INPUT: &str = "\
alice name:Alice age:30
# comment
bad_line_no_colon
bob name:Bob score:3.5
";

// =============================================================================
// Line Parsing Tests
// =============================================================================

#[test]
fn test_mixed_input_imports_valid_lines() {
    let (records, errors) = import::parse_lines(MIXED_INPUT.lines());

    assert_eq!(records.len(), 2);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, 3);
    assert!(errors[0].to_string().contains("bad_line_no_colon"));

    let (key, alice) = &records[0];
    assert_eq!(key, "alice");
    assert_eq!(alice["name"], FieldValue::String("Alice".into()));
    assert_eq!(alice["age"], FieldValue::Integer(30));

    let (key, bob) = &records[1];
    assert_eq!(key, "bob");
    assert_eq!(bob["score"], FieldValue::Float(3.5));
}

#[test]
fn test_field_without_colon_is_rejected() {
    let (records, errors) = import::parse_lines(["carol name:Carol nickname"]);

    assert!(records.is_empty());
    assert_eq!(
        errors[0].kind,
        ImportErrorKind::MissingColon("nickname".into())
    );
}

#[test]
fn test_value_keeps_everything_after_first_colon() {
    let (records, errors) =
        import::parse_lines(["meeting time:10:30:00 url:http://example.com/a"]);

    assert!(errors.is_empty());
    let fields = &records[0].1;
    assert_eq!(fields["time"], FieldValue::String("10:30:00".into()));
    assert_eq!(
        fields["url"],
        FieldValue::String("http://example.com/a".into())
    );
}

#[test]
fn test_empty_value_and_empty_field_name() {
    let (records, errors) = import::parse_lines(["k note:", "j :oops"]);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].1["note"], FieldValue::String(String::new()));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, 2);
}

#[test]
fn test_surrounding_whitespace_is_ignored() {
    let (records, errors) = import::parse_lines(["   alice   name:Alice\t age:30  ", "   ", "\t# x"]);

    assert!(errors.is_empty());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].1.len(), 2);
}

#[test]
fn test_only_comments_yields_nothing() {
    let (records, errors) = import::parse_lines(["# a", "", "# b"]);

    assert!(records.is_empty());
    assert!(errors.is_empty());
}

// =============================================================================
// JSON Input Tests
// =============================================================================

#[test]
fn test_json_lines_need_a_key() {
    let (records, errors) = import::parse_lines([
        r#"{"_key": "alice", "age": 30, "vip": true}"#,
        r#"{"name": "nobody"}"#,
        r#"{"_key": "bad", "tags": ["a"]}"#,
        r#"{not json}"#,
    ]);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].1["vip"], FieldValue::Boolean(true));
    assert!(!records[0].1.contains_key("_key"));

    assert_eq!(errors.len(), 3);
    assert_eq!(errors[0].kind, ImportErrorKind::MissingJsonKey);
    assert_eq!(errors[1].kind, ImportErrorKind::NonScalarField("tags".into()));
    assert!(matches!(errors[2].kind, ImportErrorKind::InvalidJson(_)));
}

#[test]
fn test_json_document_import() {
    let input = r#"{
        "alice": {"name": "Alice", "age": 30},
        "bob": {"name": "Bob"},
        "broken": 42
    }"#;

    let (records, errors) =
        import::read_input(Cursor::new(input), ImportFormat::JsonDocument).unwrap();

    let keys: Vec<&str> = records.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["alice", "bob"]);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ImportErrorKind::NotARecord("broken".into()));
}

#[test]
fn test_malformed_json_document_is_one_error() {
    let (records, errors) =
        import::read_input(Cursor::new("[1, 2"), ImportFormat::JsonDocument).unwrap();

    assert!(records.is_empty());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, 0);
}

// =============================================================================
// Store Import Tests
// =============================================================================

#[test]
fn test_store_import_persists_records() {
    let (_temp, store) = setup_temp_store();

    let report = store
        .import("demo", "contacts", Cursor::new(MIXED_INPUT), ImportFormat::Lines)
        .unwrap();

    assert_eq!(report.imported, 2);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(store.keys("demo", "contacts").unwrap(), vec!["alice", "bob"]);
}

#[test]
fn test_store_import_merges_with_existing() {
    let (_temp, store) = setup_temp_store();
    store
        .set(
            "demo",
            "contacts",
            "alice",
            record([("email", "alice@example.com")]),
        )
        .unwrap();

    store
        .import(
            "demo",
            "contacts",
            Cursor::new("alice age:31\nalice city:NYC\n"),
            ImportFormat::Lines,
        )
        .unwrap();

    let alice = store.get("demo", "contacts", "alice").unwrap().unwrap();
    assert_eq!(
        alice,
        Entry::Record(record([
            ("email", FieldValue::from("alice@example.com")),
            ("age", FieldValue::from(31)),
            ("city", FieldValue::from("NYC")),
        ]))
    );
}

#[test]
fn test_store_import_of_nothing_writes_nothing() {
    let (temp, store) = setup_temp_store();

    let report = store
        .import(
            "demo",
            "contacts",
            Cursor::new("# nothing\nbroken\n"),
            ImportFormat::Lines,
        )
        .unwrap();

    assert_eq!(report.imported, 0);
    assert_eq!(report.errors.len(), 1);
    assert!(!temp.path().join("json").join("demo").exists());
}

#[test]
fn test_yaml_store_import() {
    let temp_dir = TempDir::new().unwrap();
    let store = Store::open_path(temp_dir.path(), YamlDriver);

    let report = store
        .import(
            "shop",
            "products",
            Cursor::new("widget price:29.99 stock:12 sku:A-100\n"),
            ImportFormat::Lines,
        )
        .unwrap();

    assert_eq!(report.imported, 1);
    let reopened = Store::open_path(temp_dir.path(), YamlDriver);
    let widget = reopened.get("shop", "products", "widget").unwrap().unwrap();
    let fields = widget.as_record().unwrap();
    assert_eq!(fields["price"], FieldValue::Float(29.99));
    assert_eq!(fields["stock"], FieldValue::Integer(12));
    assert_eq!(fields["sku"], FieldValue::String("A-100".into()));
}

// =============================================================================
// Export / Re-import Tests
// =============================================================================

#[test]
fn test_oneline_output_imports_back() {
    let (_temp, store) = setup_temp_store();
    store
        .import("demo", "contacts", Cursor::new(MIXED_INPUT), ImportFormat::Lines)
        .unwrap();

    let all = store.all("demo", "contacts").unwrap();
    let exported = output::render(&all, OutputFormat::OneLine).unwrap();

    store
        .import("demo", "copy", Cursor::new(exported), ImportFormat::Lines)
        .unwrap();
    assert_eq!(store.all("demo", "copy").unwrap(), all);
}

#[test]
fn test_jsonl_output_imports_back() {
    let (_temp, store) = setup_temp_store();
    store
        .import("demo", "contacts", Cursor::new(MIXED_INPUT), ImportFormat::Lines)
        .unwrap();

    let all = store.all("demo", "contacts").unwrap();
    let exported = output::render(&all, OutputFormat::JsonLines).unwrap();

    let (records, errors) = import::parse_lines(exported.lines());
    assert!(errors.is_empty());
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].1["score"], FieldValue::Float(3.5));
}

#[test]
fn test_jsonl_round_trip_is_lossless() {
    let (_temp, store) = setup_temp_store();
    let input = concat!(
        r#"{"_key":"a","name":"Alice Smith","zip":"01234","vip":true,"id":18446744073709551615}"#,
        "\n",
        r#"{"_key":"empty"}"#,
        "\n",
    );
    store
        .import("demo", "contacts", Cursor::new(input), ImportFormat::Lines)
        .unwrap();
    let all = store.all("demo", "contacts").unwrap();
    assert_eq!(all.len(), 2);

    let exported = output::render(&all, OutputFormat::JsonLines).unwrap();
    let report = store
        .import("demo", "copy", Cursor::new(exported), ImportFormat::Lines)
        .unwrap();

    assert!(report.errors.is_empty());
    assert_eq!(store.all("demo", "copy").unwrap(), all);
    let a = all["a"].as_record().unwrap();
    assert_eq!(a["zip"], FieldValue::String("01234".into()));
    assert_eq!(a["vip"], FieldValue::Boolean(true));
    assert_eq!(a["id"], FieldValue::Unsigned(u64::MAX));
}

#[test]
fn test_oneline_is_not_lossless_for_rich_values() {
    let (_temp, store) = setup_temp_store();
    store
        .import(
            "demo",
            "contacts",
            Cursor::new(r#"{"_key":"a","name":"Alice Smith","zip":"01234","vip":true}"#),
            ImportFormat::Lines,
        )
        .unwrap();
    store
        .import(
            "demo",
            "plain",
            Cursor::new(r#"{"_key":"b","zip":"01234","vip":true}"#),
            ImportFormat::Lines,
        )
        .unwrap();

    let spaced = output::render(&store.all("demo", "contacts").unwrap(), OutputFormat::OneLine)
        .unwrap();
    assert_eq!(spaced, "a name:Alice Smith vip:true zip:01234");
    let (records, errors) = import::parse_lines(spaced.lines());
    assert!(records.is_empty());
    assert_eq!(errors[0].kind, ImportErrorKind::MissingColon("Smith".into()));

    let plain = output::render(&store.all("demo", "plain").unwrap(), OutputFormat::OneLine)
        .unwrap();
    let (records, errors) = import::parse_lines(plain.lines());
    assert!(errors.is_empty());
    assert_eq!(records[0].1["zip"], FieldValue::Integer(1234));
    assert_eq!(records[0].1["vip"], FieldValue::String("true".into()));
}
