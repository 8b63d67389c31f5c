//! Command-line shell shared by `jsonbox` and `yamlbox`
//!
//! ```text
//! jsonbox [--list]                          list databases
//! jsonbox <db> [--list | collections]       list collections
//! jsonbox <db> <col> set <key> f:v ...      create / merge a record
//! jsonbox <db> <col> get|del <key>
//! jsonbox <db> <col> keys|all [--csv|--json|--jsonl|--oneline]
//! jsonbox <db> <col> --import [--json] < data.txt
//! jsonbox <db> [<col>] --delete [--yes]
//! ```
//!
//! Results go to stdout, errors and import diagnostics to stderr. Exit code
//! is 0 on success and 1 on any reported error.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum};
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::driver::Driver;
use crate::error::NoboxError;
use crate::import::{self, ImportFormat};
use crate::output::{self, OutputFormat};
use crate::record::Collection;
use crate::store::Store;

/// Import errors printed before the rest are summarized
const MAX_REPORTED_IMPORT_ERRORS: usize = 5;

/// NoBox CLI
#[derive(Parser, Debug)]
#[command(about = "NoBox - JSON and YAML key-value storage")]
#[command(version)]
#[command(group(ArgGroup::new("output").args(["json", "jsonl", "oneline", "csv"])))]
pub struct Args {
    /// Database name
    pub database: Option<String>,

    /// Collection name
    pub collection: Option<String>,

    /// Command to execute
    #[arg(value_enum)]
    pub command: Option<Command>,

    /// Command arguments (key for get/del, key field:value... for set)
    pub args: Vec<String>,

    /// List databases (no args) or collections (with database)
    #[arg(short, long)]
    pub list: bool,

    /// Import records from stdin (requires database and collection)
    #[arg(short, long = "import")]
    pub import: bool,

    /// Delete database (with database only) or collection (with both)
    #[arg(short, long)]
    pub delete: bool,

    /// Skip the confirmation prompt of --delete
    #[arg(short, long)]
    pub yes: bool,

    /// Output as JSON (with --import: read stdin as one JSON object)
    #[arg(long)]
    pub json: bool,

    /// Output as JSON Lines (one object per line)
    #[arg(long)]
    pub jsonl: bool,

    /// Output as one-line format (key field:value ...)
    #[arg(long)]
    pub oneline: bool,

    /// Output as CSV
    #[arg(long)]
    pub csv: bool,

    /// Storage root (default: $NOBOX_HOME or the platform data directory)
    #[arg(long, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Positional commands
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Set,
    Get,
    Del,
    Keys,
    All,
    Databases,
    Collections,
}

impl Args {
    fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.jsonl {
            OutputFormat::JsonLines
        } else if self.oneline {
            OutputFormat::OneLine
        } else if self.csv {
            OutputFormat::Csv
        } else {
            OutputFormat::Table
        }
    }

    fn config(&self) -> Config {
        match &self.data_dir {
            Some(dir) => Config::builder().data_root(dir).build(),
            None => Config::from_env(),
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("{op} failed: {source}")]
    Store {
        op: &'static str,
        #[source]
        source: NoboxError,
    },

    #[error(transparent)]
    Missing(NoboxError),

    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),
}

type CliResult<T> = std::result::Result<T, CliError>;

/// Attach the operation name to a store error
trait OpContext<T> {
    fn op(self, op: &'static str) -> CliResult<T>;
}

impl<T> OpContext<T> for crate::Result<T> {
    fn op(self, op: &'static str) -> CliResult<T> {
        self.map_err(|source| CliError::Store { op, source })
    }
}

fn not_found(what: String) -> CliError {
    CliError::Missing(NoboxError::NotFound(what))
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` wins; otherwise `-v` picks the level.
pub fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Run one invocation and return its exit code
pub fn run<D, R, W, E>(args: Args, driver: D, stdin: R, stdout: &mut W, stderr: &mut E) -> i32
where
    D: Driver,
    R: BufRead,
    W: Write,
    E: Write,
{
    let store = Store::new(args.config(), driver);
    tracing::debug!(root = %store.format_root().display(), "resolved storage root");

    match dispatch(&store, &args, stdin, stdout, stderr) {
        Ok(code) => code,
        Err(e) => {
            let _ = writeln!(stderr, "Error: {}", e);
            1
        }
    }
}

fn dispatch<D, R, W, E>(
    store: &Store<D>,
    args: &Args,
    stdin: R,
    out: &mut W,
    err: &mut E,
) -> CliResult<i32>
where
    D: Driver,
    R: BufRead,
    W: Write,
    E: Write,
{
    let database = args.database.as_deref();
    let collection = args.collection.as_deref();

    // Shorthands: `jb databases`, `jb <db> collections`
    if database == Some("databases") {
        return print_databases(store, out);
    }
    if collection == Some("collections") {
        return print_collections(store, database, out);
    }

    if args.import {
        let (Some(db), Some(col)) = (database, collection) else {
            return Err(CliError::Usage(
                "import requires database and collection\n\
                 Usage: jb <database> <collection> --import < data.txt"
                    .into(),
            ));
        };
        return run_import(store, db, col, args.json, stdin, out, err);
    }

    if args.delete {
        return run_delete(store, database, collection, args.yes, stdin, out);
    }

    if args.list {
        return match database {
            None => print_databases(store, out),
            Some(_) => print_collections(store, database, out),
        };
    }

    let (Some(db), Some(col), Some(command)) = (database, collection, args.command) else {
        return Err(CliError::Usage(
            "database, collection, and command are required for CRUD operations".into(),
        ));
    };

    match command {
        Command::Set => {
            let [key, pairs @ ..] = args.args.as_slice() else {
                return Err(set_usage());
            };
            if pairs.is_empty() {
                return Err(set_usage());
            }
            let fields =
                import::parse_fields(pairs).map_err(|e| CliError::Usage(e.to_string()))?;
            store.set(db, col, key, fields).op("set")?;
            writeln!(out, "Set record '{}' in {}", key, col)?;
        }

        Command::Get => {
            let key = single_key(&args.args, "get")?;
            let Some(entry) = store.get(db, col, key).op("get")? else {
                return Err(not_found(format!("Record '{}'", key)));
            };
            let mut single = Collection::new();
            single.insert(key.to_string(), entry);
            write_records(&single, args.output_format(), out)?;
        }

        Command::Del => {
            let key = single_key(&args.args, "del")?;
            if !store.delete(db, col, key).op("delete")? {
                return Err(not_found(format!("Record '{}'", key)));
            }
            writeln!(out, "Deleted record '{}' from {}", key, col)?;
        }

        Command::Keys => {
            let keys = store.keys(db, col).op("keys")?;
            if keys.is_empty() {
                writeln!(out, "No records in {}", col)?;
            }
            for key in keys {
                writeln!(out, "{}", key)?;
            }
        }

        Command::All => {
            let records = store.all(db, col).op("all")?;
            write_records(&records, args.output_format(), out)?;
        }

        Command::Databases => return print_databases(store, out),
        Command::Collections => return print_collections(store, database, out),
    }

    Ok(0)
}

fn set_usage() -> CliError {
    CliError::Usage("'set' requires key and at least one field:value pair".into())
}

fn single_key<'a>(args: &'a [String], command: &str) -> CliResult<&'a str> {
    match args {
        [key] => Ok(key.as_str()),
        _ => Err(CliError::Usage(format!(
            "'{}' requires exactly one key",
            command
        ))),
    }
}

fn write_records<W: Write>(records: &Collection, format: OutputFormat, out: &mut W) -> CliResult<()> {
    let rendered = output::render(records, format).op("render")?;
    if !rendered.is_empty() {
        writeln!(out, "{}", rendered)?;
    }
    Ok(())
}

fn print_databases<D: Driver, W: Write>(store: &Store<D>, out: &mut W) -> CliResult<i32> {
    let databases = store.list_databases().op("list databases")?;
    let format = store.driver().name();

    if databases.is_empty() {
        writeln!(out, "No databases found in {} format", format)?;
        return Ok(0);
    }

    writeln!(out, "Databases ({}):", format)?;
    for db in &databases {
        writeln!(out, "  {}", db)?;
    }
    writeln!(out, "\n{} database(s)", databases.len())?;
    Ok(0)
}

fn print_collections<D: Driver, W: Write>(
    store: &Store<D>,
    database: Option<&str>,
    out: &mut W,
) -> CliResult<i32> {
    let Some(db) = database else {
        return Err(CliError::Usage(
            "'collections' command requires a database name\nUsage: jb <database> collections"
                .into(),
        ));
    };

    let collections = store.list_collections(db).op("list collections")?;
    if collections.is_empty() {
        writeln!(out, "No collections found in database '{}'", db)?;
        return Ok(0);
    }

    writeln!(out, "Collections in '{}':", db)?;
    for col in &collections {
        writeln!(out, "  {}", col)?;
    }
    writeln!(out, "\n{} collection(s)", collections.len())?;
    Ok(0)
}

fn run_import<D, R, W, E>(
    store: &Store<D>,
    db: &str,
    col: &str,
    json_document: bool,
    stdin: R,
    out: &mut W,
    err: &mut E,
) -> CliResult<i32>
where
    D: Driver,
    R: BufRead,
    W: Write,
    E: Write,
{
    let format = if json_document {
        ImportFormat::JsonDocument
    } else {
        ImportFormat::Lines
    };

    let report = store.import(db, col, stdin, format).op("import")?;

    writeln!(out, "Imported {} record(s) into {}", report.imported, col)?;

    if !report.errors.is_empty() {
        writeln!(err, "{} line(s) skipped due to errors:", report.errors.len())?;
        for line_error in report.errors.iter().take(MAX_REPORTED_IMPORT_ERRORS) {
            writeln!(err, "  {}", line_error)?;
        }
        if report.errors.len() > MAX_REPORTED_IMPORT_ERRORS {
            writeln!(
                err,
                "  ... and {} more",
                report.errors.len() - MAX_REPORTED_IMPORT_ERRORS
            )?;
        }
    }

    Ok(if report.imported > 0 { 0 } else { 1 })
}

fn run_delete<D, R, W>(
    store: &Store<D>,
    database: Option<&str>,
    collection: Option<&str>,
    yes: bool,
    stdin: R,
    out: &mut W,
) -> CliResult<i32>
where
    D: Driver,
    R: BufRead,
    W: Write,
{
    match (database, collection) {
        (Some(db), Some(col)) => {
            if !store.collection_exists(db, col).op("delete collection")? {
                return Err(not_found(format!(
                    "Collection '{}' in database '{}'",
                    col, db
                )));
            }

            let prompt = format!("Delete collection '{}' from database '{}'?", col, db);
            if !yes && !confirm(&prompt, stdin, out)? {
                writeln!(out, "Aborted")?;
                return Ok(1);
            }

            store.delete_collection(db, col).op("delete collection")?;
            writeln!(out, "Deleted collection '{}' from database '{}'", col, db)?;
            Ok(0)
        }

        (Some(db), None) => {
            if !store.database_exists(db).op("delete database")? {
                return Err(not_found(format!("Database '{}'", db)));
            }

            let collections = store.list_collections(db).op("delete database")?;
            let prompt = format!(
                "Delete database '{}' and its {} collection(s)?",
                db,
                collections.len()
            );
            if !yes && !confirm(&prompt, stdin, out)? {
                writeln!(out, "Aborted")?;
                return Ok(1);
            }

            store.delete_database(db).op("delete database")?;
            writeln!(
                out,
                "Deleted database '{}' ({} collection(s))",
                db,
                collections.len()
            )?;
            Ok(0)
        }

        _ => Err(CliError::Usage(
            "--delete requires database name\n\
             Usage: jb <database> --delete                 # Delete database\n   \
             or: jb <database> <collection> --delete    # Delete collection"
                .into(),
        )),
    }
}

/// Ask a yes/no question; anything but `y`/`yes` is a no
fn confirm<R: BufRead, W: Write>(prompt: &str, mut stdin: R, out: &mut W) -> io::Result<bool> {
    write!(out, "{} [y/N]: ", prompt)?;
    out.flush()?;

    let mut answer = String::new();
    stdin.read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}
