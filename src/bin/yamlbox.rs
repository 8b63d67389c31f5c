//! yamlbox
//!
//! NoBox CLI over YAML collection files.

use std::io;

use clap::Parser;
use nobox::cli::{self, Args};
use nobox::YamlDriver;

fn main() {
    let args = Args::parse();
    cli::init_tracing(args.verbose);

    tracing::debug!("yamlbox v{}", nobox::VERSION);

    let code = cli::run(
        args,
        YamlDriver,
        io::stdin().lock(),
        &mut io::stdout().lock(),
        &mut io::stderr(),
    );
    std::process::exit(code);
}
