//! jsonbox
//!
//! NoBox CLI over JSON collection files.

use std::io;

use clap::Parser;
use nobox::cli::{self, Args};
use nobox::JsonDriver;

fn main() {
    let args = Args::parse();
    cli::init_tracing(args.verbose);

    tracing::debug!("jsonbox v{}", nobox::VERSION);

    let code = cli::run(
        args,
        JsonDriver,
        io::stdin().lock(),
        &mut io::stdout().lock(),
        &mut io::stderr(),
    );
    std::process::exit(code);
}
