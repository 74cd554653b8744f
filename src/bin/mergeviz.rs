//! mergeviz CLI binary.

use std::io::Write;
use std::process;

use clap::Parser;
use env_logger::Builder;

use mergeviz::cli::args::*;
use mergeviz::cli::commands::*;
use mergeviz::movie::driver::PROGRESS_TARGET;

fn main() {
    let args = MergeVizArgs::parse();

    Builder::new()
        .filter_level(args.log_level())
        .filter_module(PROGRESS_TARGET, args.progress_level())
        .parse_env("MERGEVIZ_LOG")
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
