//! CLI entry point for the arrow-path simulator

use arrowpath::io::cli::{Cli, GameRunner};
use clap::Parser;

fn main() -> arrowpath::Result<()> {
    let cli = Cli::parse();
    arrowpath::io::logging::init();
    let mut runner = GameRunner::new(cli);
    runner.process()
}
