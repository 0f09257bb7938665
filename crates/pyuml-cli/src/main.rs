//! Pyuml CLI - Generate class diagrams from Python code

mod cli;
mod colorizer;

use clap::Parser;

fn main() {
    // Logging is configured inside `run`, once the flags are known
    let cli_args = cli::Cli::parse();

    let app = cli::PyumlApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
