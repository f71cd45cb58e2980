//! patient-cleaner CLI - normalize tabular patient demographic data.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use logging::{LogConfig, init_logging};

fn main() {
    let cli = Cli::parse();

    init_logging(&LogConfig::from_verbosity(cli.verbose).with_log_data(cli.log_data));
    let verbose = cli.verbose > 0;

    let result = match cli.command {
        Commands::Clean {
            file,
            output,
            format,
            audit,
            keep_going,
            config,
            delimiter,
        } => commands::clean::run(
            file, output, format, audit, keep_going, config, delimiter, verbose,
        ),

        Commands::Diff {
            file,
            rows,
            column,
            config,
        } => commands::diff::run(file, rows, column, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
