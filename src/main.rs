//! Choreodoc CLI entry point.

use clap::Parser;
use choreodoc::cli::{self, Cli, Commands, EXIT_ERROR};

fn main() {
    let cli = Cli::parse();
    cli::init_logging(cli.verbose);

    let result = match &cli.command {
        Commands::Render(args) => cli::run_render(args),
        Commands::List(args) => cli::run_list(args),
        Commands::Init(args) => cli::run_init(args),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
