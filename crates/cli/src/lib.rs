pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "platey",
    about = "Platey operator CLI",
    long_about = "Inspect configuration, probe catalog sources, and run one-shot searches against the plate catalog engine.",
    after_help = "Examples:\n  platey doctor --json\n  platey config\n  platey catalogs\n  platey search moto 777\n  platey search auto МК --letters"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, token shape, and per-catalog source reachability")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "List the configured catalog bindings")]
    Catalogs,
    #[command(about = "Run a one-shot search against one catalog")]
    Search {
        #[arg(help = "Catalog name from the [[catalogs]] bindings")]
        category: String,
        #[arg(help = "Query text; digits by default")]
        query: String,
        #[arg(long, help = "Search by letters instead of digits")]
        letters: bool,
        #[arg(long, help = "Digit strategy: suffix or substring (defaults to config)")]
        strategy: Option<String>,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Catalogs => commands::catalogs::run(),
        Command::Search { category, query, letters, strategy } => {
            commands::search::run(&category, &query, letters, strategy.as_deref())
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
