pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "shopcart",
    about = "Shopcart operator CLI",
    long_about = "Operate the shopcart catalog store: migrations, demo data, config inspection, readiness checks and development tokens.",
    after_help = "Examples:\n  shopcart doctor --json\n  shopcart seed\n  shopcart token --email alice@example.com"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic demo catalog (idempotent) and verify it")]
    Seed,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, DB connectivity and schema state")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Mint a bearer token for a cart owner, for local development")]
    Token {
        #[arg(long, help = "Email address carried as the identity claim")]
        email: String,
        #[arg(long, help = "Token lifetime in seconds (defaults to auth.token_ttl_secs)")]
        ttl_secs: Option<u64>,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Token { email, ttl_secs } => commands::token::run(&email, ttl_secs),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
