use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use sheets_billing::cli::{self, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file (ignore if not found)
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "Error:".red().bold(), cli::describe(&err));
            ExitCode::from(cli::exit_code(&err))
        }
    }
}
