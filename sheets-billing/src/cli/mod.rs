//! Command-line interface

pub mod commands;
pub mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::{debug, warn};

use crate::api::{MemoryRangeStore, RangeStore, SheetsClient};
use crate::config::SheetsConfig;
use crate::error::StoreError;
use crate::store::SheetStore;
use commands::{
    BillCommands, CustomerCommands, PackageCommands, PaymentCommands, UserCommands,
};

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_UNAVAILABLE: u8 = 3;

/// ISP billing on top of a Google Sheets spreadsheet
#[derive(Parser, Debug)]
#[command(name = "sheets-billing")]
#[command(version)]
#[command(about = "Manage users, customers, packages, bills and payments stored in Google Sheets")]
pub struct Cli {
    /// Config file (default: <config dir>/sheets-billing/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Run against an empty in-memory spreadsheet
    #[arg(long, global = true)]
    pub offline: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Disable colored messages
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// Single-line JSON
    JsonCompact,
    /// CSV with a header row
    Csv,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clear all five sheets and write their header rows
    Init,

    /// Application accounts
    #[command(subcommand)]
    Users(UserCommands),

    /// Subscribers
    #[command(subcommand)]
    Customers(CustomerCommands),

    /// Internet packages
    #[command(subcommand)]
    Packages(PackageCommands),

    /// Monthly bills
    #[command(subcommand)]
    Bills(BillCommands),

    /// Payments against bills
    #[command(subcommand)]
    Payments(PaymentCommands),

    /// Headline numbers across all tables
    Dashboard,
}

/// Everything a command handler needs
pub struct CommandContext {
    pub store: SheetStore,
    pub format: OutputFormat,
}

pub async fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let ctx = CommandContext {
        store: SheetStore::new(connect(&cli)?),
        format: cli.format,
    };

    match cli.command {
        Commands::Init => {
            ctx.store.initialize().await?;
            eprintln!("{}", "Initialized Users, Customers, Packages, Bills and Payments".green());
            Ok(())
        }
        Commands::Users(cmd) => commands::users::handle(&ctx, cmd).await,
        Commands::Customers(cmd) => commands::customers::handle(&ctx, cmd).await,
        Commands::Packages(cmd) => commands::packages::handle(&ctx, cmd).await,
        Commands::Bills(cmd) => commands::bills::handle(&ctx, cmd).await,
        Commands::Payments(cmd) => commands::payments::handle(&ctx, cmd).await,
        Commands::Dashboard => {
            let stats = ctx.store.dashboard_stats().await?;
            output::print(&stats, ctx.format)
        }
    }
}

fn connect(cli: &Cli) -> Result<Arc<dyn RangeStore>> {
    if cli.offline {
        warn!("Offline mode: changes are kept in memory and discarded on exit");
        return Ok(Arc::new(MemoryRangeStore::new()));
    }

    let config = SheetsConfig::load(cli.config.as_deref())
        .context("Failed to load spreadsheet configuration")?;
    debug!("Using spreadsheet {}", config.spreadsheet_id);
    Ok(Arc::new(SheetsClient::new(&config)?))
}

/// Process exit code for a failed command
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<StoreError>() {
        Some(StoreError::NotFound { .. }) => EXIT_NOT_FOUND,
        Some(StoreError::RemoteUnavailable { .. }) => EXIT_UNAVAILABLE,
        None => EXIT_FAILURE,
    }
}

/// One-line message for a failed command
pub fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<StoreError>() {
        Some(StoreError::NotFound { table, id }) => format!("{} not found: {}", table, id),
        Some(StoreError::RemoteUnavailable { .. }) => format!("Service unavailable: {:#}", err),
        None => format!("{:#}", err),
    }
}
