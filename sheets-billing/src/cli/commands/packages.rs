use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::{parse_body, require};
use crate::cli::{CommandContext, output};
use crate::store::entities::{NewPackage, PackagePatch};

#[derive(Subcommand, Debug)]
pub enum PackageCommands {
    /// List packages
    List {
        /// Only packages with status `active`
        #[arg(long)]
        active: bool,
    },

    /// Show one package
    Get { id: String },

    /// Create a package from a JSON body ({"name", "speed", "price", ...})
    Create {
        /// JSON body, or @file
        #[arg(short, long)]
        data: String,
    },

    /// Change fields of a package
    Update {
        id: String,
        /// JSON body with the fields to change, or @file
        #[arg(short, long)]
        data: String,
    },

    /// Remove a package
    Delete { id: String },
}

pub async fn handle(ctx: &CommandContext, cmd: PackageCommands) -> Result<()> {
    let packages = &ctx.store.packages;

    match cmd {
        PackageCommands::List { active } => {
            let list = if active {
                packages.find_where(|p| p.is_active()).await?
            } else {
                packages.list_all().await?
            };
            output::print(&list, ctx.format)
        }
        PackageCommands::Get { id } => {
            let package = require(packages, &id).await?;
            output::print(&package, ctx.format)
        }
        PackageCommands::Create { data } => {
            let draft: NewPackage = parse_body(&data)?;
            let package = packages.create(draft).await?;
            eprintln!("{} {}", "Package created:".green(), package.id.bright_white());
            output::print(&package, ctx.format)
        }
        PackageCommands::Update { id, data } => {
            let patch: PackagePatch = parse_body(&data)?;
            let package = packages.update(&id, patch).await?;
            eprintln!("{} {}", "Package updated:".green(), id.bright_white());
            output::print(&package, ctx.format)
        }
        PackageCommands::Delete { id } => {
            let in_use = ctx
                .store
                .customers
                .find_where(|c| c.package_id == id)
                .await?
                .len();
            if in_use > 0 {
                eprintln!(
                    "{}",
                    format!("{} customer(s) still reference package {}", in_use, id).yellow()
                );
            }
            let package = packages.delete(&id).await?;
            eprintln!("{} {}", "Package deleted:".green(), id.bright_white());
            output::print(&package, ctx.format)
        }
    }
}
