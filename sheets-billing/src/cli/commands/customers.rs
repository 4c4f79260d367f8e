use anyhow::{Result, bail};
use clap::Subcommand;
use colored::Colorize;

use super::{parse_body, require};
use crate::cli::{CommandContext, output};
use crate::error::StoreError;
use crate::store::entities::{CustomerPatch, NewCustomer};
use crate::store::id::now;

#[derive(Subcommand, Debug)]
pub enum CustomerCommands {
    /// List customers
    List {
        /// Only customers with status `active`
        #[arg(long)]
        active: bool,
        /// Only customers on this package
        #[arg(long)]
        package: Option<String>,
    },

    /// Show one customer with its package
    Get { id: String },

    /// Create a customer. The package must exist.
    Create {
        /// JSON body ({"name", "address", "phone", "email", "packageId"}), or @file
        #[arg(short, long)]
        data: String,
    },

    /// Change fields of a customer
    Update {
        id: String,
        #[arg(short, long)]
        data: String,
    },

    /// Set status to inactive
    Deactivate { id: String },

    /// Set status to active
    Activate { id: String },

    /// Bills of one customer
    Bills { id: String },

    /// Counts by status and joins this month
    Stats,
}

pub async fn handle(ctx: &CommandContext, cmd: CustomerCommands) -> Result<()> {
    let store = &ctx.store;

    match cmd {
        CustomerCommands::List { active, package } => {
            let customers = store
                .customers
                .find_where(|c| {
                    (!active || c.is_active())
                        && package.as_ref().is_none_or(|p| &c.package_id == p)
                })
                .await?;
            output::print(&customers, ctx.format)
        }
        CustomerCommands::Get { id } => {
            let customer = store
                .customer_with_package(&id)
                .await?
                .ok_or_else(|| StoreError::not_found("Customers", &id))?;
            output::print(&customer, ctx.format)
        }
        CustomerCommands::Create { data } => {
            let draft: NewCustomer = parse_body(&data)?;
            require(&store.packages, &draft.package_id).await?;
            if store.find_customer_by_email(&draft.email).await?.is_some() {
                bail!("A customer with email {} already exists", draft.email);
            }
            let customer = store.customers.create(draft).await?;
            eprintln!("{} {}", "Customer created:".green(), customer.id.bright_white());
            output::print(&customer, ctx.format)
        }
        CustomerCommands::Update { id, data } => {
            let patch: CustomerPatch = parse_body(&data)?;
            if let Some(package_id) = &patch.package_id {
                require(&store.packages, package_id).await?;
            }
            let customer = store.customers.update(&id, patch).await?;
            eprintln!("{} {}", "Customer updated:".green(), id.bright_white());
            output::print(&customer, ctx.format)
        }
        CustomerCommands::Deactivate { id } => {
            let customer = store.deactivate_customer(&id).await?;
            eprintln!("{} {}", "Customer deactivated:".yellow(), id.bright_white());
            output::print(&customer, ctx.format)
        }
        CustomerCommands::Activate { id } => {
            let customer = store.activate_customer(&id).await?;
            eprintln!("{} {}", "Customer activated:".green(), id.bright_white());
            output::print(&customer, ctx.format)
        }
        CustomerCommands::Bills { id } => {
            require(&store.customers, &id).await?;
            output::print(&store.bills_by_customer(&id).await?, ctx.format)
        }
        CustomerCommands::Stats => {
            let stats = store.customer_stats(now().date()).await?;
            output::print(&stats, ctx.format)
        }
    }
}
