use anyhow::{Result, bail};
use chrono::Datelike;
use clap::Subcommand;
use colored::Colorize;

use super::{parse_body, require};
use crate::cli::{CommandContext, output};
use crate::store::entities::{BILL_PAID, BILL_UNPAID, BillPatch, NewBill};
use crate::store::id::now;

#[derive(Subcommand, Debug)]
pub enum BillCommands {
    /// List bills
    List {
        /// Only bills with this status (paid, unpaid)
        #[arg(long)]
        status: Option<String>,
        /// Only bills of this customer
        #[arg(long)]
        customer: Option<String>,
    },

    /// Show one bill
    Get { id: String },

    /// Create a bill. Customer and package must exist.
    Create {
        /// JSON body ({"customerId", "packageId", "month", "year", "amount", "dueDate"}), or @file
        #[arg(short, long)]
        data: String,
    },

    /// Change fields of a bill
    Update {
        id: String,
        #[arg(short, long)]
        data: String,
    },

    /// Set the status of a bill
    Status {
        id: String,
        #[arg(value_parser = [BILL_PAID, BILL_UNPAID])]
        status: String,
    },

    /// Remove a bill
    Delete { id: String },

    /// Bill every active customer for a month at its package price
    Generate {
        /// 1-12, defaults to the current month
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
        /// Defaults to the current year
        #[arg(long)]
        year: Option<i32>,
    },

    /// Unpaid bills past their due date
    Overdue,

    /// Counts and amounts by status
    Stats,
}

pub async fn handle(ctx: &CommandContext, cmd: BillCommands) -> Result<()> {
    let store = &ctx.store;

    match cmd {
        BillCommands::List { status, customer } => {
            let bills = store
                .bills
                .find_where(|b| {
                    status.as_ref().is_none_or(|s| &b.status == s)
                        && customer.as_ref().is_none_or(|c| &b.customer_id == c)
                })
                .await?;
            output::print(&bills, ctx.format)
        }
        BillCommands::Get { id } => {
            let bill = require(&store.bills, &id).await?;
            output::print(&bill, ctx.format)
        }
        BillCommands::Create { data } => {
            let draft: NewBill = parse_body(&data)?;
            if !(1..=12).contains(&draft.month) {
                bail!("Month must be between 1 and 12, got {}", draft.month);
            }
            require(&store.customers, &draft.customer_id).await?;
            require(&store.packages, &draft.package_id).await?;
            let bill = store.bills.create(draft).await?;
            eprintln!("{} {}", "Bill created:".green(), bill.id.bright_white());
            output::print(&bill, ctx.format)
        }
        BillCommands::Update { id, data } => {
            let patch: BillPatch = parse_body(&data)?;
            if let Some(month) = patch.month.filter(|m| !(1..=12).contains(m)) {
                bail!("Month must be between 1 and 12, got {}", month);
            }
            if let Some(customer_id) = &patch.customer_id {
                require(&store.customers, customer_id).await?;
            }
            if let Some(package_id) = &patch.package_id {
                require(&store.packages, package_id).await?;
            }
            let bill = store.bills.update(&id, patch).await?;
            eprintln!("{} {}", "Bill updated:".green(), id.bright_white());
            output::print(&bill, ctx.format)
        }
        BillCommands::Status { id, status } => {
            let bill = store.update_bill_status(&id, &status).await?;
            eprintln!("{} {} -> {}", "Bill status:".green(), id.bright_white(), status.bold());
            output::print(&bill, ctx.format)
        }
        BillCommands::Delete { id } => {
            let bill = store.bills.delete(&id).await?;
            eprintln!("{} {}", "Bill deleted:".green(), id.bright_white());
            output::print(&bill, ctx.format)
        }
        BillCommands::Generate { month, year } => {
            let today = now().date();
            let month = month.unwrap_or(today.month());
            let year = year.unwrap_or(today.year());

            let bills = store.generate_monthly_bills(month, year).await?;
            eprintln!(
                "{}",
                format!("{} bills generated for {}/{}", bills.len(), month, year).green()
            );
            output::print(&bills, ctx.format)
        }
        BillCommands::Overdue => {
            let bills = store.overdue_bills(now().date()).await?;
            output::print(&bills, ctx.format)
        }
        BillCommands::Stats => output::print(&store.bill_stats().await?, ctx.format),
    }
}
