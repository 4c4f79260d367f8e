use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::{parse_body, require};
use crate::cli::{CommandContext, output};
use crate::store::entities::{BILL_PAID, NewPayment, PaymentPatch};

#[derive(Subcommand, Debug)]
pub enum PaymentCommands {
    /// List payments
    List,

    /// Show one payment
    Get { id: String },

    /// Record a payment. The bill must exist.
    Create {
        /// JSON body ({"billId", "amount", "paymentMethod", "createdBy", ...}), or @file
        #[arg(short, long)]
        data: String,
        /// Also mark the bill as paid
        #[arg(long)]
        settle: bool,
    },

    /// Change fields of a payment
    Update {
        id: String,
        #[arg(short, long)]
        data: String,
    },

    /// Remove a payment
    Delete { id: String },

    /// Payments against one bill
    ByBill { bill_id: String },

    /// Payments against any bill of one customer
    ByCustomer { customer_id: String },

    /// Counts and amounts by payment method
    Stats,
}

pub async fn handle(ctx: &CommandContext, cmd: PaymentCommands) -> Result<()> {
    let store = &ctx.store;

    match cmd {
        PaymentCommands::List => output::print(&store.payments.list_all().await?, ctx.format),
        PaymentCommands::Get { id } => {
            let payment = require(&store.payments, &id).await?;
            output::print(&payment, ctx.format)
        }
        PaymentCommands::Create { data, settle } => {
            let draft: NewPayment = parse_body(&data)?;
            let bill = require(&store.bills, &draft.bill_id).await?;
            let payment = store.payments.create(draft).await?;
            eprintln!("{} {}", "Payment recorded:".green(), payment.id.bright_white());

            if settle && !bill.is_paid() {
                store.update_bill_status(&bill.id, BILL_PAID).await?;
                eprintln!("{} {}", "Bill marked paid:".green(), bill.id.bright_white());
            }
            output::print(&payment, ctx.format)
        }
        PaymentCommands::Update { id, data } => {
            let patch: PaymentPatch = parse_body(&data)?;
            if let Some(bill_id) = &patch.bill_id {
                require(&store.bills, bill_id).await?;
            }
            let payment = store.payments.update(&id, patch).await?;
            eprintln!("{} {}", "Payment updated:".green(), id.bright_white());
            output::print(&payment, ctx.format)
        }
        PaymentCommands::Delete { id } => {
            let payment = store.payments.delete(&id).await?;
            eprintln!("{} {}", "Payment deleted:".green(), id.bright_white());
            output::print(&payment, ctx.format)
        }
        PaymentCommands::ByBill { bill_id } => {
            output::print(&store.payments_by_bill(&bill_id).await?, ctx.format)
        }
        PaymentCommands::ByCustomer { customer_id } => {
            output::print(&store.payments_by_customer(&customer_id).await?, ctx.format)
        }
        PaymentCommands::Stats => output::print(&store.payment_stats().await?, ctx.format),
    }
}
