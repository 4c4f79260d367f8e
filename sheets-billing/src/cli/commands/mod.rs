//! Per-table subcommands

pub mod bills;
pub mod customers;
pub mod packages;
pub mod payments;
pub mod users;

use std::fs;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::error::StoreError;
use crate::store::{Entity, Table};

pub use bills::BillCommands;
pub use customers::CustomerCommands;
pub use packages::PackageCommands;
pub use payments::PaymentCommands;
pub use users::UserCommands;

/// Parse a JSON request body given inline or as `@path/to/file.json`
pub fn parse_body<T: DeserializeOwned>(data: &str) -> Result<T> {
    let text = match data.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read request body from: {}", path))?,
        None => data.to_string(),
    };
    serde_json::from_str(&text).context("Invalid JSON request body")
}

/// Fetch a row that must exist, as a `NotFound` error otherwise
pub async fn require<E: Entity>(table: &Table<E>, id: &str) -> Result<E> {
    table
        .find_by_id(id)
        .await?
        .ok_or_else(|| StoreError::not_found(E::TABLE, id).into())
}
