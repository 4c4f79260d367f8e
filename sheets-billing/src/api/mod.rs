//! Google Sheets range I/O
//!
//! This module is the leaf of the storage stack: it moves whole rows between
//! the process and a named range of the remote spreadsheet. It owns no entity
//! state and every call is a round trip to the backing service. Nothing here
//! retries, locks or orders concurrent calls.

pub mod auth;
pub mod client;
pub mod constants;
pub mod memory;
pub mod models;

use async_trait::async_trait;

use crate::error::StoreResult;

pub use auth::AuthManager;
pub use client::SheetsClient;
pub use memory::MemoryRangeStore;
pub use models::{ServiceAccountCredentials, TokenInfo, ValueRange};

/// One spreadsheet row, cells in column order
pub type Row = Vec<String>;

/// The four primitives every table operation is composed from
#[async_trait]
pub trait RangeStore: Send + Sync {
    /// Read every row of the range. An empty range (no header either) yields
    /// an empty vector.
    async fn fetch_range(&self, range: &str) -> StoreResult<Vec<Row>>;

    /// Append rows after the existing content without reading it first.
    async fn append_rows(&self, range: &str, rows: Vec<Row>) -> StoreResult<()>;

    /// Replace the contents of the range with `rows`. `rows[0]` is the header.
    ///
    /// Destructive: anything written since the caller's last read is lost.
    async fn overwrite_range(&self, range: &str, rows: Vec<Row>) -> StoreResult<()>;

    /// Remove header and data from the range.
    async fn clear_range(&self, range: &str) -> StoreResult<()>;
}
