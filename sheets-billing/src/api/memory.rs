//! In-process range store
//!
//! Same contract as the Sheets client, kept in a map. Used by tests and by
//! `--offline` runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{RangeStore, Row};
use crate::error::StoreResult;

#[derive(Debug, Clone, Default)]
pub struct MemoryRangeStore {
    ranges: Arc<RwLock<HashMap<String, Vec<Row>>>>,
}

impl MemoryRangeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a range with raw rows (header first)
    pub async fn seed(&self, range: &str, rows: Vec<Row>) {
        self.ranges.write().await.insert(range.to_string(), rows);
    }

    /// Raw rows currently stored for a range
    pub async fn snapshot(&self, range: &str) -> Vec<Row> {
        self.ranges
            .read()
            .await
            .get(range)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl RangeStore for MemoryRangeStore {
    async fn fetch_range(&self, range: &str) -> StoreResult<Vec<Row>> {
        Ok(self.snapshot(range).await)
    }

    async fn append_rows(&self, range: &str, rows: Vec<Row>) -> StoreResult<()> {
        self.ranges
            .write()
            .await
            .entry(range.to_string())
            .or_default()
            .extend(rows);
        Ok(())
    }

    async fn overwrite_range(&self, range: &str, rows: Vec<Row>) -> StoreResult<()> {
        self.ranges.write().await.insert(range.to_string(), rows);
        Ok(())
    }

    async fn clear_range(&self, range: &str) -> StoreResult<()> {
        self.ranges.write().await.remove(range);
        Ok(())
    }
}
