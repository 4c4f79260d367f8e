//! Header-indexed view of raw sheet rows
//!
//! The only place where cells are addressed by column name. Entity types read
//! from a `Record` and write plain rows in their own column order.

use std::collections::HashMap;

use crate::api::Row;

/// One data row keyed by the header it was stored under
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    cells: HashMap<String, String>,
}

impl Record {
    /// Zip header names with row values. Cells past the end of a short row
    /// read as empty; cells past the end of the header are dropped.
    pub fn from_row(header: &[String], row: &[String]) -> Self {
        let cells = header
            .iter()
            .enumerate()
            .map(|(index, name)| (name.clone(), row.get(index).cloned().unwrap_or_default()))
            .collect();
        Self { cells }
    }

    /// Cell under `column`, or the empty string if the column is absent
    pub fn get(&self, column: &str) -> String {
        self.cells.get(column).cloned().unwrap_or_default()
    }
}

/// True if every cell of the row is empty (or the row has no cells)
pub fn is_blank(row: &[String]) -> bool {
    row.iter().all(|cell| cell.is_empty())
}

/// Split a fetched range into records: `rows[0]` is the header, blank rows
/// are skipped. No rows at all means an empty table.
pub fn decode_rows(rows: &[Row]) -> Vec<Record> {
    let Some((header, data)) = rows.split_first() else {
        return Vec::new();
    };

    data.iter()
        .filter(|row| !is_blank(row))
        .map(|row| Record::from_row(header, row))
        .collect()
}
