//! Identifier and timestamp generation for new rows

use chrono::{Local, NaiveDate, NaiveDateTime};
use uuid::Uuid;

/// Format of `Created_At` style columns
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format of date-only columns (`Join_Date`, `Due_Date`, `Payment_Date`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A fresh 128-bit random identifier as 32 lowercase hex characters
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Local wall-clock time, second precision
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn format_datetime(at: NaiveDateTime) -> String {
    at.format(DATETIME_FORMAT).to_string()
}

pub fn format_date(day: NaiveDate) -> String {
    day.format(DATE_FORMAT).to_string()
}

/// Parse a date column, accepting a trailing time part
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
                .ok()
                .map(|dt| dt.date())
        })
}

/// Parse a numeric cell; empty or malformed cells are absent
pub fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}
