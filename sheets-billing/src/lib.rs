//! ISP billing records kept in a Google Sheets spreadsheet.
//!
//! [`api`] moves rows in and out of named ranges, [`store`] maps the five
//! sheets (Users, Customers, Packages, Bills, Payments) onto typed records,
//! and [`cli`] exposes both on the command line.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use store::SheetStore;
