//! SQLite-backed repository for subscriber records.
//!
//! The store owns a single [`rusqlite::Connection`] in autocommit mode;
//! every statement commits on its own and there are no multi-statement
//! transactions. Dates are persisted as ISO `yyyy-mm-dd` text and read
//! back through the 1900-01-01 fallback boundary of
//! [`abo_format::date_from_iso`].

mod error;
mod schema;
mod store;

pub use error::{Result, StoreError};
pub use store::{CsvExportRow, SubscriberStore};
