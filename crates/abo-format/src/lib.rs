//! Pure text transforms shared by the subscriber exporters and importer.
//!
//! The routing vendor consumes plain ASCII with fixed-width columns, while
//! the database and the spreadsheet extracts carry accented UTF-8, French
//! `dd/mm/yyyy` dates and comma-decimal prices. Everything in this crate is
//! deterministic and side-effect free.

pub mod dates;
pub mod fold;
pub mod repack;

pub use dates::{
    FALLBACK_DATE, date_from_iso, date_to_iso, format_date_fr, naive_iso_to_fr, parse_date_fr,
};
pub use fold::{fold, fold_and_truncate, format_postcode, format_price, parse_price};
pub use repack::{SLOT_WIDTH, repack};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("invalid date `{0}`: expected dd/mm/yyyy")]
    InvalidDate(String),
}

pub type Result<T> = std::result::Result<T, FormatError>;
