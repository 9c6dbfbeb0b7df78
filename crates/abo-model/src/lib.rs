//! Domain model for the subscriber register.
//!
//! A [`Subscriber`] is plain data plus its invariants; persistence lives in
//! `abo-store` and never leaks into this crate. The [`adapter`] module maps
//! between flat field-name/value pairs (form submissions, import columns)
//! and the entity, driven by the descriptor table in [`fields`].

pub mod adapter;
pub mod fields;
pub mod subscriber;

pub use adapter::{apply_fields, to_fields};
pub use fields::{FieldKey, FieldKind};
pub use subscriber::{Address, ISSUES_IN_A_YEAR, Subscriber};
