//! Typed domain schema for the births dataset.
//!
//! The source spreadsheet is loosely typed (string month names, one count
//! column per age bucket); this crate is the explicit, validated schema the
//! rest of the workspace works against.

pub mod age_group;
pub mod period;
pub mod record;
pub mod schema;

pub use age_group::AgeGroup;
pub use period::{ParsePeriodError, Period};
pub use record::BirthRecord;
