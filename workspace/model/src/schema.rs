//! Column contract for the source file and the normalized long frame.
//!
//! The source is the CSV export of the monthly region sheet: one row per
//! (year, month, region) with one count column per age bucket. The loader
//! validates this contract up front and normalizes into the long layout.

use crate::AgeGroup;

/// Source column: calendar year.
pub const COL_YEAR: &str = "year";
/// Source column: English month name.
pub const COL_MONTH: &str = "month";
/// Source column: registration region.
pub const COL_REGION: &str = "region";

/// Columns that must be present for a load to succeed. The per-age-group
/// count columns (see [`age_columns`]) are required as well.
pub const REQUIRED_COLUMNS: [&str; 3] = [COL_YEAR, COL_MONTH, COL_REGION];

/// The per-age-bucket count column headers, in bucket order.
pub fn age_columns() -> [&'static str; 4] {
    [
        AgeGroup::Under20.as_str(),
        AgeGroup::From20To29.as_str(),
        AgeGroup::From30To39.as_str(),
        AgeGroup::Over40.as_str(),
    ]
}

// Normalized long-frame columns produced by the loader.

/// Long column: region name.
pub const LONG_REGION: &str = "region";
/// Long column: calendar year.
pub const LONG_YEAR: &str = "year";
/// Long column: month of year, 1-12.
pub const LONG_MONTH: &str = "month";
/// Long column: age bucket label.
pub const LONG_AGE_GROUP: &str = "age_group";
/// Long column: birth count.
pub const LONG_COUNT: &str = "count";
/// Long column: linear month index, the sortable series key.
pub const LONG_PERIOD_INDEX: &str = "period_index";
