use crate::{AgeGroup, Period};
use serde::{Deserialize, Serialize};

/// One normalized observation: births registered in a region, in a month,
/// for one maternal age bucket.
///
/// The loader guarantees at most one record per (region, period, age_group)
/// combination and a non-negative count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthRecord {
    pub region: String,
    pub period: Period,
    pub age_group: AgeGroup,
    pub count: u32,
}
