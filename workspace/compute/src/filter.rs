//! Filter specification applied to the normalized frame.
//!
//! Mirrors the dashboard controls: a region multiselect, an age-group
//! multiselect, an inclusive period range, and a month-of-year multiselect.
//! An empty selection means "no restriction on that dimension".

use model::schema::{LONG_AGE_GROUP, LONG_MONTH, LONG_PERIOD_INDEX, LONG_REGION};
use model::{AgeGroup, Period};
use polars::prelude::*;

/// A filter over the normalized records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    /// Regions to keep; empty keeps all.
    pub regions: Vec<String>,
    /// Age buckets to keep; empty keeps all.
    pub age_groups: Vec<AgeGroup>,
    /// First period to keep, inclusive.
    pub start: Option<Period>,
    /// Last period to keep, inclusive.
    pub end: Option<Period>,
    /// Months of year (1-12) to keep; empty keeps all.
    pub months: Vec<u32>,
}

impl FilterSpec {
    /// True when no dimension is restricted.
    pub fn is_unrestricted(&self) -> bool {
        self.regions.is_empty()
            && self.age_groups.is_empty()
            && self.start.is_none()
            && self.end.is_none()
            && self.months.is_empty()
    }

    /// Applies the filter lazily.
    pub fn apply(&self, lf: LazyFrame) -> LazyFrame {
        let mut lf = lf;

        if let Some(expr) = any_of(
            self.regions
                .iter()
                .map(|r| col(LONG_REGION).eq(lit(r.as_str()))),
        ) {
            lf = lf.filter(expr);
        }

        if let Some(expr) = any_of(
            self.age_groups
                .iter()
                .map(|g| col(LONG_AGE_GROUP).eq(lit(g.as_str()))),
        ) {
            lf = lf.filter(expr);
        }

        if let Some(expr) = any_of(
            self.months
                .iter()
                .map(|m| col(LONG_MONTH).eq(lit(*m as i32))),
        ) {
            lf = lf.filter(expr);
        }

        if let Some(start) = self.start {
            lf = lf.filter(col(LONG_PERIOD_INDEX).gt_eq(lit(start.index())));
        }
        if let Some(end) = self.end {
            lf = lf.filter(col(LONG_PERIOD_INDEX).lt_eq(lit(end.index())));
        }

        lf
    }
}

/// Disjunction of the given expressions; `None` when the iterator is empty.
fn any_of(exprs: impl IntoIterator<Item = Expr>) -> Option<Expr> {
    exprs.into_iter().reduce(|acc, e| acc.or(e))
}
