//! Derived aggregates over the filtered dataset.
//!
//! These back the dashboard views: totals by region/age group/year, the
//! month-of-year profile, the region x month heatmap, and the monthly series
//! the forecaster consumes.

use std::collections::HashMap;

use model::schema::{LONG_AGE_GROUP, LONG_COUNT, LONG_MONTH, LONG_PERIOD_INDEX, LONG_REGION, LONG_YEAR};
use model::{AgeGroup, Period};
use polars::prelude::*;

use crate::dataset::Dataset;
use crate::error::{ComputeError, Result};
use crate::filter::FilterSpec;

const TOTAL: &str = "total";
const MONTHLY_TOTAL: &str = "monthly_total";
const MEAN: &str = "mean";

/// Total births for one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionTotal {
    pub region: String,
    pub total: u64,
}

/// Total births for one age bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeGroupTotal {
    pub age_group: AgeGroup,
    pub total: u64,
}

/// Total births for one calendar year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearTotal {
    pub year: i32,
    pub total: u64,
}

/// Mean monthly births for one month of the year, averaged over the
/// (region, month) totals the filter selects.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthOfYearMean {
    /// Month of year, 1-12.
    pub month: u32,
    pub mean: f64,
}

/// One heatmap row: a region's mean monthly births per month of year.
/// `means[0]` is January; `None` marks months with no selected data.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapRow {
    pub region: String,
    pub means: Vec<Option<f64>>,
}

/// Ordered monthly totals, the forecasting input.
///
/// Construction enforces the series invariant: periods strictly increasing
/// and contiguous, with months absent from the selection filled with zero.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSeries {
    points: Vec<(Period, f64)>,
}

impl AggregateSeries {
    /// Wraps validated points; rejects out-of-order or gapped periods.
    pub fn new(points: Vec<(Period, f64)>) -> Result<AggregateSeries> {
        for pair in points.windows(2) {
            if pair[1].0.index() != pair[0].0.index() + 1 {
                return Err(ComputeError::Period(format!(
                    "series periods must be contiguous and increasing: {} is followed by {}",
                    pair[0].0, pair[1].0
                )));
            }
        }
        Ok(AggregateSeries { points })
    }

    pub fn points(&self) -> &[(Period, f64)] {
        &self.points
    }

    /// The values alone, in period order.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, v)| *v).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_period(&self) -> Option<Period> {
        self.points.last().map(|(p, _)| *p)
    }
}

/// Total births per region, sorted by region name.
pub fn totals_by_region(dataset: &Dataset, filter: &FilterSpec) -> Result<Vec<RegionTotal>> {
    let df = filter
        .apply(dataset.lazy())
        .group_by([col(LONG_REGION)])
        .agg([col(LONG_COUNT).sum().alias(TOTAL)])
        .sort([LONG_REGION], SortMultipleOptions::default())
        .collect()?;

    let regions = df.column(LONG_REGION)?.str()?;
    let totals = df.column(TOTAL)?.i64()?;

    let mut out = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        if let (Some(region), Some(total)) = (regions.get(i), totals.get(i)) {
            out.push(RegionTotal {
                region: region.to_string(),
                total: total.max(0) as u64,
            });
        }
    }
    Ok(out)
}

/// Total births per age bucket, in ascending bucket order.
pub fn totals_by_age_group(dataset: &Dataset, filter: &FilterSpec) -> Result<Vec<AgeGroupTotal>> {
    let df = filter
        .apply(dataset.lazy())
        .group_by([col(LONG_AGE_GROUP)])
        .agg([col(LONG_COUNT).sum().alias(TOTAL)])
        .collect()?;

    let labels = df.column(LONG_AGE_GROUP)?.str()?;
    let totals = df.column(TOTAL)?.i64()?;

    let mut by_group: HashMap<AgeGroup, u64> = HashMap::new();
    for i in 0..df.height() {
        if let (Some(label), Some(total)) = (labels.get(i), totals.get(i)) {
            let group = label.parse::<AgeGroup>().map_err(|e| {
                ComputeError::Data(format!("normalized frame holds an unknown age group: {e}"))
            })?;
            by_group.insert(group, total.max(0) as u64);
        }
    }

    Ok(AgeGroup::ALL
        .iter()
        .filter_map(|group| {
            by_group.get(group).map(|total| AgeGroupTotal {
                age_group: *group,
                total: *total,
            })
        })
        .collect())
}

/// Total births per calendar year, sorted by year.
pub fn totals_by_year(dataset: &Dataset, filter: &FilterSpec) -> Result<Vec<YearTotal>> {
    let df = filter
        .apply(dataset.lazy())
        .group_by([col(LONG_YEAR)])
        .agg([col(LONG_COUNT).sum().alias(TOTAL)])
        .sort([LONG_YEAR], SortMultipleOptions::default())
        .collect()?;

    let years = df.column(LONG_YEAR)?.i32()?;
    let totals = df.column(TOTAL)?.i64()?;

    let mut out = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        if let (Some(year), Some(total)) = (years.get(i), totals.get(i)) {
            out.push(YearTotal {
                year,
                total: total.max(0) as u64,
            });
        }
    }
    Ok(out)
}

/// Mean births per month of year.
///
/// Averaged over (region, period) monthly totals so every region-month
/// contributes one observation, matching the dashboard's "average births per
/// month" view. Months with no selected data are omitted.
pub fn mean_by_month_of_year(dataset: &Dataset, filter: &FilterSpec) -> Result<Vec<MonthOfYearMean>> {
    let df = monthly_totals(dataset, filter)
        .group_by([col(LONG_MONTH)])
        .agg([col(MONTHLY_TOTAL).mean().alias(MEAN)])
        .sort([LONG_MONTH], SortMultipleOptions::default())
        .collect()?;

    let months = df.column(LONG_MONTH)?.i32()?;
    let means = df.column(MEAN)?.f64()?;

    let mut out = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        if let (Some(month), Some(mean)) = (months.get(i), means.get(i)) {
            out.push(MonthOfYearMean {
                month: month as u32,
                mean,
            });
        }
    }
    Ok(out)
}

/// Region x month-of-year matrix of mean monthly births, one row per region
/// sorted by name.
pub fn region_month_matrix(dataset: &Dataset, filter: &FilterSpec) -> Result<Vec<HeatmapRow>> {
    let df = monthly_totals(dataset, filter)
        .group_by([col(LONG_REGION), col(LONG_MONTH)])
        .agg([col(MONTHLY_TOTAL).mean().alias(MEAN)])
        .sort([LONG_REGION, LONG_MONTH], SortMultipleOptions::default())
        .collect()?;

    let regions = df.column(LONG_REGION)?.str()?;
    let months = df.column(LONG_MONTH)?.i32()?;
    let means = df.column(MEAN)?.f64()?;

    let mut rows: Vec<HeatmapRow> = Vec::new();
    for i in 0..df.height() {
        let (Some(region), Some(month), Some(mean)) = (regions.get(i), months.get(i), means.get(i))
        else {
            continue;
        };
        if rows.last().map(|r| r.region.as_str()) != Some(region) {
            rows.push(HeatmapRow {
                region: region.to_string(),
                means: vec![None; 12],
            });
        }
        if let Some(row) = rows.last_mut() {
            if (1..=12).contains(&month) {
                row.means[month as usize - 1] = Some(mean);
            }
        }
    }
    Ok(rows)
}

/// Mean monthly births per region, averaged across regions.
///
/// Nested mean, matching the dashboard KPI: each region's (region, period)
/// monthly totals are averaged first, then those per-region means are
/// averaged. `None` when the selection is empty.
pub fn mean_monthly_births_per_region(
    dataset: &Dataset,
    filter: &FilterSpec,
) -> Result<Option<f64>> {
    let df = monthly_totals(dataset, filter)
        .group_by([col(LONG_REGION)])
        .agg([col(MONTHLY_TOTAL).mean().alias(MEAN)])
        .collect()?;

    let means = df.column(MEAN)?.f64()?;
    let mut sum = 0.0;
    let mut regions = 0usize;
    for i in 0..df.height() {
        if let Some(mean) = means.get(i) {
            sum += mean;
            regions += 1;
        }
    }
    Ok((regions > 0).then(|| sum / regions as f64))
}

/// The monthly totals series for the selection.
///
/// Spans the observed period range of the filtered data; months inside that
/// range with no records contribute zero, keeping the series contiguous.
pub fn monthly_series(dataset: &Dataset, filter: &FilterSpec) -> Result<AggregateSeries> {
    let df = filter
        .apply(dataset.lazy())
        .group_by([col(LONG_PERIOD_INDEX)])
        .agg([col(LONG_COUNT).sum().alias(TOTAL)])
        .sort([LONG_PERIOD_INDEX], SortMultipleOptions::default())
        .collect()?;

    let indices = df.column(LONG_PERIOD_INDEX)?.i64()?;
    let totals = df.column(TOTAL)?.i64()?;

    let mut observed: HashMap<i64, f64> = HashMap::with_capacity(df.height());
    let mut first: Option<i64> = None;
    let mut last: Option<i64> = None;
    for i in 0..df.height() {
        if let (Some(index), Some(total)) = (indices.get(i), totals.get(i)) {
            observed.insert(index, total.max(0) as f64);
            first = Some(first.map_or(index, |f: i64| f.min(index)));
            last = Some(last.map_or(index, |l: i64| l.max(index)));
        }
    }

    let (Some(first), Some(last)) = (first, last) else {
        return AggregateSeries::new(Vec::new());
    };

    let points = (first..=last)
        .map(|index| {
            (
                Period::from_index(index),
                observed.get(&index).copied().unwrap_or(0.0),
            )
        })
        .collect();
    AggregateSeries::new(points)
}

/// Shared first stage: one total per (region, period) under the filter.
fn monthly_totals(dataset: &Dataset, filter: &FilterSpec) -> LazyFrame {
    filter
        .apply(dataset.lazy())
        .group_by([col(LONG_REGION), col(LONG_PERIOD_INDEX), col(LONG_MONTH)])
        .agg([col(LONG_COUNT).sum().alias(MONTHLY_TOTAL)])
}
