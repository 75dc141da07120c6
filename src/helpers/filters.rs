//! Query-parameter parsing into typed filter specifications.

use compute::FilterSpec;
use model::{AgeGroup, Period};

use crate::schemas::{FilterQuery, ForecastQuery};

/// Largest forecast horizon the API accepts, in months.
pub const MAX_FORECAST_HORIZON: usize = 36;
/// Horizon used when the request does not name one.
pub const DEFAULT_FORECAST_HORIZON: usize = 12;

/// Turns the raw query parameters into a typed filter. Returns a
/// client-readable message for malformed values.
pub fn parse_filter_query(query: &FilterQuery) -> Result<FilterSpec, String> {
    let regions = split_list(&query.regions);

    let age_groups = split_list(&query.age_groups)
        .iter()
        .map(|label| {
            label
                .parse::<AgeGroup>()
                .map_err(|_| format!("unknown age group '{label}' (expected one of <20, 20-29, 30-39, 40+)"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let start = parse_period(&query.start, "start")?;
    let end = parse_period(&query.end, "end")?;
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(format!("start {start} is after end {end}"));
        }
    }

    let months = split_list(&query.months)
        .iter()
        .map(|raw| {
            raw.parse::<u32>()
                .ok()
                .filter(|m| (1..=12).contains(m))
                .ok_or_else(|| format!("invalid month of year '{raw}' (expected 1-12)"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FilterSpec {
        regions,
        age_groups,
        start,
        end,
        months,
    })
}

/// Validates the forecast parameters: the filter, the horizon, and the
/// confidence level.
pub fn parse_forecast_query(
    query: &ForecastQuery,
) -> Result<(FilterSpec, usize, Option<f64>), String> {
    let filter = parse_filter_query(&query.filter())?;

    let horizon = query.horizon.map_or(DEFAULT_FORECAST_HORIZON, |h| h as usize);
    if !(1..=MAX_FORECAST_HORIZON).contains(&horizon) {
        return Err(format!(
            "horizon must be between 1 and {MAX_FORECAST_HORIZON} months, got {horizon}"
        ));
    }

    if let Some(confidence) = query.confidence {
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(format!(
                "confidence must be strictly between 0 and 1, got {confidence}"
            ));
        }
    }

    Ok((filter, horizon, query.confidence))
}

fn split_list(raw: &Option<String>) -> Vec<String> {
    raw.as_deref()
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_period(raw: &Option<String>, name: &str) -> Result<Option<Period>, String> {
    raw.as_deref()
        .map(|s| {
            s.parse::<Period>()
                .map_err(|_| format!("invalid {name} period '{s}' (expected YYYY-MM)"))
        })
        .transpose()
}
