//! Source-file loading and normalization.
//!
//! The source is the CSV export of the monthly region sheet: one row per
//! (year, month, region) with one count column per maternal age bucket.
//! Loading validates the column contract, parses month names, and melts the
//! wide layout into one normalized record per (region, period, age_group).
//! Malformed rows are dropped with a warning and counted in the
//! [`LoadReport`]; only missing required columns abort the load.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use model::schema::{
    COL_MONTH, COL_REGION, COL_YEAR, LONG_AGE_GROUP, LONG_COUNT, LONG_MONTH, LONG_PERIOD_INDEX,
    LONG_REGION, LONG_YEAR, age_columns,
};
use model::{AgeGroup, BirthRecord, Period};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ComputeError, Result};

/// Outcome counters for a dataset load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Rows present in the source file.
    pub rows_read: usize,
    /// Normalized records kept (one per region, period, age group).
    pub records: usize,
    /// Source rows dropped entirely (unparseable month/year, empty region).
    pub dropped_rows: usize,
    /// Individual count cells dropped (missing, non-numeric, or negative).
    pub dropped_cells: usize,
    /// Records discarded because an earlier row already covered the same
    /// (region, period, age group) combination.
    pub duplicate_records: usize,
}

impl LoadReport {
    /// True when every source cell made it into the normalized frame.
    pub fn is_clean(&self) -> bool {
        self.dropped_rows == 0 && self.dropped_cells == 0 && self.duplicate_records == 0
    }
}

/// The loaded, normalized dataset: a long-format frame plus its load report.
///
/// The frame is read-only after construction; all filtering and aggregation
/// go through [`Dataset::lazy`].
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    report: LoadReport,
}

impl Dataset {
    /// The normalized long-format frame.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// A lazy view over the normalized frame.
    pub fn lazy(&self) -> LazyFrame {
        self.frame.clone().lazy()
    }

    /// Counters from the load that produced this dataset.
    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Number of normalized records.
    pub fn records(&self) -> usize {
        self.frame.height()
    }

    /// Distinct region names, sorted.
    pub fn regions(&self) -> Result<Vec<String>> {
        let col = self.frame.column(LONG_REGION)?.str()?;
        let set: BTreeSet<String> = col.into_iter().flatten().map(str::to_string).collect();
        Ok(set.into_iter().collect())
    }

    /// Builds a dataset directly from normalized records, bypassing the file
    /// format. Used by tests and by callers that already hold typed records.
    pub fn from_records(records: &[BirthRecord]) -> Result<Dataset> {
        let frame = build_long_frame(records)?;
        let report = LoadReport {
            rows_read: records.len(),
            records: records.len(),
            ..LoadReport::default()
        };
        Ok(Dataset { frame, report })
    }
}

/// Reads and normalizes the source CSV at `path`.
///
/// Fails with [`ComputeError::Data`] when a required column is absent;
/// individually malformed rows and cells are skipped with a warning.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    debug!(path = %path.display(), "loading births dataset");

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(200))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .map_err(|e| {
            ComputeError::Data(format!(
                "cannot read {} as a CSV export of the births sheet: {}",
                path.display(),
                e
            ))
        })?;

    validate_columns(&df)?;

    let mut report = LoadReport {
        rows_read: df.height(),
        ..LoadReport::default()
    };

    // Non-strict casts: junk values become nulls and are dropped per row
    // below rather than aborting the whole load.
    let years = df.column(COL_YEAR)?.cast(&DataType::Int64)?;
    let years = years.i64()?;
    let months = df.column(COL_MONTH)?.cast(&DataType::String)?;
    let months = months.str()?;
    let regions = df.column(COL_REGION)?.cast(&DataType::String)?;
    let regions = regions.str()?;

    let age_cols: Vec<_> = age_columns()
        .iter()
        .map(|name| df.column(name).and_then(|c| c.cast(&DataType::Int64)))
        .collect::<std::result::Result<_, _>>()?;

    let mut records: Vec<BirthRecord> = Vec::with_capacity(df.height() * AgeGroup::ALL.len());
    let mut seen: HashSet<(String, i64, AgeGroup)> = HashSet::new();

    for row in 0..df.height() {
        let Some(year) = years.get(row) else {
            warn!(row, "skipping row with missing or non-numeric year");
            report.dropped_rows += 1;
            continue;
        };
        let period = months
            .get(row)
            .and_then(parse_month)
            .and_then(|month| Period::new(year as i32, month));
        let Some(period) = period else {
            warn!(row, month = ?months.get(row), "skipping row with unparseable month");
            report.dropped_rows += 1;
            continue;
        };
        let region = regions.get(row).map(str::trim).unwrap_or_default();
        if region.is_empty() {
            warn!(row, "skipping row with empty region");
            report.dropped_rows += 1;
            continue;
        }

        for (age_group, col) in AgeGroup::ALL.iter().zip(&age_cols) {
            let count = match col.i64()?.get(row) {
                Some(count) if count >= 0 => count as u32,
                Some(count) => {
                    warn!(row, %age_group, count, "dropping negative count cell");
                    report.dropped_cells += 1;
                    continue;
                }
                None => {
                    warn!(row, %age_group, "dropping missing or non-numeric count cell");
                    report.dropped_cells += 1;
                    continue;
                }
            };

            if !seen.insert((region.to_string(), period.index(), *age_group)) {
                warn!(row, region, %period, %age_group, "dropping duplicate record");
                report.duplicate_records += 1;
                continue;
            }

            records.push(BirthRecord {
                region: region.to_string(),
                period,
                age_group: *age_group,
                count,
            });
        }
    }

    report.records = records.len();
    if !report.is_clean() {
        warn!(
            dropped_rows = report.dropped_rows,
            dropped_cells = report.dropped_cells,
            duplicate_records = report.duplicate_records,
            "source file contained malformed data; affected rows were skipped"
        );
    }
    info!(
        path = %path.display(),
        rows_read = report.rows_read,
        records = report.records,
        "births dataset loaded"
    );

    let frame = build_long_frame(&records)?;
    Ok(Dataset { frame, report })
}

/// The normalized records matching `filter`, sorted by region, period, and
/// age bucket.
pub fn filtered_records(
    dataset: &Dataset,
    filter: &crate::filter::FilterSpec,
) -> Result<Vec<BirthRecord>> {
    let df = filter.apply(dataset.lazy()).collect()?;

    let regions = df.column(LONG_REGION)?.str()?;
    let years = df.column(LONG_YEAR)?.i32()?;
    let months = df.column(LONG_MONTH)?.i32()?;
    let age_groups = df.column(LONG_AGE_GROUP)?.str()?;
    let counts = df.column(LONG_COUNT)?.i64()?;

    let mut records = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let (Some(region), Some(year), Some(month), Some(label), Some(count)) = (
            regions.get(row),
            years.get(row),
            months.get(row),
            age_groups.get(row),
            counts.get(row),
        ) else {
            continue;
        };
        let period = Period::new(year, month as u32).ok_or_else(|| {
            ComputeError::Period(format!("normalized frame holds invalid month {month}"))
        })?;
        let age_group = label.parse::<AgeGroup>().map_err(|e| {
            ComputeError::Data(format!("normalized frame holds an unknown age group: {e}"))
        })?;
        records.push(BirthRecord {
            region: region.to_string(),
            period,
            age_group,
            count: count.max(0) as u32,
        });
    }

    records.sort_by(|a, b| {
        (a.region.as_str(), a.period, a.age_group).cmp(&(b.region.as_str(), b.period, b.age_group))
    });
    Ok(records)
}

/// Resolves a month cell: an English name or a numeric month as text.
fn parse_month(raw: &str) -> Option<u32> {
    Period::month_from_name(raw).or_else(|| {
        raw.trim()
            .parse::<u32>()
            .ok()
            .filter(|m| (1..=12).contains(m))
    })
}

fn validate_columns(df: &DataFrame) -> Result<()> {
    let present: HashSet<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
    let mut missing: Vec<&str> = Vec::new();
    for required in model::schema::REQUIRED_COLUMNS {
        if !present.contains(required) {
            missing.push(required);
        }
    }
    for age in age_columns() {
        if !present.contains(age) {
            missing.push(age);
        }
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ComputeError::Data(format!(
            "source file is missing required columns: {}",
            missing.join(", ")
        )))
    }
}

fn build_long_frame(records: &[BirthRecord]) -> Result<DataFrame> {
    let mut regions = Vec::with_capacity(records.len());
    let mut years = Vec::with_capacity(records.len());
    let mut months = Vec::with_capacity(records.len());
    let mut age_groups = Vec::with_capacity(records.len());
    let mut counts = Vec::with_capacity(records.len());
    let mut period_indices = Vec::with_capacity(records.len());

    for record in records {
        regions.push(record.region.clone());
        years.push(record.period.year);
        months.push(record.period.month as i32);
        age_groups.push(record.age_group.as_str());
        counts.push(record.count as i64);
        period_indices.push(record.period.index());
    }

    let df = DataFrame::new(vec![
        Series::new(LONG_REGION.into(), regions).into(),
        Series::new(LONG_YEAR.into(), years).into(),
        Series::new(LONG_MONTH.into(), months).into(),
        Series::new(LONG_AGE_GROUP.into(), age_groups).into(),
        Series::new(LONG_COUNT.into(), counts).into(),
        Series::new(LONG_PERIOD_INDEX.into(), period_indices).into(),
    ])?;

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_csv, sample_records, write_temp_csv};

    #[test]
    fn test_load_clean_file() {
        let path = write_temp_csv("load_clean", &sample_csv());
        let dataset = load_dataset(&path).unwrap();

        let expected = sample_records();
        assert_eq!(dataset.records(), expected.len());
        assert_eq!(dataset.report().rows_read, expected.len() / 4);
        assert!(dataset.report().is_clean());

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_columns_is_fatal() {
        let path = write_temp_csv("load_missing_cols", "year,month,count\n2022,January,5\n");
        let err = load_dataset(&path).unwrap_err();
        match err {
            ComputeError::Data(msg) => {
                assert!(msg.contains("region"), "unexpected message: {msg}");
                assert!(msg.contains("<20"), "unexpected message: {msg}");
            }
            other => panic!("expected Data error, got {other:?}"),
        }
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_bad_rows_are_dropped_not_fatal() {
        let mut csv = String::from("year,month,region,<20,20-29,30-39,40+\n");
        csv.push_str("2022,January,Fife,10,20,30,5\n");
        csv.push_str("2022,Notamonth,Fife,10,20,30,5\n"); // bad month
        csv.push_str("2022,February,,10,20,30,5\n"); // empty region
        csv.push_str("2022,March,Fife,10,oops,30,5\n"); // one bad cell

        let path = write_temp_csv("load_bad_rows", &csv);
        let dataset = load_dataset(&path).unwrap();

        assert_eq!(dataset.report().rows_read, 4);
        assert_eq!(dataset.report().dropped_rows, 2);
        assert_eq!(dataset.report().dropped_cells, 1);
        // Two good rows of four cells, minus the one bad cell.
        assert_eq!(dataset.records(), 7);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_duplicate_rows_keep_first() {
        let mut csv = String::from("year,month,region,<20,20-29,30-39,40+\n");
        csv.push_str("2022,January,Fife,10,20,30,5\n");
        csv.push_str("2022,January,Fife,99,99,99,99\n");

        let path = write_temp_csv("load_duplicates", &csv);
        let dataset = load_dataset(&path).unwrap();

        assert_eq!(dataset.report().duplicate_records, 4);
        assert_eq!(dataset.records(), 4);
        // First row wins.
        let counts = dataset.frame().column(LONG_COUNT).unwrap().i64().unwrap();
        assert_eq!(counts.get(0), Some(10));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_numeric_months_accepted() {
        let csv = "year,month,region,<20,20-29,30-39,40+\n2022,3,Fife,1,2,3,4\n";
        let path = write_temp_csv("load_numeric_month", csv);
        let dataset = load_dataset(&path).unwrap();
        assert!(dataset.report().is_clean());
        assert_eq!(dataset.records(), 4);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_filtered_records_sorted_and_restricted() {
        use crate::filter::FilterSpec;
        use crate::testing::SAMPLE_REGIONS;

        let dataset = crate::testing::sample_dataset();
        let filter = FilterSpec {
            regions: vec![SAMPLE_REGIONS[0].to_string()],
            ..FilterSpec::default()
        };
        let records = filtered_records(&dataset, &filter).unwrap();

        assert_eq!(records.len(), 24 * 4);
        assert!(records.iter().all(|r| r.region == SAMPLE_REGIONS[0]));
        assert!(
            records
                .windows(2)
                .all(|w| (&w[0].region, w[0].period, w[0].age_group)
                    <= (&w[1].region, w[1].period, w[1].age_group))
        );
    }

    #[test]
    fn test_from_records_round_trip() {
        let records = sample_records();
        let dataset = Dataset::from_records(&records).unwrap();
        assert_eq!(dataset.records(), records.len());
        assert_eq!(dataset.regions().unwrap().len(), 3);
    }
}
