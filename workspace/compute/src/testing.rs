//! Deterministic fixtures shared by the workspace's tests.

use std::path::PathBuf;

use model::{AgeGroup, BirthRecord, Period};

use crate::dataset::Dataset;

/// Fixture regions, alphabetically sorted; counts grow with the index so the
/// last region is always the busiest.
pub const SAMPLE_REGIONS: [&str; 3] = ["Aberdeen City", "City of Edinburgh", "Glasgow City"];

/// Observed fixture range: 24 months, 2022-01 through 2023-12.
pub const SAMPLE_START: (i32, u32) = (2022, 1);
pub const SAMPLE_MONTHS: usize = 24;

/// The deterministic count for one fixture cell. Counts rise with the region
/// index, peak in the 30-39 bucket, and carry a mild seasonal and yearly
/// drift so forecasts have structure to fit.
pub fn sample_count(region_idx: usize, period: Period, age_group: AgeGroup) -> u32 {
    let age_weight = match age_group {
        AgeGroup::Under20 => 10,
        AgeGroup::From20To29 => 45,
        AgeGroup::From30To39 => 55,
        AgeGroup::Over40 => 15,
    };
    let year_drift = (period.year - SAMPLE_START.0).max(0) as u32;
    40 + 25 * region_idx as u32 + age_weight + 2 * period.month + 3 * year_drift
}

/// All fixture records: 3 regions x 24 months x 4 age groups.
pub fn sample_records() -> Vec<BirthRecord> {
    let mut records = Vec::with_capacity(SAMPLE_REGIONS.len() * SAMPLE_MONTHS * 4);
    for (region_idx, region) in SAMPLE_REGIONS.iter().enumerate() {
        let mut period = Period::new(SAMPLE_START.0, SAMPLE_START.1).unwrap();
        for _ in 0..SAMPLE_MONTHS {
            for age_group in AgeGroup::ALL {
                records.push(BirthRecord {
                    region: region.to_string(),
                    period,
                    age_group,
                    count: sample_count(region_idx, period, age_group),
                });
            }
            period = period.succ();
        }
    }
    records
}

/// The fixture as a loaded dataset.
pub fn sample_dataset() -> Dataset {
    Dataset::from_records(&sample_records()).expect("fixture records are valid")
}

/// The fixture in the wide source-file layout.
pub fn sample_csv() -> String {
    csv_for_months(SAMPLE_MONTHS)
}

/// A wide CSV too short to forecast from (6 observed months).
pub fn short_sample_csv() -> String {
    csv_for_months(6)
}

fn csv_for_months(months: usize) -> String {
    let mut csv = String::from("year,month,region,<20,20-29,30-39,40+\n");
    for (region_idx, region) in SAMPLE_REGIONS.iter().enumerate() {
        let mut period = Period::new(SAMPLE_START.0, SAMPLE_START.1).unwrap();
        for _ in 0..months {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                period.year,
                model::period::month_name(period.month),
                region,
                sample_count(region_idx, period, AgeGroup::Under20),
                sample_count(region_idx, period, AgeGroup::From20To29),
                sample_count(region_idx, period, AgeGroup::From30To39),
                sample_count(region_idx, period, AgeGroup::Over40),
            ));
            period = period.succ();
        }
    }
    csv
}

/// Writes `contents` to a unique temp file and returns its path. Paths are
/// unique per call so concurrently running tests never share a file. Callers
/// remove the file when done.
pub fn write_temp_csv(tag: &str, contents: &str) -> PathBuf {
    use std::sync::atomic::{AtomicU64, Ordering};
    static SEQ: AtomicU64 = AtomicU64::new(0);

    let path = std::env::temp_dir().join(format!(
        "natality-test-{}-{}-{}.csv",
        tag,
        std::process::id(),
        SEQ.fetch_add(1, Ordering::Relaxed)
    ));
    std::fs::write(&path, contents).expect("temp CSV is writable");
    path
}
