use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// English month names as they appear in the source spreadsheet.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month in a specific year.
///
/// Periods are totally ordered and form the index of every aggregate series;
/// [`Period::succ`] gives the next month with year rollover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    /// Month of year, 1 through 12.
    pub month: u32,
}

impl Period {
    /// Creates a period, rejecting out-of-range months.
    pub fn new(year: i32, month: u32) -> Option<Period> {
        if (1..=12).contains(&month) {
            Some(Period { year, month })
        } else {
            None
        }
    }

    /// The month immediately after this one.
    pub fn succ(&self) -> Period {
        if self.month == 12 {
            Period {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Period {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Linear month index (`year * 12 + month - 1`), used as the sortable
    /// series key in dataframes.
    pub fn index(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    /// Inverse of [`Period::index`].
    pub fn from_index(index: i64) -> Period {
        Period {
            year: index.div_euclid(12) as i32,
            month: (index.rem_euclid(12) + 1) as u32,
        }
    }

    /// Resolves an English month name (full or three-letter abbreviation,
    /// case-insensitive) to its 1-based number.
    pub fn month_from_name(name: &str) -> Option<u32> {
        let needle = name.trim().to_ascii_lowercase();
        MONTH_NAMES.iter().position(|m| {
            let full = m.to_ascii_lowercase();
            needle == full || (needle.len() == 3 && full.starts_with(&needle))
        }).map(|i| i as u32 + 1)
    }
}

/// English name of a 1-based month number.
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("Unknown")
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Error returned when a string is not a valid `YYYY-MM` period.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid period (expected YYYY-MM): {0}")]
pub struct ParsePeriodError(pub String);

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| ParsePeriodError(s.to_string()))?;
        let year: i32 = year.parse().map_err(|_| ParsePeriodError(s.to_string()))?;
        let month: u32 = month.parse().map_err(|_| ParsePeriodError(s.to_string()))?;
        Period::new(year, month).ok_or_else(|| ParsePeriodError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_succ_rolls_over_year() {
        let dec = Period::new(2023, 12).unwrap();
        assert_eq!(dec.succ(), Period::new(2024, 1).unwrap());
        assert_eq!(Period::new(2023, 5).unwrap().succ(), Period::new(2023, 6).unwrap());
    }

    #[test]
    fn test_index_round_trip() {
        for year in [1999, 2022, 2024] {
            for month in 1..=12 {
                let p = Period::new(year, month).unwrap();
                assert_eq!(Period::from_index(p.index()), p);
            }
        }
    }

    #[test]
    fn test_index_is_strictly_increasing() {
        let mut p = Period::new(2022, 1).unwrap();
        for _ in 0..30 {
            let next = p.succ();
            assert_eq!(next.index(), p.index() + 1);
            p = next;
        }
    }

    #[test]
    fn test_month_from_name() {
        assert_eq!(Period::month_from_name("January"), Some(1));
        assert_eq!(Period::month_from_name("december"), Some(12));
        assert_eq!(Period::month_from_name(" Sep "), Some(9));
        assert_eq!(Period::month_from_name("Smarch"), None);
        assert_eq!(Period::month_from_name(""), None);
    }

    #[test]
    fn test_parse_period_string() {
        assert_eq!("2023-07".parse::<Period>().unwrap(), Period::new(2023, 7).unwrap());
        assert!("2023-13".parse::<Period>().is_err());
        assert!("2023".parse::<Period>().is_err());
        assert!("garbage".parse::<Period>().is_err());
    }

    #[test]
    fn test_invalid_month_rejected() {
        assert!(Period::new(2023, 0).is_none());
        assert!(Period::new(2023, 13).is_none());
    }
}
