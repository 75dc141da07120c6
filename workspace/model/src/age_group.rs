use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maternal age bucket used by the source spreadsheet.
///
/// The labels match the source column headers exactly, so `FromStr`/`Display`
/// round-trip through the file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "<20")]
    Under20,
    #[serde(rename = "20-29")]
    From20To29,
    #[serde(rename = "30-39")]
    From30To39,
    #[serde(rename = "40+")]
    Over40,
}

impl AgeGroup {
    /// All buckets in ascending age order.
    pub const ALL: [AgeGroup; 4] = [
        AgeGroup::Under20,
        AgeGroup::From20To29,
        AgeGroup::From30To39,
        AgeGroup::Over40,
    ];

    /// The source column header for this bucket.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Under20 => "<20",
            AgeGroup::From20To29 => "20-29",
            AgeGroup::From30To39 => "30-39",
            AgeGroup::Over40 => "40+",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the known age bucket labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown age group label: {0}")]
pub struct ParseAgeGroupError(pub String);

impl FromStr for AgeGroup {
    type Err = ParseAgeGroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<20" => Ok(AgeGroup::Under20),
            "20-29" => Ok(AgeGroup::From20To29),
            "30-39" => Ok(AgeGroup::From30To39),
            "40+" => Ok(AgeGroup::Over40),
            other => Err(ParseAgeGroupError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for group in AgeGroup::ALL {
            assert_eq!(group.as_str().parse::<AgeGroup>().unwrap(), group);
        }
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        assert!("50+".parse::<AgeGroup>().is_err());
        assert!("".parse::<AgeGroup>().is_err());
    }

    #[test]
    fn test_serde_uses_source_labels() {
        let json = serde_json::to_string(&AgeGroup::Under20).unwrap();
        assert_eq!(json, "\"<20\"");
        let back: AgeGroup = serde_json::from_str("\"40+\"").unwrap();
        assert_eq!(back, AgeGroup::Over40);
    }
}
