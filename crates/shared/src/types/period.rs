//! Fiscal period labels.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A fiscal period identified by year and month, rendered as `YYYY-MM`.
///
/// Trial balances, intercompany transactions, and consolidation runs are all
/// keyed by period.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    /// Calendar year.
    pub year: i32,
    /// Month within the year (1-12).
    pub month: u32,
}

/// Error parsing a period label.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid period label '{0}', expected YYYY-MM")]
pub struct InvalidPeriod(pub String);

impl Period {
    /// Creates a period, validating the month.
    pub fn new(year: i32, month: u32) -> Result<Self, InvalidPeriod> {
        if !(1..=12).contains(&month) {
            return Err(InvalidPeriod(format!("{year}-{month}")));
        }
        Ok(Self { year, month })
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for Period {
    type Err = InvalidPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| InvalidPeriod(s.to_string()))?;
        let year: i32 = year.parse().map_err(|_| InvalidPeriod(s.to_string()))?;
        let month: u32 = month.parse().map_err(|_| InvalidPeriod(s.to_string()))?;
        Self::new(year, month).map_err(|_| InvalidPeriod(s.to_string()))
    }
}

impl TryFrom<String> for Period {
    type Error = InvalidPeriod;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2024-12", 2024, 12)]
    #[case("2024-01", 2024, 1)]
    #[case("1999-06", 1999, 6)]
    fn test_parse_valid(#[case] label: &str, #[case] year: i32, #[case] month: u32) {
        let period: Period = label.parse().unwrap();
        assert_eq!(period, Period { year, month });
        assert_eq!(period.to_string(), label);
    }

    #[rstest]
    #[case("2024")]
    #[case("2024-13")]
    #[case("2024-00")]
    #[case("dec-2024")]
    fn test_parse_invalid(#[case] label: &str) {
        assert!(label.parse::<Period>().is_err());
    }

    #[test]
    fn test_ordering() {
        let a: Period = "2024-01".parse().unwrap();
        let b: Period = "2024-12".parse().unwrap();
        let c: Period = "2025-01".parse().unwrap();
        assert!(a < b && b < c);
    }
}
