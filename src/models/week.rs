//! ISO-8601 week anchors used to detect weekly rollover.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag for an ISO calendar week, formatted `YYYY-Www` (e.g. `2026-W42`).
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekAnchor(String);

impl WeekAnchor {
    /// Anchor of the ISO week containing `date`. The year is the ISO week-year,
    /// which differs from the calendar year around New Year.
    pub fn for_date(date: NaiveDate) -> Self {
        let week = date.iso_week();
        Self(format!("{:04}-W{:02}", week.year(), week.week()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Shorthand for [`WeekAnchor::for_date`] returning the plain tag.
pub fn week_anchor(date: NaiveDate) -> String {
    WeekAnchor::for_date(date).0
}

/// Anchor string did not look like `YYYY-Www` (years below 1000 are zero padded).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvalidWeekAnchor(pub String);

impl fmt::Display for InvalidWeekAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid week anchor: {:?}", self.0)
    }
}

impl std::error::Error for InvalidWeekAnchor {}

impl FromStr for WeekAnchor {
    type Err = InvalidWeekAnchor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidWeekAnchor(s.to_string());
        let (year, week) = s.split_once("-W").ok_or_else(invalid)?;
        if week.len() != 2 {
            return Err(invalid());
        }
        // Only the canonical spelling `for_date` produces is accepted.
        let year_num: i32 = year.parse().map_err(|_| invalid())?;
        if format!("{:04}", year_num) != year {
            return Err(invalid());
        }
        let week: u32 = week.parse().map_err(|_| invalid())?;
        if !(1..=53).contains(&week) {
            return Err(invalid());
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for WeekAnchor {
    type Error = InvalidWeekAnchor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeekAnchor> for String {
    fn from(anchor: WeekAnchor) -> Self {
        anchor.0
    }
}

impl fmt::Display for WeekAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn mid_year_dates_use_calendar_year() {
        assert_eq!(week_anchor(date(2024, 6, 12)), "2024-W24");
        assert_eq!(week_anchor(date(2026, 10, 16)), "2026-W42");
    }

    #[test]
    fn single_digit_weeks_are_zero_padded() {
        assert_eq!(week_anchor(date(2024, 1, 1)), "2024-W01");
        assert_eq!(week_anchor(date(2023, 2, 6)), "2023-W06");
    }

    #[test]
    fn dec_31_can_belong_to_week_one_of_next_year() {
        // 2024-12-31 is a Tuesday; the week's Thursday is 2025-01-02.
        assert_eq!(week_anchor(date(2024, 12, 31)), "2025-W01");
        // 2019-12-30 is a Monday.
        assert_eq!(week_anchor(date(2019, 12, 30)), "2020-W01");
    }

    #[test]
    fn jan_1_can_belong_to_last_week_of_previous_year() {
        // 2021-01-01 is a Friday, 2020 has 53 ISO weeks.
        assert_eq!(week_anchor(date(2021, 1, 1)), "2020-W53");
        // 2022-01-01 is a Saturday, 2021 has 52 ISO weeks.
        assert_eq!(week_anchor(date(2022, 1, 1)), "2021-W52");
        assert_eq!(week_anchor(date(2027, 1, 3)), "2026-W53");
    }

    #[test]
    fn week_starts_on_monday() {
        // Sunday and the following Monday land in different weeks.
        assert_eq!(week_anchor(date(2026, 10, 18)), "2026-W42");
        assert_eq!(week_anchor(date(2026, 10, 19)), "2026-W43");
        assert_eq!(week_anchor(date(2026, 10, 12)), "2026-W42");
    }

    #[test]
    fn parse_accepts_generated_tags_and_rejects_garbage() {
        let anchor = WeekAnchor::for_date(date(2020, 12, 31));
        assert_eq!(anchor.as_str().parse::<WeekAnchor>().unwrap(), anchor);
        assert!("2024-W00".parse::<WeekAnchor>().is_err());
        assert!("2024-W54".parse::<WeekAnchor>().is_err());
        assert!("2024W10".parse::<WeekAnchor>().is_err());
        assert!("24-W10".parse::<WeekAnchor>().is_err());
        assert!("2024-W1".parse::<WeekAnchor>().is_err());
    }

    #[test]
    fn years_outside_four_digits_round_trip() {
        for d in [date(999, 6, 1), date(12, 3, 4), date(10_000, 1, 10)] {
            let anchor = WeekAnchor::for_date(d);
            assert_eq!(anchor.as_str().parse::<WeekAnchor>().unwrap(), anchor);
        }
        assert_eq!(week_anchor(date(999, 6, 1)), "0999-W22");
        assert!("999-W22".parse::<WeekAnchor>().is_err());
        assert!("+2024-W10".parse::<WeekAnchor>().is_err());
    }

    #[test]
    fn serde_uses_plain_string() {
        let anchor = WeekAnchor::for_date(date(2024, 6, 12));
        let json = serde_json::to_string(&anchor).unwrap();
        assert_eq!(json, "\"2024-W24\"");
        assert!(serde_json::from_str::<WeekAnchor>("\"nope\"").is_err());
    }
}
