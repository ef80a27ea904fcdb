use crate::error::CoreError;
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A calendar month bucket, ordered chronologically.
///
/// Serialized as `"YYYY-MM"`. Only months chrono can represent are
/// constructible, so every bucket has a real first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first_day: NaiveDate,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        if !(1..=12).contains(&month) {
            return Err(CoreError::InvalidInput(
                "month".to_string(),
                format!("{month} is outside 1..=12"),
            ));
        }
        let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            CoreError::InvalidInput("year".to_string(), format!("{year} is out of range"))
        })?;
        Ok(Self { first_day })
    }

    /// Truncates a timestamp to its month.
    pub fn from_datetime(ts: &DateTime<Utc>) -> Self {
        let date = ts.date_naive();
        Self {
            first_day: date - Days::new(u64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    /// First instant of the month, in UTC.
    pub fn start(&self) -> DateTime<Utc> {
        self.first_day.and_time(NaiveTime::default()).and_utc()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidInput("year-month".to_string(), s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2020-01-31T23:59:59Z", 2020, 1)]
    #[case("2020-02-01T00:00:00Z", 2020, 2)]
    #[case("2019-12-15T12:00:00Z", 2019, 12)]
    fn truncates_timestamp_to_month(#[case] ts: &str, #[case] year: i32, #[case] month: u32) {
        let ts: DateTime<Utc> = ts.parse().unwrap();
        let ym = YearMonth::from_datetime(&ts);
        assert_eq!((ym.year(), ym.month()), (year, month));
    }

    #[test]
    fn start_is_first_instant_of_month() {
        let ym = YearMonth::new(2020, 3).unwrap();
        assert_eq!(ym.start(), "2020-03-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn years_outside_the_calendar_are_rejected() {
        let err = YearMonth::new(300_000, 5).unwrap_err();
        assert_eq!(err, CoreError::InvalidInput("year".to_string(), "300000 is out of range".to_string()));
        assert!(serde_json::from_str::<YearMonth>("\"300000-05\"").is_err());
    }

    #[test]
    fn truncation_matches_explicit_construction() {
        let ts: DateTime<Utc> = "2024-02-29T18:30:00Z".parse().unwrap();
        let ym = YearMonth::from_datetime(&ts);
        assert_eq!(ym, YearMonth::new(2024, 2).unwrap());
        assert_eq!(ym.start(), "2024-02-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn orders_chronologically_across_years() {
        let dec = YearMonth::new(2019, 12).unwrap();
        let jan = YearMonth::new(2020, 1).unwrap();
        assert!(dec < jan);
    }

    #[test]
    fn serializes_as_year_dash_month() {
        let ym = YearMonth::new(2020, 2).unwrap();
        assert_eq!(serde_json::to_string(&ym).unwrap(), "\"2020-02\"");
        let back: YearMonth = serde_json::from_str("\"2020-02\"").unwrap();
        assert_eq!(back, ym);
    }

    #[rstest]
    #[case("2020-13")]
    #[case("2020")]
    #[case("abcd-01")]
    #[case("300000-05")]
    #[case("-300000-05")]
    fn rejects_malformed_months(#[case] raw: &str) {
        assert!(raw.parse::<YearMonth>().is_err());
    }
}
