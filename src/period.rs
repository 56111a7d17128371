use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use crate::errors::AppError;

/// A calendar month of a given year. `month` is 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    pub month: i16,
    pub year: i16,
}

impl Period {
    pub fn new(month: i16, year: i16) -> Result<Self, AppError> {
        if !(1..=12).contains(&month) {
            return Err(AppError::validation("Month must be between 1 and 12"));
        }
        Ok(Self { month, year })
    }

    /// The period a calendar date falls into.
    pub fn of(date: NaiveDate) -> Result<Self, AppError> {
        let year = i16::try_from(date.year())
            .map_err(|_| AppError::validation(format!("Year {} is out of range", date.year())))?;
        Ok(Self {
            month: date.month() as i16,
            year,
        })
    }

    pub fn current() -> Self {
        let today = Utc::now().date_naive();
        Self {
            month: today.month() as i16,
            year: today.year() as i16,
        }
    }

    /// Half-open date range `[first day, first day of next month)`.
    pub fn bounds(&self) -> Result<(NaiveDate, NaiveDate), AppError> {
        let start = first_of(i32::from(self.year), self.month)?;
        let end = if self.month == 12 {
            first_of(i32::from(self.year) + 1, 1)?
        } else {
            first_of(i32::from(self.year), self.month + 1)?
        };
        Ok((start, end))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.month() as i16 == self.month && date.year() == i32::from(self.year)
    }
}

fn first_of(year: i32, month: i16) -> Result<NaiveDate, AppError> {
    NaiveDate::from_ymd_opt(year, month as u32, 1)
        .ok_or_else(|| AppError::validation(format!("Invalid period {month}/{year}")))
}

/// Parse a calendar date given either as `YYYY-MM-DD` or as an RFC 3339 timestamp.
/// Timestamps keep the calendar date of their own offset.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Serde helper for optional date fields accepting the formats of [`parse_calendar_date`].
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) => parse_calendar_date(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{s}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_period_of_is_one_indexed() {
        let period = Period::of(date(2024, 6, 5)).expect("in range");
        assert_eq!(period, Period { month: 6, year: 2024 });

        let january = Period::of(date(2024, 1, 31)).expect("in range");
        assert_eq!(january.month, 1);
    }

    #[test]
    fn test_new_rejects_month_zero_and_thirteen() {
        assert!(Period::new(0, 2024).is_err());
        assert!(Period::new(13, 2024).is_err());
        assert!(Period::new(12, 2024).is_ok());
    }

    #[test]
    fn test_bounds_mid_year() {
        let (start, end) = Period::new(6, 2024).unwrap().bounds().unwrap();
        assert_eq!(start, date(2024, 6, 1));
        assert_eq!(end, date(2024, 7, 1));
    }

    #[test]
    fn test_bounds_december_rolls_year() {
        let (start, end) = Period::new(12, 2024).unwrap().bounds().unwrap();
        assert_eq!(start, date(2024, 12, 1));
        assert_eq!(end, date(2025, 1, 1));
    }

    #[test]
    fn test_contains() {
        let june = Period::new(6, 2024).unwrap();
        assert!(june.contains(date(2024, 6, 30)));
        assert!(!june.contains(date(2024, 7, 1)));
        assert!(!june.contains(date(2023, 6, 15)));
    }

    #[test]
    fn test_parse_calendar_date_formats() {
        assert_eq!(parse_calendar_date("2024-06-05"), Some(date(2024, 6, 5)));
        assert_eq!(
            parse_calendar_date("2024-06-05T23:30:00+02:00"),
            Some(date(2024, 6, 5))
        );
        assert_eq!(parse_calendar_date("06/05/2024"), None);
        assert_eq!(parse_calendar_date("2024-02-30"), None);
    }
}
