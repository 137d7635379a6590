use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

static YEAR_MONTH_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})[-/](\d{1,2})$").expect("year-month regex"));

static YEAR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})$").expect("year regex"));

/// Publication date with optional month and day precision
///
/// A day is only ever present together with a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CitationDate {
    year: i32,
    month: Option<u8>,
    day: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognized date: {0}")]
pub struct DateParseError(pub String);

impl CitationDate {
    pub fn year(year: i32) -> Self {
        Self {
            year,
            month: None,
            day: None,
        }
    }

    /// Month precision; `None` if the month is out of range
    pub fn year_month(year: i32, month: u8) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self {
            year,
            month: Some(month),
            day: None,
        })
    }

    /// Day precision; `None` if the calendar date does not exist
    pub fn ymd(year: i32, month: u8, day: u8) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month.into(), day.into()).map(|_| Self {
            year,
            month: Some(month),
            day: Some(day),
        })
    }

    pub fn get_year(&self) -> i32 {
        self.year
    }

    pub fn get_month(&self) -> Option<u8> {
        self.month
    }

    pub fn get_day(&self) -> Option<u8> {
        self.day
    }

    fn from_naive(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: Some(date.month() as u8),
            day: Some(date.day() as u8),
        }
    }
}

impl FromStr for CitationDate {
    type Err = DateParseError;

    /// Accepts RFC 3339 timestamps, `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY-MM`
    /// and bare `YYYY`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(date_time) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::from_naive(date_time.date_naive()));
        }

        for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
            if let Ok(date_time) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(Self::from_naive(date_time.date()));
            }
        }

        for format in ["%Y-%m-%d", "%Y/%m/%d"] {
            if let Ok(date) = NaiveDate::parse_from_str(s, format) {
                return Ok(Self::from_naive(date));
            }
        }

        if let Some(caps) = YEAR_MONTH_REGEX.captures(s) {
            let year = caps[1].parse::<i32>().map_err(|_| DateParseError(s.to_string()))?;
            let month = caps[2].parse::<u8>().map_err(|_| DateParseError(s.to_string()))?;
            return Self::year_month(year, month).ok_or_else(|| DateParseError(s.to_string()));
        }

        if let Some(caps) = YEAR_REGEX.captures(s) {
            let year = caps[1].parse::<i32>().map_err(|_| DateParseError(s.to_string()))?;
            return Ok(Self::year(year));
        }

        Err(DateParseError(s.to_string()))
    }
}

impl fmt::Display for CitationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.year)?;
        if let Some(month) = self.month {
            write!(f, "-{month:02}")?;
            if let Some(day) = self.day {
                write!(f, "-{day:02}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_formats() {
        let day = CitationDate::ymd(2021, 3, 14).unwrap();
        assert_eq!("2021-03-14".parse(), Ok(day));
        assert_eq!("2021/03/14".parse(), Ok(day));
        assert_eq!("2021-03-14T09:30:00+02:00".parse(), Ok(day));
        assert_eq!("2021-03-14T09:30:00".parse(), Ok(day));
        assert_eq!("2021-03".parse(), Ok(CitationDate::year_month(2021, 3).unwrap()));
        assert_eq!("2021".parse(), Ok(CitationDate::year(2021)));
    }

    #[test]
    fn rejects_garbage_and_impossible_dates() {
        assert!("last tuesday".parse::<CitationDate>().is_err());
        assert!("2021-13".parse::<CitationDate>().is_err());
        assert!("2021-02-30".parse::<CitationDate>().is_err());
        assert!(CitationDate::ymd(2021, 2, 30).is_none());
    }

    #[test]
    fn displays_with_available_precision() {
        assert_eq!(CitationDate::ymd(1999, 1, 2).unwrap().to_string(), "1999-01-02");
        assert_eq!(CitationDate::year_month(1999, 11).unwrap().to_string(), "1999-11");
        assert_eq!(CitationDate::year(1869).to_string(), "1869");
    }
}
