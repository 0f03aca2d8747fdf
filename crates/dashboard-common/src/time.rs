//! Forecast time window handling.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DatasetError, DatasetResult};

/// How far ahead of the first forecast timestamp the dashboard looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastSpan {
    #[default]
    Day,
    Week,
    Month,
}

impl ForecastSpan {
    pub const ALL: [ForecastSpan; 3] = [ForecastSpan::Day, ForecastSpan::Week, ForecastSpan::Month];

    /// Length of the span in days.
    pub fn days(&self) -> i64 {
        match self {
            ForecastSpan::Day => 1,
            ForecastSpan::Week => 7,
            ForecastSpan::Month => 30,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::days(self.days())
    }

    /// Capitalised label used in chart titles.
    pub fn label(&self) -> &'static str {
        match self {
            ForecastSpan::Day => "Day",
            ForecastSpan::Week => "Week",
            ForecastSpan::Month => "Month",
        }
    }
}

impl fmt::Display for ForecastSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ForecastSpan {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "1d" => Ok(ForecastSpan::Day),
            "week" | "7d" => Ok(ForecastSpan::Week),
            "month" | "30d" => Ok(ForecastSpan::Month),
            _ => Err(TimeParseError::InvalidSpan(s.to_string())),
        }
    }
}

/// Half-open interval `[start, end)` of forecast valid times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> DatasetResult<Self> {
        if end <= start {
            return Err(DatasetError::InvalidTimeWindow {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { start, end })
    }

    /// Window opening at `start` and lasting one `span`.
    pub fn starting_at(start: DateTime<Utc>, span: ForecastSpan) -> Self {
        Self {
            start,
            end: start + span.duration(),
        }
    }

    /// Window opening at the first timestamp of a time axis.
    pub fn from_first_timestamp(times: &[DateTime<Utc>], span: ForecastSpan) -> DatasetResult<Self> {
        let first = times.first().ok_or(DatasetError::EmptyTimeAxis)?;
        Ok(Self::starting_at(*first, span))
    }

    pub fn contains(&self, t: &DateTime<Utc>) -> bool {
        t >= &self.start && t < &self.end
    }

    /// Indices of the timestamps that fall inside this window.
    pub fn indices(&self, times: &[DateTime<Utc>]) -> Vec<usize> {
        times
            .iter()
            .enumerate()
            .filter(|(_, t)| self.contains(t))
            .map(|(i, _)| i)
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid forecast span '{0}', expected day, week or month")]
    InvalidSpan(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 11, 30, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_span_days() {
        assert_eq!(ForecastSpan::Day.days(), 1);
        assert_eq!(ForecastSpan::Week.days(), 7);
        assert_eq!(ForecastSpan::Month.days(), 30);
    }

    #[test]
    fn test_span_from_str() {
        assert_eq!("Week".parse::<ForecastSpan>().unwrap(), ForecastSpan::Week);
        assert_eq!("month".parse::<ForecastSpan>().unwrap(), ForecastSpan::Month);
        assert!("fortnight".parse::<ForecastSpan>().is_err());
    }

    #[test]
    fn test_window_is_half_open() {
        let window = TimeWindow::starting_at(t0(), ForecastSpan::Week);
        assert!(window.contains(&t0()));
        assert!(window.contains(&(t0() + Duration::hours(167))));
        assert!(!window.contains(&(t0() + Duration::days(7))));
        assert!(!window.contains(&(t0() - Duration::hours(1))));
    }

    #[test]
    fn test_window_rejects_inverted_bounds() {
        assert!(TimeWindow::new(t0(), t0()).is_err());
        assert!(TimeWindow::new(t0(), t0() + Duration::hours(6)).is_ok());
    }

    #[test]
    fn test_window_from_empty_axis() {
        let result = TimeWindow::from_first_timestamp(&[], ForecastSpan::Day);
        assert!(matches!(result, Err(DatasetError::EmptyTimeAxis)));
    }
}
