//! CF-convention time coordinate decoding.
//!
//! Time coordinates are stored as offsets from an epoch, described by a
//! `units` attribute such as `"seconds since 1970-01-01T00:00:00"`.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::str::FromStr;

use crate::error::{NetCdfError, NetCdfResult};

/// Offset unit of a CF time coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    fn milliseconds(&self) -> f64 {
        match self {
            TimeUnit::Seconds => 1_000.0,
            TimeUnit::Minutes => 60_000.0,
            TimeUnit::Hours => 3_600_000.0,
            TimeUnit::Days => 86_400_000.0,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "s" | "sec" | "secs" | "second" | "seconds" => Some(TimeUnit::Seconds),
            "min" | "mins" | "minute" | "minutes" => Some(TimeUnit::Minutes),
            "h" | "hr" | "hrs" | "hour" | "hours" => Some(TimeUnit::Hours),
            "d" | "day" | "days" => Some(TimeUnit::Days),
            _ => None,
        }
    }
}

/// Parsed `"<unit> since <epoch>"` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfTimeUnits {
    pub unit: TimeUnit,
    pub epoch: DateTime<Utc>,
}

impl CfTimeUnits {
    /// Convert a raw coordinate value into a UTC timestamp.
    pub fn decode(&self, value: f64) -> NetCdfResult<DateTime<Utc>> {
        if !value.is_finite() {
            return Err(NetCdfError::InvalidFormat(format!(
                "non-finite time value {}",
                value
            )));
        }
        let millis = (value * self.unit.milliseconds()).round();
        let out_of_range =
            || NetCdfError::InvalidFormat(format!("time value {} is out of range", value));
        // `as` saturates, so bound-check before converting.
        if millis.abs() >= i64::MAX as f64 {
            return Err(out_of_range());
        }
        Duration::try_milliseconds(millis as i64)
            .and_then(|offset| self.epoch.checked_add_signed(offset))
            .ok_or_else(out_of_range)
    }

    pub fn decode_all(&self, values: &[f64]) -> NetCdfResult<Vec<DateTime<Utc>>> {
        values.iter().map(|&v| self.decode(v)).collect()
    }

    /// Inverse of [`decode`](Self::decode), used when writing files.
    pub fn encode(&self, time: &DateTime<Utc>) -> f64 {
        (*time - self.epoch).num_milliseconds() as f64 / self.unit.milliseconds()
    }
}

impl FromStr for CfTimeUnits {
    type Err = NetCdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || NetCdfError::InvalidTimeUnits(s.to_string());

        let (unit, epoch) = s.trim().split_once(" since ").ok_or_else(invalid)?;
        let unit = TimeUnit::parse(unit.trim()).ok_or_else(invalid)?;
        let epoch = parse_epoch(epoch.trim()).ok_or_else(invalid)?;

        Ok(Self { unit, epoch })
    }
}

fn parse_epoch(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let trimmed = s
        .trim_end_matches("UTC")
        .trim_end_matches('Z')
        .trim();

    const FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }

    // "2022-11-30 6" style hours, then a bare date.
    if let Some((date, hour)) = trimmed.split_once(' ') {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
        let hour: u32 = hour.parse().ok()?;
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(hour, 0, 0)?));
    }
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cfgrib_units() {
        let units: CfTimeUnits = "seconds since 1970-01-01T00:00:00".parse().unwrap();
        assert_eq!(units.unit, TimeUnit::Seconds);
        assert_eq!(units.epoch, Utc.timestamp_opt(0, 0).unwrap());
    }

    #[test]
    fn test_parse_space_separated_epoch() {
        let units: CfTimeUnits = "hours since 2022-11-30 00:00:00".parse().unwrap();
        assert_eq!(units.unit, TimeUnit::Hours);
        let t = units.decode(6.0).unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2022, 11, 30, 6, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_date_only_epoch() {
        let units: CfTimeUnits = "days since 2022-11-30".parse().unwrap();
        let t = units.decode(1.5).unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2022, 12, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_epoch_with_offset() {
        let units: CfTimeUnits = "minutes since 2022-11-30T00:00:00+00:00".parse().unwrap();
        assert_eq!(units.unit, TimeUnit::Minutes);
        assert_eq!(units.decode(90.0).unwrap(), Utc.with_ymd_and_hms(2022, 11, 30, 1, 30, 0).unwrap());
    }

    #[test]
    fn test_encode_inverts_decode() {
        let units: CfTimeUnits = "seconds since 1970-01-01".parse().unwrap();
        let t = Utc.with_ymd_and_hms(2022, 11, 30, 6, 0, 0).unwrap();
        assert_eq!(units.decode(units.encode(&t)).unwrap(), t);
    }

    #[test]
    fn test_rejects_unknown_units() {
        assert!("fortnights since 2022-11-30".parse::<CfTimeUnits>().is_err());
        assert!("seconds after 2022-11-30".parse::<CfTimeUnits>().is_err());
        assert!("seconds since yesterday".parse::<CfTimeUnits>().is_err());
    }

    #[test]
    fn test_decode_rejects_nan() {
        let units: CfTimeUnits = "seconds since 1970-01-01".parse().unwrap();
        assert!(units.decode(f64::NAN).is_err());
    }

    #[test]
    fn test_decode_rejects_out_of_range() {
        let units: CfTimeUnits = "days since 2022-11-30".parse().unwrap();
        for value in [1e15, -1e15, 1e300] {
            assert!(
                matches!(units.decode(value), Err(NetCdfError::InvalidFormat(_))),
                "{} decoded",
                value
            );
        }
        // Far but representable offsets still decode.
        assert!(units.decode(36_500.0).is_ok());
    }
}
