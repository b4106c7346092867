use chrono::offset::{LocalResult, Offset};
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

use crate::error::AppError;

/// An IANA timezone used to interpret scope dates and display times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Timezone(Tz);

impl Timezone {
    pub(crate) fn parse(value: &str) -> Result<Self, AppError> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("utc") || trimmed.eq_ignore_ascii_case("z") {
            return Ok(Timezone(chrono_tz::UTC));
        }
        Tz::from_str(trimmed)
            .map(Timezone)
            .map_err(|_| AppError::invalid_scope(trimmed, "unrecognized timezone"))
    }

    pub(crate) fn name(self) -> &'static str {
        self.0.name()
    }

    pub(crate) fn to_local(self, utc: DateTime<Utc>) -> DateTime<Tz> {
        utc.with_timezone(&self.0)
    }

    /// Resolve a wall-clock time in this zone to an absolute instant.
    ///
    /// Ambiguous times (DST fall-back) take the earlier instant. Times inside
    /// a DST gap are read with the offset in effect before the gap.
    pub(crate) fn local_to_utc(self, naive: NaiveDateTime) -> DateTime<Utc> {
        match self.0.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            LocalResult::None => {
                let before = self
                    .0
                    .offset_from_utc_datetime(&(naive - Duration::hours(24)))
                    .fix();
                let utc_naive = naive - Duration::seconds(i64::from(before.local_minus_utc()));
                Utc.from_utc_datetime(&utc_naive)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn parse_utc_variants() {
        for raw in ["utc", "UTC", "z", "Z", "  UTC  "] {
            let tz = Timezone::parse(raw).unwrap();
            assert_eq!(tz.name(), "UTC");
        }
    }

    #[test]
    fn parse_named_timezone() {
        let tz = Timezone::parse("America/New_York").unwrap();
        assert_eq!(tz.name(), "America/New_York");
    }

    #[test]
    fn parse_invalid_timezone_returns_invalid_scope() {
        let err = Timezone::parse("Mars/Olympus").unwrap_err();
        assert!(matches!(err, AppError::InvalidScope { .. }));
        assert!(err.to_string().contains("Mars/Olympus"));
    }

    #[test]
    fn local_to_utc_applies_offset() {
        let tz = Timezone::parse("America/New_York").unwrap();
        // EST is UTC-5 in January
        let utc = tz.local_to_utc(naive(2026, 1, 12, 0, 0));
        assert_eq!(utc.to_rfc3339(), "2026-01-12T05:00:00+00:00");
    }

    #[test]
    fn local_to_utc_ambiguous_takes_earlier() {
        let tz = Timezone::parse("America/New_York").unwrap();
        // 2025-11-02 01:30 happens twice; first occurrence is EDT (UTC-4)
        let utc = tz.local_to_utc(naive(2025, 11, 2, 1, 30));
        assert_eq!(utc.to_rfc3339(), "2025-11-02T05:30:00+00:00");
    }

    #[test]
    fn local_to_utc_gap_uses_offset_before_gap() {
        let tz = Timezone::parse("America/New_York").unwrap();
        // 2025-03-09 02:30 does not exist; read as EST (UTC-5)
        let utc = tz.local_to_utc(naive(2025, 3, 9, 2, 30));
        assert_eq!(utc.to_rfc3339(), "2025-03-09T07:30:00+00:00");
    }

    #[test]
    fn to_local_shifts_time() {
        let tz = Timezone::parse("America/New_York").unwrap();
        let utc = "2026-06-15T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        // EDT is UTC-4 in June
        assert_eq!(tz.to_local(utc).format("%H:%M").to_string(), "08:00");
    }
}
