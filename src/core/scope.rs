//! Time scope resolution
//!
//! Turns "default", "YYYY/MM/DD" or "YYYY/MM/DD - YYYY/MM/DD" plus an IANA
//! timezone into an inclusive UTC interval.

use chrono::{
    DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc,
};

use crate::consts::{DEFAULT_SCOPE, SCOPE_DATE_FORMAT};
use crate::error::AppError;
use crate::utils::Timezone;

/// Inclusive UTC interval. `start_utc <= end_utc` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TimeScope {
    start_utc: DateTime<Utc>,
    end_utc: DateTime<Utc>,
    timezone: Timezone,
}

impl TimeScope {
    pub(crate) fn resolve(expr: &str, timezone: &str) -> Result<Self, AppError> {
        Self::resolve_at(expr, timezone, Utc::now())
    }

    pub(crate) fn resolve_at(
        expr: &str,
        timezone: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, AppError> {
        let tz = Timezone::parse(timezone)?;
        let trimmed = expr.trim();

        if trimmed == DEFAULT_SCOPE {
            return Ok(Self::last_full_week(tz, now));
        }

        if let Some((first, last)) = trimmed.split_once(" - ") {
            let first = parse_scope_date(first.trim(), expr)?;
            let last = parse_scope_date(last.trim(), expr)?;
            if first > last {
                return Err(AppError::invalid_scope(
                    expr,
                    "range starts after it ends",
                ));
            }
            return Ok(Self::from_dates(first, last, tz));
        }

        let day = parse_scope_date(trimmed, expr)?;
        Ok(Self::from_dates(day, day, tz))
    }

    /// Monday to Sunday of the last completed local week. Before noon on a
    /// Monday the week before that is used.
    fn last_full_week(tz: Timezone, now: DateTime<Utc>) -> Self {
        let local = tz.to_local(now);
        let mut days_since_monday = i64::from(local.weekday().num_days_from_monday());
        if days_since_monday == 0 && local.hour() < 12 {
            days_since_monday = 7;
        }
        let monday = local.date_naive() - Duration::days(days_since_monday + 7);
        let sunday = monday + Duration::days(6);
        Self::from_dates(monday, sunday, tz)
    }

    fn from_dates(first: NaiveDate, last: NaiveDate, tz: Timezone) -> Self {
        Self {
            start_utc: tz.local_to_utc(day_start(first)),
            end_utc: tz.local_to_utc(day_end(last)),
            timezone: tz,
        }
    }

    pub(crate) fn start_utc(&self) -> DateTime<Utc> {
        self.start_utc
    }

    pub(crate) fn end_utc(&self) -> DateTime<Utc> {
        self.end_utc
    }

    pub(crate) fn timezone(&self) -> Timezone {
        self.timezone
    }

    /// Inclusive at both ends
    pub(crate) fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start_utc <= ts && ts <= self.end_utc
    }

    /// "2026/01/10 00:00 - 2026/01/10 23:59 (UTC)"
    pub(crate) fn display_range(&self) -> String {
        let start = self.timezone.to_local(self.start_utc);
        let end = self.timezone.to_local(self.end_utc);
        format!(
            "{} - {} ({})",
            start.format("%Y/%m/%d %H:%M"),
            end.format("%Y/%m/%d %H:%M"),
            self.timezone.name()
        )
    }
}

fn parse_scope_date(token: &str, expr: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(token, SCOPE_DATE_FORMAT).map_err(|_| {
        AppError::invalid_scope(
            expr,
            "expected \"default\", YYYY/MM/DD or \"YYYY/MM/DD - YYYY/MM/DD\"",
        )
    })
}

// One microsecond past midnight, so an event at exactly midnight on the
// first day is still included.
fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + Duration::microseconds(1)
}

fn day_end(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + Duration::days(1) - Duration::microseconds(1)
}

/// Parse an ISO-8601 timestamp. Values without an offset are taken as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}
