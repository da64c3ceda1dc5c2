//! Fixed-offset civil-day utilities.
//!
//! All "is this today" decisions in the pipeline are made against one fixed
//! civil timezone (UTC+03:30, the newsroom's), independent of the host
//! process's local timezone. Comparisons are day-granular: both "now" and
//! the item's date are converted to (year, month, day) at the fixed offset
//! and compared as calendar days, never as raw instants. An item published
//! at 23:59 local on day D must stop counting as "today" the moment the
//! fixed-offset clock crosses into day D+1.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};

/// The fixed civil offset, in seconds east of UTC (+03:30).
pub const CIVIL_OFFSET_SECS: i32 = 3 * 3600 + 30 * 60;

/// Returns the fixed civil offset as a chrono timezone.
fn civil_offset() -> FixedOffset {
    // CIVIL_OFFSET_SECS is a constant well inside chrono's +/-24h range.
    FixedOffset::east_opt(CIVIL_OFFSET_SECS).expect("civil offset is in range")
}

/// Returns the civil calendar day of `instant` at the fixed offset.
fn civil_day(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&civil_offset()).date_naive()
}

/// Returns the UTC instant of local midnight for the given civil day.
fn day_start(day: NaiveDate) -> DateTime<Utc> {
    day.and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
        .and_local_timezone(civil_offset())
        .single()
        .expect("fixed offsets are unambiguous")
        .with_timezone(&Utc)
}

// ============================================================================
// Day Windows
// ============================================================================

/// UTC instant of 00:00:00.000 local civil time today.
pub fn today_start() -> DateTime<Utc> {
    today_start_at(Utc::now())
}

/// UTC instant of 23:59:59.999 local civil time today.
pub fn today_end() -> DateTime<Utc> {
    today_end_at(Utc::now())
}

/// UTC instant of local midnight yesterday.
pub fn yesterday_start() -> DateTime<Utc> {
    yesterday_start_at(Utc::now())
}

/// UTC instant of the last millisecond of yesterday.
pub fn yesterday_end() -> DateTime<Utc> {
    yesterday_end_at(Utc::now())
}

/// UTC instant of local midnight for the civil day containing `now`.
pub fn today_start_at(now: DateTime<Utc>) -> DateTime<Utc> {
    day_start(civil_day(now))
}

/// UTC instant of the last millisecond of the civil day containing `now`.
pub fn today_end_at(now: DateTime<Utc>) -> DateTime<Utc> {
    today_start_at(now) + Duration::days(1) - Duration::milliseconds(1)
}

/// UTC instant of local midnight for the civil day before the one
/// containing `now`.
pub fn yesterday_start_at(now: DateTime<Utc>) -> DateTime<Utc> {
    today_start_at(now) - Duration::days(1)
}

/// UTC instant of the last millisecond of the civil day before the one
/// containing `now`.
pub fn yesterday_end_at(now: DateTime<Utc>) -> DateTime<Utc> {
    today_start_at(now) - Duration::milliseconds(1)
}

// ============================================================================
// Feed Date Parsing
// ============================================================================

/// Parses a feed-style date string.
///
/// Feed dates carry their own embedded offset (e.g.
/// `"Wed, 31 Dec 2025 10:01:00 +0330"` or an RFC 3339 timestamp); the
/// result is normalized to UTC. Malformed input yields `None` rather than
/// an error.
pub fn parse_feed_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(s)
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

// ============================================================================
// Day-Granular Comparisons
// ============================================================================

/// Returns true if `pub_date` falls on today's civil day.
pub fn is_today(pub_date: &str) -> bool {
    is_today_at(pub_date, Utc::now())
}

/// Returns true if `pub_date` falls on today's or yesterday's civil day.
pub fn is_today_or_yesterday(pub_date: &str) -> bool {
    is_today_or_yesterday_at(pub_date, Utc::now())
}

/// Returns true if `pub_date` falls within the last `n` civil days
/// (today counts as day 0; future dates never match).
pub fn is_within_last_n_days(pub_date: &str, n: i64) -> bool {
    is_within_last_n_days_at(pub_date, n, Utc::now())
}

/// Day-equality against an explicit "now" (for tests and replay).
pub fn is_today_at(pub_date: &str, now: DateTime<Utc>) -> bool {
    parse_feed_date(pub_date).is_some_and(|date| civil_day(date) == civil_day(now))
}

/// Today-or-yesterday against an explicit "now".
pub fn is_today_or_yesterday_at(pub_date: &str, now: DateTime<Utc>) -> bool {
    let Some(date) = parse_feed_date(pub_date) else {
        return false;
    };
    let item = civil_day(date);
    let today = civil_day(now);
    item == today || item == today - Duration::days(1)
}

/// Last-n-days window against an explicit "now".
pub fn is_within_last_n_days_at(pub_date: &str, n: i64, now: DateTime<Utc>) -> bool {
    let Some(date) = parse_feed_date(pub_date) else {
        return false;
    };
    let age_days = (civil_day(now) - civil_day(date)).num_days();
    (0..=n).contains(&age_days)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_today_start_crosses_utc_day_boundary() {
        // 2025-01-10T20:35Z is already 2025-01-11 00:05 at +03:30, so the
        // civil day starts at 2025-01-10T20:30Z.
        let now = utc(2025, 1, 10, 20, 35, 0);
        assert_eq!(today_start_at(now), utc(2025, 1, 10, 20, 30, 0));

        let end = today_end_at(now);
        assert_eq!(
            end,
            utc(2025, 1, 11, 20, 29, 59) + Duration::milliseconds(999)
        );
    }

    #[test]
    fn test_yesterday_window_abuts_today() {
        let now = utc(2025, 1, 10, 20, 35, 0);
        assert_eq!(yesterday_start_at(now), utc(2025, 1, 9, 20, 30, 0));
        assert_eq!(
            yesterday_end_at(now) + Duration::milliseconds(1),
            today_start_at(now)
        );
    }

    #[test]
    fn test_parse_feed_date_formats() {
        let rfc2822 = parse_feed_date("Wed, 31 Dec 2025 10:01:00 +0330").unwrap();
        assert_eq!(rfc2822, utc(2025, 12, 31, 6, 31, 0));

        let gmt = parse_feed_date("Sun, 04 Jan 2026 07:29:09 GMT").unwrap();
        assert_eq!(gmt, utc(2026, 1, 4, 7, 29, 9));

        let rfc3339 = parse_feed_date("2025-01-10T12:00:00+03:30").unwrap();
        assert_eq!(rfc3339, utc(2025, 1, 10, 8, 30, 0));

        assert!(parse_feed_date("").is_none());
        assert!(parse_feed_date("   ").is_none());
        assert!(parse_feed_date("not a date").is_none());
    }

    #[test]
    fn test_late_evening_item_expires_at_local_midnight() {
        // Item published 23:59:59 local on day D (= 20:29:59Z).
        let item = "Fri, 10 Jan 2025 23:59:59 +0330";

        // One second before local midnight it is still "today".
        let before_midnight = utc(2025, 1, 10, 20, 29, 59);
        assert!(is_today_at(item, before_midnight));

        // One second after the fixed-offset clock reaches day D+1 it is not,
        // regardless of the host timezone.
        let after_midnight = utc(2025, 1, 10, 20, 30, 1);
        assert!(!is_today_at(item, after_midnight));
        assert!(is_today_or_yesterday_at(item, after_midnight));
    }

    #[test]
    fn test_day_comparison_is_calendar_not_instant() {
        // 22:00 local yesterday vs 01:00 local today: less than 24h apart
        // but different civil days.
        let item = "Thu, 09 Jan 2025 22:00:00 +0330";
        let now = utc(2025, 1, 9, 21, 30, 0); // 01:00 local Jan 10
        assert!(!is_today_at(item, now));
        assert!(is_today_or_yesterday_at(item, now));
    }

    #[test]
    fn test_within_last_n_days_window() {
        let now = utc(2025, 1, 10, 12, 0, 0);
        assert!(is_within_last_n_days_at("Fri, 10 Jan 2025 08:00:00 +0330", 3, now));
        assert!(is_within_last_n_days_at("Tue, 07 Jan 2025 08:00:00 +0330", 3, now));
        assert!(!is_within_last_n_days_at("Mon, 06 Jan 2025 08:00:00 +0330", 3, now));
        // Future items are never in the window.
        assert!(!is_within_last_n_days_at("Sun, 12 Jan 2025 08:00:00 +0330", 3, now));
    }
}
