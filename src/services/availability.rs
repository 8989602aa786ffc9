//! Availability engine: point-in-time open checks and next-open-date search.
//!
//! Pure and stateless: every function here is a function of the site snapshot
//! and the query date, with no side effects and no blocking, so it is safe to
//! call concurrently from any number of jobs or handlers.
//!
//! Precedence rule: an explicit exception interval always overrides the
//! recurring weekly pattern.

use chrono::{Duration, NaiveDate};

use crate::api::Site;
use crate::models::calendar::{exception_status, normally_open, OpeningWeekday};

/// Fixed search horizon for [`next_open_on_or_after`], in days.
///
/// A valid schedule (at least one open weekday) always answers within seven
/// days of the last relevant exception; an answer past this horizon means the
/// open-weekday invariant was violated by data that bypassed validation.
pub const SEARCH_HORIZON_DAYS: i64 = 365;

/// Engine failure modes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AvailabilityError {
    /// The next open date exists only beyond the fixed search horizon.
    /// Callers must propagate this rather than guess a date.
    #[error("no open day found within {horizon_days} days on or after {start}")]
    SearchExhausted {
        start: NaiveDate,
        horizon_days: i64,
    },
}

/// Whether the site is open on `date`.
///
/// The exception list wins over the weekly pattern; with no containing
/// exception the pattern decides.
pub fn is_open_on(site: &Site, date: NaiveDate) -> bool {
    match exception_status(&site.opening_exceptions, date) {
        Some(exceptionally_open) => exceptionally_open,
        None => normally_open(&site.opening_weekdays, date),
    }
}

/// Smallest date `d >= from` on which the site is open.
///
/// Returns `Ok(Some(d))` for a found date (`from` itself qualifies),
/// `Ok(None)` when the search proves no open day exists (no open weekday and
/// all exceptions exhausted), and `Err(SearchExhausted)` when the only answer
/// lies beyond [`SEARCH_HORIZON_DAYS`].
///
/// The walk advances a cursor through the exception list in ascending order.
/// Gaps between exceptions repeat the weekly pattern, so scanning at most
/// seven consecutive days per gap either finds an ordinary opening or proves
/// the gap has none; closed exceptions move the cursor past their end, and an
/// open exception answers with its first in-range day. Total work is bounded
/// by the exception list length, never by the distance to the answer.
pub fn next_open_on_or_after(
    site: &Site,
    from: NaiveDate,
) -> Result<Option<NaiveDate>, AvailabilityError> {
    let pattern_has_open_day = site.opening_weekdays.iter().any(|entry| entry.is_open);
    let mut cursor = from;

    for exception in site
        .opening_exceptions
        .iter()
        .filter(|exception| exception.end_date >= from)
    {
        if cursor < exception.start_date {
            // Override-free gap before this exception.
            let found = scan_week(
                &site.opening_weekdays,
                cursor,
                Some(exception.start_date),
                pattern_has_open_day,
            );
            if let Some(date) = found {
                return bounded(date, from);
            }
            cursor = exception.start_date;
        }

        if exception.is_open {
            // First in-range day; `from` itself when it falls inside.
            return bounded(cursor, from);
        }

        cursor = next_day(exception.end_date);
    }

    // All exceptions exhausted: one final bounded weekly scan decides.
    match scan_week(&site.opening_weekdays, cursor, None, pattern_has_open_day) {
        Some(date) => bounded(date, from),
        None => Ok(None),
    }
}

/// Scans at most seven consecutive days from `start` (stopping before
/// `limit`, when given) for an ordinary opening. Seven days cover every
/// weekday once, so a miss proves the pattern offers nothing in the range.
fn scan_week(
    pattern: &[OpeningWeekday],
    start: NaiveDate,
    limit: Option<NaiveDate>,
    pattern_has_open_day: bool,
) -> Option<NaiveDate> {
    if !pattern_has_open_day {
        return None;
    }
    let mut date = start;
    for _ in 0..7 {
        if let Some(limit) = limit {
            if date >= limit {
                return None;
            }
        }
        if normally_open(pattern, date) {
            return Some(date);
        }
        date = next_day(date);
    }
    None
}

fn bounded(date: NaiveDate, from: NaiveDate) -> Result<Option<NaiveDate>, AvailabilityError> {
    if date - from >= Duration::days(SEARCH_HORIZON_DAYS) {
        return Err(AvailabilityError::SearchExhausted {
            start: from,
            horizon_days: SEARCH_HORIZON_DAYS,
        });
    }
    Ok(Some(date))
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.succ_opt().expect("calendar date out of supported range")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SiteId;
    use crate::models::calendar::{OpeningException, Weekday, ALL_WEEKDAYS};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn site(closed: &[Weekday], exceptions: Vec<OpeningException>) -> Site {
        Site {
            id: Some(SiteId::new(1)),
            name: "test site".to_string(),
            address: None,
            email: None,
            notes: None,
            opening_weekdays: ALL_WEEKDAYS
                .iter()
                .map(|&weekday| OpeningWeekday {
                    weekday,
                    is_open: !closed.contains(&weekday),
                })
                .collect(),
            opening_exceptions: exceptions,
        }
    }

    fn exception(start: &str, end: &str, is_open: bool) -> OpeningException {
        OpeningException {
            title: None,
            start_date: date(start),
            end_date: date(end),
            is_open,
        }
    }

    #[test]
    fn open_date_answers_itself() {
        let site = site(&[Weekday::Saturday, Weekday::Sunday], vec![]);
        // 2000-01-06 was a Thursday.
        assert_eq!(
            next_open_on_or_after(&site, date("2000-01-06")).unwrap(),
            Some(date("2000-01-06"))
        );
    }

    #[test]
    fn weekend_rolls_to_monday() {
        let site = site(&[Weekday::Saturday, Weekday::Sunday], vec![]);
        assert_eq!(
            next_open_on_or_after(&site, date("2000-02-05")).unwrap(),
            Some(date("2000-02-07"))
        );
    }

    #[test]
    fn exception_overrides_pattern_both_ways() {
        let site = site(
            &[Weekday::Saturday, Weekday::Sunday],
            vec![
                exception("2000-01-05", "2000-01-06", false),
                exception("2000-01-08", "2000-01-09", true),
            ],
        );
        // Wednesday, normally open, exceptionally closed.
        assert!(!is_open_on(&site, date("2000-01-05")));
        // Saturday, normally closed, exceptionally open.
        assert!(is_open_on(&site, date("2000-01-08")));
        // Friday between the two, pattern applies.
        assert!(is_open_on(&site, date("2000-01-07")));
    }

    #[test]
    fn open_exception_answers_inside_closed_run() {
        // Every weekday closed, one future open exception: only the
        // exception can answer, and it does.
        let site = site(
            &ALL_WEEKDAYS,
            vec![exception("2000-01-10", "2000-01-12", true)],
        );
        assert_eq!(
            next_open_on_or_after(&site, date("2000-01-03")).unwrap(),
            Some(date("2000-01-10"))
        );
        // A start date inside the open exception answers itself.
        assert_eq!(
            next_open_on_or_after(&site, date("2000-01-11")).unwrap(),
            Some(date("2000-01-11"))
        );
    }

    #[test]
    fn no_result_when_nothing_can_open() {
        let site = site(
            &ALL_WEEKDAYS,
            vec![
                exception("2000-01-04", "2000-01-05", false),
                exception("2000-01-08", "2000-01-09", true),
            ],
        );
        assert_eq!(
            next_open_on_or_after(&site, date("2000-01-11")).unwrap(),
            None
        );
    }

    #[test]
    fn search_exhausted_past_horizon() {
        // All weekdays closed; the only opening starts more than a year out.
        let site = site(
            &ALL_WEEKDAYS,
            vec![exception("2002-06-01", "2002-06-02", true)],
        );
        let result = next_open_on_or_after(&site, date("2000-01-01"));
        assert!(matches!(
            result,
            Err(AvailabilityError::SearchExhausted { .. })
        ));
    }

    #[test]
    fn long_closure_within_horizon_is_crossed() {
        let site = site(
            &[Weekday::Sunday],
            vec![exception("2000-01-03", "2000-06-30", false)],
        );
        // 2000-07-01 was a Saturday, normally open.
        assert_eq!(
            next_open_on_or_after(&site, date("2000-01-04")).unwrap(),
            Some(date("2000-07-01"))
        );
    }

    #[test]
    fn result_is_a_fixed_point() {
        let site = site(
            &[Weekday::Saturday, Weekday::Sunday],
            vec![exception("2000-01-03", "2000-01-05", false)],
        );
        let first = next_open_on_or_after(&site, date("2000-01-01"))
            .unwrap()
            .unwrap();
        let again = next_open_on_or_after(&site, first).unwrap().unwrap();
        assert_eq!(first, again);
        assert!(is_open_on(&site, first));
    }
}
