//! Weekly opening pattern and exception intervals.
//!
//! These are the value types the availability engine operates on, plus the
//! two pure predicates that combine them. All dates are whole calendar days
//! (`chrono::NaiveDate`); exception bounds are inclusive on both ends.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Named weekday, serialized lowercase on the wire (`"monday"` .. `"sunday"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// All weekdays in calendar order, Monday first.
pub const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
    Weekday::Sunday,
];

impl Weekday {
    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }

    /// Weekday of a calendar date.
    pub fn of(date: NaiveDate) -> Self {
        // num_days_from_monday: Monday = 0 .. Sunday = 6
        ALL_WEEKDAYS[date.weekday().num_days_from_monday() as usize]
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the recurring weekly pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningWeekday {
    pub weekday: Weekday,
    pub is_open: bool,
}

/// A date range overriding the weekly pattern, inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningException {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_open: bool,
}

impl OpeningException {
    /// Whether `date` falls inside this interval (bounds inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Looks up `date`'s weekday in the pattern.
///
/// Precondition: the pattern holds every weekday exactly once (enforced by
/// the validator on every write). A weekday missing from the pattern is a
/// data error, not a runtime input error; it reads as closed here so the
/// engine stays total.
pub fn normally_open(pattern: &[OpeningWeekday], date: NaiveDate) -> bool {
    let weekday = Weekday::of(date);
    pattern
        .iter()
        .find(|entry| entry.weekday == weekday)
        .map(|entry| entry.is_open)
        .unwrap_or(false)
}

/// Returns the open/closed flag of the exception containing `date`, or
/// `None` when no interval contains it.
///
/// `exceptions` must be sorted ascending by `start_date` and non-overlapping
/// (both guaranteed by the write path). The scan stops at the first interval
/// whose `end_date` has not passed: either it contains `date`, or no later
/// interval can.
pub fn exception_status(exceptions: &[OpeningException], date: NaiveDate) -> Option<bool> {
    for exception in exceptions {
        if date <= exception.end_date {
            if exception.start_date <= date {
                return Some(exception.is_open);
            }
            return None;
        }
    }
    None
}

/// Sorts an exception list into the canonical ascending `start_date` order.
pub fn sort_exceptions(exceptions: &mut [OpeningException]) {
    exceptions.sort_by_key(|exception| exception.start_date);
}

#[cfg(test)]
#[path = "calendar_tests.rs"]
mod calendar_tests;
