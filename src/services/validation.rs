//! Write-time validation of site opening schedules.
//!
//! Pure and independently testable: the write path calls [`validate`] before
//! anything is persisted, and any single violation rejects the whole write.
//! The stored model is therefore only ever fully valid or not updated.

use crate::models::calendar::{OpeningException, OpeningWeekday, ALL_WEEKDAYS};

/// A field-scoped validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Record field the violation is scoped to.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

const WEEKDAYS_FIELD: &str = "opening_weekdays";
const EXCEPTIONS_FIELD: &str = "opening_exceptions";

/// Validates a weekly pattern and exception list together.
///
/// Checks, in order, each failing independently:
/// 1. every weekday appears exactly once in the pattern;
/// 2. at least one weekday is open (an always-closed site would make the
///    next-open search non-terminating);
/// 3. every exception has `end_date >= start_date`;
/// 4. sorted by `start_date`, no two exceptions overlap.
///
/// Exception order in the input is irrelevant: overlap is checked on a
/// sorted copy, and the write path stores the sorted form. Overlapping
/// input is rejected, never reordered into acceptance.
pub fn validate(
    pattern: &[OpeningWeekday],
    exceptions: &[OpeningException],
) -> Result<(), ValidationError> {
    validate_pattern(pattern)?;
    validate_exceptions(exceptions)
}

fn validate_pattern(pattern: &[OpeningWeekday]) -> Result<(), ValidationError> {
    let mut seen = [false; 7];
    for entry in pattern {
        let index = ALL_WEEKDAYS
            .iter()
            .position(|&weekday| weekday == entry.weekday)
            .expect("ALL_WEEKDAYS covers every Weekday variant");
        if seen[index] {
            return Err(ValidationError::new(
                WEEKDAYS_FIELD,
                format!("Duplicate weekday: {}.", entry.weekday),
            ));
        }
        seen[index] = true;
    }

    if let Some(index) = seen.iter().position(|&present| !present) {
        return Err(ValidationError::new(
            WEEKDAYS_FIELD,
            format!("Missing weekday: {}.", ALL_WEEKDAYS[index]),
        ));
    }

    if !pattern.iter().any(|entry| entry.is_open) {
        return Err(ValidationError::new(
            WEEKDAYS_FIELD,
            "At least one weekday must be open.",
        ));
    }

    Ok(())
}

fn validate_exceptions(exceptions: &[OpeningException]) -> Result<(), ValidationError> {
    for exception in exceptions {
        if exception.end_date < exception.start_date {
            return Err(ValidationError::new(
                EXCEPTIONS_FIELD,
                format!(
                    "End date {} cannot happen before start date {}.",
                    exception.end_date, exception.start_date
                ),
            ));
        }
    }

    let mut sorted: Vec<&OpeningException> = exceptions.iter().collect();
    sorted.sort_by_key(|exception| exception.start_date);
    for pair in sorted.windows(2) {
        if pair[0].end_date >= pair[1].start_date {
            return Err(ValidationError::new(
                EXCEPTIONS_FIELD,
                format!(
                    "Exceptions must not overlap: [{}, {}] and [{}, {}].",
                    pair[0].start_date, pair[0].end_date, pair[1].start_date, pair[1].end_date
                ),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::calendar::Weekday;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn full_pattern(closed: &[Weekday]) -> Vec<OpeningWeekday> {
        ALL_WEEKDAYS
            .iter()
            .map(|&weekday| OpeningWeekday {
                weekday,
                is_open: !closed.contains(&weekday),
            })
            .collect()
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
    fn accepts_all_open_pattern() {
        assert!(validate(&full_pattern(&[]), &[]).is_ok());
    }

    #[test]
    fn accepts_pattern_in_any_order() {
        let mut pattern = full_pattern(&[Weekday::Sunday]);
        pattern.reverse();
        assert!(validate(&pattern, &[]).is_ok());
    }

    #[test]
    fn rejects_all_closed_pattern() {
        let err = validate(&full_pattern(&ALL_WEEKDAYS), &[]).unwrap_err();
        assert_eq!(err.field, "opening_weekdays");
    }

    #[test]
    fn rejects_missing_weekday() {
        let mut pattern = full_pattern(&[]);
        pattern.pop();
        let err = validate(&pattern, &[]).unwrap_err();
        assert_eq!(err.field, "opening_weekdays");
        assert!(err.message.contains("Missing"));
    }

    #[test]
    fn rejects_duplicate_weekday() {
        let mut pattern = full_pattern(&[]);
        pattern[6] = OpeningWeekday {
            weekday: Weekday::Monday,
            is_open: true,
        };
        let err = validate(&pattern, &[]).unwrap_err();
        assert_eq!(err.field, "opening_weekdays");
        assert!(err.message.contains("Duplicate"));
    }

    #[test]
    fn rejects_inverted_exception_range() {
        let err = validate(
            &full_pattern(&[]),
            &[exception("2000-01-02", "2000-01-01", true)],
        )
        .unwrap_err();
        assert_eq!(err.field, "opening_exceptions");
    }

    #[test]
    fn rejects_overlapping_exceptions_in_any_order() {
        let a = exception("2000-01-01", "2000-01-05", false);
        let b = exception("2000-01-04", "2000-01-08", true);

        for pair in [vec![a.clone(), b.clone()], vec![b, a]] {
            let err = validate(&full_pattern(&[]), &pair).unwrap_err();
            assert_eq!(err.field, "opening_exceptions");
            assert!(err.message.contains("overlap"));
        }
    }

    #[test]
    fn rejects_identical_single_day_exceptions() {
        let ex = exception("2000-01-01", "2000-01-01", false);
        let err = validate(&full_pattern(&[]), &[ex.clone(), ex]).unwrap_err();
        assert_eq!(err.field, "opening_exceptions");
    }

    #[test]
    fn rejects_touching_exceptions() {
        // prev.end_date == next.start_date counts as overlap.
        let err = validate(
            &full_pattern(&[]),
            &[
                exception("2000-01-01", "2000-01-05", false),
                exception("2000-01-05", "2000-01-08", false),
            ],
        )
        .unwrap_err();
        assert_eq!(err.field, "opening_exceptions");
    }

    #[test]
    fn accepts_unsorted_non_overlapping_exceptions() {
        let result = validate(
            &full_pattern(&[Weekday::Saturday, Weekday::Sunday]),
            &[
                exception("2000-01-12", "2000-01-17", true),
                exception("2000-01-07", "2000-01-11", false),
                exception("2000-01-02", "2000-01-04", true),
            ],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn accepts_adjacent_but_disjoint_exceptions() {
        let result = validate(
            &full_pattern(&[]),
            &[
                exception("2000-01-01", "2000-01-05", false),
                exception("2000-01-06", "2000-01-09", true),
            ],
        );
        assert!(result.is_ok());
    }
}
