#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex as PlMutex;

use sitehours_rust::api::{Loan, LoanId};
use sitehours_rust::notify::{Notifier, NotifyResult};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified, restoring them
/// afterwards (also on unwind). Access to the process-global environment is
/// serialized so parallel tests stay deterministic.
///
/// Each `(key, value)` pair sets the variable to `Some(v)` or removes it
/// with `None`.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    struct Restore(Vec<(String, Option<String>)>);

    impl Drop for Restore {
        fn drop(&mut self) {
            for (key, value) in self.0.drain(..) {
                match value {
                    Some(v) => std::env::set_var(&key, v),
                    None => std::env::remove_var(&key),
                }
            }
        }
    }

    let _lock = ENV_LOCK.lock().expect("ENV_LOCK poisoned");
    let _restore = Restore(
        changes
            .iter()
            .map(|(key, _)| (key.to_string(), std::env::var(key).ok()))
            .collect(),
    );

    for (key, value) in changes {
        match value {
            Some(v) => std::env::set_var(key, v),
            None => std::env::remove_var(key),
        }
    }

    f()
}

/// A notification record: loan id, previous due date, new due date.
pub type NotificationRecord = (Option<LoanId>, NaiveDate, NaiveDate);

/// Notifier that records every dispatch for assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    records: PlMutex<Vec<NotificationRecord>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<NotificationRecord> {
        self.records.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn loan_end_date_updated(
        &self,
        loan: &Loan,
        previous_end_date: NaiveDate,
    ) -> NotifyResult<()> {
        self.records
            .lock()
            .push((loan.id, previous_end_date, loan.end_date));
        Ok(())
    }
}
