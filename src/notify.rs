//! Notification port for loan due-date changes.
//!
//! The commitment-extension job announces every rescheduled loan through
//! this trait. The real mailer lives outside this crate; [`LogNotifier`]
//! is the local stand-in that writes to the application log.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::api::Loan;

/// Result type for notification dispatch.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Notification dispatch failure.
#[derive(Debug, Clone, thiserror::Error)]
#[error("notification failed: {message}")]
pub struct NotifyError {
    pub message: String,
}

impl NotifyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Outbound messaging collaborator.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// A loan's due date moved from `previous_end_date` to `loan.end_date`.
    async fn loan_end_date_updated(
        &self,
        loan: &Loan,
        previous_end_date: NaiveDate,
    ) -> NotifyResult<()>;
}

/// Notifier that writes to the application log instead of sending mail.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn loan_end_date_updated(
        &self,
        loan: &Loan,
        previous_end_date: NaiveDate,
    ) -> NotifyResult<()> {
        log::info!(
            "Loan {} for patron {} moved from {} to {}",
            loan.id.map(|id| id.to_string()).unwrap_or_default(),
            loan.patron_id,
            previous_end_date,
            loan.end_date
        );
        Ok(())
    }
}
