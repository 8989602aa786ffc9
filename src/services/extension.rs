//! Commitment-extension job: move loan due dates off closed days.
//!
//! For every active loan, asks the availability engine for the next open
//! date of the pickup site on/after the loan's current due date. A loan
//! already due on an open day is untouched, so the job is idempotent.
//! Per-item failures (missing site, exhausted search, unanswerable
//! schedule) are logged and skipped; the batch always continues.

use serde::Serialize;

use crate::api::Loan;
use crate::db::repository::{FullRepository, RepositoryResult};
use crate::notify::Notifier;
use crate::services::availability::next_open_on_or_after;

/// Outcome of one extension run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtensionStats {
    pub loans_scanned: usize,
    pub loans_extended: usize,
    /// Loans skipped over a missing site, an exhausted search or an
    /// unanswerable schedule.
    pub loans_skipped: usize,
}

fn log_loan(action: &str, loan: &Loan) {
    match serde_json::to_string(loan) {
        Ok(data) => log::info!(target: "extension", "action={} data={}", action, data),
        Err(e) => log::warn!(target: "extension", "action={} (unserializable loan: {})", action, e),
    }
}

/// Extends all ongoing loans that would end on a closure.
pub async fn extend_active_loans(
    repo: &dyn FullRepository,
    notifier: &dyn Notifier,
) -> RepositoryResult<ExtensionStats> {
    let mut stats = ExtensionStats::default();

    for loan in repo.list_active_loans().await? {
        stats.loans_scanned += 1;

        let site = match repo.get_site(loan.pickup_site_id).await {
            Ok(site) => site,
            Err(e) if e.is_not_found() => {
                log::warn!(
                    target: "extension",
                    "Skipping loan {:?}: pickup site {} not found",
                    loan.id,
                    loan.pickup_site_id
                );
                stats.loans_skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        let current_end_date = loan.end_date;
        let new_end_date = match next_open_on_or_after(&site, current_end_date) {
            Ok(Some(date)) => date,
            Ok(None) => {
                log::warn!(
                    target: "extension",
                    "Skipping loan {:?}: site {} has no open day on or after {}",
                    loan.id,
                    loan.pickup_site_id,
                    current_end_date
                );
                stats.loans_skipped += 1;
                continue;
            }
            Err(e) => {
                log::error!(
                    target: "extension",
                    "Skipping loan {:?}: {}",
                    loan.id,
                    e
                );
                stats.loans_skipped += 1;
                continue;
            }
        };

        if new_end_date == current_end_date {
            continue;
        }

        log_loan("extend_loan_closure_before", &loan);
        let mut updated = loan;
        updated.end_date = new_end_date;
        repo.update_loan(&updated).await?;
        if let Some(id) = updated.id {
            repo.index_loan(id).await?;
        }
        log_loan("extend_loan_closure_after", &updated);

        if let Err(e) = notifier.loan_end_date_updated(&updated, current_end_date).await {
            // The reschedule is committed; a lost notification is not
            // grounds for aborting the batch.
            log::warn!(target: "extension", "Notification for loan {:?} failed: {}", updated.id, e);
        }

        stats.loans_extended += 1;
    }

    Ok(stats)
}
