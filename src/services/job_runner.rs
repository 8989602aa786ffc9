//! Async batch-job runners.
//!
//! Wraps the two batch jobs so they can be spawned as background tasks from
//! the HTTP layer, emitting progress logs to the job tracker so operators
//! can follow a run via SSE.

use std::sync::Arc;

use chrono::Utc;

use crate::db::repository::FullRepository;
use crate::notify::Notifier;
use crate::services::extension::extend_active_loans;
use crate::services::job_tracker::{JobTracker, LogLevel};
use crate::services::maintenance::clean_past_exceptions;

/// Run the exception-cleanup job in the background.
///
/// # Returns
/// * Run statistics on success, or error message on failure
pub async fn run_clean_exceptions_async(
    job_id: String,
    tracker: JobTracker,
    repo: Arc<dyn FullRepository>,
) -> Result<crate::services::maintenance::CleanupStats, String> {
    let today = Utc::now().date_naive();
    tracker.log(
        &job_id,
        LogLevel::Info,
        format!("Cleaning exceptions ended before {}...", today),
    );

    match clean_past_exceptions(repo.as_ref(), today).await {
        Ok(stats) => {
            tracker.log(
                &job_id,
                LogLevel::Success,
                format!(
                    "Removed {} exceptions across {} of {} sites",
                    stats.exceptions_removed, stats.sites_changed, stats.sites_scanned
                ),
            );
            tracker.complete_job(&job_id, serde_json::to_value(stats).ok());
            Ok(stats)
        }
        Err(e) => {
            let msg = format!("Exception cleanup failed: {}", e);
            tracker.fail_job(&job_id, &msg);
            Err(msg)
        }
    }
}

/// Run the loan-extension job in the background.
///
/// # Returns
/// * Run statistics on success, or error message on failure
pub async fn run_extend_loans_async(
    job_id: String,
    tracker: JobTracker,
    repo: Arc<dyn FullRepository>,
    notifier: Arc<dyn Notifier>,
) -> Result<crate::services::extension::ExtensionStats, String> {
    tracker.log(&job_id, LogLevel::Info, "Scanning active loans...");

    match extend_active_loans(repo.as_ref(), notifier.as_ref()).await {
        Ok(stats) => {
            tracker.log(
                &job_id,
                LogLevel::Success,
                format!(
                    "Extended {} of {} loans ({} skipped)",
                    stats.loans_extended, stats.loans_scanned, stats.loans_skipped
                ),
            );
            tracker.complete_job(&job_id, serde_json::to_value(stats).ok());
            Ok(stats)
        }
        Err(e) => {
            let msg = format!("Loan extension failed: {}", e);
            tracker.fail_job(&job_id, &msg);
            Err(msg)
        }
    }
}
