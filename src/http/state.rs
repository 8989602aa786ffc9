//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::notify::Notifier;
use crate::services::job_tracker::JobTracker;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for storage operations
    pub repository: Arc<dyn FullRepository>,
    /// Notifier for loan due-date changes
    pub notifier: Arc<dyn Notifier>,
    /// Tracker for background batch-job runs
    pub job_tracker: JobTracker,
}

impl AppState {
    /// Create a new application state with the given collaborators.
    pub fn new(repository: Arc<dyn FullRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            repository,
            notifier,
            job_tracker: JobTracker::new(),
        }
    }
}
