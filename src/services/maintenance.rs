//! Maintenance job: purge stale opening exceptions.
//!
//! Exceptions whose `end_date` is already in the past can no longer affect
//! any query, so this batch scan drops them from every site. Pure data
//! hygiene — the availability engine is never consulted. Idempotent: a
//! second run over the same data changes nothing.

use chrono::NaiveDate;
use serde::Serialize;

use crate::api::Site;
use crate::db::repository::{FullRepository, RepositoryResult};

/// Outcome of one cleanup run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupStats {
    pub sites_scanned: usize,
    pub sites_changed: usize,
    pub exceptions_removed: usize,
}

fn log_site(action: &str, site: &Site) {
    match serde_json::to_string(site) {
        Ok(data) => log::info!(target: "maintenance", "action={} data={}", action, data),
        Err(e) => log::warn!(target: "maintenance", "action={} (unserializable site: {})", action, e),
    }
}

/// Deletes all past exceptions across every known site.
///
/// An exception is past when `end_date < today`; the surviving entries keep
/// their stored order. Changed sites are persisted and re-indexed.
pub async fn clean_past_exceptions(
    repo: &dyn FullRepository,
    today: NaiveDate,
) -> RepositoryResult<CleanupStats> {
    let mut stats = CleanupStats::default();

    for site in repo.scan_sites().await? {
        stats.sites_scanned += 1;

        let retained: Vec<_> = site
            .opening_exceptions
            .iter()
            .filter(|exception| exception.end_date >= today)
            .cloned()
            .collect();
        let removed = site.opening_exceptions.len() - retained.len();
        if removed == 0 {
            continue;
        }

        log_site("clean_exceptions_before", &site);
        let mut cleaned = site;
        cleaned.opening_exceptions = retained;
        repo.update_site(&cleaned).await?;
        if let Some(id) = cleaned.id {
            repo.index_site(id).await?;
        }
        log_site("clean_exceptions_after", &cleaned);

        stats.sites_changed += 1;
        stats.exceptions_removed += removed;
    }

    Ok(stats)
}
