//! High-level service functions over the repository traits.
//!
//! These are the write and read paths the HTTP handlers and jobs use. Every
//! site write goes through the schedule validator and stores the exception
//! list in canonical sorted order; the stored model is only ever fully valid
//! or not updated.

use crate::api::{Loan, LoanId, Site, SiteId, SiteInfo};
use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::calendar::sort_exceptions;
use crate::services::validation::validate;

/// Validate, normalize and insert a new site record.
pub async fn store_site(repo: &dyn FullRepository, site: &Site) -> RepositoryResult<SiteInfo> {
    let normalized = validated_site(site)?;
    let info = repo.store_site(&normalized).await?;
    repo.index_site(info.site_id).await?;
    log::info!("Stored site {} ({})", info.site_id, info.site_name);
    Ok(info)
}

/// Validate, normalize and replace an existing site record.
pub async fn update_site(repo: &dyn FullRepository, site: &Site) -> RepositoryResult<()> {
    let normalized = validated_site(site)?;
    repo.update_site(&normalized).await?;
    if let Some(id) = normalized.id {
        repo.index_site(id).await?;
    }
    Ok(())
}

/// Fetch a site by identifier.
pub async fn get_site(repo: &dyn FullRepository, id: SiteId) -> RepositoryResult<Site> {
    repo.get_site(id).await
}

/// Lightweight listing of all sites.
pub async fn list_sites(repo: &dyn FullRepository) -> RepositoryResult<Vec<SiteInfo>> {
    repo.list_sites().await
}

/// Insert a new loan record.
pub async fn store_loan(repo: &dyn FullRepository, loan: &Loan) -> RepositoryResult<Loan> {
    let stored = repo.store_loan(loan).await?;
    if let Some(id) = stored.id {
        repo.index_loan(id).await?;
    }
    Ok(stored)
}

/// Fetch a loan by identifier.
pub async fn get_loan(repo: &dyn FullRepository, id: LoanId) -> RepositoryResult<Loan> {
    repo.get_loan(id).await
}

/// All loans currently active.
pub async fn list_active_loans(repo: &dyn FullRepository) -> RepositoryResult<Vec<Loan>> {
    repo.list_active_loans().await
}

/// Whether the backend is reachable.
pub async fn health_check(repo: &dyn FullRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}

fn validated_site(site: &Site) -> RepositoryResult<Site> {
    validate(&site.opening_weekdays, &site.opening_exceptions)?;
    let mut normalized = site.clone();
    sort_exceptions(&mut normalized.opening_exceptions);
    Ok(normalized)
}
