//! Repository trait definitions — the storage/indexing port of the core.
//!
//! The availability engine never talks to storage; jobs and HTTP handlers do,
//! and only through these traits. Implementations commit the underlying write
//! first and make the index update observable afterwards; the explicit
//! `index_*` methods mirror that two-step flow so batch jobs can re-index
//! exactly the records they changed.

mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;

use crate::api::{Loan, LoanId, Site, SiteId, SiteInfo};

/// Storage operations for site records.
#[async_trait]
pub trait SiteRepository: Send + Sync {
    /// Insert a new site and assign its identifier.
    async fn store_site(&self, site: &Site) -> RepositoryResult<SiteInfo>;

    /// Replace an existing site record wholesale.
    async fn update_site(&self, site: &Site) -> RepositoryResult<()>;

    /// Fetch a site by identifier.
    async fn get_site(&self, id: SiteId) -> RepositoryResult<Site>;

    /// Lightweight listing of all sites.
    async fn list_sites(&self) -> RepositoryResult<Vec<SiteInfo>>;

    /// Full records of all sites, for batch scans.
    async fn scan_sites(&self) -> RepositoryResult<Vec<Site>>;

    /// Re-index a site after a committed write.
    async fn index_site(&self, id: SiteId) -> RepositoryResult<()>;
}

/// Storage operations for loan records.
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// Insert a new loan and assign its identifier.
    async fn store_loan(&self, loan: &Loan) -> RepositoryResult<Loan>;

    /// Replace an existing loan record wholesale.
    async fn update_loan(&self, loan: &Loan) -> RepositoryResult<()>;

    /// Fetch a loan by identifier.
    async fn get_loan(&self, id: LoanId) -> RepositoryResult<Loan>;

    /// All loans currently in the active state, for batch scans.
    async fn list_active_loans(&self) -> RepositoryResult<Vec<Loan>>;

    /// Re-index a loan after a committed write.
    async fn index_loan(&self, id: LoanId) -> RepositoryResult<()>;
}

/// Combined repository interface used by application state and jobs.
#[async_trait]
pub trait FullRepository: SiteRepository + LoanRepository {
    /// Whether the backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
