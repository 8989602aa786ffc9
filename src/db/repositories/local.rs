//! In-memory repository for unit testing and local development.
//!
//! Records are stored in maps behind `parking_lot` locks; identifiers are
//! assigned from monotonically increasing counters. Index generations are
//! tracked per record so tests can observe that jobs re-index exactly the
//! records they changed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::api::{Loan, LoanId, LoanState, Site, SiteId, SiteInfo};
use crate::db::repository::{
    ErrorContext, FullRepository, LoanRepository, RepositoryError, RepositoryResult,
    SiteRepository,
};

/// In-memory implementation of the repository traits.
pub struct LocalRepository {
    sites: RwLock<HashMap<i64, Site>>,
    loans: RwLock<HashMap<i64, Loan>>,
    site_index: RwLock<HashMap<i64, u64>>,
    loan_index: RwLock<HashMap<i64, u64>>,
    next_site_id: AtomicI64,
    next_loan_id: AtomicI64,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self {
            sites: RwLock::new(HashMap::new()),
            loans: RwLock::new(HashMap::new()),
            site_index: RwLock::new(HashMap::new()),
            loan_index: RwLock::new(HashMap::new()),
            next_site_id: AtomicI64::new(1),
            next_loan_id: AtomicI64::new(1),
        }
    }

    /// How many times a site has been re-indexed. Zero if never.
    pub fn site_index_generation(&self, id: SiteId) -> u64 {
        self.site_index.read().get(&id.value()).copied().unwrap_or(0)
    }

    /// How many times a loan has been re-indexed. Zero if never.
    pub fn loan_index_generation(&self, id: LoanId) -> u64 {
        self.loan_index.read().get(&id.value()).copied().unwrap_or(0)
    }

    fn missing_site(id: SiteId, operation: &str) -> RepositoryError {
        RepositoryError::not_found_with_context(
            format!("Site {} does not exist", id),
            ErrorContext::new(operation)
                .with_entity("site")
                .with_entity_id(id),
        )
    }

    fn missing_loan(id: LoanId, operation: &str) -> RepositoryError {
        RepositoryError::not_found_with_context(
            format!("Loan {} does not exist", id),
            ErrorContext::new(operation)
                .with_entity("loan")
                .with_entity_id(id),
        )
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SiteRepository for LocalRepository {
    async fn store_site(&self, site: &Site) -> RepositoryResult<SiteInfo> {
        let id = self.next_site_id.fetch_add(1, Ordering::SeqCst);
        let mut stored = site.clone();
        stored.id = Some(SiteId::new(id));
        self.sites.write().insert(id, stored);
        Ok(SiteInfo {
            site_id: SiteId::new(id),
            site_name: site.name.clone(),
        })
    }

    async fn update_site(&self, site: &Site) -> RepositoryResult<()> {
        let id = site.id.ok_or_else(|| {
            RepositoryError::validation("Cannot update a site without an id")
        })?;
        let mut sites = self.sites.write();
        if !sites.contains_key(&id.value()) {
            return Err(Self::missing_site(id, "update_site"));
        }
        sites.insert(id.value(), site.clone());
        Ok(())
    }

    async fn get_site(&self, id: SiteId) -> RepositoryResult<Site> {
        self.sites
            .read()
            .get(&id.value())
            .cloned()
            .ok_or_else(|| Self::missing_site(id, "get_site"))
    }

    async fn list_sites(&self) -> RepositoryResult<Vec<SiteInfo>> {
        let mut infos: Vec<SiteInfo> = self
            .sites
            .read()
            .values()
            .map(|site| SiteInfo {
                site_id: site.id.expect("stored sites always carry an id"),
                site_name: site.name.clone(),
            })
            .collect();
        infos.sort_by_key(|info| info.site_id);
        Ok(infos)
    }

    async fn scan_sites(&self) -> RepositoryResult<Vec<Site>> {
        let mut sites: Vec<Site> = self.sites.read().values().cloned().collect();
        sites.sort_by_key(|site| site.id);
        Ok(sites)
    }

    async fn index_site(&self, id: SiteId) -> RepositoryResult<()> {
        if !self.sites.read().contains_key(&id.value()) {
            return Err(Self::missing_site(id, "index_site"));
        }
        *self.site_index.write().entry(id.value()).or_insert(0) += 1;
        Ok(())
    }
}

#[async_trait]
impl LoanRepository for LocalRepository {
    async fn store_loan(&self, loan: &Loan) -> RepositoryResult<Loan> {
        let id = self.next_loan_id.fetch_add(1, Ordering::SeqCst);
        let mut stored = loan.clone();
        stored.id = Some(LoanId::new(id));
        self.loans.write().insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_loan(&self, loan: &Loan) -> RepositoryResult<()> {
        let id = loan.id.ok_or_else(|| {
            RepositoryError::validation("Cannot update a loan without an id")
        })?;
        let mut loans = self.loans.write();
        if !loans.contains_key(&id.value()) {
            return Err(Self::missing_loan(id, "update_loan"));
        }
        loans.insert(id.value(), loan.clone());
        Ok(())
    }

    async fn get_loan(&self, id: LoanId) -> RepositoryResult<Loan> {
        self.loans
            .read()
            .get(&id.value())
            .cloned()
            .ok_or_else(|| Self::missing_loan(id, "get_loan"))
    }

    async fn list_active_loans(&self) -> RepositoryResult<Vec<Loan>> {
        let mut active: Vec<Loan> = self
            .loans
            .read()
            .values()
            .filter(|loan| loan.state == LoanState::Active)
            .cloned()
            .collect();
        active.sort_by_key(|loan| loan.id);
        Ok(active)
    }

    async fn index_loan(&self, id: LoanId) -> RepositoryResult<()> {
        if !self.loans.read().contains_key(&id.value()) {
            return Err(Self::missing_loan(id, "index_loan"));
        }
        *self.loan_index.write().entry(id.value()).or_insert(0) += 1;
        Ok(())
    }
}

#[async_trait]
impl FullRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}
