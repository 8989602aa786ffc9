//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.
//! Record types (`Site`, `Loan`, …) already derive Serialize/Deserialize and
//! are re-exported from the api module.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Re-export existing DTOs that are already serializable
pub use crate::api::{
    Loan, LoanId, LoanState, OpeningException, OpeningWeekday, Site, SiteId, SiteInfo, Weekday,
};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Storage backend status
    pub database: String,
}

/// Site list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteListResponse {
    /// List of sites
    pub sites: Vec<SiteInfoDto>,
    /// Total count
    pub total: usize,
}

/// Site info DTO for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteInfoDto {
    /// Site ID
    pub site_id: i64,
    /// Site name
    pub site_name: String,
}

impl From<SiteInfo> for SiteInfoDto {
    fn from(info: SiteInfo) -> Self {
        Self {
            site_id: info.site_id.value(),
            site_name: info.site_name,
        }
    }
}

/// Query parameters for the point-in-time open check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenQuery {
    /// Date to check (ISO `YYYY-MM-DD`)
    pub date: NaiveDate,
}

/// Response for the point-in-time open check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenStatusResponse {
    pub site_id: i64,
    pub date: NaiveDate,
    pub is_open: bool,
}

/// Query parameters for the next-open-date search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextOpenQuery {
    /// Search start date, inclusive (ISO `YYYY-MM-DD`)
    pub from: NaiveDate,
}

/// Response for the next-open-date search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextOpenResponse {
    pub site_id: i64,
    pub from: NaiveDate,
    /// Earliest open date on/after `from`; `null` when no open day exists
    pub next_open: Option<NaiveDate>,
}

/// Loan list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanListResponse {
    /// Active loans
    pub loans: Vec<Loan>,
    /// Total count
    pub total: usize,
}

/// Response for triggering a batch job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunJobResponse {
    /// Job ID for tracking the async run
    pub job_id: String,
    /// Message about the operation
    pub message: String,
}

/// Job status response for async runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusResponse {
    /// Job ID
    pub job_id: String,
    /// Which batch job this run belongs to
    pub kind: crate::services::job_tracker::JobKind,
    /// Job status
    pub status: String,
    /// Log entries
    pub logs: Vec<crate::services::job_tracker::LogEntry>,
    /// Result if completed
    pub result: Option<serde_json::Value>,
}
