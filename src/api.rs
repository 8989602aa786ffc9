//! Public API surface for the Rust backend.
//!
//! This file consolidates the record and DTO types shared by the repository
//! layer, the services and the HTTP API. All types derive
//! Serialize/Deserialize for JSON serialization.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use crate::models::calendar::{
    OpeningException, OpeningWeekday, Weekday, ALL_WEEKDAYS,
};

/// Site identifier (database primary key).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SiteId(pub i64);

/// Loan identifier.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct LoanId(pub i64);

impl SiteId {
    pub fn new(value: i64) -> Self {
        SiteId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl LoanId {
    pub fn new(value: i64) -> Self {
        LoanId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for SiteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for LoanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SiteId> for i64 {
    fn from(id: SiteId) -> Self {
        id.0
    }
}
impl From<LoanId> for i64 {
    fn from(id: LoanId) -> Self {
        id.0
    }
}

/// A physical site with a weekly opening pattern and exception intervals.
///
/// The availability engine consumes sites read-only; only the repository
/// write path (after validation) produces them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Assigned by the repository on store; `None` for new records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SiteId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Recurring weekly pattern, one entry per weekday.
    pub opening_weekdays: Vec<OpeningWeekday>,
    /// Date-range overrides, stored sorted ascending by `start_date`.
    #[serde(default)]
    pub opening_exceptions: Vec<OpeningException>,
}

/// Lifecycle state of a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanState {
    Requested,
    Active,
    Returned,
}

/// A loan with a pickup site and a due date.
///
/// Only the commitment-extension job mutates loans; the availability engine
/// never reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LoanId>,
    pub patron_id: String,
    pub pickup_site_id: SiteId,
    pub state: LoanState,
    /// Due date, whole calendar day.
    pub end_date: NaiveDate,
}

/// Lightweight site listing entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteInfo {
    pub site_id: SiteId,
    pub site_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_id_roundtrip() {
        let id = SiteId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(format!("{}", id), "42");
    }

    #[test]
    fn test_loan_state_wire_format() {
        assert_eq!(
            serde_json::to_string(&LoanState::Active).unwrap(),
            "\"active\""
        );
        let parsed: LoanState = serde_json::from_str("\"returned\"").unwrap();
        assert_eq!(parsed, LoanState::Returned);
    }

    #[test]
    fn test_site_serde_roundtrip() {
        let site = Site {
            id: Some(SiteId::new(1)),
            name: "Central library".to_string(),
            address: None,
            email: Some("desk@example.org".to_string()),
            notes: None,
            opening_weekdays: ALL_WEEKDAYS
                .iter()
                .map(|&weekday| OpeningWeekday {
                    weekday,
                    is_open: true,
                })
                .collect(),
            opening_exceptions: vec![],
        };

        let json = serde_json::to_string(&site).unwrap();
        let back: Site = serde_json::from_str(&json).unwrap();
        assert_eq!(back, site);
        // Absent optionals are omitted from the wire form.
        assert!(!json.contains("address"));
    }
}
