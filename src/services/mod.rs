//! Service layer for business logic and orchestration.
//!
//! The availability engine and the schedule validator are pure; the two
//! batch jobs orchestrate repository and notifier calls around them.

pub mod availability;

pub mod extension;

#[cfg(feature = "http-server")]
pub mod job_runner;

#[cfg(feature = "http-server")]
pub mod job_tracker;

pub mod maintenance;

pub mod validation;

pub use availability::{
    is_open_on, next_open_on_or_after, AvailabilityError, SEARCH_HORIZON_DAYS,
};
pub use extension::{extend_active_loans, ExtensionStats};
pub use maintenance::{clean_past_exceptions, CleanupStats};
pub use validation::{validate, ValidationError};
