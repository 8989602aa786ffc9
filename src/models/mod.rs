//! Core value types and record parsing.
//!
//! - [`calendar`]: weekly pattern, exception intervals and the pure
//!   open/closed predicates the availability engine is built on.
//! - [`site`]: JSON parsing of site records with validation and
//!   normalization applied before anything reaches the repository.

pub mod calendar;
pub mod site;

pub use calendar::{
    exception_status, normally_open, sort_exceptions, OpeningException, OpeningWeekday, Weekday,
    ALL_WEEKDAYS,
};
pub use site::parse_site_json_str;
