//! # Sitehours Rust Backend
//!
//! Opening-hours and loan due-date engine for physical sites.
//!
//! This crate answers two questions about a site with a recurring weekly
//! open/closed pattern and a list of date-range exception intervals: is the
//! site open on a given calendar date, and what is the earliest date on or
//! after a given date on which it is open. Those answers drive the two batch
//! jobs shipped here: purging stale exceptions and extending loans whose due
//! date would land on a closed day. The backend exposes a REST API via Axum.
//!
//! ## Features
//!
//! - **Schedule Model**: weekly patterns and inclusive exception intervals
//! - **Availability Engine**: point-in-time open checks and bounded
//!   next-open-date search
//! - **Validation**: all-or-nothing schedule validation at every write
//! - **Batch Jobs**: exception cleanup and loan extension with job tracking
//! - **HTTP API**: RESTful endpoints for schedules, queries and job runs
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: record and DTO types shared across layers
//! - [`models`]: calendar value types, predicates and record parsing
//! - [`services`]: availability engine, validator and batch jobs
//! - [`db`]: repository pattern and persistence layer
//! - [`notify`]: outbound notification port
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! The engine itself is pure and stateless; everything that suspends —
//! storage, indexing, notification — sits behind the `db` and `notify`
//! ports.

pub mod api;

pub mod db;
pub mod models;

pub mod notify;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
