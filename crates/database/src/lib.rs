//! # Sales Database Crate
//!
//! This crate is the dashboard's only view of the DuckDB sales file. It
//! hides the SQL and the connection handling behind a small, read-only API.
//!
//! ## Architectural Principles
//!
//! - **Read-only:** the file is opened with `AccessMode::ReadOnly` and every
//!   statement this crate builds is a `SELECT`.
//! - **Parameterized:** platform names are bound as parameters, never spliced
//!   into SQL text. The sales column comes from the closed `Region` enum.
//! - **One connection:** a single long-lived handle, shared behind a mutex and
//!   closed explicitly at shutdown.
//!
//! ## Public API
//!
//! - `SalesStore`: opens, shares and closes the connection.
//! - `SalesRepository`: the dashboard queries, individually or as one `Session`.
//! - `query`: the SQL builders and the ranking thresholds.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod query;
pub mod repository;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixture;

// Re-export the key components to create a clean, public-facing API.
pub use connection::SalesStore;
pub use error::DbError;
pub use query::{CRITIC_REVIEW_THRESHOLD, TOP_N, USER_REVIEW_THRESHOLD};
pub use repository::{SalesRepository, Session};
