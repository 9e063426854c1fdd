//! # Video Game Sales Dashboard
//!
//! This crate turns a filter selection into the four dashboard panels. It is
//! the presenter layer: the queries live in `database`, the transport lives in
//! `web-server` and the CLI.
//!
//! ## Architectural Principles
//!
//! - **All or nothing:** a render pass either produces every panel from one
//!   consistent session or fails as a whole. No partial view is ever built.
//! - **Output agnostic:** a `DashboardView` is plain data. It renders to JSON
//!   (serde), SVG (`BarChart`) or terminal tables (`table`).
//!
//! ## Public API
//!
//! - `render_pass`: runs the four queries for a `DashboardFilter`.
//! - `DashboardView` / `Panel`: the result of one pass.
//! - `BarChart`: the per-platform sales chart.
//! - `DashboardError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod chart;
pub mod error;
pub mod table;
pub mod view;

// Re-export the key components to create a clean, public-facing API.
pub use chart::{Bar, BarChart};
pub use error::DashboardError;
pub use view::{render_in_session, render_pass, DashboardView, Panel};

/// Formats a sales figure the way every panel displays it.
pub fn format_sales(value: f64) -> String {
    format!("{value:.2}")
}
