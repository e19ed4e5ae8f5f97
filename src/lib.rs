//! `sprintdeck`: 30-day sprint checklist and job tracker.
//!
//! The crate is organized around a small core:
//! - [`catalogue`] holds the static sprint checklist (phases, sections,
//!   items) that every client is tracked against.
//! - [`store`] is the generic record-store boundary (local JSON file or a
//!   hosted HTTP backend) plus the per-table field contract.
//! - [`engine`] owns the in-memory projection and performs all mutations
//!   with write-then-apply semantics.
//! - [`report`] computes progress, critical-path, matrix, and workload
//!   views as pure functions over the projection.
//! - [`cli`] is the `sd` command surface.

pub mod catalogue;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod model;
pub mod report;
pub mod store;
pub mod util;

pub use error::{Result, SprintError};
