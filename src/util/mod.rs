//! Shared utilities for `sprintdeck`.
//!
//! Common functionality used across modules:
//! - Token generation (SHA256 -> base36) for job-task ids and local records
//! - Date parsing (`YYYY-MM-DD`, relative `+3d`, keywords)
//! - Saving/busy indicators around store round trips

pub mod id;
pub mod progress;
pub mod time;

pub use id::{TokenConfig, TokenGenerator, compute_token};
pub use time::{parse_date, today};
