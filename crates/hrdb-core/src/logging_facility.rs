//! Structured logging facility for hrdb
//!
//! This module provides:
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use hrdb_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```
//!
//! Repository write operations own the start/end/end_error boundary events.
//! Hydration, lookups and DDL helpers log with `tracing::debug!()` only.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
