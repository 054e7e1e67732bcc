//! Logging bootstrap and test capture for optime
//!
//! This module provides:
//! - Single initialization point via `init(profile)`
//! - A capture layer that records `tracing` events together with the fields
//!   of their enclosing spans, for deterministic assertions in tests
//!
//! # Usage
//!
//! ```rust
//! use optime_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```

pub mod init;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
