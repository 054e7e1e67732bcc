//! optime core - timed operations for structured logging
//!
//! This crate brackets units of work as *operations* and writes one
//! structured record per operation with its outcome and elapsed time:
//! - `Operation` lifecycle: exactly-once emission, cancel, implicit
//!   completion or abandonment on drop
//! - Level-gated `OperationFactory` with warning-threshold escalation
//! - `LogSink` contract with `tracing` and in-memory implementations
//! - Correlation scopes carrying an `OperationId`
//! - Logging bootstrap and test capture
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use optime_core::{op_args, Level, Logger, MemorySink};
//!
//! let sink = MemorySink::new();
//! let logger = Logger::new(sink.clone());
//!
//! let factory = logger.operation_at(Level::Debug, Some(Level::Error), Some(Duration::from_secs(1)));
//! {
//!     let _timed = factory.time("Rebuilding index {Name}", op_args!["users"]);
//!     // work...
//! }
//!
//! assert_eq!(sink.records()[0].outcome, "completed");
//! ```

pub mod clock;
pub mod config;
pub mod errors;
pub mod factory;
pub mod level;
pub mod logger;
pub mod logging_facility;
mod macros;
pub mod operation;
pub mod sink;
pub mod template;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, MonotonicClock, Tick};
pub use config::OperationLevels;
pub use errors::{OpError, OpErrorKind, Result};
pub use factory::OperationFactory;
pub use level::Level;
pub use logger::Logger;
pub use operation::{AttachError, CompletionMode, Operation, OperationResultExt, ScopedOperation};
pub use optime_core_types::OperationId;
pub use sink::{ErrorInfo, LogSink, MemorySink, TracingSink};
pub use template::Arg;
