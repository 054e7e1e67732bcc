//! Logging sink contract consumed by operations
//!
//! An operation needs three things from the logging backend:
//!
//! - level enablement checks (`is_enabled`)
//! - a synchronous write of one structured record (`write`)
//! - ambient scopes that stay open until their handle is released (`begin_scope`)
//!
//! Two sinks ship with the crate: [`TracingSink`] writes through the
//! `tracing` facade, [`MemorySink`] keeps everything in memory.

pub mod memory;
pub mod tracing_sink;

use std::any::Any;
use std::error::Error;
use std::fmt;

use crate::level::Level;
use crate::template::{Arg, Template};

pub use memory::{MemorySink, WrittenRecord};
pub use tracing_sink::TracingSink;

/// Backend that operations write through
pub trait LogSink: Send + Sync {
    /// Would a record at `level` be observable?
    fn is_enabled(&self, level: Level) -> bool;

    /// Write one record. Panics propagate to the caller of the terminal transition.
    fn write(&self, record: &Record<'_>);

    /// Open an ambient scope that stays active until the handle is released
    fn begin_scope(&self, scope: &ScopeState<'_>) -> ScopeHandle;
}

/// A terminal operation record, handed to [`LogSink::write`]
#[derive(Debug)]
pub struct Record<'a> {
    pub level: Level,
    /// Full template, including the outcome/elapsed suffix
    pub template: &'a Template,
    /// Caller arguments followed by the outcome label and elapsed milliseconds
    pub args: &'a [Arg],
    pub outcome: &'static str,
    pub elapsed_ms: f64,
    pub exception: Option<&'a ErrorInfo>,
}

impl Record<'_> {
    pub fn render(&self) -> String {
        self.template.render(self.args)
    }

    pub fn properties(&self) -> Vec<(&str, String)> {
        self.template.properties(self.args)
    }
}

/// Contents of an ambient scope
#[derive(Debug)]
pub struct ScopeState<'a> {
    pub template: &'a Template,
    pub args: &'a [Arg],
}

impl ScopeState<'_> {
    pub fn render(&self) -> String {
        self.template.render(self.args)
    }

    pub fn properties(&self) -> Vec<(&str, String)> {
        self.template.properties(self.args)
    }
}

/// Owned token for an open scope; the scope closes when the handle is dropped
#[must_use = "dropping a ScopeHandle closes the scope immediately"]
pub struct ScopeHandle {
    guard: Option<Box<dyn Any>>,
}

impl ScopeHandle {
    /// Wrap a guard whose `Drop` closes the scope
    pub fn new<G: 'static>(guard: G) -> Self {
        Self {
            guard: Some(Box::new(guard)),
        }
    }

    /// A handle that holds nothing
    pub fn noop() -> Self {
        Self { guard: None }
    }

    pub fn is_noop(&self) -> bool {
        self.guard.is_none()
    }

    /// Close the scope now
    pub fn release(self) {
        drop(self);
    }
}

impl fmt::Debug for ScopeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeHandle")
            .field("noop", &self.is_noop())
            .finish()
    }
}

/// Snapshot of an error attached to an operation record
///
/// Captured at enrichment time so the original error can keep propagating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    type_name: &'static str,
    message: String,
    sources: Vec<String>,
}

impl ErrorInfo {
    pub fn capture<E>(err: &E) -> Self
    where
        E: Error + ?Sized,
    {
        let mut sources = Vec::new();
        let mut next = err.source();
        while let Some(source) = next {
            sources.push(source.to_string());
            next = source.source();
        }
        Self {
            type_name: std::any::type_name::<E>(),
            message: err.to_string(),
            sources,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name, self.message)?;
        for source in &self.sources {
            write!(f, "; caused by: {}", source)?;
        }
        Ok(())
    }
}
