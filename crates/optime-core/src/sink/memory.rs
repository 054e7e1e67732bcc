//! In-memory sink
//!
//! Keeps written records and open scopes in memory for assertions. Records
//! below the minimum level are dropped the way a filtering backend would
//! drop them, but every `write` call is still counted.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::level::Level;
use crate::sink::{ErrorInfo, LogSink, Record, ScopeHandle, ScopeState};

/// A record as seen by [`MemorySink`]
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenRecord {
    pub level: Level,
    pub message: String,
    pub template: String,
    pub outcome: &'static str,
    pub elapsed_ms: f64,
    pub exception: Option<ErrorInfo>,
    pub properties: Vec<(String, String)>,
    /// Rendered scopes that were open when the record was written, outermost first
    pub scopes: Vec<String>,
}

#[derive(Debug, Default)]
struct MemoryState {
    records: Vec<WrittenRecord>,
    open_scopes: Vec<(u64, String)>,
    next_scope_id: u64,
    scopes_opened: usize,
    write_calls: usize,
}

/// Sink that keeps everything in memory
#[derive(Debug, Clone)]
pub struct MemorySink {
    min_level: Option<Level>,
    panic_on_write: bool,
    state: Arc<Mutex<MemoryState>>,
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySink {
    /// Sink with every level enabled
    pub fn new() -> Self {
        Self::with_min_level(Level::Trace)
    }

    /// Sink that only accepts records at `min_level` or above
    pub fn with_min_level(min_level: Level) -> Self {
        Self {
            min_level: Some(min_level),
            panic_on_write: false,
            state: Arc::default(),
        }
    }

    /// Sink with every level disabled
    pub fn silent() -> Self {
        Self {
            min_level: None,
            panic_on_write: false,
            state: Arc::default(),
        }
    }

    /// Make every `write` panic after it has been counted
    pub fn panicking(mut self) -> Self {
        self.panic_on_write = true;
        self
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn records(&self) -> Vec<WrittenRecord> {
        self.state().records.clone()
    }

    /// Number of `write` calls, including ones filtered out by level
    pub fn write_calls(&self) -> usize {
        self.state().write_calls
    }

    /// Number of scopes ever opened on this sink
    pub fn scopes_opened(&self) -> usize {
        self.state().scopes_opened
    }

    /// Rendered scopes currently open, outermost first
    pub fn open_scopes(&self) -> Vec<String> {
        self.state()
            .open_scopes
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn clear(&self) {
        let mut state = self.state();
        state.records.clear();
        state.write_calls = 0;
        state.scopes_opened = 0;
    }
}

impl LogSink for MemorySink {
    fn is_enabled(&self, level: Level) -> bool {
        self.min_level.is_some_and(|min| level >= min)
    }

    fn write(&self, record: &Record<'_>) {
        {
            let mut state = self.state();
            state.write_calls += 1;
            if self.is_enabled(record.level) {
                let scopes = state
                    .open_scopes
                    .iter()
                    .map(|(_, text)| text.clone())
                    .collect();
                state.records.push(WrittenRecord {
                    level: record.level,
                    message: record.render(),
                    template: record.template.source().to_string(),
                    outcome: record.outcome,
                    elapsed_ms: record.elapsed_ms,
                    exception: record.exception.cloned(),
                    properties: record
                        .properties()
                        .into_iter()
                        .map(|(name, value)| (name.to_string(), value))
                        .collect(),
                    scopes,
                });
            }
        }
        if self.panic_on_write {
            panic!("memory sink configured to fail on write");
        }
    }

    fn begin_scope(&self, scope: &ScopeState<'_>) -> ScopeHandle {
        let mut state = self.state();
        let id = state.next_scope_id;
        state.next_scope_id += 1;
        state.scopes_opened += 1;
        state.open_scopes.push((id, scope.render()));
        ScopeHandle::new(MemoryScopeGuard {
            id,
            state: Arc::clone(&self.state),
        })
    }
}

struct MemoryScopeGuard {
    id: u64,
    state: Arc<Mutex<MemoryState>>,
}

impl Drop for MemoryScopeGuard {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.open_scopes.retain(|(id, _)| *id != self.id);
    }
}
