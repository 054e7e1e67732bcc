//! Sink that writes through the `tracing` facade
//!
//! Records become events on the `optime` target; scopes become entered
//! spans named `scope`. Entered spans are thread-bound, which is why
//! [`ScopeHandle`] and therefore `Operation` are not `Send`.

use optime_core_types::schema::{
    FIELD_ELAPSED_MS, FIELD_ERROR, FIELD_OPERATION_ID, FIELD_OUTCOME, FIELD_SCOPE, FIELD_SEVERITY,
    PROP_OPERATION_ID,
};
use tracing::field;

use crate::level::Level;
use crate::sink::{LogSink, Record, ScopeHandle, ScopeState};

/// Target used for every event and span emitted by [`TracingSink`]
pub const TARGET: &str = "optime";

/// [`LogSink`] backed by the globally installed `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

// `tracing` callsites need a constant level, so dispatch over all five.
macro_rules! event_at {
    ($level:expr, $($rest:tt)+) => {
        match $level {
            tracing::Level::TRACE => tracing::event!(target: TARGET, tracing::Level::TRACE, $($rest)+),
            tracing::Level::DEBUG => tracing::event!(target: TARGET, tracing::Level::DEBUG, $($rest)+),
            tracing::Level::INFO => tracing::event!(target: TARGET, tracing::Level::INFO, $($rest)+),
            tracing::Level::WARN => tracing::event!(target: TARGET, tracing::Level::WARN, $($rest)+),
            _ => tracing::event!(target: TARGET, tracing::Level::ERROR, $($rest)+),
        }
    };
}

impl LogSink for TracingSink {
    fn is_enabled(&self, level: Level) -> bool {
        match level.to_tracing() {
            tracing::Level::TRACE => tracing::enabled!(target: TARGET, tracing::Level::TRACE),
            tracing::Level::DEBUG => tracing::enabled!(target: TARGET, tracing::Level::DEBUG),
            tracing::Level::INFO => tracing::enabled!(target: TARGET, tracing::Level::INFO),
            tracing::Level::WARN => tracing::enabled!(target: TARGET, tracing::Level::WARN),
            _ => tracing::enabled!(target: TARGET, tracing::Level::ERROR),
        }
    }

    fn write(&self, record: &Record<'_>) {
        let message = record.render();
        let error = record.exception.map(field::display);
        event_at!(
            record.level.to_tracing(),
            { FIELD_SEVERITY } = %record.level,
            { FIELD_OUTCOME } = record.outcome,
            { FIELD_ELAPSED_MS } = record.elapsed_ms,
            { FIELD_ERROR } = error,
            "{}",
            message
        );
    }

    fn begin_scope(&self, scope: &ScopeState<'_>) -> ScopeHandle {
        // Scopes are not level-filtered; ERROR keeps the span enabled under any filter.
        let span = tracing::span!(
            target: TARGET,
            tracing::Level::ERROR,
            "scope",
            { FIELD_SCOPE } = %scope.render(),
            { FIELD_OPERATION_ID } = field::Empty,
        );
        for (name, value) in scope.properties() {
            if name == PROP_OPERATION_ID {
                span.record(FIELD_OPERATION_ID, value.as_str());
            }
        }
        tracing::trace!(target: TARGET, "scope opened");
        ScopeHandle::new(span.entered())
    }
}
