//! Entry points for starting operations on a sink

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::{Clock, MonotonicClock};
use crate::config::OperationLevels;
use crate::factory::OperationFactory;
use crate::level::Level;
use crate::operation::{CompletionMode, Operation, ScopedOperation};
use crate::sink::{LogSink, TracingSink};
use crate::template::Arg;

/// Handle pairing a sink with the clock operations are timed against
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
    clock: Arc<dyn Clock>,
}

impl Logger {
    pub fn new<S>(sink: S) -> Self
    where
        S: LogSink + 'static,
    {
        Self::from_arc(Arc::new(sink))
    }

    pub fn from_arc(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            clock: Arc::new(MonotonicClock),
        }
    }

    /// Logger writing through the global `tracing` subscriber
    pub fn tracing() -> Self {
        Self::new(TracingSink)
    }

    /// Replace the clock, mostly for tests
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn sink(&self) -> &Arc<dyn LogSink> {
        &self.sink
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Time a block; dropping the result always records `completed`.
    ///
    /// Uses information for completion and warning for abandonment, without
    /// level gating.
    pub fn time_operation(&self, message_template: &str, args: Vec<Arg>) -> ScopedOperation {
        ScopedOperation::new(Operation::new(
            self,
            message_template,
            args,
            CompletionMode::CompleteOnExit,
            &OperationLevels::default(),
        ))
    }

    /// Begin an operation that must be completed explicitly; dropping it
    /// first records `abandoned`.
    pub fn begin_operation(&self, message_template: &str, args: Vec<Arg>) -> Operation {
        Operation::new(
            self,
            message_template,
            args,
            CompletionMode::AbandonOnExit,
            &OperationLevels::default(),
        )
    }

    /// Configure completion/abandonment levels and an escalation threshold.
    ///
    /// `abandonment` defaults to `completion`. When neither level is enabled
    /// on the sink an inert factory is returned.
    pub fn operation_at(
        &self,
        completion: Level,
        abandonment: Option<Level>,
        warning_threshold: Option<Duration>,
    ) -> OperationFactory {
        OperationFactory::at(self, completion, abandonment, warning_threshold)
    }

    /// Same as [`Logger::operation_at`], from configured levels
    pub fn operation_with(&self, levels: &OperationLevels) -> OperationFactory {
        OperationFactory::from_levels(self, levels)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::tracing()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}
