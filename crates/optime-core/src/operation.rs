//! Timed operations
//!
//! An [`Operation`] brackets a unit of work. It opens a correlation scope
//! carrying a fresh [`OperationId`], starts a monotonic timer, and writes
//! exactly one record when it reaches a terminal transition:
//!
//! - `complete()` / `complete_with(..)` write outcome `completed`
//! - `abandon()` writes outcome `abandoned`
//! - `cancel()` writes nothing
//! - dropping the operation applies its [`CompletionMode`]
//!
//! Every transition after the first is a no-op.
//!
//! # Example
//!
//! ```
//! use optime_core::{op_args, Logger, MemorySink};
//!
//! let sink = MemorySink::new();
//! let logger = Logger::new(sink.clone());
//!
//! let mut op = logger.begin_operation("Loading {Count} rows", op_args![10]);
//! // ... work ...
//! op.complete();
//! drop(op);
//!
//! let records = sink.records();
//! assert_eq!(records.len(), 1);
//! assert!(records[0].message.starts_with("Loading 10 rows completed in "));
//! ```

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use optime_core_types::schema::{
    COMPLETION_SUFFIX, OPERATION_SCOPE_TEMPLATE, OUTCOME_ABANDONED, OUTCOME_COMPLETED,
};
use optime_core_types::OperationId;

use crate::clock::{Clock, Tick};
use crate::config::OperationLevels;
use crate::errors::{OpError, Result};
use crate::level::Level;
use crate::logger::Logger;
use crate::sink::{ErrorInfo, LogSink, Record, ScopeHandle, ScopeState};
use crate::template::{Arg, Millis, Template};

/// What dropping a still-active operation does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionMode {
    /// Nothing; the operation already reached a terminal state or was canceled
    Silent,
    /// Record `completed`
    CompleteOnExit,
    /// Record `abandoned`
    AbandonOnExit,
}

/// A timed unit of work bound to a logging sink
///
/// Operations are either live or inert. Inert operations come from a gated
/// [`OperationFactory`](crate::OperationFactory) whose levels are all
/// disabled: they never read the clock, never open a scope and never touch
/// the sink.
#[must_use = "dropping an Operation immediately ends it"]
#[derive(Debug)]
pub struct Operation {
    inner: Inner,
}

#[derive(Debug)]
enum Inner {
    Live(Box<LiveOperation>),
    Inert,
}

struct LiveOperation {
    sink: Arc<dyn LogSink>,
    clock: Arc<dyn Clock>,
    id: OperationId,
    template: Template,
    args: Vec<Arg>,
    start: Tick,
    stop: Option<Tick>,
    mode: CompletionMode,
    completion_level: Level,
    abandonment_level: Level,
    warning_threshold: Option<Duration>,
    exception: Option<ErrorInfo>,
    scope: Option<ScopeHandle>,
}

impl std::fmt::Debug for LiveOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveOperation")
            .field("id", &self.id)
            .field("template", &self.template.source())
            .field("mode", &self.mode)
            .field("start", &self.start)
            .field("stop", &self.stop)
            .finish_non_exhaustive()
    }
}

impl Operation {
    /// Start a live operation.
    ///
    /// Never fails: arguments are fitted to the template's holes, so a
    /// mismatched call site still produces a readable record.
    pub(crate) fn new(
        logger: &Logger,
        message_template: &str,
        args: Vec<Arg>,
        mode: CompletionMode,
        levels: &OperationLevels,
    ) -> Self {
        let caller = Template::parse(message_template);
        if caller.hole_count() != args.len() {
            tracing::debug!(
                template = message_template,
                holes = caller.hole_count(),
                args = args.len(),
                "operation argument count does not match template"
            );
        }
        let args = caller.fit_args(args);
        let template = caller.append(Template::parse(COMPLETION_SUFFIX));

        let sink = Arc::clone(logger.sink());
        let clock = Arc::clone(logger.clock());
        let id = OperationId::new();

        let scope_template = Template::parse(OPERATION_SCOPE_TEMPLATE);
        let scope_args = vec![Arg::new(id.clone())];
        let scope = sink.begin_scope(&ScopeState {
            template: &scope_template,
            args: &scope_args,
        });

        tracing::trace!(operation_id = %id, ?mode, "operation started");

        // Timer starts after the scope is open so setup cost is not measured.
        let start = clock.now();

        Self {
            inner: Inner::Live(Box::new(LiveOperation {
                sink,
                clock,
                id,
                template,
                args,
                start,
                stop: None,
                mode,
                completion_level: levels.completion,
                abandonment_level: levels.abandonment,
                warning_threshold: levels.warning_threshold,
                exception: None,
                scope: Some(scope),
            })),
        }
    }

    /// The operation handed out when no configured level is enabled
    pub const fn inert() -> Self {
        Self { inner: Inner::Inert }
    }

    pub fn is_inert(&self) -> bool {
        matches!(self.inner, Inner::Inert)
    }

    /// Correlation identifier pushed into the sink's scope; `None` when inert
    pub fn operation_id(&self) -> Option<&OperationId> {
        match &self.inner {
            Inner::Live(live) => Some(&live.id),
            Inner::Inert => None,
        }
    }

    pub fn completion_mode(&self) -> CompletionMode {
        match &self.inner {
            Inner::Live(live) => live.mode,
            Inner::Inert => CompletionMode::Silent,
        }
    }

    /// Time since the operation started, frozen once it ends. Never negative.
    pub fn elapsed(&self) -> Duration {
        match &self.inner {
            Inner::Live(live) => live.elapsed(),
            Inner::Inert => Duration::ZERO,
        }
    }

    /// Record the operation as `completed` at the completion level
    pub fn complete(&mut self) {
        if let Inner::Live(live) = &mut self.inner {
            live.complete(None);
        }
    }

    /// Record the operation as `completed`, with a result scope open while the record is written
    ///
    /// `result_label` is a message template rendered against `result_args`.
    /// A label without holes that is given arguments names a property
    /// instead: `complete_with("Rows", op_args![12])` opens `"Rows: {Rows}"`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `result_label` is empty, even when the
    /// operation has already ended.
    pub fn complete_with(&mut self, result_label: &str, result_args: Vec<Arg>) -> Result<()> {
        if result_label.is_empty() {
            return Err(OpError::invalid_argument(
                "result_label",
                "result label must not be empty",
            ));
        }
        if let Inner::Live(live) = &mut self.inner {
            let template = match Template::parse(result_label) {
                t if t.hole_count() == 0 && !result_args.is_empty() => {
                    Template::property(result_label)
                }
                t => t,
            };
            live.complete(Some((&template, &result_args)));
        }
        Ok(())
    }

    /// Record the operation as `abandoned` at the abandonment level
    pub fn abandon(&mut self) {
        if let Inner::Live(live) = &mut self.inner {
            live.abandon();
        }
    }

    /// Attach `error` and record the operation as `abandoned`
    pub fn abandon_with<E>(&mut self, error: &E)
    where
        E: Error + ?Sized,
    {
        self.set_exception(error).abandon();
    }

    /// End the operation without writing anything
    pub fn cancel(&mut self) {
        if let Inner::Live(live) = &mut self.inner {
            live.mode = CompletionMode::Silent;
            if let Some(scope) = live.scope.take() {
                scope.release();
            }
        }
    }

    /// Attach an error to the record this operation will write
    pub fn set_exception<E>(&mut self, error: &E) -> &mut Self
    where
        E: Error + ?Sized,
    {
        if !self.is_inert() {
            self.attach_error(ErrorInfo::capture(error));
        }
        self
    }

    /// Attach an error and return `false`, for use as a match guard
    ///
    /// ```
    /// # use optime_core::{op_args, Logger, MemorySink};
    /// # let logger = Logger::new(MemorySink::new());
    /// let mut op = logger.begin_operation("Parse", op_args![]);
    /// let parsed = match "x1".parse::<u32>() {
    ///     Err(e) if op.set_exception_and_continue(&e) => unreachable!(),
    ///     other => other,
    /// };
    /// assert!(parsed.is_err());
    /// ```
    pub fn set_exception_and_continue<E>(&mut self, error: &E) -> bool
    where
        E: Error + ?Sized,
    {
        self.set_exception(error);
        false
    }

    fn implicit_exit(&mut self) {
        match self.completion_mode() {
            CompletionMode::Silent => {}
            CompletionMode::AbandonOnExit => self.abandon(),
            CompletionMode::CompleteOnExit => self.complete(),
        }
    }
}

impl Drop for Operation {
    fn drop(&mut self) {
        self.implicit_exit();
    }
}

impl LiveOperation {
    fn elapsed(&self) -> Duration {
        let stop = self.stop.unwrap_or_else(|| self.clock.now());
        stop.saturating_since(self.start)
    }

    fn complete(&mut self, result: Option<(&Template, &[Arg])>) {
        if self.mode == CompletionMode::Silent {
            return;
        }
        self.write(self.completion_level, OUTCOME_COMPLETED, result);
    }

    fn abandon(&mut self) {
        if self.mode == CompletionMode::Silent {
            return;
        }
        self.write(self.abandonment_level, OUTCOME_ABANDONED, None);
    }

    fn write(&mut self, level: Level, outcome: &'static str, result: Option<(&Template, &[Arg])>) {
        if self.stop.is_none() {
            self.stop = Some(self.clock.now());
        }
        self.mode = CompletionMode::Silent;

        // Dropped on every exit path, including a panicking write.
        let _scope = self.scope.take();

        let elapsed = self.elapsed();
        let elapsed_ms = elapsed.as_nanos() as f64 / 1_000_000.0;
        let exceeded = self
            .warning_threshold
            .is_some_and(|threshold| elapsed > threshold);
        let level = level.escalate(exceeded);

        self.args.push(Arg::new(outcome));
        self.args.push(Arg::new(Millis(elapsed_ms)));

        let _result_scope = result.map(|(template, args)| {
            self.sink.begin_scope(&ScopeState { template, args })
        });

        self.sink.write(&Record {
            level,
            template: &self.template,
            args: &self.args,
            outcome,
            elapsed_ms,
            exception: self.exception.as_ref(),
        });
    }
}

/// Receives errors captured from results or call sites
pub trait AttachError {
    fn attach_error(&mut self, error: ErrorInfo);
}

impl AttachError for Operation {
    fn attach_error(&mut self, error: ErrorInfo) {
        if let Inner::Live(live) = &mut self.inner {
            live.exception = Some(error);
        }
    }
}

/// Operation that can only complete, returned by `time` entry points
///
/// Dropping it records `completed` whether the block finished normally,
/// returned early with `?`, or unwound from a panic.
#[must_use = "dropping a ScopedOperation immediately completes it"]
#[derive(Debug)]
pub struct ScopedOperation(Operation);

impl ScopedOperation {
    pub(crate) fn new(operation: Operation) -> Self {
        Self(operation)
    }

    pub fn is_inert(&self) -> bool {
        self.0.is_inert()
    }

    pub fn operation_id(&self) -> Option<&OperationId> {
        self.0.operation_id()
    }

    pub fn completion_mode(&self) -> CompletionMode {
        self.0.completion_mode()
    }

    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }

    pub fn cancel(&mut self) {
        self.0.cancel();
    }

    pub fn set_exception<E>(&mut self, error: &E) -> &mut Self
    where
        E: Error + ?Sized,
    {
        self.0.set_exception(error);
        self
    }

    pub fn set_exception_and_continue<E>(&mut self, error: &E) -> bool
    where
        E: Error + ?Sized,
    {
        self.0.set_exception_and_continue(error)
    }
}

impl AttachError for ScopedOperation {
    fn attach_error(&mut self, error: ErrorInfo) {
        self.0.attach_error(error);
    }
}

/// Attach the error of a failed result to an operation and pass the result on
///
/// ```
/// # use optime_core::{op_args, Logger, MemorySink, OperationResultExt};
/// # let sink = MemorySink::new();
/// # let logger = Logger::new(sink.clone());
/// fn load(logger: &Logger) -> Result<u32, std::num::ParseIntError> {
///     let mut op = logger.begin_operation("Load", op_args![]);
///     let value = "nope".parse::<u32>().record_err(&mut op)?;
///     op.complete();
///     Ok(value)
/// }
/// assert!(load(&logger).is_err());
/// let records = sink.records();
/// assert_eq!(records[0].outcome, "abandoned");
/// assert!(records[0].exception.is_some());
/// ```
pub trait OperationResultExt {
    fn record_err<O: AttachError>(self, operation: &mut O) -> Self;
}

impl<T, E> OperationResultExt for std::result::Result<T, E>
where
    E: Error,
{
    fn record_err<O: AttachError>(self, operation: &mut O) -> Self {
        if let Err(err) = &self {
            operation.attach_error(ErrorInfo::capture(err));
        }
        self
    }
}
