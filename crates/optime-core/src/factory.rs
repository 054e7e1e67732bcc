//! Level-gated operation factory
//!
//! Building a live operation costs an identifier, a scope and a clock read.
//! `OperationFactory::at` checks level enablement once; when the sink would
//! discard both possible outcomes it hands back the inert factory, whose
//! operations do no work at all.

use std::time::Duration;

use crate::config::OperationLevels;
use crate::level::Level;
use crate::logger::Logger;
use crate::operation::{CompletionMode, Operation, ScopedOperation};
use crate::template::Arg;

/// Starts operations with non-default levels
#[derive(Debug, Clone)]
pub struct OperationFactory {
    inner: FactoryInner,
}

#[derive(Debug, Clone)]
enum FactoryInner {
    Live {
        logger: Logger,
        levels: OperationLevels,
    },
    Inert,
}

impl OperationFactory {
    /// Gate on the sink's enablement of `completion` and `abandonment`
    ///
    /// `abandonment` defaults to `completion`.
    pub fn at(
        logger: &Logger,
        completion: Level,
        abandonment: Option<Level>,
        warning_threshold: Option<Duration>,
    ) -> Self {
        let abandonment = abandonment.unwrap_or(completion);
        Self::from_levels(
            logger,
            &OperationLevels::new(completion, abandonment, warning_threshold),
        )
    }

    pub fn from_levels(logger: &Logger, levels: &OperationLevels) -> Self {
        let sink = logger.sink();
        if !sink.is_enabled(levels.completion)
            && (levels.abandonment == levels.completion || !sink.is_enabled(levels.abandonment))
        {
            tracing::debug!(
                completion = %levels.completion,
                abandonment = %levels.abandonment,
                "operation levels disabled, using inert factory"
            );
            return Self::inert();
        }

        Self {
            inner: FactoryInner::Live {
                logger: logger.clone(),
                levels: *levels,
            },
        }
    }

    /// Factory whose operations never log
    pub const fn inert() -> Self {
        Self {
            inner: FactoryInner::Inert,
        }
    }

    pub fn is_inert(&self) -> bool {
        matches!(self.inner, FactoryInner::Inert)
    }

    /// Levels bound to a live factory
    pub fn levels(&self) -> Option<&OperationLevels> {
        match &self.inner {
            FactoryInner::Live { levels, .. } => Some(levels),
            FactoryInner::Inert => None,
        }
    }

    /// Begin an operation that records `abandoned` unless completed
    pub fn begin(&self, message_template: &str, args: Vec<Arg>) -> Operation {
        match &self.inner {
            FactoryInner::Live { logger, levels } => Operation::new(
                logger,
                message_template,
                args,
                CompletionMode::AbandonOnExit,
                levels,
            ),
            FactoryInner::Inert => Operation::inert(),
        }
    }

    /// Time a block; dropping the result records `completed`
    pub fn time(&self, message_template: &str, args: Vec<Arg>) -> ScopedOperation {
        let operation = match &self.inner {
            FactoryInner::Live { logger, levels } => Operation::new(
                logger,
                message_template,
                args,
                CompletionMode::CompleteOnExit,
                levels,
            ),
            FactoryInner::Inert => Operation::inert(),
        };
        ScopedOperation::new(operation)
    }
}
