//! Operation level configuration
//!
//! `OperationLevels` can be built in code or deserialised from a config
//! document:
//!
//! ```toml
//! completion = "debug"
//! abandonment = "critical"
//! warning_threshold_ms = 250
//! ```
//!
//! When `abandonment` is omitted it follows `completion`, matching
//! `Logger::operation_at`. An empty document yields the defaults used by
//! `Logger::begin_operation` (information / warning, no threshold).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::level::Level;

/// Levels and escalation threshold applied to operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawLevels", into = "RawLevels")]
pub struct OperationLevels {
    pub completion: Level,
    pub abandonment: Level,
    pub warning_threshold: Option<Duration>,
}

impl OperationLevels {
    pub fn new(completion: Level, abandonment: Level, warning_threshold: Option<Duration>) -> Self {
        Self {
            completion,
            abandonment,
            warning_threshold,
        }
    }

    /// Parse levels from a TOML document
    ///
    /// # Errors
    ///
    /// Returns `OpError::Config` when the document is not valid TOML or
    /// names an unknown level.
    pub fn from_toml_str(document: &str) -> Result<Self> {
        Ok(toml::from_str(document)?)
    }
}

impl Default for OperationLevels {
    fn default() -> Self {
        Self::new(Level::Information, Level::Warning, None)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLevels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completion: Option<Level>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    abandonment: Option<Level>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    warning_threshold_ms: Option<u64>,
}

impl From<RawLevels> for OperationLevels {
    fn from(raw: RawLevels) -> Self {
        let defaults = OperationLevels::default();
        let (completion, abandonment) = match (raw.completion, raw.abandonment) {
            (Some(completion), abandonment) => (completion, abandonment.unwrap_or(completion)),
            (None, abandonment) => (
                defaults.completion,
                abandonment.unwrap_or(defaults.abandonment),
            ),
        };
        Self {
            completion,
            abandonment,
            warning_threshold: raw.warning_threshold_ms.map(Duration::from_millis),
        }
    }
}

impl From<OperationLevels> for RawLevels {
    fn from(levels: OperationLevels) -> Self {
        Self {
            completion: Some(levels.completion),
            abandonment: Some(levels.abandonment),
            warning_threshold_ms: levels
                .warning_threshold
                .map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX)),
        }
    }
}
