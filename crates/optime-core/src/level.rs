//! Severity levels for operation records
//!
//! `Level` is ordered from least to most severe, so `level < Level::Warning`
//! reads the way the escalation rule is stated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::OpError;

/// Severity of an emitted record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Level {
    Trace,
    Debug,
    Information,
    Warning,
    Error,
    Critical,
}

impl Level {
    /// Every level, least severe first
    pub const ALL: [Level; 6] = [
        Level::Trace,
        Level::Debug,
        Level::Information,
        Level::Warning,
        Level::Error,
        Level::Critical,
    ];

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Information => "information",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Critical => "critical",
        }
    }

    /// The `tracing` level used when a record is written through `tracing`.
    ///
    /// `tracing` has no level above ERROR, so Critical folds into it.
    pub fn to_tracing(self) -> tracing::Level {
        match self {
            Level::Trace => tracing::Level::TRACE,
            Level::Debug => tracing::Level::DEBUG,
            Level::Information => tracing::Level::INFO,
            Level::Warning => tracing::Level::WARN,
            Level::Error | Level::Critical => tracing::Level::ERROR,
        }
    }

    /// Raise to Warning when the elapsed time exceeded the threshold.
    ///
    /// Levels at or above Warning are returned unchanged.
    pub fn escalate(self, exceeded_threshold: bool) -> Level {
        if exceeded_threshold && self < Level::Warning {
            Level::Warning
        } else {
            self
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = OpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" | "trce" => Ok(Level::Trace),
            "debug" | "dbug" => Ok(Level::Debug),
            "information" | "info" => Ok(Level::Information),
            "warning" | "warn" => Ok(Level::Warning),
            "error" | "fail" => Ok(Level::Error),
            "critical" | "crit" => Ok(Level::Critical),
            _ => Err(OpError::UnknownLevel {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Level {
    type Error = OpError;

    fn try_from(value: String) -> Result<Self, OpError> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_least_severe_first() {
        for pair in Level::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_parse_aliases_case_insensitive() {
        assert_eq!("INFO".parse::<Level>().unwrap(), Level::Information);
        assert_eq!("Warn".parse::<Level>().unwrap(), Level::Warning);
        assert_eq!(" crit ".parse::<Level>().unwrap(), Level::Critical);
        assert!(matches!(
            "loud".parse::<Level>(),
            Err(OpError::UnknownLevel { .. })
        ));
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for level in Level::ALL {
            assert_eq!(level.to_string().parse::<Level>().unwrap(), level);
        }
    }

    #[test]
    fn test_escalate_only_below_warning() {
        assert_eq!(Level::Debug.escalate(true), Level::Warning);
        assert_eq!(Level::Information.escalate(true), Level::Warning);
        assert_eq!(Level::Critical.escalate(true), Level::Critical);
        assert_eq!(Level::Error.escalate(true), Level::Error);
        assert_eq!(Level::Debug.escalate(false), Level::Debug);
    }

    #[test]
    fn test_serde_lowercase_names_with_aliases() {
        for level in Level::ALL {
            let json = serde_json::to_string(&level).unwrap();
            assert_eq!(json, format!("\"{}\"", level.as_str()));
            let back: Level = serde_json::from_str(&json).unwrap();
            assert_eq!(back, level);
        }

        let alias: Level = serde_json::from_str("\"WARN\"").unwrap();
        assert_eq!(alias, Level::Warning);
        let err = serde_json::from_str::<Level>("\"loud\"").unwrap_err();
        assert!(err.to_string().contains("Unknown log level: loud"));
    }

    #[test]
    fn test_try_from_string() {
        assert_eq!(Level::try_from("error".to_string()), Ok(Level::Error));
        assert!(Level::try_from(String::new()).is_err());
    }

    #[test]
    fn test_critical_maps_to_tracing_error() {
        assert_eq!(Level::Critical.to_tracing(), tracing::Level::ERROR);
        assert_eq!(Level::Information.to_tracing(), tracing::Level::INFO);
    }
}
