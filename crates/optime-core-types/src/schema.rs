//! Canonical schema constants for timed-operation records
//!
//! These constants keep message templates, scope templates and structured
//! fields consistent between the operation core and the sinks.

// Template property names
pub const PROP_OUTCOME: &str = "Outcome";
pub const PROP_ELAPSED: &str = "Elapsed";
pub const PROP_OPERATION_ID: &str = "OperationId";

/// Suffix appended to every operation message template
pub const COMPLETION_SUFFIX: &str = " {Outcome} in {Elapsed:0.0} ms";

/// Scope template carrying the operation identifier
pub const OPERATION_SCOPE_TEMPLATE: &str = "OperationId: {OperationId}";

// Canonical field keys for structured logging
pub const FIELD_OUTCOME: &str = "outcome";
pub const FIELD_ELAPSED_MS: &str = "elapsed_ms";
pub const FIELD_OPERATION_ID: &str = "operation_id";
pub const FIELD_SEVERITY: &str = "severity";
pub const FIELD_ERROR: &str = "error";
pub const FIELD_SCOPE: &str = "scope";

// Outcome labels
pub const OUTCOME_COMPLETED: &str = "completed";
pub const OUTCOME_ABANDONED: &str = "abandoned";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_mentions_properties() {
        assert!(COMPLETION_SUFFIX.contains(PROP_OUTCOME));
        assert!(COMPLETION_SUFFIX.contains(PROP_ELAPSED));
        assert!(OPERATION_SCOPE_TEMPLATE.contains(PROP_OPERATION_ID));
    }

    #[test]
    fn test_outcome_labels_are_distinct() {
        assert_ne!(OUTCOME_COMPLETED, OUTCOME_ABANDONED);
    }
}
