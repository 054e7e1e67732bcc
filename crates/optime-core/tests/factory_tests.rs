#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::time::Duration;

use common::{manual_logger, memory_logger};
use optime_core::{op_args, Level, Logger, MemorySink, OperationLevels};

#[test]
fn test_operation_at_logs_warning_when_too_long() {
    let (sink, logger) = memory_logger();

    {
        let _operation = logger
            .operation_at(Level::Debug, Some(Level::Critical), Some(Duration::from_millis(1)))
            .time("Long Op!", op_args![]);
        std::thread::sleep(Duration::from_millis(20));
    }

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, Level::Warning);
    assert_eq!(records[0].outcome, "completed");
    assert!(records[0].elapsed_ms >= 20.0);
}

#[test]
fn test_operation_at_logs_specified_level_when_abandoned() {
    let (sink, logger) = memory_logger();

    {
        let mut operation = logger
            .operation_at(Level::Debug, Some(Level::Critical), Some(Duration::from_secs(1)))
            .begin("Long Op!", op_args![]);
        operation.abandon();
    }

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, Level::Critical);
}

#[test]
fn test_operation_at_logs_specified_level_when_complete() {
    let (sink, logger) = memory_logger();

    {
        let mut operation = logger
            .operation_at(Level::Debug, Some(Level::Critical), Some(Duration::from_secs(1)))
            .begin("Long Op!", op_args![]);
        operation.complete();
    }

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, Level::Debug);
}

#[test]
fn test_operation_at_logs_message_on_complete() {
    let (sink, logger) = memory_logger();

    {
        let mut operation = logger
            .operation_at(Level::Debug, Some(Level::Critical), Some(Duration::from_secs(1)))
            .begin("Long Op!", op_args![]);
        operation.complete_with("This is complete!", op_args![]).unwrap();
    }

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, Level::Debug);
    assert!(records[0].scopes.iter().any(|s| s == "This is complete!"));
}

#[test]
fn test_operation_at_logs_nothing_if_levels_not_enabled() {
    let sink = MemorySink::with_min_level(Level::Critical);
    let logger = Logger::new(sink.clone());

    let factory = logger.operation_at(Level::Debug, Some(Level::Debug), Some(Duration::from_secs(1)));
    assert!(factory.is_inert());

    {
        let mut operation = factory.begin("Long Op!", op_args![]);
        assert!(operation.is_inert());
        operation.complete();
        operation.abandon();
    }
    {
        let _timed = factory.time("Long Op!", op_args![]);
    }

    assert!(sink.records().is_empty());
    assert_eq!(sink.write_calls(), 0);
    assert_eq!(sink.scopes_opened(), 0);
}

#[test]
fn test_mismatched_template_behaves_the_same_live_or_inert() {
    let (sink, logger, _clock) = manual_logger(Level::Information);
    let live = logger.operation_at(Level::Information, None, None);
    let inert = logger.operation_at(Level::Debug, None, None);
    assert!(!live.is_inert());
    assert!(inert.is_inert());

    let mut from_live = live.begin("Loaded {Count} rows", op_args![]);
    let mut from_inert = inert.begin("Loaded {Count} rows", op_args![]);
    assert!(from_inert.operation_id().is_none());
    from_live.complete();
    from_inert.complete();

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert!(records[0].message.starts_with("Loaded {Count} rows completed in "));
}

#[test]
fn test_enabled_abandonment_keeps_gate_open() {
    let sink = MemorySink::with_min_level(Level::Error);
    let logger = Logger::new(sink.clone());
    let factory = logger.operation_at(Level::Debug, Some(Level::Critical), None);
    assert!(!factory.is_inert());

    {
        let mut operation = factory.begin("Completes quietly", op_args![]);
        operation.complete();
    }
    // The write happens but the sink filters the debug record.
    assert_eq!(sink.write_calls(), 1);
    assert!(sink.records().is_empty());

    {
        let _operation = factory.begin("Abandoned loudly", op_args![]);
    }
    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, Level::Critical);
    assert_eq!(records[0].outcome, "abandoned");
}

#[test]
fn test_escalation_never_lowers_severe_levels() {
    let (sink, logger, clock) = manual_logger(Level::Trace);
    let factory =
        logger.operation_at(Level::Debug, Some(Level::Critical), Some(Duration::from_millis(1)));

    {
        let _operation = factory.begin("Slow abandon", op_args![]);
        clock.advance(Duration::from_millis(50));
    }

    let records = sink.records();
    assert_eq!(records[0].level, Level::Critical);
}

#[test]
fn test_escalation_applies_per_event() {
    let (sink, logger, clock) = manual_logger(Level::Trace);
    let factory = logger.operation_at(Level::Information, None, Some(Duration::from_millis(5)));

    {
        let _slow = factory.time("Slow", op_args![]);
        clock.advance(Duration::from_millis(6));
    }
    {
        let _fast = factory.time("Fast", op_args![]);
        clock.advance(Duration::from_millis(1));
    }

    let levels: Vec<Level> = sink.records().iter().map(|r| r.level).collect();
    assert_eq!(levels, vec![Level::Warning, Level::Information]);
    assert_eq!(
        factory.levels().unwrap().completion,
        Level::Information,
        "configured levels must not change"
    );
}

#[test]
fn test_no_threshold_never_escalates() {
    let (sink, logger, clock) = manual_logger(Level::Trace);
    let factory = logger.operation_at(Level::Trace, None, None);

    {
        let _operation = factory.time("Very slow", op_args![]);
        clock.advance(Duration::from_secs(3600));
    }

    assert_eq!(sink.records()[0].level, Level::Trace);
}

#[test]
fn test_operation_with_configured_levels() {
    let (sink, logger, clock) = manual_logger(Level::Debug);
    let levels = OperationLevels::from_toml_str(
        r#"
        completion = "debug"
        abandonment = "error"
        warning_threshold_ms = 100
        "#,
    )
    .unwrap();
    let factory = logger.operation_with(&levels);

    {
        let mut operation = factory.begin("Configured {Step}", op_args!["load"]);
        clock.advance(Duration::from_millis(150));
        operation.complete();
    }
    {
        let _operation = factory.begin("Configured {Step}", op_args!["save"]);
    }

    let records = sink.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].level, Level::Warning);
    assert!(records[0].message.starts_with("Configured load completed in 150.0 ms"));
    assert_eq!(records[1].level, Level::Error);
    assert_eq!(records[1].outcome, "abandoned");
}

#[test]
fn test_configured_levels_below_sink_minimum_are_inert() {
    let sink = MemorySink::with_min_level(Level::Warning);
    let logger = Logger::new(sink.clone());
    let levels = OperationLevels::from_toml_str(r#"completion = "trace""#).unwrap();

    assert!(logger.operation_with(&levels).is_inert());
}
