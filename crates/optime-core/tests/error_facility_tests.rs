#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::memory_logger;
use optime_core::{op_args, Level, OpError, OpErrorKind, Operation, OperationLevels};

#[test]
fn test_empty_result_label_verifiable_by_kind() {
    let (sink, logger) = memory_logger();

    let mut op = logger.begin_operation("Query", op_args![]);
    let err = op.complete_with("", op_args![]).unwrap_err();

    assert_eq!(err.kind(), OpErrorKind::InvalidArgument);
    assert_eq!(err.code(), "ERR_INVALID_ARGUMENT");
    assert!(matches!(
        err,
        OpError::InvalidArgument {
            param: "result_label",
            ..
        }
    ));
    // The rejected call leaves the operation running.
    assert!(sink.records().is_empty());
    op.complete();
    assert_eq!(sink.records().len(), 1);
}

#[test]
fn test_empty_result_label_errors_after_completion() {
    let (sink, logger) = memory_logger();

    let mut op = logger.begin_operation("Query", op_args![]);
    op.complete();

    let err = op.complete_with("", op_args![1]).unwrap_err();
    assert_eq!(err.code(), "ERR_INVALID_ARGUMENT");
    assert_eq!(sink.records().len(), 1);
}

#[test]
fn test_empty_result_label_errors_on_inert_operation() {
    let mut inert = Operation::inert();
    assert!(inert.complete_with("", op_args![]).is_err());
    assert!(inert.complete_with("Rows", op_args![3]).is_ok());
    assert!(inert.is_inert());
}

#[test]
fn test_malformed_templates_never_error() {
    let (sink, logger) = memory_logger();

    drop(logger.begin_operation("Loading {Table", op_args![]));
    drop(logger.time_operation("Copy {Src} to {Dst}", op_args!["a"]));

    let records = sink.records();
    assert_eq!(records.len(), 2);
    assert!(records[0].message.starts_with("Loading {Table abandoned in "));
    assert!(records[1].message.starts_with("Copy a to {Dst} completed in "));
}

#[test]
fn test_unknown_level_is_config_kind() {
    let err = "shouting".parse::<Level>().unwrap_err();

    assert_eq!(err.kind(), OpErrorKind::InvalidConfig);
    assert_eq!(err.code(), "ERR_INVALID_CONFIG");
    assert!(err.to_string().contains("shouting"));
}

#[test]
fn test_bad_config_document_is_config_kind() {
    let err = OperationLevels::from_toml_str("completion = 3").unwrap_err();

    assert_eq!(err.kind(), OpErrorKind::InvalidConfig);
    assert!(err.to_string().starts_with("Invalid configuration"));
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (OpErrorKind::InvalidArgument, "ERR_INVALID_ARGUMENT"),
        (OpErrorKind::InvalidConfig, "ERR_INVALID_CONFIG"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}
