//! Core types shared across optime facilities
//!
//! This crate provides the foundational types used by the operation
//! timing core and by anything that consumes its log records:
//!
//! - **Correlation types**: OperationId
//! - **Schema constants**: Canonical property names, field keys and outcome labels

pub mod correlation;
pub mod schema;

pub use correlation::OperationId;
