//! Core domain types and logic.

pub mod aggregate_result;
pub mod aggregation;
pub mod engine;
pub mod error;
pub mod sale_record;
pub mod snapshot;
