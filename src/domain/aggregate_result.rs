//! Uniform response envelope returned by every sales query.

use crate::domain::error::SalesError;
use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use serde::Serialize;
use std::time::{Duration, Instant};

pub const STATUS_OK: u16 = 200;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Message used for every failed envelope. Details only go to the log.
pub const INTERNAL_FAILURE_MESSAGE: &str = "An internal error occurred while processing the request";

/// Number of logical records a payload holds.
pub trait RecordCount {
    fn record_count(&self) -> usize;
}

impl RecordCount for Decimal {
    fn record_count(&self) -> usize {
        1
    }
}

impl<T> RecordCount for Vec<T> {
    fn record_count(&self) -> usize {
        self.len()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateResult<T> {
    pub status_code: u16,
    pub is_success: bool,
    pub status_message: String,
    pub request_time: DateTime<Local>,
    pub response_time: DateTime<Local>,
    pub response_duration: Duration,
    pub total_records: usize,
    pub payload: Option<T>,
}

impl<T: RecordCount> AggregateResult<T> {
    /// Wraps the outcome of a query started at `request_time` / `started`.
    ///
    /// A failed outcome is logged and becomes a 500 envelope with no payload.
    pub fn respond(
        request_time: DateTime<Local>,
        started: Instant,
        message: &str,
        outcome: Result<T, SalesError>,
    ) -> Self {
        let (status_code, is_success, status_message, total_records, payload) = match outcome {
            Ok(payload) => (
                STATUS_OK,
                true,
                message.to_string(),
                payload.record_count(),
                Some(payload),
            ),
            Err(e) => {
                log::error!("{e}");
                (
                    STATUS_INTERNAL_ERROR,
                    false,
                    INTERNAL_FAILURE_MESSAGE.to_string(),
                    0,
                    None,
                )
            }
        };

        Self {
            status_code,
            is_success,
            status_message,
            request_time,
            response_time: Local::now(),
            response_duration: started.elapsed(),
            total_records,
            payload,
        }
    }
}
