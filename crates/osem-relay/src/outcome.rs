// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Upload outcomes and where they are reported.

use crate::config::UploadConfig;
use crate::error::{FieldError, UploadError};
use crate::record::Record;
use std::fmt;
use std::sync::Arc;

/// Terminal outcome of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Accepted by the server.
    Posted { attempts: u32 },
    /// Older than the staleness limit; never sent.
    Stale { age_secs: i64 },
    /// Too close to the previous post; never sent.
    RateLimited { since_last_secs: i64 },
    /// No mapped field had a usable value; never sent.
    Empty,
    /// Formatted but not sent (`skip_upload`).
    SkippedUpload,
    /// Every attempt failed.
    Failed { attempts: u32, reason: UploadError },
    /// Stop requested before the record was delivered.
    Abandoned {
        attempts: u32,
        last_failure: Option<UploadError>,
    },
}

impl UploadOutcome {
    /// Check if the server accepted the record.
    pub fn is_posted(&self) -> bool {
        matches!(self, UploadOutcome::Posted { .. })
    }

    /// Short name used in logs and statistics.
    pub fn kind(&self) -> &'static str {
        match self {
            UploadOutcome::Posted { .. } => "posted",
            UploadOutcome::Stale { .. } => "stale",
            UploadOutcome::RateLimited { .. } => "rate_limited",
            UploadOutcome::Empty => "empty",
            UploadOutcome::SkippedUpload => "skipped_upload",
            UploadOutcome::Failed { .. } => "failed",
            UploadOutcome::Abandoned { .. } => "abandoned",
        }
    }
}

impl fmt::Display for UploadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadOutcome::Posted { attempts } => write!(f, "posted after {} attempt(s)", attempts),
            UploadOutcome::Stale { age_secs } => write!(f, "stale ({} s old)", age_secs),
            UploadOutcome::RateLimited { since_last_secs } => {
                write!(f, "rate limited ({} s since last post)", since_last_secs)
            }
            UploadOutcome::Empty => write!(f, "no mapped values"),
            UploadOutcome::SkippedUpload => write!(f, "upload skipped"),
            UploadOutcome::Failed { attempts, reason } => {
                write!(f, "failed after {} attempt(s): {}", attempts, reason)
            }
            UploadOutcome::Abandoned {
                attempts,
                last_failure: Some(reason),
            } => write!(f, "abandoned after {} attempt(s): {}", attempts, reason),
            UploadOutcome::Abandoned { attempts, .. } => {
                write!(f, "abandoned after {} attempt(s)", attempts)
            }
        }
    }
}

/// Receives per-attempt failures and terminal outcomes from the worker.
pub trait OutcomeSink: Send + Sync {
    /// One attempt failed; more may follow.
    fn attempt_failed(&self, record: &Record, attempt: u32, max_tries: u32, error: &UploadError);

    /// The record reached a terminal state.
    fn outcome(&self, record: &Record, outcome: &UploadOutcome);

    /// A mapped field was left out of the payload.
    fn field_skipped(&self, _record: &Record, _error: &FieldError) {}
}

impl<S: OutcomeSink + ?Sized> OutcomeSink for Arc<S> {
    fn attempt_failed(&self, record: &Record, attempt: u32, max_tries: u32, error: &UploadError) {
        (**self).attempt_failed(record, attempt, max_tries, error)
    }

    fn outcome(&self, record: &Record, outcome: &UploadOutcome) {
        (**self).outcome(record, outcome)
    }

    fn field_skipped(&self, record: &Record, error: &FieldError) {
        (**self).field_skipped(record, error)
    }
}

/// Logs outcomes through `tracing`.
#[derive(Debug, Clone)]
pub struct TracingSink {
    log_success: bool,
    log_failure: bool,
}

impl TracingSink {
    pub fn new(log_success: bool, log_failure: bool) -> Self {
        Self {
            log_success,
            log_failure,
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.log_success, config.log_failure)
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(true, true)
    }
}

impl OutcomeSink for TracingSink {
    fn attempt_failed(&self, record: &Record, attempt: u32, max_tries: u32, error: &UploadError) {
        if self.log_failure {
            tracing::error!(
                "Failed upload attempt {}/{} for record {}: {}",
                attempt,
                max_tries,
                record.date_time,
                error
            );
        }
    }

    fn outcome(&self, record: &Record, outcome: &UploadOutcome) {
        match outcome {
            UploadOutcome::Posted { .. } => {
                if self.log_success {
                    tracing::info!("Published record {}", record.date_time);
                }
            }
            UploadOutcome::Failed { .. } | UploadOutcome::Abandoned { .. } => {
                if self.log_failure {
                    tracing::error!("Record {} dropped: {}", record.date_time, outcome);
                }
            }
            _ => {
                if self.log_success {
                    tracing::info!("Record {} skipped: {}", record.date_time, outcome);
                }
            }
        }
    }

    fn field_skipped(&self, record: &Record, error: &FieldError) {
        tracing::warn!("Record {}: {}", record.date_time, error);
    }
}
