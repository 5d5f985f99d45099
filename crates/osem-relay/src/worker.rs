// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Upload worker.
//!
//! A single task takes records off the backlog in FIFO order and drives
//! each one to a terminal [`UploadOutcome`]:
//!
//! ```text
//! Dequeued -> Stale | RateLimited | Empty | SkippedUpload
//!          -> attempt -> Posted
//!                     -> wait retry_wait -> attempt ... -> Failed
//!                     -> stop requested -> Abandoned
//! ```

use crate::backlog::Backlog;
use crate::client::PostRecord;
use crate::config::UploadConfig;
use crate::error::UploadError;
use crate::outcome::{OutcomeSink, UploadOutcome};
use crate::payload::PayloadBuilder;
use crate::record::Record;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Retry and filtering rules applied to every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Total attempts per record (at least 1).
    pub max_tries: u32,
    /// Constant wait between attempts.
    pub retry_wait: Duration,
    /// Minimum record-time spacing between posts.
    pub post_interval: Option<Duration>,
    /// Maximum record age at dequeue time.
    pub stale: Option<Duration>,
    /// Format but never send.
    pub skip_upload: bool,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::from_config(&UploadConfig::default())
    }
}

impl UploadPolicy {
    pub fn from_config(config: &UploadConfig) -> Self {
        Self {
            max_tries: config.max_tries.max(1),
            retry_wait: config.retry_wait(),
            post_interval: config.post_interval(),
            stale: config.stale(),
            skip_upload: config.skip_upload,
        }
    }

    /// Builder: set the attempt budget (clamped to at least 1).
    pub fn with_max_tries(mut self, max_tries: u32) -> Self {
        self.max_tries = max_tries.max(1);
        self
    }

    /// Builder: set the wait between attempts.
    pub fn with_retry_wait(mut self, retry_wait: Duration) -> Self {
        self.retry_wait = retry_wait;
        self
    }

    /// Builder: set the post interval.
    pub fn with_post_interval(mut self, interval: Option<Duration>) -> Self {
        self.post_interval = interval;
        self
    }

    /// Builder: set the staleness limit.
    pub fn with_stale(mut self, stale: Option<Duration>) -> Self {
        self.stale = stale;
        self
    }

    /// Builder: enable dry-run mode.
    pub fn with_skip_upload(mut self, skip: bool) -> Self {
        self.skip_upload = skip;
        self
    }
}

/// Transient state of the record being uploaded.
#[derive(Debug, Clone)]
pub struct UploadTask {
    pub attempts: u32,
    pub last_failure: Option<UploadError>,
    pub next_attempt_at: Instant,
}

impl UploadTask {
    fn new() -> Self {
        Self {
            attempts: 0,
            last_failure: None,
            next_attempt_at: Instant::now(),
        }
    }
}

/// Live worker counters.
#[derive(Debug, Default)]
pub struct WorkerStats {
    pub posted: AtomicU64,
    pub failed: AtomicU64,
    pub stale: AtomicU64,
    pub rate_limited: AtomicU64,
    pub empty: AtomicU64,
    pub skipped_upload: AtomicU64,
    pub abandoned: AtomicU64,
    pub attempts: AtomicU64,
}

impl WorkerStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one terminal outcome.
    pub fn record(&self, outcome: &UploadOutcome) {
        let counter = match outcome {
            UploadOutcome::Posted { .. } => &self.posted,
            UploadOutcome::Failed { .. } => &self.failed,
            UploadOutcome::Stale { .. } => &self.stale,
            UploadOutcome::RateLimited { .. } => &self.rate_limited,
            UploadOutcome::Empty => &self.empty,
            UploadOutcome::SkippedUpload => &self.skipped_upload,
            UploadOutcome::Abandoned { .. } => &self.abandoned,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> WorkerStatsSnapshot {
        WorkerStatsSnapshot {
            posted: self.posted.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            stale: self.stale.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
            empty: self.empty.load(Ordering::Relaxed),
            skipped_upload: self.skipped_upload.load(Ordering::Relaxed),
            abandoned: self.abandoned.load(Ordering::Relaxed),
            attempts: self.attempts.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`WorkerStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStatsSnapshot {
    pub posted: u64,
    pub failed: u64,
    pub stale: u64,
    pub rate_limited: u64,
    pub empty: u64,
    pub skipped_upload: u64,
    pub abandoned: u64,
    pub attempts: u64,
}

impl WorkerStatsSnapshot {
    /// Records that reached any terminal outcome.
    pub fn processed(&self) -> u64 {
        self.posted
            + self.failed
            + self.stale
            + self.rate_limited
            + self.empty
            + self.skipped_upload
            + self.abandoned
    }
}

fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Consumes the backlog and uploads records one at a time.
pub struct UploadWorker<P, S> {
    backlog: Arc<Backlog>,
    poster: P,
    sink: S,
    builder: PayloadBuilder,
    policy: UploadPolicy,
    stats: Arc<WorkerStats>,
    last_post: Option<i64>,
    clock: fn() -> i64,
}

impl<P: PostRecord, S: OutcomeSink> UploadWorker<P, S> {
    pub fn new(
        backlog: Arc<Backlog>,
        poster: P,
        sink: S,
        builder: PayloadBuilder,
        policy: UploadPolicy,
    ) -> Self {
        Self {
            backlog,
            poster,
            sink,
            builder,
            policy,
            stats: Arc::new(WorkerStats::new()),
            last_post: None,
            clock: unix_now,
        }
    }

    /// Share counters with the producer side.
    pub fn with_stats(mut self, stats: Arc<WorkerStats>) -> Self {
        self.stats = stats;
        self
    }

    /// Replace the wall clock (epoch seconds) used for staleness.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn stats(&self) -> Arc<WorkerStats> {
        Arc::clone(&self.stats)
    }

    /// Run until the backlog is stopped, or closed and drained.
    pub async fn run(mut self) -> WorkerStatsSnapshot {
        tracing::debug!(
            "Upload worker started (max_tries={}, retry_wait={:?})",
            self.policy.max_tries,
            self.policy.retry_wait
        );

        while let Some(record) = self.backlog.pop().await {
            self.process(record).await;
        }

        let stats = self.stats.snapshot();
        tracing::debug!("Upload worker stopped ({} records processed)", stats.processed());
        stats
    }

    /// Drive one record to its terminal outcome.
    pub async fn process(&mut self, record: Record) -> UploadOutcome {
        let outcome = self.upload(&record).await;
        self.stats.record(&outcome);
        self.sink.outcome(&record, &outcome);
        outcome
    }

    async fn upload(&mut self, record: &Record) -> UploadOutcome {
        if let Some(stale) = self.policy.stale {
            let age_secs = record.age_at((self.clock)());
            if age_secs > i64::try_from(stale.as_secs()).unwrap_or(i64::MAX) {
                return UploadOutcome::Stale { age_secs };
            }
        }

        if let Some(interval) = self.policy.post_interval {
            if let Some(last) = self.last_post {
                let since_last_secs = record.date_time.saturating_sub(last);
                if since_last_secs < i64::try_from(interval.as_secs()).unwrap_or(i64::MAX) {
                    return UploadOutcome::RateLimited { since_last_secs };
                }
            }
        }
        self.last_post = Some(record.date_time);

        let formatted = match self.builder.build(record) {
            Ok(formatted) => formatted,
            Err(e) => {
                return UploadOutcome::Failed {
                    attempts: 0,
                    reason: e.into(),
                }
            }
        };
        for error in &formatted.skipped {
            self.sink.field_skipped(record, error);
        }
        if formatted.payload.is_empty() {
            return UploadOutcome::Empty;
        }

        tracing::debug!(
            "Record {}: url {} payload {}",
            record.date_time,
            self.poster.redacted_url(),
            formatted.payload.body_str()
        );

        if self.policy.skip_upload {
            return UploadOutcome::SkippedUpload;
        }

        let mut task = UploadTask::new();
        loop {
            if self.backlog.is_stopped() {
                return UploadOutcome::Abandoned {
                    attempts: task.attempts,
                    last_failure: task.last_failure,
                };
            }

            task.attempts += 1;
            self.stats.attempts.fetch_add(1, Ordering::Relaxed);

            match self.poster.post(&formatted.payload).await {
                Ok(receipt) => {
                    tracing::debug!(
                        "Record {}: server replied {} '{}'",
                        record.date_time,
                        receipt.status,
                        receipt.body.trim()
                    );
                    return UploadOutcome::Posted {
                        attempts: task.attempts,
                    };
                }
                Err(error) => {
                    self.sink
                        .attempt_failed(record, task.attempts, self.policy.max_tries, &error);
                    if task.attempts >= self.policy.max_tries {
                        return UploadOutcome::Failed {
                            attempts: task.attempts,
                            reason: error,
                        };
                    }
                    task.last_failure = Some(error);
                    task.next_attempt_at = Instant::now() + self.policy.retry_wait;
                }
            }

            tokio::select! {
                biased;
                _ = self.backlog.stopped() => {
                    return UploadOutcome::Abandoned {
                        attempts: task.attempts,
                        last_failure: task.last_failure,
                    };
                }
                _ = tokio::time::sleep_until(task.next_attempt_at) => {}
            }
        }
    }
}
