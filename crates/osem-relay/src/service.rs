// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Relay service: backlog + worker task + producer handle.

use crate::backlog::{Backlog, PushOutcome};
use crate::client::{OpenSenseMapClient, PostRecord};
use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::outcome::OutcomeSink;
use crate::payload::PayloadBuilder;
use crate::record::Record;
use crate::worker::{UploadPolicy, UploadWorker, WorkerStats, WorkerStatsSnapshot};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Producer side of a running relay. Cheap to clone.
#[derive(Debug, Clone)]
pub struct RelayHandle {
    backlog: Arc<Backlog>,
    stats: Arc<WorkerStats>,
}

impl RelayHandle {
    /// Queue a record for upload. Never blocks.
    ///
    /// Returns `false` when the relay no longer accepts records.
    pub fn submit(&self, record: Record) -> bool {
        match self.backlog.push(record) {
            PushOutcome::Queued => true,
            PushOutcome::Evicted(old) => {
                tracing::warn!(
                    "Backlog full ({} records), dropped oldest record {}",
                    self.backlog.capacity(),
                    old.date_time
                );
                true
            }
            PushOutcome::Rejected(rejected) => {
                tracing::warn!(
                    "Relay is shutting down, record {} not queued",
                    rejected.date_time
                );
                false
            }
        }
    }

    /// Stop now. Queued records are abandoned and an in-flight upload ends
    /// after its current attempt.
    pub fn stop(&self) {
        let dropped = self.backlog.stop();
        if dropped > 0 {
            self.stats
                .abandoned
                .fetch_add(dropped as u64, Ordering::Relaxed);
            tracing::warn!("Relay stopped with {} queued record(s) abandoned", dropped);
        }
    }

    /// Stop accepting records and exit once the backlog is drained.
    pub fn close(&self) {
        self.backlog.close();
    }

    /// Number of queued records.
    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    /// Records evicted by backlog overflow so far.
    pub fn evicted(&self) -> u64 {
        self.backlog.evicted()
    }

    /// Current worker counters.
    pub fn stats(&self) -> WorkerStatsSnapshot {
        self.stats.snapshot()
    }
}

/// Entry point for starting a relay.
pub struct Relay;

impl Relay {
    /// Validate `config`, build the HTTP client and spawn the worker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<S>(
        config: RelayConfig,
        sink: S,
    ) -> Result<(RelayHandle, JoinHandle<WorkerStatsSnapshot>), RelayError>
    where
        S: OutcomeSink + 'static,
    {
        config.validate()?;
        let client = OpenSenseMapClient::new(
            config.station.server_url.clone(),
            Arc::new(config.credentials()),
            config.upload.timeout(),
        )?;
        Self::spawn_with(config, client, sink)
    }

    /// Like [`spawn`](Self::spawn) with a caller-provided poster.
    pub fn spawn_with<P, S>(
        config: RelayConfig,
        poster: P,
        sink: S,
    ) -> Result<(RelayHandle, JoinHandle<WorkerStatsSnapshot>), RelayError>
    where
        P: PostRecord + 'static,
        S: OutcomeSink + 'static,
    {
        config.validate()?;

        let credentials = config.credentials();
        tracing::info!(
            "Data will be uploaded for box {} ({} sensors, {} units)",
            credentials.redacted_box_id(),
            config.sensors.len(),
            if config.station.us_units { "US" } else { "metric" }
        );
        if config.upload.skip_upload {
            tracing::info!("skip_upload is set: payloads will be formatted but not sent");
        }

        let backlog = Arc::new(Backlog::new(config.upload.max_backlog));
        let stats = Arc::new(WorkerStats::new());
        let builder = PayloadBuilder::new(Arc::new(config.sensors), config.station.us_units);
        let policy = UploadPolicy::from_config(&config.upload);

        let worker = UploadWorker::new(Arc::clone(&backlog), poster, sink, builder, policy)
            .with_stats(Arc::clone(&stats));
        let join = tokio::spawn(worker.run());

        Ok((RelayHandle { backlog, stats }, join))
    }
}
