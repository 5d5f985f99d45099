// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! OpenSenseMap relay for weather station records
//!
//! Accepts station records, converts the mapped fields into the units the
//! remote sensors expect and uploads them to an OpenSenseMap box in the
//! background.
//!
//! # Features
//!
//! - **Unit Conversion**: Per-sensor target unit and printf-style format
//! - **Bounded Backlog**: Producers never block; the oldest record is
//!   evicted on overflow
//! - **Retries**: Fixed attempt budget with a constant wait
//! - **Filtering**: Staleness limit and minimum post interval
//! - **Redaction**: Box id and auth key never appear in logs
//!
//! # Quick Start
//!
//! ```bash
//! # Write an example configuration
//! osem-relay gen-config --output osem.toml
//!
//! # Relay JSON records read from stdin
//! weewx-export | osem-relay --config osem.toml
//!
//! # Post one synthetic record
//! osem-relay test --config osem.toml
//! ```
//!
//! # Configuration File
//!
//! ```toml
//! [station]
//! box_id = "5f0c0d1e2a3b4c5d6e7f8091"
//! auth_key = "secret"
//!
//! [upload]
//! max_tries = 3
//! retry_wait_secs = 5
//! stale_secs = 1800
//!
//! [sensors.outTemp]
//! sensor_id = "5f0c0d1e2a3b4c5d6e7f8092"
//! unit = "degree_C"
//! ```

pub mod backlog;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod mapping;
pub mod outcome;
pub mod payload;
pub mod record;
pub mod service;
pub mod worker;

pub use backlog::{Backlog, PushOutcome};
pub use client::{classify_response, OpenSenseMapClient, PostReceipt, PostRecord};
pub use config::{ConfigError, RelayConfig, StationConfig, UploadConfig, DEFAULT_SERVER_URL};
pub use credentials::{redact_identifier, Credentials, REDACTED_BOX_PLACEHOLDER};
pub use error::{FieldError, PayloadError, RelayError, UploadError};
pub use mapping::{SensorMapping, SensorSpec};
pub use outcome::{OutcomeSink, TracingSink, UploadOutcome};
pub use payload::{build_payload, FormattedPayload, Payload, PayloadBuilder, JSON_CONTENT_TYPE};
pub use record::Record;
pub use service::{Relay, RelayHandle};
pub use worker::{UploadPolicy, UploadTask, UploadWorker, WorkerStats, WorkerStatsSnapshot};
