// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record to OpenSenseMap payload formatting.
//!
//! Every mapped field present in the record is converted into the target
//! unit, formatted as a string and stored under its remote sensor id:
//!
//! ```text
//! {outTemp: 51.26, outHumidity: 72, usUnits: US}
//!   + {outTemp -> S1 (degree_C), outHumidity -> S2}
//!   = {"S1":"10.7","S2":"72"}
//! ```

use crate::error::{FieldError, PayloadError};
use crate::mapping::{SensorMapping, SensorSpec};
use crate::record::Record;
use osem_units::{convert, units_for_unit_system, UnitError, UnitSystem, ValueFormat};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Content type of every payload.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Serialized request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// UTF-8 JSON body.
    pub body: Vec<u8>,
    /// MIME type of `body`.
    pub content_type: &'static str,
    /// Number of sensor values in the body.
    pub fields: usize,
}

impl Payload {
    /// Body as text, for logging.
    pub fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap_or("<non-utf8>")
    }

    /// Check if the payload carries no sensor value.
    pub fn is_empty(&self) -> bool {
        self.fields == 0
    }
}

/// Result of formatting one record.
#[derive(Debug, Clone)]
pub struct FormattedPayload {
    /// Serialized body.
    pub payload: Payload,
    /// Sensor id -> formatted value, in body order.
    pub values: BTreeMap<String, String>,
    /// Fields that could not be converted and were left out.
    pub skipped: Vec<FieldError>,
}

/// Builds payloads for a fixed mapping and upload unit system.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    mapping: Arc<SensorMapping>,
    upload_system: UnitSystem,
}

impl PayloadBuilder {
    /// Create a builder. Values are uploaded in US units when
    /// `use_us_units` is set, metric otherwise.
    pub fn new(mapping: Arc<SensorMapping>, use_us_units: bool) -> Self {
        let upload_system = if use_us_units {
            UnitSystem::Us
        } else {
            UnitSystem::Metric
        };
        Self {
            mapping,
            upload_system,
        }
    }

    /// Unit system used for fields without an explicit target unit.
    pub fn upload_system(&self) -> UnitSystem {
        self.upload_system
    }

    /// Format a record.
    pub fn build(&self, record: &Record) -> Result<FormattedPayload, PayloadError> {
        let mut values = BTreeMap::new();
        let mut skipped = Vec::new();

        for (field, spec) in self.mapping.iter() {
            let Some(value) = record.value(field) else {
                continue;
            };

            match self.format_field(field, spec, value, record.unit_system) {
                Ok(text) => {
                    values.insert(spec.sensor_id.clone(), text);
                }
                Err(source) => skipped.push(FieldError {
                    field: field.clone(),
                    source,
                }),
            }
        }

        let body = serde_json::to_vec(&values)?;
        Ok(FormattedPayload {
            payload: Payload {
                body,
                content_type: JSON_CONTENT_TYPE,
                fields: values.len(),
            },
            values,
            skipped,
        })
    }

    fn format_field(
        &self,
        field: &str,
        spec: &SensorSpec,
        value: f64,
        record_system: UnitSystem,
    ) -> Result<String, UnitError> {
        let native = units_for_unit_system(field, record_system)?;
        let target = match spec.unit {
            Some(unit) => unit,
            None => units_for_unit_system(field, self.upload_system)?,
        };
        let converted = convert(value, native, target)?;

        let text = match &spec.format {
            Some(format) => format.format_value(converted),
            None => target.default_format().format_value(converted),
        };
        Ok(text)
    }
}

/// Format `record` with `mapping` in one call.
pub fn build_payload(
    record: &Record,
    mapping: &SensorMapping,
    use_us_units: bool,
) -> Result<FormattedPayload, PayloadError> {
    PayloadBuilder::new(Arc::new(mapping.clone()), use_us_units).build(record)
}
