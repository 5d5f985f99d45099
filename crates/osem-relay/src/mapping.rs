// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Station field to OpenSenseMap sensor mapping.
//!
//! Each entry maps a record field (`outTemp`) to the remote sensor id of
//! the box, with an optional target unit and an optional printf-style
//! format. Both snake_case keys and the weewx spelling are accepted:
//!
//! ```toml
//! [sensors.outTemp]
//! sensor_id = "5f0c0d1e2a3b4c5d6e7f8091"
//! unit = "degree_C"
//! format = "%.1f"
//!
//! [sensors.windSpeed]
//! SensorId = "5f0c0d1e2a3b4c5d6e7f8092"
//! Unit = "km_per_hour"
//! ```

use osem_units::{FormatSpec, Unit};
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Upload rule for a single record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorSpec {
    /// Remote sensor id on the box.
    #[serde(alias = "SensorId")]
    pub sensor_id: String,

    /// Convert to this unit before formatting. None = the field's unit in
    /// the upload unit system.
    #[serde(default, alias = "Unit", skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,

    /// Explicit format. None = the unit's default display precision.
    #[serde(default, alias = "Format", skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatSpec>,
}

impl SensorSpec {
    /// Create a rule that uploads the field as-is.
    pub fn new(sensor_id: impl Into<String>) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            unit: None,
            format: None,
        }
    }

    /// Set the target unit.
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Set an explicit format.
    pub fn with_format(mut self, format: FormatSpec) -> Self {
        self.format = Some(format);
        self
    }
}

/// Field name -> upload rule. Iterates in field-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorMapping(BTreeMap<String, SensorSpec>);

impl SensorMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rule for a field.
    pub fn insert(&mut self, field: impl Into<String>, spec: SensorSpec) -> Option<SensorSpec> {
        self.0.insert(field.into(), spec)
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, field: impl Into<String>, spec: SensorSpec) -> Self {
        self.insert(field, spec);
        self
    }

    /// Rule for a field.
    pub fn get(&self, field: &str) -> Option<&SensorSpec> {
        self.0.get(field)
    }

    /// Iterate over `(field, rule)` pairs.
    pub fn iter(&self) -> btree_map::Iter<'_, String, SensorSpec> {
        self.0.iter()
    }

    /// Number of mapped fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no field is mapped.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a SensorMapping {
    type Item = (&'a String, &'a SensorSpec);
    type IntoIter = btree_map::Iter<'a, String, SensorSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
