// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Station measurement records.
//!
//! Records use the flat weewx archive layout:
//!
//! ```json
//! {"dateTime": 1700000000, "usUnits": 1, "outTemp": 51.26, "outHumidity": 72, "windGust": null}
//! ```

use osem_units::UnitSystem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One timestamped bundle of measurements plus the unit system they were
/// recorded in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Record time, seconds since the Unix epoch.
    #[serde(rename = "dateTime")]
    pub date_time: i64,

    /// Unit system of every value in the record.
    #[serde(rename = "usUnits")]
    pub unit_system: UnitSystem,

    /// Field values. `None` marks a field the station did not report.
    #[serde(flatten)]
    pub values: BTreeMap<String, Option<f64>>,
}

impl Record {
    /// Create an empty record.
    pub fn new(date_time: i64, unit_system: UnitSystem) -> Self {
        Self {
            date_time,
            unit_system,
            values: BTreeMap::new(),
        }
    }

    /// Builder: set a field value.
    pub fn with(mut self, field: impl Into<String>, value: f64) -> Self {
        self.values.insert(field.into(), Some(value));
        self
    }

    /// Builder: mark a field as reported but missing.
    pub fn with_missing(mut self, field: impl Into<String>) -> Self {
        self.values.insert(field.into(), None);
        self
    }

    /// Usable value of a field: present, not null and finite.
    pub fn value(&self, field: &str) -> Option<f64> {
        self.values
            .get(field)
            .copied()
            .flatten()
            .filter(|v| v.is_finite())
    }

    /// Age of the record at `now` (epoch seconds), saturating at the i64
    /// range for out-of-range timestamps.
    pub fn age_at(&self, now: i64) -> i64 {
        now.saturating_sub(self.date_time)
    }

    /// Parse a record from one JSON object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_parse_weewx_layout() {
        let rec = Record::from_json(
            r#"{"dateTime": 1700000000, "usUnits": 1, "outTemp": 51.26, "outHumidity": 72, "windGust": null}"#,
        )
        .expect("parse record");

        assert_eq!(rec.date_time, 1_700_000_000);
        assert_eq!(rec.unit_system, UnitSystem::Us);
        assert_eq!(rec.value("outTemp"), Some(51.26));
        assert_eq!(rec.value("outHumidity"), Some(72.0));
        assert_eq!(rec.value("windGust"), None);
        assert!(rec.values.contains_key("windGust"));
        assert_eq!(rec.value("barometer"), None);
    }

    #[test]
    fn test_record_parse_named_unit_system() {
        let rec = Record::from_json(r#"{"dateTime": 5, "usUnits": "METRICWX", "rain": 0.2}"#)
            .expect("parse record");
        assert_eq!(rec.unit_system, UnitSystem::MetricWx);
    }

    #[test]
    fn test_record_requires_timestamp_and_units() {
        assert!(Record::from_json(r#"{"usUnits": 1, "outTemp": 1.0}"#).is_err());
        assert!(Record::from_json(r#"{"dateTime": 1, "outTemp": 1.0}"#).is_err());
    }

    #[test]
    fn test_record_value_filters_non_finite() {
        let rec = Record::new(0, UnitSystem::Metric).with("outTemp", f64::NAN);
        assert_eq!(rec.value("outTemp"), None);
    }

    #[test]
    fn test_record_serialize_roundtrip_keeps_layout() {
        let rec = Record::new(10, UnitSystem::Metric)
            .with("outTemp", 20.5)
            .with_missing("UV");
        let json = serde_json::to_value(&rec).expect("serialize");
        assert_eq!(json["dateTime"], 10);
        assert_eq!(json["usUnits"], 16);
        assert_eq!(json["outTemp"], 20.5);
        assert!(json["UV"].is_null());
    }

    #[test]
    fn test_record_age() {
        let rec = Record::new(1_000, UnitSystem::Us);
        assert_eq!(rec.age_at(1_600), 600);
    }

    #[test]
    fn test_record_age_saturates_on_extreme_timestamps() {
        let ancient = Record::new(i64::MIN, UnitSystem::Us);
        assert_eq!(ancient.age_at(1_700_000_000), i64::MAX);

        let future = Record::new(i64::MAX, UnitSystem::Us);
        assert_eq!(future.age_at(-10), i64::MIN);
    }
}
