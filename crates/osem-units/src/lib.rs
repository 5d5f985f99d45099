// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Meteorological units for osem-relay.
//!
//! This crate provides:
//! - The closed set of units a weather station record can carry, grouped
//!   by physical dimension
//! - Per-unit-system resolution of an observation's natural unit
//!   (`US`, `METRIC`, `METRICWX`)
//! - Exact affine conversion between units of the same dimension
//! - printf-style value formats and conventional display precision
//!
//! # Overview
//!
//! ```text
//! field name --> UnitGroup --(UnitSystem)--> Unit --convert--> Unit --FormatSpec--> String
//! ```
//!
//! # Example
//!
//! ```
//! use osem_units::{convert, units_for_unit_system, Unit, UnitSystem, ValueFormat};
//!
//! let native = units_for_unit_system("outTemp", UnitSystem::Us).unwrap();
//! assert_eq!(native, Unit::DegreeF);
//!
//! let celsius = convert(51.26, native, Unit::DegreeC).unwrap();
//! assert_eq!(Unit::DegreeC.default_format().format_value(celsius), "10.7");
//! ```

pub mod convert;
pub mod error;
pub mod format;
pub mod observation;
pub mod unit;

pub use convert::{convert, units_for_unit_system};
pub use error::UnitError;
pub use format::{FormatSpec, ValueFormat};
pub use observation::group_for_observation;
pub use unit::{Dimension, Unit, UnitGroup, UnitSystem};
