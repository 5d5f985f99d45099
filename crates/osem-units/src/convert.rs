// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Unit conversion.
//!
//! Conversions are stateless: source -> dimension base unit -> target.

use crate::error::UnitError;
use crate::observation::group_for_observation;
use crate::unit::{Unit, UnitSystem};

/// Convert `value` from `from` to `to`.
///
/// Identity conversions return `value` untouched. Units of different
/// dimensions yield [`UnitError::UnsupportedConversion`].
pub fn convert(value: f64, from: Unit, to: Unit) -> Result<f64, UnitError> {
    if from == to {
        return Ok(value);
    }
    if from.dimension() != to.dimension() {
        return Err(UnitError::UnsupportedConversion { from, to });
    }

    let (from_scale, from_offset) = from.affine();
    let (to_scale, to_offset) = to.affine();
    let base = value * from_scale + from_offset;
    Ok((base - to_offset) / to_scale)
}

/// Natural unit of an observation field in the given unit system.
pub fn units_for_unit_system(field: &str, system: UnitSystem) -> Result<Unit, UnitError> {
    group_for_observation(field)
        .map(|group| group.unit_for(system))
        .ok_or_else(|| UnitError::UnknownUnitGroup(field.to_string()))
}
