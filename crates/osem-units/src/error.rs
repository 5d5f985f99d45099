// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Unit conversion and formatting errors.

use crate::unit::Unit;
use thiserror::Error;

/// Errors raised while resolving, converting or formatting a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    /// The observation has no known physical dimension.
    #[error("no unit group known for observation '{0}'")]
    UnknownUnitGroup(String),

    /// The two units measure different quantities.
    #[error("cannot convert {from} to {to}")]
    UnsupportedConversion { from: Unit, to: Unit },

    /// The unit name is not part of the unit table.
    #[error("unknown unit '{0}'")]
    UnknownUnit(String),

    /// The printf-style format string could not be parsed.
    #[error("invalid format '{spec}': {reason}")]
    InvalidFormat { spec: String, reason: String },
}
