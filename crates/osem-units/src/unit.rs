// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Unit, unit group and unit system tables.
//!
//! Unit names follow the weewx vocabulary (`degree_C`, `inHg`,
//! `km_per_hour`, ...) so existing station configurations keep working.
//! Each unit belongs to one [`Dimension`] and carries an affine map to the
//! dimension's base unit:
//!
//! ```text
//! base = value * scale + offset
//! ```

use crate::error::UnitError;
use crate::format::FormatSpec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit system a record was measured in.
///
/// The numeric codes match the weewx `usUnits` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawUnitSystem", into = "u8")]
pub enum UnitSystem {
    /// US customary (°F, inHg, inch, mph).
    Us,
    /// Metric (°C, mbar, cm, km/h).
    Metric,
    /// Metric with mm rain and m/s wind.
    MetricWx,
}

impl UnitSystem {
    /// weewx numeric code.
    pub fn code(self) -> u8 {
        match self {
            UnitSystem::Us => 0x01,
            UnitSystem::Metric => 0x10,
            UnitSystem::MetricWx => 0x11,
        }
    }

    /// Look up a unit system by its weewx numeric code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(UnitSystem::Us),
            0x10 => Some(UnitSystem::Metric),
            0x11 => Some(UnitSystem::MetricWx),
            _ => None,
        }
    }

    /// Canonical name (`US`, `METRIC`, `METRICWX`).
    pub fn name(self) -> &'static str {
        match self {
            UnitSystem::Us => "US",
            UnitSystem::Metric => "METRIC",
            UnitSystem::MetricWx => "METRICWX",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "US" => Ok(UnitSystem::Us),
            "METRIC" => Ok(UnitSystem::Metric),
            "METRICWX" => Ok(UnitSystem::MetricWx),
            other => Err(format!("unknown unit system '{}'", other)),
        }
    }
}

impl From<UnitSystem> for u8 {
    fn from(system: UnitSystem) -> Self {
        system.code()
    }
}

/// Accepted wire forms of a unit system: numeric code or name.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawUnitSystem {
    Code(u8),
    Name(String),
}

impl TryFrom<RawUnitSystem> for UnitSystem {
    type Error = String;

    fn try_from(raw: RawUnitSystem) -> Result<Self, Self::Error> {
        match raw {
            RawUnitSystem::Code(code) => UnitSystem::from_code(code)
                .ok_or_else(|| format!("unknown unit system code {}", code)),
            RawUnitSystem::Name(name) => name.parse(),
        }
    }
}

/// Physical quantity measured by a unit. Units convert only within a
/// dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Temperature,
    DegreeDay,
    Ratio,
    Speed,
    Angle,
    Pressure,
    PressureRate,
    Length,
    LengthRate,
    Irradiance,
    UvIndex,
    ElectricPotential,
    MassConcentration,
    Fraction,
    Illuminance,
    SoundLevel,
    Count,
    Time,
    Energy,
    Power,
    Volume,
}

/// Unit group of an observation, as in the weewx unit tables.
///
/// Several groups can share a dimension (rain and altitude are both
/// lengths) but resolve to different units per system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitGroup {
    Temperature,
    DegreeDay,
    Percent,
    Speed,
    Speed2,
    Direction,
    Pressure,
    PressureRate,
    Rain,
    RainRate,
    Altitude,
    Distance,
    Length,
    Radiation,
    Uv,
    Volt,
    Moisture,
    Concentration,
    Fraction,
    Illuminance,
    SoundLevel,
    Count,
    Interval,
    DeltaTime,
    Energy,
    Power,
    Volume,
}

impl UnitGroup {
    /// weewx group name (`group_temperature`, ...).
    pub fn name(self) -> &'static str {
        match self {
            UnitGroup::Temperature => "group_temperature",
            UnitGroup::DegreeDay => "group_degree_day",
            UnitGroup::Percent => "group_percent",
            UnitGroup::Speed => "group_speed",
            UnitGroup::Speed2 => "group_speed2",
            UnitGroup::Direction => "group_direction",
            UnitGroup::Pressure => "group_pressure",
            UnitGroup::PressureRate => "group_pressurerate",
            UnitGroup::Rain => "group_rain",
            UnitGroup::RainRate => "group_rainrate",
            UnitGroup::Altitude => "group_altitude",
            UnitGroup::Distance => "group_distance",
            UnitGroup::Length => "group_length",
            UnitGroup::Radiation => "group_radiation",
            UnitGroup::Uv => "group_uv",
            UnitGroup::Volt => "group_volt",
            UnitGroup::Moisture => "group_moisture",
            UnitGroup::Concentration => "group_concentration",
            UnitGroup::Fraction => "group_fraction",
            UnitGroup::Illuminance => "group_illuminance",
            UnitGroup::SoundLevel => "group_db",
            UnitGroup::Count => "group_count",
            UnitGroup::Interval => "group_interval",
            UnitGroup::DeltaTime => "group_deltatime",
            UnitGroup::Energy => "group_energy",
            UnitGroup::Power => "group_power",
            UnitGroup::Volume => "group_volume",
        }
    }

    /// Unit used for this group in the given unit system.
    pub fn unit_for(self, system: UnitSystem) -> Unit {
        use UnitSystem::{Metric, MetricWx, Us};
        match (self, system) {
            (UnitGroup::Temperature, Us) => Unit::DegreeF,
            (UnitGroup::Temperature, Metric | MetricWx) => Unit::DegreeC,
            (UnitGroup::DegreeDay, Us) => Unit::DegreeFDay,
            (UnitGroup::DegreeDay, Metric | MetricWx) => Unit::DegreeCDay,
            (UnitGroup::Percent, _) => Unit::Percent,
            (UnitGroup::Speed, Us) => Unit::MilePerHour,
            (UnitGroup::Speed, Metric) => Unit::KmPerHour,
            (UnitGroup::Speed, MetricWx) => Unit::MeterPerSecond,
            (UnitGroup::Speed2, Us) => Unit::MilePerHour2,
            (UnitGroup::Speed2, Metric) => Unit::KmPerHour2,
            (UnitGroup::Speed2, MetricWx) => Unit::MeterPerSecond2,
            (UnitGroup::Direction, _) => Unit::DegreeCompass,
            (UnitGroup::Pressure, Us) => Unit::InHg,
            (UnitGroup::Pressure, Metric | MetricWx) => Unit::Mbar,
            (UnitGroup::PressureRate, Us) => Unit::InHgPerHour,
            (UnitGroup::PressureRate, Metric | MetricWx) => Unit::MbarPerHour,
            (UnitGroup::Rain, Us) => Unit::Inch,
            (UnitGroup::Rain, Metric) => Unit::Cm,
            (UnitGroup::Rain, MetricWx) => Unit::Mm,
            (UnitGroup::RainRate, Us) => Unit::InchPerHour,
            (UnitGroup::RainRate, Metric) => Unit::CmPerHour,
            (UnitGroup::RainRate, MetricWx) => Unit::MmPerHour,
            (UnitGroup::Altitude, Us) => Unit::Foot,
            (UnitGroup::Altitude, Metric | MetricWx) => Unit::Meter,
            (UnitGroup::Distance, Us) => Unit::Mile,
            (UnitGroup::Distance, Metric | MetricWx) => Unit::Km,
            (UnitGroup::Length, Us) => Unit::Inch,
            (UnitGroup::Length, Metric | MetricWx) => Unit::Cm,
            (UnitGroup::Radiation, _) => Unit::WattPerMeterSquared,
            (UnitGroup::Uv, _) => Unit::UvIndex,
            (UnitGroup::Volt, _) => Unit::Volt,
            (UnitGroup::Moisture, _) => Unit::Centibar,
            (UnitGroup::Concentration, _) => Unit::MicrogramPerMeterCubed,
            (UnitGroup::Fraction, _) => Unit::Ppm,
            (UnitGroup::Illuminance, _) => Unit::Lux,
            (UnitGroup::SoundLevel, _) => Unit::Decibel,
            (UnitGroup::Count, _) => Unit::Count,
            (UnitGroup::Interval, _) => Unit::Minute,
            (UnitGroup::DeltaTime, _) => Unit::Second,
            (UnitGroup::Energy, _) => Unit::WattHour,
            (UnitGroup::Power, _) => Unit::Watt,
            (UnitGroup::Volume, Us) => Unit::Gallon,
            (UnitGroup::Volume, Metric | MetricWx) => Unit::Liter,
        }
    }

    /// Dimension shared by every unit of this group.
    pub fn dimension(self) -> Dimension {
        self.unit_for(UnitSystem::Us).dimension()
    }
}

impl fmt::Display for UnitGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A measurement unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Unit {
    DegreeC,
    DegreeF,
    DegreeK,
    DegreeCDay,
    DegreeFDay,
    Percent,
    MeterPerSecond,
    KmPerHour,
    MilePerHour,
    Knot,
    MeterPerSecond2,
    KmPerHour2,
    MilePerHour2,
    Knot2,
    DegreeCompass,
    Mbar,
    HPa,
    KPa,
    InHg,
    MmHg,
    Centibar,
    MbarPerHour,
    HPaPerHour,
    KPaPerHour,
    InHgPerHour,
    MmHgPerHour,
    Mm,
    Cm,
    Meter,
    Km,
    Inch,
    Foot,
    Mile,
    MmPerHour,
    CmPerHour,
    InchPerHour,
    WattPerMeterSquared,
    UvIndex,
    Volt,
    MicrogramPerMeterCubed,
    Ppm,
    Lux,
    Decibel,
    Count,
    Second,
    Minute,
    Hour,
    Day,
    WattHour,
    KilowattHour,
    MegaJoule,
    Watt,
    Kilowatt,
    Liter,
    Gallon,
    CubicFoot,
}

/// 1 inHg in mbar.
const INHG_MBAR: f64 = 33.863_886_666_7;
/// 1 mmHg in mbar.
const MMHG_MBAR: f64 = 1.333_223_874_15;

impl Unit {
    /// Every unit in the table.
    pub const ALL: [Unit; 56] = [
        Unit::DegreeC,
        Unit::DegreeF,
        Unit::DegreeK,
        Unit::DegreeCDay,
        Unit::DegreeFDay,
        Unit::Percent,
        Unit::MeterPerSecond,
        Unit::KmPerHour,
        Unit::MilePerHour,
        Unit::Knot,
        Unit::MeterPerSecond2,
        Unit::KmPerHour2,
        Unit::MilePerHour2,
        Unit::Knot2,
        Unit::DegreeCompass,
        Unit::Mbar,
        Unit::HPa,
        Unit::KPa,
        Unit::InHg,
        Unit::MmHg,
        Unit::Centibar,
        Unit::MbarPerHour,
        Unit::HPaPerHour,
        Unit::KPaPerHour,
        Unit::InHgPerHour,
        Unit::MmHgPerHour,
        Unit::Mm,
        Unit::Cm,
        Unit::Meter,
        Unit::Km,
        Unit::Inch,
        Unit::Foot,
        Unit::Mile,
        Unit::MmPerHour,
        Unit::CmPerHour,
        Unit::InchPerHour,
        Unit::WattPerMeterSquared,
        Unit::UvIndex,
        Unit::Volt,
        Unit::MicrogramPerMeterCubed,
        Unit::Ppm,
        Unit::Lux,
        Unit::Decibel,
        Unit::Count,
        Unit::Second,
        Unit::Minute,
        Unit::Hour,
        Unit::Day,
        Unit::WattHour,
        Unit::KilowattHour,
        Unit::MegaJoule,
        Unit::Watt,
        Unit::Kilowatt,
        Unit::Liter,
        Unit::Gallon,
        Unit::CubicFoot,
    ];

    /// weewx unit name.
    pub fn name(self) -> &'static str {
        match self {
            Unit::DegreeC => "degree_C",
            Unit::DegreeF => "degree_F",
            Unit::DegreeK => "degree_K",
            Unit::DegreeCDay => "degree_C_day",
            Unit::DegreeFDay => "degree_F_day",
            Unit::Percent => "percent",
            Unit::MeterPerSecond => "meter_per_second",
            Unit::KmPerHour => "km_per_hour",
            Unit::MilePerHour => "mile_per_hour",
            Unit::Knot => "knot",
            Unit::MeterPerSecond2 => "meter_per_second2",
            Unit::KmPerHour2 => "km_per_hour2",
            Unit::MilePerHour2 => "mile_per_hour2",
            Unit::Knot2 => "knot2",
            Unit::DegreeCompass => "degree_compass",
            Unit::Mbar => "mbar",
            Unit::HPa => "hPa",
            Unit::KPa => "kPa",
            Unit::InHg => "inHg",
            Unit::MmHg => "mmHg",
            Unit::Centibar => "centibar",
            Unit::MbarPerHour => "mbar_per_hour",
            Unit::HPaPerHour => "hPa_per_hour",
            Unit::KPaPerHour => "kPa_per_hour",
            Unit::InHgPerHour => "inHg_per_hour",
            Unit::MmHgPerHour => "mmHg_per_hour",
            Unit::Mm => "mm",
            Unit::Cm => "cm",
            Unit::Meter => "meter",
            Unit::Km => "km",
            Unit::Inch => "inch",
            Unit::Foot => "foot",
            Unit::Mile => "mile",
            Unit::MmPerHour => "mm_per_hour",
            Unit::CmPerHour => "cm_per_hour",
            Unit::InchPerHour => "inch_per_hour",
            Unit::WattPerMeterSquared => "watt_per_meter_squared",
            Unit::UvIndex => "uv_index",
            Unit::Volt => "volt",
            Unit::MicrogramPerMeterCubed => "microgram_per_meter_cubed",
            Unit::Ppm => "ppm",
            Unit::Lux => "lux",
            Unit::Decibel => "dB",
            Unit::Count => "count",
            Unit::Second => "second",
            Unit::Minute => "minute",
            Unit::Hour => "hour",
            Unit::Day => "day",
            Unit::WattHour => "watt_hour",
            Unit::KilowattHour => "kilowatt_hour",
            Unit::MegaJoule => "mega_joule",
            Unit::Watt => "watt",
            Unit::Kilowatt => "kilowatt",
            Unit::Liter => "liter",
            Unit::Gallon => "gallon",
            Unit::CubicFoot => "cubic_foot",
        }
    }

    /// Physical dimension of this unit.
    pub fn dimension(self) -> Dimension {
        match self {
            Unit::DegreeC | Unit::DegreeF | Unit::DegreeK => Dimension::Temperature,
            Unit::DegreeCDay | Unit::DegreeFDay => Dimension::DegreeDay,
            Unit::Percent => Dimension::Ratio,
            Unit::MeterPerSecond
            | Unit::KmPerHour
            | Unit::MilePerHour
            | Unit::Knot
            | Unit::MeterPerSecond2
            | Unit::KmPerHour2
            | Unit::MilePerHour2
            | Unit::Knot2 => Dimension::Speed,
            Unit::DegreeCompass => Dimension::Angle,
            Unit::Mbar | Unit::HPa | Unit::KPa | Unit::InHg | Unit::MmHg | Unit::Centibar => {
                Dimension::Pressure
            }
            Unit::MbarPerHour
            | Unit::HPaPerHour
            | Unit::KPaPerHour
            | Unit::InHgPerHour
            | Unit::MmHgPerHour => Dimension::PressureRate,
            Unit::Mm | Unit::Cm | Unit::Meter | Unit::Km | Unit::Inch | Unit::Foot | Unit::Mile => {
                Dimension::Length
            }
            Unit::MmPerHour | Unit::CmPerHour | Unit::InchPerHour => Dimension::LengthRate,
            Unit::WattPerMeterSquared => Dimension::Irradiance,
            Unit::UvIndex => Dimension::UvIndex,
            Unit::Volt => Dimension::ElectricPotential,
            Unit::MicrogramPerMeterCubed => Dimension::MassConcentration,
            Unit::Ppm => Dimension::Fraction,
            Unit::Lux => Dimension::Illuminance,
            Unit::Decibel => Dimension::SoundLevel,
            Unit::Count => Dimension::Count,
            Unit::Second | Unit::Minute | Unit::Hour | Unit::Day => Dimension::Time,
            Unit::WattHour | Unit::KilowattHour | Unit::MegaJoule => Dimension::Energy,
            Unit::Watt | Unit::Kilowatt => Dimension::Power,
            Unit::Liter | Unit::Gallon | Unit::CubicFoot => Dimension::Volume,
        }
    }

    /// `(scale, offset)` mapping this unit onto its dimension's base unit.
    pub(crate) fn affine(self) -> (f64, f64) {
        match self {
            // base: degree_C
            Unit::DegreeC => (1.0, 0.0),
            Unit::DegreeF => (5.0 / 9.0, -160.0 / 9.0),
            Unit::DegreeK => (1.0, -273.15),
            // base: degree_C_day
            Unit::DegreeCDay => (1.0, 0.0),
            Unit::DegreeFDay => (5.0 / 9.0, 0.0),
            // base: meter_per_second
            Unit::MeterPerSecond | Unit::MeterPerSecond2 => (1.0, 0.0),
            Unit::KmPerHour | Unit::KmPerHour2 => (1.0 / 3.6, 0.0),
            Unit::MilePerHour | Unit::MilePerHour2 => (0.447_04, 0.0),
            Unit::Knot | Unit::Knot2 => (1852.0 / 3600.0, 0.0),
            // base: mbar
            Unit::Mbar | Unit::HPa => (1.0, 0.0),
            Unit::KPa | Unit::Centibar => (10.0, 0.0),
            Unit::InHg => (INHG_MBAR, 0.0),
            Unit::MmHg => (MMHG_MBAR, 0.0),
            // base: mbar_per_hour
            Unit::MbarPerHour | Unit::HPaPerHour => (1.0, 0.0),
            Unit::KPaPerHour => (10.0, 0.0),
            Unit::InHgPerHour => (INHG_MBAR, 0.0),
            Unit::MmHgPerHour => (MMHG_MBAR, 0.0),
            // base: meter
            Unit::Mm => (0.001, 0.0),
            Unit::Cm => (0.01, 0.0),
            Unit::Meter => (1.0, 0.0),
            Unit::Km => (1000.0, 0.0),
            Unit::Inch => (0.0254, 0.0),
            Unit::Foot => (0.3048, 0.0),
            Unit::Mile => (1609.344, 0.0),
            // base: mm_per_hour
            Unit::MmPerHour => (1.0, 0.0),
            Unit::CmPerHour => (10.0, 0.0),
            Unit::InchPerHour => (25.4, 0.0),
            // base: second
            Unit::Second => (1.0, 0.0),
            Unit::Minute => (60.0, 0.0),
            Unit::Hour => (3600.0, 0.0),
            Unit::Day => (86_400.0, 0.0),
            // base: watt_hour
            Unit::WattHour => (1.0, 0.0),
            Unit::KilowattHour => (1000.0, 0.0),
            Unit::MegaJoule => (1.0e6 / 3600.0, 0.0),
            // base: watt
            Unit::Watt => (1.0, 0.0),
            Unit::Kilowatt => (1000.0, 0.0),
            // base: liter
            Unit::Liter => (1.0, 0.0),
            Unit::Gallon => (3.785_411_784, 0.0),
            Unit::CubicFoot => (28.316_846_592, 0.0),
            // single-unit dimensions
            Unit::Percent
            | Unit::DegreeCompass
            | Unit::WattPerMeterSquared
            | Unit::UvIndex
            | Unit::Volt
            | Unit::MicrogramPerMeterCubed
            | Unit::Ppm
            | Unit::Lux
            | Unit::Decibel
            | Unit::Count => (1.0, 0.0),
        }
    }

    /// printf-style format with the conventional display precision for
    /// this unit.
    pub fn default_format(self) -> FormatSpec {
        FormatSpec::fixed(self.default_precision())
    }

    /// Number of decimals shown by default.
    pub fn default_precision(self) -> usize {
        match self {
            Unit::Percent
            | Unit::DegreeCompass
            | Unit::KmPerHour
            | Unit::MilePerHour
            | Unit::Knot
            | Unit::Centibar
            | Unit::Meter
            | Unit::Foot
            | Unit::WattPerMeterSquared
            | Unit::MicrogramPerMeterCubed
            | Unit::Ppm
            | Unit::Lux
            | Unit::Decibel
            | Unit::Count
            | Unit::Second
            | Unit::Minute => 0,
            Unit::DegreeC
            | Unit::DegreeF
            | Unit::DegreeK
            | Unit::DegreeCDay
            | Unit::DegreeFDay
            | Unit::MeterPerSecond
            | Unit::MeterPerSecond2
            | Unit::KmPerHour2
            | Unit::MilePerHour2
            | Unit::Knot2
            | Unit::Mbar
            | Unit::HPa
            | Unit::MmHg
            | Unit::Mm
            | Unit::Km
            | Unit::Mile
            | Unit::MmPerHour
            | Unit::UvIndex
            | Unit::Volt
            | Unit::Hour
            | Unit::Day
            | Unit::WattHour
            | Unit::KilowattHour
            | Unit::Watt
            | Unit::Kilowatt
            | Unit::Liter
            | Unit::Gallon
            | Unit::CubicFoot => 1,
            Unit::KPa | Unit::Cm | Unit::Inch | Unit::CmPerHour | Unit::InchPerHour => 2,
            Unit::MegaJoule => 2,
            Unit::InHg | Unit::HPaPerHour => 3,
            Unit::MbarPerHour | Unit::KPaPerHour | Unit::MmHgPerHour => 4,
            Unit::InHgPerHour => 5,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Unit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(unit) = Unit::ALL.iter().find(|u| u.name() == trimmed) {
            return Ok(*unit);
        }

        // Symbols seen in hand-written station configs
        let unit = match trimmed {
            "°C" | "C" | "degC" => Unit::DegreeC,
            "°F" | "F" | "degF" => Unit::DegreeF,
            "K" => Unit::DegreeK,
            "%" => Unit::Percent,
            "m/s" => Unit::MeterPerSecond,
            "km/h" | "kph" => Unit::KmPerHour,
            "mph" => Unit::MilePerHour,
            "kt" | "kn" | "knots" => Unit::Knot,
            "°" | "deg" => Unit::DegreeCompass,
            "hpa" | "HPa" => Unit::HPa,
            "in" => Unit::Inch,
            "ft" => Unit::Foot,
            "m" => Unit::Meter,
            "mm/h" => Unit::MmPerHour,
            "in/h" => Unit::InchPerHour,
            "W/m²" | "W/m2" => Unit::WattPerMeterSquared,
            "µg/m³" | "ug/m3" => Unit::MicrogramPerMeterCubed,
            "V" => Unit::Volt,
            "lx" => Unit::Lux,
            "db" => Unit::Decibel,
            "s" => Unit::Second,
            "min" => Unit::Minute,
            "h" => Unit::Hour,
            "Wh" => Unit::WattHour,
            "kWh" => Unit::KilowattHour,
            "MJ" => Unit::MegaJoule,
            "W" => Unit::Watt,
            "kW" => Unit::Kilowatt,
            "l" | "L" | "litre" => Unit::Liter,
            "gal" => Unit::Gallon,
            _ => return Err(UnitError::UnknownUnit(trimmed.to_string())),
        };
        Ok(unit)
    }
}

impl TryFrom<String> for Unit {
    type Error = UnitError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.name().to_string()
    }
}
