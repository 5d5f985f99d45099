// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Observation name to unit group table.
//!
//! Names are the weewx archive column names. Numbered families
//! (`extraTemp1`..`extraTemp8`, `soilMoist1`..`soilMoist4`, ...) are
//! resolved from their stem.

use crate::unit::UnitGroup;

/// Resolve the unit group of an observation field.
///
/// Returns `None` for fields with no physical dimension (`usUnits`,
/// `dateTime`, battery flags, ...).
pub fn group_for_observation(name: &str) -> Option<UnitGroup> {
    if let Some(group) = exact_group(name) {
        return Some(group);
    }

    let stem = name.trim_end_matches(|c: char| c.is_ascii_digit());
    if stem.len() == name.len() || stem.is_empty() {
        return None;
    }
    numbered_group(stem)
}

fn exact_group(name: &str) -> Option<UnitGroup> {
    let group = match name {
        "outTemp" | "inTemp" | "dewpoint" | "inDewpoint" | "windchill" | "heatindex"
        | "appTemp" | "humidex" | "THSW" | "outTempMax" | "outTempMin" | "wetbulb" => {
            UnitGroup::Temperature
        }
        "cooldeg" | "heatdeg" | "growdeg" => UnitGroup::DegreeDay,
        "outHumidity" | "inHumidity" | "rxCheckPercent" | "cloudcover" | "pop" => {
            UnitGroup::Percent
        }
        "windSpeed" | "windGust" | "windSpeed10" | "wind" => UnitGroup::Speed,
        "rms" | "vecavg" => UnitGroup::Speed2,
        "windDir" | "windGustDir" | "vecdir" => UnitGroup::Direction,
        "barometer" | "pressure" | "altimeter" => UnitGroup::Pressure,
        "barometerRate" | "pressureRate" | "altimeterRate" => UnitGroup::PressureRate,
        "rain" | "hourRain" | "dayRain" | "monthRain" | "yearRain" | "rain24" | "stormRain"
        | "totalRain" | "ET" | "hail" | "snow" => UnitGroup::Rain,
        "rainRate" | "hailRate" | "snowRate" => UnitGroup::RainRate,
        "altitude" | "cloudbase" => UnitGroup::Altitude,
        "windrun" | "lightning_distance" => UnitGroup::Distance,
        "snowDepth" => UnitGroup::Length,
        "radiation" | "maxSolarRad" => UnitGroup::Radiation,
        "UV" => UnitGroup::Uv,
        "consBatteryVoltage" | "heatingVoltage" | "referenceVoltage" | "supplyVoltage"
        | "batteryVoltage" => UnitGroup::Volt,
        "pm1_0" | "pm2_5" | "pm10_0" => UnitGroup::Concentration,
        "co" | "co2" | "nh3" | "no2" | "o3" | "so2" => UnitGroup::Fraction,
        "luminosity" | "illuminance" => UnitGroup::Illuminance,
        "noise" => UnitGroup::SoundLevel,
        "lightning_strike_count" | "lightning_disturber_count" | "lightning_noise_count" => {
            UnitGroup::Count
        }
        "interval" => UnitGroup::Interval,
        "sunshineDur" | "daySunshineDur" => UnitGroup::DeltaTime,
        "energy" | "lightning_energy" => UnitGroup::Energy,
        "power" => UnitGroup::Power,
        "waterVolume" => UnitGroup::Volume,
        _ => return None,
    };
    Some(group)
}

fn numbered_group(stem: &str) -> Option<UnitGroup> {
    let group = match stem {
        "extraTemp" | "soilTemp" | "leafTemp" => UnitGroup::Temperature,
        "extraHumid" => UnitGroup::Percent,
        "soilMoist" => UnitGroup::Moisture,
        "leafWet" => UnitGroup::Count,
        _ => return None,
    };
    Some(group)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_observations() {
        assert_eq!(group_for_observation("outTemp"), Some(UnitGroup::Temperature));
        assert_eq!(group_for_observation("outHumidity"), Some(UnitGroup::Percent));
        assert_eq!(group_for_observation("windSpeed"), Some(UnitGroup::Speed));
        assert_eq!(group_for_observation("barometer"), Some(UnitGroup::Pressure));
        assert_eq!(group_for_observation("dayRain"), Some(UnitGroup::Rain));
        assert_eq!(group_for_observation("pm2_5"), Some(UnitGroup::Concentration));
    }

    #[test]
    fn test_numbered_families() {
        assert_eq!(group_for_observation("extraTemp1"), Some(UnitGroup::Temperature));
        assert_eq!(group_for_observation("extraTemp8"), Some(UnitGroup::Temperature));
        assert_eq!(group_for_observation("soilMoist3"), Some(UnitGroup::Moisture));
        assert_eq!(group_for_observation("extraHumid2"), Some(UnitGroup::Percent));
        assert_eq!(group_for_observation("leafWet1"), Some(UnitGroup::Count));
    }

    #[test]
    fn test_unknown_observations() {
        assert_eq!(group_for_observation("usUnits"), None);
        assert_eq!(group_for_observation("dateTime"), None);
        assert_eq!(group_for_observation("extraTemp"), None);
        assert_eq!(group_for_observation("bogus42"), None);
        assert_eq!(group_for_observation("42"), None);
    }
}
