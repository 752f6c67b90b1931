use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use super::approx::{geographic_to_utm, parse_float, to_fixed, utm_to_geographic};

pub const MISSING_INPUT_MESSAGE: &str = "يرجى إدخال جميع البيانات المطلوبة";

const GEOGRAPHIC_DIGITS: usize = 6;
const UTM_DIGITS: usize = 2;

fn cycle<T: IntoEnumIterator + PartialEq + Copy>(current: T, forward: bool) -> T {
    let all: Vec<T> = T::iter().collect();
    let position = all.iter().position(|item| *item == current).unwrap_or(0);
    let index = if forward {
        (position + 1) % all.len()
    } else {
        (position + all.len() - 1) % all.len()
    };
    all[index]
}

/// Which way the form converts; decides the visible inputs and the formula.
#[derive(
    Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter,
)]
pub enum Direction {
    #[default]
    UtmToGeographic,
    GeographicToUtm,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::UtmToGeographic => "UTM إلى جغرافي",
            Direction::GeographicToUtm => "جغرافي إلى UTM",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Direction::UtmToGeographic => "utm-to-geo",
            Direction::GeographicToUtm => "geo-to-utm",
        }
    }

    pub fn next(self) -> Self {
        cycle(self, true)
    }

    pub fn previous(self) -> Self {
        cycle(self, false)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        Direction::iter()
            .find(|direction| direction.key() == value)
            .ok_or_else(|| anyhow!("unknown conversion direction: {value}"))
    }
}

/// The UTM zones offered by the zone select.
#[derive(
    Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter,
)]
pub enum UtmZone {
    Zone35,
    #[default]
    Zone36,
    Zone37,
    Zone38,
}

impl UtmZone {
    pub fn number(&self) -> u8 {
        match self {
            UtmZone::Zone35 => 35,
            UtmZone::Zone36 => 36,
            UtmZone::Zone37 => 37,
            UtmZone::Zone38 => 38,
        }
    }

    pub fn next(self) -> Self {
        cycle(self, true)
    }

    pub fn previous(self) -> Self {
        cycle(self, false)
    }
}

impl fmt::Display for UtmZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl FromStr for UtmZone {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        UtmZone::iter()
            .find(|zone| zone.to_string() == value.trim())
            .ok_or_else(|| anyhow!("unsupported UTM zone: {value}"))
    }
}

/// A free-text input of the form.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Easting,
    Northing,
    Latitude,
    Longitude,
}

impl Field {
    /// The direction under which this field is shown.
    pub fn direction(&self) -> Direction {
        match self {
            Field::Easting | Field::Northing => Direction::UtmToGeographic,
            Field::Latitude | Field::Longitude => Direction::GeographicToUtm,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Easting => "الإحداثي الشرقي (Easting)",
            Field::Northing => "الإحداثي الشمالي (Northing)",
            Field::Latitude => "خط العرض (Latitude)",
            Field::Longitude => "خط الطول (Longitude)",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Field::Easting => "أدخل الإحداثي الشرقي",
            Field::Northing => "أدخل الإحداثي الشمالي",
            Field::Latitude => "أدخل خط العرض",
            Field::Longitude => "أدخل خط الطول",
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtmInput {
    pub easting: String,
    pub northing: String,
    /// Selected but never read by the arithmetic.
    pub zone: UtmZone,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoInput {
    pub latitude: String,
    pub longitude: String,
}

/// What the result area shows after a conversion attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionResult {
    MissingInput,
    Geographic { latitude: String, longitude: String },
    Utm { easting: String, northing: String },
}

impl fmt::Display for ConversionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionResult::MissingInput => f.write_str(MISSING_INPUT_MESSAGE),
            ConversionResult::Geographic {
                latitude,
                longitude,
            } => write!(f, "خط العرض: {latitude}°\nخط الطول: {longitude}°"),
            ConversionResult::Utm { easting, northing } => {
                write!(f, "الإحداثي الشرقي: {easting} متر\nالإحداثي الشمالي: {northing} متر")
            }
        }
    }
}

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    Busy,
}

/// The inputs as they stood when a conversion was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingConversion {
    pub direction: Direction,
    pub utm: UtmInput,
    pub geo: GeoInput,
}

impl PendingConversion {
    pub fn evaluate(&self) -> ConversionResult {
        match self.direction {
            Direction::UtmToGeographic => {
                let UtmInput {
                    easting, northing, ..
                } = &self.utm;
                if easting.is_empty() || northing.is_empty() {
                    return ConversionResult::MissingInput;
                }
                let point = utm_to_geographic(parse_float(easting), parse_float(northing));
                ConversionResult::Geographic {
                    latitude: to_fixed(point.latitude, GEOGRAPHIC_DIGITS),
                    longitude: to_fixed(point.longitude, GEOGRAPHIC_DIGITS),
                }
            }
            Direction::GeographicToUtm => {
                let GeoInput {
                    latitude,
                    longitude,
                } = &self.geo;
                if latitude.is_empty() || longitude.is_empty() {
                    return ConversionResult::MissingInput;
                }
                let point = geographic_to_utm(parse_float(latitude), parse_float(longitude));
                ConversionResult::Utm {
                    easting: to_fixed(point.easting, UTM_DIGITS),
                    northing: to_fixed(point.northing, UTM_DIGITS),
                }
            }
        }
    }
}

/// Transient state of the conversion card.
///
/// Both input groups are always held; [`Direction`] only decides which one is
/// shown and read. Transitions never clear the hidden group.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionForm {
    direction: Direction,
    utm: UtmInput,
    geo: GeoInput,
    result: Option<ConversionResult>,
    phase: Phase,
}

impl ConversionForm {
    pub fn new(direction: Direction, zone: UtmZone) -> Self {
        Self {
            direction,
            utm: UtmInput {
                zone,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn utm(&self) -> &UtmInput {
        &self.utm
    }

    pub fn geo(&self) -> &GeoInput {
        &self.geo
    }

    pub fn zone(&self) -> UtmZone {
        self.utm.zone
    }

    pub fn select_zone(&mut self, zone: UtmZone) {
        self.utm.zone = zone;
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Easting => &self.utm.easting,
            Field::Northing => &self.utm.northing,
            Field::Latitude => &self.geo.latitude,
            Field::Longitude => &self.geo.longitude,
        }
    }

    pub fn update_field(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Easting => &mut self.utm.easting,
            Field::Northing => &mut self.utm.northing,
            Field::Latitude => &mut self.geo.latitude,
            Field::Longitude => &mut self.geo.longitude,
        };
        *slot = value.into();
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase == Phase::Busy
    }

    pub fn result(&self) -> Option<&ConversionResult> {
        self.result.as_ref()
    }

    /// Marks the form busy and captures the inputs the conversion will use.
    ///
    /// Does not refuse while already busy; the caller decides whether a second
    /// request is allowed.
    pub fn begin_conversion(&mut self) -> PendingConversion {
        self.phase = Phase::Busy;
        PendingConversion {
            direction: self.direction,
            utm: self.utm.clone(),
            geo: self.geo.clone(),
        }
    }

    pub fn finish_conversion(&mut self, result: ConversionResult) {
        self.result = Some(result);
        self.phase = Phase::Idle;
    }

    /// Runs a whole conversion without waiting.
    pub fn convert(&mut self) -> &ConversionResult {
        let result = self.begin_conversion().evaluate();
        self.phase = Phase::Idle;
        self.result.insert(result)
    }
}
