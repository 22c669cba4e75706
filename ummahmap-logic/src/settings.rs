use serde::{Deserialize, Serialize};

use crate::location::Location;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
/// AlAdhan calculation method id
pub struct CalculationMethod(pub u8);

impl CalculationMethod {
    /// Islamic Society of North America
    pub const ISNA: Self = Self(2);
}

impl Default for CalculationMethod {
    fn default() -> Self {
        Self::ISNA
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(into = "u8", try_from = "u8")]
/// Juristic school, only changes how Asr is calculated
pub enum School {
    #[default]
    Shafi,
    Hanafi,
}

impl From<School> for u8 {
    fn from(value: School) -> Self {
        match value {
            School::Shafi => 0,
            School::Hanafi => 1,
        }
    }
}

impl TryFrom<u8> for School {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Shafi),
            1 => Ok(Self::Hanafi),
            other => Err(format!("Unknown school {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
/// Parameters for a prayer times lookup
pub struct PrayerQuery {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub method: CalculationMethod,
    #[serde(default)]
    pub school: School,
}

impl PrayerQuery {
    pub fn at(location: Location) -> Self {
        Self {
            lat: location.lat,
            lng: location.lng,
            method: CalculationMethod::default(),
            school: School::default(),
        }
    }
}
