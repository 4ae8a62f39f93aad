use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chart::BodyId;
use crate::error::EphemerisError;

/// Geographic location coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Degrees, north positive
    pub lat: f64,
    /// Degrees, east positive
    pub lon: f64,
}

/// Raw position of one body as reported by an ephemeris
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyPosition {
    pub id: BodyId,
    /// Longitude in degrees (0-360)
    pub lon: f64,
    /// Latitude in degrees
    pub lat: f64,
    /// Speed in longitude (degrees per day), when the backend provides it
    pub speed_lon: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseSystem {
    Placidus,
    Koch,
    Porphyry,
    Equal,
    WholeSign,
    Regiomontanus,
    Campanus,
    Alcabitius,
    Morinus,
}

impl HouseSystem {
    /// Single-letter code used by the Swiss Ephemeris
    pub fn swiss_code(self) -> u8 {
        match self {
            HouseSystem::Placidus => b'P',
            HouseSystem::Koch => b'K',
            HouseSystem::Porphyry => b'O',
            HouseSystem::Equal => b'E',
            HouseSystem::WholeSign => b'W',
            HouseSystem::Regiomontanus => b'R',
            HouseSystem::Campanus => b'C',
            HouseSystem::Alcabitius => b'B',
            HouseSystem::Morinus => b'M',
        }
    }
}

/// House cusps and angles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HousePositions {
    pub system: HouseSystem,
    /// Cusps of houses 1..12, in order
    pub cusps: [f64; 12],
    pub ascendant: f64,
    pub midheaven: f64,
}

/// Complete raw output of an ephemeris for one moment and place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPositions {
    pub bodies: Vec<BodyPosition>,
    pub houses: HousePositions,
}

impl ChartPositions {
    pub fn body(&self, id: BodyId) -> Option<&BodyPosition> {
        self.bodies.iter().find(|b| b.id == id)
    }
}

/// Settings for ephemeris calculations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EphemerisSettings {
    pub house_system: HouseSystem,
    /// Bodies to compute; angles always come with the houses
    pub include_objects: Vec<BodyId>,
}

impl Default for EphemerisSettings {
    fn default() -> Self {
        Self {
            house_system: HouseSystem::Placidus,
            include_objects: BodyId::DEFAULT_BODIES.to_vec(),
        }
    }
}

/// Source of planetary positions.
///
/// This is the only boundary where the core reaches outside itself; every
/// calculator treats the returned positions as frozen input.
pub trait EphemerisProvider {
    /// All configured bodies plus houses and angles for an instant and place.
    fn compute_positions(
        &self,
        moment: DateTime<Utc>,
        location: &GeoLocation,
    ) -> Result<ChartPositions, EphemerisError>;

    /// Geocentric ecliptic longitude of a single body (used by return searches).
    fn body_longitude(&self, body: BodyId, moment: DateTime<Utc>) -> Result<f64, EphemerisError>;
}
