use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::angles::{normalize, sign_of, ZodiacSign};
use crate::chart::house_of;

/// A named point that can carry a longitude in a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyId {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Chiron,
    NorthNode,
    SouthNode,
    Ascendant,
    Midheaven,
}

impl BodyId {
    /// Bodies an ephemeris is asked for by default (angles are computed with the houses).
    pub const DEFAULT_BODIES: [BodyId; 12] = [
        BodyId::Sun,
        BodyId::Moon,
        BodyId::Mercury,
        BodyId::Venus,
        BodyId::Mars,
        BodyId::Jupiter,
        BodyId::Saturn,
        BodyId::Uranus,
        BodyId::Neptune,
        BodyId::Pluto,
        BodyId::NorthNode,
        BodyId::SouthNode,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BodyId::Sun => "sun",
            BodyId::Moon => "moon",
            BodyId::Mercury => "mercury",
            BodyId::Venus => "venus",
            BodyId::Mars => "mars",
            BodyId::Jupiter => "jupiter",
            BodyId::Saturn => "saturn",
            BodyId::Uranus => "uranus",
            BodyId::Neptune => "neptune",
            BodyId::Pluto => "pluto",
            BodyId::Chiron => "chiron",
            BodyId::NorthNode => "north_node",
            BodyId::SouthNode => "south_node",
            BodyId::Ascendant => "ascendant",
            BodyId::Midheaven => "midheaven",
        }
    }

    pub fn is_angle(self) -> bool {
        matches!(self, BodyId::Ascendant | BodyId::Midheaven)
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BodyId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = match s.trim().to_lowercase().as_str() {
            "sun" => BodyId::Sun,
            "moon" => BodyId::Moon,
            "mercury" => BodyId::Mercury,
            "venus" => BodyId::Venus,
            "mars" => BodyId::Mars,
            "jupiter" => BodyId::Jupiter,
            "saturn" => BodyId::Saturn,
            "uranus" => BodyId::Uranus,
            "neptune" => BodyId::Neptune,
            "pluto" => BodyId::Pluto,
            "chiron" => BodyId::Chiron,
            "north_node" | "northnode" | "true_node" | "rahu" => BodyId::NorthNode,
            "south_node" | "southnode" | "ketu" => BodyId::SouthNode,
            "asc" | "ascendant" => BodyId::Ascendant,
            "mc" | "midheaven" => BodyId::Midheaven,
            other => return Err(format!("Unknown body: {}", other)),
        };
        Ok(id)
    }
}

/// A placed point of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    pub id: BodyId,
    /// Longitude in degrees (0-360)
    pub longitude: f64,
    pub sign: ZodiacSign,
    pub degree_in_sign: f64,
    /// 1..=12
    pub house: u8,
    /// Degrees per day, negative when retrograde. None when the source gave no speed.
    pub speed: Option<f64>,
}

impl Body {
    /// Place a longitude against a set of house cusps.
    pub fn new(id: BodyId, longitude: f64, speed: Option<f64>, cusps: &[f64; 12]) -> Self {
        let longitude = normalize(longitude);
        let pos = sign_of(longitude);
        Self {
            id,
            longitude,
            sign: pos.sign,
            degree_in_sign: pos.degree_in_sign,
            house: house_of(longitude, cusps),
            speed,
        }
    }

    pub fn is_retrograde(&self) -> bool {
        self.speed.map(|s| s < 0.0).unwrap_or(false)
    }

    pub fn is_angle(&self) -> bool {
        self.id.is_angle()
    }
}
