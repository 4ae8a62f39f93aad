use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::chart::{BodyId, ChartKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectType {
    Conjunction,
    Opposition,
    Trine,
    Square,
    Sextile,
    Quincunx,
    Semisextile,
}

impl AspectType {
    /// Major aspects in order of frequency (most common first)
    pub const MAJOR: [AspectType; 5] = [
        AspectType::Conjunction,
        AspectType::Opposition,
        AspectType::Trine,
        AspectType::Square,
        AspectType::Sextile,
    ];

    pub const MINOR: [AspectType; 2] = [AspectType::Quincunx, AspectType::Semisextile];

    /// Exact angle for this aspect
    pub fn angle(self) -> f64 {
        match self {
            AspectType::Conjunction => 0.0,
            AspectType::Semisextile => 30.0,
            AspectType::Sextile => 60.0,
            AspectType::Square => 90.0,
            AspectType::Trine => 120.0,
            AspectType::Quincunx => 150.0,
            AspectType::Opposition => 180.0,
        }
    }

    pub fn is_major(self) -> bool {
        Self::MAJOR.contains(&self)
    }

    /// Two-chart orb used when nothing overrides it
    pub fn default_orb(self) -> f64 {
        match self {
            AspectType::Conjunction | AspectType::Opposition => 8.0,
            AspectType::Trine => 7.0,
            AspectType::Square => 6.0,
            AspectType::Sextile => 4.0,
            AspectType::Quincunx => 3.0,
            AspectType::Semisextile => 2.0,
        }
    }

    /// Fixed score bonus; conjunction/opposition/trine/square > sextile > minor
    pub fn priority_bonus(self) -> f64 {
        match self {
            AspectType::Conjunction => 30.0,
            AspectType::Opposition => 28.0,
            AspectType::Trine => 25.0,
            AspectType::Square => 25.0,
            AspectType::Sextile => 15.0,
            AspectType::Quincunx => 8.0,
            AspectType::Semisextile => 5.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AspectType::Conjunction => "conjunction",
            AspectType::Opposition => "opposition",
            AspectType::Trine => "trine",
            AspectType::Square => "square",
            AspectType::Sextile => "sextile",
            AspectType::Quincunx => "quincunx",
            AspectType::Semisextile => "semisextile",
        }
    }
}

impl fmt::Display for AspectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Geometry of one aspect, independent of which charts the points came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AspectCore {
    pub aspect: AspectType,
    /// Exact angle for this aspect (0, 60, 90, 120, 180, ...)
    pub exact_angle: f64,
    /// Actual separation, 0..=180
    pub separation: f64,
    /// |separation - exact_angle|
    pub orb: f64,
    /// separation - exact_angle (positive when wider than exact)
    pub signed_orb: f64,
    /// Whether the gap to exact is currently closing
    pub applying: bool,
}

/// One end of an aspect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AspectEndpoint {
    pub body: BodyId,
    pub chart: ChartKind,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AspectHit {
    pub from: AspectEndpoint,
    pub to: AspectEndpoint,
    #[serde(flatten)]
    pub core: AspectCore,
    pub score: f64,
}

impl AspectHit {
    pub fn aspect(&self) -> AspectType {
        self.core.aspect
    }

    pub fn orb(&self) -> f64 {
        self.core.orb
    }

    pub fn involves(&self, body: BodyId) -> bool {
        self.from.body == body || self.to.body == body
    }
}

/// Per-query options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AspectRules {
    /// Also test the policy's minor aspects
    pub include_minor: bool,
    /// Per-body orb overrides; zero (or less) drops the body entirely
    pub orbs: HashMap<BodyId, f64>,
    pub max_results: Option<usize>,
}

/// Orb per aspect type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbTable {
    pub conjunction: f64,
    pub opposition: f64,
    pub trine: f64,
    pub square: f64,
    pub sextile: f64,
    pub quincunx: f64,
    pub semisextile: f64,
}

impl OrbTable {
    pub fn uniform(orb: f64) -> Self {
        Self {
            conjunction: orb,
            opposition: orb,
            trine: orb,
            square: orb,
            sextile: orb,
            quincunx: orb,
            semisextile: orb,
        }
    }

    pub fn get(&self, aspect: AspectType) -> f64 {
        match aspect {
            AspectType::Conjunction => self.conjunction,
            AspectType::Opposition => self.opposition,
            AspectType::Trine => self.trine,
            AspectType::Square => self.square,
            AspectType::Sextile => self.sextile,
            AspectType::Quincunx => self.quincunx,
            AspectType::Semisextile => self.semisextile,
        }
    }
}

impl Default for OrbTable {
    fn default() -> Self {
        let d = AspectType::default_orb;
        Self {
            conjunction: d(AspectType::Conjunction),
            opposition: d(AspectType::Opposition),
            trine: d(AspectType::Trine),
            square: d(AspectType::Square),
            sextile: d(AspectType::Sextile),
            quincunx: d(AspectType::Quincunx),
            semisextile: d(AspectType::Semisextile),
        }
    }
}

/// Tunable constants of the aspect finder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AspectPolicy {
    /// Two-chart orbs per aspect type
    pub orbs: OrbTable,
    /// Added to every default orb when a chart is aspected against itself
    pub natal_widening: f64,
    /// Aspects enabled by `AspectRules::include_minor`
    pub minor_aspects: Vec<AspectType>,
}

impl Default for AspectPolicy {
    fn default() -> Self {
        Self {
            orbs: OrbTable::default(),
            natal_widening: 3.0,
            minor_aspects: AspectType::MINOR.to_vec(),
        }
    }
}

impl AspectPolicy {
    /// Same orb for every aspect and no natal widening
    pub fn uniform(orb: f64) -> Self {
        Self {
            orbs: OrbTable::uniform(orb),
            natal_widening: 0.0,
            minor_aspects: AspectType::MINOR.to_vec(),
        }
    }

    pub fn orb_for(&self, aspect: AspectType) -> f64 {
        self.orbs.get(aspect)
    }
}
