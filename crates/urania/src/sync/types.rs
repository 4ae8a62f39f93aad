use serde::{Deserialize, Serialize};
use std::fmt;

use crate::saju::{DaeunInfo, Element, ElementRelation, Pillar};

/// Cyclical transit markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransitType {
    JupiterReturn,
    SaturnReturn,
    NodalReturn,
    SaturnOpposition,
    UranusOpposition,
}

impl TransitType {
    pub fn label(self) -> &'static str {
        match self {
            TransitType::JupiterReturn => "Jupiter return",
            TransitType::SaturnReturn => "Saturn return",
            TransitType::NodalReturn => "Nodal return",
            TransitType::SaturnOpposition => "Saturn opposition",
            TransitType::UranusOpposition => "Uranus opposition",
        }
    }
}

impl fmt::Display for TransitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One occurrence of a cycle near a given age
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitEvent {
    #[serde(rename = "type")]
    pub transit_type: TransitType,
    /// 1 for the first occurrence
    pub cycle_number: u32,
    /// Exact age of the occurrence
    pub center_age: f64,
    pub window_start: f64,
    pub window_end: f64,
    /// |age - center_age|
    pub distance: f64,
    pub element: Element,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SynergyType {
    Amplify,
    Clash,
    Neutral,
}

impl SynergyType {
    /// Synergy of a Daeun element meeting a transit element; control in
    /// either direction clashes.
    pub fn from_relation(daeun_to_transit: ElementRelation) -> Self {
        match daeun_to_transit {
            ElementRelation::Same | ElementRelation::Generates | ElementRelation::GeneratedBy => {
                SynergyType::Amplify
            }
            ElementRelation::Controls | ElementRelation::ControlledBy => SynergyType::Clash,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tier5Metrics {
    /// 0..=100
    pub solar_term_alignment: f64,
    /// 0..=100
    pub east_west_harmony: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPoint {
    pub age: i32,
    pub year: i32,
    pub daeun: DaeunInfo,
    pub transits: Vec<TransitEvent>,
    /// 0..=100
    pub synergy_score: f64,
    pub synergy_type: SynergyType,
    pub themes: Vec<String>,
    pub opportunities: Vec<String>,
    pub challenges: Vec<String>,
    pub advice: String,
    /// 0..=100
    pub confidence: f64,
    pub is_transition_window: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tier5: Option<Tier5Metrics>,
}

impl SyncPoint {
    pub fn dominant_transit(&self) -> Option<&TransitEvent> {
        self.transits.first()
    }
}

/// Hand-over between two consecutive Daeun (or into the first / out of the last)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MajorTransition {
    /// First age of the incoming period
    pub age: i32,
    pub year: i32,
    pub window_start_age: i32,
    pub window_end_age: i32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub from: Option<Pillar>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub to: Option<Pillar>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub from_element: Option<Element>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub to_element: Option<Element>,
    /// Transits inside the window
    pub coinciding_transits: Vec<TransitType>,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearMarker {
    pub age: i32,
    pub year: i32,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tier5Summary {
    pub average_solar_term_alignment: f64,
    pub average_east_west_harmony: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub most_harmonious_age: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncAnalysisResult {
    pub birth_year: i32,
    pub current_age: i32,
    pub sync_points: Vec<SyncPoint>,
    pub major_transitions: Vec<MajorTransition>,
    pub peak_years: Vec<YearMarker>,
    pub challenge_years: Vec<YearMarker>,
    pub life_cycle_pattern: String,
    /// 0..=100
    pub overall_confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tier5_summary: Option<Tier5Summary>,
}

impl SyncAnalysisResult {
    pub fn point_at(&self, age: i32) -> Option<&SyncPoint> {
        self.sync_points.iter().find(|p| p.age == age)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncOptions {
    pub enable_tier5: bool,
}
