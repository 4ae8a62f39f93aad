//! Daeun / transit synchronizer.
//!
//! Each modeled age is scored on its own: the active Daeun element is set
//! against the element of the closest transit cycle, then the results are
//! folded into peaks, challenges and transitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::saju::{active_daeun, DaeunInfo, Element, ElementRelation};
use crate::sync::cycles::{default_cycles, detect_transits, CycleSpec, MAX_MODELED_AGE};
use crate::sync::narrative;
use crate::sync::types::{
    MajorTransition, SyncAnalysisResult, SyncOptions, SyncPoint, SynergyType, Tier5Metrics,
    Tier5Summary, TransitEvent, TransitType, YearMarker,
};

/// Widest accepted `boundary_window`
pub const MAX_BOUNDARY_WINDOW: i32 = 10;

/// Synchronizer tunables (`[sync]` in the config file)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub cycles: Vec<CycleSpec>,
    /// Years either side of a cycle centre that still count (inclusive)
    pub tolerance_years: f64,
    /// Score with no transit in play
    pub base_score: f64,
    /// Amplify points at or above this are peak years
    pub peak_threshold: f64,
    /// Clash points at or below this are challenge years
    pub challenge_threshold: f64,
    /// Ages within this many years of a Daeun boundary form its window,
    /// at most `MAX_BOUNDARY_WINDOW`
    pub boundary_window: i32,
    /// Confidence of a point with no transit
    pub quiet_confidence: f64,
    /// Starting confidence of a point with a transit
    pub base_confidence: f64,
    /// Extra confidence for a transit at its exact centre
    pub transit_confidence: f64,
    /// Extra confidence when a transit coincides with a Daeun boundary
    pub boundary_corroboration: f64,
    /// Extra confidence per additional co-occurring transit
    pub overlap_corroboration: f64,
    /// Weight of secondary transits relative to the dominant one
    pub secondary_weight: f64,
    pub relation_deltas: RelationDeltas,
}

/// Score delta per Daeun-to-transit element relation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationDeltas {
    pub same: f64,
    pub transit_generates_daeun: f64,
    pub daeun_generates_transit: f64,
    pub daeun_controls_transit: f64,
    pub transit_controls_daeun: f64,
}

impl Default for RelationDeltas {
    fn default() -> Self {
        Self {
            same: 25.0,
            transit_generates_daeun: 20.0,
            daeun_generates_transit: 12.0,
            daeun_controls_transit: -5.0,
            transit_controls_daeun: -25.0,
        }
    }
}

impl RelationDeltas {
    fn delta(&self, daeun_to_transit: ElementRelation) -> f64 {
        match daeun_to_transit {
            ElementRelation::Same => self.same,
            ElementRelation::GeneratedBy => self.transit_generates_daeun,
            ElementRelation::Generates => self.daeun_generates_transit,
            ElementRelation::Controls => self.daeun_controls_transit,
            ElementRelation::ControlledBy => self.transit_controls_daeun,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            cycles: default_cycles(),
            tolerance_years: 1.0,
            base_score: 50.0,
            peak_threshold: 70.0,
            challenge_threshold: 35.0,
            boundary_window: 1,
            quiet_confidence: 50.0,
            base_confidence: 60.0,
            transit_confidence: 25.0,
            boundary_corroboration: 10.0,
            overlap_corroboration: 5.0,
            secondary_weight: 0.5,
            relation_deltas: RelationDeltas::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DaeunTransitSynchronizer {
    config: SyncConfig,
}

impl DaeunTransitSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SyncConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn analyze(
        &self,
        daeun_list: &[DaeunInfo],
        birth_year: i32,
        current_age: i32,
        options: &SyncOptions,
    ) -> SyncAnalysisResult {
        let boundaries = boundary_ages(daeun_list);
        let window_ages = self.window_ages(&boundaries);

        let sync_points: Vec<SyncPoint> = modeled_ages(daeun_list)
            .filter_map(|age| {
                let daeun = active_daeun(daeun_list, age)?;
                Some(self.sync_point(daeun, age, birth_year, window_ages.contains(&age), options))
            })
            .collect();
        log::debug!(
            "sync analysis: {} daeun, {} points, tier5 {}",
            daeun_list.len(),
            sync_points.len(),
            options.enable_tier5
        );

        let major_transitions = self.major_transitions(daeun_list, &boundaries, birth_year);
        let peak_years = markers(&sync_points, |p| {
            p.synergy_type == SynergyType::Amplify && p.synergy_score >= self.config.peak_threshold
        });
        let challenge_years = markers(&sync_points, |p| {
            p.synergy_type == SynergyType::Clash && p.synergy_score <= self.config.challenge_threshold
        });

        let counts: Vec<(Element, usize)> = Element::ALL
            .iter()
            .map(|e| (*e, sync_points.iter().filter(|p| p.daeun.element == *e).count()))
            .filter(|(_, n)| *n > 0)
            .collect();
        let current = active_daeun(daeun_list, current_age).map(|d| d.element);
        let life_cycle_pattern = narrative::life_cycle_pattern(&counts, current);

        let overall_confidence = mean(sync_points.iter().map(|p| p.confidence))
            .map(clamp_score)
            .unwrap_or(0.0);
        let tier5_summary = options.enable_tier5.then(|| summarize_tier5(&sync_points));

        SyncAnalysisResult {
            birth_year,
            current_age,
            sync_points,
            major_transitions,
            peak_years,
            challenge_years,
            life_cycle_pattern,
            overall_confidence,
            tier5_summary,
        }
    }

    fn sync_point(
        &self,
        daeun: &DaeunInfo,
        age: i32,
        birth_year: i32,
        in_transition: bool,
        options: &SyncOptions,
    ) -> SyncPoint {
        let transits = detect_transits(&self.config.cycles, age, self.config.tolerance_years);
        let (synergy_score, synergy_type) = self.synergy(daeun.element, &transits);
        let confidence = self.confidence(&transits, in_transition);

        let kinds: Vec<_> = transits.iter().map(|t| t.transit_type).collect();
        let text = narrative::compose(daeun.element, &kinds, synergy_type, in_transition);

        let tier5 = options.enable_tier5.then(|| {
            let alignment = solar_term_alignment(daeun, transits.first());
            Tier5Metrics {
                solar_term_alignment: alignment,
                east_west_harmony: round1(clamp_score(0.6 * synergy_score + 0.4 * alignment)),
            }
        });

        SyncPoint {
            age,
            year: birth_year.saturating_add(age),
            daeun: *daeun,
            transits,
            synergy_score,
            synergy_type,
            themes: text.themes,
            opportunities: text.opportunities,
            challenges: text.challenges,
            advice: text.advice,
            confidence,
            is_transition_window: in_transition,
            tier5,
        }
    }

    /// Dominant transit at full weight, the rest at `secondary_weight`; each
    /// scaled between half and full strength by closeness to its centre.
    fn synergy(&self, daeun_element: Element, transits: &[TransitEvent]) -> (f64, SynergyType) {
        let Some(dominant) = transits.first() else {
            return (clamp_score(self.config.base_score), SynergyType::Neutral);
        };

        let mut score = self.config.base_score;
        for (i, transit) in transits.iter().enumerate() {
            let relation = daeun_element.relation_to(transit.element);
            let weight = if i == 0 { 1.0 } else { self.config.secondary_weight };
            score += self.config.relation_deltas.delta(relation) * weight * self.strength(transit);
        }

        let synergy_type = SynergyType::from_relation(daeun_element.relation_to(dominant.element));
        (round1(clamp_score(score)), synergy_type)
    }

    /// 1.0 at the exact centre, 0.5 at the tolerance edge
    fn strength(&self, transit: &TransitEvent) -> f64 {
        0.5 + 0.5 * self.closeness(transit)
    }

    fn closeness(&self, transit: &TransitEvent) -> f64 {
        if self.config.tolerance_years <= 0.0 {
            return 1.0;
        }
        (1.0 - transit.distance / self.config.tolerance_years).clamp(0.0, 1.0)
    }

    fn confidence(&self, transits: &[TransitEvent], in_transition: bool) -> f64 {
        let Some(dominant) = transits.first() else {
            return round1(clamp_score(self.config.quiet_confidence));
        };
        let mut confidence = self.config.base_confidence + self.config.transit_confidence * self.closeness(dominant);
        if in_transition {
            confidence += self.config.boundary_corroboration;
        }
        confidence += self.config.overlap_corroboration * (transits.len() - 1) as f64;
        round1(clamp_score(confidence))
    }

    fn window_ages(&self, boundaries: &[i32]) -> BTreeSet<i32> {
        let n = self.boundary_window();
        boundaries
            .iter()
            .flat_map(|b| b.saturating_sub(n)..b.saturating_add(n))
            .collect()
    }

    fn boundary_window(&self) -> i32 {
        self.config.boundary_window.clamp(0, MAX_BOUNDARY_WINDOW)
    }

    fn major_transitions(&self, daeun_list: &[DaeunInfo], boundaries: &[i32], birth_year: i32) -> Vec<MajorTransition> {
        let n = self.boundary_window();
        boundaries
            .iter()
            .map(|&age| {
                let from = active_daeun(daeun_list, age - 1);
                let to = active_daeun(daeun_list, age);
                let (window_start_age, window_end_age) = (age.saturating_sub(n), age.saturating_add(n) - 1);

                let mut coinciding: Vec<TransitType> = Vec::new();
                for event in (window_start_age..=window_end_age)
                    .flat_map(|a| detect_transits(&self.config.cycles, a, self.config.tolerance_years))
                {
                    if !coinciding.contains(&event.transit_type) {
                        coinciding.push(event.transit_type);
                    }
                }

                MajorTransition {
                    age,
                    year: birth_year.saturating_add(age),
                    window_start_age,
                    window_end_age,
                    from: from.map(DaeunInfo::pillar),
                    to: to.map(DaeunInfo::pillar),
                    from_element: from.map(|d| d.element),
                    to_element: to.map(|d| d.element),
                    description: describe_transition(age, from, to, &coinciding),
                    coinciding_transits: coinciding,
                }
            })
            .collect()
    }
}

fn describe_transition(age: i32, from: Option<&DaeunInfo>, to: Option<&DaeunInfo>, transits: &[TransitType]) -> String {
    let mut text = match (from, to) {
        (Some(f), Some(t)) => format!(
            "Age {}: {} ({}) hands over to {} ({})",
            age,
            f.pillar(),
            f.element.name(),
            t.pillar(),
            t.element.name()
        ),
        (None, Some(t)) => format!("Age {}: first Daeun {} ({}) begins", age, t.pillar(), t.element.name()),
        (Some(f), None) => format!("Age {}: Daeun {} ({}) closes", age, f.pillar(), f.element.name()),
        (None, None) => format!("Age {}: Daeun boundary", age),
    };
    if !transits.is_empty() {
        let names: Vec<&str> = transits.iter().map(|t| t.label()).collect();
        text.push_str(&format!(", alongside {}", names.join(" and ")));
    }
    text
}

/// First age of every period plus the age after every period ends, deduplicated.
fn boundary_ages(daeun_list: &[DaeunInfo]) -> Vec<i32> {
    let set: BTreeSet<i32> = daeun_list
        .iter()
        .flat_map(|d| [d.start_age, d.end_age.saturating_add(1)])
        .filter(|age| (0..=MAX_MODELED_AGE + 1).contains(age))
        .collect();
    set.into_iter().collect()
}

/// Every age covered by some period, clamped to [0, MAX_MODELED_AGE].
fn modeled_ages(daeun_list: &[DaeunInfo]) -> impl Iterator<Item = i32> {
    let start = daeun_list.iter().map(|d| d.start_age).min().unwrap_or(0).max(0);
    let end = daeun_list
        .iter()
        .map(|d| d.end_age)
        .max()
        .unwrap_or(-1)
        .min(MAX_MODELED_AGE);
    start..=end
}

fn markers(points: &[SyncPoint], keep: impl Fn(&SyncPoint) -> bool) -> Vec<YearMarker> {
    points
        .iter()
        .filter(|p| keep(p))
        .map(|p| YearMarker {
            age: p.age,
            year: p.year,
            score: p.synergy_score,
        })
        .collect()
}

/// How well the season of the Daeun branch supports the Daeun element and the
/// leading transit's element.
fn solar_term_alignment(daeun: &DaeunInfo, lead: Option<&TransitEvent>) -> f64 {
    let season = daeun.branch.season_element();
    let fit = |element: Element| match season.relation_to(element) {
        ElementRelation::Same => 100.0,
        ElementRelation::Generates => 80.0,
        ElementRelation::GeneratedBy => 60.0,
        ElementRelation::ControlledBy => 45.0,
        ElementRelation::Controls => 25.0,
    };
    let score = match lead {
        Some(t) => (fit(daeun.element) + fit(t.element)) / 2.0,
        None => fit(daeun.element),
    };
    round1(clamp_score(score))
}

fn summarize_tier5(points: &[SyncPoint]) -> Tier5Summary {
    let metrics: Vec<(i32, Tier5Metrics)> = points.iter().filter_map(|p| p.tier5.map(|m| (p.age, m))).collect();
    Tier5Summary {
        average_solar_term_alignment: round1(mean(metrics.iter().map(|(_, m)| m.solar_term_alignment)).unwrap_or(0.0)),
        average_east_west_harmony: round1(mean(metrics.iter().map(|(_, m)| m.east_west_harmony)).unwrap_or(0.0)),
        most_harmonious_age: metrics
            .iter()
            .fold(None::<(i32, f64)>, |best, (age, m)| match best {
                Some((_, h)) if h >= m.east_west_harmony => best,
                _ => Some((*age, m.east_west_harmony)),
            })
            .map(|(age, _)| age),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Synchronize a Daeun list with Western transit cycles using the default configuration.
pub fn analyze_daeun_transit_sync(
    daeun_list: &[DaeunInfo],
    birth_year: i32,
    current_age: i32,
    options: Option<&SyncOptions>,
) -> SyncAnalysisResult {
    DaeunTransitSynchronizer::new().analyze(
        daeun_list,
        birth_year,
        current_age,
        options.unwrap_or(&SyncOptions::default()),
    )
}
