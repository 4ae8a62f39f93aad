use crate::angles::{separation, signed_delta};
use crate::aspects::types::{AspectCore, AspectEndpoint, AspectHit, AspectPolicy, AspectRules, AspectType};
use crate::chart::{Body, BodyId, Chart, ChartKind};

/// Orbs at or below this are treated as "drop the body"
const DISABLED_ORB: f64 = 1e-9;
/// Look-ahead used to decide applying vs separating (days)
const APPLYING_STEP_DAYS: f64 = 0.01;
/// Relative speeds below this cannot tell applying from separating
const MIN_RELATIVE_SPEED: f64 = 1e-6;
/// Weight of orb tightness in the score; a perfect aspect earns this much on top of its bonus
const TIGHTNESS_WEIGHT: f64 = 100.0;

/// Aspect calculator
#[derive(Debug, Clone, Default)]
pub struct AspectCalculator {
    policy: AspectPolicy,
}

impl AspectCalculator {
    /// Create a new aspect calculator with the default policy
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: AspectPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &AspectPolicy {
        &self.policy
    }

    /// Aspects between every point of `chart_a` and every point of `chart_b`
    pub fn find_aspects(&self, chart_a: &Chart, chart_b: &Chart, rules: &AspectRules) -> Vec<AspectHit> {
        if chart_a.bodies.is_empty() || chart_b.bodies.is_empty() {
            return Vec::new();
        }

        let targets: Vec<&Body> = chart_b.points().collect();
        let hits = self.collect_between(chart_a.points(), chart_a.kind, &targets, chart_b.kind, 0.0, rules);
        finish(hits, rules)
    }

    /// Aspects of a chart with itself; no body is paired with itself and the
    /// two angles are not paired with each other.
    pub fn find_natal_aspects(&self, chart: &Chart, rules: &AspectRules) -> Vec<AspectHit> {
        // Early exit if not enough bodies
        if chart.bodies.len() < 2 {
            return Vec::new();
        }

        let points: Vec<&Body> = chart.points().collect();
        let candidates = self.candidate_aspects(rules);
        let mut hits = Vec::new();
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                let (p1, p2) = (points[i], points[j]);
                if p1.is_angle() && p2.is_angle() {
                    continue;
                }
                if let Some(hit) =
                    self.pair_hit(p1, chart.kind, p2, chart.kind, &candidates, self.policy.natal_widening, rules)
                {
                    hits.push(hit);
                }
            }
        }
        finish(hits, rules)
    }

    /// Aspects from an arbitrary set of points onto a target set.
    pub fn find_aspects_from<'a>(
        &self,
        from: impl IntoIterator<Item = &'a Body>,
        from_kind: ChartKind,
        to: &Chart,
        rules: &AspectRules,
    ) -> Vec<AspectHit> {
        if to.bodies.is_empty() {
            return Vec::new();
        }
        let targets: Vec<&Body> = to.points().collect();
        let hits = self.collect_between(from, from_kind, &targets, to.kind, 0.0, rules);
        finish(hits, rules)
    }

    /// Calculate the tightest aspect between two longitudes
    ///
    /// `candidates` pairs each aspect type with the orb allowed for it.
    pub fn calculate_aspect(
        &self,
        lon1: f64,
        lon2: f64,
        speed1: Option<f64>,
        speed2: Option<f64>,
        candidates: &[(AspectType, f64)],
    ) -> Option<AspectCore> {
        let angle_diff = separation(lon1, lon2);

        let (aspect, exact_angle, orb_value) = candidates
            .iter()
            .filter(|(_, orb)| *orb > DISABLED_ORB)
            .map(|(aspect, orb)| (*aspect, aspect.angle(), *orb))
            .filter(|(_, exact, orb)| (angle_diff - exact).abs() <= *orb)
            .map(|(aspect, exact, _)| (aspect, exact, (angle_diff - exact).abs()))
            .min_by(|a, b| a.2.total_cmp(&b.2))?;

        Some(AspectCore {
            aspect,
            exact_angle,
            separation: angle_diff,
            orb: orb_value,
            signed_orb: angle_diff - exact_angle,
            applying: is_aspect_applying(lon1, lon2, speed1, speed2, exact_angle, angle_diff),
        })
    }

    fn collect_between<'a>(
        &self,
        from: impl IntoIterator<Item = &'a Body>,
        from_kind: ChartKind,
        targets: &[&Body],
        to_kind: ChartKind,
        widening: f64,
        rules: &AspectRules,
    ) -> Vec<AspectHit> {
        let candidates = self.candidate_aspects(rules);
        let mut hits = Vec::new();
        for p1 in from {
            for p2 in targets {
                if let Some(hit) = self.pair_hit(p1, from_kind, p2, to_kind, &candidates, widening, rules) {
                    hits.push(hit);
                }
            }
        }
        hits
    }

    fn candidate_aspects(&self, rules: &AspectRules) -> Vec<AspectType> {
        let mut aspects = AspectType::MAJOR.to_vec();
        if rules.include_minor {
            aspects.extend(self.policy.minor_aspects.iter().filter(|a| !a.is_major()));
        }
        aspects
    }

    /// Orb for one aspect between two bodies; the tighter per-body override wins.
    fn allowed_orb(&self, aspect: AspectType, a: BodyId, b: BodyId, widening: f64, rules: &AspectRules) -> f64 {
        let overrides = [rules.orbs.get(&a), rules.orbs.get(&b)];
        match overrides.into_iter().flatten().copied().reduce(f64::min) {
            Some(orb) => orb,
            None => self.policy.orb_for(aspect) + widening,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn pair_hit(
        &self,
        p1: &Body,
        kind1: ChartKind,
        p2: &Body,
        kind2: ChartKind,
        aspects: &[AspectType],
        widening: f64,
        rules: &AspectRules,
    ) -> Option<AspectHit> {
        let candidates: Vec<(AspectType, f64)> = aspects
            .iter()
            .map(|a| (*a, self.allowed_orb(*a, p1.id, p2.id, widening, rules)))
            .collect();

        let core = self.calculate_aspect(p1.longitude, p2.longitude, p1.speed, p2.speed, &candidates)?;
        Some(AspectHit {
            from: AspectEndpoint {
                body: p1.id,
                chart: kind1,
                longitude: p1.longitude,
            },
            to: AspectEndpoint {
                body: p2.id,
                chart: kind2,
                longitude: p2.longitude,
            },
            score: score(core.aspect, core.orb),
            core,
        })
    }
}

/// Higher for tighter orbs, plus the aspect's fixed bonus.
pub fn score(aspect: AspectType, orb: f64) -> f64 {
    aspect.priority_bonus() + TIGHTNESS_WEIGHT / (1.0 + orb.abs())
}

/// Stable sort by score (descending), then truncate.
fn finish(mut hits: Vec<AspectHit>, rules: &AspectRules) -> Vec<AspectHit> {
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    if let Some(max) = rules.max_results {
        hits.truncate(max);
    }
    hits
}

/// Determine if an aspect is applying (approaching exact) or separating.
///
/// Without both speeds the aspect counts as separating.
fn is_aspect_applying(
    lon1: f64,
    lon2: f64,
    speed1: Option<f64>,
    speed2: Option<f64>,
    aspect_angle: f64,
    current_angle: f64,
) -> bool {
    let (Some(speed1), Some(speed2)) = (speed1, speed2) else {
        return false;
    };

    // Calculate relative speed (degrees per day)
    let relative_speed = speed1 - speed2;
    if relative_speed.abs() < MIN_RELATIVE_SPEED {
        return false;
    }

    // Project forward a small amount to see if we're getting closer to exact
    let signed_diff = signed_delta(lon1, lon2);
    let future_angle = separation(signed_diff + relative_speed * APPLYING_STEP_DAYS, 0.0);

    let current_distance = (current_angle - aspect_angle).abs();
    let future_distance = (future_angle - aspect_angle).abs();
    future_distance < current_distance
}

/// Aspects between two charts with the default policy.
pub fn find_aspects(chart_a: &Chart, chart_b: &Chart, rules: Option<&AspectRules>) -> Vec<AspectHit> {
    AspectCalculator::new().find_aspects(chart_a, chart_b, rules.unwrap_or(&AspectRules::default()))
}

/// Aspects within one chart with the default policy.
pub fn find_natal_aspects(chart: &Chart, rules: Option<&AspectRules>) -> Vec<AspectHit> {
    AspectCalculator::new().find_natal_aspects(chart, rules.unwrap_or(&AspectRules::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(orb: f64) -> Vec<(AspectType, f64)> {
        AspectType::MAJOR.iter().map(|a| (*a, orb)).collect()
    }

    #[test]
    fn test_picks_tightest_candidate() {
        let calc = AspectCalculator::new();
        // 45° is 15 from sextile and 45 from conjunction; only a wide orb catches it
        let core = calc
            .calculate_aspect(0.0, 45.0, None, None, &candidates(20.0))
            .unwrap();
        assert_eq!(core.aspect, AspectType::Sextile);
        assert!((core.signed_orb + 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_disabled_orb_rejects_exact() {
        let calc = AspectCalculator::new();
        assert!(calc.calculate_aspect(10.0, 10.0, None, None, &candidates(0.0)).is_none());
    }

    #[test]
    fn test_applying_faster_body_behind() {
        // Moon at 95 moving 13°/day toward Sun at 100: closing a conjunction
        assert!(is_aspect_applying(95.0, 100.0, Some(13.0), Some(1.0), 0.0, 5.0));
        // Moon already past the Sun
        assert!(!is_aspect_applying(105.0, 100.0, Some(13.0), Some(1.0), 0.0, 5.0));
    }

    #[test]
    fn test_applying_across_zero_aries() {
        // 358 -> 2, closing on a conjunction across the wrap
        assert!(is_aspect_applying(358.0, 2.0, Some(1.0), Some(0.1), 0.0, 4.0));
    }

    #[test]
    fn test_applying_opposition() {
        // Separation 175 and growing toward 180
        assert!(is_aspect_applying(175.0, 0.0, Some(1.0), Some(0.0), 180.0, 175.0));
        assert!(!is_aspect_applying(185.0, 0.0, Some(1.0), Some(0.0), 180.0, 175.0));
    }

    #[test]
    fn test_missing_speed_is_separating() {
        assert!(!is_aspect_applying(95.0, 100.0, Some(13.0), None, 0.0, 5.0));
    }

    #[test]
    fn test_score_monotonic() {
        assert!(score(AspectType::Trine, 0.5) > score(AspectType::Trine, 1.5));
        assert!(score(AspectType::Square, 1.0) > score(AspectType::Sextile, 1.0));
        assert!(score(AspectType::Sextile, 1.0) > score(AspectType::Quincunx, 1.0));
    }
}
