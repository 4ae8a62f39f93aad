//! Transit cycle table and detection by age.

use serde::{Deserialize, Serialize};

use crate::saju::Element;
use crate::sync::types::{TransitEvent, TransitType};

/// Oldest age any cycle is projected to
pub const MAX_MODELED_AGE: i32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CycleSpec {
    pub transit: TransitType,
    /// Age of the first occurrence
    pub first_age: f64,
    /// Years between occurrences
    pub period_years: f64,
    /// Element the transit is read as
    pub element: Element,
    /// Stop after this many occurrences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cycles: Option<u32>,
}

impl CycleSpec {
    /// Exact ages of every occurrence up to the modeled horizon
    pub fn centers(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        let limit = self.max_cycles.unwrap_or(u32::MAX);
        (1..=limit)
            .map(move |k| (k, self.first_age + (k - 1) as f64 * self.period_years))
            .take_while(|(_, center)| self.period_years > 0.0 && *center <= MAX_MODELED_AGE as f64 + 1.0)
    }
}

/// Jupiter, Saturn, nodal, Saturn-opposition and Uranus-opposition cycles
pub fn default_cycles() -> Vec<CycleSpec> {
    vec![
        CycleSpec {
            transit: TransitType::JupiterReturn,
            first_age: 11.86,
            period_years: 11.86,
            element: Element::Wood,
            max_cycles: None,
        },
        CycleSpec {
            transit: TransitType::SaturnReturn,
            first_age: 29.46,
            period_years: 29.46,
            element: Element::Earth,
            max_cycles: None,
        },
        CycleSpec {
            transit: TransitType::NodalReturn,
            first_age: 18.6,
            period_years: 18.6,
            element: Element::Water,
            max_cycles: None,
        },
        CycleSpec {
            transit: TransitType::SaturnOpposition,
            first_age: 14.73,
            period_years: 29.46,
            element: Element::Earth,
            max_cycles: None,
        },
        CycleSpec {
            transit: TransitType::UranusOpposition,
            first_age: 42.0,
            period_years: 84.0,
            element: Element::Fire,
            max_cycles: Some(1),
        },
    ]
}

/// Every cycle occurrence within `tolerance` years of `age` (inclusive),
/// closest first; ties keep table order.
pub fn detect_transits(cycles: &[CycleSpec], age: i32, tolerance: f64) -> Vec<TransitEvent> {
    let age_f = age as f64;
    let mut events: Vec<TransitEvent> = cycles
        .iter()
        .flat_map(|spec| {
            spec.centers().filter_map(move |(cycle_number, center)| {
                let distance = (age_f - center).abs();
                (distance <= tolerance).then_some(TransitEvent {
                    transit_type: spec.transit,
                    cycle_number,
                    center_age: center,
                    window_start: center - tolerance,
                    window_end: center + tolerance,
                    distance,
                    element: spec.element,
                })
            })
        })
        .collect();
    events.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types_at(age: i32) -> Vec<TransitType> {
        detect_transits(&default_cycles(), age, 1.0)
            .iter()
            .map(|e| e.transit_type)
            .collect()
    }

    #[test]
    fn test_jupiter_returns() {
        assert!(types_at(12).contains(&TransitType::JupiterReturn));
        assert!(types_at(24).contains(&TransitType::JupiterReturn));
        assert!(types_at(36).contains(&TransitType::JupiterReturn));
        assert!(!types_at(18).contains(&TransitType::JupiterReturn));
    }

    #[test]
    fn test_saturn_returns() {
        assert!(types_at(29).contains(&TransitType::SaturnReturn));
        assert!(types_at(59).contains(&TransitType::SaturnReturn));
        assert!(!types_at(45).contains(&TransitType::SaturnReturn));
    }

    #[test]
    fn test_odd_saturn_oppositions_only() {
        assert!(types_at(15).contains(&TransitType::SaturnOpposition));
        assert!(types_at(44).contains(&TransitType::SaturnOpposition));
        // 29.46 is the return, not an opposition
        assert!(!types_at(29).contains(&TransitType::SaturnOpposition));
    }

    #[test]
    fn test_uranus_first_only() {
        assert!(types_at(42).contains(&TransitType::UranusOpposition));
        assert!(!types_at(84).contains(&TransitType::UranusOpposition));
    }

    #[test]
    fn test_tolerance_edges() {
        let cycles = [CycleSpec {
            transit: TransitType::JupiterReturn,
            first_age: 12.0,
            period_years: 12.0,
            element: Element::Wood,
            max_cycles: None,
        }];
        assert_eq!(detect_transits(&cycles, 11, 1.0).len(), 1);
        assert_eq!(detect_transits(&cycles, 13, 1.0).len(), 1);
        assert!(detect_transits(&cycles, 10, 1.0).is_empty());
        assert!(detect_transits(&cycles, 11, 0.5).is_empty());
        assert!(detect_transits(&cycles, -12, 1.0).is_empty());
    }

    #[test]
    fn test_closest_first() {
        // age 37: Jupiter 35.58 (1.42 away), nodal 37.2 (0.2 away)
        let events = detect_transits(&default_cycles(), 37, 1.5);
        assert_eq!(events[0].transit_type, TransitType::NodalReturn);
        assert!(events.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_zero_period_yields_nothing() {
        let cycles = [CycleSpec {
            transit: TransitType::NodalReturn,
            first_age: 5.0,
            period_years: 0.0,
            element: Element::Water,
            max_cycles: None,
        }];
        assert!(detect_transits(&cycles, 5, 1.0).is_empty());
    }
}
