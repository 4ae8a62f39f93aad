//! Fixed text tables for sync points.
//!
//! Two tables feed every point: one keyed by the Daeun element and one keyed
//! by the transit type. A point's text is composed from the element entry,
//! then one entry per transit (closest first), then the synergy advice. It is
//! therefore a fixed function of the (element, transit types, synergy) input,
//! and two ages with the same input always read the same.

use crate::saju::Element;
use crate::sync::types::{SynergyType, TransitType};

struct Entry {
    theme: &'static str,
    opportunity: &'static str,
    challenge: &'static str,
}

const fn entry(theme: &'static str, opportunity: &'static str, challenge: &'static str) -> Entry {
    Entry {
        theme,
        opportunity,
        challenge,
    }
}

fn element_entry(element: Element) -> Entry {
    match element {
        Element::Wood => entry(
            "growth and new beginnings",
            "start projects that need years to mature",
            "scattering energy across too many directions",
        ),
        Element::Fire => entry(
            "visibility and expression",
            "step forward and be seen for your work",
            "burnout from overcommitting",
        ),
        Element::Earth => entry(
            "stability and consolidation",
            "build lasting structures at home and work",
            "inertia and resistance to needed change",
        ),
        Element::Metal => entry(
            "refinement and decisive cuts",
            "sharpen skills and clarify commitments",
            "rigidity in relationships",
        ),
        Element::Water => entry(
            "reflection and inner wisdom",
            "study, research and deepen intuition",
            "drifting without direction",
        ),
    }
}

fn transit_entry(transit: TransitType) -> Entry {
    match transit {
        TransitType::JupiterReturn => entry(
            "expansion of horizons",
            "say yes to travel, teaching and wider networks",
            "overconfidence and overextension",
        ),
        TransitType::SaturnReturn => entry(
            "maturity and accountability",
            "commit to what truly matters for the next decades",
            "heavy responsibilities and tests of endurance",
        ),
        TransitType::NodalReturn => entry(
            "realignment with life direction",
            "reconnect with a calling set aside earlier",
            "old patterns resurfacing",
        ),
        TransitType::SaturnOpposition => entry(
            "review of earlier commitments",
            "adjust plans that no longer fit",
            "external pressure on existing structures",
        ),
        TransitType::UranusOpposition => entry(
            "midlife awakening",
            "make a bold change you have long postponed",
            "restlessness and abrupt disruption",
        ),
    }
}

fn synergy_advice(synergy: SynergyType) -> &'static str {
    match synergy {
        SynergyType::Amplify => "East and West point the same way: act on it with confidence.",
        SynergyType::Clash => "The cycles pull against each other: move carefully and keep reserves.",
        SynergyType::Neutral => "A quiet year between cycles: tend what is already growing.",
    }
}

/// Text for one sync point
#[derive(Debug, Clone, PartialEq)]
pub struct Narrative {
    pub themes: Vec<String>,
    pub opportunities: Vec<String>,
    pub challenges: Vec<String>,
    pub advice: String,
}

/// `transits` is closest first; every transit contributes text, the first one leads.
pub fn compose(element: Element, transits: &[TransitType], synergy: SynergyType, in_transition: bool) -> Narrative {
    let base = element_entry(element);
    let mut themes = vec![format!("{} ({}) Daeun: {}", element.korean(), element.name(), base.theme)];
    let mut opportunities = vec![base.opportunity.to_string()];
    let mut challenges = vec![base.challenge.to_string()];

    for transit in transits {
        let t = transit_entry(*transit);
        themes.push(format!("{}: {}", transit.label(), t.theme));
        opportunities.push(t.opportunity.to_string());
        challenges.push(t.challenge.to_string());
    }

    if in_transition {
        themes.push("Daeun transition".to_string());
        challenges.push("unsettled footing while one decade hands over to the next".to_string());
    }

    let mut advice = synergy_advice(synergy).to_string();
    if let Some(lead) = transits.first() {
        advice.push(' ');
        advice.push_str(&format!(
            "With the {} under a {} Daeun, {}.",
            lead.label(),
            element.name(),
            transit_entry(*lead).opportunity
        ));
    } else {
        advice.push(' ');
        advice.push_str(&format!("Use the {} Daeun to {}.", element.name(), base.opportunity));
    }

    Narrative {
        themes,
        opportunities,
        challenges,
        advice,
    }
}

/// Life-cycle summary from the element each modeled year falls under.
pub fn life_cycle_pattern(counts: &[(Element, usize)], current: Option<Element>) -> String {
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    let Some((dominant, years)) = counts.iter().max_by_key(|(_, n)| *n).copied() else {
        return "No Daeun periods supplied; no life cycle can be drawn.".to_string();
    };
    if total == 0 {
        return "No Daeun periods supplied; no life cycle can be drawn.".to_string();
    }

    let mut text = format!(
        "{} ({}) is the dominant Daeun element, covering {} of {} modeled years: a life shaped by {}.",
        dominant.korean(),
        dominant.name(),
        years,
        total,
        element_entry(dominant).theme
    );
    if let Some(now) = current {
        text.push_str(&format!(
            " The current period is {} ({}), a time of {}.",
            now.korean(),
            now.name(),
            element_entry(now).theme
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advice_never_empty() {
        for element in Element::ALL {
            for synergy in [SynergyType::Amplify, SynergyType::Clash, SynergyType::Neutral] {
                let n = compose(element, &[], synergy, false);
                assert!(!n.advice.is_empty());
                let n = compose(element, &[TransitType::SaturnReturn], synergy, true);
                assert!(n.advice.contains("Saturn return"));
                assert_eq!(n.themes.len(), 3);
            }
        }
    }

    #[test]
    fn test_text_depends_only_on_inputs() {
        let transits = [TransitType::JupiterReturn, TransitType::SaturnReturn];
        let a = compose(Element::Water, &transits, SynergyType::Clash, false);
        let b = compose(Element::Water, &transits, SynergyType::Clash, false);
        assert_eq!(a, b);
        assert!(a.themes[0].contains(element_entry(Element::Water).theme));
        assert!(a.themes[1].contains(transit_entry(TransitType::JupiterReturn).theme));
        assert!(a.themes[2].contains(transit_entry(TransitType::SaturnReturn).theme));

        let swapped = compose(Element::Water, &[transits[1], transits[0]], SynergyType::Clash, false);
        assert_ne!(a.advice, swapped.advice);
    }

    #[test]
    fn test_pattern_picks_dominant() {
        let text = life_cycle_pattern(&[(Element::Wood, 3), (Element::Metal, 10)], Some(Element::Wood));
        assert!(text.starts_with("금 (metal)"));
        assert!(text.contains("current period is 목"));
        assert!(life_cycle_pattern(&[], None).starts_with("No Daeun"));
    }
}
