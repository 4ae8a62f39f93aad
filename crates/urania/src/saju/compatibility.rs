//! Pairwise Saju compatibility from day pillars.

use serde::{Deserialize, Serialize};

use crate::saju::elements::ElementRelation;
use crate::saju::gongmang::gongmang_for_day_pillar;
use crate::saju::pillars::{EarthlyBranch, HeavenlyStem, SajuPillars};

const BASE_SCORE: f64 = 50.0;

/// Stem combinations (天干合)
const STEM_COMBINATIONS: [(HeavenlyStem, HeavenlyStem); 5] = [
    (HeavenlyStem::Gap, HeavenlyStem::Gi),
    (HeavenlyStem::Eul, HeavenlyStem::Gyeong),
    (HeavenlyStem::Byeong, HeavenlyStem::Sin),
    (HeavenlyStem::Jeong, HeavenlyStem::Im),
    (HeavenlyStem::Mu, HeavenlyStem::Gye),
];

/// 六合
const SIX_HARMONIES: [(EarthlyBranch, EarthlyBranch); 6] = [
    (EarthlyBranch::Rat, EarthlyBranch::Ox),
    (EarthlyBranch::Tiger, EarthlyBranch::Pig),
    (EarthlyBranch::Rabbit, EarthlyBranch::Dog),
    (EarthlyBranch::Dragon, EarthlyBranch::Rooster),
    (EarthlyBranch::Snake, EarthlyBranch::Monkey),
    (EarthlyBranch::Horse, EarthlyBranch::Goat),
];

/// 三合
const THREE_HARMONIES: [[EarthlyBranch; 3]; 4] = [
    [EarthlyBranch::Monkey, EarthlyBranch::Rat, EarthlyBranch::Dragon],
    [EarthlyBranch::Pig, EarthlyBranch::Rabbit, EarthlyBranch::Goat],
    [EarthlyBranch::Tiger, EarthlyBranch::Horse, EarthlyBranch::Dog],
    [EarthlyBranch::Snake, EarthlyBranch::Rooster, EarthlyBranch::Ox],
];

/// 沖
const CLASHES: [(EarthlyBranch, EarthlyBranch); 6] = [
    (EarthlyBranch::Rat, EarthlyBranch::Horse),
    (EarthlyBranch::Ox, EarthlyBranch::Goat),
    (EarthlyBranch::Tiger, EarthlyBranch::Monkey),
    (EarthlyBranch::Rabbit, EarthlyBranch::Rooster),
    (EarthlyBranch::Dragon, EarthlyBranch::Dog),
    (EarthlyBranch::Snake, EarthlyBranch::Pig),
];

/// 害
const HARMS: [(EarthlyBranch, EarthlyBranch); 6] = [
    (EarthlyBranch::Rat, EarthlyBranch::Goat),
    (EarthlyBranch::Ox, EarthlyBranch::Horse),
    (EarthlyBranch::Tiger, EarthlyBranch::Snake),
    (EarthlyBranch::Rabbit, EarthlyBranch::Dragon),
    (EarthlyBranch::Monkey, EarthlyBranch::Pig),
    (EarthlyBranch::Rooster, EarthlyBranch::Dog),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BranchRelation {
    Same,
    SixHarmony,
    ThreeHarmony,
    Clash,
    Harm,
    None,
}

impl BranchRelation {
    pub fn between(a: EarthlyBranch, b: EarthlyBranch) -> Self {
        let pair_in = |table: &[(EarthlyBranch, EarthlyBranch)]| {
            table.iter().any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
        };
        if a == b {
            BranchRelation::Same
        } else if pair_in(&SIX_HARMONIES) {
            BranchRelation::SixHarmony
        } else if THREE_HARMONIES.iter().any(|g| g.contains(&a) && g.contains(&b)) {
            BranchRelation::ThreeHarmony
        } else if pair_in(&CLASHES) {
            BranchRelation::Clash
        } else if pair_in(&HARMS) {
            BranchRelation::Harm
        } else {
            BranchRelation::None
        }
    }

    fn weight(self) -> f64 {
        match self {
            BranchRelation::Same => 5.0,
            BranchRelation::SixHarmony => 15.0,
            BranchRelation::ThreeHarmony => 10.0,
            BranchRelation::Clash => -15.0,
            BranchRelation::Harm => -10.0,
            BranchRelation::None => 0.0,
        }
    }
}

pub fn stems_combine(a: HeavenlyStem, b: HeavenlyStem) -> bool {
    STEM_COMBINATIONS
        .iter()
        .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityReport {
    /// 0..=100
    pub score: f64,
    pub stem_combination: bool,
    pub branch_relation: BranchRelation,
    /// First person's day master towards the second's
    pub element_relation: ElementRelation,
    /// Day branches falling in the other person's gongmang (0..=2)
    pub gongmang_hits: u8,
    pub notes: Vec<String>,
}

/// Compare two people through their day pillars.
pub fn analyze_compatibility(a: &SajuPillars, b: &SajuPillars) -> CompatibilityReport {
    let mut score = BASE_SCORE;
    let mut notes = Vec::new();

    let stem_combination = stems_combine(a.day.stem, b.day.stem);
    if stem_combination {
        score += 15.0;
        notes.push(format!("Day stems {}{} combine (天干合)", a.day.stem, b.day.stem));
    }

    let branch_relation = BranchRelation::between(a.day.branch, b.day.branch);
    score += branch_relation.weight();
    match branch_relation {
        BranchRelation::SixHarmony => notes.push("Day branches form a six harmony (六合)".to_string()),
        BranchRelation::ThreeHarmony => notes.push("Day branches share a three harmony (三合)".to_string()),
        BranchRelation::Clash => notes.push("Day branches clash (沖)".to_string()),
        BranchRelation::Harm => notes.push("Day branches harm each other (害)".to_string()),
        BranchRelation::Same | BranchRelation::None => {}
    }

    let element_relation = a.day.stem.element().relation_to(b.day.stem.element());
    score += match element_relation {
        ElementRelation::Same => 5.0,
        ElementRelation::Generates | ElementRelation::GeneratedBy => {
            notes.push("Day masters feed each other (相生)".to_string());
            10.0
        }
        ElementRelation::Controls | ElementRelation::ControlledBy => {
            notes.push("Day masters restrain each other (相剋)".to_string());
            -10.0
        }
    };

    let a_void = gongmang_for_day_pillar(a.day.stem, a.day.branch);
    let b_void = gongmang_for_day_pillar(b.day.stem, b.day.branch);
    let gongmang_hits = a_void.contains(b.day.branch) as u8 + b_void.contains(a.day.branch) as u8;
    if gongmang_hits > 0 {
        score -= 5.0 * gongmang_hits as f64;
        notes.push(format!("{} day branch(es) fall in the partner's gongmang", gongmang_hits));
    }

    CompatibilityReport {
        score: score.clamp(0.0, 100.0),
        stem_combination,
        branch_relation,
        element_relation,
        gongmang_hits,
        notes,
    }
}
