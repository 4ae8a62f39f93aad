//! Daeun (大運): ten-year luck periods.
//!
//! Periods are either derived from the month pillar, stepping through the
//! sexagenary cycle, or normalized from a list produced elsewhere.

use serde::{Deserialize, Serialize};

use crate::saju::elements::{Element, YinYang};
use crate::saju::pillars::{EarthlyBranch, HeavenlyStem, Pillar};

/// Span of one period; end age is inclusive
pub const DAEUN_SPAN_YEARS: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaeunInfo {
    pub start_age: i32,
    pub end_age: i32,
    pub stem: HeavenlyStem,
    pub branch: EarthlyBranch,
    pub element: Element,
    pub yin_yang: YinYang,
}

impl DaeunInfo {
    pub fn new(start_age: i32, stem: HeavenlyStem, branch: EarthlyBranch) -> Self {
        Self {
            start_age,
            end_age: start_age.saturating_add(DAEUN_SPAN_YEARS - 1),
            stem,
            branch,
            element: stem.element(),
            yin_yang: stem.yin_yang(),
        }
    }

    pub fn pillar(&self) -> Pillar {
        Pillar::new(self.stem, self.branch)
    }

    pub fn contains(&self, age: i32) -> bool {
        (self.start_age..=self.end_age).contains(&age)
    }
}

/// A Daeun entry as delivered by a pillar provider; field names vary by source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDaeun {
    #[serde(alias = "age")]
    pub start_age: i32,
    #[serde(alias = "heavenlyStem")]
    pub stem: String,
    #[serde(alias = "earthlyBranch")]
    pub branch: String,
}

/// Normalize raw entries, sorted by start age.
///
/// Entries whose stem or branch cannot be read are dropped with a warning.
pub fn convert_saju_daeun_to_info(raw: &[RawDaeun]) -> Vec<DaeunInfo> {
    let mut periods: Vec<DaeunInfo> = raw
        .iter()
        .filter_map(|entry| match (entry.stem.parse(), entry.branch.parse()) {
            (Ok(stem), Ok(branch)) => Some(DaeunInfo::new(entry.start_age, stem, branch)),
            _ => {
                log::warn!(
                    "skipping daeun at age {}: unreadable pillar {}{}",
                    entry.start_age,
                    entry.stem,
                    entry.branch
                );
                None
            }
        })
        .collect();
    periods.sort_by_key(|d| d.start_age);
    periods
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DaeunDirection {
    Forward,
    Backward,
}

impl DaeunDirection {
    /// Yang-year men and yin-year women run forward (順行), the rest backward.
    pub fn for_person(year_stem: HeavenlyStem, gender: Gender) -> Self {
        match (year_stem.yin_yang(), gender) {
            (YinYang::Yang, Gender::Male) | (YinYang::Yin, Gender::Female) => DaeunDirection::Forward,
            _ => DaeunDirection::Backward,
        }
    }

    fn step(self) -> i32 {
        match self {
            DaeunDirection::Forward => 1,
            DaeunDirection::Backward => -1,
        }
    }
}

/// Successive periods stepping away from the month pillar.
pub fn build_daeun_sequence(
    month: Pillar,
    direction: DaeunDirection,
    first_start_age: i32,
    count: usize,
) -> Vec<DaeunInfo> {
    (1..=count as i32)
        .map(|n| {
            let pillar = month.shifted(n * direction.step());
            DaeunInfo::new(
                first_start_age.saturating_add((n - 1).saturating_mul(DAEUN_SPAN_YEARS)),
                pillar.stem,
                pillar.branch,
            )
        })
        .collect()
}

/// Period covering `age`, if any.
pub fn active_daeun(periods: &[DaeunInfo], age: i32) -> Option<&DaeunInfo> {
    periods.iter().find(|d| d.contains(age))
}
