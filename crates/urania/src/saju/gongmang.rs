//! Gongmang (空亡): the two branches left void by each ten-day group (旬) of
//! the sexagenary cycle.

use serde::{Deserialize, Serialize};

use crate::saju::pillars::{EarthlyBranch, HeavenlyStem, Pillar};

/// Void pair per group, in cycle order (甲子旬, 甲戌旬, ... 甲寅旬)
const XUN_VOIDS: [(EarthlyBranch, EarthlyBranch); 6] = [
    (EarthlyBranch::Dog, EarthlyBranch::Pig),
    (EarthlyBranch::Monkey, EarthlyBranch::Rooster),
    (EarthlyBranch::Horse, EarthlyBranch::Goat),
    (EarthlyBranch::Dragon, EarthlyBranch::Snake),
    (EarthlyBranch::Tiger, EarthlyBranch::Rabbit),
    (EarthlyBranch::Rat, EarthlyBranch::Ox),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gongmang {
    pub branches: [EarthlyBranch; 2],
    /// Head pillar of the ten-day group (always a 甲 pillar)
    pub xun_head: Pillar,
    /// The day pillar was outside the cycle and the 甲子 group was assumed
    pub is_fallback: bool,
}

impl Gongmang {
    pub fn contains(&self, branch: EarthlyBranch) -> bool {
        self.branches.contains(&branch)
    }

    fn from_group(group: usize, is_fallback: bool) -> Self {
        let (a, b) = XUN_VOIDS[group % 6];
        Self {
            branches: [a, b],
            xun_head: Pillar::from_sexagenary(group * 10),
            is_fallback,
        }
    }

    fn fallback() -> Self {
        Self::from_group(0, true)
    }
}

pub fn gongmang_for_day_pillar(stem: HeavenlyStem, branch: EarthlyBranch) -> Gongmang {
    match Pillar::new(stem, branch).sexagenary_index() {
        Some(index) => Gongmang::from_group(index / 10, false),
        None => {
            log::debug!("{}{} is not a sexagenary pillar, using 戌亥", stem, branch);
            Gongmang::fallback()
        }
    }
}

/// Same lookup from a two-character pillar ("丙寅", "병인").
pub fn gongmang_for_pillar_str(pillar: &str) -> Gongmang {
    match pillar.parse::<Pillar>() {
        Ok(p) => gongmang_for_day_pillar(p.stem, p.branch),
        Err(e) => {
            log::debug!("{}, using 戌亥", e);
            Gongmang::fallback()
        }
    }
}
