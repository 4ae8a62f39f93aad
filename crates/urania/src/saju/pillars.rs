//! Heavenly stems, earthly branches and the sexagenary pillars built from them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::saju::elements::{Element, YinYang};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeavenlyStem {
    #[serde(rename = "甲", alias = "갑")]
    Gap,
    #[serde(rename = "乙", alias = "을")]
    Eul,
    #[serde(rename = "丙", alias = "병")]
    Byeong,
    #[serde(rename = "丁", alias = "정")]
    Jeong,
    #[serde(rename = "戊", alias = "무")]
    Mu,
    #[serde(rename = "己", alias = "기")]
    Gi,
    #[serde(rename = "庚", alias = "경")]
    Gyeong,
    #[serde(rename = "辛", alias = "신")]
    Sin,
    #[serde(rename = "壬", alias = "임")]
    Im,
    #[serde(rename = "癸", alias = "계")]
    Gye,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EarthlyBranch {
    #[serde(rename = "子", alias = "자")]
    Rat,
    #[serde(rename = "丑", alias = "축")]
    Ox,
    #[serde(rename = "寅", alias = "인")]
    Tiger,
    #[serde(rename = "卯", alias = "묘")]
    Rabbit,
    #[serde(rename = "辰", alias = "진")]
    Dragon,
    #[serde(rename = "巳", alias = "사")]
    Snake,
    #[serde(rename = "午", alias = "오")]
    Horse,
    #[serde(rename = "未", alias = "미")]
    Goat,
    #[serde(rename = "申", alias = "신")]
    Monkey,
    #[serde(rename = "酉", alias = "유")]
    Rooster,
    #[serde(rename = "戌", alias = "술")]
    Dog,
    #[serde(rename = "亥", alias = "해")]
    Pig,
}

// (hanja, hangul, romanized)
const STEM_NAMES: [(&str, &str, &str); 10] = [
    ("甲", "갑", "gap"),
    ("乙", "을", "eul"),
    ("丙", "병", "byeong"),
    ("丁", "정", "jeong"),
    ("戊", "무", "mu"),
    ("己", "기", "gi"),
    ("庚", "경", "gyeong"),
    ("辛", "신", "sin"),
    ("壬", "임", "im"),
    ("癸", "계", "gye"),
];

const BRANCH_NAMES: [(&str, &str, &str); 12] = [
    ("子", "자", "ja"),
    ("丑", "축", "chuk"),
    ("寅", "인", "in"),
    ("卯", "묘", "myo"),
    ("辰", "진", "jin"),
    ("巳", "사", "sa"),
    ("午", "오", "o"),
    ("未", "미", "mi"),
    ("申", "신", "sin"),
    ("酉", "유", "yu"),
    ("戌", "술", "sul"),
    ("亥", "해", "hae"),
];

/// Element carried by each branch
const BRANCH_ELEMENTS: [Element; 12] = [
    Element::Water,
    Element::Earth,
    Element::Wood,
    Element::Wood,
    Element::Earth,
    Element::Fire,
    Element::Fire,
    Element::Earth,
    Element::Metal,
    Element::Metal,
    Element::Earth,
    Element::Water,
];

/// Element of the season a branch's month falls in (寅卯辰 spring, 巳午未 summer, ...)
const BRANCH_SEASONS: [Element; 12] = [
    Element::Water,
    Element::Water,
    Element::Wood,
    Element::Wood,
    Element::Wood,
    Element::Fire,
    Element::Fire,
    Element::Fire,
    Element::Metal,
    Element::Metal,
    Element::Metal,
    Element::Water,
];

lazy_static::lazy_static! {
    static ref STEM_LOOKUP: HashMap<&'static str, HeavenlyStem> = {
        let mut map = HashMap::new();
        for (i, (hanja, hangul, roman)) in STEM_NAMES.iter().enumerate() {
            let stem = HeavenlyStem::ALL[i];
            map.insert(*hanja, stem);
            map.insert(*hangul, stem);
            map.insert(*roman, stem);
        }
        map
    };

    static ref BRANCH_LOOKUP: HashMap<&'static str, EarthlyBranch> = {
        let mut map = HashMap::new();
        for (i, (hanja, hangul, roman)) in BRANCH_NAMES.iter().enumerate() {
            let branch = EarthlyBranch::ALL[i];
            map.insert(*hanja, branch);
            map.insert(*hangul, branch);
            map.insert(*roman, branch);
        }
        map
    };
}

impl HeavenlyStem {
    pub const ALL: [HeavenlyStem; 10] = [
        HeavenlyStem::Gap,
        HeavenlyStem::Eul,
        HeavenlyStem::Byeong,
        HeavenlyStem::Jeong,
        HeavenlyStem::Mu,
        HeavenlyStem::Gi,
        HeavenlyStem::Gyeong,
        HeavenlyStem::Sin,
        HeavenlyStem::Im,
        HeavenlyStem::Gye,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 10]
    }

    /// Stems pair up per element: 甲乙 wood, 丙丁 fire, ...
    pub fn element(self) -> Element {
        Element::ALL[self.index() / 2]
    }

    pub fn yin_yang(self) -> YinYang {
        YinYang::from_index(self.index())
    }

    pub fn hanja(self) -> &'static str {
        STEM_NAMES[self.index()].0
    }

    pub fn hangul(self) -> &'static str {
        STEM_NAMES[self.index()].1
    }
}

impl EarthlyBranch {
    pub const ALL: [EarthlyBranch; 12] = [
        EarthlyBranch::Rat,
        EarthlyBranch::Ox,
        EarthlyBranch::Tiger,
        EarthlyBranch::Rabbit,
        EarthlyBranch::Dragon,
        EarthlyBranch::Snake,
        EarthlyBranch::Horse,
        EarthlyBranch::Goat,
        EarthlyBranch::Monkey,
        EarthlyBranch::Rooster,
        EarthlyBranch::Dog,
        EarthlyBranch::Pig,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    pub fn element(self) -> Element {
        BRANCH_ELEMENTS[self.index()]
    }

    pub fn season_element(self) -> Element {
        BRANCH_SEASONS[self.index()]
    }

    pub fn yin_yang(self) -> YinYang {
        YinYang::from_index(self.index())
    }

    pub fn hanja(self) -> &'static str {
        BRANCH_NAMES[self.index()].0
    }

    pub fn hangul(self) -> &'static str {
        BRANCH_NAMES[self.index()].1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSymbol(pub String);

impl fmt::Display for UnknownSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown stem or branch: {}", self.0)
    }
}

impl std::error::Error for UnknownSymbol {}

impl FromStr for HeavenlyStem {
    type Err = UnknownSymbol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        STEM_LOOKUP
            .get(key.as_str())
            .copied()
            .ok_or_else(|| UnknownSymbol(s.to_string()))
    }
}

impl FromStr for EarthlyBranch {
    type Err = UnknownSymbol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        BRANCH_LOOKUP
            .get(key.as_str())
            .copied()
            .ok_or_else(|| UnknownSymbol(s.to_string()))
    }
}

impl fmt::Display for HeavenlyStem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hanja())
    }
}

impl fmt::Display for EarthlyBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hanja())
    }
}

/// One stem-branch pair (柱)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pillar {
    pub stem: HeavenlyStem,
    pub branch: EarthlyBranch,
}

impl Pillar {
    pub fn new(stem: HeavenlyStem, branch: EarthlyBranch) -> Self {
        Self { stem, branch }
    }

    /// Pillar at position 0..60 of the sexagenary cycle (0 = 甲子)
    pub fn from_sexagenary(index: usize) -> Self {
        Self::new(HeavenlyStem::from_index(index), EarthlyBranch::from_index(index))
    }

    /// Position in the 60-cycle; `None` when stem and branch polarity differ.
    pub fn sexagenary_index(self) -> Option<usize> {
        (0..60).find(|n| n % 10 == self.stem.index() && n % 12 == self.branch.index())
    }

    /// Neighbouring pillar in the cycle, `steps` may be negative.
    pub fn shifted(self, steps: i32) -> Self {
        Self::new(
            HeavenlyStem::from_index((self.stem.index() as i32 + steps).rem_euclid(10) as usize),
            EarthlyBranch::from_index((self.branch.index() as i32 + steps).rem_euclid(12) as usize),
        )
    }
}

impl FromStr for Pillar {
    type Err = UnknownSymbol;

    /// Two characters, stem then branch ("甲子", "갑자")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(stem), Some(branch), None) => Ok(Pillar::new(
                stem.to_string().parse()?,
                branch.to_string().parse()?,
            )),
            _ => Err(UnknownSymbol(s.to_string())),
        }
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stem, self.branch)
    }
}

/// The four pillars of a birth; the hour may be unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SajuPillars {
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub time: Option<Pillar>,
}

impl SajuPillars {
    /// Day stem, the "day master"
    pub fn day_master(&self) -> HeavenlyStem {
        self.day.stem
    }
}
