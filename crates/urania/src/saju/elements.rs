//! Five elements (오행) and yin/yang.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    #[serde(rename = "목", alias = "wood")]
    Wood,
    #[serde(rename = "화", alias = "fire")]
    Fire,
    #[serde(rename = "토", alias = "earth")]
    Earth,
    #[serde(rename = "금", alias = "metal")]
    Metal,
    #[serde(rename = "수", alias = "water")]
    Water,
}

/// Generation cycle (生): each element feeds exactly one other.
const GENERATES: [(Element, Element); 5] = [
    (Element::Wood, Element::Fire),
    (Element::Fire, Element::Earth),
    (Element::Earth, Element::Metal),
    (Element::Metal, Element::Water),
    (Element::Water, Element::Wood),
];

/// Control cycle (克): each element restrains exactly one other.
const CONTROLS: [(Element, Element); 5] = [
    (Element::Wood, Element::Earth),
    (Element::Earth, Element::Water),
    (Element::Water, Element::Fire),
    (Element::Fire, Element::Metal),
    (Element::Metal, Element::Wood),
];

/// How one element stands towards another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementRelation {
    Same,
    /// self generates other
    Generates,
    /// other generates self
    GeneratedBy,
    /// self controls other
    Controls,
    /// other controls self
    ControlledBy,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    pub fn generates(self) -> Element {
        lookup(&GENERATES, self)
    }

    pub fn controls(self) -> Element {
        lookup(&CONTROLS, self)
    }

    pub fn generated_by(self) -> Element {
        reverse_lookup(&GENERATES, self)
    }

    pub fn controlled_by(self) -> Element {
        reverse_lookup(&CONTROLS, self)
    }

    pub fn relation_to(self, other: Element) -> ElementRelation {
        if self == other {
            ElementRelation::Same
        } else if self.generates() == other {
            ElementRelation::Generates
        } else if other.generates() == self {
            ElementRelation::GeneratedBy
        } else if self.controls() == other {
            ElementRelation::Controls
        } else {
            ElementRelation::ControlledBy
        }
    }

    pub fn korean(self) -> &'static str {
        match self {
            Element::Wood => "목",
            Element::Fire => "화",
            Element::Earth => "토",
            Element::Metal => "금",
            Element::Water => "수",
        }
    }

    pub fn hanja(self) -> &'static str {
        match self {
            Element::Wood => "木",
            Element::Fire => "火",
            Element::Earth => "土",
            Element::Metal => "金",
            Element::Water => "水",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Element::Wood => "wood",
            Element::Fire => "fire",
            Element::Earth => "earth",
            Element::Metal => "metal",
            Element::Water => "water",
        }
    }
}

fn lookup(table: &[(Element, Element); 5], from: Element) -> Element {
    table
        .iter()
        .find(|(a, _)| *a == from)
        .map(|(_, b)| *b)
        .unwrap_or(from)
}

fn reverse_lookup(table: &[(Element, Element); 5], to: Element) -> Element {
    table
        .iter()
        .find(|(_, b)| *b == to)
        .map(|(a, _)| *a)
        .unwrap_or(to)
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.korean())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YinYang {
    #[serde(rename = "양", alias = "yang")]
    Yang,
    #[serde(rename = "음", alias = "yin")]
    Yin,
}

impl YinYang {
    pub fn from_index(index: usize) -> Self {
        if index % 2 == 0 {
            YinYang::Yang
        } else {
            YinYang::Yin
        }
    }
}
