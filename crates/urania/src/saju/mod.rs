pub mod compatibility;
pub mod daeun;
pub mod elements;
pub mod gongmang;
pub mod pillars;

pub use compatibility::{analyze_compatibility, BranchRelation, CompatibilityReport};
pub use daeun::{
    active_daeun, build_daeun_sequence, convert_saju_daeun_to_info, DaeunDirection, DaeunInfo, Gender,
    RawDaeun,
};
pub use elements::{Element, ElementRelation, YinYang};
pub use gongmang::{gongmang_for_day_pillar, gongmang_for_pillar_str, Gongmang};
pub use pillars::{EarthlyBranch, HeavenlyStem, Pillar, SajuPillars, UnknownSymbol};
