pub mod analyzer;
pub mod cycles;
pub mod narrative;
pub mod types;

pub use analyzer::{
    analyze_daeun_transit_sync, DaeunTransitSynchronizer, RelationDeltas, SyncConfig, MAX_BOUNDARY_WINDOW,
};
pub use cycles::{default_cycles, detect_transits, CycleSpec};
pub use types::{
    MajorTransition, SyncAnalysisResult, SyncOptions, SyncPoint, SynergyType, Tier5Metrics, Tier5Summary,
    TransitEvent, TransitType, YearMarker,
};
