//! Astrological relationship math (aspects, progressions, returns) and the
//! Saju Daeun / Western transit synchronizer.

pub mod angles;
pub mod aspects;
pub mod chart;
pub mod config;
pub mod ephemeris;
pub mod error;
pub mod progressions;
pub mod returns;
pub mod saju;
pub mod sync;

pub use angles::{normalize, separation, sign_of, SignPosition, ZodiacSign};
pub use aspects::{find_aspects, find_natal_aspects, AspectCalculator, AspectHit, AspectRules, AspectType};
pub use chart::{natal_chart, transit_chart, BirthData, Body, BodyId, Chart, ChartKind};
pub use config::UraniaConfig;
pub use ephemeris::{AnalyticEphemeris, EphemerisProvider, GeoLocation};
pub use error::{ChartError, EphemerisError, ProgressionError, ReturnError};
pub use progressions::{
    calculate_secondary_progressions, calculate_solar_arc_directions, find_progressed_internal_aspects,
    find_progressed_moon_aspects, find_progressed_to_natal_aspects, get_progressed_moon_phase, MoonPhase,
    ProgressedChart, ProgressionMethod,
};
pub use returns::{
    calculate_lunar_return, calculate_solar_return, get_lunar_return_summary, get_solar_return_summary,
    next_return, ReturnChart, ReturnKind,
};
pub use saju::{convert_saju_daeun_to_info, DaeunInfo, Element, RawDaeun};
pub use sync::{analyze_daeun_transit_sync, SyncAnalysisResult, SyncOptions, SyncPoint, SynergyType};
