pub mod analytic;
pub mod time;
pub mod types;

#[cfg(feature = "swisseph")]
pub mod adapter;

pub use analytic::AnalyticEphemeris;
pub use types::{
    BodyPosition, ChartPositions, EphemerisProvider, EphemerisSettings, GeoLocation, HousePositions,
    HouseSystem,
};

#[cfg(feature = "swisseph")]
pub use adapter::SwissEphemerisAdapter;
