pub mod calculator;
pub mod types;

pub use calculator::{find_aspects, find_natal_aspects, AspectCalculator};
pub use types::{
    AspectCore, AspectEndpoint, AspectHit, AspectPolicy, AspectRules, AspectType, OrbTable,
};
