pub mod body;
pub mod data;

pub use body::{Body, BodyId};
pub use data::{BirthData, Chart, ChartKind, HouseCusp};

use chrono::{DateTime, Utc};

use crate::angles::normalize;
use crate::ephemeris::{EphemerisProvider, GeoLocation};
use crate::error::ChartError;

/// House (1-12) containing a longitude, given cusps in house order.
///
/// Degenerate cusp sets (all equal) place everything in house 1.
pub fn house_of(longitude: f64, cusps: &[f64; 12]) -> u8 {
    let lon = normalize(longitude);
    for i in 0..12 {
        let start = cusps[i];
        let span = normalize(cusps[(i + 1) % 12] - start);
        if span > 0.0 && normalize(lon - start) < span {
            return (i + 1) as u8;
        }
    }
    1
}

/// Compute the natal chart for a birth through an ephemeris provider.
pub fn natal_chart<E: EphemerisProvider + ?Sized>(
    provider: &E,
    birth: &BirthData,
) -> Result<Chart, ChartError> {
    let moment = birth.to_utc()?;
    let location = birth.location();
    let positions = provider.compute_positions(moment, &location)?;
    log::debug!(
        "natal chart at {} ({:.4}, {:.4}): {} bodies",
        moment,
        location.lat,
        location.lon,
        positions.bodies.len()
    );
    Ok(Chart::from_positions(
        ChartKind::Natal,
        moment,
        Some(location),
        Some(birth.clone()),
        &positions,
    ))
}

/// Compute the sky at an arbitrary instant and place.
pub fn transit_chart<E: EphemerisProvider + ?Sized>(
    provider: &E,
    moment: DateTime<Utc>,
    location: &GeoLocation,
) -> Result<Chart, ChartError> {
    let positions = provider.compute_positions(moment, location)?;
    Ok(Chart::from_positions(
        ChartKind::Transit,
        moment,
        Some(*location),
        None,
        &positions,
    ))
}
