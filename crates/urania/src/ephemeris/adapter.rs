use chrono::{DateTime, Utc};
use std::env;
use std::path::{Path, PathBuf};
use swisseph::swe::{calc_ut, houses_ex, set_ephe_path};
use swisseph::{AscMc, Cusp};

use crate::angles::normalize;
use crate::chart::BodyId;
use crate::ephemeris::time::{datetime_to_julian_day, julian_day_to_datetime};
use crate::ephemeris::types::{
    BodyPosition, ChartPositions, EphemerisProvider, EphemerisSettings, GeoLocation, HousePositions,
};
use crate::error::EphemerisError;

// Swiss Ephemeris planet IDs
const PLANET_IDS: &[(BodyId, i32)] = &[
    (BodyId::Sun, 0),
    (BodyId::Moon, 1),
    (BodyId::Mercury, 2),
    (BodyId::Venus, 3),
    (BodyId::Mars, 4),
    (BodyId::Jupiter, 5),
    (BodyId::Saturn, 6),
    (BodyId::Uranus, 7),
    (BodyId::Neptune, 8),
    (BodyId::Pluto, 9),
    (BodyId::Chiron, 15),
    (BodyId::NorthNode, 11), // TRUE_NODE
];

// FLG_SWIEPH | FLG_SPEED
const FLAGS: i32 = 2 | 256;

/// Swiss Ephemeris adapter implementation (tropical zodiac)
///
/// The data path is process-wide in the Swiss library, so the last adapter
/// created decides which files every adapter reads.
pub struct SwissEphemerisAdapter {
    ephemeris_path: PathBuf,
    settings: EphemerisSettings,
}

impl SwissEphemerisAdapter {
    /// Create a new adapter with optional ephemeris path
    pub fn new(ephemeris_path: Option<PathBuf>, settings: EphemerisSettings) -> Result<Self, EphemerisError> {
        let path = ephemeris_path.unwrap_or_else(|| {
            env::var("SWISS_EPHEMERIS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/usr/local/share/swisseph"))
        });

        if !path.exists() {
            return Err(EphemerisError::FileNotFound {
                path: path.display().to_string(),
                message: "Ephemeris path does not exist. Please ensure Swiss Ephemeris data files are installed.".to_string(),
            });
        }

        let path_str = path.to_str().ok_or_else(|| EphemerisError::FileNotFound {
            path: path.display().to_string(),
            message: "Ephemeris path is not valid UTF-8.".to_string(),
        })?;
        set_ephe_path(path_str);
        log::debug!("swiss ephemeris data path set to {}", path_str);

        Ok(Self {
            ephemeris_path: path,
            settings,
        })
    }

    /// Directory handed to the Swiss library
    pub fn ephemeris_path(&self) -> &Path {
        &self.ephemeris_path
    }

    /// Calculate position for a single body
    pub fn calc_body_position(&self, body: BodyId, jd: f64) -> Result<BodyPosition, EphemerisError> {
        if body == BodyId::SouthNode {
            let north = self.calc_body_position(BodyId::NorthNode, jd)?;
            return Ok(BodyPosition {
                id: BodyId::SouthNode,
                lon: normalize(north.lon + 180.0),
                lat: -north.lat,
                speed_lon: north.speed_lon,
            });
        }

        let planet_code = PLANET_IDS
            .iter()
            .find(|(id, _)| *id == body)
            .map(|(_, code)| *code)
            .ok_or(EphemerisError::UnsupportedBody { body })?;

        let result = calc_ut(jd, planet_code as u32, FLAGS as u32).map_err(|e| {
            EphemerisError::CalculationFailed {
                body,
                datetime: julian_day_to_datetime(jd).unwrap_or_default(),
                message: format!("Swiss Ephemeris error: {}", e),
            }
        })?;

        let out = result.out;
        Ok(BodyPosition {
            id: body,
            lon: normalize(out[0]),
            lat: out[1],
            speed_lon: Some(out[3]),
        })
    }

    /// Calculate house cusps and angles
    pub fn calc_houses(&self, jd: f64, location: &GeoLocation) -> Result<HousePositions, EphemerisError> {
        let system = self.settings.house_system;
        let (c, a) = houses_ex(jd, FLAGS, location.lat, location.lon, system.swiss_code() as i32);
        let cusps = Cusp::from_array(c);
        let ascmc = AscMc::from_array(a);

        let cusp_values = [
            cusps.first, cusps.second, cusps.third, cusps.fourth,
            cusps.fifth, cusps.sixth, cusps.seventh, cusps.eighth,
            cusps.ninth, cusps.tenth, cusps.eleventh, cusps.twelfth,
        ];
        if cusp_values.iter().any(|c| !c.is_finite()) {
            return Err(EphemerisError::HouseCalculationFailed {
                message: format!("{:?} cusps undefined at latitude {}", system, location.lat),
            });
        }

        Ok(HousePositions {
            system,
            cusps: cusp_values.map(normalize),
            ascendant: normalize(ascmc.ascendant),
            midheaven: normalize(ascmc.mc),
        })
    }
}

impl EphemerisProvider for SwissEphemerisAdapter {
    fn compute_positions(
        &self,
        moment: DateTime<Utc>,
        location: &GeoLocation,
    ) -> Result<ChartPositions, EphemerisError> {
        let jd = datetime_to_julian_day(moment);
        let mut bodies = Vec::new();
        for &id in &self.settings.include_objects {
            if id.is_angle() {
                continue;
            }
            match self.calc_body_position(id, jd) {
                Ok(pos) => bodies.push(pos),
                Err(e) => log::warn!("Swiss Ephemeris skipped {}: {}", id, e),
            }
        }

        Ok(ChartPositions {
            bodies,
            houses: self.calc_houses(jd, location)?,
        })
    }

    fn body_longitude(&self, body: BodyId, moment: DateTime<Utc>) -> Result<f64, EphemerisError> {
        self.calc_body_position(body, datetime_to_julian_day(moment))
            .map(|p| p.lon)
    }
}
