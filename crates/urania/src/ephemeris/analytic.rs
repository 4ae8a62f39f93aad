//! Self-contained low-precision ephemeris.
//!
//! Sun from the low-precision solar theory (Meeus ch. 25), Moon from its
//! six largest periodic terms, planets from mean Keplerian elements
//! (Standish, valid 1800-2050) reduced to geocentric longitude, and the
//! mean lunar node. Good to a few tenths of a degree for the Sun, Moon and
//! inner planets, which is enough for return searches and chart sketches.
//! Angles come from GMST and the mean obliquity.

use chrono::{DateTime, Utc};
use std::f64::consts::PI;

use crate::angles::{normalize, signed_delta};
use crate::chart::BodyId;
use crate::ephemeris::time::{datetime_to_julian_day, julian_centuries, julian_day_to_datetime, J2000_JD};
use crate::ephemeris::types::{
    BodyPosition, ChartPositions, EphemerisProvider, EphemerisSettings, GeoLocation, HousePositions,
    HouseSystem,
};
use crate::error::EphemerisError;

/// General precession in longitude, degrees per Julian century.
const PRECESSION_DEG_PER_CENTURY: f64 = 1.396_971;
/// Half-width of the central difference used for speeds, in days.
const SPEED_STEP_DAYS: f64 = 0.5;

const SUPPORTED_HOUSES: &[HouseSystem] = &[HouseSystem::Porphyry, HouseSystem::Equal, HouseSystem::WholeSign];

/// Mean orbital elements at J2000 and their rates per century:
/// a (AU), e, I, L, long. perihelion, long. ascending node (degrees).
struct OrbitalElements {
    base: [f64; 6],
    rate: [f64; 6],
}

const EARTH: OrbitalElements = OrbitalElements {
    base: [1.000_002_61, 0.016_711_23, -0.000_015_31, 100.464_571_66, 102.937_681_93, 0.0],
    rate: [0.000_005_62, -0.000_043_92, -0.012_946_68, 35_999.372_449_81, 0.323_273_64, 0.0],
};

const PLANET_ELEMENTS: &[(BodyId, OrbitalElements)] = &[
    (BodyId::Mercury, OrbitalElements {
        base: [0.387_099_27, 0.205_635_93, 7.004_979_02, 252.250_323_50, 77.457_796_28, 48.330_765_93],
        rate: [0.000_000_37, 0.000_019_06, -0.005_947_49, 149_472.674_111_75, 0.160_476_89, -0.125_340_81],
    }),
    (BodyId::Venus, OrbitalElements {
        base: [0.723_335_66, 0.006_776_72, 3.394_676_05, 181.979_099_50, 131.602_467_18, 76.679_842_55],
        rate: [0.000_003_90, -0.000_041_07, -0.000_788_90, 58_517.815_387_29, 0.002_683_29, -0.277_694_18],
    }),
    (BodyId::Mars, OrbitalElements {
        base: [1.523_710_34, 0.093_394_10, 1.849_691_42, -4.553_432_05, -23.943_629_59, 49.559_538_91],
        rate: [0.000_018_47, 0.000_078_82, -0.008_131_31, 19_140.302_684_99, 0.444_410_88, -0.292_573_43],
    }),
    (BodyId::Jupiter, OrbitalElements {
        base: [5.202_887_00, 0.048_386_24, 1.304_396_95, 34.396_440_51, 14.728_479_83, 100.473_909_09],
        rate: [-0.000_116_07, -0.000_132_53, -0.001_837_14, 3_034.746_127_75, 0.212_526_68, 0.204_691_06],
    }),
    (BodyId::Saturn, OrbitalElements {
        base: [9.536_675_94, 0.053_861_79, 2.485_991_87, 49.954_244_23, 92.598_878_31, 113.662_424_48],
        rate: [-0.001_250_60, -0.000_509_91, 0.001_936_09, 1_222.493_622_01, -0.418_972_16, -0.288_677_94],
    }),
    (BodyId::Uranus, OrbitalElements {
        base: [19.189_164_64, 0.047_257_44, 0.772_637_83, 313.238_104_51, 170.954_276_30, 74.016_925_03],
        rate: [-0.001_961_76, -0.000_043_97, -0.002_429_39, 428.482_027_85, 0.408_052_81, 0.042_405_89],
    }),
    (BodyId::Neptune, OrbitalElements {
        base: [30.069_922_76, 0.008_590_48, 1.770_043_47, -55.120_029_69, 44.964_762_27, 131.784_225_74],
        rate: [0.000_262_91, 0.000_051_05, 0.000_353_72, 218.459_453_25, -0.322_414_64, -0.005_086_64],
    }),
    (BodyId::Pluto, OrbitalElements {
        base: [39.482_116_75, 0.248_827_30, 17.140_012_06, 238.929_038_33, 224.068_916_29, 110.303_936_84],
        rate: [-0.000_315_96, 0.000_051_70, 0.000_048_18, 145.207_805_15, -0.040_629_42, -0.011_834_82],
    }),
];

/// Deterministic analytic ephemeris with no data files.
#[derive(Debug, Clone)]
pub struct AnalyticEphemeris {
    settings: EphemerisSettings,
}

impl AnalyticEphemeris {
    /// Porphyry houses, default bodies.
    pub fn new() -> Self {
        Self {
            settings: EphemerisSettings {
                house_system: HouseSystem::Porphyry,
                ..EphemerisSettings::default()
            },
        }
    }

    pub fn with_settings(settings: EphemerisSettings) -> Result<Self, EphemerisError> {
        if !SUPPORTED_HOUSES.contains(&settings.house_system) {
            return Err(EphemerisError::UnsupportedHouseSystem {
                system: settings.house_system,
                supported: SUPPORTED_HOUSES.to_vec(),
            });
        }
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &EphemerisSettings {
        &self.settings
    }

    /// Tropical geocentric longitude at a Julian day.
    pub fn longitude_at(&self, body: BodyId, jd: f64) -> Result<f64, EphemerisError> {
        let t = julian_centuries(jd);
        let lon = match body {
            BodyId::Sun => sun_longitude(t),
            BodyId::Moon => moon_longitude(t),
            BodyId::NorthNode => mean_node(t),
            BodyId::SouthNode => normalize(mean_node(t) + 180.0),
            _ => {
                let elements = PLANET_ELEMENTS
                    .iter()
                    .find(|(id, _)| *id == body)
                    .map(|(_, el)| el)
                    .ok_or(EphemerisError::UnsupportedBody { body })?;
                planet_longitude(elements, t)
            }
        };
        if !lon.is_finite() {
            return Err(EphemerisError::CalculationFailed {
                body,
                datetime: julian_day_to_datetime(jd).unwrap_or_default(),
                message: "non-finite longitude".to_string(),
            });
        }
        Ok(lon)
    }

    fn speed_at(&self, body: BodyId, jd: f64) -> Result<f64, EphemerisError> {
        let ahead = self.longitude_at(body, jd + SPEED_STEP_DAYS)?;
        let behind = self.longitude_at(body, jd - SPEED_STEP_DAYS)?;
        Ok(signed_delta(ahead, behind) / (2.0 * SPEED_STEP_DAYS))
    }

    /// Angles and cusps for a Julian day and place.
    pub fn houses_at(&self, jd: f64, location: &GeoLocation) -> Result<HousePositions, EphemerisError> {
        let (ascendant, midheaven) = angles(jd, location);
        let cusps = match self.settings.house_system {
            HouseSystem::Porphyry => porphyry_cusps(ascendant, midheaven),
            HouseSystem::Equal => std::array::from_fn(|i| normalize(ascendant + 30.0 * i as f64)),
            HouseSystem::WholeSign => {
                let first = (ascendant / 30.0).floor() * 30.0;
                std::array::from_fn(|i| normalize(first + 30.0 * i as f64))
            }
            other => {
                return Err(EphemerisError::UnsupportedHouseSystem {
                    system: other,
                    supported: SUPPORTED_HOUSES.to_vec(),
                })
            }
        };

        Ok(HousePositions {
            system: self.settings.house_system,
            cusps,
            ascendant,
            midheaven,
        })
    }
}

impl Default for AnalyticEphemeris {
    fn default() -> Self {
        Self::new()
    }
}

impl EphemerisProvider for AnalyticEphemeris {
    fn compute_positions(
        &self,
        moment: DateTime<Utc>,
        location: &GeoLocation,
    ) -> Result<ChartPositions, EphemerisError> {
        let jd = datetime_to_julian_day(moment);
        let mut bodies = Vec::with_capacity(self.settings.include_objects.len());
        for &id in &self.settings.include_objects {
            if id.is_angle() {
                continue;
            }
            match self.longitude_at(id, jd) {
                Ok(lon) => bodies.push(BodyPosition {
                    id,
                    lon,
                    lat: 0.0,
                    speed_lon: Some(self.speed_at(id, jd)?),
                }),
                Err(EphemerisError::UnsupportedBody { body }) => {
                    log::debug!("analytic ephemeris skips {}", body);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(ChartPositions {
            bodies,
            houses: self.houses_at(jd, location)?,
        })
    }

    fn body_longitude(&self, body: BodyId, moment: DateTime<Utc>) -> Result<f64, EphemerisError> {
        self.longitude_at(body, datetime_to_julian_day(moment))
    }
}

fn sin_deg(x: f64) -> f64 {
    x.to_radians().sin()
}

fn cos_deg(x: f64) -> f64 {
    x.to_radians().cos()
}

fn sun_mean_anomaly(t: f64) -> f64 {
    357.529_11 + 35_999.050_29 * t - 0.000_153_7 * t * t
}

fn sun_longitude(t: f64) -> f64 {
    let l0 = 280.466_46 + 36_000.769_83 * t + 0.000_303_2 * t * t;
    let m = sun_mean_anomaly(t);
    let c = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * sin_deg(m)
        + (0.019_993 - 0.000_101 * t) * sin_deg(2.0 * m)
        + 0.000_289 * sin_deg(3.0 * m);
    normalize(l0 + c)
}

fn moon_longitude(t: f64) -> f64 {
    let l = 218.316_447_7 + 481_267.881_234_21 * t;
    let d = 297.850_192_1 + 445_267.111_403_4 * t;
    let m = sun_mean_anomaly(t);
    let mp = 134.963_396_4 + 477_198.867_505_5 * t;
    let f = 93.272_095_0 + 483_202.017_523_3 * t;

    normalize(
        l + 6.288_774 * sin_deg(mp)
            + 1.274_027 * sin_deg(2.0 * d - mp)
            + 0.658_314 * sin_deg(2.0 * d)
            + 0.213_618 * sin_deg(2.0 * mp)
            - 0.185_116 * sin_deg(m)
            - 0.114_332 * sin_deg(2.0 * f),
    )
}

fn mean_node(t: f64) -> f64 {
    normalize(125.044_52 - 1_934.136_261 * t + 0.002_070_8 * t * t)
}

/// Heliocentric ecliptic (J2000) rectangular coordinates in AU.
fn heliocentric(el: &OrbitalElements, t: f64) -> (f64, f64, f64) {
    let at = |k: usize| el.base[k] + el.rate[k] * t;
    let (a, e, incl, l, peri, node) = (at(0), at(1), at(2).to_radians(), at(3), at(4), at(5));

    let omega = (peri - node).to_radians();
    let node = node.to_radians();
    let mean_anomaly = signed_delta(l, peri).to_radians();
    let ecc_anomaly = solve_kepler(mean_anomaly, e);

    let xp = a * (ecc_anomaly.cos() - e);
    let yp = a * (1.0 - e * e).sqrt() * ecc_anomaly.sin();

    let (so, co) = omega.sin_cos();
    let (sn, cn) = node.sin_cos();
    let (si, ci) = incl.sin_cos();

    let x = (co * cn - so * sn * ci) * xp + (-so * cn - co * sn * ci) * yp;
    let y = (co * sn + so * cn * ci) * xp + (-so * sn + co * cn * ci) * yp;
    let z = (so * si) * xp + (co * si) * yp;
    (x, y, z)
}

fn solve_kepler(mean_anomaly: f64, e: f64) -> f64 {
    let mut ecc = mean_anomaly + e * mean_anomaly.sin();
    for _ in 0..12 {
        let delta = (ecc - e * ecc.sin() - mean_anomaly) / (1.0 - e * ecc.cos());
        ecc -= delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ecc
}

fn planet_longitude(el: &OrbitalElements, t: f64) -> f64 {
    let (xp, yp, _) = heliocentric(el, t);
    let (xe, ye, _) = heliocentric(&EARTH, t);
    let lon = (yp - ye).atan2(xp - xe) * 180.0 / PI;
    normalize(lon + PRECESSION_DEG_PER_CENTURY * t)
}

/// (Ascendant, Midheaven) in degrees.
fn angles(jd: f64, location: &GeoLocation) -> (f64, f64) {
    let t = julian_centuries(jd);
    let gmst = 280.460_618_37 + 360.985_647_366_29 * (jd - J2000_JD) + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;
    let lst = normalize(gmst + location.lon);
    let eps = 23.439_291 - 0.013_004_2 * t;
    // Keep tan(lat) finite at the poles.
    let lat = location.lat.clamp(-89.999, 89.999);

    let midheaven = normalize(sin_deg(lst).atan2(cos_deg(lst) * cos_deg(eps)).to_degrees());
    let ascendant = normalize(
        cos_deg(lst)
            .atan2(-(sin_deg(lst) * cos_deg(eps) + lat.to_radians().tan() * sin_deg(eps)))
            .to_degrees(),
    );
    (ascendant, midheaven)
}

/// Trisect each quadrant between the angles.
fn porphyry_cusps(ascendant: f64, midheaven: f64) -> [f64; 12] {
    let ic = normalize(midheaven + 180.0);
    let descendant = normalize(ascendant + 180.0);
    let mut cusps = [0.0; 12];
    let quadrants = [(0, ascendant, ic), (3, ic, descendant), (6, descendant, midheaven), (9, midheaven, ascendant)];
    for (start_index, from, to) in quadrants {
        let arc = normalize(to - from);
        for k in 0..3 {
            cusps[start_index + k] = normalize(from + arc * k as f64 / 3.0);
        }
    }
    cusps
}
