use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::angles::{normalize, sign_of, ZodiacSign};
use crate::chart::body::{Body, BodyId};
use crate::chart::house_of;
use crate::ephemeris::types::{ChartPositions, GeoLocation, HouseSystem};
use crate::error::ChartError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Natal,
    Transit,
    Progressed,
    Return,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseCusp {
    pub house: u8,
    pub longitude: f64,
    pub sign: ZodiacSign,
}

/// Birth moment and place as entered by the user (local civil time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthData {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub latitude: f64,
    pub longitude: f64,
    /// IANA zone name, e.g. "Asia/Seoul"
    pub timezone: String,
}

impl BirthData {
    pub fn location(&self) -> GeoLocation {
        GeoLocation {
            lat: self.latitude,
            lon: self.longitude,
        }
    }

    /// Resolve the local birth time to UTC through the IANA zone.
    ///
    /// Ambiguous local times (DST fold) resolve to the earlier instant.
    pub fn to_utc(&self) -> Result<DateTime<Utc>, ChartError> {
        if !(-90.0..=90.0).contains(&self.latitude) || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ChartError::InvalidLocation {
                lat: self.latitude,
                lon: self.longitude,
            });
        }

        let naive = NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .and_then(|d| d.and_hms_opt(self.hour, self.minute, 0))
            .ok_or(ChartError::InvalidDateTime {
                year: self.year,
                month: self.month,
                day: self.day,
                hour: self.hour,
                minute: self.minute,
            })?;

        let tz: Tz = self
            .timezone
            .parse()
            .map_err(|_| ChartError::UnknownTimeZone(self.timezone.clone()))?;

        tz.from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| ChartError::NonexistentLocalTime {
                local: naive.to_string(),
                timezone: self.timezone.clone(),
            })
    }
}

/// Immutable snapshot of a sky at one moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    pub kind: ChartKind,
    pub moment: DateTime<Utc>,
    pub location: Option<GeoLocation>,
    pub house_system: HouseSystem,
    pub bodies: Vec<Body>,
    pub ascendant: Body,
    pub midheaven: Body,
    pub houses: [HouseCusp; 12],
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub birth: Option<BirthData>,
}

impl Chart {
    /// Build a chart from raw ephemeris output.
    pub fn from_positions(
        kind: ChartKind,
        moment: DateTime<Utc>,
        location: Option<GeoLocation>,
        birth: Option<BirthData>,
        positions: &ChartPositions,
    ) -> Self {
        let cusps = positions.houses.cusps.map(normalize);
        let bodies = positions
            .bodies
            .iter()
            .filter(|raw| !raw.id.is_angle())
            .map(|raw| Body::new(raw.id, raw.lon, raw.speed_lon, &cusps))
            .collect();

        Self {
            kind,
            moment,
            location,
            house_system: positions.houses.system,
            bodies,
            ascendant: Body::new(BodyId::Ascendant, positions.houses.ascendant, None, &cusps),
            midheaven: Body::new(BodyId::Midheaven, positions.houses.midheaven, None, &cusps),
            houses: build_cusps(&cusps),
            birth,
        }
    }

    /// Chart from bare longitudes, with equal houses from the Ascendant.
    ///
    /// For callers whose position source has no house engine.
    pub fn from_longitudes(
        kind: ChartKind,
        moment: DateTime<Utc>,
        bodies: &[(BodyId, f64, Option<f64>)],
        ascendant: f64,
        midheaven: f64,
    ) -> Self {
        let asc = normalize(ascendant);
        let cusps: [f64; 12] = std::array::from_fn(|i| normalize(asc + i as f64 * 30.0));
        Self {
            kind,
            moment,
            location: None,
            house_system: HouseSystem::Equal,
            bodies: bodies
                .iter()
                .filter(|(id, _, _)| !id.is_angle())
                .map(|&(id, lon, speed)| Body::new(id, lon, speed, &cusps))
                .collect(),
            ascendant: Body::new(BodyId::Ascendant, asc, None, &cusps),
            midheaven: Body::new(BodyId::Midheaven, midheaven, None, &cusps),
            houses: build_cusps(&cusps),
            birth: None,
        }
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        match id {
            BodyId::Ascendant => Some(&self.ascendant),
            BodyId::Midheaven => Some(&self.midheaven),
            _ => self.bodies.iter().find(|b| b.id == id),
        }
    }

    /// Bodies followed by the Ascendant and Midheaven.
    pub fn points(&self) -> impl Iterator<Item = &Body> {
        self.bodies
            .iter()
            .chain(std::iter::once(&self.ascendant))
            .chain(std::iter::once(&self.midheaven))
    }

    pub fn cusp_longitudes(&self) -> [f64; 12] {
        std::array::from_fn(|i| self.houses[i].longitude)
    }

    pub fn house_of(&self, longitude: f64) -> u8 {
        house_of(longitude, &self.cusp_longitudes())
    }

    /// Copy of this chart with every longitude (bodies, angles, cusps) turned by `arc`.
    pub fn rotated(&self, arc: f64, kind: ChartKind, moment: DateTime<Utc>) -> Self {
        let cusps = self.cusp_longitudes().map(|c| normalize(c + arc));
        let shift = |b: &Body| Body::new(b.id, b.longitude + arc, b.speed, &cusps);
        Self {
            kind,
            moment,
            location: self.location,
            house_system: self.house_system,
            bodies: self.bodies.iter().map(shift).collect(),
            ascendant: shift(&self.ascendant),
            midheaven: shift(&self.midheaven),
            houses: build_cusps(&cusps),
            birth: self.birth.clone(),
        }
    }
}

fn build_cusps(cusps: &[f64; 12]) -> [HouseCusp; 12] {
    std::array::from_fn(|i| HouseCusp {
        house: (i + 1) as u8,
        longitude: cusps[i],
        sign: sign_of(cusps[i]).sign,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seoul_birth() -> BirthData {
        BirthData {
            year: 1990,
            month: 5,
            day: 15,
            hour: 14,
            minute: 30,
            latitude: 37.5665,
            longitude: 126.978,
            timezone: "Asia/Seoul".to_string(),
        }
    }

    #[test]
    fn test_birth_to_utc() {
        let utc = seoul_birth().to_utc().unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(1990, 5, 15, 5, 30, 0).unwrap());
    }

    #[test]
    fn test_birth_rejects_bad_input() {
        let mut birth = seoul_birth();
        birth.day = 31;
        birth.month = 2;
        assert!(matches!(birth.to_utc(), Err(ChartError::InvalidDateTime { .. })));

        let mut birth = seoul_birth();
        birth.timezone = "Mars/Olympus_Mons".to_string();
        assert!(matches!(birth.to_utc(), Err(ChartError::UnknownTimeZone(_))));

        let mut birth = seoul_birth();
        birth.latitude = 91.0;
        assert!(matches!(birth.to_utc(), Err(ChartError::InvalidLocation { .. })));
    }

    #[test]
    fn test_leap_day_birth() {
        let mut birth = seoul_birth();
        birth.year = 2000;
        birth.month = 2;
        birth.day = 29;
        assert!(birth.to_utc().is_ok());
    }

    #[test]
    fn test_from_longitudes_equal_houses() {
        let chart = Chart::from_longitudes(
            ChartKind::Natal,
            Utc::now(),
            &[(BodyId::Sun, 95.0, Some(1.0)), (BodyId::Moon, 10.0, Some(13.0))],
            90.0,
            0.0,
        );
        assert_eq!(chart.body(BodyId::Sun).unwrap().house, 1);
        assert_eq!(chart.body(BodyId::Moon).unwrap().house, 10);
        assert_eq!(chart.points().count(), 4);
    }

    #[test]
    fn test_rotated_keeps_houses() {
        let chart = Chart::from_longitudes(
            ChartKind::Natal,
            Utc::now(),
            &[(BodyId::Sun, 95.0, Some(1.0))],
            90.0,
            0.0,
        );
        let turned = chart.rotated(-100.0, ChartKind::Progressed, chart.moment);
        let sun = turned.body(BodyId::Sun).unwrap();
        assert!((sun.longitude - 355.0).abs() < 1e-9);
        assert_eq!(sun.sign, ZodiacSign::Pisces);
        assert_eq!(sun.house, 1);
        assert!((turned.ascendant.longitude - 350.0).abs() < 1e-9);
    }
}
