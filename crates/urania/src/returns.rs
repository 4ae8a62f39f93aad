//! Solar and lunar returns.
//!
//! A return is the instant a body comes back to its natal longitude. The
//! search samples `signed_delta(longitude(t), natal)` on a coarse grid, takes
//! the first sign change that is not the ±180° wrap, and bisects it.
//!
//! Solar returns are searched around the UTC birthday of the requested year,
//! so every year owns exactly one crossing. For births close to New Year the
//! instant may land on the neighbouring calendar day across the year line.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::angles::signed_delta;
use crate::chart::{BodyId, Chart, ChartKind};
use crate::ephemeris::time::{add_days, month_start};
use crate::ephemeris::{EphemerisProvider, GeoLocation};
use crate::error::ReturnError;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Theme of each house (1..=12) for return summaries
const HOUSE_THEMES: [&str; 12] = [
    "self, appearance and fresh starts",
    "money, possessions and self-worth",
    "learning, siblings and daily communication",
    "home, family and inner foundations",
    "creativity, romance and play",
    "work, health and daily routines",
    "partnerships and close one-to-one bonds",
    "shared resources, intimacy and transformation",
    "travel, study and widening beliefs",
    "career, status and public direction",
    "friends, networks and future hopes",
    "rest, retreat and closing old chapters",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnKind {
    Solar,
    Lunar,
}

impl ReturnKind {
    pub fn body(self) -> BodyId {
        match self {
            ReturnKind::Solar => BodyId::Sun,
            ReturnKind::Lunar => BodyId::Moon,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnChart {
    pub chart: Chart,
    pub kind: ReturnKind,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub month: Option<u32>,
    /// Serialized as RFC 3339, which sorts lexically
    pub exact_return_time: DateTime<Utc>,
}

/// Search tunables (`[returns]` in the config file)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct ReturnSettings {
    /// Sampling step of the solar search (days)
    pub solar_step_days: f64,
    /// Sampling step of the lunar search (days)
    pub lunar_step_days: f64,
    /// Sampling step for every other body (days)
    pub planet_step_days: f64,
    /// Bisection stops below this width (seconds)
    pub tolerance_seconds: f64,
    /// Days searched on each side of the birthday for a solar return, and the
    /// extension of any window that had no crossing
    pub window_padding_days: f64,
}

impl Default for ReturnSettings {
    fn default() -> Self {
        Self {
            solar_step_days: 1.0,
            lunar_step_days: 0.25,
            planet_step_days: 1.0,
            tolerance_seconds: 1.0,
            window_padding_days: 2.0,
        }
    }
}

/// Longest gap between two returns of a body, in days
fn max_cycle_days(body: BodyId) -> f64 {
    match body {
        BodyId::Moon => 28.0,
        BodyId::Sun | BodyId::Mercury | BodyId::Venus => 600.0,
        BodyId::Mars => 800.0,
        BodyId::Jupiter => 4_400.0,
        BodyId::Saturn => 10_900.0,
        BodyId::NorthNode | BodyId::SouthNode => 6_900.0,
        BodyId::Chiron => 18_700.0,
        BodyId::Uranus => 30_800.0,
        BodyId::Neptune => 60_300.0,
        BodyId::Pluto | BodyId::Ascendant | BodyId::Midheaven => 90_800.0,
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReturnCalculator {
    settings: ReturnSettings,
}

impl ReturnCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ReturnSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ReturnSettings {
        &self.settings
    }

    /// Sun return nearest the birthday in `year`, cast for the birth place.
    pub fn solar_return<E: EphemerisProvider + ?Sized>(
        &self,
        provider: &E,
        natal: &Chart,
        year: i32,
    ) -> Result<ReturnChart, ReturnError> {
        let birthday = anniversary(natal, year).ok_or(ReturnError::InvalidYear(year))?;
        let pad = self.settings.window_padding_days;
        let start = add_days(birthday, -pad).ok_or(ReturnError::InvalidYear(year))?;
        let end = add_days(birthday, 1.0 + pad).ok_or(ReturnError::InvalidYear(year))?;

        let exact = self.search_window(provider, natal, BodyId::Sun, start, end, self.settings.solar_step_days)?;
        let chart = self.cast(provider, natal, exact)?;
        Ok(ReturnChart {
            chart,
            kind: ReturnKind::Solar,
            year,
            month: None,
            exact_return_time: exact,
        })
    }

    /// First Moon return inside the calendar month (UTC), cast for the birth place.
    pub fn lunar_return<E: EphemerisProvider + ?Sized>(
        &self,
        provider: &E,
        natal: &Chart,
        month: u32,
        year: i32,
    ) -> Result<ReturnChart, ReturnError> {
        if !(1..=12).contains(&month) {
            return Err(ReturnError::InvalidMonth(month));
        }
        let start = month_start(year, month).ok_or(ReturnError::InvalidYear(year))?;
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        let end = month_start(next_year, next_month).ok_or(ReturnError::InvalidYear(year))?;

        let exact = self.search_window(provider, natal, BodyId::Moon, start, end, self.settings.lunar_step_days)?;
        let chart = self.cast(provider, natal, exact)?;
        Ok(ReturnChart {
            chart,
            kind: ReturnKind::Lunar,
            year,
            month: Some(month),
            exact_return_time: exact,
        })
    }

    /// First return of `body` strictly after `after`.
    pub fn next_return<E: EphemerisProvider + ?Sized>(
        &self,
        provider: &E,
        natal: &Chart,
        body: BodyId,
        after: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, ReturnError> {
        let target = natal_longitude(natal, body)?;
        let step = self.step_for(body);
        let from = add_days(after, 1.0 / SECONDS_PER_DAY).unwrap_or(after);
        let to = add_days(from, max_cycle_days(body) + step).ok_or(ReturnError::NotFound { body, from, to: from })?;
        self.find_crossing(provider, body, target, from, to, step)?
            .ok_or(ReturnError::NotFound { body, from, to })
    }

    fn step_for(&self, body: BodyId) -> f64 {
        match body {
            BodyId::Sun => self.settings.solar_step_days,
            BodyId::Moon => self.settings.lunar_step_days,
            _ => self.settings.planet_step_days,
        }
    }

    /// Crossing inside [start, end), retried once with the end pushed out.
    fn search_window<E: EphemerisProvider + ?Sized>(
        &self,
        provider: &E,
        natal: &Chart,
        body: BodyId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        step: f64,
    ) -> Result<DateTime<Utc>, ReturnError> {
        let target = natal_longitude(natal, body)?;
        if let Some(found) = self.find_crossing(provider, body, target, start, end, step)? {
            return Ok(found);
        }

        // Only forward: anything before `start` belongs to the previous window
        let pad = self.settings.window_padding_days;
        let wide_end = add_days(end, pad).unwrap_or(end);
        log::debug!("no {} return in {}..{}, extending by {} days", body, start, end, pad);
        self.find_crossing(provider, body, target, end, wide_end, step)?
            .ok_or(ReturnError::NotFound {
                body,
                from: start,
                to: wide_end,
            })
    }

    fn find_crossing<E: EphemerisProvider + ?Sized>(
        &self,
        provider: &E,
        body: BodyId,
        target: f64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        step: f64,
    ) -> Result<Option<DateTime<Utc>>, ReturnError> {
        let offset = |t: DateTime<Utc>| -> Result<f64, ReturnError> {
            Ok(signed_delta(provider.body_longitude(body, t)?, target))
        };

        let span_days = (end - start).num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY;
        let steps = (span_days / step).ceil().max(1.0) as usize;

        let mut prev_t = start;
        let mut prev_f = offset(start)?;
        if prev_f == 0.0 {
            return Ok(Some(start));
        }
        for i in 1..=steps {
            let t = match add_days(start, (i as f64 * step).min(span_days)) {
                Some(t) => t,
                None => break,
            };
            let f = offset(t)?;
            let changed = (prev_f < 0.0) != (f < 0.0) || f == 0.0;
            if changed && (f - prev_f).abs() < 180.0 {
                return self.bisect(&offset, prev_t, prev_f, t).map(Some);
            }
            prev_t = t;
            prev_f = f;
        }
        Ok(None)
    }

    fn bisect<F>(
        &self,
        offset: &F,
        mut lo: DateTime<Utc>,
        mut f_lo: f64,
        mut hi: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, ReturnError>
    where
        F: Fn(DateTime<Utc>) -> Result<f64, ReturnError>,
    {
        let tolerance_ms = (self.settings.tolerance_seconds * 1000.0).max(1.0) as i64;
        while (hi - lo).num_milliseconds() > tolerance_ms {
            let mid = lo + (hi - lo) / 2;
            let f_mid = offset(mid)?;
            if (f_mid < 0.0) == (f_lo < 0.0) && f_mid != 0.0 {
                lo = mid;
                f_lo = f_mid;
            } else {
                hi = mid;
            }
        }
        Ok(lo + (hi - lo) / 2)
    }

    fn cast<E: EphemerisProvider + ?Sized>(
        &self,
        provider: &E,
        natal: &Chart,
        moment: DateTime<Utc>,
    ) -> Result<Chart, ReturnError> {
        let location = return_location(natal)?;
        let positions = provider.compute_positions(moment, &location)?;
        Ok(Chart::from_positions(
            ChartKind::Return,
            moment,
            Some(location),
            natal.birth.clone(),
            &positions,
        ))
    }
}

/// Midnight UTC of the natal birthday in `year`; Feb 29 falls back to Feb 28.
fn anniversary(natal: &Chart, year: i32) -> Option<DateTime<Utc>> {
    let born = natal.moment.date_naive();
    let date = NaiveDate::from_ymd_opt(year, born.month(), born.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, born.month(), 28))?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

fn return_location(natal: &Chart) -> Result<GeoLocation, ReturnError> {
    let birth = natal.birth.as_ref().ok_or(ReturnError::MissingBirthData)?;
    Ok(natal.location.unwrap_or_else(|| birth.location()))
}

fn natal_longitude(natal: &Chart, body: BodyId) -> Result<f64, ReturnError> {
    if natal.birth.is_none() {
        return Err(ReturnError::MissingBirthData);
    }
    natal
        .body(body)
        .map(|b| b.longitude)
        .ok_or(ReturnError::MissingBody(body))
}

pub fn calculate_solar_return<E: EphemerisProvider + ?Sized>(
    provider: &E,
    natal: &Chart,
    year: i32,
) -> Result<ReturnChart, ReturnError> {
    ReturnCalculator::new().solar_return(provider, natal, year)
}

pub fn calculate_lunar_return<E: EphemerisProvider + ?Sized>(
    provider: &E,
    natal: &Chart,
    month: u32,
    year: i32,
) -> Result<ReturnChart, ReturnError> {
    ReturnCalculator::new().lunar_return(provider, natal, month, year)
}

pub fn next_return<E: EphemerisProvider + ?Sized>(
    provider: &E,
    natal: &Chart,
    body: BodyId,
    after: DateTime<Utc>,
) -> Result<DateTime<Utc>, ReturnError> {
    ReturnCalculator::new().next_return(provider, natal, body, after)
}

/// Fixed theme for a house; out-of-range houses read as the first.
pub fn house_theme(house: u8) -> &'static str {
    let index = (house.clamp(1, 12) - 1) as usize;
    HOUSE_THEMES[index]
}

/// Theme of the year from the house of the return Sun.
pub fn get_solar_return_summary(ret: &ReturnChart) -> Option<String> {
    let sun = ret.chart.body(BodyId::Sun)?;
    Some(format!(
        "Sun in house {}: a year focused on {}",
        sun.house,
        house_theme(sun.house)
    ))
}

/// Theme of the month from the house of the return Moon.
pub fn get_lunar_return_summary(ret: &ReturnChart) -> Option<String> {
    let moon = ret.chart.body(BodyId::Moon)?;
    Some(format!(
        "Moon in house {}: a month focused on {}",
        moon.house,
        house_theme(moon.house)
    ))
}
