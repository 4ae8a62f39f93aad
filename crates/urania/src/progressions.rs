//! Progressed charts.
//!
//! Secondary progressions advance the natal instant by one day per year of
//! life and recompute the sky; solar arc directions turn the whole natal chart
//! by the distance the progressed Sun has travelled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::angles::{normalize, signed_delta};
use crate::aspects::{AspectCalculator, AspectHit, AspectPolicy, AspectRules};
use crate::chart::{BodyId, Chart, ChartKind};
use crate::ephemeris::time::{add_days, parse_moment, tropical_years_between};
use crate::ephemeris::EphemerisProvider;
use crate::error::ProgressionError;

/// Orb used when progressed charts are aspected
pub const DEFAULT_PROGRESSION_ORB: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProgressionMethod {
    Secondary,
    SolarArc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressedChart {
    pub chart: Chart,
    pub method: ProgressionMethod,
    /// Signed; negative before birth
    pub years_progressed: f64,
    pub target_date: DateTime<Utc>,
    /// Natal instant advanced by `years_progressed` days
    pub progressed_moment: DateTime<Utc>,
    /// Solar arc applied to every point, in degrees
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub arc: Option<f64>,
}

/// Parse a target date given as `YYYY-MM-DD` or RFC 3339.
pub fn parse_target_date(input: &str) -> Result<DateTime<Utc>, ProgressionError> {
    parse_moment(input).ok_or_else(|| ProgressionError::InvalidTargetDate(input.to_string()))
}

/// Secondary progression ("a day for a year") of a natal chart to `target`.
pub fn calculate_secondary_progressions<E: EphemerisProvider + ?Sized>(
    provider: &E,
    natal: &Chart,
    target: DateTime<Utc>,
) -> Result<ProgressedChart, ProgressionError> {
    let birth = natal.birth.as_ref().ok_or(ProgressionError::MissingBirthData)?;
    let location = natal.location.unwrap_or_else(|| birth.location());

    let (years, progressed_moment) = progressed_moment(natal, target)?;
    let positions = provider.compute_positions(progressed_moment, &location)?;
    log::debug!(
        "secondary progression: {:.4} years -> {}",
        years,
        progressed_moment
    );

    let chart = Chart::from_positions(
        ChartKind::Progressed,
        progressed_moment,
        Some(location),
        Some(birth.clone()),
        &positions,
    );

    Ok(ProgressedChart {
        chart,
        method: ProgressionMethod::Secondary,
        years_progressed: years,
        target_date: target,
        progressed_moment,
        arc: None,
    })
}

/// Solar arc directions: every natal point moved by the progressed Sun's arc.
pub fn calculate_solar_arc_directions<E: EphemerisProvider + ?Sized>(
    provider: &E,
    natal: &Chart,
    target: DateTime<Utc>,
) -> Result<ProgressedChart, ProgressionError> {
    if natal.birth.is_none() {
        return Err(ProgressionError::MissingBirthData);
    }
    let natal_sun = natal
        .body(BodyId::Sun)
        .ok_or(ProgressionError::MissingBody(BodyId::Sun))?
        .longitude;

    let (years, progressed_moment) = progressed_moment(natal, target)?;
    let progressed_sun = provider.body_longitude(BodyId::Sun, progressed_moment)?;
    let arc = solar_arc(natal_sun, progressed_sun, years);
    log::debug!("solar arc: {:.4} years, arc {:.4}°", years, arc);

    Ok(ProgressedChart {
        chart: natal.rotated(arc, ChartKind::Progressed, progressed_moment),
        method: ProgressionMethod::SolarArc,
        years_progressed: years,
        target_date: target,
        progressed_moment,
        arc: Some(arc),
    })
}

fn progressed_moment(
    natal: &Chart,
    target: DateTime<Utc>,
) -> Result<(f64, DateTime<Utc>), ProgressionError> {
    let years = tropical_years_between(natal.moment, target);
    let moment = add_days(natal.moment, years).ok_or(ProgressionError::OutOfRange { years })?;
    Ok((years, moment))
}

/// Signed arc of the Sun; follows the direction of time.
fn solar_arc(natal_sun: f64, progressed_sun: f64, years: f64) -> f64 {
    let arc = signed_delta(progressed_sun, natal_sun);
    // Over ~180 years of arc the short way round points backwards
    if years > 0.0 && arc < 0.0 {
        arc + 360.0
    } else if years < 0.0 && arc > 0.0 {
        arc - 360.0
    } else {
        arc
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    const ORDER: [MoonPhase; 8] = [
        MoonPhase::NewMoon,
        MoonPhase::WaxingCrescent,
        MoonPhase::FirstQuarter,
        MoonPhase::WaxingGibbous,
        MoonPhase::FullMoon,
        MoonPhase::WaningGibbous,
        MoonPhase::LastQuarter,
        MoonPhase::WaningCrescent,
    ];

    /// Phase from the Moon's elongation east of the Sun, in 45° buckets.
    pub fn from_elongation(elongation: f64) -> Self {
        let index = (normalize(elongation) / 45.0).floor() as usize;
        Self::ORDER[index.min(7)]
    }

    pub fn label(self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::FullMoon => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
        }
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn get_progressed_moon_phase(moon_longitude: f64, sun_longitude: f64) -> MoonPhase {
    MoonPhase::from_elongation(moon_longitude - sun_longitude)
}

/// Progression tunables (`[progressions]` in the config file)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionSettings {
    pub orb: f64,
}

impl Default for ProgressionSettings {
    fn default() -> Self {
        Self {
            orb: DEFAULT_PROGRESSION_ORB,
        }
    }
}

/// Aspect finder restricted to the tight progression orb.
#[derive(Debug, Clone)]
pub struct ProgressionAspectFinder {
    calculator: AspectCalculator,
}

impl Default for ProgressionAspectFinder {
    fn default() -> Self {
        Self::with_settings(&ProgressionSettings::default())
    }
}

impl ProgressionAspectFinder {
    pub fn with_settings(settings: &ProgressionSettings) -> Self {
        Self {
            calculator: AspectCalculator::with_policy(AspectPolicy::uniform(settings.orb)),
        }
    }

    pub fn to_natal(&self, progressed: &ProgressedChart, natal: &Chart) -> Vec<AspectHit> {
        self.calculator
            .find_aspects(&progressed.chart, natal, &AspectRules::default())
    }

    pub fn internal(&self, progressed: &ProgressedChart) -> Vec<AspectHit> {
        self.calculator
            .find_natal_aspects(&progressed.chart, &AspectRules::default())
    }

    /// The progressed Moon against every natal point.
    pub fn moon(&self, progressed: &ProgressedChart, natal: &Chart) -> Vec<AspectHit> {
        let Some(moon) = progressed.chart.body(BodyId::Moon) else {
            return Vec::new();
        };
        self.calculator.find_aspects_from(
            std::iter::once(moon),
            progressed.chart.kind,
            natal,
            &AspectRules::default(),
        )
    }
}

pub fn find_progressed_to_natal_aspects(progressed: &ProgressedChart, natal: &Chart) -> Vec<AspectHit> {
    ProgressionAspectFinder::default().to_natal(progressed, natal)
}

pub fn find_progressed_internal_aspects(progressed: &ProgressedChart) -> Vec<AspectHit> {
    ProgressionAspectFinder::default().internal(progressed)
}

pub fn find_progressed_moon_aspects(progressed: &ProgressedChart, natal: &Chart) -> Vec<AspectHit> {
    ProgressionAspectFinder::default().moon(progressed, natal)
}
