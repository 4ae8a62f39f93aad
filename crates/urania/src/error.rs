use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::chart::BodyId;
use crate::ephemeris::HouseSystem;

/// Errors that can occur during ephemeris calculations
#[derive(Error, Debug)]
pub enum EphemerisError {
    #[error("Ephemeris file not found at path: {path}. {message}")]
    FileNotFound { path: String, message: String },
    #[error("House system {system:?} is not supported by this ephemeris. Supported: {supported:?}")]
    UnsupportedHouseSystem {
        system: HouseSystem,
        supported: Vec<HouseSystem>,
    },
    #[error("Body {body:?} is not available from this ephemeris")]
    UnsupportedBody { body: BodyId },
    #[error("Failed to calculate position for {body:?} at {datetime}: {message}")]
    CalculationFailed {
        body: BodyId,
        datetime: DateTime<Utc>,
        message: String,
    },
    #[error("House calculation failed: {message}")]
    HouseCalculationFailed { message: String },
}

/// Errors raised while building a chart from birth data
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Invalid birth date/time {year:04}-{month:02}-{day:02} {hour:02}:{minute:02}")]
    InvalidDateTime {
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
    },
    #[error("Local time {local} does not exist in time zone {timezone}")]
    NonexistentLocalTime { local: String, timezone: String },
    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),
    #[error("Invalid location: latitude {lat}, longitude {lon}")]
    InvalidLocation { lat: f64, lon: f64 },
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
}

#[derive(Error, Debug)]
pub enum ProgressionError {
    #[error("Natal chart carries no birth data")]
    MissingBirthData,
    #[error("Natal chart has no {0:?} position")]
    MissingBody(BodyId),
    #[error("Invalid target date: {0}")]
    InvalidTargetDate(String),
    #[error("Progressed moment out of range ({years:.3} years from birth)")]
    OutOfRange { years: f64 },
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
}

#[derive(Error, Debug)]
pub enum ReturnError {
    #[error("Natal chart carries no birth data")]
    MissingBirthData,
    #[error("Natal chart has no {0:?} position")]
    MissingBody(BodyId),
    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),
    #[error("Invalid year: {0}")]
    InvalidYear(i32),
    #[error("No {body:?} return found between {from} and {to}")]
    NotFound {
        body: BodyId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
}
