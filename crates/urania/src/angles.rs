//! Angle utilities on the ecliptic circle.
//!
//! Everything downstream works in degrees. Longitudes are kept in [0, 360)
//! and separations in [0, 180].

use serde::{Deserialize, Serialize};
use std::fmt;

pub const FULL_CIRCLE: f64 = 360.0;
pub const SIGN_SPAN: f64 = 30.0;

/// Reduce any angle to [0, 360).
pub fn normalize(angle: f64) -> f64 {
    let r = angle.rem_euclid(FULL_CIRCLE);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if r >= FULL_CIRCLE {
        0.0
    } else {
        r
    }
}

/// Minimal angular distance between two longitudes, in [0, 180].
pub fn separation(a: f64, b: f64) -> f64 {
    let d = normalize(a - b);
    if d > 180.0 {
        FULL_CIRCLE - d
    } else {
        d
    }
}

/// Signed shortest rotation from `from` to `to`, in (-180, 180].
pub fn signed_delta(to: f64, from: f64) -> f64 {
    let d = normalize(to - from);
    if d > 180.0 {
        d - FULL_CIRCLE
    } else {
        d
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_longitude(longitude: f64) -> Self {
        Self::from_index((normalize(longitude) / SIGN_SPAN) as usize)
    }

    pub fn name(self) -> &'static str {
        const NAMES: [&str; 12] = [
            "Aries", "Taurus", "Gemini", "Cancer",
            "Leo", "Virgo", "Libra", "Scorpio",
            "Sagittarius", "Capricorn", "Aquarius", "Pisces",
        ];
        NAMES[self.index()]
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sign placement of a longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignPosition {
    pub sign: ZodiacSign,
    /// 0 <= x < 30
    pub degree_in_sign: f64,
    pub degree: u8,
    pub minute: u8,
}

impl fmt::Display for SignPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°{:02}' {}", self.degree, self.minute, self.sign)
    }
}

/// Map a longitude to its sign, degree-in-sign and whole degree/minute.
pub fn sign_of(longitude: f64) -> SignPosition {
    let lon = normalize(longitude);
    let sign = ZodiacSign::from_longitude(lon);
    let degree_in_sign = lon - sign.index() as f64 * SIGN_SPAN;
    let degree = degree_in_sign.floor();
    // Truncate, never round up into the next degree.
    let minute = ((degree_in_sign - degree) * 60.0).floor().min(59.0);

    SignPosition {
        sign,
        degree_in_sign,
        degree: degree as u8,
        minute: minute as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_range() {
        for x in [-1080.5, -360.0, -0.0, -1e-17, 0.0, 359.999, 360.0, 725.25] {
            let n = normalize(x);
            assert!((0.0..360.0).contains(&n), "normalize({x}) = {n}");
            assert_eq!(normalize(n), n);
        }
        assert_eq!(normalize(-30.0), 330.0);
        assert_eq!(normalize(390.0), 30.0);
    }

    #[test]
    fn test_separation_wraps() {
        assert_eq!(separation(350.0, 10.0), 20.0);
        assert_eq!(separation(10.0, 350.0), 20.0);
        assert_eq!(separation(0.0, 180.0), 180.0);
        assert_eq!(separation(-90.0, 90.0), 180.0);
    }

    #[test]
    fn test_signed_delta() {
        assert_eq!(signed_delta(10.0, 350.0), 20.0);
        assert_eq!(signed_delta(350.0, 10.0), -20.0);
    }

    #[test]
    fn test_sign_of() {
        let pos = sign_of(45.5);
        assert_eq!(pos.sign, ZodiacSign::Taurus);
        assert_eq!(pos.degree, 15);
        assert_eq!(pos.minute, 30);

        let pos = sign_of(-0.5);
        assert_eq!(pos.sign, ZodiacSign::Pisces);
        assert_eq!(pos.degree, 29);

        assert_eq!(sign_of(360.0).sign, ZodiacSign::Aries);
    }
}
