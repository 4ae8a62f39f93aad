use chrono::{TimeZone, Utc};
use urania::angles::ZodiacSign;
use urania::chart::{natal_chart, transit_chart, BirthData, BodyId, ChartKind};
use urania::ephemeris::{
    AnalyticEphemeris, EphemerisProvider, EphemerisSettings, GeoLocation, HouseSystem,
};
use urania::error::{ChartError, EphemerisError};

fn seoul() -> BirthData {
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
fn test_natal_chart_basic_shape() {
    let provider = AnalyticEphemeris::new();
    let chart = natal_chart(&provider, &seoul()).unwrap();

    assert_eq!(chart.kind, ChartKind::Natal);
    assert_eq!(chart.moment, Utc.with_ymd_and_hms(1990, 5, 15, 5, 30, 0).unwrap());
    assert_eq!(chart.bodies.len(), BodyId::DEFAULT_BODIES.len());
    assert!(chart.birth.is_some());

    // Sun at about 24° Taurus in mid-May
    let sun = chart.body(BodyId::Sun).unwrap();
    assert_eq!(sun.sign, ZodiacSign::Taurus);
    assert!((sun.degree_in_sign - 24.2).abs() < 1.0, "{}", sun.degree_in_sign);

    for body in chart.points() {
        assert!((0.0..360.0).contains(&body.longitude));
        assert!((1..=12).contains(&body.house));
        assert_eq!(body.sign.index(), (body.longitude / 30.0) as usize);
    }
    assert_eq!(chart.ascendant.house, 1);
    assert!((chart.houses[0].longitude - chart.ascendant.longitude).abs() < 1e-9);
}

#[test]
fn test_south_node_opposes_north_node() {
    let provider = AnalyticEphemeris::new();
    let chart = natal_chart(&provider, &seoul()).unwrap();
    let north = chart.body(BodyId::NorthNode).unwrap();
    let south = chart.body(BodyId::SouthNode).unwrap();
    assert!((urania::separation(north.longitude, south.longitude) - 180.0).abs() < 1e-6);
    assert!(north.is_retrograde());
}

#[test]
fn test_southern_hemisphere_and_leap_day() {
    let provider = AnalyticEphemeris::new();
    let birth = BirthData {
        year: 1996,
        month: 2,
        day: 29,
        hour: 0,
        minute: 0,
        latitude: -33.8688,
        longitude: 151.2093,
        timezone: "Australia/Sydney".to_string(),
    };
    let chart = natal_chart(&provider, &birth).unwrap();
    // Sydney is on daylight time in February (UTC+11)
    assert_eq!(chart.moment, Utc.with_ymd_and_hms(1996, 2, 28, 13, 0, 0).unwrap());
    assert_eq!(chart.body(BodyId::Sun).unwrap().sign, ZodiacSign::Pisces);
}

#[test]
fn test_bad_birth_data_is_typed_error() {
    let provider = AnalyticEphemeris::new();
    let mut birth = seoul();
    birth.hour = 25;
    assert!(matches!(
        natal_chart(&provider, &birth),
        Err(ChartError::InvalidDateTime { .. })
    ));
}

#[test]
fn test_transit_chart_through_trait_object() {
    let provider: Box<dyn EphemerisProvider> = Box::new(AnalyticEphemeris::new());
    let moment = Utc.with_ymd_and_hms(2024, 3, 20, 3, 6, 0).unwrap();
    let chart = transit_chart(provider.as_ref(), moment, &GeoLocation { lat: 51.5, lon: 0.0 }).unwrap();
    assert_eq!(chart.kind, ChartKind::Transit);
    assert!(chart.birth.is_none());
    // March equinox 2024: Sun at 0° Aries
    let sun = chart.body(BodyId::Sun).unwrap().longitude;
    assert!(urania::separation(sun, 0.0) < 0.1, "{}", sun);
}

#[test]
fn test_house_system_support() {
    let equal = AnalyticEphemeris::with_settings(EphemerisSettings {
        house_system: HouseSystem::Equal,
        ..EphemerisSettings::default()
    })
    .unwrap();
    let chart = natal_chart(&equal, &seoul()).unwrap();
    assert_eq!(chart.house_system, HouseSystem::Equal);
    for pair in chart.houses.windows(2) {
        assert!((urania::angles::normalize(pair[1].longitude - pair[0].longitude) - 30.0).abs() < 1e-9);
    }

    let placidus = AnalyticEphemeris::with_settings(EphemerisSettings::default());
    assert!(matches!(
        placidus,
        Err(EphemerisError::UnsupportedHouseSystem { .. })
    ));
}

#[test]
fn test_midheaven_in_upper_half() {
    let provider = AnalyticEphemeris::new();
    let chart = natal_chart(&provider, &seoul()).unwrap();
    // MC sits 90° or less before the Ascendant in zodiac order
    let gap = urania::angles::normalize(chart.ascendant.longitude - chart.midheaven.longitude);
    assert!(gap > 0.0 && gap < 180.0, "{}", gap);
}

#[cfg(feature = "swisseph")]
#[test]
#[ignore] // Requires Swiss Ephemeris files
fn test_swiss_adapter_matches_analytic_sun() {
    use urania::ephemeris::SwissEphemerisAdapter;
    let swiss = SwissEphemerisAdapter::new(None, EphemerisSettings::default()).unwrap();
    let analytic = AnalyticEphemeris::new();
    let moment = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
    let a = swiss.body_longitude(BodyId::Sun, moment).unwrap();
    let b = analytic.body_longitude(BodyId::Sun, moment).unwrap();
    assert!(urania::separation(a, b) < 0.05);
}
