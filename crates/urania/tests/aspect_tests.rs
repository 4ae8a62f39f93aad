use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use urania::aspects::{AspectCalculator, AspectPolicy, AspectRules, AspectType};
use urania::chart::{BodyId, Chart, ChartKind};
use urania::{find_aspects, find_natal_aspects};

fn chart(kind: ChartKind, bodies: &[(BodyId, f64, Option<f64>)], asc: f64, mc: f64) -> Chart {
    let moment = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
    Chart::from_longitudes(kind, moment, bodies, asc, mc)
}

/// Both angles parked at 45.5°
fn quiet(kind: ChartKind, bodies: &[(BodyId, f64, Option<f64>)]) -> Chart {
    chart(kind, bodies, 45.5, 45.5)
}

fn pair_aspect(a: f64, b: f64) -> Option<(AspectType, f64)> {
    let natal = quiet(ChartKind::Natal, &[(BodyId::Sun, a, None)]);
    let transit = quiet(ChartKind::Transit, &[(BodyId::Mars, b, None)]);
    find_aspects(&transit, &natal, None)
        .into_iter()
        .find(|h| h.from.body == BodyId::Mars && h.to.body == BodyId::Sun)
        .map(|h| (h.aspect(), h.orb()))
}

#[test]
fn test_exact_degree_fixtures() {
    assert_eq!(pair_aspect(100.0, 100.0), Some((AspectType::Conjunction, 0.0)));
    assert_eq!(pair_aspect(0.0, 180.0), Some((AspectType::Opposition, 0.0)));
    assert_eq!(pair_aspect(0.0, 90.0), Some((AspectType::Square, 0.0)));
    assert_eq!(pair_aspect(0.0, 120.0), Some((AspectType::Trine, 0.0)));
    assert_eq!(pair_aspect(0.0, 60.0), Some((AspectType::Sextile, 0.0)));
}

#[test]
fn test_wraparound_at_aries() {
    let (aspect, orb) = pair_aspect(358.0, 2.0).unwrap();
    assert_eq!(aspect, AspectType::Conjunction);
    assert!((orb - 4.0).abs() < 1e-9);

    let (aspect, orb) = pair_aspect(350.0, 171.0).unwrap();
    assert_eq!(aspect, AspectType::Opposition);
    assert!((orb - 1.0).abs() < 1e-9);
}

#[test]
fn test_orb_never_exceeds_configured() {
    let rules = AspectRules {
        include_minor: true,
        ..AspectRules::default()
    };
    let policy = AspectPolicy::default();
    for step in 0..72 {
        let lon = step as f64 * 5.0 + 0.3;
        let natal = quiet(ChartKind::Natal, &[(BodyId::Sun, 0.0, Some(1.0))]);
        let transit = quiet(ChartKind::Transit, &[(BodyId::Moon, lon, Some(13.0))]);
        for hit in find_aspects(&transit, &natal, Some(&rules)) {
            assert!(hit.orb() <= policy.orb_for(hit.aspect()) + 1e-9, "{:?}", hit);
            assert!((hit.core.separation - hit.core.exact_angle).abs() - hit.orb() < 1e-9);
        }
    }
}

#[test]
fn test_minor_aspects_need_flag() {
    let natal = quiet(ChartKind::Natal, &[(BodyId::Sun, 0.0, None)]);
    let transit = quiet(ChartKind::Transit, &[(BodyId::Venus, 150.5, None)]);

    let hits = find_aspects(&transit, &natal, None);
    assert!(hits.iter().all(|h| h.aspect() != AspectType::Quincunx));

    let rules = AspectRules {
        include_minor: true,
        ..AspectRules::default()
    };
    let hits = find_aspects(&transit, &natal, Some(&rules));
    assert!(hits
        .iter()
        .any(|h| h.aspect() == AspectType::Quincunx && h.from.body == BodyId::Venus));
}

#[test]
fn test_sorted_by_score() {
    let natal = chart(
        ChartKind::Natal,
        &[
            (BodyId::Sun, 10.0, Some(1.0)),
            (BodyId::Moon, 75.0, Some(13.0)),
            (BodyId::Mercury, 128.0, Some(1.2)),
            (BodyId::Venus, 185.0, Some(1.1)),
            (BodyId::Mars, 280.0, Some(0.5)),
        ],
        95.0,
        5.0,
    );
    let hits = find_natal_aspects(&natal, None);
    assert!(!hits.is_empty());
    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_single_body_natal_is_empty() {
    let natal = chart(ChartKind::Natal, &[(BodyId::Sun, 10.0, None)], 10.0, 280.0);
    assert!(find_natal_aspects(&natal, None).is_empty());
}

#[test]
fn test_empty_bodies_return_empty() {
    let empty = chart(ChartKind::Transit, &[], 0.0, 270.0);
    let natal = chart(ChartKind::Natal, &[(BodyId::Sun, 0.0, None)], 0.0, 270.0);
    assert!(find_aspects(&empty, &natal, None).is_empty());
    assert!(find_aspects(&natal, &empty, None).is_empty());
    assert!(find_natal_aspects(&empty, None).is_empty());
}

#[test]
fn test_natal_widening() {
    // 129.5 is 9.5 past a trine: inside 7 + 3 but outside 7
    let natal = quiet(
        ChartKind::Natal,
        &[(BodyId::Sun, 0.0, None), (BodyId::Jupiter, 129.5, None)],
    );
    let internal = find_natal_aspects(&natal, None);
    assert!(internal
        .iter()
        .any(|h| h.aspect() == AspectType::Trine && h.involves(BodyId::Jupiter)));

    let transit = quiet(ChartKind::Transit, &[(BodyId::Jupiter, 129.5, None)]);
    let natal_sun = quiet(ChartKind::Natal, &[(BodyId::Sun, 0.0, None)]);
    assert!(find_aspects(&transit, &natal_sun, None).iter().all(|h| h.aspect() != AspectType::Trine));
}

#[test]
fn test_zero_orb_override_drops_body() {
    let natal = quiet(ChartKind::Natal, &[(BodyId::Sun, 0.0, None)]);
    let transit = quiet(
        ChartKind::Transit,
        &[(BodyId::Saturn, 0.0, None), (BodyId::Mars, 90.0, None)],
    );
    let mut orbs = HashMap::new();
    orbs.insert(BodyId::Saturn, 0.0);
    let rules = AspectRules {
        orbs,
        ..AspectRules::default()
    };
    let hits = find_aspects(&transit, &natal, Some(&rules));
    assert!(hits.iter().all(|h| !h.involves(BodyId::Saturn)));
    assert!(hits.iter().any(|h| h.involves(BodyId::Mars)));
}

#[test]
fn test_body_override_tightens_orb() {
    let natal = quiet(ChartKind::Natal, &[(BodyId::Sun, 0.0, None)]);
    let transit = quiet(ChartKind::Transit, &[(BodyId::Moon, 3.0, None)]);
    let mut orbs = HashMap::new();
    orbs.insert(BodyId::Moon, 2.0);
    let rules = AspectRules {
        orbs,
        ..AspectRules::default()
    };
    assert!(find_aspects(&transit, &natal, Some(&rules)).iter().all(|h| !h.involves(BodyId::Moon)));
}

#[test]
fn test_max_results_truncates() {
    let natal = chart(
        ChartKind::Natal,
        &[
            (BodyId::Sun, 0.0, None),
            (BodyId::Moon, 90.0, None),
            (BodyId::Mars, 180.0, None),
            (BodyId::Venus, 270.0, None),
        ],
        45.5,
        135.5,
    );
    let all = find_natal_aspects(&natal, None);
    assert!(all.len() > 2);
    let rules = AspectRules {
        max_results: Some(2),
        ..AspectRules::default()
    };
    let top = find_natal_aspects(&natal, Some(&rules));
    assert_eq!(top.len(), 2);
    assert_eq!(top[0], all[0]);
}

#[test]
fn test_angles_are_targets_but_not_paired() {
    let natal = chart(ChartKind::Natal, &[(BodyId::Sun, 10.0, None)], 10.0, 280.0);
    let transit = chart(ChartKind::Transit, &[(BodyId::Mars, 10.0, None)], 200.0, 200.0);
    let hits = find_aspects(&transit, &natal, None);
    assert!(hits
        .iter()
        .any(|h| h.to.body == BodyId::Ascendant && h.aspect() == AspectType::Conjunction));

    // Asc square MC in the natal chart is not reported
    let natal = chart(
        ChartKind::Natal,
        &[(BodyId::Sun, 150.0, None), (BodyId::Moon, 152.0, None)],
        10.0,
        280.0,
    );
    assert!(find_natal_aspects(&natal, None)
        .iter()
        .all(|h| !(h.from.body.is_angle() && h.to.body.is_angle())));
}

#[test]
fn test_applying_flag_from_speeds() {
    let natal = quiet(ChartKind::Natal, &[(BodyId::Sun, 100.0, Some(0.0))]);
    let closing = quiet(ChartKind::Transit, &[(BodyId::Moon, 96.0, Some(13.0))]);
    let leaving = quiet(ChartKind::Transit, &[(BodyId::Moon, 104.0, Some(13.0))]);
    let unknown = quiet(ChartKind::Transit, &[(BodyId::Moon, 96.0, None)]);

    let first = |t: &Chart| find_aspects(t, &natal, None).into_iter().find(|h| h.involves(BodyId::Sun)).unwrap();
    assert!(first(&closing).core.applying);
    assert!(!first(&leaving).core.applying);
    assert!(!first(&unknown).core.applying);
}

#[test]
fn test_uniform_policy_calculator() {
    let calc = AspectCalculator::with_policy(AspectPolicy::uniform(3.0));
    let natal = quiet(ChartKind::Natal, &[(BodyId::Sun, 0.0, None)]);
    let transit = chart(
        ChartKind::Transit,
        &[(BodyId::Mars, 93.5, None), (BodyId::Venus, 62.0, None)],
        200.25,
        200.25,
    );
    let hits = calc.find_aspects(&transit, &natal, &AspectRules::default());
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].from.body, BodyId::Venus);
    assert_eq!(hits[0].from.chart, ChartKind::Transit);
    assert_eq!(hits[0].to.chart, ChartKind::Natal);
}
