use std::path::PathBuf;

use urania::aspects::AspectType;
use urania::config::UraniaConfig;
use urania::saju::Element;
use urania::sync::{default_cycles, TransitType};

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("configs/urania.toml")
}

#[test]
fn test_shipped_config_matches_defaults() {
    let config = UraniaConfig::load_from_file(sample_path()).unwrap();
    assert_eq!(config, UraniaConfig::default());
}

#[test]
fn test_partial_sections_keep_defaults() {
    let config = UraniaConfig::from_toml_str(
        r#"
[aspects.orbs]
conjunction = 10.0

[sync]
tolerance_years = 1.5
"#,
    )
    .unwrap();
    assert_eq!(config.aspects.orb_for(AspectType::Conjunction), 10.0);
    assert_eq!(config.aspects.orb_for(AspectType::Trine), 7.0);
    assert_eq!(config.aspects.natal_widening, 3.0);
    assert_eq!(config.sync.tolerance_years, 1.5);
    assert_eq!(config.sync.base_score, 50.0);
    assert_eq!(config.sync.cycles, default_cycles());
    assert_eq!(config.progressions.orb, 3.0);
}

#[test]
fn test_custom_cycles_replace_table() {
    let config = UraniaConfig::from_toml_str(
        r#"
[[sync.cycles]]
transit = "saturnReturn"
first_age = 29.5
period_years = 29.5
element = "토"
max_cycles = 2
"#,
    )
    .unwrap();
    assert_eq!(config.sync.cycles.len(), 1);
    let cycle = &config.sync.cycles[0];
    assert_eq!(cycle.transit, TransitType::SaturnReturn);
    assert_eq!(cycle.element, Element::Earth);
    assert_eq!(cycle.centers().count(), 2);
}

#[test]
fn test_invalid_values_rejected() {
    for text in [
        "[aspects]\nnatal_widening = -1.0\n",
        "[returns]\nlunar_step_days = 0.0\n",
        "[returns]\ntolerance_seconds = -2.0\n",
        "[sync]\ntolerance_years = -0.5\n",
        "[[sync.cycles]]\ntransit = \"nodalReturn\"\nfirst_age = 18.6\nperiod_years = 0.0\nelement = \"water\"\n",
        "[sync]\ntolerance_years = \"wide\"\n",
        "[sync]\nboundary_window = 2147483647\n",
        "[returns]\nwindow_padding_days = 0.0\n",
    ] {
        assert!(UraniaConfig::from_toml_str(text).is_err(), "accepted: {}", text);
    }
}

#[test]
fn test_missing_file_is_error() {
    assert!(UraniaConfig::load_from_file("/nonexistent/urania.toml").is_err());
}

#[test]
fn test_builders_carry_settings() {
    let config = UraniaConfig::from_toml_str("[returns]\nsolar_step_days = 2.0\n[sync]\npeak_threshold = 80.0\n").unwrap();
    assert_eq!(config.return_calculator().settings().solar_step_days, 2.0);
    assert_eq!(config.synchronizer().config().peak_threshold, 80.0);
    assert_eq!(config.aspect_calculator().policy(), &config.aspects);
}
