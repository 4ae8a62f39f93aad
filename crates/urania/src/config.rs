//! `urania.toml` loading.
//!
//! Every section is optional; missing keys keep their defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::aspects::{AspectCalculator, AspectPolicy};
use crate::progressions::{ProgressionAspectFinder, ProgressionSettings};
use crate::returns::{ReturnCalculator, ReturnSettings};
use crate::sync::{DaeunTransitSynchronizer, SyncConfig, MAX_BOUNDARY_WINDOW};

/// Paths tried by [`UraniaConfig::load_default`], in order
pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["configs/urania.toml", "urania.toml"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UraniaConfig {
    pub aspects: AspectPolicy,
    pub progressions: ProgressionSettings,
    pub returns: ReturnSettings,
    pub sync: SyncConfig,
}

impl UraniaConfig {
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let config: UraniaConfig =
            toml::from_str(text).map_err(|e| anyhow::anyhow!("Failed to parse urania config: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Could not read {}: {e}", path.display()))?;
        Self::from_toml_str(&text)
    }

    /// First readable file of [`DEFAULT_CONFIG_PATHS`], or the defaults.
    pub fn load_default() -> anyhow::Result<Self> {
        for p in &DEFAULT_CONFIG_PATHS {
            if let Ok(text) = fs::read_to_string(p) {
                log::debug!("loading config from {}", p);
                return Self::from_toml_str(&text);
            }
        }
        log::debug!("no config file found in {:?}, using defaults", DEFAULT_CONFIG_PATHS);
        Ok(Self::default())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.aspects.natal_widening < 0.0 {
            anyhow::bail!("aspects.natal_widening must not be negative");
        }
        if self.progressions.orb <= 0.0 {
            anyhow::bail!("progressions.orb must be positive");
        }
        let r = &self.returns;
        if r.solar_step_days <= 0.0 || r.lunar_step_days <= 0.0 || r.planet_step_days <= 0.0 {
            anyhow::bail!("returns step sizes must be positive");
        }
        if r.tolerance_seconds <= 0.0 {
            anyhow::bail!("returns.tolerance_seconds must be positive");
        }
        if !(r.window_padding_days > 0.0 && r.window_padding_days <= 30.0) {
            anyhow::bail!("returns.window_padding_days must be in (0, 30]");
        }
        if self.sync.tolerance_years < 0.0 {
            anyhow::bail!("sync.tolerance_years must not be negative");
        }
        if !(0..=MAX_BOUNDARY_WINDOW).contains(&self.sync.boundary_window) {
            anyhow::bail!(
                "sync.boundary_window must be in 0..={}, got {}",
                MAX_BOUNDARY_WINDOW,
                self.sync.boundary_window
            );
        }
        if let Some(bad) = self.sync.cycles.iter().find(|c| c.period_years <= 0.0) {
            anyhow::bail!("sync cycle {:?} needs a positive period_years", bad.transit);
        }
        Ok(())
    }

    pub fn aspect_calculator(&self) -> AspectCalculator {
        AspectCalculator::with_policy(self.aspects.clone())
    }

    pub fn progression_aspects(&self) -> ProgressionAspectFinder {
        ProgressionAspectFinder::with_settings(&self.progressions)
    }

    pub fn return_calculator(&self) -> ReturnCalculator {
        ReturnCalculator::with_settings(self.returns)
    }

    pub fn synchronizer(&self) -> DaeunTransitSynchronizer {
        DaeunTransitSynchronizer::with_config(self.sync.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(UraniaConfig::from_toml_str("").unwrap(), UraniaConfig::default());
    }

    #[test]
    fn test_boundary_window_bounds() {
        assert!(UraniaConfig::from_toml_str("[sync]\nboundary_window = 2147483647\n").is_err());
        assert!(UraniaConfig::from_toml_str("[sync]\nboundary_window = -1\n").is_err());
        let widest = format!("[sync]\nboundary_window = {}\n", MAX_BOUNDARY_WINDOW);
        assert_eq!(UraniaConfig::from_toml_str(&widest).unwrap().sync.boundary_window, MAX_BOUNDARY_WINDOW);
    }

    #[test]
    fn test_rejects_zero_orb() {
        assert!(UraniaConfig::from_toml_str("[progressions]\norb = 0.0\n").is_err());
    }
}
