//! Configuration management for map generation and ecosystem dynamics.
//!
//! Every section has a `Default` impl; a TOML file only needs to name the
//! values it overrides.
//!
//! ## Example `terraflora.toml`
//!
//! ```toml
//! [map]
//! width = 16
//! height = 12
//! expand_passes = 3
//! seed = "meadow"
//! start_season = "Summer"
//!
//! [calendar]
//! ticks_per_day = 900
//! days_per_year = 20
//!
//! [vegetation]
//! spread_prob = 0.005
//!
//! [run]
//! ticks = 18000
//! report_interval = 900
//! ```

use crate::calendar::CalendarConfig;
use crate::error::{CoreError, Result};
use crate::simulation::{MapRequest, MAX_EXPAND_PASSES};
use crate::vegetation::VegetationParams;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest seed-grid side accepted from configuration.
pub const MAX_SEED_GRID: i32 = 4096;

/// Largest generated map, in cells, accepted from configuration.
pub const MAX_MAP_CELLS: u64 = 1 << 22;

/// Headless run length and reporting cadence.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    pub ticks: u64,
    /// Ticks between ecosystem reports.
    pub report_interval: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ticks: 18_000,
            report_interval: 900,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SimConfig {
    pub map: MapRequest,
    pub calendar: CalendarConfig,
    pub vegetation: VegetationParams,
    pub run: RunConfig,
}

impl SimConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Err` describing the first value that is out of range.
    /// Negative map sizes are accepted; generation treats them as empty.
    pub fn validate(&self) -> anyhow::Result<()> {
        // Map validation
        anyhow::ensure!(
            self.map.width <= MAX_SEED_GRID,
            "Map width too large (max {MAX_SEED_GRID})"
        );
        anyhow::ensure!(
            self.map.height <= MAX_SEED_GRID,
            "Map height too large (max {MAX_SEED_GRID})"
        );
        let cells = self.expanded_cell_count();
        anyhow::ensure!(
            cells <= MAX_MAP_CELLS,
            "Expanded map too large ({cells} cells, max {MAX_MAP_CELLS})"
        );

        // Calendar validation
        anyhow::ensure!(
            self.calendar.ticks_per_day > 0,
            "Ticks per day must be positive"
        );
        anyhow::ensure!(
            self.calendar.days_per_year > 0,
            "Days per year must be positive"
        );
        anyhow::ensure!(
            self.calendar.season_temperatures.iter().all(|t| t.is_finite()),
            "Season temperatures must be finite"
        );

        // Vegetation validation
        let veg = &self.vegetation;
        anyhow::ensure!(veg.change_rate >= 0.0, "Change rate must be non-negative");
        anyhow::ensure!(veg.ceiling > 0.0, "Vegetation ceiling must be positive");
        anyhow::ensure!(
            veg.growth_epsilon > 0.0,
            "Growth epsilon must be positive"
        );
        anyhow::ensure!(
            veg.extinction_threshold >= 0.0,
            "Extinction threshold must be non-negative"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&veg.extinction_prob),
            "Extinction probability must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            veg.spread_threshold >= 0.0,
            "Spread threshold must be non-negative"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&veg.spread_prob),
            "Spread probability must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            veg.spread_amount >= 0.0,
            "Spread amount must be non-negative"
        );
        anyhow::ensure!(veg.spread_radius >= 0, "Spread radius must be non-negative");
        anyhow::ensure!(
            (0.0..=1.0).contains(&veg.seed_chance),
            "Seed chance must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            veg.seed_value >= 0.0 && veg.seed_value <= veg.ceiling,
            "Seed value must be in [0.0, ceiling]"
        );

        // Run validation
        anyhow::ensure!(
            self.run.report_interval > 0,
            "Report interval must be positive"
        );

        Ok(())
    }

    /// Cells of the map `generate_map` would build for `[map]`, after
    /// clamping the expand passes.
    #[must_use]
    pub fn expanded_cell_count(&self) -> u64 {
        let passes = self.map.expand_passes.min(MAX_EXPAND_PASSES);
        let width = u64::from(self.map.width.max(0).unsigned_abs()) << passes;
        let height = u64::from(self.map.height.max(0).unsigned_abs()) << passes;
        width.saturating_mul(height)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config
            .validate()
            .map_err(|e| CoreError::config(e.to_string()))?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CoreError::from(e).with_context(format!("reading {}", path.display())))?;
        Self::from_toml(&content).map_err(|e| e.with_context(format!("loading {}", path.display())))
    }

    /// Digest of everything that shapes the dynamics. Two runs with equal
    /// fingerprints and equal seeds evolve identically.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.map).as_bytes());
        hasher.update(format!("{:?}", self.calendar).as_bytes());
        hasher.update(format!("{:?}", self.vegetation).as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terraflora_data::Season;

    #[test]
    fn test_default_config_validates() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SimConfig::from_toml(
            r#"
            [map]
            width = 8
            seed = "meadow"
            start_season = "autumn"

            [vegetation]
            spread_prob = 0.01
            "#,
        )
        .expect("valid config");
        assert_eq!(config.map.width, 8);
        assert_eq!(config.map.seed.as_deref(), Some("meadow"));
        assert_eq!(config.map.start_season, Some(Season::Fall));
        assert_eq!(config.vegetation.spread_prob, 0.01);
        assert_eq!(config.vegetation.ceiling, 200.0);
        assert_eq!(config.calendar.ticks_per_day, 900);
    }

    #[test]
    fn test_numeric_seed_is_coerced() {
        let config = SimConfig::from_toml("[map]\nseed = 42\n").expect("valid config");
        assert_eq!(config.map.seed.as_deref(), Some("42"));
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let err = SimConfig::from_toml("[vegetation]\nspread_prob = 1.5\n")
            .expect_err("probability above one");
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn test_invalid_calendar_rejected() {
        let mut config = SimConfig::default();
        config.calendar.ticks_per_day = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_size_is_accepted() {
        let mut config = SimConfig::default();
        config.map.width = -3;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_expanded_size_is_bounded() {
        let err = SimConfig::from_toml(
            "[map]\nwidth = 4096\nheight = 4096\nexpand_passes = 10\n",
        )
        .expect_err("expanded map over budget");
        assert!(matches!(err, CoreError::Config(_)));

        let mut config = SimConfig::default();
        config.map.expand_passes = 40;
        assert_eq!(config.expanded_cell_count(), (8 << 10) * (6 << 10));
        assert!(config.validate().is_err());

        config.map.width = 2048;
        config.map.height = 2048;
        config.map.expand_passes = 0;
        assert_eq!(config.expanded_cell_count(), MAX_MAP_CELLS);
        assert!(config.validate().is_ok());

        config.map.width = -5;
        config.map.expand_passes = 10;
        assert_eq!(config.expanded_cell_count(), 0);
    }

    #[test]
    fn test_parse_error_variant() {
        let err = SimConfig::from_toml("[map\nwidth = ").expect_err("broken toml");
        assert!(matches!(err, CoreError::Parse(_)));
    }

    #[test]
    fn test_fingerprint_consistency() {
        let a = SimConfig::default();
        let mut b = SimConfig::default();
        assert_eq!(a.fingerprint(), b.fingerprint());
        b.vegetation.change_rate = 0.01;
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("terraflora.toml");
        std::fs::write(&path, "[run]\nticks = 10\n").expect("write config");
        let config = SimConfig::load(&path).expect("load");
        assert_eq!(config.run.ticks, 10);

        let missing = SimConfig::load(&dir.path().join("absent.toml"));
        assert!(missing.is_err());
    }
}
