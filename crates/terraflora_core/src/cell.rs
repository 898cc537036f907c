//! Per-location terrain attributes and the temperature relaxation that runs on
//! them every tick.

use terraflora_data::{Biome, Gradient};

pub const SEA_LEVEL: f64 = 0.0;

const LAPSE_MIN_ELEVATION: f64 = 0.0;
const LAPSE_MAX_ELEVATION: f64 = 4000.0;
const LAPSE_MIN_OFFSET: f64 = -10.0;
const LAPSE_MAX_OFFSET: f64 = 20.0;

/// Share of the relaxation target taken from the altitude-adjusted forcing.
const ELEVATION_MOMENTUM: f64 = 0.5;
const RELAXATION_RATE: f64 = 0.05;
/// Drift (°C) that bumps the temperature version.
const TEMPERATURE_EPSILON: f64 = 0.1;

/// Ambient temperature at `elevation`: +20 °C at sea level down to -10 °C at
/// 4000 m and above, linearly in between.
#[must_use]
pub fn elevation_to_temp(forcing_temp: f64, elevation: f64) -> f64 {
    let e = elevation.clamp(LAPSE_MIN_ELEVATION, LAPSE_MAX_ELEVATION);
    let t = (e - LAPSE_MIN_ELEVATION) / (LAPSE_MAX_ELEVATION - LAPSE_MIN_ELEVATION);
    forcing_temp + LAPSE_MAX_OFFSET - t * (LAPSE_MAX_OFFSET - LAPSE_MIN_OFFSET)
}

/// What a species on this cell reads when it steps.
///
/// `version` changes only when the temperature has drifted more than 0.1 °C
/// since the previous bump; consumers cache derived values against it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellClimate {
    pub temperature: f64,
    pub fertility: f64,
    pub version: u64,
    pub is_water: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    x: usize,
    y: usize,
    elevation: f64,
    fertility: f64,
    gradient: Gradient,
    is_water: bool,
    biome: Biome,
    temperature: f64,
    last_recorded_temp: f64,
    temperature_version: u64,
}

impl Cell {
    /// Fertility is clamped into `[0, 1]`; the synthesizer's contrast passes
    /// can overshoot slightly.
    #[must_use]
    pub fn new(
        x: usize,
        y: usize,
        elevation: f64,
        fertility: f64,
        gradient: Gradient,
        forcing_temp: f64,
    ) -> Self {
        let fertility = fertility.clamp(0.0, 1.0);
        let is_water = elevation < SEA_LEVEL;
        let temperature = elevation_to_temp(forcing_temp, elevation);
        // Classified once; later temperature drift does not move the biome.
        let biome = Biome::classify_cell(is_water, temperature, fertility);
        Self {
            x,
            y,
            elevation,
            fertility,
            gradient,
            is_water,
            biome,
            temperature,
            last_recorded_temp: temperature,
            temperature_version: 0,
        }
    }

    /// Relax toward the seasonal target. Returns `true` when the temperature
    /// version advanced this tick. Water cells never change.
    pub fn step(&mut self, forcing_temp: f64) -> bool {
        if self.is_water {
            return false;
        }
        let elevation_target = elevation_to_temp(forcing_temp, self.elevation);
        let target =
            (1.0 - ELEVATION_MOMENTUM) * forcing_temp + ELEVATION_MOMENTUM * elevation_target;
        self.temperature += RELAXATION_RATE * (target - self.temperature);

        if (self.temperature - self.last_recorded_temp).abs() > TEMPERATURE_EPSILON {
            self.last_recorded_temp = self.temperature;
            self.temperature_version += 1;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn climate(&self) -> CellClimate {
        CellClimate {
            temperature: self.temperature,
            fertility: self.fertility,
            version: self.temperature_version,
            is_water: self.is_water,
        }
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn y(&self) -> usize {
        self.y
    }

    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    pub fn fertility(&self) -> f64 {
        self.fertility
    }

    pub fn gradient(&self) -> Gradient {
        self.gradient
    }

    pub fn is_water(&self) -> bool {
        self.is_water
    }

    pub fn biome(&self) -> Biome {
        self.biome
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn temperature_version(&self) -> u64 {
        self.temperature_version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn land(elevation: f64, fertility: f64, forcing: f64) -> Cell {
        Cell::new(0, 0, elevation, fertility, Gradient::default(), forcing)
    }

    #[test]
    fn test_lapse_rate_endpoints() {
        assert_eq!(elevation_to_temp(10.0, -500.0), 30.0);
        assert_eq!(elevation_to_temp(10.0, 0.0), 30.0);
        assert_eq!(elevation_to_temp(10.0, 2000.0), 15.0);
        assert_eq!(elevation_to_temp(10.0, 4000.0), 0.0);
        assert_eq!(elevation_to_temp(10.0, 9000.0), 0.0);
    }

    #[test]
    fn test_water_iff_below_sea_level() {
        assert!(land(-0.001, 0.5, 10.0).is_water());
        assert!(!land(0.0, 0.5, 10.0).is_water());
        assert_eq!(land(-10.0, 0.9, 10.0).biome(), Biome::Ocean);
    }

    #[test]
    fn test_water_cells_are_frozen() {
        let mut cell = land(-100.0, 0.5, 10.0);
        let before = cell.clone();
        for _ in 0..100 {
            assert!(!cell.step(-30.0));
        }
        assert_eq!(cell, before);
    }

    #[test]
    fn test_relaxation_converges_to_blended_target() {
        let mut cell = land(2000.0, 0.5, 10.0);
        // target = 0.5 * 0 + 0.5 * (0 + 20 - 15) = 2.5
        for _ in 0..2000 {
            cell.step(0.0);
        }
        assert!((cell.temperature() - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_version_bumps_only_past_epsilon() {
        let mut cell = land(0.0, 0.5, 10.0);
        // At equilibrium for forcing 10: target = 0.5*10 + 0.5*30 = 20, start 30.
        assert!(cell.step(10.0));
        assert_eq!(cell.temperature_version(), 1);

        let mut settled = land(0.0, 0.5, 10.0);
        for _ in 0..5000 {
            settled.step(10.0);
        }
        let version = settled.temperature_version();
        assert!(!settled.step(10.0));
        assert_eq!(settled.temperature_version(), version);
    }

    #[test]
    fn test_biome_frozen_despite_drift() {
        let mut cell = land(0.0, 0.5, 10.0);
        assert_eq!(cell.biome(), Biome::Savanna);
        for _ in 0..500 {
            cell.step(-20.0);
        }
        assert!(cell.temperature() < 4.0);
        assert_eq!(cell.biome(), Biome::Savanna);
    }

    #[test]
    fn test_fertility_is_clamped() {
        assert_eq!(land(10.0, 1.3, 10.0).fertility(), 1.0);
        assert_eq!(land(10.0, -0.2, 10.0).fertility(), 0.0);
    }
}
