//! Per-cell vegetation population: logistic growth, probabilistic extinction
//! after a low-density cooldown, and bounded spread to a random nearby cell.

use crate::cell::CellClimate;
use crate::rng::SeededRng;
use serde::{Deserialize, Serialize};

/// Tunables for vegetation dynamics and the initial seeding of a new map.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct VegetationParams {
    pub change_rate: f64,
    pub extinction_threshold: f64,
    pub extinction_interval: u32,
    pub extinction_prob: f64,
    pub spread_threshold: f64,
    pub spread_interval: u32,
    pub spread_prob: f64,
    pub spread_amount: f64,
    /// Chebyshev radius of the spread target window.
    pub spread_radius: i32,
    pub ceiling: f64,
    pub growth_epsilon: f64,
    /// Chance that a land cell starts with vegetation.
    pub seed_chance: f64,
    pub seed_value: f64,
}

impl Default for VegetationParams {
    fn default() -> Self {
        Self {
            change_rate: 0.005,
            extinction_threshold: 1.0,
            extinction_interval: 200,
            extinction_prob: 0.003,
            spread_threshold: 30.0,
            spread_interval: 150,
            spread_prob: 0.003,
            spread_amount: 1.0,
            spread_radius: 2,
            ceiling: 200.0,
            growth_epsilon: 0.01,
            seed_chance: 0.05,
            seed_value: 1.0,
        }
    }
}

const BASE_CAPACITY: f64 = 100.0;
const COLD_REFERENCE: f64 = 15.0;
const COLD_SLOPE: f64 = 6.0;
const HEAT_REFERENCE: f64 = 32.0;
const HEAT_SLOPE: f64 = 5.0;
const FERTILITY_OPTIMUM: f64 = 1.0;
const FERTILITY_SIGMA: f64 = 0.5;

fn gauss(x: f64, optimum: f64, sigma: f64) -> f64 {
    (-0.5 * ((x - optimum) / sigma).powi(2)).exp()
}

/// Logistic ceiling for a cell at `temperature` with `fertility`.
///
/// Below 15 °C capacity drops 6 units per degree, above 32 °C it drops 5 per
/// degree; fertility scales the result by a Gaussian centred on 1.
#[must_use]
pub fn carrying_capacity(temperature: f64, fertility: f64) -> f64 {
    let cold = (COLD_SLOPE * (temperature - COLD_REFERENCE)).min(0.0);
    let heat = (HEAT_SLOPE * (temperature - HEAT_REFERENCE)).max(0.0);
    let capacity =
        (BASE_CAPACITY + cold - heat) * gauss(fertility, FERTILITY_OPTIMUM, FERTILITY_SIGMA);
    capacity.max(0.0)
}

/// What happened to one vegetation during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepOutcome {
    pub went_extinct: bool,
    /// Amount accepted by a neighbour, if a transfer resolved.
    pub transferred: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vegetation {
    value: f64,
    change_rate: f64,
    capacity: f64,
    death_ticks: u32,
    spread_ticks: u32,
    climate_version: u64,
}

impl Vegetation {
    #[must_use]
    pub fn new(climate: &CellClimate, params: &VegetationParams, value: f64) -> Self {
        Self {
            value: value.max(0.0),
            change_rate: params.change_rate,
            capacity: carrying_capacity(climate.temperature, climate.fertility),
            death_ticks: 0,
            spread_ticks: 0,
            climate_version: climate.version,
        }
    }

    /// Advance one tick.
    ///
    /// `transfer(dx, dy, amount)` offers `amount` to the vegetation at the
    /// given offset and returns what it accepted, or `None` when no vegetation
    /// lives there (out of bounds or water).
    pub fn step<F>(
        &mut self,
        climate: &CellClimate,
        params: &VegetationParams,
        rng: &mut SeededRng,
        transfer: F,
    ) -> StepOutcome
    where
        F: FnOnce(i32, i32, f64) -> Option<f64>,
    {
        let mut outcome = StepOutcome::default();
        if climate.is_water || self.value <= 0.0 {
            return outcome;
        }
        if climate.version != self.climate_version {
            self.recompute(climate, params);
        }

        self.step_growth(params);
        outcome.went_extinct = self.step_extinction(params, rng);
        outcome.transferred = self.step_spread(params, rng, transfer);

        self.value = self.value.max(0.0);
        outcome
    }

    fn recompute(&mut self, climate: &CellClimate, params: &VegetationParams) {
        self.change_rate = params.change_rate;
        self.capacity = carrying_capacity(climate.temperature, climate.fertility);
        self.climate_version = climate.version;
    }

    fn step_growth(&mut self, params: &VegetationParams) {
        let p = self.value;
        let grown = p + self.change_rate * p * (1.0 - p / (self.capacity + params.growth_epsilon));
        self.value = grown.max(params.growth_epsilon);
    }

    fn step_extinction(&mut self, params: &VegetationParams, rng: &mut SeededRng) -> bool {
        if self.value != 0.0 && self.value < params.extinction_threshold {
            if self.death_ticks >= params.extinction_interval
                && rng.next_f64() < params.extinction_prob
            {
                self.value = 0.0;
                self.death_ticks = 0;
                return true;
            }
            self.death_ticks += 1;
        } else {
            self.death_ticks = 0;
        }
        false
    }

    fn step_spread<F>(
        &mut self,
        params: &VegetationParams,
        rng: &mut SeededRng,
        transfer: F,
    ) -> Option<f64>
    where
        F: FnOnce(i32, i32, f64) -> Option<f64>,
    {
        if self.value < params.spread_threshold {
            self.spread_ticks = 0;
            return None;
        }
        if !(self.spread_ticks >= params.spread_interval && rng.next_f64() < params.spread_prob) {
            self.spread_ticks += 1;
            return None;
        }

        let r = params.spread_radius;
        let dx = rng.offset(-r, r);
        let dy = rng.offset(-r, r);
        if dx == 0 && dy == 0 {
            return None;
        }
        // An abandoned attempt keeps the cooldown where it is.
        let accepted = transfer(dx, dy, params.spread_amount)?;
        self.value -= accepted;
        self.spread_ticks = 0;
        Some(accepted)
    }

    /// Receive up to `amount`, limited by the headroom under `ceiling`.
    /// Returns the amount actually taken.
    pub fn add(&mut self, amount: f64, ceiling: f64) -> f64 {
        if self.value >= ceiling {
            return 0.0;
        }
        let accepted = amount.min(ceiling - self.value);
        self.value += accepted;
        accepted
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Overwrite the population density; negative input is stored as zero.
    pub fn set_value(&mut self, value: f64) {
        self.value = value.max(0.0);
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn change_rate(&self) -> f64 {
        self.change_rate
    }

    pub fn death_ticks(&self) -> u32 {
        self.death_ticks
    }

    pub fn spread_ticks(&self) -> u32 {
        self.spread_ticks
    }

    pub fn is_alive(&self) -> bool {
        self.value > 0.0
    }
}
