//! # Terraflora Core
//!
//! Deterministic terrain synthesis and per-cell ecosystem stepping.
//!
//! This crate contains:
//! - A fractal terrain synthesizer for elevation, fertility and gradient fields
//! - Cells with temperature relaxation and one-time biome classification
//! - Vegetation population dynamics with growth, extinction and spread
//! - A seasonal calendar driving the forcing temperature
//! - The [`Simulation`] that owns it all and publishes change events
//!
//! ## Example
//!
//! ```
//! use terraflora_core::{MapRequest, Simulation};
//!
//! let mut sim = Simulation::default();
//! sim.generate_map(&MapRequest::new(4, 4, 1, Some("abc")));
//! assert_eq!(sim.map().width(), 8);
//!
//! for _ in 0..100 {
//!     sim.step();
//! }
//! assert_eq!(sim.tick(), 100);
//! ```

/// Tick to day, year and season mapping
pub mod calendar;
/// Per-location terrain attributes and temperature relaxation
pub mod cell;
/// Configuration management for simulation parameters
pub mod config;
/// Error types for configuration loading
pub mod error;
/// Simulation notifications and the subscriber bus
pub mod events;
/// Cell grid with bounds-checked lookup
pub mod map;
/// Run counters and structured logging setup
pub mod metrics;
/// Seeded random source
pub mod rng;
/// Generation, stepping and the simulation clock
pub mod simulation;
/// Species registry with per-species columns
pub mod species;
/// Scalar fields and the fractal terrain pipeline
pub mod terrain;
/// Vegetation population dynamics
pub mod vegetation;

pub use config::SimConfig;
pub use error::CoreError;
pub use events::{EventBus, SimEvent};
pub use map::Map;
pub use metrics::Metrics;
pub use simulation::{EcosystemStats, MapRequest, Simulation};
pub use terraflora_data::{Biome, Gradient, Layer, Season, Species};
