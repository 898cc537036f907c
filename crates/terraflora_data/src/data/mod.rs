//! Core data structures for the terraflora simulation.

pub mod biome;
pub mod season;
pub mod species;
pub mod terrain;
