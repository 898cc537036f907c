//! Headless driver for the terraflora engine: configuration loading, the run
//! loop with periodic ecosystem reports, and the JSON-lines event journal.

pub mod app;
pub mod model;
