pub use terraflora_core::{EcosystemStats, MapRequest, SimConfig, SimEvent, Simulation};
pub use terraflora_data::{Biome, Layer, Season, Species};
pub mod calendar {
    pub use terraflora_core::calendar::*;
}
pub mod config {
    pub use terraflora_core::config::*;
}
pub mod map {
    pub use terraflora_core::map::*;
}
pub mod species {
    pub use terraflora_core::species::*;
}
pub mod terrain {
    pub use terraflora_core::terrain::*;
}
pub mod vegetation {
    pub use terraflora_core::vegetation::*;
}
