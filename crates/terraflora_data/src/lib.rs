//! Plain data types shared between the terraflora engine and its consumers.

pub mod data;

pub use data::biome::Biome;
pub use data::season::Season;
pub use data::species::Species;
pub use data::terrain::{Gradient, Layer};
