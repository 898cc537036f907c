use serde::{Deserialize, Serialize};

/// Biome assigned to a cell once, at map generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Biome {
    /// Any cell below sea level.
    Ocean,
    /// Cold and barren.
    Tundra,
    /// Temperate and barren.
    Steppe,
    /// Hot and barren.
    Desert,
    /// Cold, moderately fertile.
    Taiga,
    /// Mild, moderately fertile.
    Temperate,
    /// Hot, moderately fertile.
    Savanna,
    /// Cold and fertile.
    Boreal,
    /// Mild and fertile.
    Forest,
    /// Hot and fertile.
    Rainforest,
}

impl Biome {
    pub const ALL: [Biome; 10] = [
        Biome::Ocean,
        Biome::Tundra,
        Biome::Steppe,
        Biome::Desert,
        Biome::Taiga,
        Biome::Temperate,
        Biome::Savanna,
        Biome::Boreal,
        Biome::Forest,
        Biome::Rainforest,
    ];

    /// Land classification from temperature (°C) and fertility.
    ///
    /// Water is decided by elevation alone and never reaches this function;
    /// see [`Biome::classify_cell`].
    #[must_use]
    pub fn classify(temperature: f64, fertility: f64) -> Biome {
        let t = temperature;
        if fertility < 0.2 {
            if t < 4.0 {
                Biome::Tundra
            } else if t < 26.0 {
                Biome::Steppe
            } else {
                Biome::Desert
            }
        } else if fertility < 0.8 {
            if t < 4.0 {
                Biome::Taiga
            } else if t < 30.0 {
                Biome::Temperate
            } else {
                Biome::Savanna
            }
        } else if t < 10.0 {
            Biome::Boreal
        } else if t < 36.0 {
            Biome::Forest
        } else {
            Biome::Rainforest
        }
    }

    #[must_use]
    pub fn classify_cell(is_water: bool, temperature: f64, fertility: f64) -> Biome {
        if is_water {
            Biome::Ocean
        } else {
            Self::classify(temperature, fertility)
        }
    }

    #[must_use]
    pub fn is_land(&self) -> bool {
        !matches!(self, Biome::Ocean)
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Biome::Ocean => "Ocean",
            Biome::Tundra => "Tundra",
            Biome::Steppe => "Steppe",
            Biome::Desert => "Desert",
            Biome::Taiga => "Taiga",
            Biome::Temperate => "Temperate",
            Biome::Savanna => "Savanna",
            Biome::Boreal => "Boreal",
            Biome::Forest => "Forest",
            Biome::Rainforest => "Rainforest",
        }
    }
}

impl std::fmt::Display for Biome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
