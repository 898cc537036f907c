use serde::{Deserialize, Serialize};

/// Every species the registry can hold a column for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Vegetation,
}

impl Species {
    pub const ALL: [Species; 1] = [Species::Vegetation];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Species::Vegetation => "vegetation",
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
