use serde::{Deserialize, Serialize};

/// Elevation slope at a cell, in metres per cell.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Gradient {
    pub dx: f64,
    pub dy: f64,
}

impl Gradient {
    #[must_use]
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.dx.hypot(self.dy)
    }
}

/// Scalar per-cell layers a consumer can extract from a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Elevation,
    Fertility,
    /// Magnitude of the elevation gradient.
    Slope,
    Temperature,
}
