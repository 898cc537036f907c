use super::Field;
use crate::cell::Cell;
use crate::map::Map;
use crate::rng::SeededRng;
use terraflora_data::Gradient;

/// Parameters of one fractal field: seed range, the contrast restored after
/// the initial smooth, and the per-expand-pass noise/smooth/amplify triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRecipe {
    pub low: f64,
    pub high: f64,
    pub center: f64,
    pub seed_amplify: f64,
    pub noise: f64,
    pub pass_smooth: f64,
    pub pass_amplify: f64,
}

impl FieldRecipe {
    pub const ELEVATION: FieldRecipe = FieldRecipe {
        low: -2400.0,
        high: 3000.0,
        center: 0.0,
        seed_amplify: 0.3,
        noise: 2000.0,
        pass_smooth: 0.6,
        pass_amplify: 0.2,
    };

    pub const MACRO: FieldRecipe = FieldRecipe {
        low: -3000.0,
        high: 3600.0,
        center: 0.0,
        seed_amplify: 0.1,
        noise: 2400.0,
        pass_smooth: 0.6,
        pass_amplify: 0.2,
    };

    pub const SMOOTHNESS: FieldRecipe = FieldRecipe {
        low: 0.0,
        high: 1.0,
        center: 0.5,
        seed_amplify: 0.1,
        noise: 0.2,
        pass_smooth: 0.8,
        pass_amplify: 0.2,
    };

    pub const FERTILITY: FieldRecipe = FieldRecipe {
        low: 0.0,
        high: 1.0,
        center: 0.5,
        seed_amplify: 0.1,
        noise: 0.4,
        pass_smooth: 0.6,
        pass_amplify: 0.2,
    };
}

const MACRO_SETTLE_PASSES: usize = 12;
const MACRO_CONTRAST: f64 = 0.4;
const MACRO_PULL: f64 = 0.4;
const SMOOTHNESS_SETTLE_PASSES: usize = 8;
const VARIABLE_SMOOTH_PASSES: usize = 4;
const FINAL_SMOOTH_PASSES: usize = 3;
const FINAL_SMOOTH_STRENGTH: f64 = 0.4;

/// Finished per-position fields of one generated map.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainFields {
    pub elevation: Field,
    pub fertility: Field,
    pub gradient: Vec<Gradient>,
}

impl TerrainFields {
    pub fn width(&self) -> usize {
        self.elevation.width()
    }

    pub fn height(&self) -> usize {
        self.elevation.height()
    }

    /// One cell per position, initial temperatures taken from `forcing_temp`.
    pub fn into_map(self, forcing_temp: f64) -> Map {
        let (w, h) = (self.width(), self.height());
        let mut cells = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                let idx = y * w + x;
                cells.push(Cell::new(
                    x,
                    y,
                    self.elevation.values()[idx],
                    self.fertility.values()[idx],
                    self.gradient[idx],
                    forcing_temp,
                ));
            }
        }
        Map::new(w, h, cells)
    }
}

pub struct TerrainSynthesizer;

impl TerrainSynthesizer {
    /// Builds elevation, fertility and gradient for a `width x height` seed
    /// grid refined by `expand_passes` doublings.
    ///
    /// Draw order from `rng` is fixed: elevation, macro, smoothness, fertility,
    /// each row-major. Reordering any stage changes every map for every seed.
    pub fn generate(
        width: usize,
        height: usize,
        expand_passes: u32,
        rng: &mut SeededRng,
    ) -> TerrainFields {
        let mut elevation = Self::fractal(width, height, expand_passes, &FieldRecipe::ELEVATION, rng);

        let mut macro_field = Self::fractal(width, height, expand_passes, &FieldRecipe::MACRO, rng);
        for _ in 0..MACRO_SETTLE_PASSES {
            macro_field.smooth(1.0);
        }
        macro_field.amplify(MACRO_CONTRAST, FieldRecipe::MACRO.center);
        elevation.pull_toward(&macro_field, MACRO_PULL);

        let mut smoothness =
            Self::fractal(width, height, expand_passes, &FieldRecipe::SMOOTHNESS, rng);
        for _ in 0..SMOOTHNESS_SETTLE_PASSES {
            smoothness.smooth(1.0);
        }
        for _ in 0..VARIABLE_SMOOTH_PASSES {
            elevation.smooth_by(&smoothness);
        }

        for _ in 0..FINAL_SMOOTH_PASSES {
            elevation.smooth(FINAL_SMOOTH_STRENGTH);
        }

        let fertility = Self::fractal(width, height, expand_passes, &FieldRecipe::FERTILITY, rng);
        let gradient = elevation.gradient();

        tracing::debug!(
            width = elevation.width(),
            height = elevation.height(),
            expand_passes,
            "Terrain fields synthesized"
        );

        TerrainFields {
            elevation,
            fertility,
            gradient,
        }
    }

    /// Seed, smooth, amplify, then `passes` rounds of
    /// expand → noise → damped smooth → amplify.
    pub fn fractal(
        width: usize,
        height: usize,
        passes: u32,
        recipe: &FieldRecipe,
        rng: &mut SeededRng,
    ) -> Field {
        let mut field = Field::random(width, height, recipe.low, recipe.high, rng);
        field.smooth(1.0);
        field.amplify(recipe.seed_amplify, recipe.center);
        for _ in 0..passes {
            field.expand();
            field.apply_noise(recipe.noise, rng);
            field.smooth(recipe.pass_smooth);
            field.amplify(recipe.pass_amplify, recipe.center);
        }
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actual_size_doubles_per_pass() {
        let mut rng = SeededRng::from_seed_str(Some("size"));
        let fields = TerrainSynthesizer::generate(3, 2, 2, &mut rng);
        assert_eq!((fields.width(), fields.height()), (12, 8));
        assert_eq!(fields.fertility.width(), 12);
        assert_eq!(fields.gradient.len(), 96);
    }

    #[test]
    fn test_zero_passes_keep_seed_resolution() {
        let mut rng = SeededRng::from_seed_str(Some("flat"));
        let fields = TerrainSynthesizer::generate(4, 4, 0, &mut rng);
        assert_eq!((fields.width(), fields.height()), (4, 4));
    }

    #[test]
    fn test_degenerate_sizes_do_not_panic() {
        let mut rng = SeededRng::from_seed_str(Some("empty"));
        let fields = TerrainSynthesizer::generate(0, 5, 3, &mut rng);
        assert!(fields.elevation.is_empty());
        assert!(fields.into_map(10.0).is_empty());
    }

    #[test]
    fn test_same_seed_same_fields() {
        let mut a = SeededRng::from_seed_str(Some("twin"));
        let mut b = SeededRng::from_seed_str(Some("twin"));
        assert_eq!(
            TerrainSynthesizer::generate(4, 3, 2, &mut a),
            TerrainSynthesizer::generate(4, 3, 2, &mut b)
        );
    }

    #[test]
    fn test_fractal_seed_values_respect_range_before_passes() {
        let mut rng = SeededRng::from_seed_str(Some("range"));
        let recipe = FieldRecipe {
            seed_amplify: 0.0,
            ..FieldRecipe::FERTILITY
        };
        let field = TerrainSynthesizer::fractal(6, 6, 0, &recipe, &mut rng);
        assert!(field.values().iter().all(|v| (0.0..1.0).contains(v)));
    }
}
