//! Per-species entity grids aligned with the map.
//!
//! Every [`Species`] owns one [`SpeciesColumn`] with a slot per map cell
//! (`y * width + x`). A slot is empty where the species cannot live.

use crate::map::Map;
use crate::rng::SeededRng;
use crate::vegetation::{StepOutcome, Vegetation, VegetationParams};
use terraflora_data::Species;

#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesColumn<T> {
    slots: Vec<Option<T>>,
    count: usize,
}

impl<T> Default for SpeciesColumn<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            count: 0,
        }
    }
}

impl<T> SpeciesColumn<T> {
    /// Fill one slot per cell from `factory`, row-major.
    pub fn build<F>(map: &Map, mut factory: F) -> Self
    where
        F: FnMut(&crate::cell::Cell) -> Option<T>,
    {
        let slots: Vec<Option<T>> = map.cells().iter().map(&mut factory).collect();
        let count = slots.iter().filter(|s| s.is_some()).count();
        Self { slots, count }
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    #[inline]
    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    /// Number of occupied slots.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Occupied slots with their indices, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|v| (i, v)))
    }
}

/// Borrowed view of whatever lives in one registry slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityRef<'a> {
    Vegetation(&'a Vegetation),
}

impl<'a> EntityRef<'a> {
    pub fn species(&self) -> Species {
        match self {
            EntityRef::Vegetation(_) => Species::Vegetation,
        }
    }
}

/// Aggregated outcome of one registry step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpeciesStepReport {
    pub extinctions: usize,
    pub transfers: usize,
    pub transferred: f64,
}

impl SpeciesStepReport {
    fn record(&mut self, outcome: StepOutcome) {
        if outcome.went_extinct {
            self.extinctions += 1;
        }
        if let Some(amount) = outcome.transferred {
            self.transfers += 1;
            self.transferred += amount;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpeciesRegistry {
    width: usize,
    height: usize,
    vegetation: SpeciesColumn<Vegetation>,
}

impl SpeciesRegistry {
    /// Populate every species column for `map`.
    ///
    /// Vegetation: no slot on water; each land cell draws once and starts at
    /// `seed_value` with probability `seed_chance`, otherwise at zero.
    pub fn build(map: &Map, params: &VegetationParams, rng: &mut SeededRng) -> Self {
        let vegetation = SpeciesColumn::build(map, |cell| {
            if cell.is_water() {
                return None;
            }
            let value = if rng.next_f64() < params.seed_chance {
                params.seed_value
            } else {
                0.0
            };
            Some(Vegetation::new(&cell.climate(), params, value))
        });

        tracing::debug!(
            vegetation = vegetation.count(),
            cells = map.len(),
            "Species registry built"
        );

        Self {
            width: map.width(),
            height: map.height(),
            vegetation,
        }
    }

    fn checked_index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn get(&self, species: Species, x: i64, y: i64) -> Option<EntityRef<'_>> {
        let idx = self.checked_index(x, y)?;
        match species {
            Species::Vegetation => self.vegetation.get(idx).map(EntityRef::Vegetation),
        }
    }

    /// Every species' entry at `(x, y)`, in [`Species::ALL`] order.
    pub fn all_at(&self, x: i64, y: i64) -> Vec<(Species, Option<EntityRef<'_>>)> {
        Species::ALL
            .iter()
            .map(|&species| (species, self.get(species, x, y)))
            .collect()
    }

    pub fn vegetation_at(&self, x: i64, y: i64) -> Option<&Vegetation> {
        self.checked_index(x, y)
            .and_then(|idx| self.vegetation.get(idx))
    }

    pub fn vegetation_at_mut(&mut self, x: i64, y: i64) -> Option<&mut Vegetation> {
        self.checked_index(x, y)
            .and_then(move |idx| self.vegetation.get_mut(idx))
    }

    pub fn vegetation(&self) -> &SpeciesColumn<Vegetation> {
        &self.vegetation
    }

    pub fn count_of(&self, species: Species) -> usize {
        match species {
            Species::Vegetation => self.vegetation.count(),
        }
    }

    /// Step every occupied slot of every species, row-major.
    ///
    /// A spread may credit a neighbour that has not been stepped yet this tick.
    pub fn step(
        &mut self,
        map: &Map,
        rng: &mut SeededRng,
        params: &VegetationParams,
    ) -> SpeciesStepReport {
        let mut report = SpeciesStepReport::default();
        let width = self.width;
        let height = self.height;
        let column = &mut self.vegetation.slots;

        for idx in 0..column.len() {
            // The stepping vegetation is lifted out of its slot so the transfer
            // closure can borrow the rest of the column; (0, 0) never targets it.
            let Some(mut veg) = column[idx].take() else {
                continue;
            };
            let climate = map.cells()[idx].climate();
            let (x, y) = ((idx % width) as i64, (idx / width) as i64);

            let outcome = veg.step(&climate, params, rng, |dx, dy, amount| {
                let (nx, ny) = (x + i64::from(dx), y + i64::from(dy));
                if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                    return None;
                }
                let target = column[ny as usize * width + nx as usize].as_mut()?;
                Some(target.add(amount, params.ceiling))
            });
            column[idx] = Some(veg);
            report.record(outcome);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use terraflora_data::Gradient;

    fn map(width: usize, height: usize, elevations: &[f64]) -> Map {
        let cells = elevations
            .iter()
            .enumerate()
            .map(|(i, &e)| Cell::new(i % width, i / width, e, 1.0, Gradient::default(), 0.0))
            .collect();
        Map::new(width, height, cells)
    }

    #[test]
    fn test_no_vegetation_on_water() {
        let map = map(2, 2, &[-5.0, 5.0, 5.0, -5.0]);
        let mut rng = SeededRng::from_seed_str(Some("slots"));
        let registry = SpeciesRegistry::build(&map, &VegetationParams::default(), &mut rng);
        assert!(registry.vegetation_at(0, 0).is_none());
        assert!(registry.vegetation_at(1, 0).is_some());
        assert!(registry.vegetation_at(1, 1).is_none());
        assert_eq!(registry.count_of(Species::Vegetation), 2);
    }

    #[test]
    fn test_out_of_bounds_lookups() {
        let map = map(2, 1, &[5.0, 5.0]);
        let mut rng = SeededRng::from_seed_str(Some("bounds"));
        let registry = SpeciesRegistry::build(&map, &VegetationParams::default(), &mut rng);
        assert!(registry.get(Species::Vegetation, -1, 0).is_none());
        assert!(registry.get(Species::Vegetation, 2, 0).is_none());
        assert!(registry.get(Species::Vegetation, 0, 1).is_none());
        let entry = registry.get(Species::Vegetation, 1, 0);
        assert_eq!(entry.map(|e| e.species()), Some(Species::Vegetation));
        assert_eq!(registry.all_at(0, 0).len(), Species::ALL.len());
    }

    #[test]
    fn test_seed_chance_extremes() {
        let map = map(3, 3, &[5.0; 9]);
        let mut rng = SeededRng::from_seed_str(Some("seed"));
        let all = VegetationParams {
            seed_chance: 1.0,
            ..VegetationParams::default()
        };
        let registry = SpeciesRegistry::build(&map, &all, &mut rng);
        assert!(registry.vegetation().iter().all(|(_, v)| v.value() == 1.0));

        let none = VegetationParams {
            seed_chance: 0.0,
            ..VegetationParams::default()
        };
        let registry = SpeciesRegistry::build(&map, &none, &mut rng);
        assert!(registry.vegetation().iter().all(|(_, v)| v.value() == 0.0));
        assert_eq!(registry.vegetation().count(), 9);
    }

    #[test]
    fn test_spread_conserves_total_and_respects_ceiling() {
        let map = map(5, 5, &[5.0; 25]);
        let mut rng = SeededRng::from_seed_str(Some("conserve"));
        let params = VegetationParams {
            change_rate: 0.0,
            seed_chance: 1.0,
            seed_value: 150.0,
            spread_interval: 0,
            spread_prob: 1.0,
            spread_amount: 10.0,
            ..VegetationParams::default()
        };
        let mut registry = SpeciesRegistry::build(&map, &params, &mut rng);
        let total = |r: &SpeciesRegistry| r.vegetation().iter().map(|(_, v)| v.value()).sum::<f64>();
        let before = total(&registry);

        let mut transfers = 0;
        for _ in 0..50 {
            transfers += registry.step(&map, &mut rng, &params).transfers;
            for (_, veg) in registry.vegetation().iter() {
                assert!(veg.value() >= 0.0);
                assert!(veg.value() <= params.ceiling);
            }
        }
        assert!(transfers > 0);
        assert!((total(&registry) - before).abs() < 1e-6);
    }

    #[test]
    fn test_spread_never_lands_on_water() {
        // A single land cell surrounded by ocean has nobody to give to.
        let mut elevations = [-5.0; 9];
        elevations[4] = 5.0;
        let map = map(3, 3, &elevations);
        let mut rng = SeededRng::from_seed_str(Some("island"));
        let params = VegetationParams {
            change_rate: 0.0,
            seed_chance: 1.0,
            seed_value: 100.0,
            spread_interval: 0,
            spread_prob: 1.0,
            ..VegetationParams::default()
        };
        let mut registry = SpeciesRegistry::build(&map, &params, &mut rng);
        for _ in 0..100 {
            assert_eq!(registry.step(&map, &mut rng, &params).transfers, 0);
        }
        assert_eq!(registry.vegetation_at(1, 1).map(Vegetation::value), Some(100.0));
    }
}
