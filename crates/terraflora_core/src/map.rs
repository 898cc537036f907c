use crate::cell::Cell;
use std::collections::BTreeMap;
use terraflora_data::{Biome, Layer};

/// Row-major grid of cells; `cells[y * width + x]` sits at `(x, y)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Map {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Map {
    /// # Panics
    /// In debug builds, if `cells.len() != width * height`.
    #[must_use]
    pub fn new(width: usize, height: usize, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self {
            width,
            height,
            cells,
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline(always)]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Index of `(x, y)` when it lies on the grid.
    #[inline]
    pub fn checked_index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.index(x as usize, y as usize))
    }

    #[inline]
    pub fn get_cell(&self, x: i64, y: i64) -> Option<&Cell> {
        self.checked_index(x, y).map(|idx| &self.cells[idx])
    }

    /// Relax every cell toward `forcing_temp`, row-major. Returns how many
    /// cells bumped their temperature version.
    pub fn step(&mut self, forcing_temp: f64) -> usize {
        let mut changed = 0;
        for cell in &mut self.cells {
            if cell.step(forcing_temp) {
                changed += 1;
            }
        }
        changed
    }

    /// One scalar per cell, row-major.
    pub fn layer(&self, layer: Layer) -> Vec<f64> {
        self.cells
            .iter()
            .map(|cell| match layer {
                Layer::Elevation => cell.elevation(),
                Layer::Fertility => cell.fertility(),
                Layer::Slope => cell.gradient().magnitude(),
                Layer::Temperature => cell.temperature(),
            })
            .collect()
    }

    pub fn biome_counts(&self) -> BTreeMap<Biome, usize> {
        let mut counts = BTreeMap::new();
        for cell in &self.cells {
            *counts.entry(cell.biome()).or_insert(0) += 1;
        }
        counts
    }

    pub fn land_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_water()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terraflora_data::Gradient;

    fn grid(width: usize, height: usize, elevations: &[f64]) -> Map {
        let cells = elevations
            .iter()
            .enumerate()
            .map(|(i, &e)| Cell::new(i % width, i / width, e, 0.5, Gradient::default(), 10.0))
            .collect();
        Map::new(width, height, cells)
    }

    #[test]
    fn test_get_cell_bounds() {
        let map = grid(3, 2, &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(map.get_cell(2, 1).map(Cell::elevation), Some(5.0));
        assert_eq!(map.get_cell(1, 0).map(|c| (c.x(), c.y())), Some((1, 0)));
        assert!(map.get_cell(-1, 0).is_none());
        assert!(map.get_cell(3, 0).is_none());
        assert!(map.get_cell(0, 2).is_none());
    }

    #[test]
    fn test_empty_map_lookups() {
        let map = Map::empty();
        assert!(map.is_empty());
        assert!(map.get_cell(0, 0).is_none());
        assert!(map.layer(Layer::Elevation).is_empty());
    }

    #[test]
    fn test_step_leaves_water_alone() {
        let mut map = grid(2, 1, &[-50.0, 50.0]);
        let water_temp = map.cells()[0].temperature();
        map.step(-10.0);
        assert_eq!(map.cells()[0].temperature(), water_temp);
        assert_ne!(map.cells()[1].temperature(), water_temp);
    }

    #[test]
    fn test_layers_and_biome_counts() {
        let map = grid(2, 2, &[-1.0, -2.0, 10.0, 20.0]);
        assert_eq!(map.layer(Layer::Elevation), vec![-1.0, -2.0, 10.0, 20.0]);
        assert_eq!(map.layer(Layer::Fertility), vec![0.5; 4]);
        assert_eq!(map.layer(Layer::Slope), vec![0.0; 4]);
        let counts = map.biome_counts();
        assert_eq!(counts.get(&Biome::Ocean), Some(&2));
        assert_eq!(counts.values().sum::<usize>(), 4);
        assert_eq!(map.land_count(), 2);
    }
}
