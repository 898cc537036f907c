//! Row-major scalar fields and the per-cell operations the terrain pipeline
//! composes.
//!
//! Every whole-field pass (`smooth`, `smooth_by`) reads the previous grid and
//! writes a fresh one, so results do not depend on traversal order. With the
//! `parallel` feature those passes run row-parallel on rayon; the output is
//! bit-identical to the sequential path.

use crate::rng::SeededRng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use terraflora_data::Gradient;

pub mod generation;

pub use generation::{FieldRecipe, TerrainFields, TerrainSynthesizer};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Field {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl Field {
    #[must_use]
    pub fn filled(width: usize, height: usize, value: f64) -> Self {
        Self {
            width,
            height,
            values: vec![value; width * height],
        }
    }

    /// `None` unless `values.len() == width * height`.
    #[must_use]
    pub fn from_values(width: usize, height: usize, values: Vec<f64>) -> Option<Self> {
        (values.len() == width * height).then_some(Self {
            width,
            height,
            values,
        })
    }

    /// Independent uniform draws in `[low, high)`, row-major.
    pub fn random(width: usize, height: usize, low: f64, high: f64, rng: &mut SeededRng) -> Self {
        let values = (0..width * height)
            .map(|_| rng.range_f64(low, high))
            .collect();
        Self {
            width,
            height,
            values,
        }
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.values[self.index(x, y)]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Mean of the cell and whichever of its 8 neighbours exist.
    pub fn neighborhood_mean(&self, x: usize, y: usize) -> f64 {
        let mut total = 0.0;
        let mut count = 0u32;
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx < 0 || nx >= self.width as i64 || ny < 0 || ny >= self.height as i64 {
                    continue;
                }
                total += self.values[ny as usize * self.width + nx as usize];
                count += 1;
            }
        }
        total / f64::from(count)
    }

    /// Blend every cell toward its neighbourhood mean by `strength`.
    pub fn smooth(&mut self, strength: f64) {
        self.relax(|_| strength);
    }

    /// Like [`Field::smooth`] with a per-cell strength read from `strength`.
    pub fn smooth_by(&mut self, strength: &Field) {
        debug_assert_eq!(
            (self.width, self.height),
            (strength.width, strength.height)
        );
        self.relax(|idx| strength.values[idx]);
    }

    fn relax<F>(&mut self, strength: F)
    where
        F: Fn(usize) -> f64 + Sync,
    {
        if self.values.is_empty() {
            return;
        }
        let w = self.width;
        let mut next = vec![0.0; self.values.len()];
        {
            let source = &*self;
            let fill_row = |(y, row): (usize, &mut [f64])| {
                for (x, out) in row.iter_mut().enumerate() {
                    let idx = y * w + x;
                    let old = source.values[idx];
                    *out = old + strength(idx) * (source.neighborhood_mean(x, y) - old);
                }
            };

            #[cfg(feature = "parallel")]
            next.par_chunks_mut(w).enumerate().for_each(fill_row);
            #[cfg(not(feature = "parallel"))]
            next.chunks_mut(w).enumerate().for_each(fill_row);
        }
        self.values = next;
    }

    /// Push every value away from `center` by `amount` of its offset.
    pub fn amplify(&mut self, amount: f64, center: f64) {
        for v in &mut self.values {
            *v += (*v - center) * amount;
        }
    }

    /// Add `(u - 0.5) * range` to every cell, row-major.
    pub fn apply_noise(&mut self, range: f64, rng: &mut SeededRng) {
        for v in &mut self.values {
            *v += (rng.next_f64() - 0.5) * range;
        }
    }

    /// Nearest-neighbour upsample: each value becomes a 2x2 block.
    pub fn expand(&mut self) {
        let (w, h) = (self.width * 2, self.height * 2);
        let mut next = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                next.push(self.values[(y / 2) * self.width + x / 2]);
            }
        }
        self.width = w;
        self.height = h;
        self.values = next;
    }

    /// Linear blend of every cell toward the matching cell of `center`.
    pub fn pull_toward(&mut self, center: &Field, strength: f64) {
        debug_assert_eq!((self.width, self.height), (center.width, center.height));
        for (v, c) in self.values.iter_mut().zip(&center.values) {
            *v += (c - *v) * strength;
        }
    }

    /// Central differences; a missing border neighbour is replaced by the cell
    /// itself.
    pub fn gradient(&self) -> Vec<Gradient> {
        let (w, h) = (self.width, self.height);
        let mut out = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                let here = self.get(x, y);
                let left = if x > 0 { self.get(x - 1, y) } else { here };
                let right = if x + 1 < w { self.get(x + 1, y) } else { here };
                let up = if y > 0 { self.get(x, y - 1) } else { here };
                let down = if y + 1 < h { self.get(x, y + 1) } else { here };
                out.push(Gradient::new((right - left) / 2.0, (down - up) / 2.0));
            }
        }
        out
    }
}
