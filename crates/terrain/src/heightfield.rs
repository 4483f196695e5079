use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::types::TerrainError;

/// A square grid of elevations produced by one diamond-square synthesis run.
/// Read-only after synthesis.
pub struct HeightField {
    size: usize,
    heights: Vec<f32>,
}

impl HeightField {
    /// Run midpoint displacement over a zero-initialized `size x size` grid.
    ///
    /// The same seed always reproduces the same grid.
    pub fn synthesize(size: usize, seed: u64) -> Result<Self, TerrainError> {
        if size < 2 || !size.is_power_of_two() {
            return Err(TerrainError::GridSize(size));
        }

        let mut field = Self {
            size,
            heights: vec![0.0; size * size],
        };

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        field.displace(&mut rng);
        field.clamp_to_sea_level();

        Ok(field)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.heights[i * self.size + j]
    }

    fn set(&mut self, i: usize, j: usize, value: f32) {
        self.heights[i * self.size + j] = value;
    }

    /// Bilinear elevation sample over the normalized [-1, 1] footprint the
    /// mesh pass maps the grid onto. Coordinates outside the footprint clamp
    /// to the border.
    pub fn sample_height_at(&self, x: f32, z: f32) -> f32 {
        let n = self.size as f32;
        let max = (self.size - 1) as f32;
        let fi = ((x + 1.0) * 0.5 * n).clamp(0.0, max);
        let fj = ((z + 1.0) * 0.5 * n).clamp(0.0, max);

        let i0 = fi.floor() as usize;
        let j0 = fj.floor() as usize;
        let i1 = (i0 + 1).min(self.size - 1);
        let j1 = (j0 + 1).min(self.size - 1);
        let ti = fi - i0 as f32;
        let tj = fj - j0 as f32;

        let low = self.get(i0, j0) + (self.get(i1, j0) - self.get(i0, j0)) * ti;
        let high = self.get(i0, j1) + (self.get(i1, j1) - self.get(i0, j1)) * ti;
        low + (high - low) * tj
    }

    fn displace(&mut self, rng: &mut ChaCha8Rng) {
        let size = self.size;
        let mut range = size;
        let mut amplitude = 1.0_f32;

        while range > 1 {
            let half = range / 2;

            // Diamond pass: the center of each lattice cell takes the average
            // of its four lattice corners plus a perturbation.
            for i in (range..size).step_by(range) {
                for j in (range..size).step_by(range) {
                    let a = self.get(i - range, j - range);
                    let b = self.get(i, j - range);
                    let c = self.get(i - range, j);
                    let d = self.get(i, j);

                    let value = (a + b + c + d) / 4.0 + perturb(rng, amplitude);
                    self.set(i - half, j - half, value);
                }
            }

            // Square pass: the two edge midpoints trailing each cell average
            // two lattice corners with the two adjacent diamond centers. The
            // loop starts one cell in, so the outermost edge midpoints are
            // never assigned.
            for i in (2 * range..size).step_by(range) {
                for j in (2 * range..size).step_by(range) {
                    let a = self.get(i - range, j - range);
                    let b = self.get(i, j - range);
                    let c = self.get(i - range, j);
                    let center = self.get(i - half, j - half);

                    let left = self.get(i - range - half, j - half);
                    let value = (a + c + center + left) / 4.0 + perturb(rng, amplitude);
                    self.set(i - range, j - half, value);

                    let up = self.get(i - half, j - range - half);
                    let value = (a + b + center + up) / 4.0 + perturb(rng, amplitude);
                    self.set(i - half, j - range, value);
                }
            }

            amplitude /= 2.0;
            range /= 2;
        }
    }

    // Everything below zero is water; the grid floor is sea level.
    fn clamp_to_sea_level(&mut self) {
        for height in &mut self.heights {
            if *height < 0.0 {
                *height = 0.0;
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn from_heights(size: usize, heights: Vec<f32>) -> Self {
        assert_eq!(heights.len(), size * size);
        Self { size, heights }
    }
}

/// Perturbation in [amplitude/2, 1.5 * amplitude): a uniform draw scaled by
/// the amplitude, biased upward by half the amplitude. Not zero-centered.
fn perturb(rng: &mut ChaCha8Rng, amplitude: f32) -> f32 {
    rng.random::<f32>() * amplitude + amplitude / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_sizes() {
        for size in [0, 1, 3, 5, 6, 100, 511] {
            assert!(matches!(
                HeightField::synthesize(size, 0),
                Err(TerrainError::GridSize(s)) if s == size
            ));
        }
    }

    #[test]
    fn accepts_power_of_two_sizes() {
        for size in [2, 4, 8, 16, 32, 64] {
            let field = HeightField::synthesize(size, 1).unwrap();
            assert_eq!(field.size(), size);
        }
    }

    #[test]
    fn no_elevation_is_negative() {
        for seed in [0, 1, 42, 0xDEAD_BEEF] {
            let field = HeightField::synthesize(32, seed).unwrap();
            for i in 0..32 {
                for j in 0..32 {
                    assert!(field.get(i, j) >= 0.0, "({i}, {j}) is below sea level");
                }
            }
        }
    }

    #[test]
    fn same_seed_reproduces_the_grid() {
        let a = HeightField::synthesize(64, 7).unwrap();
        let b = HeightField::synthesize(64, 7).unwrap();
        assert_eq!(a.heights, b.heights);
    }

    #[test]
    fn different_seeds_diverge() {
        let a = HeightField::synthesize(16, 1).unwrap();
        let b = HeightField::synthesize(16, 2).unwrap();
        assert_ne!(a.heights, b.heights);
    }

    #[test]
    fn border_rows_and_columns_stay_at_sea_level() {
        // Neither pass ever writes the outermost rows and columns, the grid
        // corners included: diamond centers sit strictly inside the lattice
        // and the square pass starts one cell in.
        let field = HeightField::synthesize(16, 9).unwrap();
        let last = field.size() - 1;
        for k in 0..field.size() {
            assert_eq!(field.get(0, k), 0.0);
            assert_eq!(field.get(k, 0), 0.0);
            assert_eq!(field.get(last, k), 0.0);
            assert_eq!(field.get(k, last), 0.0);
        }
    }

    #[test]
    fn smallest_grid_is_all_zero() {
        // With size 2 both pass loops are empty; only the clamp runs.
        let field = HeightField::synthesize(2, 123).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                assert_eq!(field.get(i, j), 0.0);
            }
        }
    }

    #[test]
    fn size_four_fills_exactly_the_center_cell() {
        // The only effective iteration is range = 2, whose single diamond
        // midpoint is (1, 1); its perturbation is biased positive.
        let field = HeightField::synthesize(4, 5).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                if (i, j) == (1, 1) {
                    assert!(field.get(i, j) > 0.0);
                } else {
                    assert_eq!(field.get(i, j), 0.0);
                }
            }
        }
    }

    #[test]
    fn interior_gains_positive_relief() {
        let field = HeightField::synthesize(64, 3).unwrap();
        let positive = (0..64)
            .flat_map(|i| (0..64).map(move |j| (i, j)))
            .filter(|&(i, j)| field.get(i, j) > 0.0)
            .count();
        assert!(positive > 0, "synthesis left the grid flat");
    }

    #[test]
    fn world_space_sampling_interpolates() {
        let field = HeightField::from_heights(2, vec![0.0, 0.0, 1.0, 1.0]);
        // x = -0.5 sits halfway between the i = 0 and i = 1 grid lines.
        let mid = field.sample_height_at(-0.5, -1.0);
        assert!((mid - 0.5).abs() < 1e-6, "got {mid}");
        assert_eq!(field.sample_height_at(-1.0, -1.0), 0.0);
        assert_eq!(field.sample_height_at(0.0, -1.0), 1.0);
        // Samples outside the footprint clamp to the border.
        assert_eq!(field.sample_height_at(2.0, 2.0), 1.0);
    }
}
