use bevy::prelude::*;

use super::error::HexMapError;
use super::metrics::{CELL_PERTURB_STRENGTH, NOISE_SCALE};

/// Precomputed, tileable RGB noise used to jitter geometry.
///
/// The field is sampled with nearest-texel lookup after wrapping world
/// coordinates into `[0, 1)`, so the same position always yields the same
/// sample. That determinism is what keeps vertices shared between
/// neighboring cells in the same place after perturbation.
#[derive(Clone, Debug)]
pub struct NoiseField {
    size: usize,
    samples: Vec<Vec3>,
}

impl NoiseField {
    /// Wraps a square field of `size * size` samples, laid out column-major
    /// (`x * size + z`). Components are expected in `[0, 1]`.
    pub fn new(size: usize, samples: Vec<Vec3>) -> Result<Self, HexMapError> {
        let expected = size * size;
        if size == 0 || samples.len() != expected {
            return Err(HexMapError::NoiseFieldSize {
                size,
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self { size, samples })
    }

    /// Bakes a field by evaluating `f(u, v)` at each texel, with `u` and `v`
    /// in `[0, 1)`.
    pub fn from_fn(size: usize, mut f: impl FnMut(f64, f64) -> Vec3) -> Result<Self, HexMapError> {
        let mut samples = Vec::with_capacity(size * size);
        for x in 0..size {
            for z in 0..size {
                samples.push(f(x as f64 / size as f64, z as f64 / size as f64));
            }
        }
        Self::new(size, samples)
    }

    /// A field where every texel holds `value`.
    pub fn uniform(size: usize, value: Vec3) -> Result<Self, HexMapError> {
        Self::new(size, vec![value; size * size])
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Noise sample for a world position, as `(r, g, b, 0)`.
    pub fn sample(&self, position: Vec3) -> Vec4 {
        let u = wrap((position.x * NOISE_SCALE) as f64);
        let v = wrap((-position.z * NOISE_SCALE) as f64);
        let x = self.texel(u);
        let z = self.texel(v);
        self.samples[x * self.size + z].extend(0.0)
    }

    /// Jitters `position` horizontally; height is left untouched.
    pub fn perturb(&self, position: Vec3) -> Vec3 {
        let sample = self.sample(position);
        Vec3::new(
            position.x + (sample.x * 2.0 - 1.0) * CELL_PERTURB_STRENGTH,
            position.y,
            position.z + (sample.z * 2.0 - 1.0) * CELL_PERTURB_STRENGTH,
        )
    }

    fn texel(&self, t: f64) -> usize {
        ((t * self.size as f64) as usize).min(self.size - 1)
    }
}

fn wrap(t: f64) -> f64 {
    t - t.floor()
}
