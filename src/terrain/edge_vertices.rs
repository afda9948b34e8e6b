use bevy::prelude::*;

use super::metrics;

/// Five points along one cell edge, `v1` and `v5` being the corners.
///
/// Subdividing edges gives rivers a channel down the middle (`v3`) and roads
/// a strip between `v2` and `v4`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeVertices {
    pub v1: Vec3,
    pub v2: Vec3,
    pub v3: Vec3,
    pub v4: Vec3,
    pub v5: Vec3,
}

impl EdgeVertices {
    /// Evenly spaced quarters between two corners.
    pub fn new(corner1: Vec3, corner2: Vec3) -> Self {
        Self::with_outer_step(corner1, corner2, 0.25)
    }

    /// Like [`Self::new`], but `v2` and `v4` sit `outer_step` in from the
    /// corners instead of a quarter.
    pub fn with_outer_step(corner1: Vec3, corner2: Vec3, outer_step: f32) -> Self {
        Self {
            v1: corner1,
            v2: corner1.lerp(corner2, outer_step),
            v3: corner1.lerp(corner2, 0.5),
            v4: corner1.lerp(corner2, 1.0 - outer_step),
            v5: corner2,
        }
    }

    /// Terrace interpolation applied to each of the five points.
    pub fn terrace_lerp(a: &EdgeVertices, b: &EdgeVertices, step: u32) -> Self {
        Self {
            v1: metrics::terrace_lerp(a.v1, b.v1, step),
            v2: metrics::terrace_lerp(a.v2, b.v2, step),
            v3: metrics::terrace_lerp(a.v3, b.v3, step),
            v4: metrics::terrace_lerp(a.v4, b.v4, step),
            v5: metrics::terrace_lerp(a.v5, b.v5, step),
        }
    }

    pub fn points(&self) -> [Vec3; 5] {
        [self.v1, self.v2, self.v3, self.v4, self.v5]
    }
}
