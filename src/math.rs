//! Pure computation helpers extracted for testability.
//!
//! All functions in this module are free of Bevy ECS dependencies and operate
//! on plain numeric / `Vec3` inputs, making them straightforward to unit-test.

use bevy::prelude::Vec3;

/// Maps a noise value from the standard `[-1, 1]` range into `[min, max]`.
///
/// Noise generators (e.g. `Fbm<Perlin>`) produce values centred around zero.
/// This linearly rescales to an arbitrary output range.
///
/// # Examples
/// ```
/// # use hex_map::math::map_noise_to_range;
/// assert_eq!(map_noise_to_range(-1.0, 0.0, 10.0), 0.0);
/// assert_eq!(map_noise_to_range( 1.0, 0.0, 10.0), 10.0);
/// assert_eq!(map_noise_to_range( 0.0, 2.0, 6.0),  4.0);
/// ```
pub fn map_noise_to_range(noise_val: f64, min: f32, max: f32) -> f32 {
    min + ((noise_val as f32 + 1.0) / 2.0) * (max - min)
}

/// Computes the face normal of a triangle defined by three vertices.
///
/// Uses the cross product of edges `(v1 - v0)` and `(v2 - v0)`.
/// Returns `Vec3::ZERO` if the triangle is degenerate (collinear points).
pub fn compute_normal(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    edge1.cross(edge2).normalize_or_zero()
}

/// Frame-rate independent exponential approach of `current` toward `target`.
///
/// `rate` is the fraction of the remaining gap closed per second, expressed
/// as a decay constant; `dt` is the frame time in seconds.
///
/// # Examples
/// ```
/// # use hex_map::math::damp;
/// assert_eq!(damp(0.0, 10.0, 5.0, 0.0), 0.0);
/// assert!(damp(0.0, 10.0, 5.0, 10.0) > 9.99);
/// ```
pub fn damp(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * (1.0 - (-rate * dt).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── map_noise_to_range ──────────────────────────────────────────

    #[test]
    fn noise_min_maps_to_range_min() {
        assert_eq!(map_noise_to_range(-1.0, 0.0, 10.0), 0.0);
    }

    #[test]
    fn noise_max_maps_to_range_max() {
        assert_eq!(map_noise_to_range(1.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn noise_zero_maps_to_midpoint() {
        let result = map_noise_to_range(0.0, 2.0, 6.0);
        assert!((result - 4.0).abs() < 1e-6);
    }

    #[test]
    fn noise_works_with_negative_range() {
        let result = map_noise_to_range(0.0, -10.0, 10.0);
        assert!((result - 0.0).abs() < 1e-6);
    }

    // ── compute_normal ──────────────────────────────────────────────

    #[test]
    fn normal_of_xy_plane_triangle() {
        let n = compute_normal(Vec3::ZERO, Vec3::X, Vec3::Y);
        // Cross of X × Y = Z
        assert!((n - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn normal_of_xz_plane_triangle() {
        let n = compute_normal(Vec3::ZERO, Vec3::X, Vec3::Z);
        // Cross of X × Z = -Y
        assert!((n - Vec3::NEG_Y).length() < 1e-6);
    }

    #[test]
    fn north_facing_triangle_points_up() {
        // Counter-clockwise seen from above with north at -Z.
        let n = compute_normal(Vec3::ZERO, Vec3::X, Vec3::NEG_Z);
        assert!((n - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn degenerate_triangle_returns_zero() {
        // Collinear points
        let n = compute_normal(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
        assert_eq!(n, Vec3::ZERO);
    }

    // ── damp ────────────────────────────────────────────────────────

    #[test]
    fn damp_moves_toward_target() {
        let v = damp(0.0, 10.0, 4.0, 0.1);
        assert!(v > 0.0 && v < 10.0);
    }

    #[test]
    fn damp_never_overshoots() {
        for dt in [0.01, 0.5, 5.0, 100.0] {
            assert!(damp(2.0, -3.0, 8.0, dt) >= -3.0);
        }
    }

    #[test]
    fn damp_is_split_invariant() {
        let once = damp(0.0, 1.0, 3.0, 0.2);
        let twice = damp(damp(0.0, 1.0, 3.0, 0.1), 1.0, 3.0, 0.1);
        assert!((once - twice).abs() < 1e-5);
    }
}
