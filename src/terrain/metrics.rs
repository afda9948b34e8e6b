//! Pure hex geometry: corner offsets, blend regions, terraces and edge types.
//!
//! Everything here is stateless. Positions use Bevy's right-handed frame with
//! `+Y` up and north pointing towards `-Z`.

use bevy::color::Mix;
use bevy::prelude::*;

use super::direction::HexDirection;

/// Distance from a cell center to any of its corners.
pub const OUTER_RADIUS: f32 = 10.0;
/// Ratio between the inner (edge) radius and the outer (corner) radius.
pub const OUTER_TO_INNER: f32 = 0.866_025_4;
pub const INNER_TO_OUTER: f32 = 1.0 / OUTER_TO_INNER;
/// Distance from a cell center to the middle of any edge.
pub const INNER_RADIUS: f32 = OUTER_RADIUS * OUTER_TO_INNER;

/// Fraction of the cell drawn in its own uniform color.
pub const SOLID_FACTOR: f32 = 0.8;
/// Fraction of the cell taken up by the blend region towards neighbors.
pub const BLEND_FACTOR: f32 = 1.0 - SOLID_FACTOR;

/// World-space height of one elevation level.
pub const ELEVATION_STEP: f32 = 3.0;

pub const TERRACES_PER_SLOPE: u32 = 2;
/// Number of interpolation steps across a sloped edge.
pub const TERRACE_STEPS: u32 = TERRACES_PER_SLOPE * 2 + 1;
pub const HORIZONTAL_TERRACE_STEP_SIZE: f32 = 1.0 / TERRACE_STEPS as f32;
pub const VERTICAL_TERRACE_STEP_SIZE: f32 = 1.0 / (TERRACES_PER_SLOPE + 1) as f32;

/// Maximum horizontal jitter applied to emitted vertices.
pub const CELL_PERTURB_STRENGTH: f32 = 4.0;
/// Maximum vertical jitter applied to a cell center.
pub const ELEVATION_PERTURB_STRENGTH: f32 = 1.5;
/// World-to-noise-field scale.
pub const NOISE_SCALE: f32 = 0.003;

pub const CHUNK_SIZE_X: usize = 5;
pub const CHUNK_SIZE_Z: usize = 5;
pub const CHUNK_CELL_COUNT: usize = CHUNK_SIZE_X * CHUNK_SIZE_Z;

/// Stream bed depth relative to the cell elevation, in elevation levels.
pub const STREAM_BED_ELEVATION_OFFSET: f32 = -1.0;
/// River surface height relative to the cell elevation, in elevation levels.
pub const RIVER_SURFACE_ELEVATION_OFFSET: f32 = -0.5;

const CORNERS: [Vec3; 7] = [
    Vec3::new(0.0, 0.0, -OUTER_RADIUS),
    Vec3::new(INNER_RADIUS, 0.0, -0.5 * OUTER_RADIUS),
    Vec3::new(INNER_RADIUS, 0.0, 0.5 * OUTER_RADIUS),
    Vec3::new(0.0, 0.0, OUTER_RADIUS),
    Vec3::new(-INNER_RADIUS, 0.0, 0.5 * OUTER_RADIUS),
    Vec3::new(-INNER_RADIUS, 0.0, -0.5 * OUTER_RADIUS),
    Vec3::new(0.0, 0.0, -OUTER_RADIUS),
];

/// How two adjacent cells connect across their shared edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum EdgeType {
    /// Same elevation.
    Flat,
    /// Elevation differs by exactly one level; drawn as terraces.
    Slope,
    /// Elevation differs by two or more levels.
    Cliff,
}

/// Classifies the connection between two elevations.
///
/// Uses `abs_diff` so the unset elevation sentinel cannot overflow.
pub fn edge_type(elevation1: i32, elevation2: i32) -> EdgeType {
    match elevation1.abs_diff(elevation2) {
        0 => EdgeType::Flat,
        1 => EdgeType::Slope,
        _ => EdgeType::Cliff,
    }
}

pub fn first_corner(direction: HexDirection) -> Vec3 {
    CORNERS[direction.index()]
}

pub fn second_corner(direction: HexDirection) -> Vec3 {
    CORNERS[direction.index() + 1]
}

pub fn first_solid_corner(direction: HexDirection) -> Vec3 {
    first_corner(direction) * SOLID_FACTOR
}

pub fn second_solid_corner(direction: HexDirection) -> Vec3 {
    second_corner(direction) * SOLID_FACTOR
}

/// Middle of the solid edge in `direction`, relative to the cell center.
pub fn solid_edge_middle(direction: HexDirection) -> Vec3 {
    (first_corner(direction) + second_corner(direction)) * (0.5 * SOLID_FACTOR)
}

/// Offset from a solid edge to the facing solid edge of the neighbor.
pub fn bridge(direction: HexDirection) -> Vec3 {
    (first_corner(direction) + second_corner(direction)) * BLEND_FACTOR
}

/// Interpolates along a sloped edge, producing the stair-step profile.
///
/// Horizontal position advances every step; height only advances on odd
/// steps, so each terrace is a flat ledge followed by a riser.
pub fn terrace_lerp(a: Vec3, b: Vec3, step: u32) -> Vec3 {
    debug_assert!(step <= TERRACE_STEPS, "terrace step {step} out of range");
    let h = step as f32 * HORIZONTAL_TERRACE_STEP_SIZE;
    let v = ((step + 1) / 2) as f32 * VERTICAL_TERRACE_STEP_SIZE;
    Vec3::new(
        a.x + (b.x - a.x) * h,
        a.y + (b.y - a.y) * v,
        a.z + (b.z - a.z) * h,
    )
}

/// Color counterpart of [`terrace_lerp`], blending by the horizontal fraction only.
pub fn terrace_lerp_color(a: LinearRgba, b: LinearRgba, step: u32) -> LinearRgba {
    let h = step as f32 * HORIZONTAL_TERRACE_STEP_SIZE;
    a.mix(&b, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    // ── edge_type ───────────────────────────────────────────────────

    #[test]
    fn edge_type_classifies_deltas() {
        assert_eq!(edge_type(3, 3), EdgeType::Flat);
        assert_eq!(edge_type(3, 4), EdgeType::Slope);
        assert_eq!(edge_type(4, 3), EdgeType::Slope);
        assert_eq!(edge_type(1, 3), EdgeType::Cliff);
        assert_eq!(edge_type(-2, 5), EdgeType::Cliff);
    }

    #[test]
    fn edge_type_is_symmetric() {
        for a in -4..=6 {
            for b in -4..=6 {
                assert_eq!(edge_type(a, b), edge_type(b, a), "asymmetric for {a}, {b}");
            }
        }
    }

    #[test]
    fn edge_type_handles_extreme_values() {
        assert_eq!(edge_type(i32::MIN, 0), EdgeType::Cliff);
        assert_eq!(edge_type(i32::MAX, i32::MIN), EdgeType::Cliff);
        assert_eq!(edge_type(i32::MIN, i32::MIN), EdgeType::Flat);
    }

    // ── corners ─────────────────────────────────────────────────────

    #[test]
    fn corners_lie_on_outer_radius() {
        for d in HexDirection::ALL {
            assert!((first_corner(d).length() - OUTER_RADIUS).abs() < EPS);
            assert!((second_corner(d).length() - OUTER_RADIUS).abs() < EPS);
        }
    }

    #[test]
    fn second_corner_is_next_first_corner() {
        for d in HexDirection::ALL {
            assert_eq!(second_corner(d), first_corner(d.next()));
        }
    }

    #[test]
    fn north_east_sector_starts_at_north_tip() {
        assert_eq!(first_corner(HexDirection::NE), Vec3::new(0.0, 0.0, -OUTER_RADIUS));
        assert!(second_corner(HexDirection::NE).x > 0.0);
    }

    #[test]
    fn bridges_span_the_blend_region() {
        for d in HexDirection::ALL {
            let gap = 2.0 * INNER_RADIUS * BLEND_FACTOR;
            assert!((bridge(d).length() - gap).abs() < EPS);
            assert!((bridge(d) + bridge(d.opposite())).length() < EPS);
        }
    }

    #[test]
    fn solid_edge_middle_sits_on_inner_radius() {
        for d in HexDirection::ALL {
            let m = solid_edge_middle(d);
            assert!((m.length() - INNER_RADIUS * SOLID_FACTOR).abs() < EPS);
        }
    }

    // ── terrace_lerp ────────────────────────────────────────────────

    #[test]
    fn terrace_lerp_hits_both_endpoints() {
        let a = Vec3::new(1.0, 2.0, -3.0);
        let b = Vec3::new(7.5, 5.0, 4.0);
        assert!((terrace_lerp(a, b, 0) - a).length() < EPS);
        assert!((terrace_lerp(a, b, TERRACE_STEPS) - b).length() < EPS);
    }

    #[test]
    fn terrace_height_holds_for_two_steps() {
        let a = Vec3::ZERO;
        let b = Vec3::new(10.0, 3.0, 0.0);
        let heights: Vec<f32> = (0..=TERRACE_STEPS).map(|i| terrace_lerp(a, b, i).y).collect();
        assert!((heights[1] - 1.0).abs() < EPS);
        assert!((heights[2] - heights[1]).abs() < EPS);
        assert!((heights[3] - 2.0).abs() < EPS);
        assert!((heights[4] - heights[3]).abs() < EPS);
    }

    #[test]
    fn terrace_horizontal_advances_every_step() {
        let a = Vec3::ZERO;
        let b = Vec3::new(10.0, 3.0, 5.0);
        for i in 1..=TERRACE_STEPS {
            let prev = terrace_lerp(a, b, i - 1);
            let cur = terrace_lerp(a, b, i);
            assert!((cur.x - prev.x - 2.0).abs() < EPS);
            assert!((cur.z - prev.z - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn terrace_color_uses_horizontal_fraction() {
        let a = LinearRgba::rgb(0.0, 0.0, 0.0);
        let b = LinearRgba::rgb(1.0, 0.5, 0.0);
        let c = terrace_lerp_color(a, b, 1);
        assert!((c.red - 0.2).abs() < EPS);
        assert!((c.green - 0.1).abs() < EPS);
        let end = terrace_lerp_color(a, b, TERRACE_STEPS);
        assert!((end.red - 1.0).abs() < EPS);
    }
}
