//! Conversions between offset grid indices, axial [`Hex`] coordinates and
//! world space.
//!
//! Cells are laid out in rows of offset coordinates `(x, z)`. Each row is
//! shifted half a cell to the right of the one below it, and rows advance
//! north (towards `-Z`). The axial form stores the row in `Hex::y`, so the
//! cube triple is `(hex.x, hex.z(), hex.y)` in `(X, Y, Z)` order.

use bevy::prelude::*;
use hexx::{Hex, HexLayout, HexOrientation, OffsetHexMode};

use super::metrics::OUTER_RADIUS;

/// Pointy layout whose 2-D plane is world `(x, z)`. The negative `y` scale
/// makes axial rows advance towards `-Z`.
const LAYOUT: HexLayout =
    HexLayout::pointy().with_scale(Vec2::new(OUTER_RADIUS, -OUTER_RADIUS));

/// Axial coordinates for offset column `x` in row `z`.
pub fn from_offset(x: i32, z: i32) -> Hex {
    Hex::from_offset_coordinates([x, z], OffsetHexMode::Odd, HexOrientation::Pointy)
}

/// Offset `(x, z)` for an axial coordinate. Inverse of [`from_offset`].
pub fn to_offset(hex: Hex) -> (i32, i32) {
    let [x, z] = hex.to_offset_coordinates(OffsetHexMode::Odd, HexOrientation::Pointy);
    (x, z)
}

/// World-space center of a cell at height zero.
pub fn to_position(hex: Hex) -> Vec3 {
    let p = LAYOUT.hex_to_world_pos(hex);
    Vec3::new(p.x, 0.0, p.y)
}

/// Cell containing a world-space point, ignoring height.
pub fn from_position(position: Vec3) -> Hex {
    LAYOUT.world_pos_to_hex(position.xz())
}

/// Cube-coordinate label, e.g. `(1, -3, 2)`.
pub fn label(hex: Hex) -> String {
    format!("({}, {}, {})", hex.x, hex.z(), hex.y)
}
