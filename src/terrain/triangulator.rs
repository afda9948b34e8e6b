//! Turns cells into chunk geometry.
//!
//! Each cell is drawn as six sectors. A sector covers the solid inner part
//! of the cell towards one edge. The blend region between two cells is drawn
//! once, by the cell that sees the other in a primary direction, and the
//! triangle where three cells meet is drawn by the cell that owns the NE or
//! E connection next to it.

mod rivers;
mod roads;

use bevy::color::Mix;
use bevy::prelude::*;

use super::cell::{CellId, HexCell};
use super::cells::HexCells;
use super::chunk::ChunkMeshes;
use super::direction::HexDirection;
use super::edge_vertices::EdgeVertices;
use super::metrics::{self, EdgeType, TERRACE_STEPS};
use super::noise_field::NoiseField;

/// One of the three cells meeting at a corner, with the corner position as
/// seen from that cell.
#[derive(Clone, Copy)]
struct Corner<'c> {
    position: Vec3,
    cell: &'c HexCell,
}

impl Corner<'_> {
    fn color(&self) -> LinearRgba {
        self.cell.color
    }

    fn elevation(&self) -> i32 {
        self.cell.elevation
    }
}

/// Writes the geometry of a chunk's cells into its buffers.
pub struct Triangulator<'a> {
    cells: &'a HexCells,
    noise: &'a NoiseField,
    meshes: &'a mut ChunkMeshes,
}

impl<'a> Triangulator<'a> {
    pub fn new(cells: &'a HexCells, noise: &'a NoiseField, meshes: &'a mut ChunkMeshes) -> Self {
        Self {
            cells,
            noise,
            meshes,
        }
    }

    pub fn triangulate(&mut self, id: CellId) {
        let cell = self.cell(id);
        for direction in HexDirection::ALL {
            self.triangulate_sector(direction, cell);
        }
    }

    fn cell(&self, id: CellId) -> &'a HexCell {
        let cells: &'a HexCells = self.cells;
        &cells[id]
    }

    fn neighbor(&self, cell: &HexCell, direction: HexDirection) -> Option<&'a HexCell> {
        cell.neighbor(direction).map(|id| self.cell(id))
    }

    fn triangulate_sector(&mut self, direction: HexDirection, cell: &HexCell) {
        let center = cell.position;
        let mut e = EdgeVertices::new(
            center + metrics::first_solid_corner(direction),
            center + metrics::second_solid_corner(direction),
        );

        if cell.has_river() {
            if cell.has_river_through_edge(direction) {
                e.v3.y = cell.stream_bed_y();
                if cell.has_river_begin_or_end() {
                    self.triangulate_with_river_begin_or_end(cell, center, &e);
                } else {
                    self.triangulate_with_river(direction, cell, center, &e);
                }
            } else {
                self.triangulate_adjacent_to_river(direction, cell, center, &e);
            }
        } else {
            self.triangulate_without_river(direction, cell, center, &e);
        }

        if direction.is_primary() {
            self.triangulate_connection(direction, cell, &e);
        }
    }

    fn triangulate_without_river(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        center: Vec3,
        e: &EdgeVertices,
    ) {
        self.triangulate_edge_fan(center, e, cell.color);
        if cell.has_roads() {
            let (left, right) = roads::road_interpolators(direction, cell);
            self.triangulate_road(
                center,
                center.lerp(e.v1, left),
                center.lerp(e.v5, right),
                e,
                cell.has_road_through_edge(direction),
            );
        }
    }

    fn triangulate_edge_fan(&mut self, center: Vec3, edge: &EdgeVertices, color: LinearRgba) {
        let terrain = &mut self.meshes.terrain;
        let points = edge.points();
        for pair in points.windows(2) {
            terrain.add_triangle(self.noise, center, pair[0], pair[1]);
            terrain.add_triangle_color_uniform(color);
        }
    }

    fn triangulate_edge_strip(
        &mut self,
        e1: &EdgeVertices,
        c1: LinearRgba,
        e2: &EdgeVertices,
        c2: LinearRgba,
        has_road: bool,
    ) {
        let terrain = &mut self.meshes.terrain;
        let (near, far) = (e1.points(), e2.points());
        for (n, f) in near.windows(2).zip(far.windows(2)) {
            terrain.add_quad(self.noise, n[0], n[1], f[0], f[1]);
            terrain.add_quad_color2(c1, c2);
        }
        if has_road {
            self.triangulate_road_segment(e1.v2, e1.v3, e1.v4, e2.v2, e2.v3, e2.v4);
        }
    }

    // ── Connections ────────────────────────────────────────────────

    fn triangulate_connection(&mut self, direction: HexDirection, cell: &HexCell, e1: &EdgeVertices) {
        let Some(neighbor) = self.neighbor(cell, direction) else {
            return;
        };

        let bridge = metrics::bridge(direction);
        let mut e2 = EdgeVertices::new(
            at_height(e1.v1 + bridge, neighbor.position.y),
            at_height(e1.v5 + bridge, neighbor.position.y),
        );

        let has_river = cell.has_river_through_edge(direction);
        let has_road = cell.has_road_through_edge(direction);

        if has_river {
            e2.v3.y = neighbor.stream_bed_y();
            self.triangulate_river_quad(
                [e1.v2, e1.v4, e2.v2, e2.v4],
                cell.river_surface_y(),
                neighbor.river_surface_y(),
                0.8,
                cell.incoming_river == Some(direction),
            );
        }

        if cell.edge_type_with(neighbor) == EdgeType::Slope {
            self.triangulate_edge_terraces(e1, cell, &e2, neighbor, has_road);
        } else {
            self.triangulate_edge_strip(e1, cell.color, &e2, neighbor.color, has_road);
        }

        let next = direction.next();
        if !matches!(direction, HexDirection::NE | HexDirection::E) {
            return;
        }
        let Some(next_neighbor) = self.neighbor(cell, next) else {
            return;
        };
        let v5 = at_height(e1.v5 + metrics::bridge(next), next_neighbor.position.y);

        let here = Corner {
            position: e1.v5,
            cell,
        };
        let there = Corner {
            position: e2.v5,
            cell: neighbor,
        };
        let beyond = Corner {
            position: v5,
            cell: next_neighbor,
        };

        // rotate so the lowest cell comes first, keeping clockwise order
        if cell.elevation <= neighbor.elevation {
            if cell.elevation <= next_neighbor.elevation {
                self.triangulate_corner(here, there, beyond);
            } else {
                self.triangulate_corner(beyond, here, there);
            }
        } else if neighbor.elevation <= next_neighbor.elevation {
            self.triangulate_corner(there, beyond, here);
        } else {
            self.triangulate_corner(beyond, here, there);
        }
    }

    fn triangulate_edge_terraces(
        &mut self,
        begin: &EdgeVertices,
        begin_cell: &HexCell,
        end: &EdgeVertices,
        end_cell: &HexCell,
        has_road: bool,
    ) {
        let mut e2 = EdgeVertices::terrace_lerp(begin, end, 1);
        let mut c2 = metrics::terrace_lerp_color(begin_cell.color, end_cell.color, 1);
        self.triangulate_edge_strip(begin, begin_cell.color, &e2, c2, has_road);

        for step in 2..TERRACE_STEPS {
            let (e1, c1) = (e2, c2);
            e2 = EdgeVertices::terrace_lerp(begin, end, step);
            c2 = metrics::terrace_lerp_color(begin_cell.color, end_cell.color, step);
            self.triangulate_edge_strip(&e1, c1, &e2, c2, has_road);
        }

        self.triangulate_edge_strip(&e2, c2, end, end_cell.color, has_road);
    }

    // ── Corners ────────────────────────────────────────────────────

    /// Fills the triangle between three cells. `bottom` is the lowest cell,
    /// `left` and `right` follow it clockwise.
    fn triangulate_corner(&mut self, bottom: Corner, left: Corner, right: Corner) {
        let left_edge = bottom.cell.edge_type_with(left.cell);
        let right_edge = bottom.cell.edge_type_with(right.cell);

        match (left_edge, right_edge) {
            (EdgeType::Slope, EdgeType::Slope) => self.triangulate_corner_terraces(bottom, left, right),
            (EdgeType::Slope, EdgeType::Flat) => self.triangulate_corner_terraces(left, right, bottom),
            (EdgeType::Slope, EdgeType::Cliff) => self.triangulate_corner_terraces_cliff(bottom, left, right),
            (EdgeType::Flat, EdgeType::Slope) => self.triangulate_corner_terraces(right, bottom, left),
            (EdgeType::Cliff, EdgeType::Slope) => self.triangulate_corner_cliff_terraces(bottom, left, right),
            (EdgeType::Flat | EdgeType::Cliff, EdgeType::Flat | EdgeType::Cliff) => {
                if left.cell.edge_type_with(right.cell) == EdgeType::Slope {
                    if left.elevation() < right.elevation() {
                        self.triangulate_corner_cliff_terraces(right, bottom, left);
                    } else {
                        self.triangulate_corner_terraces_cliff(left, right, bottom);
                    }
                } else {
                    let terrain = &mut self.meshes.terrain;
                    terrain.add_triangle(self.noise, bottom.position, left.position, right.position);
                    terrain.add_triangle_color(bottom.color(), left.color(), right.color());
                }
            }
        }
    }

    fn triangulate_corner_terraces(&mut self, begin: Corner, left: Corner, right: Corner) {
        let mut v3 = metrics::terrace_lerp(begin.position, left.position, 1);
        let mut v4 = metrics::terrace_lerp(begin.position, right.position, 1);
        let mut c3 = metrics::terrace_lerp_color(begin.color(), left.color(), 1);
        let mut c4 = metrics::terrace_lerp_color(begin.color(), right.color(), 1);

        let terrain = &mut self.meshes.terrain;
        terrain.add_triangle(self.noise, begin.position, v3, v4);
        terrain.add_triangle_color(begin.color(), c3, c4);

        for step in 2..TERRACE_STEPS {
            let (v1, v2, c1, c2) = (v3, v4, c3, c4);
            v3 = metrics::terrace_lerp(begin.position, left.position, step);
            v4 = metrics::terrace_lerp(begin.position, right.position, step);
            c3 = metrics::terrace_lerp_color(begin.color(), left.color(), step);
            c4 = metrics::terrace_lerp_color(begin.color(), right.color(), step);
            terrain.add_quad(self.noise, v1, v2, v3, v4);
            terrain.add_quad_color(c1, c2, c3, c4);
        }

        terrain.add_quad(self.noise, v3, v4, left.position, right.position);
        terrain.add_quad_color(c3, c4, left.color(), right.color());
    }

    /// Terraces climb from `begin` to `left` while a cliff rises to `right`.
    fn triangulate_corner_terraces_cliff(&mut self, begin: Corner, left: Corner, right: Corner) {
        let (boundary, boundary_color) = self.cliff_boundary(begin, right);

        self.triangulate_boundary_triangle(begin, left, boundary, boundary_color);
        self.close_cliff_corner(left, right, boundary, boundary_color);
    }

    /// A cliff rises from `begin` to `left` while terraces climb to `right`.
    fn triangulate_corner_cliff_terraces(&mut self, begin: Corner, left: Corner, right: Corner) {
        let (boundary, boundary_color) = self.cliff_boundary(begin, left);

        self.triangulate_boundary_triangle(right, begin, boundary, boundary_color);
        self.close_cliff_corner(left, right, boundary, boundary_color);
    }

    /// Point on the cliff edge where the terraces collapse, one elevation
    /// level up from `begin`. Interpolated between perturbed endpoints so it
    /// lines up with the cliff's own edge.
    fn cliff_boundary(&self, begin: Corner, top: Corner) -> (Vec3, LinearRgba) {
        let delta = begin.elevation().abs_diff(top.elevation());
        assert!(
            delta >= 2,
            "cliff boundary between elevations {} and {} is not a cliff",
            begin.elevation(),
            top.elevation()
        );
        let b = 1.0 / delta as f32;
        let boundary = self
            .noise
            .perturb(begin.position)
            .lerp(self.noise.perturb(top.position), b);
        let color = begin.color().mix(&top.color(), b);
        (boundary, color)
    }

    fn close_cliff_corner(&mut self, left: Corner, right: Corner, boundary: Vec3, boundary_color: LinearRgba) {
        if left.cell.edge_type_with(right.cell) == EdgeType::Slope {
            self.triangulate_boundary_triangle(left, right, boundary, boundary_color);
        } else {
            let terrain = &mut self.meshes.terrain;
            terrain.add_triangle_unperturbed(
                self.noise.perturb(left.position),
                self.noise.perturb(right.position),
                boundary,
            );
            terrain.add_triangle_color(left.color(), right.color(), boundary_color);
        }
    }

    /// Fans terrace steps from `begin` to `left` onto an already perturbed
    /// `boundary` point.
    fn triangulate_boundary_triangle(
        &mut self,
        begin: Corner,
        left: Corner,
        boundary: Vec3,
        boundary_color: LinearRgba,
    ) {
        let noise = self.noise;
        let terrain = &mut self.meshes.terrain;

        let mut v2 = noise.perturb(metrics::terrace_lerp(begin.position, left.position, 1));
        let mut c2 = metrics::terrace_lerp_color(begin.color(), left.color(), 1);
        terrain.add_triangle_unperturbed(noise.perturb(begin.position), v2, boundary);
        terrain.add_triangle_color(begin.color(), c2, boundary_color);

        for step in 2..TERRACE_STEPS {
            let (v1, c1) = (v2, c2);
            v2 = noise.perturb(metrics::terrace_lerp(begin.position, left.position, step));
            c2 = metrics::terrace_lerp_color(begin.color(), left.color(), step);
            terrain.add_triangle_unperturbed(v1, v2, boundary);
            terrain.add_triangle_color(c1, c2, boundary_color);
        }

        terrain.add_triangle_unperturbed(v2, noise.perturb(left.position), boundary);
        terrain.add_triangle_color(c2, left.color(), boundary_color);
    }
}

fn at_height(mut v: Vec3, y: f32) -> Vec3 {
    v.y = y;
    v
}
