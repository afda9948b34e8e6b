use bevy::prelude::*;

use super::Triangulator;
use crate::terrain::cell::HexCell;
use crate::terrain::direction::HexDirection;
use crate::terrain::edge_vertices::EdgeVertices;
use crate::terrain::metrics::{self, INNER_TO_OUTER};

impl Triangulator<'_> {
    /// Sector of a cell where a river starts or ends: the channel narrows to
    /// a point at the center.
    pub(super) fn triangulate_with_river_begin_or_end(&mut self, cell: &HexCell, center: Vec3, e: &EdgeVertices) {
        let mut m = EdgeVertices::new(center.lerp(e.v1, 0.5), center.lerp(e.v5, 0.5));
        m.v3.y = e.v3.y;

        self.triangulate_edge_strip(&m, cell.color, e, cell.color, false);
        self.triangulate_edge_fan(center, &m, cell.color);

        let reversed = cell.has_incoming_river();
        let surface = cell.river_surface_y();
        self.triangulate_river_quad([m.v2, m.v4, e.v2, e.v4], surface, surface, 0.6, reversed);

        let rivers = &mut self.meshes.rivers;
        rivers.add_triangle(
            self.noise,
            Vec3::new(center.x, surface, center.z),
            Vec3::new(m.v2.x, surface, m.v2.z),
            Vec3::new(m.v4.x, surface, m.v4.z),
        );
        if reversed {
            rivers.add_triangle_uv(Vec2::new(0.5, 0.4), Vec2::new(1.0, 0.2), Vec2::new(0.0, 0.2));
        } else {
            rivers.add_triangle_uv(Vec2::new(0.5, 0.4), Vec2::new(0.0, 0.6), Vec2::new(1.0, 0.6));
        }
    }

    /// Sector a river flows through. The center splits into a left and a
    /// right bank depending on where the river leaves the cell.
    pub(super) fn triangulate_with_river(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        center: Vec3,
        e: &EdgeVertices,
    ) {
        let (center_l, center_r) = if cell.has_river_through_edge(direction.opposite()) {
            (
                center + metrics::first_solid_corner(direction.previous()) * 0.25,
                center + metrics::second_solid_corner(direction.next()) * 0.25,
            )
        } else if cell.has_river_through_edge(direction.next()) {
            (center, center.lerp(e.v5, 2.0 / 3.0))
        } else if cell.has_river_through_edge(direction.previous()) {
            (center.lerp(e.v1, 2.0 / 3.0), center)
        } else if cell.has_river_through_edge(direction.next2()) {
            (
                center,
                center + metrics::solid_edge_middle(direction.next()) * (0.5 * INNER_TO_OUTER),
            )
        } else {
            (
                center + metrics::solid_edge_middle(direction.previous()) * (0.5 * INNER_TO_OUTER),
                center,
            )
        };

        let mut center = center_l.lerp(center_r, 0.5);
        let mut m = EdgeVertices::with_outer_step(
            center_l.lerp(e.v1, 0.5),
            center_r.lerp(e.v5, 0.5),
            1.0 / 6.0,
        );
        m.v3.y = e.v3.y;
        center.y = e.v3.y;

        self.triangulate_edge_strip(&m, cell.color, e, cell.color, false);

        let color = cell.color;
        let terrain = &mut self.meshes.terrain;
        terrain.add_triangle(self.noise, center_l, m.v1, m.v2);
        terrain.add_triangle_color_uniform(color);
        terrain.add_quad(self.noise, center_l, center, m.v2, m.v3);
        terrain.add_quad_color_uniform(color);
        terrain.add_quad(self.noise, center, center_r, m.v3, m.v4);
        terrain.add_quad_color_uniform(color);
        terrain.add_triangle(self.noise, center_r, m.v4, m.v5);
        terrain.add_triangle_color_uniform(color);

        let reversed = cell.incoming_river == Some(direction);
        let surface = cell.river_surface_y();
        self.triangulate_river_quad([center_l, center_r, m.v2, m.v4], surface, surface, 0.4, reversed);
        self.triangulate_river_quad([m.v2, m.v4, e.v2, e.v4], surface, surface, 0.6, reversed);
    }

    /// Sector without a river in a cell that has one: the fan center is
    /// pushed away from the channel so it does not cut into the bank.
    pub(super) fn triangulate_adjacent_to_river(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        center: Vec3,
        e: &EdgeVertices,
    ) {
        if cell.has_roads() {
            self.triangulate_road_adjacent_to_river(direction, cell, center, e);
        }

        let mut center = center;
        if cell.has_river_through_edge(direction.next()) {
            if cell.has_river_through_edge(direction.previous()) {
                center += metrics::solid_edge_middle(direction) * (INNER_TO_OUTER * 0.5);
            } else if cell.has_river_through_edge(direction.previous2()) {
                center += metrics::first_solid_corner(direction) * 0.25;
            }
        } else if cell.has_river_through_edge(direction.previous())
            && cell.has_river_through_edge(direction.next2())
        {
            center += metrics::second_solid_corner(direction) * 0.25;
        }

        let m = EdgeVertices::new(center.lerp(e.v1, 0.5), center.lerp(e.v5, 0.5));
        self.triangulate_edge_strip(&m, cell.color, e, cell.color, false);
        self.triangulate_edge_fan(center, &m, cell.color);
    }

    /// Water surface quad. `v` is where the quad starts along the flow; a
    /// reversed quad runs its UVs against the vertex order.
    pub(super) fn triangulate_river_quad(
        &mut self,
        [v1, v2, v3, v4]: [Vec3; 4],
        near_y: f32,
        far_y: f32,
        v: f32,
        reversed: bool,
    ) {
        let rivers = &mut self.meshes.rivers;
        rivers.add_quad(
            self.noise,
            Vec3::new(v1.x, near_y, v1.z),
            Vec3::new(v2.x, near_y, v2.z),
            Vec3::new(v3.x, far_y, v3.z),
            Vec3::new(v4.x, far_y, v4.z),
        );
        if reversed {
            rivers.add_quad_uv_rect(1.0, 0.0, 0.8 - v, 0.6 - v);
        } else {
            rivers.add_quad_uv_rect(0.0, 1.0, v, v + 0.2);
        }
    }
}
