use bevy::prelude::*;

use super::Triangulator;
use crate::terrain::cell::HexCell;
use crate::terrain::direction::HexDirection;
use crate::terrain::edge_vertices::EdgeVertices;
use crate::terrain::metrics::{self, INNER_TO_OUTER};

/// How far along the sector's outer corners the road reaches, left then
/// right. Roads through the edge span half the sector; otherwise the road
/// widens only towards neighboring sectors that carry a road.
pub(super) fn road_interpolators(direction: HexDirection, cell: &HexCell) -> (f32, f32) {
    if cell.has_road_through_edge(direction) {
        (0.5, 0.5)
    } else {
        let towards = |d: HexDirection| if cell.has_road_through_edge(d) { 0.5 } else { 0.25 };
        (towards(direction.previous()), towards(direction.next()))
    }
}

impl Triangulator<'_> {
    pub(super) fn triangulate_road(
        &mut self,
        center: Vec3,
        m_l: Vec3,
        m_r: Vec3,
        e: &EdgeVertices,
        has_road_through_cell_edge: bool,
    ) {
        if has_road_through_cell_edge {
            let m_c = m_l.lerp(m_r, 0.5);
            self.triangulate_road_segment(m_l, m_c, m_r, e.v2, e.v3, e.v4);
            let roads = &mut self.meshes.roads;
            roads.add_triangle(self.noise, center, m_l, m_c);
            roads.add_triangle(self.noise, center, m_c, m_r);
            roads.add_triangle_uv(Vec2::new(1.0, 0.0), Vec2::ZERO, Vec2::new(1.0, 0.0));
            roads.add_triangle_uv(Vec2::new(1.0, 0.0), Vec2::new(1.0, 0.0), Vec2::ZERO);
        } else {
            self.triangulate_road_edge(center, m_l, m_r);
        }
    }

    /// Road surface without a centerline, filling towards a neighbor sector.
    pub(super) fn triangulate_road_edge(&mut self, center: Vec3, m_l: Vec3, m_r: Vec3) {
        let roads = &mut self.meshes.roads;
        roads.add_triangle(self.noise, center, m_l, m_r);
        roads.add_triangle_uv(Vec2::new(1.0, 0.0), Vec2::ZERO, Vec2::ZERO);
    }

    /// Two quads with `u` = 1 along the shared middle line, 0 at the sides.
    pub(super) fn triangulate_road_segment(&mut self, v1: Vec3, v2: Vec3, v3: Vec3, v4: Vec3, v5: Vec3, v6: Vec3) {
        let roads = &mut self.meshes.roads;
        roads.add_quad(self.noise, v1, v2, v4, v5);
        roads.add_quad(self.noise, v2, v3, v5, v6);
        roads.add_quad_uv_rect(0.0, 1.0, 0.0, 0.0);
        roads.add_quad_uv_rect(1.0, 0.0, 0.0, 0.0);
    }

    /// Routes roads in a river cell around the channel. Sectors cut off from
    /// every road by the river draw nothing.
    pub(super) fn triangulate_road_adjacent_to_river(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        center: Vec3,
        e: &EdgeVertices,
    ) {
        let has_road_through_edge = cell.has_road_through_edge(direction);
        let previous_has_river = cell.has_river_through_edge(direction.previous());
        let next_has_river = cell.has_river_through_edge(direction.next());
        let (left, right) = road_interpolators(direction, cell);

        let mut center = center;
        let mut road_center = center;

        match (cell.river_begin_or_end_direction(), cell.incoming_river, cell.outgoing_river) {
            (Some(end), _, _) => {
                road_center += metrics::solid_edge_middle(end.opposite()) * (1.0 / 3.0);
            }
            (None, Some(incoming), Some(outgoing)) if incoming == outgoing.opposite() => {
                let corner = if previous_has_river {
                    if !has_road_through_edge && !cell.has_road_through_edge(direction.next()) {
                        return;
                    }
                    metrics::second_solid_corner(direction)
                } else {
                    if !has_road_through_edge && !cell.has_road_through_edge(direction.previous()) {
                        return;
                    }
                    metrics::first_solid_corner(direction)
                };
                road_center += corner * 0.5;
                center += corner * 0.25;
            }
            (None, Some(incoming), Some(outgoing)) if incoming == outgoing.previous() => {
                road_center -= metrics::second_corner(incoming) * 0.2;
            }
            (None, Some(incoming), Some(outgoing)) if incoming == outgoing.next() => {
                road_center -= metrics::first_corner(incoming) * 0.2;
            }
            _ if previous_has_river && next_has_river => {
                if !has_road_through_edge {
                    return;
                }
                let offset = metrics::solid_edge_middle(direction) * INNER_TO_OUTER;
                road_center += offset * 0.7;
                center += offset * 0.5;
            }
            _ => {
                let middle = if previous_has_river {
                    direction.next()
                } else if next_has_river {
                    direction.previous()
                } else {
                    direction
                };
                if !cell.has_road_through_edge(middle)
                    && !cell.has_road_through_edge(middle.previous())
                    && !cell.has_road_through_edge(middle.next())
                {
                    return;
                }
                road_center += metrics::solid_edge_middle(middle) * 0.25;
            }
        }

        let m_l = road_center.lerp(e.v1, left);
        let m_r = road_center.lerp(e.v5, right);
        self.triangulate_road(road_center, m_l, m_r, e, has_road_through_edge);
        if previous_has_river {
            self.triangulate_road_edge(road_center, center, m_l);
        }
        if next_has_river {
            self.triangulate_road_edge(road_center, m_r, center);
        }
    }
}
