//! The cell arena and every edit that keeps cells consistent with their
//! neighbors.
//!
//! Edits never touch chunks. Each one reports the chunks whose geometry it
//! invalidated as a [`DirtyChunks`] value, and [`super::grid::HexGrid`]
//! applies that to the chunk flags.

use std::collections::BTreeSet;
use std::ops::Index;

use bevy::log::debug;
use bevy::prelude::*;

use super::cell::{CellId, HexCell};
use super::chunk::ChunkId;
use super::direction::HexDirection;
use super::metrics::{ELEVATION_PERTURB_STRENGTH, ELEVATION_STEP};
use super::noise_field::NoiseField;

/// Chunks whose meshes must be rebuilt after an edit.
///
/// Empty when the edit was rejected or changed nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirtyChunks(BTreeSet<ChunkId>);

impl DirtyChunks {
    pub fn insert(&mut self, chunk: ChunkId) {
        self.0.insert(chunk);
    }

    pub fn merge(&mut self, other: DirtyChunks) {
        self.0.extend(other.0);
    }

    pub fn contains(&self, chunk: ChunkId) -> bool {
        self.0.contains(&chunk)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Chunk ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = ChunkId> + '_ {
        self.0.iter().copied()
    }
}

/// Flat arena of cells, indexed by [`CellId`].
#[derive(Clone, Debug, Default)]
pub struct HexCells {
    cells: Vec<HexCell>,
}

impl Index<CellId> for HexCells {
    type Output = HexCell;

    fn index(&self, id: CellId) -> &HexCell {
        &self.cells[id.0]
    }
}

impl HexCells {
    pub(super) fn new(cells: Vec<HexCell>) -> Self {
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellId, &HexCell)> {
        self.cells.iter().enumerate().map(|(i, c)| (CellId(i), c))
    }

    /// Neighbor of `id` in `direction`, if the grid extends that way.
    pub fn neighbor(&self, id: CellId, direction: HexDirection) -> Option<&HexCell> {
        self[id].neighbor(direction).map(|n| &self[n])
    }

    /// Direction from `from` to an adjacent `to`.
    pub fn direction_to(&self, from: CellId, to: CellId) -> Option<HexDirection> {
        HexDirection::ALL
            .into_iter()
            .find(|&d| self[from].neighbor(d) == Some(to))
    }

    /// Absolute elevation difference towards the neighbor in `direction`.
    pub fn elevation_difference(&self, id: CellId, direction: HexDirection) -> Option<u32> {
        self.neighbor(id, direction)
            .map(|n| self[id].elevation.abs_diff(n.elevation))
    }

    /// Whether water may flow from `from` into `to`: downhill, level, or into
    /// a lake whose surface sits at `to`'s elevation.
    pub fn is_valid_river_destination(&self, from: CellId, to: CellId) -> bool {
        let (from, to) = (&self[from], &self[to]);
        from.elevation >= to.elevation || from.water_level == to.elevation
    }

    // ── Terrain edits ──────────────────────────────────────────────

    pub fn set_elevation(&mut self, id: CellId, elevation: i32, noise: &NoiseField) -> DirtyChunks {
        let mut dirty = DirtyChunks::default();
        if self[id].elevation == elevation {
            return dirty;
        }
        self.cells[id.0].elevation = elevation;
        self.refresh_position(id, noise);
        self.validate_rivers(id, &mut dirty);

        for d in HexDirection::ALL {
            if self[id].has_road_through_edge(d)
                && self.elevation_difference(id, d).is_some_and(|diff| diff > 1)
            {
                debug!("road {d:?} from {:?} removed by elevation change", self[id].coordinates);
                self.set_road(id, d, false, &mut dirty);
            }
        }
        self.refresh(id, &mut dirty);
        dirty
    }

    pub fn set_water_level(&mut self, id: CellId, water_level: i32) -> DirtyChunks {
        let mut dirty = DirtyChunks::default();
        if self[id].water_level == water_level {
            return dirty;
        }
        self.cells[id.0].water_level = water_level;
        self.validate_rivers(id, &mut dirty);
        self.refresh(id, &mut dirty);
        dirty
    }

    pub fn set_color(&mut self, id: CellId, color: LinearRgba) -> DirtyChunks {
        let mut dirty = DirtyChunks::default();
        if self[id].color == color {
            return dirty;
        }
        self.cells[id.0].color = color;
        self.refresh(id, &mut dirty);
        dirty
    }

    // ── Rivers ─────────────────────────────────────────────────────

    /// Starts or redirects the river leaving `id` towards `direction`.
    ///
    /// Rejected without a neighbor or when the neighbor is uphill and not the
    /// level of this cell's lake. Replaces any previous outgoing river, clears
    /// the neighbor's old incoming river and any road on that edge.
    pub fn set_outgoing_river(&mut self, id: CellId, direction: HexDirection) -> DirtyChunks {
        let mut dirty = DirtyChunks::default();
        if self[id].outgoing_river == Some(direction) {
            return dirty;
        }
        let Some(neighbor) = self[id].neighbor(direction) else {
            debug!("river from {:?} towards {direction:?} has no destination", self[id].coordinates);
            return dirty;
        };
        if !self.is_valid_river_destination(id, neighbor) {
            debug!(
                "river from {:?} towards {direction:?} would flow uphill",
                self[id].coordinates
            );
            return dirty;
        }

        dirty.merge(self.remove_outgoing_river(id));
        if self[id].incoming_river == Some(direction) {
            dirty.merge(self.remove_incoming_river(id));
        }
        self.cells[id.0].outgoing_river = Some(direction);

        dirty.merge(self.remove_incoming_river(neighbor));
        self.cells[neighbor.0].incoming_river = Some(direction.opposite());

        self.refresh_self_only(id, &mut dirty);
        self.refresh_self_only(neighbor, &mut dirty);
        self.set_road(id, direction, false, &mut dirty);
        dirty
    }

    pub fn remove_outgoing_river(&mut self, id: CellId) -> DirtyChunks {
        let mut dirty = DirtyChunks::default();
        let Some(direction) = self.cells[id.0].outgoing_river.take() else {
            return dirty;
        };
        self.refresh_self_only(id, &mut dirty);
        if let Some(neighbor) = self[id].neighbor(direction) {
            self.cells[neighbor.0].incoming_river = None;
            self.refresh_self_only(neighbor, &mut dirty);
        }
        dirty
    }

    pub fn remove_incoming_river(&mut self, id: CellId) -> DirtyChunks {
        let mut dirty = DirtyChunks::default();
        let Some(direction) = self.cells[id.0].incoming_river.take() else {
            return dirty;
        };
        self.refresh_self_only(id, &mut dirty);
        if let Some(neighbor) = self[id].neighbor(direction) {
            self.cells[neighbor.0].outgoing_river = None;
            self.refresh_self_only(neighbor, &mut dirty);
        }
        dirty
    }

    pub fn remove_river(&mut self, id: CellId) -> DirtyChunks {
        let mut dirty = self.remove_outgoing_river(id);
        dirty.merge(self.remove_incoming_river(id));
        dirty
    }

    // ── Roads ──────────────────────────────────────────────────────

    /// Adds a road towards `direction` unless a river crosses that edge or
    /// the neighbor is more than one level away.
    pub fn add_road(&mut self, id: CellId, direction: HexDirection) -> DirtyChunks {
        let mut dirty = DirtyChunks::default();
        let cell = &self[id];
        if cell.has_road_through_edge(direction) || cell.has_river_through_edge(direction) {
            return dirty;
        }
        match self.elevation_difference(id, direction) {
            Some(diff) if diff <= 1 => self.set_road(id, direction, true, &mut dirty),
            _ => debug!("road from {:?} towards {direction:?} rejected", cell.coordinates),
        }
        dirty
    }

    pub fn remove_roads(&mut self, id: CellId) -> DirtyChunks {
        let mut dirty = DirtyChunks::default();
        for d in HexDirection::ALL {
            if self[id].has_road_through_edge(d) {
                self.set_road(id, d, false, &mut dirty);
            }
        }
        dirty
    }

    // ── Decorations ────────────────────────────────────────────────

    pub fn set_urban_level(&mut self, id: CellId, level: i32) -> DirtyChunks {
        self.set_local(id, |cell| std::mem::replace(&mut cell.urban_level, level) != level)
    }

    pub fn set_farm_level(&mut self, id: CellId, level: i32) -> DirtyChunks {
        self.set_local(id, |cell| std::mem::replace(&mut cell.farm_level, level) != level)
    }

    pub fn set_plant_level(&mut self, id: CellId, level: i32) -> DirtyChunks {
        self.set_local(id, |cell| std::mem::replace(&mut cell.plant_level, level) != level)
    }

    pub fn set_walled(&mut self, id: CellId, walled: bool) -> DirtyChunks {
        self.set_local(id, |cell| std::mem::replace(&mut cell.walled, walled) != walled)
    }

    // ── Internals ──────────────────────────────────────────────────

    /// Applies an edit that only affects the cell's own chunk.
    fn set_local(&mut self, id: CellId, edit: impl FnOnce(&mut HexCell) -> bool) -> DirtyChunks {
        let mut dirty = DirtyChunks::default();
        if edit(&mut self.cells[id.0]) {
            self.refresh_self_only(id, &mut dirty);
        }
        dirty
    }

    fn set_road(&mut self, id: CellId, direction: HexDirection, state: bool, dirty: &mut DirtyChunks) {
        self.cells[id.0].roads[direction.index()] = state;
        self.refresh_self_only(id, dirty);
        if let Some(neighbor) = self[id].neighbor(direction) {
            self.cells[neighbor.0].roads[direction.opposite().index()] = state;
            self.refresh_self_only(neighbor, dirty);
        }
    }

    /// Drops rivers that the current elevation and water level no longer allow.
    fn validate_rivers(&mut self, id: CellId, dirty: &mut DirtyChunks) {
        if let Some(d) = self[id].outgoing_river
            && let Some(neighbor) = self[id].neighbor(d)
            && !self.is_valid_river_destination(id, neighbor)
        {
            debug!("outgoing river of {:?} no longer valid", self[id].coordinates);
            dirty.merge(self.remove_outgoing_river(id));
        }
        if let Some(d) = self[id].incoming_river
            && let Some(neighbor) = self[id].neighbor(d)
            && !self.is_valid_river_destination(neighbor, id)
        {
            debug!("incoming river of {:?} no longer valid", self[id].coordinates);
            dirty.merge(self.remove_incoming_river(id));
        }
    }

    fn refresh_position(&mut self, id: CellId, noise: &NoiseField) {
        let cell = &mut self.cells[id.0];
        let jitter = (noise.sample(cell.position).y * 2.0 - 1.0) * ELEVATION_PERTURB_STRENGTH;
        cell.position.y = cell.elevation as f32 * ELEVATION_STEP + jitter;
    }

    /// Own chunk plus the chunks of neighbors that belong elsewhere, since
    /// they draw shared connections and corners.
    fn refresh(&self, id: CellId, dirty: &mut DirtyChunks) {
        self.refresh_self_only(id, dirty);
        for neighbor in self[id].neighbors.iter().flatten() {
            if let Some(chunk) = self[*neighbor].chunk {
                dirty.insert(chunk);
            }
        }
    }

    fn refresh_self_only(&self, id: CellId, dirty: &mut DirtyChunks) {
        if let Some(chunk) = self[id].chunk {
            dirty.insert(chunk);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::grid::HexGrid;

    fn flat_noise() -> NoiseField {
        NoiseField::uniform(4, Vec3::splat(0.5)).unwrap()
    }

    /// Two chunks side by side, every cell at elevation 0.
    fn grid() -> (HexGrid, NoiseField) {
        let noise = flat_noise();
        let mut grid = HexGrid::new(2, 1).unwrap();
        for i in 0..grid.cells().len() {
            grid.set_elevation(CellId(i), 0, &noise);
        }
        (grid, noise)
    }

    fn id(grid: &HexGrid, x: i32, z: i32) -> CellId {
        grid.cell_at_offset(x, z).unwrap()
    }

    fn assert_roads_symmetric(cells: &HexCells) {
        for (id, cell) in cells.iter() {
            for d in HexDirection::ALL {
                match cells.neighbor(id, d) {
                    Some(n) => assert_eq!(
                        cell.has_road_through_edge(d),
                        n.has_road_through_edge(d.opposite()),
                        "road asymmetry at {id:?} {d:?}"
                    ),
                    None => assert!(!cell.has_road_through_edge(d)),
                }
            }
        }
    }

    // ── elevation ──────────────────────────────────────────────────

    #[test]
    fn elevation_sets_height_and_dirties_neighbor_chunks() {
        let (mut grid, noise) = grid();
        let edge = id(&grid, 4, 2);
        let dirty = grid.set_elevation(edge, 3, &noise);
        assert_eq!(grid.cell(edge).elevation(), 3);
        assert!((grid.cell(edge).position().y - 3.0 * ELEVATION_STEP).abs() < 1e-5);
        assert!(dirty.contains(ChunkId(0)));
        assert!(dirty.contains(ChunkId(1)), "east neighbor lives in the next chunk");
    }

    #[test]
    fn same_elevation_is_a_noop() {
        let (mut grid, noise) = grid();
        let c = id(&grid, 1, 1);
        assert!(grid.set_elevation(c, 0, &noise).is_empty());
    }

    #[test]
    fn elevation_jitter_follows_noise_green_channel() {
        let noise = NoiseField::uniform(4, Vec3::new(0.5, 1.0, 0.5)).unwrap();
        let mut grid = HexGrid::new(1, 1).unwrap();
        grid.set_elevation(CellId(0), 2, &noise);
        let expected = 2.0 * ELEVATION_STEP + ELEVATION_PERTURB_STRENGTH;
        assert!((grid.cell(CellId(0)).position().y - expected).abs() < 1e-5);
    }

    // ── rivers ─────────────────────────────────────────────────────

    #[test]
    fn river_links_both_cells() {
        let (mut grid, _) = grid();
        let a = id(&grid, 1, 1);
        grid.set_outgoing_river(a, HexDirection::E);
        let b = id(&grid, 2, 1);
        assert_eq!(grid.cell(a).outgoing_river(), Some(HexDirection::E));
        assert_eq!(grid.cell(b).incoming_river(), Some(HexDirection::W));
    }

    #[test]
    fn river_towards_grid_edge_is_rejected() {
        let (mut grid, _) = grid();
        let corner = id(&grid, 0, 0);
        assert!(grid.set_outgoing_river(corner, HexDirection::W).is_empty());
        assert!(!grid.cell(corner).has_river());
    }

    #[test]
    fn river_into_higher_neighbor_is_rejected() {
        let (mut grid, noise) = grid();
        let a = id(&grid, 1, 1);
        let b = id(&grid, 2, 1);
        grid.set_elevation(a, 2, &noise);
        grid.set_elevation(b, 3, &noise);
        let dirty = grid.set_outgoing_river(a, HexDirection::E);
        assert!(dirty.is_empty());
        assert!(!grid.cell(a).has_river());
        assert!(!grid.cell(b).has_river());
    }

    #[test]
    fn river_may_climb_into_a_lake_at_its_water_level() {
        let (mut grid, noise) = grid();
        let a = id(&grid, 1, 1);
        let b = id(&grid, 2, 1);
        grid.set_elevation(a, 2, &noise);
        grid.set_elevation(b, 3, &noise);
        grid.set_water_level(a, 3);
        grid.set_outgoing_river(a, HexDirection::E);
        assert!(grid.cell(a).has_outgoing_river());
    }

    #[test]
    fn redirecting_keeps_one_outgoing_river() {
        let (mut grid, _) = grid();
        let a = id(&grid, 2, 2);
        grid.set_outgoing_river(a, HexDirection::E);
        grid.set_outgoing_river(a, HexDirection::SW);
        let old = grid.cells().neighbor(a, HexDirection::E).unwrap();
        let new = grid.cells().neighbor(a, HexDirection::SW).unwrap();
        assert_eq!(grid.cell(a).outgoing_river(), Some(HexDirection::SW));
        assert!(!old.has_incoming_river());
        assert_eq!(new.incoming_river(), Some(HexDirection::NE));
    }

    #[test]
    fn reversing_a_river_clears_the_old_direction() {
        let (mut grid, _) = grid();
        let a = id(&grid, 1, 1);
        let b = id(&grid, 2, 1);
        grid.set_outgoing_river(a, HexDirection::E);
        grid.set_outgoing_river(b, HexDirection::W);
        assert_eq!(grid.cell(b).outgoing_river(), Some(HexDirection::W));
        assert_eq!(grid.cell(b).incoming_river(), None);
        assert_eq!(grid.cell(a).incoming_river(), Some(HexDirection::E));
        assert_eq!(grid.cell(a).outgoing_river(), None);
    }

    #[test]
    fn new_incoming_river_replaces_old_one() {
        let (mut grid, _) = grid();
        let target = id(&grid, 2, 2);
        let west = grid.cell(target).neighbor(HexDirection::W).unwrap();
        let east = grid.cell(target).neighbor(HexDirection::E).unwrap();
        grid.set_outgoing_river(west, HexDirection::E);
        grid.set_outgoing_river(east, HexDirection::W);
        assert_eq!(grid.cell(target).incoming_river(), Some(HexDirection::E));
        assert!(!grid.cell(west).has_outgoing_river());
    }

    #[test]
    fn removing_outgoing_river_clears_neighbor_and_dirties_both_chunks() {
        let (mut grid, _) = grid();
        let a = id(&grid, 4, 1);
        let b = id(&grid, 5, 1);
        grid.set_outgoing_river(a, HexDirection::E);
        grid.refresh_dirty_chunks(&flat_noise());
        assert!(!grid.chunk(ChunkId(0)).is_dirty());

        let dirty = grid.remove_outgoing_river(a);
        assert!(!grid.cell(a).has_river());
        assert!(!grid.cell(b).has_incoming_river());
        assert!(dirty.contains(ChunkId(0)) && dirty.contains(ChunkId(1)));
        assert!(grid.chunk(ChunkId(0)).is_dirty());
        assert!(grid.chunk(ChunkId(1)).is_dirty());
    }

    #[test]
    fn raising_the_destination_removes_the_river() {
        let (mut grid, noise) = grid();
        let a = id(&grid, 1, 1);
        let b = id(&grid, 2, 1);
        grid.set_outgoing_river(a, HexDirection::E);
        grid.set_elevation(b, 1, &noise);
        assert!(!grid.cell(a).has_river());
        assert!(!grid.cell(b).has_river());
    }

    #[test]
    fn lowering_the_lake_removes_the_uphill_river() {
        let (mut grid, noise) = grid();
        let a = id(&grid, 1, 1);
        let b = id(&grid, 2, 1);
        grid.set_elevation(b, 1, &noise);
        grid.set_water_level(a, 1);
        grid.set_outgoing_river(a, HexDirection::E);
        assert!(grid.cell(a).has_outgoing_river());
        grid.set_water_level(a, 0);
        assert!(!grid.cell(a).has_outgoing_river());
        assert!(!grid.cell(b).has_incoming_river());
    }

    #[test]
    fn at_most_one_river_each_way_after_many_edits() {
        let (mut grid, _) = grid();
        let center = id(&grid, 2, 2);
        for d in HexDirection::ALL {
            grid.set_outgoing_river(center, d);
            let n = grid.cell(center).neighbor(d.next()).unwrap();
            grid.set_outgoing_river(n, d.next().opposite());
        }
        for (cell_id, cell) in grid.cells().iter() {
            if let (Some(i), Some(o)) = (cell.incoming_river(), cell.outgoing_river()) {
                assert_ne!(i, o, "{cell_id:?} flows in and out through one edge");
            }
            if let Some(o) = cell.outgoing_river() {
                let n = grid.cells().neighbor(cell_id, o).unwrap();
                assert_eq!(n.incoming_river(), Some(o.opposite()));
            }
        }
    }

    // ── roads ──────────────────────────────────────────────────────

    #[test]
    fn roads_are_symmetric() {
        let (mut grid, _) = grid();
        let a = id(&grid, 2, 2);
        grid.add_road(a, HexDirection::NE);
        grid.add_road(a, HexDirection::W);
        grid.add_road(id(&grid, 0, 0), HexDirection::SW);
        assert!(grid.cell(a).has_road_through_edge(HexDirection::NE));
        assert_roads_symmetric(grid.cells());
    }

    #[test]
    fn road_is_rejected_across_cliffs_and_rivers() {
        let (mut grid, noise) = grid();
        let a = id(&grid, 2, 2);
        let east = grid.cell(a).neighbor(HexDirection::E).unwrap();
        grid.set_elevation(east, 2, &noise);
        assert!(grid.add_road(a, HexDirection::E).is_empty());

        grid.set_outgoing_river(a, HexDirection::W);
        assert!(grid.add_road(a, HexDirection::W).is_empty());
        assert!(!grid.cell(a).has_roads());
    }

    #[test]
    fn steep_elevation_change_strips_roads() {
        let (mut grid, noise) = grid();
        let a = id(&grid, 2, 2);
        grid.add_road(a, HexDirection::E);
        grid.add_road(a, HexDirection::W);
        grid.set_elevation(a, 1, &noise);
        assert!(grid.cell(a).has_road_through_edge(HexDirection::E));
        grid.set_elevation(a, 2, &noise);
        assert!(!grid.cell(a).has_roads());
        assert_roads_symmetric(grid.cells());
    }

    #[test]
    fn river_replaces_road_on_its_edge() {
        let (mut grid, _) = grid();
        let a = id(&grid, 2, 2);
        grid.add_road(a, HexDirection::SE);
        grid.set_outgoing_river(a, HexDirection::SE);
        assert!(!grid.cell(a).has_road_through_edge(HexDirection::SE));
        assert_roads_symmetric(grid.cells());
    }

    #[test]
    fn remove_roads_clears_every_edge() {
        let (mut grid, _) = grid();
        let a = id(&grid, 2, 2);
        for d in HexDirection::ALL {
            grid.add_road(a, d);
        }
        grid.remove_roads(a);
        assert!(!grid.cell(a).has_roads());
        assert_roads_symmetric(grid.cells());
    }

    // ── local edits ────────────────────────────────────────────────

    #[test]
    fn decorations_dirty_only_own_chunk() {
        let (mut grid, _) = grid();
        let edge = id(&grid, 4, 2);
        for dirty in [
            grid.set_urban_level(edge, 2),
            grid.set_farm_level(edge, 1),
            grid.set_plant_level(edge, 3),
            grid.set_walled(edge, true),
        ] {
            assert_eq!(dirty.iter().collect::<Vec<_>>(), vec![ChunkId(0)]);
        }
        assert!(grid.set_urban_level(edge, 2).is_empty());
        assert_eq!(grid.cell(edge).plant_level(), 3);
        assert!(grid.cell(edge).walled());
    }

    #[test]
    fn feature_levels_are_stored_unclamped() {
        let (mut grid, _) = grid();
        let a = id(&grid, 1, 1);
        grid.set_urban_level(a, -3);
        grid.set_farm_level(a, 1_000);
        grid.set_plant_level(a, i32::MAX);
        let cell = grid.cell(a);
        assert_eq!(
            (cell.urban_level(), cell.farm_level(), cell.plant_level()),
            (-3, 1_000, i32::MAX)
        );
    }

    #[test]
    fn color_change_dirties_neighbor_chunks() {
        let (mut grid, _) = grid();
        let edge = id(&grid, 5, 2);
        let dirty = grid.set_color(edge, LinearRgba::rgb(0.2, 0.4, 0.1));
        assert!(dirty.contains(ChunkId(0)) && dirty.contains(ChunkId(1)));
        assert!(grid.set_color(edge, LinearRgba::rgb(0.2, 0.4, 0.1)).is_empty());
    }
}
