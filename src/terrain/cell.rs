use bevy::prelude::*;
use hexx::Hex;

use super::chunk::ChunkId;
use super::direction::HexDirection;
use super::metrics::{self, EdgeType};

/// Elevation of a cell that has not been assigned one yet.
pub const UNSET_ELEVATION: i32 = i32::MIN;

/// Index of a cell in its grid's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct CellId(pub usize);

/// One hexagonal cell: plain data, no behavior that needs its neighbors.
///
/// Fields are only written through [`super::cells::HexCells`], which keeps
/// the river and road invariants between neighbors.
#[derive(Clone, Debug)]
pub struct HexCell {
    pub(super) coordinates: Hex,
    pub(super) position: Vec3,
    pub(super) elevation: i32,
    pub(super) water_level: i32,
    pub(super) color: LinearRgba,
    pub(super) neighbors: [Option<CellId>; 6],
    pub(super) incoming_river: Option<HexDirection>,
    pub(super) outgoing_river: Option<HexDirection>,
    pub(super) roads: [bool; 6],
    pub(super) urban_level: i32,
    pub(super) farm_level: i32,
    pub(super) plant_level: i32,
    pub(super) walled: bool,
    pub(super) chunk: Option<ChunkId>,
}

impl HexCell {
    pub(super) fn new(coordinates: Hex, position: Vec3) -> Self {
        Self {
            coordinates,
            position,
            elevation: UNSET_ELEVATION,
            water_level: 0,
            color: LinearRgba::WHITE,
            neighbors: [None; 6],
            incoming_river: None,
            outgoing_river: None,
            roads: [false; 6],
            urban_level: 0,
            farm_level: 0,
            plant_level: 0,
            walled: false,
            chunk: None,
        }
    }

    pub fn coordinates(&self) -> Hex {
        self.coordinates
    }

    /// World-space center, including the perturbed elevation height.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn elevation(&self) -> i32 {
        self.elevation
    }

    pub fn water_level(&self) -> i32 {
        self.water_level
    }

    pub fn is_underwater(&self) -> bool {
        self.water_level > self.elevation
    }

    pub fn color(&self) -> LinearRgba {
        self.color
    }

    pub fn neighbor(&self, direction: HexDirection) -> Option<CellId> {
        self.neighbors[direction.index()]
    }

    pub fn chunk(&self) -> Option<ChunkId> {
        self.chunk
    }

    pub fn urban_level(&self) -> i32 {
        self.urban_level
    }

    pub fn farm_level(&self) -> i32 {
        self.farm_level
    }

    pub fn plant_level(&self) -> i32 {
        self.plant_level
    }

    pub fn walled(&self) -> bool {
        self.walled
    }

    /// Edge classification towards another cell.
    pub fn edge_type_with(&self, other: &HexCell) -> EdgeType {
        metrics::edge_type(self.elevation, other.elevation)
    }

    // ── Rivers ─────────────────────────────────────────────────────

    pub fn incoming_river(&self) -> Option<HexDirection> {
        self.incoming_river
    }

    pub fn outgoing_river(&self) -> Option<HexDirection> {
        self.outgoing_river
    }

    pub fn has_incoming_river(&self) -> bool {
        self.incoming_river.is_some()
    }

    pub fn has_outgoing_river(&self) -> bool {
        self.outgoing_river.is_some()
    }

    pub fn has_river(&self) -> bool {
        self.has_incoming_river() || self.has_outgoing_river()
    }

    /// A river starts or ends here: exactly one of incoming/outgoing is set.
    pub fn has_river_begin_or_end(&self) -> bool {
        self.has_incoming_river() != self.has_outgoing_river()
    }

    /// The single river edge of a source or sink cell.
    pub fn river_begin_or_end_direction(&self) -> Option<HexDirection> {
        if self.has_river_begin_or_end() {
            self.incoming_river.or(self.outgoing_river)
        } else {
            None
        }
    }

    pub fn has_river_through_edge(&self, direction: HexDirection) -> bool {
        self.incoming_river == Some(direction) || self.outgoing_river == Some(direction)
    }

    /// Height of the river channel floor.
    pub fn stream_bed_y(&self) -> f32 {
        (self.elevation as f32 + metrics::STREAM_BED_ELEVATION_OFFSET) * metrics::ELEVATION_STEP
    }

    /// Height of the river water surface.
    pub fn river_surface_y(&self) -> f32 {
        (self.elevation as f32 + metrics::RIVER_SURFACE_ELEVATION_OFFSET) * metrics::ELEVATION_STEP
    }

    // ── Roads ──────────────────────────────────────────────────────

    pub fn has_road_through_edge(&self, direction: HexDirection) -> bool {
        self.roads[direction.index()]
    }

    pub fn has_roads(&self) -> bool {
        self.roads.iter().any(|&road| road)
    }
}
