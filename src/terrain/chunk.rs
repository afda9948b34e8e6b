use bevy::log::debug;
use bevy::prelude::*;

use super::cell::CellId;
use super::cells::HexCells;
use super::mesh_buffer::{MeshBuffer, MeshLayer};
use super::metrics::CHUNK_CELL_COUNT;
use super::noise_field::NoiseField;
use super::triangulator::Triangulator;

/// Index of a chunk in its grid, row-major over the chunk layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct ChunkId(pub usize);

/// The three mesh layers of one chunk.
#[derive(Clone, Debug)]
pub struct ChunkMeshes {
    pub terrain: MeshBuffer,
    pub rivers: MeshBuffer,
    pub roads: MeshBuffer,
}

impl Default for ChunkMeshes {
    fn default() -> Self {
        Self {
            terrain: MeshBuffer::new(MeshLayer::Terrain),
            rivers: MeshBuffer::new(MeshLayer::Rivers),
            roads: MeshBuffer::new(MeshLayer::Roads),
        }
    }
}

impl ChunkMeshes {
    pub fn layer(&self, layer: MeshLayer) -> &MeshBuffer {
        match layer {
            MeshLayer::Terrain => &self.terrain,
            MeshLayer::Rivers => &self.rivers,
            MeshLayer::Roads => &self.roads,
        }
    }

    fn clear(&mut self) {
        self.terrain.clear();
        self.rivers.clear();
        self.roads.clear();
    }
}

/// A fixed block of cells triangulated together into one set of meshes.
#[derive(Clone, Debug)]
pub struct HexGridChunk {
    cells: [Option<CellId>; CHUNK_CELL_COUNT],
    meshes: ChunkMeshes,
    dirty: bool,
}

impl Default for HexGridChunk {
    fn default() -> Self {
        Self {
            cells: [None; CHUNK_CELL_COUNT],
            meshes: ChunkMeshes::default(),
            dirty: true,
        }
    }
}

impl HexGridChunk {
    pub(super) fn add_cell(&mut self, slot: usize, cell: CellId) {
        self.cells[slot] = Some(cell);
    }

    /// Member cells in slot order.
    pub fn cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells.iter().flatten().copied()
    }

    pub fn meshes(&self) -> &ChunkMeshes {
        &self.meshes
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(super) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Rebuilds all three layers from scratch and clears the dirty flag.
    ///
    /// # Panics
    /// If any slot was never populated; every chunk must be full before the
    /// first refresh.
    pub(super) fn refresh(&mut self, cells: &HexCells, noise: &NoiseField) {
        self.meshes.clear();
        let mut triangulator = Triangulator::new(cells, noise, &mut self.meshes);
        for (slot, cell) in self.cells.iter().enumerate() {
            let Some(cell) = cell else {
                panic!("chunk slot {slot} was never assigned a cell");
            };
            triangulator.triangulate(*cell);
        }
        self.dirty = false;
        debug!(
            "chunk refreshed: {} terrain, {} river, {} road triangles",
            self.meshes.terrain.triangle_count(),
            self.meshes.rivers.triangle_count(),
            self.meshes.roads.triangle_count()
        );
    }
}
