use bevy::log::{debug, info};
use bevy::prelude::*;
use hexx::Hex;

use super::cell::{CellId, HexCell};
use super::cells::{DirtyChunks, HexCells};
use super::chunk::{ChunkId, ChunkMeshes, HexGridChunk};
use super::coordinates;
use super::direction::HexDirection;
use super::error::HexMapError;
use super::metrics::{CHUNK_SIZE_X, CHUNK_SIZE_Z};
use super::noise_field::NoiseField;

/// A rectangular map of cells grouped into chunks.
///
/// Every edit goes through here so the chunks it touches get flagged. Meshes
/// are rebuilt lazily by [`HexGrid::refresh_dirty_chunks`].
#[derive(Clone, Debug)]
pub struct HexGrid {
    chunk_count_x: usize,
    chunk_count_z: usize,
    cells: HexCells,
    chunks: Vec<HexGridChunk>,
}

impl HexGrid {
    /// Builds `chunk_count_x * chunk_count_z` chunks of cells with neighbor
    /// links and chunk membership. Elevations start unset.
    pub fn new(chunk_count_x: usize, chunk_count_z: usize) -> Result<Self, HexMapError> {
        if chunk_count_x == 0 || chunk_count_z == 0 {
            return Err(HexMapError::EmptyGrid {
                chunk_count_x,
                chunk_count_z,
            });
        }
        let cell_count_x = chunk_count_x * CHUNK_SIZE_X;
        let cell_count_z = chunk_count_z * CHUNK_SIZE_Z;

        let mut chunks = vec![HexGridChunk::default(); chunk_count_x * chunk_count_z];
        let mut cells = Vec::with_capacity(cell_count_x * cell_count_z);

        for z in 0..cell_count_z {
            for x in 0..cell_count_x {
                let hex = coordinates::from_offset(x as i32, z as i32);
                let mut cell = HexCell::new(hex, coordinates::to_position(hex));

                for d in HexDirection::ALL {
                    let (nx, nz) = coordinates::to_offset(hex + d.offset());
                    cell.neighbors[d.index()] = offset_index(nx, nz, cell_count_x, cell_count_z);
                }

                let (chunk_x, chunk_z) = (x / CHUNK_SIZE_X, z / CHUNK_SIZE_Z);
                let chunk = ChunkId(chunk_z * chunk_count_x + chunk_x);
                let slot = (x - chunk_x * CHUNK_SIZE_X) + (z - chunk_z * CHUNK_SIZE_Z) * CHUNK_SIZE_X;
                chunks[chunk.0].add_cell(slot, CellId(cells.len()));
                cell.chunk = Some(chunk);

                cells.push(cell);
            }
        }

        info!(
            "hex grid: {cell_count_x}x{cell_count_z} cells in {} chunks",
            chunks.len()
        );
        Ok(Self {
            chunk_count_x,
            chunk_count_z,
            cells: HexCells::new(cells),
            chunks,
        })
    }

    // ── Queries ────────────────────────────────────────────────────

    pub fn chunk_count_x(&self) -> usize {
        self.chunk_count_x
    }

    pub fn chunk_count_z(&self) -> usize {
        self.chunk_count_z
    }

    pub fn cell_count_x(&self) -> usize {
        self.chunk_count_x * CHUNK_SIZE_X
    }

    pub fn cell_count_z(&self) -> usize {
        self.chunk_count_z * CHUNK_SIZE_Z
    }

    pub fn cells(&self) -> &HexCells {
        &self.cells
    }

    pub fn cell(&self, id: CellId) -> &HexCell {
        &self.cells[id]
    }

    pub fn chunk(&self, id: ChunkId) -> &HexGridChunk {
        &self.chunks[id.0]
    }

    pub fn chunks(&self) -> impl Iterator<Item = (ChunkId, &HexGridChunk)> {
        self.chunks.iter().enumerate().map(|(i, c)| (ChunkId(i), c))
    }

    pub fn cell_at_offset(&self, x: i32, z: i32) -> Option<CellId> {
        offset_index(x, z, self.cell_count_x(), self.cell_count_z())
    }

    pub fn cell_at_coordinates(&self, hex: Hex) -> Option<CellId> {
        // no cell lies further than this on either axial axis; also keeps the
        // offset conversion clear of overflow for far-away hexes
        let reach = self.cell_count_x() + self.cell_count_z();
        if hex.x.unsigned_abs() as usize > reach || hex.y.unsigned_abs() as usize > reach {
            return None;
        }
        let (x, z) = coordinates::to_offset(hex);
        self.cell_at_offset(x, z)
    }

    /// Cell under a world-space point, if it lies on the map.
    pub fn cell_at(&self, position: Vec3) -> Option<CellId> {
        self.cell_at_coordinates(coordinates::from_position(position))
    }

    /// Direction from `from` to `to` when the two are neighbors.
    pub fn neighbor_direction(&self, from: CellId, to: CellId) -> Option<HexDirection> {
        self.cells.direction_to(from, to)
    }

    // ── Edits ──────────────────────────────────────────────────────

    pub fn set_elevation(&mut self, id: CellId, elevation: i32, noise: &NoiseField) -> DirtyChunks {
        let dirty = self.cells.set_elevation(id, elevation, noise);
        self.mark_dirty(dirty)
    }

    pub fn set_water_level(&mut self, id: CellId, water_level: i32) -> DirtyChunks {
        let dirty = self.cells.set_water_level(id, water_level);
        self.mark_dirty(dirty)
    }

    pub fn set_color(&mut self, id: CellId, color: LinearRgba) -> DirtyChunks {
        let dirty = self.cells.set_color(id, color);
        self.mark_dirty(dirty)
    }

    pub fn set_outgoing_river(&mut self, id: CellId, direction: HexDirection) -> DirtyChunks {
        let dirty = self.cells.set_outgoing_river(id, direction);
        self.mark_dirty(dirty)
    }

    pub fn remove_outgoing_river(&mut self, id: CellId) -> DirtyChunks {
        let dirty = self.cells.remove_outgoing_river(id);
        self.mark_dirty(dirty)
    }

    pub fn remove_incoming_river(&mut self, id: CellId) -> DirtyChunks {
        let dirty = self.cells.remove_incoming_river(id);
        self.mark_dirty(dirty)
    }

    pub fn remove_river(&mut self, id: CellId) -> DirtyChunks {
        let dirty = self.cells.remove_river(id);
        self.mark_dirty(dirty)
    }

    pub fn add_road(&mut self, id: CellId, direction: HexDirection) -> DirtyChunks {
        let dirty = self.cells.add_road(id, direction);
        self.mark_dirty(dirty)
    }

    pub fn remove_roads(&mut self, id: CellId) -> DirtyChunks {
        let dirty = self.cells.remove_roads(id);
        self.mark_dirty(dirty)
    }

    pub fn set_urban_level(&mut self, id: CellId, level: i32) -> DirtyChunks {
        let dirty = self.cells.set_urban_level(id, level);
        self.mark_dirty(dirty)
    }

    pub fn set_farm_level(&mut self, id: CellId, level: i32) -> DirtyChunks {
        let dirty = self.cells.set_farm_level(id, level);
        self.mark_dirty(dirty)
    }

    pub fn set_plant_level(&mut self, id: CellId, level: i32) -> DirtyChunks {
        let dirty = self.cells.set_plant_level(id, level);
        self.mark_dirty(dirty)
    }

    pub fn set_walled(&mut self, id: CellId, walled: bool) -> DirtyChunks {
        let dirty = self.cells.set_walled(id, walled);
        self.mark_dirty(dirty)
    }

    // ── Refresh ────────────────────────────────────────────────────

    /// Re-triangulates every dirty chunk and returns the rebuilt meshes.
    pub fn refresh_dirty_chunks(&mut self, noise: &NoiseField) -> Vec<(ChunkId, &ChunkMeshes)> {
        let cells = &self.cells;
        let mut refreshed = Vec::new();
        for (i, chunk) in self.chunks.iter_mut().enumerate() {
            if chunk.is_dirty() {
                chunk.refresh(cells, noise);
                refreshed.push(ChunkId(i));
            }
        }
        if !refreshed.is_empty() {
            debug!("refreshed {} of {} chunks", refreshed.len(), self.chunks.len());
        }
        refreshed
            .into_iter()
            .map(|id| (id, self.chunks[id.0].meshes()))
            .collect()
    }

    fn mark_dirty(&mut self, dirty: DirtyChunks) -> DirtyChunks {
        for id in dirty.iter() {
            self.chunks[id.0].mark_dirty();
        }
        dirty
    }
}

/// Arena index of offset `(x, z)` in a row-major grid, if inside it.
fn offset_index(x: i32, z: i32, count_x: usize, count_z: usize) -> Option<CellId> {
    let x = usize::try_from(x).ok().filter(|&x| x < count_x)?;
    let z = usize::try_from(z).ok().filter(|&z| z < count_z)?;
    Some(CellId(z * count_x + x))
}
