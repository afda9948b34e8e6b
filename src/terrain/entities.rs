use bevy::prelude::*;

use super::chunk::ChunkId;
use super::grid::HexGrid;
use super::mesh_buffer::MeshLayer;
use super::noise_field::NoiseField;

/// The editable map. Systems that edit cells take `ResMut<HexMap>`; the
/// refresh system rebuilds whatever those edits dirtied.
#[derive(Resource)]
pub struct HexMap {
    /// Cells, chunks and their buffers.
    pub grid: HexGrid,
}

/// Perturbation noise shared by edits and triangulation.
#[derive(Resource)]
pub struct HexNoise(pub NoiseField);

/// One mesh layer of one chunk. The entity's `Mesh3d` is overwritten each
/// time the chunk is refreshed.
#[derive(Component, Reflect, Clone, Copy, Debug)]
pub struct ChunkLayer {
    /// Chunk whose buffers feed this mesh.
    pub chunk: ChunkId,
    /// Which of the chunk's buffers.
    pub layer: MeshLayer,
}

/// Line overlay tracing a chunk's terrain triangles. Spawned hidden; the
/// viewer decides when to show it.
#[derive(Component, Reflect, Clone, Copy, Debug)]
pub struct ChunkWireframe {
    /// Chunk whose terrain buffer the lines follow.
    pub chunk: ChunkId,
}

/// Shared material handles, one per layer.
#[derive(Resource)]
pub struct HexMaterials {
    /// Vertex-colored ground.
    pub terrain: Handle<StandardMaterial>,
    /// Translucent water surface.
    pub rivers: Handle<StandardMaterial>,
    /// Road surface, blended at the edges.
    pub roads: Handle<StandardMaterial>,
    /// Unlit black lines.
    pub wireframe: Handle<StandardMaterial>,
}

impl HexMaterials {
    /// Material for a layer.
    pub fn get(&self, layer: MeshLayer) -> Handle<StandardMaterial> {
        match layer {
            MeshLayer::Terrain => self.terrain.clone(),
            MeshLayer::Rivers => self.rivers.clone(),
            MeshLayer::Roads => self.roads.clone(),
        }
    }
}
