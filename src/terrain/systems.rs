use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use super::chunk::{ChunkId, ChunkMeshes};
use super::entities::{ChunkLayer, ChunkWireframe, HexMap, HexNoise};

// ── Update: mesh refresh ───────────────────────────────────────────

/// Re-triangulates dirty chunks and swaps the new geometry into their mesh
/// assets, wireframes included. This is the single point where edits become
/// visible.
pub fn refresh_chunk_meshes(
    mut map: ResMut<HexMap>,
    noise: Res<HexNoise>,
    mut meshes: ResMut<Assets<Mesh>>,
    layers: Query<(&ChunkLayer, &Mesh3d)>,
    wireframes: Query<(&ChunkWireframe, &Mesh3d)>,
) {
    let refreshed: HashMap<ChunkId, &ChunkMeshes> =
        map.grid.refresh_dirty_chunks(&noise.0).into_iter().collect();
    if refreshed.is_empty() {
        return;
    }

    for (chunk_layer, mesh3d) in &layers {
        let Some(buffers) = refreshed.get(&chunk_layer.chunk) else {
            continue;
        };
        if let Some(mesh) = meshes.get_mut(&mesh3d.0) {
            *mesh = buffers.layer(chunk_layer.layer).to_mesh();
        }
    }

    for (wireframe, mesh3d) in &wireframes {
        let Some(buffers) = refreshed.get(&wireframe.chunk) else {
            continue;
        };
        if let Some(mesh) = meshes.get_mut(&mesh3d.0) {
            *mesh = buffers.terrain.to_wireframe_mesh();
        }
    }
}
