//! Hex map terrain: cell model, chunked triangulation and the Bevy plugin
//! that keeps chunk meshes in sync with cell edits.
//!
//! The submodules below `entities`/`*_systems` are plain Rust and usable
//! without an `App`; the plugin wraps them in resources and systems.

pub mod cell;
pub mod cells;
pub mod chunk;
pub mod coordinates;
pub mod direction;
pub mod edge_vertices;
pub mod error;
pub mod grid;
pub mod mesh_buffer;
pub mod metrics;
pub mod noise_field;
mod triangulator;

mod entities;
mod startup_systems;
mod systems;

pub use cell::{CellId, HexCell};
pub use chunk::ChunkId;
pub use direction::HexDirection;
pub use entities::{ChunkLayer, ChunkWireframe, HexMap, HexMaterials, HexNoise};
pub use error::HexMapError;
pub use grid::HexGrid;
pub use mesh_buffer::MeshLayer;
pub use noise_field::NoiseField;

use bevy::prelude::*;

/// Nested configuration for map generation.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct HexMapConfig {
    /// Grid size and the initial elevation pass.
    pub grid: GridSettings,
    /// The perturbation noise field.
    pub noise: NoiseSettings,
    /// Background clear color.
    pub clear_color: Color,
}

/// Grid dimensions and terrain seeding parameters.
#[derive(Clone, Debug, Reflect)]
pub struct GridSettings {
    /// Chunks along X (each chunk is 5x5 cells).
    pub chunk_count_x: usize,
    /// Chunks along Z.
    pub chunk_count_z: usize,
    /// Seed for the elevation noise generator.
    pub elevation_seed: u32,
    /// Number of octaves for elevation noise.
    pub elevation_octaves: usize,
    /// Spatial scale divisor for elevation sampling.
    pub elevation_scale: f64,
    /// Lowest generated elevation level.
    pub min_elevation: i32,
    /// Highest generated elevation level.
    pub max_elevation: i32,
    /// Water level given to every cell.
    pub water_level: i32,
    /// Cell colors by elevation band, lowest first.
    pub palette: Vec<Color>,
}

/// Parameters for baking the tileable [`NoiseField`].
#[derive(Clone, Debug, Reflect)]
pub struct NoiseSettings {
    /// Texels per side.
    pub size: usize,
    /// Seed of the first channel; the others use the following seeds.
    pub seed: u32,
    /// Octaves of each channel.
    pub octaves: usize,
    /// Features per tile.
    pub frequency: f64,
}

impl Default for HexMapConfig {
    fn default() -> Self {
        Self {
            grid: GridSettings {
                chunk_count_x: 4,
                chunk_count_z: 3,
                elevation_seed: 42,
                elevation_octaves: 4,
                elevation_scale: 120.0,
                min_elevation: 0,
                max_elevation: 6,
                water_level: 0,
                palette: vec![
                    Color::srgb(0.84, 0.77, 0.52),
                    Color::srgb(0.38, 0.62, 0.25),
                    Color::srgb(0.29, 0.52, 0.22),
                    Color::srgb(0.47, 0.42, 0.33),
                    Color::srgb(0.93, 0.95, 0.97),
                ],
            },
            noise: NoiseSettings {
                size: 256,
                seed: 7,
                octaves: 3,
                frequency: 6.0,
            },
            clear_color: Color::srgb(0.52, 0.66, 0.78),
        }
    }
}

/// Hex map plugin: noise and grid at startup, mesh upload every frame
/// something changed.
pub struct HexMapPlugin(pub HexMapConfig);

impl Plugin for HexMapPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<HexMapConfig>()
            .register_type::<ChunkLayer>()
            .register_type::<ChunkWireframe>()
            .insert_resource(self.0.clone())
            .insert_resource(ClearColor(self.0.clear_color))
            .add_systems(
                Startup,
                (
                    startup_systems::install_noise,
                    startup_systems::generate_grid,
                    startup_systems::spawn_chunk_meshes,
                )
                    .chain(),
            )
            .add_systems(Update, systems::refresh_chunk_meshes);
    }
}
