use std::f64::consts::TAU;

use bevy::log::info;
use bevy::picking::Pickable;
use bevy::prelude::*;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use super::cell::CellId;
use super::entities::{ChunkLayer, ChunkWireframe, HexMap, HexMaterials, HexNoise};
use super::error::HexMapError;
use super::grid::HexGrid;
use super::mesh_buffer::{MeshBuffer, MeshLayer};
use super::noise_field::NoiseField;
use super::{GridSettings, HexMapConfig, NoiseSettings};
use crate::math;

// ── Startup ─────────────────────────────────────────────────────────

/// Bakes the perturbation field and inserts it as [`HexNoise`].
pub fn install_noise(mut commands: Commands, cfg: Res<HexMapConfig>) -> Result {
    let field = bake_noise_field(&cfg.noise)?;
    info!("noise field baked: {0}x{0} texels", field.size());
    commands.insert_resource(HexNoise(field));
    Ok(())
}

/// Builds the grid and seeds elevation, water and color from noise.
pub fn generate_grid(mut commands: Commands, cfg: Res<HexMapConfig>, noise: Res<HexNoise>) -> Result {
    let g = &cfg.grid;
    let mut grid = HexGrid::new(g.chunk_count_x, g.chunk_count_z)?;
    seed_grid(&mut grid, g, &noise.0);
    commands.insert_resource(HexMap { grid });
    Ok(())
}

/// Spawns one mesh entity per chunk layer, plus a hidden wireframe per
/// chunk, under a `HexMap` root. Meshes start empty and are filled by the
/// refresh system.
pub fn spawn_chunk_meshes(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    map: Res<HexMap>,
) {
    let hex_materials = HexMaterials {
        terrain: materials.add(StandardMaterial {
            base_color: Color::WHITE,
            perceptual_roughness: 0.9,
            ..default()
        }),
        rivers: materials.add(StandardMaterial {
            base_color: Color::srgba(0.16, 0.42, 0.78, 0.75),
            alpha_mode: AlphaMode::Blend,
            perceptual_roughness: 0.2,
            ..default()
        }),
        roads: materials.add(StandardMaterial {
            base_color: Color::srgb(0.42, 0.31, 0.22),
            perceptual_roughness: 1.0,
            ..default()
        }),
        wireframe: materials.add(StandardMaterial {
            base_color: Color::BLACK,
            unlit: true,
            ..default()
        }),
    };

    let root = commands
        .spawn((
            Name::new("HexMap"),
            Transform::default(),
            Visibility::default(),
        ))
        .id();

    for (chunk, _) in map.grid.chunks() {
        for layer in MeshLayer::ALL {
            let entity = commands
                .spawn((
                    ChunkLayer { chunk, layer },
                    Name::new(format!("Chunk{}({layer:?})", chunk.0)),
                    Mesh3d(meshes.add(MeshBuffer::new(layer).to_mesh())),
                    MeshMaterial3d(hex_materials.get(layer)),
                    Transform::default(),
                ))
                .id();
            commands.entity(root).add_child(entity);
        }

        let wireframe = commands
            .spawn((
                ChunkWireframe { chunk },
                Name::new(format!("Chunk{}(Wireframe)", chunk.0)),
                Mesh3d(meshes.add(MeshBuffer::new(MeshLayer::Terrain).to_wireframe_mesh())),
                MeshMaterial3d(hex_materials.wireframe.clone()),
                Transform::default(),
                Visibility::Hidden,
                Pickable::IGNORE,
            ))
            .id();
        commands.entity(root).add_child(wireframe);
    }

    commands.insert_resource(hex_materials);
}

// ── Pure helpers ───────────────────────────────────────────────────

/// Three-channel fractal noise sampled on a 4-D torus, so the field tiles
/// seamlessly in both directions.
pub fn bake_noise_field(s: &NoiseSettings) -> Result<NoiseField, HexMapError> {
    let channels: [Fbm<Perlin>; 3] =
        std::array::from_fn(|i| Fbm::new(s.seed.wrapping_add(i as u32)).set_octaves(s.octaves));
    let radius = s.frequency / TAU;

    NoiseField::from_fn(s.size, |u, v| {
        let (su, cu) = (u * TAU).sin_cos();
        let (sv, cv) = (v * TAU).sin_cos();
        let point = [cu * radius, su * radius, cv * radius, sv * radius];
        let [r, g, b] = channels
            .each_ref()
            .map(|fbm| math::map_noise_to_range(fbm.get(point), 0.0, 1.0).clamp(0.0, 1.0));
        Vec3::new(r, g, b)
    })
}

/// Assigns every cell a noise-derived elevation, the configured water level
/// and the palette color of its elevation band.
pub fn seed_grid(grid: &mut HexGrid, g: &GridSettings, noise: &NoiseField) {
    let fbm: Fbm<Perlin> = Fbm::new(g.elevation_seed).set_octaves(g.elevation_octaves);
    let ids: Vec<CellId> = grid.cells().iter().map(|(id, _)| id).collect();

    for id in ids {
        let p = grid.cell(id).position();
        let noise_val = fbm.get([p.x as f64 / g.elevation_scale, p.z as f64 / g.elevation_scale]);
        let elevation = math::map_noise_to_range(noise_val, g.min_elevation as f32, g.max_elevation as f32)
            .round() as i32;
        let elevation = elevation.clamp(g.min_elevation, g.max_elevation);

        grid.set_elevation(id, elevation, noise);
        grid.set_water_level(id, g.water_level);
        grid.set_color(id, band_color(&g.palette, elevation, g.min_elevation, g.max_elevation));
    }
}

fn band_color(palette: &[Color], elevation: i32, min: i32, max: i32) -> LinearRgba {
    let Some(last) = palette.len().checked_sub(1) else {
        return LinearRgba::WHITE;
    };
    let span = (max - min + 1).max(1) as usize;
    let offset = (elevation - min).max(0) as usize;
    palette[(offset * palette.len() / span).min(last)].to_linear()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::cell::UNSET_ELEVATION;

    fn small_settings() -> NoiseSettings {
        NoiseSettings {
            size: 16,
            ..HexMapConfig::default().noise
        }
    }

    #[test]
    fn baked_field_stays_in_unit_range() {
        let field = bake_noise_field(&small_settings()).unwrap();
        assert_eq!(field.size(), 16);
        for x in 0..40 {
            let s = field.sample(Vec3::new(x as f32 * 29.0, 0.0, -(x as f32) * 13.0));
            for c in [s.x, s.y, s.z] {
                assert!((0.0..=1.0).contains(&c));
            }
        }
    }

    #[test]
    fn baked_field_is_deterministic() {
        let a = bake_noise_field(&small_settings()).unwrap();
        let b = bake_noise_field(&small_settings()).unwrap();
        let p = Vec3::new(123.0, 0.0, -45.0);
        assert_eq!(a.sample(p), b.sample(p));
    }

    #[test]
    fn zero_sized_field_is_rejected() {
        let s = NoiseSettings {
            size: 0,
            ..small_settings()
        };
        assert!(bake_noise_field(&s).is_err());
    }

    #[test]
    fn seeding_assigns_every_cell_within_range() {
        let g = GridSettings {
            chunk_count_x: 2,
            chunk_count_z: 1,
            ..HexMapConfig::default().grid
        };
        let noise = NoiseField::uniform(4, Vec3::splat(0.5)).unwrap();
        let mut grid = HexGrid::new(g.chunk_count_x, g.chunk_count_z).unwrap();
        seed_grid(&mut grid, &g, &noise);
        for (_, cell) in grid.cells().iter() {
            assert_ne!(cell.elevation(), UNSET_ELEVATION);
            assert!((g.min_elevation..=g.max_elevation).contains(&cell.elevation()));
            assert_eq!(cell.water_level(), g.water_level);
        }
    }

    #[test]
    fn band_color_spans_the_palette() {
        let palette = [Color::BLACK, Color::WHITE];
        assert_eq!(band_color(&palette, 0, 0, 3), Color::BLACK.to_linear());
        assert_eq!(band_color(&palette, 3, 0, 3), Color::WHITE.to_linear());
        assert_eq!(band_color(&palette, 9, 0, 3), Color::WHITE.to_linear());
        assert_eq!(band_color(&[], 2, 0, 3), LinearRgba::WHITE);
    }
}
