#![warn(missing_docs)]
//! Hex map viewer and editor.
//!
//! Generates a chunked hex map with noise-derived elevation, renders it with
//! perturbed terraced geometry, and lets the user paint elevation, color,
//! rivers and roads with an egui brush.

mod camera;
mod editor;

use bevy::app::AppExit;
use bevy::picking::mesh_picking::MeshPickingPlugin;
use bevy::prelude::*;
#[cfg(feature = "native")]
use bevy::remote::{RemotePlugin, http::RemoteHttpPlugin};
use bevy_inspector_egui::quick::WorldInspectorPlugin;
use hex_map::terrain::{HexMapConfig, HexMapPlugin};

/// Application-wide state, used for system scheduling.
#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash, Reflect)]
pub enum GameState {
    /// Camera and brush active.
    #[default]
    Editing,
    /// World inspector open (Tab to toggle).
    Inspecting,
}

/// Command-line overrides for map generation.
#[cfg(feature = "native")]
#[derive(clap::Parser, Debug)]
#[command(name = "hex-map")]
#[command(about = "Hex map terrain viewer and editor")]
struct Args {
    /// Chunks along X (5 cells each)
    #[arg(short = 'x', long)]
    chunks_x: Option<usize>,

    /// Chunks along Z (5 cells each)
    #[arg(short = 'z', long)]
    chunks_z: Option<usize>,

    /// Seed for the elevation noise
    #[arg(short, long)]
    seed: Option<u32>,

    /// Seed for the perturbation noise field
    #[arg(long)]
    noise_seed: Option<u32>,
}

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Hex Map".into(),
            ..default()
        }),
        ..default()
    }))
    .register_type::<GameState>()
    .init_state::<GameState>()
    .add_plugins(bevy_egui::EguiPlugin::default())
    .add_plugins(MeshPickingPlugin)
    .add_plugins(HexMapPlugin(map_config()))
    .add_plugins(camera::CameraPlugin(camera::CameraConfig::default()))
    .add_plugins(editor::EditorPlugin(editor::EditorConfig::default()))
    .add_systems(Update, exit_on_esc)
    .add_systems(Update, toggle_inspector)
    .add_plugins(WorldInspectorPlugin::new().run_if(in_state(GameState::Inspecting)));

    #[cfg(feature = "native")]
    app.add_plugins(RemotePlugin::default())
        .add_plugins(RemoteHttpPlugin::default());

    app.run();
}

#[cfg(feature = "native")]
fn map_config() -> HexMapConfig {
    use clap::Parser;

    let args = Args::parse();
    let mut cfg = HexMapConfig::default();
    if let Some(x) = args.chunks_x {
        cfg.grid.chunk_count_x = x;
    }
    if let Some(z) = args.chunks_z {
        cfg.grid.chunk_count_z = z;
    }
    if let Some(seed) = args.seed {
        cfg.grid.elevation_seed = seed;
    }
    if let Some(seed) = args.noise_seed {
        cfg.noise.seed = seed;
    }
    cfg
}

#[cfg(not(feature = "native"))]
fn map_config() -> HexMapConfig {
    HexMapConfig::default()
}

fn toggle_inspector(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next: ResMut<NextState<GameState>>,
) {
    if keys.just_pressed(KeyCode::Tab) {
        next.set(match state.get() {
            GameState::Editing => GameState::Inspecting,
            GameState::Inspecting => GameState::Editing,
        });
    }
}

fn exit_on_esc(keys: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
