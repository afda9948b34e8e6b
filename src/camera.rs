//! Top-down map camera.
//!
//! WASD/arrows pan across the map, the scroll wheel zooms between a close
//! tilted view and a high overview. Spawns the Camera3d and the sun light.

mod entities;
mod systems;

pub use entities::MapCamera;

use bevy::prelude::*;

use crate::GameState;

/// Per-plugin configuration for the map camera.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct CameraConfig {
    /// Pan speed in world-units per second when fully zoomed in.
    pub move_speed_near: f32,
    /// Pan speed when fully zoomed out.
    pub move_speed_far: f32,
    /// Zoom change per scroll line, as a fraction of the full range.
    pub scroll_sensitivity: f32,
    /// Decay constant for easing the rig toward its zoom target.
    pub zoom_smoothing: f32,
    /// Camera distance from the focus at zoom 1.
    pub distance_near: f32,
    /// Camera distance from the focus at zoom 0.
    pub distance_far: f32,
    /// Pitch below horizontal at zoom 1 (degrees).
    pub pitch_near: f32,
    /// Pitch below horizontal at zoom 0 (degrees).
    pub pitch_far: f32,
    /// Initial zoom in `[0, 1]`.
    pub start_zoom: f32,
    /// Directional light illuminance (lux).
    pub sun_illuminance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            move_speed_near: 60.0,
            move_speed_far: 360.0,
            scroll_sensitivity: 0.08,
            zoom_smoothing: 10.0,
            distance_near: 45.0,
            distance_far: 420.0,
            pitch_near: 45.0,
            pitch_far: 85.0,
            start_zoom: 0.3,
            sun_illuminance: 9_000.0,
        }
    }
}

/// Pan/zoom camera over the hex map.
pub struct CameraPlugin(pub CameraConfig);

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<MapCamera>()
            .register_type::<CameraConfig>()
            .insert_resource(self.0.clone())
            .add_systems(Startup, (systems::spawn_camera, systems::spawn_sun))
            .add_systems(
                Update,
                (systems::pan, systems::zoom)
                    .chain()
                    .run_if(in_state(GameState::Editing)),
            )
            .add_systems(Update, systems::apply_rig.after(systems::zoom));
    }
}
