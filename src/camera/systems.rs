use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::math::FloatExt;
use bevy::prelude::*;
use hex_map::math;
use hex_map::terrain::HexMapConfig;
use hex_map::terrain::coordinates;
use hex_map::terrain::metrics::{CHUNK_SIZE_X, CHUNK_SIZE_Z};

use super::CameraConfig;
use super::entities::MapCamera;

/// Spawns the Camera3d looking at the middle of the configured map.
pub fn spawn_camera(mut commands: Commands, cfg: Res<CameraConfig>, map_cfg: Res<HexMapConfig>) {
    let cells_x = (map_cfg.grid.chunk_count_x * CHUNK_SIZE_X) as i32;
    let cells_z = (map_cfg.grid.chunk_count_z * CHUNK_SIZE_Z) as i32;
    let focus = coordinates::to_position(coordinates::from_offset(cells_x / 2, cells_z / 2));

    let rig = MapCamera {
        focus,
        zoom: cfg.start_zoom,
        smoothed_zoom: cfg.start_zoom,
    };
    commands.spawn((
        Name::new("MapCamera"),
        Camera3d::default(),
        rig_transform(&rig, &cfg),
        rig,
    ));
}

pub fn spawn_sun(mut commands: Commands, cfg: Res<CameraConfig>) {
    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: cfg.sun_illuminance,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(1.0, 3.0, 2.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// WASD/arrow movement of the focus point. Faster when zoomed out.
pub fn pan(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    cfg: Res<CameraConfig>,
    mut query: Query<&mut MapCamera>,
) {
    let Ok(mut rig) = query.single_mut() else {
        return;
    };

    let mut direction = Vec3::ZERO;
    if keys.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) {
        direction.z -= 1.0;
    }
    if keys.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) {
        direction.z += 1.0;
    }
    if keys.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        direction.x += 1.0;
    }
    if keys.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        direction.x -= 1.0;
    }
    if direction == Vec3::ZERO {
        return;
    }

    let speed = cfg.move_speed_far.lerp(cfg.move_speed_near, rig.smoothed_zoom);
    rig.focus += direction.normalize() * speed * time.delta_secs();
}

/// Scroll wheel adjusts the zoom target.
pub fn zoom(
    mut scroll: MessageReader<MouseWheel>,
    cfg: Res<CameraConfig>,
    mut query: Query<&mut MapCamera>,
) {
    let Ok(mut rig) = query.single_mut() else {
        return;
    };
    for ev in scroll.read() {
        let lines = match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y / 40.0,
        };
        rig.zoom = (rig.zoom + lines * cfg.scroll_sensitivity).clamp(0.0, 1.0);
    }
}

/// Eases the applied zoom and writes the rig into the camera transform.
pub fn apply_rig(
    time: Res<Time>,
    cfg: Res<CameraConfig>,
    mut query: Query<(&mut MapCamera, &mut Transform)>,
) {
    let Ok((mut rig, mut transform)) = query.single_mut() else {
        return;
    };
    rig.smoothed_zoom = math::damp(
        rig.smoothed_zoom,
        rig.zoom,
        cfg.zoom_smoothing,
        time.delta_secs(),
    );
    *transform = rig_transform(&rig, &cfg);
}

fn rig_transform(rig: &MapCamera, cfg: &CameraConfig) -> Transform {
    let t = rig.smoothed_zoom;
    let distance = cfg.distance_far.lerp(cfg.distance_near, t);
    let pitch = cfg.pitch_far.lerp(cfg.pitch_near, t).to_radians();
    // Camera sits south of the focus (+Z) and looks north.
    let offset = Vec3::new(0.0, pitch.sin(), pitch.cos()) * distance;
    Transform::from_translation(rig.focus + offset).looking_at(rig.focus, Vec3::Y)
}
