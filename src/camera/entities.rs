use bevy::prelude::*;

/// Camera rig state. The transform is derived from it every frame.
#[derive(Component, Reflect, Debug)]
pub struct MapCamera {
    /// Point on the ground plane the camera looks at.
    pub focus: Vec3,
    /// Target zoom in `[0, 1]`; 1 is closest.
    pub zoom: f32,
    /// Eased zoom actually applied to the transform.
    pub smoothed_zoom: f32,
}
