//! Cell editor.
//!
//! An egui side panel configures a [`Brush`]; pressing or dragging over the
//! map applies it to the picked cells. Dragging from one cell into its
//! neighbor lays rivers and roads along the drag direction.

mod entities;
mod systems;

pub use entities::Brush;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::GameState;

/// Per-plugin configuration for the editor.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct EditorConfig {
    /// Largest brush radius offered by the panel.
    pub max_brush_size: u32,
    /// Highest elevation offered by the panel.
    pub max_elevation: i32,
    /// Highest urban/farm/plant level offered by the panel.
    pub max_feature_level: i32,
    /// Cells further than this from the camera get no coordinate label.
    pub label_distance: f32,
    /// Coordinate label font size.
    pub label_font_size: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_brush_size: 4,
            max_elevation: 6,
            max_feature_level: 3,
            label_distance: 120.0,
            label_font_size: 10.0,
        }
    }
}

/// Brush panel, picking observers and the coordinate overlay.
pub struct EditorPlugin(pub EditorConfig);

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Brush>()
            .register_type::<EditorConfig>()
            .insert_resource(self.0.clone())
            .init_resource::<Brush>()
            .init_resource::<entities::DragState>()
            .add_observer(systems::on_press)
            .add_observer(systems::on_move)
            .add_observer(systems::on_release)
            .add_systems(
                EguiPrimaryContextPass,
                systems::brush_panel.run_if(in_state(GameState::Editing)),
            )
            .add_systems(
                Update,
                (
                    systems::draw_cell_labels.run_if(|brush: Res<Brush>| brush.show_labels),
                    systems::show_wireframes.run_if(resource_changed::<Brush>),
                ),
            );
    }
}
