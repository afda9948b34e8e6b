use bevy::prelude::*;
use hex_map::terrain::CellId;

/// Three-way brush setting: leave alone, add, or remove.
#[derive(Reflect, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OptionalToggle {
    #[default]
    Ignore,
    Yes,
    No,
}

/// What pressing on a cell does. `None` fields leave that property as is.
#[derive(Resource, Reflect, Clone, Debug, Default)]
pub struct Brush {
    /// Palette index to paint.
    pub color: Option<usize>,
    pub elevation: Option<i32>,
    pub water_level: Option<i32>,
    pub urban_level: Option<i32>,
    pub farm_level: Option<i32>,
    pub plant_level: Option<i32>,
    /// `Yes` lays a river along drags, `No` erases rivers.
    pub river: OptionalToggle,
    /// `Yes` lays a road along drags, `No` erases roads.
    pub road: OptionalToggle,
    pub walled: OptionalToggle,
    /// Radius in cells around the picked cell.
    pub size: u32,
    /// Draw cube coordinates over every nearby cell.
    pub show_labels: bool,
    /// Trace terrain triangles with black lines.
    pub show_wireframe: bool,
}

/// Cell under the pointer at the last brush application, while the primary
/// button is held.
#[derive(Resource, Default)]
pub struct DragState {
    pub previous: Option<CellId>,
}
