use std::ops::RangeInclusive;

use bevy::picking::pointer::PointerButton;
use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};
use hex_map::terrain::coordinates;
use hex_map::terrain::{
    CellId, ChunkWireframe, HexDirection, HexGrid, HexMap, HexMapConfig, HexNoise, NoiseField,
};

use super::EditorConfig;
use super::entities::{Brush, DragState, OptionalToggle};
use crate::GameState;
use crate::camera::MapCamera;

// ── Picking observers ───────────────────────────────────────────────

/// Primary press on a chunk mesh starts a stroke and paints the hit cell.
#[allow(clippy::too_many_arguments)]
pub fn on_press(
    mut press: On<Pointer<Press>>,
    state: Res<State<GameState>>,
    brush: Res<Brush>,
    cfg: Res<HexMapConfig>,
    noise: Res<HexNoise>,
    map: Option<ResMut<HexMap>>,
    mut drag: ResMut<DragState>,
    mut contexts: EguiContexts,
) {
    press.propagate(false);
    if press.button != PointerButton::Primary || *state.get() != GameState::Editing {
        return;
    }
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.is_pointer_over_area()
    {
        return;
    }
    let (Some(mut map), Some(position)) = (map, press.hit.position) else {
        return;
    };
    drag.previous = None;
    paint_at(&mut map.grid, &noise.0, &cfg.grid.palette, &brush, &mut drag, position);
}

/// Pointer movement with the button held continues the stroke. Crossing
/// into a neighboring cell counts as a drag in that direction.
pub fn on_move(
    mut movement: On<Pointer<Move>>,
    mouse: Res<ButtonInput<MouseButton>>,
    brush: Res<Brush>,
    cfg: Res<HexMapConfig>,
    noise: Res<HexNoise>,
    map: Option<ResMut<HexMap>>,
    mut drag: ResMut<DragState>,
) {
    movement.propagate(false);
    if drag.previous.is_none() || !mouse.pressed(MouseButton::Left) {
        drag.previous = None;
        return;
    }
    let (Some(mut map), Some(position)) = (map, movement.hit.position) else {
        return;
    };
    paint_at(&mut map.grid, &noise.0, &cfg.grid.palette, &brush, &mut drag, position);
}

pub fn on_release(mut release: On<Pointer<Release>>, mut drag: ResMut<DragState>) {
    release.propagate(false);
    if release.button == PointerButton::Primary {
        drag.previous = None;
    }
}

// ── Brush application ───────────────────────────────────────────────

fn paint_at(
    grid: &mut HexGrid,
    noise: &NoiseField,
    palette: &[Color],
    brush: &Brush,
    drag: &mut DragState,
    position: Vec3,
) {
    let Some(current) = grid.cell_at(position) else {
        drag.previous = None;
        return;
    };
    let direction = match drag.previous {
        Some(previous) if previous == current => return,
        Some(previous) => grid.neighbor_direction(previous, current),
        None => None,
    };
    apply_brush(grid, noise, palette, brush, current, direction);
    drag.previous = Some(current);
}

/// Applies `brush` to every cell within `brush.size` of `center`.
///
/// `drag` is the direction the pointer moved to reach `center`; each edited
/// cell then gets a river or road from its neighbor behind the drag.
pub fn apply_brush(
    grid: &mut HexGrid,
    noise: &NoiseField,
    palette: &[Color],
    brush: &Brush,
    center: CellId,
    drag: Option<HexDirection>,
) {
    let center_hex = grid.cell(center).coordinates();
    for hex in center_hex.range(brush.size) {
        if let Some(id) = grid.cell_at_coordinates(hex) {
            edit_cell(grid, noise, palette, brush, id, drag);
        }
    }
}

fn edit_cell(
    grid: &mut HexGrid,
    noise: &NoiseField,
    palette: &[Color],
    brush: &Brush,
    id: CellId,
    drag: Option<HexDirection>,
) {
    if let Some(color) = brush.color.and_then(|i| palette.get(i)) {
        grid.set_color(id, color.to_linear());
    }
    if let Some(elevation) = brush.elevation {
        grid.set_elevation(id, elevation, noise);
    }
    if let Some(level) = brush.water_level {
        grid.set_water_level(id, level);
    }
    if let Some(level) = brush.urban_level {
        grid.set_urban_level(id, level);
    }
    if let Some(level) = brush.farm_level {
        grid.set_farm_level(id, level);
    }
    if let Some(level) = brush.plant_level {
        grid.set_plant_level(id, level);
    }
    if brush.river == OptionalToggle::No {
        grid.remove_river(id);
    }
    if brush.road == OptionalToggle::No {
        grid.remove_roads(id);
    }
    match brush.walled {
        OptionalToggle::Yes => {
            grid.set_walled(id, true);
        }
        OptionalToggle::No => {
            grid.set_walled(id, false);
        }
        OptionalToggle::Ignore => {}
    }

    let Some(direction) = drag else {
        return;
    };
    let Some(behind) = grid.cell(id).neighbor(direction.opposite()) else {
        return;
    };
    if brush.river == OptionalToggle::Yes {
        grid.set_outgoing_river(behind, direction);
    }
    if brush.road == OptionalToggle::Yes {
        grid.add_road(behind, direction);
    }
}

// ── Panel ───────────────────────────────────────────────────────────

/// Left side panel that edits the [`Brush`] resource.
pub fn brush_panel(
    mut contexts: EguiContexts,
    mut brush: ResMut<Brush>,
    map_cfg: Res<HexMapConfig>,
    cfg: Res<EditorConfig>,
) -> Result {
    let ctx = contexts.ctx_mut()?;
    let brush = &mut *brush;

    egui::SidePanel::left("brush_panel")
        .resizable(false)
        .show(ctx, |ui| {
            ui.heading("Brush");

            ui.label("Color");
            ui.horizontal_wrapped(|ui| {
                ui.selectable_value(&mut brush.color, None, "off");
                for (i, color) in map_cfg.grid.palette.iter().enumerate() {
                    let [r, g, b, _] = color.to_srgba().to_u8_array();
                    let swatch = egui::RichText::new("■")
                        .size(18.0)
                        .color(egui::Color32::from_rgb(r, g, b));
                    ui.selectable_value(&mut brush.color, Some(i), swatch);
                }
            });
            ui.separator();

            optional_slider(ui, "Elevation", &mut brush.elevation, 0..=cfg.max_elevation);
            optional_slider(ui, "Water", &mut brush.water_level, 0..=cfg.max_elevation);
            optional_slider(ui, "Urban", &mut brush.urban_level, 0..=cfg.max_feature_level);
            optional_slider(ui, "Farm", &mut brush.farm_level, 0..=cfg.max_feature_level);
            optional_slider(ui, "Plant", &mut brush.plant_level, 0..=cfg.max_feature_level);
            ui.separator();

            toggle_row(ui, "River", &mut brush.river);
            toggle_row(ui, "Road", &mut brush.road);
            toggle_row(ui, "Walled", &mut brush.walled);
            ui.separator();

            ui.add(egui::Slider::new(&mut brush.size, 0..=cfg.max_brush_size).text("Size"));
            ui.checkbox(&mut brush.show_labels, "Labels");
            ui.checkbox(&mut brush.show_wireframe, "Wireframe");
        });
    Ok(())
}

fn optional_slider<T: egui::emath::Numeric>(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut Option<T>,
    range: RangeInclusive<T>,
) {
    ui.horizontal(|ui| {
        let mut enabled = value.is_some();
        ui.checkbox(&mut enabled, label);
        match (enabled, value.as_mut()) {
            (true, Some(v)) => {
                ui.add(egui::Slider::new(v, range));
            }
            (true, None) => *value = Some(*range.start()),
            (false, _) => *value = None,
        }
    });
}

fn toggle_row(ui: &mut egui::Ui, label: &str, toggle: &mut OptionalToggle) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.selectable_value(toggle, OptionalToggle::Ignore, "ignore");
        ui.selectable_value(toggle, OptionalToggle::Yes, "yes");
        ui.selectable_value(toggle, OptionalToggle::No, "no");
    });
}

// ── Overlay ─────────────────────────────────────────────────────────

/// Shows or hides every chunk wireframe to match the brush panel.
pub fn show_wireframes(brush: Res<Brush>, mut wireframes: Query<&mut Visibility, With<ChunkWireframe>>) {
    let visibility = if brush.show_wireframe {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    for mut v in &mut wireframes {
        v.set_if_neq(visibility);
    }
}

/// Draws the cube coordinates of each nearby cell as a screen-projected
/// egui label.
pub fn draw_cell_labels(
    mut egui_ctx: Query<&mut bevy_egui::EguiContext>,
    camera_q: Query<(&Camera, &GlobalTransform), With<MapCamera>>,
    map: Option<Res<HexMap>>,
    cfg: Res<EditorConfig>,
    mut ready: Local<bool>,
) {
    // Egui fonts aren't available until after the first Context::run() in the render pass.
    if !*ready {
        *ready = true;
        return;
    }
    let Some(map) = map else { return };
    let Ok((camera, cam_gt)) = camera_q.single() else {
        return;
    };
    let Ok(mut ctx) = egui_ctx.single_mut() else {
        return;
    };
    let cam_pos = cam_gt.translation();

    let painter = ctx.get_mut().layer_painter(egui::LayerId::background());

    for (_, cell) in map.grid.cells().iter() {
        let world_pos = cell.position();
        if cam_pos.distance(world_pos) > cfg.label_distance {
            continue;
        }
        if let Ok(viewport) = camera.world_to_viewport(cam_gt, world_pos) {
            painter.text(
                egui::pos2(viewport.x, viewport.y),
                egui::Align2::CENTER_CENTER,
                coordinates::label(cell.coordinates()),
                egui::FontId::proportional(cfg.label_font_size),
                egui::Color32::WHITE,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> (HexGrid, NoiseField) {
        let noise = NoiseField::uniform(4, Vec3::splat(0.5)).unwrap();
        let mut grid = HexGrid::new(2, 1).unwrap();
        let ids: Vec<CellId> = grid.cells().iter().map(|(id, _)| id).collect();
        for id in ids {
            grid.set_elevation(id, 0, &noise);
        }
        (grid, noise)
    }

    fn id(grid: &HexGrid, x: i32, z: i32) -> CellId {
        grid.cell_at_offset(x, z).unwrap()
    }

    // ── apply_brush ─────────────────────────────────────────────────

    #[test]
    fn brush_radius_covers_neighbors() {
        let (mut grid, noise) = grid();
        let brush = Brush {
            elevation: Some(2),
            size: 1,
            ..default()
        };
        let center = id(&grid, 4, 2);
        apply_brush(&mut grid, &noise, &[], &brush, center, None);

        let raised = grid
            .cells()
            .iter()
            .filter(|(_, c)| c.elevation() == 2)
            .count();
        assert_eq!(raised, 7);
        for d in HexDirection::ALL {
            let n = grid.cell(center).neighbor(d).unwrap();
            assert_eq!(grid.cell(n).elevation(), 2);
        }
    }

    #[test]
    fn brush_paints_palette_color() {
        let (mut grid, noise) = grid();
        let palette = [Color::srgb(1.0, 0.0, 0.0)];
        let brush = Brush {
            color: Some(0),
            ..default()
        };
        let cell = id(&grid, 1, 1);
        apply_brush(&mut grid, &noise, &palette, &brush, cell, None);
        assert_eq!(grid.cell(cell).color(), palette[0].to_linear());
    }

    #[test]
    fn out_of_range_color_is_ignored() {
        let (mut grid, noise) = grid();
        let cell = id(&grid, 1, 1);
        let before = grid.cell(cell).color();
        let brush = Brush {
            color: Some(3),
            ..default()
        };
        apply_brush(&mut grid, &noise, &[], &brush, cell, None);
        assert_eq!(grid.cell(cell).color(), before);
    }

    #[test]
    fn drag_lays_river_from_cell_behind() {
        let (mut grid, noise) = grid();
        let brush = Brush {
            river: OptionalToggle::Yes,
            ..default()
        };
        let from = id(&grid, 3, 2);
        let to = id(&grid, 4, 2);
        apply_brush(&mut grid, &noise, &[], &brush, to, Some(HexDirection::E));
        assert_eq!(grid.cell(from).outgoing_river(), Some(HexDirection::E));
        assert_eq!(grid.cell(to).incoming_river(), Some(HexDirection::W));
    }

    #[test]
    fn road_no_erases_roads() {
        let (mut grid, noise) = grid();
        let cell = id(&grid, 4, 2);
        grid.add_road(cell, HexDirection::NE);
        let brush = Brush {
            road: OptionalToggle::No,
            ..default()
        };
        apply_brush(&mut grid, &noise, &[], &brush, cell, None);
        assert!(!grid.cell(cell).has_roads());
    }

    // ── paint_at ────────────────────────────────────────────────────

    #[test]
    fn stroke_across_neighbors_lays_road() {
        let (mut grid, noise) = grid();
        let brush = Brush {
            road: OptionalToggle::Yes,
            ..default()
        };
        let a = id(&grid, 3, 2);
        let b = id(&grid, 4, 2);
        let mut drag = DragState::default();

        let pa = grid.cell(a).position();
        paint_at(&mut grid, &noise, &[], &brush, &mut drag, pa);
        assert_eq!(drag.previous, Some(a));
        assert!(!grid.cell(a).has_roads());

        let pb = grid.cell(b).position();
        paint_at(&mut grid, &noise, &[], &brush, &mut drag, pb);
        assert_eq!(drag.previous, Some(b));
        assert!(grid.cell(a).has_road_through_edge(HexDirection::E));
        assert!(grid.cell(b).has_road_through_edge(HexDirection::W));
    }

    #[test]
    fn pointer_off_map_ends_stroke() {
        let (mut grid, noise) = grid();
        let mut drag = DragState {
            previous: Some(id(&grid, 0, 0)),
        };
        paint_at(
            &mut grid,
            &noise,
            &[],
            &Brush::default(),
            &mut drag,
            Vec3::new(-500.0, 0.0, 500.0),
        );
        assert_eq!(drag.previous, None);
    }

    // ── overlay ─────────────────────────────────────────────────────

    #[test]
    fn wireframe_toggle_follows_brush() {
        use bevy::ecs::system::RunSystemOnce;
        use hex_map::terrain::ChunkId;

        let mut world = World::new();
        let wireframe = world
            .spawn((ChunkWireframe { chunk: ChunkId(0) }, Visibility::Hidden))
            .id();
        let terrain = world.spawn(Visibility::Hidden).id();

        world.insert_resource(Brush {
            show_wireframe: true,
            ..default()
        });
        world.run_system_once(show_wireframes).unwrap();
        assert_eq!(world.get::<Visibility>(wireframe), Some(&Visibility::Inherited));
        assert_eq!(world.get::<Visibility>(terrain), Some(&Visibility::Hidden));

        world.resource_mut::<Brush>().show_wireframe = false;
        world.run_system_once(show_wireframes).unwrap();
        assert_eq!(world.get::<Visibility>(wireframe), Some(&Visibility::Hidden));
    }
}
