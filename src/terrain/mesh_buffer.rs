use bevy::asset::RenderAssetUsages;
use bevy::mesh::Indices;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;

use super::noise_field::NoiseField;
use crate::math;

/// Which surface a [`MeshBuffer`] holds. Terrain carries vertex colors,
/// rivers and roads carry UVs for their shaders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Reflect)]
pub enum MeshLayer {
    #[default]
    Terrain,
    Rivers,
    Roads,
}

impl MeshLayer {
    pub const ALL: [MeshLayer; 3] = [Self::Terrain, Self::Rivers, Self::Roads];

    pub fn uses_colors(self) -> bool {
        self == Self::Terrain
    }
}

/// Growable triangle list for one layer of one chunk.
///
/// Every `add_*` geometry call appends fresh vertices; nothing is shared
/// between calls. Geometry and attribute calls are paired: after
/// `add_triangle` comes one triangle color or UV call, after `add_quad` one
/// quad call.
#[derive(Clone, Debug, Default)]
pub struct MeshBuffer {
    layer: MeshLayer,
    positions: Vec<Vec3>,
    colors: Vec<LinearRgba>,
    uvs: Vec<Vec2>,
    indices: Vec<u32>,
}

impl MeshBuffer {
    pub fn new(layer: MeshLayer) -> Self {
        Self {
            layer,
            ..default()
        }
    }

    pub fn layer(&self) -> MeshLayer {
        self.layer
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[LinearRgba] {
        &self.colors
    }

    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Drops all geometry, keeping the allocations.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.colors.clear();
        self.uvs.clear();
        self.indices.clear();
    }

    // ── Triangles ──────────────────────────────────────────────────

    pub fn add_triangle(&mut self, noise: &NoiseField, v1: Vec3, v2: Vec3, v3: Vec3) {
        self.add_triangle_unperturbed(noise.perturb(v1), noise.perturb(v2), noise.perturb(v3));
    }

    /// Appends a triangle with positions taken as-is.
    pub fn add_triangle_unperturbed(&mut self, v1: Vec3, v2: Vec3, v3: Vec3) {
        let i = self.next_index();
        self.positions.extend([v1, v2, v3]);
        self.indices.extend([i, i + 2, i + 1]);
    }

    pub fn add_triangle_color(&mut self, c1: LinearRgba, c2: LinearRgba, c3: LinearRgba) {
        self.colors.extend([c1, c2, c3]);
    }

    pub fn add_triangle_color_uniform(&mut self, color: LinearRgba) {
        self.add_triangle_color(color, color, color);
    }

    pub fn add_triangle_uv(&mut self, uv1: Vec2, uv2: Vec2, uv3: Vec2) {
        self.uvs.extend([uv1, uv2, uv3]);
    }

    // ── Quads ──────────────────────────────────────────────────────

    /// Quad from a near edge `v1 -> v2` to a far edge `v3 -> v4`.
    pub fn add_quad(&mut self, noise: &NoiseField, v1: Vec3, v2: Vec3, v3: Vec3, v4: Vec3) {
        self.add_quad_unperturbed(
            noise.perturb(v1),
            noise.perturb(v2),
            noise.perturb(v3),
            noise.perturb(v4),
        );
    }

    pub fn add_quad_unperturbed(&mut self, v1: Vec3, v2: Vec3, v3: Vec3, v4: Vec3) {
        let i = self.next_index();
        self.positions.extend([v1, v2, v3, v4]);
        self.indices.extend([i, i + 1, i + 2, i + 1, i + 3, i + 2]);
    }

    pub fn add_quad_color(&mut self, c1: LinearRgba, c2: LinearRgba, c3: LinearRgba, c4: LinearRgba) {
        self.colors.extend([c1, c2, c3, c4]);
    }

    /// Near edge in `c1`, far edge in `c2`.
    pub fn add_quad_color2(&mut self, c1: LinearRgba, c2: LinearRgba) {
        self.add_quad_color(c1, c1, c2, c2);
    }

    pub fn add_quad_color_uniform(&mut self, color: LinearRgba) {
        self.add_quad_color(color, color, color, color);
    }

    pub fn add_quad_uv(&mut self, uv1: Vec2, uv2: Vec2, uv3: Vec2, uv4: Vec2) {
        self.uvs.extend([uv1, uv2, uv3, uv4]);
    }

    /// UVs spanning a rectangle: `u` across the quad, `v` along it.
    pub fn add_quad_uv_rect(&mut self, u_min: f32, u_max: f32, v_min: f32, v_max: f32) {
        self.add_quad_uv(
            Vec2::new(u_min, v_min),
            Vec2::new(u_max, v_min),
            Vec2::new(u_min, v_max),
            Vec2::new(u_max, v_max),
        );
    }

    // ── Finalization ───────────────────────────────────────────────

    /// Per-vertex normals averaged over the faces that reference each vertex.
    pub fn normals(&self) -> Vec<Vec3> {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let n = math::compute_normal(self.positions[a], self.positions[b], self.positions[c]);
            normals[a] += n;
            normals[b] += n;
            normals[c] += n;
        }
        normals
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
            .collect()
    }

    /// Packs the buffer into a renderable mesh. The mesh keeps a main-world
    /// copy so it stays pickable.
    pub fn to_mesh(&self) -> Mesh {
        let mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
            .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, self.positions.clone())
            .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals());

        let mesh = if self.layer.uses_colors() {
            debug_assert_eq!(self.colors.len(), self.positions.len(), "terrain colors out of step");
            let colors: Vec<[f32; 4]> = self
                .colors
                .iter()
                .map(|c| [c.red, c.green, c.blue, c.alpha])
                .collect();
            mesh.with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
        } else {
            debug_assert_eq!(self.uvs.len(), self.positions.len(), "{:?} uvs out of step", self.layer);
            mesh.with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs.clone())
        };
        mesh.with_inserted_indices(Indices::U32(self.indices.clone()))
    }

    /// Line-list mesh tracing every triangle edge, for the wireframe overlay.
    /// Edges shared by two triangles are drawn twice.
    pub fn to_wireframe_mesh(&self) -> Mesh {
        let lines: Vec<u32> = self
            .indices
            .chunks_exact(3)
            .flat_map(|tri| [tri[0], tri[1], tri[1], tri[2], tri[2], tri[0]])
            .collect();
        Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default())
            .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, self.positions.clone())
            .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, vec![Vec3::Y; self.positions.len()])
            .with_inserted_indices(Indices::U32(lines))
    }

    fn next_index(&self) -> u32 {
        self.positions.len() as u32
    }
}
