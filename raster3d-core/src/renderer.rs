/// Per-frame orchestration: models through the transform pipeline, the
/// coarse depth cull, and into the rasterizer.
use crate::framebuffer::PixelSink;
use crate::geometry::{Model, Triangle};
use crate::math::{Matrix4, Vector2, Vector3, EPSILON};
use crate::projection::Camera;
use crate::rasterizer::{Rasterizer, RasterizerSettings, TriangleInput};
use crate::transform::Transform;
use crate::zbuffer::ZBuffer;

/// Triangle counts for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub models: usize,
    pub triangles: usize,
    pub culled: usize,
    pub drawn: usize,
}

/// Renders models with a fixed rasterizer configuration and directional light.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    pub settings: RasterizerSettings,
    /// Direction toward the light, in world space.
    pub light_direction: Vector3,
}

/// A vertex after the full pipeline.
#[derive(Debug, Clone, Copy)]
struct ProjectedVertex {
    /// Pixel x/y, with normalized depth in z.
    screen: Vector3,
    ndc_z: f32,
}

/// True when the whole triangle lies past the far plane or in front of the
/// near plane. Anything straddling either plane is kept, unclipped.
pub fn is_outside_depth_range(ndc_z: [f32; 3]) -> bool {
    ndc_z.iter().all(|&z| z > 1.0) || ndc_z.iter().all(|&z| z < -1.0)
}

impl Renderer {
    pub fn new(settings: RasterizerSettings, light_direction: Vector3) -> Self {
        Self {
            settings,
            light_direction,
        }
    }

    /// Draws every visible model. The buffers are not cleared here; the
    /// caller clears them once per frame. Screen size is the Z-buffer's.
    pub fn render_frame<'m, S, I>(
        &self,
        models: I,
        camera: &Camera,
        zbuffer: &mut ZBuffer,
        sink: &mut S,
    ) -> FrameStats
    where
        S: PixelSink + ?Sized,
        I: IntoIterator<Item = &'m Model>,
    {
        let mut stats = FrameStats::default();
        let view = camera.view_matrix();
        let projection = camera.projection_matrix();
        let depth_scale = 1.0 / camera.far.max(EPSILON);
        for model in models {
            if !model.visible {
                continue;
            }
            self.render_model(model, &view, &projection, depth_scale, zbuffer, sink, &mut stats);
        }
        log::debug!(
            "frame: {} models, {} triangles, {} culled, {} drawn",
            stats.models,
            stats.triangles,
            stats.culled,
            stats.drawn
        );
        stats
    }

    fn render_model<S: PixelSink + ?Sized>(
        &self,
        model: &Model,
        view: &Matrix4,
        projection: &Matrix4,
        depth_scale: f32,
        zbuffer: &mut ZBuffer,
        sink: &mut S,
        stats: &mut FrameStats,
    ) {
        stats.models += 1;
        let model_matrix = model.model_matrix();
        let mvp = Transform::mvp_matrix(&model_matrix, view, projection);
        let normals = normal_matrix(&model_matrix);
        let light = self.light_direction.normalize_safe();
        let texture = model.texture.as_deref();
        let (width, height) = (zbuffer.width(), zbuffer.height());
        let mut rasterizer = Rasterizer::new(zbuffer, sink);

        for (index, triangle) in model.mesh.triangles.iter().enumerate() {
            stats.triangles += 1;
            let projected = triangle
                .vertices
                .map(|v| project_vertex(&mvp, v.position, width, height, depth_scale));
            if is_outside_depth_range(projected.map(|p| p.ndc_z)) {
                log::trace!("culled triangle {} outside the depth range", index);
                stats.culled += 1;
                continue;
            }

            let input = triangle_input(triangle, &projected, &normals);
            rasterizer.draw_triangle(&input, texture, light, &self.settings);
            stats.drawn += 1;
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RasterizerSettings::default(), Vector3::new(0.3, 0.5, -1.0))
    }
}

/// Inverse-transpose of the model matrix, which keeps normals perpendicular
/// to their surface under non-uniform scale. A singular model matrix falls
/// back to itself.
pub fn normal_matrix(model: &Matrix4) -> Matrix4 {
    model.inverse().map(|inverse| inverse.transpose()).unwrap_or(*model)
}

/// Object space to screen space. The divide is the safe one, so a vertex on
/// the camera plane comes back unprojected rather than failing.
///
/// The retained depth is view distance normalized to the far plane
/// (`w * depth_scale`, 1 at the far plane). NDC z is only used for the cull:
/// it is hyperbolic in view distance and nearly constant across the
/// frustum, so `attribute / z` interpolation on it would lose the
/// perspective correction.
fn project_vertex(mvp: &Matrix4, position: Vector3, width: usize, height: usize, depth_scale: f32) -> ProjectedVertex {
    let clip = *mvp * position.extend(1.0);
    let ndc = clip.to_vector3_safe();
    let mut screen = Transform::vertex_to_point(ndc, width, height);
    screen.z = clip.w * depth_scale;
    ProjectedVertex {
        screen,
        ndc_z: ndc.z,
    }
}

/// Fills in default UVs and normals for vertices that lack them and moves
/// normals to world space.
fn triangle_input(triangle: &Triangle, projected: &[ProjectedVertex; 3], normal_matrix: &Matrix4) -> TriangleInput {
    let mut uvs = [Vector2::ZERO; 3];
    let mut normals = [Vector3::ZERO; 3];
    for (i, vertex) in triangle.vertices.iter().enumerate() {
        uvs[i] = vertex.uv.unwrap_or(TriangleInput::DEFAULT_UVS[i]);
        let normal = vertex.normal.unwrap_or(TriangleInput::DEFAULT_NORMAL);
        normals[i] = Transform::transform_normal(normal_matrix, normal);
    }
    TriangleInput {
        positions: projected.map(|p| p.screen),
        uvs,
        normals,
    }
}
