/// Scanline rasterizer with perspective-correct attribute interpolation.
///
/// One triangle at a time: the vertices are sorted by screen y, the
/// triangle is split into an upper and a lower span sharing the long edge
/// v0 -> v2, and each span is walked scanline by scanline. Depth and
/// attributes are interpolated as `1/z` and `attribute/z`, which are affine
/// in screen space, then recovered per pixel.
///
/// Degenerate input (zero area, zero width, near-zero or non-finite depth)
/// never fails; the affected scanlines or pixels are skipped.
use crate::color::Color;
use crate::framebuffer::PixelSink;
use crate::math::{Vector2, Vector3, EPSILON};
use crate::texture::Texture;
use crate::wireframe;
use crate::zbuffer::ZBuffer;

/// Ambient floor of the lighting term. [`RasterizerSettings::ambient_strength`]
/// does not feed into it.
pub const AMBIENT_TERM: f32 = 0.3;

/// Per-draw-call configuration. There is no renderer-wide state; callers
/// pass a value into every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterizerSettings {
    /// Sample the texture (when one is supplied) instead of `default_color`.
    pub use_texture: bool,
    /// Apply `N.L` shading.
    pub use_lighting: bool,
    /// Overlay the triangle edges in `grid_color`.
    pub draw_polygonal_grid: bool,
    pub grid_color: Color,
    /// Fill color when texturing is off or no texture is bound.
    pub default_color: Color,
    /// Carried for configuration surfaces; the lighting formula does not read it.
    pub ambient_strength: f32,
    /// Carried for configuration surfaces; the lighting formula does not read it.
    pub diffuse_strength: f32,
    /// Carried for configuration surfaces; the lighting formula does not read it.
    pub light_intensity: f32,
}

impl Default for RasterizerSettings {
    fn default() -> Self {
        Self {
            use_texture: true,
            use_lighting: true,
            draw_polygonal_grid: false,
            grid_color: Color::BLACK,
            default_color: Color::rgb(0.8, 0.8, 0.8),
            ambient_strength: 0.3,
            diffuse_strength: 1.0,
            light_intensity: 1.0,
        }
    }
}

/// Screen-space triangle with its attributes.
///
/// `positions` hold pixel x/y plus a retained depth in z (larger is
/// farther); depth must be proportional to view distance for the
/// perspective correction to hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleInput {
    pub positions: [Vector3; 3],
    pub uvs: [Vector2; 3],
    pub normals: [Vector3; 3],
}

impl TriangleInput {
    /// UVs used for vertices that carry none.
    pub const DEFAULT_UVS: [Vector2; 3] = [
        Vector2::new(0.0, 0.0),
        Vector2::new(0.0, 1.0),
        Vector2::new(1.0, 1.0),
    ];
    /// Normal used for vertices that carry none.
    pub const DEFAULT_NORMAL: Vector3 = Vector3::UP;

    pub fn new(positions: [Vector3; 3]) -> Self {
        Self {
            positions,
            uvs: Self::DEFAULT_UVS,
            normals: [Self::DEFAULT_NORMAL; 3],
        }
    }

    pub fn with_uvs(mut self, uvs: [Vector2; 3]) -> Self {
        self.uvs = uvs;
        self
    }

    pub fn with_normals(mut self, normals: [Vector3; 3]) -> Self {
        self.normals = normals;
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct RasterVertex {
    position: Vector3,
    uv: Vector2,
    normal: Vector3,
}

/// Sorts ascending by screen y with three compare-swaps. Equal y values are
/// never swapped, so their relative input order decides the span split.
fn sort_by_y(v: &mut [RasterVertex; 3]) {
    if v[0].position.y > v[1].position.y {
        v.swap(0, 1);
    }
    if v[0].position.y > v[2].position.y {
        v.swap(0, 2);
    }
    if v[1].position.y > v[2].position.y {
        v.swap(1, 2);
    }
}

#[inline]
fn inverse_depth(z: f32) -> f32 {
    1.0 / z.max(EPSILON)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Which attributes ride along with depth.
#[derive(Debug, Clone, Copy)]
struct Features {
    texture: bool,
    lighting: bool,
}

/// Interpolated state at one end of a scanline.
#[derive(Debug, Clone, Copy)]
struct EdgeSample {
    x: f32,
    inv_z: f32,
    uv_over_z: Vector2,
    normal_over_z: Vector3,
}

impl EdgeSample {
    fn lerp(&self, other: &EdgeSample, t: f32) -> EdgeSample {
        EdgeSample {
            x: lerp(self.x, other.x, t),
            inv_z: lerp(self.inv_z, other.inv_z, t),
            uv_over_z: self.uv_over_z + (other.uv_over_z - self.uv_over_z) * t,
            normal_over_z: self.normal_over_z + (other.normal_over_z - self.normal_over_z) * t,
        }
    }
}

/// A directed edge from the upper to the lower vertex, with its endpoint
/// samples precomputed.
struct Edge {
    y_start: f32,
    y_end: f32,
    start: EdgeSample,
    end: EdgeSample,
}

impl Edge {
    fn new(from: &RasterVertex, to: &RasterVertex, features: Features) -> Self {
        Self {
            y_start: from.position.y,
            y_end: to.position.y,
            start: Self::endpoint(from, features),
            end: Self::endpoint(to, features),
        }
    }

    fn endpoint(v: &RasterVertex, features: Features) -> EdgeSample {
        let inv_z = inverse_depth(v.position.z);
        EdgeSample {
            x: v.position.x,
            inv_z,
            uv_over_z: if features.texture { v.uv * inv_z } else { Vector2::ZERO },
            normal_over_z: if features.lighting { v.normal * inv_z } else { Vector3::ZERO },
        }
    }

    /// Sample at scanline `y`; each edge uses its own vertical factor.
    fn sample(&self, y: f32) -> EdgeSample {
        let height = self.y_end - self.y_start;
        let t = if height.abs() < EPSILON { 0.0 } else { (y - self.y_start) / height };
        self.start.lerp(&self.end, t)
    }
}

/// Draws triangles into a Z-buffer and a pixel sink borrowed from the caller.
///
/// Both buffers are mutated in place; exclusive borrows keep a single writer.
pub struct Rasterizer<'a, S: PixelSink + ?Sized> {
    zbuffer: &'a mut ZBuffer,
    sink: &'a mut S,
}

/// Everything the per-pixel shading needs for one draw call.
struct Shading<'t> {
    settings: RasterizerSettings,
    texture: Option<&'t Texture>,
    light_direction: Vector3,
    features: Features,
}

impl<'a, S: PixelSink + ?Sized> Rasterizer<'a, S> {
    pub fn new(zbuffer: &'a mut ZBuffer, sink: &'a mut S) -> Self {
        Self { zbuffer, sink }
    }

    /// Rasterizes one triangle, then its wireframe overlay if enabled.
    pub fn draw_triangle(
        &mut self,
        triangle: &TriangleInput,
        texture: Option<&Texture>,
        light_direction: Vector3,
        settings: &RasterizerSettings,
    ) {
        let mut vertices = [0, 1, 2].map(|i| RasterVertex {
            position: triangle.positions[i],
            uv: triangle.uvs[i],
            normal: triangle.normals[i],
        });
        sort_by_y(&mut vertices);
        let [v0, v1, v2] = vertices;

        let shading = Shading {
            settings: *settings,
            texture,
            light_direction,
            features: Features {
                texture: settings.use_texture && texture.is_some(),
                lighting: settings.use_lighting,
            },
        };

        let long_edge = Edge::new(&v0, &v2, shading.features);
        let upper = Edge::new(&v0, &v1, shading.features);
        let lower = Edge::new(&v1, &v2, shading.features);
        self.draw_span(&upper, &long_edge, &shading);
        self.draw_span(&lower, &long_edge, &shading);

        if settings.draw_polygonal_grid {
            wireframe::draw_triangle_edges(
                &mut *self.zbuffer,
                &mut *self.sink,
                &[v0.position, v1.position, v2.position],
                settings.grid_color,
            );
        }
    }

    /// Walks the scanlines shared by two edges.
    fn draw_span(&mut self, a: &Edge, b: &Edge, shading: &Shading<'_>) {
        let y_first = a.y_start.max(b.y_start).ceil();
        let y_last = a.y_end.min(b.y_end).ceil();
        // rows outside the buffer would all be rejected by the depth test
        let y_first = (y_first as i32).max(0);
        let y_last = (y_last as i32).min(self.zbuffer.height() as i32);

        for y in y_first..y_last {
            let yf = y as f32;
            let mut left = a.sample(yf);
            let mut right = b.sample(yf);
            if left.x > right.x {
                std::mem::swap(&mut left, &mut right);
            }

            let width = right.x - left.x;
            // zero-width slivers (and NaN) draw nothing
            if width <= 0.0 || width.is_nan() {
                continue;
            }

            let x_first = (left.x.ceil() as i32).max(0);
            let x_last = (right.x.ceil() as i32).min(self.zbuffer.width() as i32);
            for x in x_first..x_last {
                let t = (x as f32 - left.x) / width;
                let inv_z = lerp(left.inv_z, right.inv_z, t);
                let depth = 1.0 / inv_z;
                if !self.zbuffer.check_and_set(x, y, depth) {
                    continue;
                }
                let color = shade(&left.lerp(&right, t), depth, shading);
                self.sink.set_pixel(x, y, color);
            }
        }
    }
}

/// Color of an accepted pixel. Attributes are recovered from their `/z`
/// form by multiplying with the true depth.
fn shade(sample: &EdgeSample, depth: f32, shading: &Shading<'_>) -> Color {
    let mut color = shading.settings.default_color;

    if shading.features.texture {
        if let Some(texture) = shading.texture {
            let uv = sample.uv_over_z * depth;
            color = texture.get_pixel(uv.x, uv.y);
        }
    }

    if shading.features.lighting {
        let normal = (sample.normal_over_z * depth).normalize_safe();
        let intensity = normal.dot(shading.light_direction).max(0.0);
        color = color.shade((AMBIENT_TERM + intensity).min(1.0));
    }

    color
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FrameBuffer;

    const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

    fn flat(color: Color) -> RasterizerSettings {
        RasterizerSettings {
            use_texture: false,
            use_lighting: false,
            draw_polygonal_grid: false,
            default_color: color,
            ..RasterizerSettings::default()
        }
    }

    fn tri(a: (f32, f32, f32), b: (f32, f32, f32), c: (f32, f32, f32)) -> TriangleInput {
        TriangleInput::new([
            Vector3::new(a.0, a.1, a.2),
            Vector3::new(b.0, b.1, b.2),
            Vector3::new(c.0, c.1, c.2),
        ])
    }

    fn draw(
        fb: &mut FrameBuffer,
        zb: &mut ZBuffer,
        triangle: &TriangleInput,
        texture: Option<&Texture>,
        settings: &RasterizerSettings,
    ) {
        let light = Vector3::new(0.0, 0.0, -1.0);
        Rasterizer::new(zb, fb).draw_triangle(triangle, texture, light, settings);
    }

    #[test]
    fn test_single_triangle_fills_interior_only() {
        let mut fb = FrameBuffer::new(64, 64);
        let mut zb = ZBuffer::new(64, 64);
        let fill = Color::rgb(0.2, 0.6, 0.4);
        let triangle = tri((10.0, 10.0, 1.0), (50.0, 10.0, 1.0), (30.0, 50.0, 1.0));
        draw(&mut fb, &mut zb, &triangle, None, &flat(fill));

        // edges: left x = 10 + (y-10)/2, right x = 50 - (y-10)/2
        for y in 0..64usize {
            for x in 0..64usize {
                let yf = y as f32;
                let inside = (10..50).contains(&y) && {
                    let left = (10.0 + (yf - 10.0) / 2.0).ceil() as usize;
                    let right = (50.0 - (yf - 10.0) / 2.0).ceil() as usize;
                    (left..right).contains(&x)
                };
                let expected = if inside { fill } else { Color::BLACK };
                assert_eq!(fb.get_pixel(x, y), Some(expected), "pixel ({}, {})", x, y);
            }
        }
        assert_eq!(zb.depth_at(30, 30), Some(1.0));
        assert_eq!(zb.depth_at(5, 5), Some(f32::INFINITY));
    }

    #[test]
    fn test_occlusion_is_draw_order_independent() {
        let far = tri((5.0, 5.0, 2.0), (40.0, 5.0, 2.0), (20.0, 40.0, 2.0));
        let near = tri((5.0, 5.0, 0.5), (40.0, 5.0, 0.5), (20.0, 40.0, 0.5));

        let render = |first: (&TriangleInput, Color), second: (&TriangleInput, Color)| {
            let mut fb = FrameBuffer::new(48, 48);
            let mut zb = ZBuffer::new(48, 48);
            draw(&mut fb, &mut zb, first.0, None, &flat(first.1));
            draw(&mut fb, &mut zb, second.0, None, &flat(second.1));
            fb
        };

        let far_then_near = render((&far, RED), (&near, BLUE));
        let near_then_far = render((&near, BLUE), (&far, RED));
        for y in 0..48 {
            for x in 0..48 {
                assert_eq!(far_then_near.get_pixel(x, y), near_then_far.get_pixel(x, y));
            }
        }
        assert_eq!(far_then_near.get_pixel(20, 20), Some(BLUE));
    }

    /// Texture whose red channel encodes u and green channel encodes v.
    fn uv_texture() -> Texture {
        let size = 101;
        let pixels = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                Color::rgb(x as f32 / 100.0, 1.0 - y as f32 / 100.0, 0.0)
            })
            .collect();
        Texture::new(size, size, pixels).unwrap()
    }

    #[test]
    fn test_uv_interpolation_is_perspective_correct() {
        let texture = uv_texture();
        let settings = RasterizerSettings {
            use_texture: true,
            ..flat(Color::BLACK)
        };
        // two near vertices at depth 1, one far vertex at depth 4; the long
        // edge runs from (10, 10) to (90, 90)
        let triangle = tri((90.0, 10.0, 1.0), (10.0, 10.0, 1.0), (90.0, 90.0, 4.0)).with_uvs([
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, 1.0),
        ]);
        let mut fb = FrameBuffer::new(100, 100);
        let mut zb = ZBuffer::new(100, 100);
        draw(&mut fb, &mut zb, &triangle, Some(&texture), &settings);

        // screen midpoint of the long edge: 1/z = (1 + 1/4) / 2, so z = 1.6,
        // and uv = 1.6 * ((1, 0) + (0, 1/4)) / 2 = (0.8, 0.2).
        // Screen-linear interpolation would give (0.5, 0.5).
        let c = fb.get_pixel(50, 50).unwrap();
        assert!((c.r - 0.8).abs() < 0.02, "u = {}", c.r);
        assert!((c.g - 0.2).abs() < 0.02, "v = {}", c.g);
        let depth = zb.depth_at(50, 50).unwrap();
        assert!((depth - 1.6).abs() < 1e-4);
    }

    #[test]
    fn test_texture_ignored_when_disabled_or_missing() {
        let texture = uv_texture();
        let triangle = tri((0.0, 0.0, 1.0), (20.0, 0.0, 1.0), (0.0, 20.0, 1.0));

        let mut fb = FrameBuffer::new(24, 24);
        let mut zb = ZBuffer::new(24, 24);
        draw(&mut fb, &mut zb, &triangle, Some(&texture), &flat(RED));
        assert_eq!(fb.get_pixel(3, 3), Some(RED));

        let mut fb = FrameBuffer::new(24, 24);
        let mut zb = ZBuffer::new(24, 24);
        let settings = RasterizerSettings { use_texture: true, ..flat(RED) };
        draw(&mut fb, &mut zb, &triangle, None, &settings);
        assert_eq!(fb.get_pixel(3, 3), Some(RED));
    }

    #[test]
    fn test_lighting_uses_fixed_ambient() {
        let base = Color::rgb(0.5, 0.5, 0.5);
        let triangle = tri((0.0, 0.0, 1.0), (20.0, 0.0, 1.0), (0.0, 20.0, 1.0));
        let facing = triangle.with_normals([Vector3::new(0.0, 0.0, -1.0); 3]);
        let sideways = triangle.with_normals([Vector3::new(1.0, 0.0, 0.0); 3]);

        for ambient_strength in [0.0, 0.3, 0.9] {
            let settings = RasterizerSettings {
                use_lighting: true,
                ambient_strength,
                diffuse_strength: 5.0,
                light_intensity: 0.1,
                ..flat(base)
            };

            let mut fb = FrameBuffer::new(24, 24);
            let mut zb = ZBuffer::new(24, 24);
            draw(&mut fb, &mut zb, &facing, None, &settings);
            // 0.3 + 1.0 is capped at 1
            assert_eq!(fb.get_pixel(3, 3), Some(base));

            let mut fb = FrameBuffer::new(24, 24);
            let mut zb = ZBuffer::new(24, 24);
            draw(&mut fb, &mut zb, &sideways, None, &settings);
            let c = fb.get_pixel(3, 3).unwrap();
            assert!((c.r - 0.15).abs() < 1e-6);
            assert_eq!(c.a, 1.0);
        }
    }

    #[test]
    fn test_lighting_interpolates_normals() {
        // normals fan from facing the light to perpendicular across x
        let settings = RasterizerSettings { use_lighting: true, ..flat(Color::WHITE) };
        let triangle = tri((0.0, 0.0, 1.0), (40.0, 0.0, 1.0), (0.0, 40.0, 1.0)).with_normals([
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, -1.0),
        ]);
        let mut fb = FrameBuffer::new(48, 48);
        let mut zb = ZBuffer::new(48, 48);
        draw(&mut fb, &mut zb, &triangle, None, &settings);
        let near_lit = fb.get_pixel(1, 1).unwrap().r;
        let far_lit = fb.get_pixel(37, 1).unwrap().r;
        assert!(near_lit > far_lit);
        assert!(far_lit >= AMBIENT_TERM - 1e-6);
    }

    #[test]
    fn test_degenerate_triangles_draw_nothing() {
        let mut fb = FrameBuffer::new(32, 32);
        let mut zb = ZBuffer::new(32, 32);
        let settings = RasterizerSettings { use_lighting: true, ..flat(RED) };

        // collinear points
        draw(&mut fb, &mut zb, &tri((1.0, 1.0, 1.0), (10.0, 10.0, 1.0), (20.0, 20.0, 1.0)), None, &settings);
        // all on one row
        draw(&mut fb, &mut zb, &tri((1.0, 5.0, 1.0), (10.0, 5.0, 1.0), (20.0, 5.0, 1.0)), None, &settings);
        // a single point
        draw(&mut fb, &mut zb, &tri((7.0, 7.0, 1.0), (7.0, 7.0, 1.0), (7.0, 7.0, 1.0)), None, &settings);

        for y in 0..32 {
            for x in 0..32 {
                assert_eq!(fb.get_pixel(x, y), Some(Color::BLACK), "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_bad_depth_and_coordinates_do_not_panic() {
        let mut fb = FrameBuffer::new(32, 32);
        let mut zb = ZBuffer::new(32, 32);
        let settings = RasterizerSettings { use_lighting: true, ..flat(RED) };

        // zero and negative depth are floored at epsilon
        draw(&mut fb, &mut zb, &tri((0.0, 0.0, 0.0), (20.0, 0.0, -3.0), (0.0, 20.0, 0.0)), None, &settings);
        // default normal is perpendicular to the light: ambient only
        assert_eq!(fb.get_pixel(2, 2), Some(RED.shade(AMBIENT_TERM)));
        let depth = zb.depth_at(2, 2).unwrap();
        assert!(depth > 0.0 && depth.is_finite());

        let nan = f32::NAN;
        draw(&mut fb, &mut zb, &tri((nan, 0.0, 1.0), (20.0, nan, 1.0), (0.0, 20.0, nan)), None, &settings);
        let inf = f32::INFINITY;
        draw(&mut fb, &mut zb, &tri((-inf, 0.0, 1.0), (20.0, 0.0, 1.0), (0.0, inf, 1.0)), None, &settings);
        // far off-screen and huge: iteration is bounded by the buffer
        draw(&mut fb, &mut zb, &tri((-1e9, -1e9, 1.0), (1e9, -1e9, 1.0), (0.0, 1e9, 1.0)), None, &settings);
    }

    #[test]
    fn test_equal_y_keeps_input_order() {
        let v = |x: f32, y: f32| RasterVertex {
            position: Vector3::new(x, y, 1.0),
            uv: Vector2::ZERO,
            normal: Vector3::UP,
        };
        let mut vs = [v(1.0, 5.0), v(2.0, 5.0), v(3.0, 5.0)];
        sort_by_y(&mut vs);
        assert_eq!([vs[0].position.x, vs[1].position.x, vs[2].position.x], [1.0, 2.0, 3.0]);

        let mut vs = [v(1.0, 9.0), v(2.0, 5.0), v(3.0, 5.0)];
        sort_by_y(&mut vs);
        // v0/v1 swap, the v0/v2 tie is left alone, then v1/v2 swap
        assert_eq!([vs[0].position.x, vs[1].position.x, vs[2].position.x], [2.0, 3.0, 1.0]);

        let mut vs = [v(1.0, 3.0), v(2.0, 1.0), v(3.0, 2.0)];
        sort_by_y(&mut vs);
        assert_eq!([vs[0].position.y, vs[1].position.y, vs[2].position.y], [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_grid_overlay_wins_over_its_own_fill() {
        let grid = Color::rgb(0.0, 1.0, 0.0);
        let settings = RasterizerSettings {
            draw_polygonal_grid: true,
            grid_color: grid,
            ..flat(RED)
        };
        let mut fb = FrameBuffer::new(64, 64);
        let mut zb = ZBuffer::new(64, 64);
        let triangle = tri((10.0, 10.0, 1.0), (50.0, 10.0, 1.0), (30.0, 50.0, 1.0));
        draw(&mut fb, &mut zb, &triangle, None, &settings);

        assert_eq!(fb.get_pixel(30, 10), Some(grid));
        assert_eq!(fb.get_pixel(10, 10), Some(grid));
        assert_eq!(fb.get_pixel(30, 30), Some(RED));
        let depth = zb.depth_at(30, 10).unwrap();
        assert!((depth - 0.997).abs() < 1e-6);
    }

    #[test]
    fn test_grid_on_huge_triangle_finishes() {
        let grid = Color::rgb(0.0, 1.0, 0.0);
        let settings = RasterizerSettings {
            draw_polygonal_grid: true,
            grid_color: grid,
            ..flat(RED)
        };
        let mut fb = FrameBuffer::new(32, 32);
        let mut zb = ZBuffer::new(32, 32);
        let triangle = tri((-1e9, 5.0, 1.0), (1e9, 5.0, 1.0), (0.0, 20.0, 1.0));
        let started = std::time::Instant::now();
        draw(&mut fb, &mut zb, &triangle, None, &settings);
        assert!(started.elapsed() < std::time::Duration::from_secs(1));

        assert_eq!(fb.get_pixel(16, 5), Some(grid));
        assert_eq!(fb.get_pixel(16, 10), Some(RED));
    }

    #[test]
    fn test_default_attributes() {
        let t = TriangleInput::new([Vector3::ZERO; 3]);
        assert_eq!(t.uvs, [Vector2::new(0.0, 0.0), Vector2::new(0.0, 1.0), Vector2::new(1.0, 1.0)]);
        assert_eq!(t.normals, [Vector3::UP; 3]);
    }
}
