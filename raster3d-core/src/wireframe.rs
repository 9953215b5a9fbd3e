/// Depth-tested wireframe overlay.
use crate::color::Color;
use crate::framebuffer::PixelSink;
use crate::math::{Vector3, EPSILON};
use crate::zbuffer::ZBuffer;

/// Fraction of the depth pulled toward the camera before the depth test, so
/// edges beat the coplanar fill they outline.
pub const GRID_DEPTH_BIAS: f32 = 0.003;

/// Draws the three edges `p0-p1`, `p1-p2`, `p2-p0`.
pub fn draw_triangle_edges<S: PixelSink + ?Sized>(
    zbuffer: &mut ZBuffer,
    sink: &mut S,
    positions: &[Vector3; 3],
    color: Color,
) {
    for i in 0..3 {
        draw_line_3d(zbuffer, sink, positions[i], positions[(i + 1) % 3], color);
    }
}

/// Integer Bresenham from `from` to `to`, both endpoints included.
///
/// The line is first clipped to the buffer, so only on-screen steps are
/// walked. Inverse depth is interpolated along the original endpoints, the
/// recovered depth is biased by [`GRID_DEPTH_BIAS`] and written through the
/// Z-buffer. Lines with non-finite endpoints, or that miss the buffer, are
/// skipped.
pub fn draw_line_3d<S: PixelSink + ?Sized>(
    zbuffer: &mut ZBuffer,
    sink: &mut S,
    from: Vector3,
    to: Vector3,
    color: Color,
) {
    if !from.is_finite() || !to.is_finite() {
        return;
    }
    let (w, h) = (zbuffer.width() as i64, zbuffer.height() as i64);
    if w == 0 || h == 0 {
        return;
    }

    let (fx, fy) = (from.x as f64, from.y as f64);
    let (dxf, dyf) = (to.x as f64 - fx, to.y as f64 - fy);
    let bounds = (-0.5, w as f64 - 0.5, -0.5, h as f64 - 0.5);
    let Some((t_enter, t_exit)) = clip_line(fx, fy, dxf, dyf, bounds) else {
        return;
    };

    let pixel = |t: f64| {
        let x = (fx + dxf * t).round().clamp(0.0, (w - 1) as f64) as i64;
        let y = (fy + dyf * t).round().clamp(0.0, (h - 1) as f64) as i64;
        (x, y)
    };
    // line parameter at an integer pixel, measured along the major axis
    let param = |x: i64, y: i64| {
        let t = if dxf.abs() >= dyf.abs() {
            if dxf == 0.0 { 0.0 } else { (x as f64 - fx) / dxf }
        } else {
            (y as f64 - fy) / dyf
        };
        t.clamp(0.0, 1.0)
    };
    let (x0, y0) = pixel(t_enter);
    let (x1, y1) = pixel(t_exit);
    let (t0, t1) = (param(x0, y0), param(x1, y1));

    let inv_z0 = 1.0 / from.z.max(EPSILON);
    let inv_z1 = 1.0 / to.z.max(EPSILON);

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let total_steps = dx.max(-dy).max(1) as f64;

    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);
    let mut step = 0.0f64;
    loop {
        let t = (t0 + (t1 - t0) * step / total_steps) as f32;
        let z = 1.0 / (inv_z0 + (inv_z1 - inv_z0) * t);
        let biased = z - z * GRID_DEPTH_BIAS;
        if zbuffer.check_and_set(x as i32, y as i32, biased) {
            sink.set_pixel(x as i32, y as i32, color);
        }

        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
        step += 1.0;
    }
}

/// Liang-Barsky: the parameter range of `p + t * d`, `t` in `[0, 1]`, that
/// lies inside `(min_x, max_x, min_y, max_y)`.
fn clip_line(px: f64, py: f64, dx: f64, dy: f64, bounds: (f64, f64, f64, f64)) -> Option<(f64, f64)> {
    let (min_x, max_x, min_y, max_y) = bounds;
    let mut t_enter = 0.0f64;
    let mut t_exit = 1.0f64;
    for (p, q) in [(-dx, px - min_x), (dx, max_x - px), (-dy, py - min_y), (dy, max_y - py)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t_enter = t_enter.max(r);
        } else {
            t_exit = t_exit.min(r);
        }
        if t_enter > t_exit {
            return None;
        }
    }
    Some((t_enter, t_exit))
}
