/// Per-pixel nearest-depth record for hidden-surface removal: a dense
/// `width * height` grid where smaller depth is nearer.
#[derive(Debug, Clone)]
pub struct ZBuffer {
    width: usize,
    height: usize,
    depth: Vec<f32>,
}

impl ZBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            depth: vec![f32::INFINITY; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Resets every cell to the farthest depth. Call once per frame.
    pub fn clear(&mut self) {
        self.depth.fill(f32::INFINITY);
    }

    /// Reallocates for a new frame-buffer size. The contents are cleared.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.depth.clear();
        self.depth.resize(width * height, f32::INFINITY);
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Stores `depth` at `(x, y)` and returns `true` when it is strictly
    /// nearer than the stored value. Out-of-range coordinates return `false`.
    pub fn check_and_set(&mut self, x: i32, y: i32, depth: f32) -> bool {
        let Some(i) = self.offset(x, y) else {
            return false;
        };
        if depth < self.depth[i] {
            self.depth[i] = depth;
            true
        } else {
            false
        }
    }

    /// Stored depth at `(x, y)`, or `None` outside the buffer.
    pub fn depth_at(&self, x: i32, y: i32) -> Option<f32> {
        self.offset(x, y).map(|i| self.depth[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_infinity() {
        let zb = ZBuffer::new(4, 3);
        assert_eq!(zb.depth_at(0, 0), Some(f32::INFINITY));
        assert_eq!(zb.depth_at(3, 2), Some(f32::INFINITY));
        assert_eq!(zb.depth_at(4, 0), None);
    }

    #[test]
    fn test_check_and_set_keeps_nearest() {
        let mut zb = ZBuffer::new(4, 4);
        assert!(zb.check_and_set(1, 2, 5.0));
        assert_eq!(zb.depth_at(1, 2), Some(5.0));

        // farther and equal depths are rejected without mutation
        assert!(!zb.check_and_set(1, 2, 7.0));
        assert!(!zb.check_and_set(1, 2, 5.0));
        assert_eq!(zb.depth_at(1, 2), Some(5.0));

        assert!(zb.check_and_set(1, 2, 2.5));
        assert_eq!(zb.depth_at(1, 2), Some(2.5));
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let mut zb = ZBuffer::new(4, 4);
        for (x, y) in [(-1, 0), (0, -1), (4, 0), (0, 4), (i32::MAX, i32::MIN)] {
            assert!(!zb.check_and_set(x, y, 0.0));
        }
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(zb.depth_at(x, y), Some(f32::INFINITY));
            }
        }
    }

    #[test]
    fn test_nan_depth_never_wins() {
        let mut zb = ZBuffer::new(1, 1);
        assert!(!zb.check_and_set(0, 0, f32::NAN));
        assert_eq!(zb.depth_at(0, 0), Some(f32::INFINITY));
    }

    #[test]
    fn test_clear_and_resize() {
        let mut zb = ZBuffer::new(2, 2);
        zb.check_and_set(0, 0, 1.0);
        zb.clear();
        assert_eq!(zb.depth_at(0, 0), Some(f32::INFINITY));

        zb.check_and_set(1, 1, 1.0);
        zb.resize(3, 1);
        assert_eq!((zb.width(), zb.height()), (3, 1));
        assert_eq!(zb.depth_at(2, 0), Some(f32::INFINITY));
        assert_eq!(zb.depth_at(1, 1), None);
    }
}
