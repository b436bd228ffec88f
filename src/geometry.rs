//! Axis-aligned integer boxes and overlap measures.

/// Axis-aligned box in pixel coordinates, `(left, top)` plus extents.
///
/// `x = 0` is the left image edge and `y = 0` the top edge. Boxes with a
/// non-positive width or height are degenerate and have zero area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i64 {
        i64::from(self.left) + i64::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i64 {
        i64::from(self.top) + i64::from(self.height)
    }

    /// Area in square pixels; zero for degenerate boxes.
    pub fn area(&self) -> i64 {
        if self.is_empty() {
            return 0;
        }
        i64::from(self.width) * i64::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Area shared by `self` and `other`.
    pub fn intersection_area(&self, other: &Rect) -> i64 {
        if self.is_empty() || other.is_empty() {
            return 0;
        }
        let left = i64::from(self.left.max(other.left));
        let top = i64::from(self.top.max(other.top));
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return 0;
        }
        (right - left) * (bottom - top)
    }
}

/// Intersection over union of two boxes.
///
/// Returns `0.0` when either box is degenerate, so zero-area boxes never
/// overlap anything, including an identical zero-area box.
pub fn iou(a: &Rect, b: &Rect) -> f32 {
    let inter = a.intersection_area(b);
    if inter == 0 {
        return 0.0;
    }
    let union = a.area() + b.area() - inter;
    (inter as f64 / union as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iou_of_half_overlap() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(2, 0, 4, 4);
        // 8 shared over 24 total.
        assert!((iou(&a, &b) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(4, 0, 4, 4);
        assert_eq!(a.intersection_area(&b), 0);
        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn negative_extent_is_degenerate() {
        let r = Rect::new(10, 10, -3, 5);
        assert!(r.is_empty());
        assert_eq!(r.area(), 0);
        assert_eq!(iou(&r, &r), 0.0);
    }
}
