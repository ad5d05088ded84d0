// ABOUTME: Grid constants, snapping arithmetic, and axis-aligned rectangle overlap for button layout.
// ABOUTME: Every button coordinate and dimension written by the board passes through snap().

/// Spacing, in pixels, that all button geometry is rounded to.
pub const GRID_UNIT: i64 = 20;

/// Smallest width or height a button may be resized to.
pub const MIN_BUTTON_SIZE: i64 = GRID_UNIT * 4;

pub const DEFAULT_WIDTH: i64 = 200;
pub const DEFAULT_HEIGHT: i64 = 80;

/// Round a value to the nearest multiple of [`GRID_UNIT`].
///
/// Ties round toward positive infinity, so `snap(10) == 20` and
/// `snap(-10) == 0`. The result is always a multiple of the grid unit and
/// `snap(snap(v)) == snap(v)`. Values at the top of the `i64` range
/// saturate to the largest representable multiple.
pub fn snap(value: i64) -> i64 {
    value.saturating_add(GRID_UNIT / 2).div_euclid(GRID_UNIT) * GRID_UNIT
}

/// Snap a width or height and clamp it to [`MIN_BUTTON_SIZE`].
pub fn snap_size(value: i64) -> i64 {
    snap(value).max(MIN_BUTTON_SIZE)
}

/// An axis-aligned rectangle in board coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i64 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i64 {
        self.y.saturating_add(self.height)
    }

    /// True when the two rectangles share interior area. Rectangles that
    /// only touch along an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        let separated = self.right() <= other.x
            || self.x >= other.right()
            || self.bottom() <= other.y
            || self.y >= other.bottom();
        !separated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_rounds_to_nearest_unit() {
        assert_eq!(snap(0), 0);
        assert_eq!(snap(9), 0);
        assert_eq!(snap(10), 20);
        assert_eq!(snap(33), 40);
        assert_eq!(snap(29), 20);
        assert_eq!(snap(270), 280);
        assert_eq!(snap(-9), 0);
        assert_eq!(snap(-10), 0);
        assert_eq!(snap(-11), -20);
    }

    #[test]
    fn snap_is_idempotent_and_aligned() {
        for v in -500..=500 {
            let s = snap(v);
            assert_eq!(s % GRID_UNIT, 0, "snap({}) = {} is not aligned", v, s);
            assert_eq!(snap(s), s, "snap is not idempotent at {}", v);
        }
    }

    #[test]
    fn snap_saturates_at_extremes() {
        let top = snap(i64::MAX);
        assert_eq!(top % GRID_UNIT, 0);
        assert!(top > i64::MAX - GRID_UNIT);
        assert_eq!(snap(top), top);
        assert_eq!(snap(i64::MAX - 3), top);

        let bottom = snap(i64::MIN);
        assert_eq!(bottom % GRID_UNIT, 0);
        assert_eq!(snap(bottom), bottom);

        assert_eq!(snap_size(i64::MIN), MIN_BUTTON_SIZE);
        assert_eq!(snap_size(i64::MAX), top);
    }

    #[test]
    fn snap_size_enforces_minimum() {
        assert_eq!(snap_size(5), MIN_BUTTON_SIZE);
        assert_eq!(snap_size(0), MIN_BUTTON_SIZE);
        assert_eq!(snap_size(-100), MIN_BUTTON_SIZE);
        assert_eq!(snap_size(95), 100);
        assert_eq!(snap_size(210), 220);
    }

    #[test]
    fn overlapping_rectangles_detected() {
        let a = Rect::new(20, 20, 200, 80);
        let b = Rect::new(100, 60, 200, 80);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn contained_rectangle_overlaps() {
        let outer = Rect::new(0, 0, 400, 400);
        let inner = Rect::new(100, 100, 80, 80);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn edge_touching_rectangles_do_not_overlap() {
        let a = Rect::new(20, 20, 200, 80);
        let right = Rect::new(220, 20, 200, 80);
        let below = Rect::new(20, 100, 200, 80);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
        assert!(!right.overlaps(&a));
        assert!(!below.overlaps(&a));
    }

    #[test]
    fn far_edge_rectangles_saturate_instead_of_wrapping() {
        let far = Rect::new(i64::MAX - 5, i64::MAX - 5, 200, 80);
        assert_eq!(far.right(), i64::MAX);
        assert_eq!(far.bottom(), i64::MAX);

        let origin = Rect::new(20, 20, 200, 80);
        assert!(!origin.overlaps(&far));
        assert!(!far.overlaps(&origin));
        assert!(far.overlaps(&Rect::new(i64::MAX - 100, i64::MAX - 100, 200, 200)));
    }

    #[test]
    fn distant_rectangles_do_not_overlap() {
        let a = Rect::new(20, 20, 200, 80);
        let b = Rect::new(270, 120, 200, 80);
        assert!(!a.overlaps(&b));
    }
}
