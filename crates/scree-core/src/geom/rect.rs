//! Axis-aligned rectangles in world coordinates.
//!
//! The coordinate system has y growing downward, matching tile grids: the
//! top edge of a rectangle has the smaller y value. Rectangles are transient
//! values recomputed every frame from a body's position and size.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle stored as its top-left and bottom-right corners.
///
/// Invariant: `left <= right` and `top <= bottom`. The constructors do not
/// enforce this; degenerate rectangles are detected by the resolver via
/// [`Rectf::is_degenerate`] and treated as unconstrained rather than
/// panicking mid-frame.
///
/// # Example
///
/// ```
/// use scree_core::geom::Rectf;
///
/// let r = Rectf::new(0.0, 0.0, 32.0, 16.0);
/// assert_eq!(r.width(), 32.0);
/// assert_eq!(r.height(), 16.0);
/// assert_eq!(r.bottom(), 16.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rectf {
    p1: Vec2,
    p2: Vec2,
}

impl Rectf {
    /// Creates a rectangle from its four edge coordinates.
    #[must_use]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            p1: Vec2::new(left, top),
            p2: Vec2::new(right, bottom),
        }
    }

    /// Creates a rectangle from its top-left position and size.
    #[must_use]
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            p1: pos,
            p2: pos + size,
        }
    }

    /// Top-left corner.
    #[must_use]
    pub const fn p1(&self) -> Vec2 {
        self.p1
    }

    /// Bottom-right corner.
    #[must_use]
    pub const fn p2(&self) -> Vec2 {
        self.p2
    }

    /// X coordinate of the left edge.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.p1.x
    }

    /// Y coordinate of the top edge.
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.p1.y
    }

    /// X coordinate of the right edge.
    #[must_use]
    pub const fn right(&self) -> f32 {
        self.p2.x
    }

    /// Y coordinate of the bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> f32 {
        self.p2.y
    }

    /// Horizontal extent.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.p2.x - self.p1.x
    }

    /// Vertical extent.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.p2.y - self.p1.y
    }

    /// Size as a vector.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.p2 - self.p1
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.p1 + self.p2) * 0.5
    }

    /// Moves the left edge, keeping the right edge in place.
    pub fn set_left(&mut self, left: f32) {
        self.p1.x = left;
    }

    /// Moves the top edge, keeping the bottom edge in place.
    pub fn set_top(&mut self, top: f32) {
        self.p1.y = top;
    }

    /// Moves the right edge, keeping the left edge in place.
    pub fn set_right(&mut self, right: f32) {
        self.p2.x = right;
    }

    /// Moves the bottom edge, keeping the top edge in place.
    pub fn set_bottom(&mut self, bottom: f32) {
        self.p2.y = bottom;
    }

    /// Translates the rectangle in place.
    pub fn translate(&mut self, by: Vec2) {
        self.p1 += by;
        self.p2 += by;
    }

    /// Returns a translated copy.
    #[must_use]
    pub fn translated(&self, by: Vec2) -> Self {
        Self {
            p1: self.p1 + by,
            p2: self.p2 + by,
        }
    }

    /// AABB overlap test. Shared edges count as overlapping; the resolver
    /// relies on the flush-snap slack (`delta`) to keep resolved bodies a
    /// hair apart so they do not re-register next frame.
    #[must_use]
    pub fn overlaps(&self, other: &Rectf) -> bool {
        if self.right() < other.left() || self.left() > other.right() {
            return false;
        }
        if self.bottom() < other.top() || self.top() > other.bottom() {
            return false;
        }
        true
    }

    /// Whether a point lies inside the rectangle (closed on all edges).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.p1.x && point.x <= self.p2.x && point.y >= self.p1.y && point.y <= self.p2.y
    }

    /// Whether a point lies strictly inside the rectangle (open on all
    /// edges). Used by the tunneling checks, where resting flush against a
    /// tile must not count as containment.
    #[must_use]
    pub fn contains_strict(&self, point: Vec2) -> bool {
        point.x > self.p1.x && point.x < self.p2.x && point.y > self.p1.y && point.y < self.p2.y
    }

    /// Distance from the rectangle's center to a point.
    #[must_use]
    pub fn distance_to(&self, point: Vec2) -> f32 {
        self.center().distance(point)
    }

    /// True when the rectangle cannot participate in collision resolution:
    /// zero or negative extent on either axis, or non-finite coordinates.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
            || !self.p1.is_finite()
            || !self.p2.is_finite()
    }

    /// Whether a line segment crosses the rectangle's boundary.
    #[must_use]
    pub fn intersects_line(&self, start: Vec2, end: Vec2) -> bool {
        let tl = self.p1;
        let tr = Vec2::new(self.right(), self.top());
        let br = self.p2;
        let bl = Vec2::new(self.left(), self.bottom());
        line_intersects_line(tl, tr, start, end)
            || line_intersects_line(tr, br, start, end)
            || line_intersects_line(br, bl, start, end)
            || line_intersects_line(bl, tl, start, end)
    }
}

/// Segment-segment intersection test, including collinear overlap.
#[must_use]
pub fn line_intersects_line(a_start: Vec2, a_end: Vec2, b_start: Vec2, b_end: Vec2) -> bool {
    let (mut a1, mut b1, mut a2, mut b2) = (a_start.x, a_start.y, a_end.x, a_end.y);
    let (mut c1, mut d1, mut c2, mut d2) = (b_start.x, b_start.y, b_end.x, b_end.y);

    let mut num = (b2 - b1) * (c2 - c1) - (a2 - a1) * (d2 - d1);
    let mut den1 = (d2 - b2) * (c1 - c2) + (a2 - c2) * (d1 - d2);
    let mut den2 = (d2 - b2) * (a1 - a2) + (a2 - c2) * (b1 - b2);

    // normalize to a positive numerator
    if num < 0.0 {
        num = -num;
        den1 = -den1;
        den2 = -den2;
    }

    // parallel or coinciding segments
    if num == 0.0 {
        if (b1 - b2) * (c1 - a2) != (a1 - a2) * (d1 - b2) {
            return false;
        }
        if a1 == a2 {
            std::mem::swap(&mut a1, &mut b1);
            std::mem::swap(&mut a2, &mut b2);
            std::mem::swap(&mut c1, &mut d1);
            std::mem::swap(&mut c2, &mut d2);
        }
        if a1 > a2 {
            std::mem::swap(&mut a1, &mut a2);
        }
        if c1 > c2 {
            std::mem::swap(&mut c1, &mut c2);
        }
        return a1 <= c2 && a2 >= c1;
    }

    (0.0..=num).contains(&den1) && (0.0..=num).contains(&den2)
}
