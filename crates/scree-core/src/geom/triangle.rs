//! Axis-aligned right triangles for slope tiles.
//!
//! A slope tile's solid region is one diagonal half of its cell. The tile
//! data code packs two things: which corner holds the solid right angle
//! (the *direction*) and whether the triangle is squashed into one half of
//! the cell to form a gentler 22.5-degree ramp (the *deform*).
//!
//! [`rectangle_triangle_constraints`] produces the same bound-tightening
//! updates as the rectangular obstacle fold, but measures penetration
//! against the hypotenuse plane, so a body inside only the empty half of
//! the cell is not constrained at all.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constraints::Constraints;
use crate::geom::Rectf;

/// Push-out slack added on top of the measured slope penetration.
const SLOPE_OUT: f32 = 0.2;

/// Tolerance around the deformed area inside which the hypotenuse test is
/// trusted; contact points further outside fall back to the rectangular
/// fold against the area box.
const RDELTA: f32 = 3.0;

/// Which corner of the cell holds the solid right angle.
///
/// `Southwest` is the bottom-left floor wedge: its surface runs from the
/// cell's top-left corner down to its bottom-right corner (y grows down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlopeDirection {
    /// Solid bottom-left half; walkable surface rises to the left.
    Southwest,
    /// Solid top-right half; ceiling wedge mirroring `Southwest`.
    Northeast,
    /// Solid bottom-right half; walkable surface rises to the right.
    Southeast,
    /// Solid top-left half; ceiling wedge mirroring `Southeast`.
    Northwest,
}

/// Which part of the cell the triangle is squashed into, for 22.5-degree
/// ramps spanning two cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Deform {
    /// The triangle spans the full cell (45 degrees).
    None,
    /// Lower half of the cell.
    Bottom,
    /// Upper half of the cell.
    Top,
    /// Left half of the cell.
    Left,
    /// Right half of the cell.
    Right,
}

/// An axis-aligned right triangle occupying part of one tile cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AaTriangle {
    /// Bounding box of the tile cell.
    pub bbox: Rectf,
    /// Which diagonal half is solid.
    pub direction: SlopeDirection,
    /// Half-cell squash for two-cell ramps.
    pub deform: Deform,
}

impl AaTriangle {
    /// Bits of the tile data code selecting the direction.
    pub const DIRECTION_MASK: u16 = 0x0003;
    /// Deform code: triangle in the lower half of the cell.
    pub const DEFORM_BOTTOM: u16 = 0x0010;
    /// Deform code: triangle in the upper half of the cell.
    pub const DEFORM_TOP: u16 = 0x0020;
    /// Deform code: triangle in the left half of the cell.
    pub const DEFORM_LEFT: u16 = 0x0030;
    /// Deform code: triangle in the right half of the cell.
    pub const DEFORM_RIGHT: u16 = 0x0040;
    /// Bits of the tile data code selecting the deform.
    pub const DEFORM_MASK: u16 = 0x0070;

    /// Builds a triangle from explicit parts.
    #[must_use]
    pub const fn new(bbox: Rectf, direction: SlopeDirection, deform: Deform) -> Self {
        Self {
            bbox,
            direction,
            deform,
        }
    }

    /// Decodes a triangle from a tile's raw data code.
    ///
    /// Returns `None` when the deform bits are not one of the five valid
    /// codes; callers treat such tiles as unconstrained (fail open) after
    /// logging, per the engine's data-error policy.
    #[must_use]
    pub fn from_tile(bbox: Rectf, data: u16) -> Option<Self> {
        let direction = match data & Self::DIRECTION_MASK {
            0 => SlopeDirection::Southwest,
            1 => SlopeDirection::Northeast,
            2 => SlopeDirection::Southeast,
            3 => SlopeDirection::Northwest,
            _ => unreachable!(),
        };
        let deform = match data & Self::DEFORM_MASK {
            0 => Deform::None,
            Self::DEFORM_BOTTOM => Deform::Bottom,
            Self::DEFORM_TOP => Deform::Top,
            Self::DEFORM_LEFT => Deform::Left,
            Self::DEFORM_RIGHT => Deform::Right,
            _ => return None,
        };
        Some(Self::new(bbox, direction, deform))
    }

    /// Mirrors a tile data code across the horizontal axis, for grids built
    /// from vertically flipped map data: floor wedges become ceiling wedges
    /// and the half-cell deforms swap top for bottom.
    #[must_use]
    pub const fn vertical_flip(data: u16) -> u16 {
        let direction = (data & Self::DIRECTION_MASK) ^ 0x0003;
        let deform = match data & Self::DEFORM_MASK {
            Self::DEFORM_BOTTOM => Self::DEFORM_TOP,
            Self::DEFORM_TOP => Self::DEFORM_BOTTOM,
            other => other,
        };
        direction | deform | (data & !(Self::DIRECTION_MASK | Self::DEFORM_MASK))
    }

    /// The sub-rectangle of the cell the triangle actually occupies.
    #[must_use]
    fn area(&self) -> Rectf {
        let b = &self.bbox;
        match self.deform {
            Deform::None => *b,
            Deform::Bottom => Rectf::new(
                b.left(),
                b.top() + b.height() / 2.0,
                b.right(),
                b.bottom(),
            ),
            Deform::Top => Rectf::new(
                b.left(),
                b.top(),
                b.right(),
                b.top() + b.height() / 2.0,
            ),
            Deform::Left => Rectf::new(
                b.left(),
                b.top(),
                b.left() + b.width() / 2.0,
                b.bottom(),
            ),
            Deform::Right => Rectf::new(
                b.left() + b.width() / 2.0,
                b.top(),
                b.right(),
                b.bottom(),
            ),
        }
    }
}

/// Normalized plane through `p1` and `p2`, returned as (normal, offset).
/// The normal points to the left of the p1->p2 direction.
fn make_plane(p1: Vec2, p2: Vec2) -> (Vec2, f32) {
    let n = Vec2::new(p2.y - p1.y, p1.x - p2.x);
    let c = -p2.dot(n);
    let len = n.length();
    (n / len, c / len)
}

/// Folds a slope obstacle into the accumulator.
///
/// Measures how deep the body's leading corner sits behind the hypotenuse
/// plane; a body overlapping only the empty half of the cell has negative
/// depth and is left unconstrained. Returns whether the body touched the
/// solid half at all.
pub fn rectangle_triangle_constraints(
    constraints: &mut Constraints,
    rect: &Rectf,
    triangle: &AaTriangle,
) -> bool {
    if !rect.overlaps(&triangle.bbox) {
        return false;
    }

    let area = triangle.area();

    // Leading corner: the rect corner that reaches deepest into the solid
    // half for this orientation.
    let (p1, (normal, c)) = match triangle.direction {
        SlopeDirection::Southwest => (
            Vec2::new(rect.left(), rect.bottom()),
            make_plane(area.p1(), area.p2()),
        ),
        SlopeDirection::Northeast => (
            Vec2::new(rect.right(), rect.top()),
            make_plane(area.p2(), area.p1()),
        ),
        SlopeDirection::Southeast => (
            rect.p2(),
            make_plane(
                Vec2::new(area.left(), area.bottom()),
                Vec2::new(area.right(), area.top()),
            ),
        ),
        SlopeDirection::Northwest => (
            rect.p1(),
            make_plane(
                Vec2::new(area.right(), area.top()),
                Vec2::new(area.left(), area.bottom()),
            ),
        ),
    };

    let depth = -normal.dot(p1) - c;
    if depth < 0.0 {
        return false;
    }

    let outvec = normal * (depth + SLOPE_OUT);

    if p1.x < area.left() - RDELTA
        || p1.x > area.right() + RDELTA
        || p1.y < area.top() - RDELTA
        || p1.y > area.bottom() + RDELTA
    {
        // Leading corner well outside the triangle's cell: the body hit the
        // square back side of the wedge, treat it as a plain box.
        constraints.apply_rect_obstacle(rect, &area);
    } else {
        if outvec.x < 0.0 {
            constraints.constrain_right(rect.right() + outvec.x);
            constraints.hit.right = true;
        } else {
            constraints.constrain_left(rect.left() + outvec.x);
            constraints.hit.left = true;
        }

        if outvec.y < 0.0 {
            constraints.constrain_bottom(rect.bottom() + outvec.y);
            constraints.hit.bottom = true;
        } else {
            constraints.constrain_top(rect.top() + outvec.y);
            constraints.hit.top = true;
        }
        constraints.hit.slope_normal = normal;
    }

    true
}
