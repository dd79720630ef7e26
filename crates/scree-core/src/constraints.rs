//! The constraint accumulator used by the static collision passes.
//!
//! A [`Constraints`] value collects the tightest allowed position bounds for
//! one body across every obstacle touched during one resolution sub-pass.
//! It is created fresh at the start of a sub-pass, mutated by every obstacle
//! test, and consumed once when the destination box is clamped.
//!
//! Invariant: bounds only ever tighten within a pass. `constrain_left` and
//! `constrain_top` take the maximum of the stored and offered positions,
//! `constrain_right` and `constrain_bottom` the minimum; nothing loosens a
//! bound once set.

use glam::Vec2;

use crate::geom::Rectf;
use crate::hit::CollisionHit;

/// The side of the moving body a rectangular obstacle fold resolved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldSide {
    /// Constrained the body's left edge.
    Left,
    /// Constrained the body's right edge.
    Right,
    /// Constrained the body's top edge.
    Top,
    /// Constrained the body's bottom edge.
    Bottom,
}

/// Tightest allowed bounds for one body during one resolution sub-pass.
///
/// `position_left` is the smallest x the body's left edge may take (a wall
/// to the body's left pushes it up), `position_bottom` the largest y its
/// bottom edge may take, and so on. Bounds start at ±infinity, meaning
/// unconstrained.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraints {
    position_left: f32,
    position_right: f32,
    position_top: f32,
    position_bottom: f32,
    /// Velocity of whatever the body is standing on, accumulated so riding
    /// moving platforms is drift-free.
    pub ground_movement: Vec2,
    /// Side flags accumulated across all obstacle tests in this pass.
    pub hit: CollisionHit,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            position_left: f32::NEG_INFINITY,
            position_right: f32::INFINITY,
            position_top: f32::NEG_INFINITY,
            position_bottom: f32::INFINITY,
            ground_movement: Vec2::ZERO,
            hit: CollisionHit::default(),
        }
    }
}

impl Constraints {
    /// Fresh, fully unconstrained accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the body's left edge to be at `position` or further right.
    pub fn constrain_left(&mut self, position: f32) {
        self.position_left = self.position_left.max(position);
    }

    /// Requires the body's right edge to be at `position` or further left.
    pub fn constrain_right(&mut self, position: f32) {
        self.position_right = self.position_right.min(position);
    }

    /// Requires the body's top edge to be at `position` or further down.
    pub fn constrain_top(&mut self, position: f32) {
        self.position_top = self.position_top.max(position);
    }

    /// Requires the body's bottom edge to be at `position` or further up.
    pub fn constrain_bottom(&mut self, position: f32) {
        self.position_bottom = self.position_bottom.min(position);
    }

    /// Lower bound for the body's left edge; `-inf` when unconstrained.
    #[must_use]
    pub const fn position_left(&self) -> f32 {
        self.position_left
    }

    /// Upper bound for the body's right edge; `+inf` when unconstrained.
    #[must_use]
    pub const fn position_right(&self) -> f32 {
        self.position_right
    }

    /// Lower bound for the body's top edge; `-inf` when unconstrained.
    #[must_use]
    pub const fn position_top(&self) -> f32 {
        self.position_top
    }

    /// Upper bound for the body's bottom edge; `+inf` when unconstrained.
    #[must_use]
    pub const fn position_bottom(&self) -> f32 {
        self.position_bottom
    }

    /// Whether either horizontal bound has been tightened.
    #[must_use]
    pub fn has_horizontal_constraints(&self) -> bool {
        self.position_left > f32::NEG_INFINITY || self.position_right < f32::INFINITY
    }

    /// Whether either vertical bound has been tightened.
    #[must_use]
    pub fn has_vertical_constraints(&self) -> bool {
        self.position_top > f32::NEG_INFINITY || self.position_bottom < f32::INFINITY
    }

    /// Whether any bound has been tightened.
    #[must_use]
    pub fn has_constraints(&self) -> bool {
        self.has_horizontal_constraints() || self.has_vertical_constraints()
    }

    /// Vertical room left between the top and bottom bounds. Infinite unless
    /// both are set, so an unconstrained axis never reads as a crush.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.position_bottom - self.position_top
    }

    /// Horizontal room left between the left and right bounds.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.position_right - self.position_left
    }

    /// Midpoint of the horizontal bounds; the body is centered here when it
    /// fits between two walls.
    #[must_use]
    pub fn x_midpoint(&self) -> f32 {
        0.5 * (self.position_left + self.position_right)
    }

    /// Folds a plain rectangular obstacle into the accumulator, resolving
    /// along whichever axis has the shallower penetration. Exactly one bound
    /// and one hit flag are tightened per call, never both axes. Returns the
    /// side the fold resolved on.
    ///
    /// `moving` is the body's current (destination) box, `obstacle` the
    /// solid box it overlaps.
    pub fn apply_rect_obstacle(&mut self, moving: &Rectf, obstacle: &Rectf) -> FoldSide {
        let itop = moving.bottom() - obstacle.top();
        let ibottom = obstacle.bottom() - moving.top();
        let ileft = moving.right() - obstacle.left();
        let iright = obstacle.right() - moving.left();

        let vert_penetration = itop.min(ibottom);
        let horiz_penetration = ileft.min(iright);
        if vert_penetration < horiz_penetration {
            if itop < ibottom {
                self.constrain_bottom(obstacle.top());
                self.hit.bottom = true;
                FoldSide::Bottom
            } else {
                self.constrain_top(obstacle.bottom());
                self.hit.top = true;
                FoldSide::Top
            }
        } else if ileft < iright {
            self.constrain_right(obstacle.left());
            self.hit.right = true;
            FoldSide::Right
        } else {
            self.constrain_left(obstacle.right());
            self.hit.left = true;
            FoldSide::Left
        }
    }
}
