//! Hit descriptors exchanged between the resolver and game objects.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// The sides on which a body was constrained during one frame, from the
/// body's own perspective: `bottom` means the body's bottom edge touched
/// something (it is standing on an obstacle).
///
/// `crush` is set when the body was constrained on two opposing sides to
/// less than its own extent; crush takes precedence over plain directional
/// contact on the same axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CollisionHit {
    /// Contact on the body's left side.
    pub left: bool,
    /// Contact on the body's right side.
    pub right: bool,
    /// Contact on the body's top side.
    pub top: bool,
    /// Contact on the body's bottom side.
    pub bottom: bool,
    /// The body was squeezed between opposing obstacles.
    pub crush: bool,
    /// Surface normal of the last slope touched, zero when no slope was
    /// involved.
    pub slope_normal: Vec2,
}

impl CollisionHit {
    /// True when any side flag or the crush flag is set.
    #[must_use]
    pub const fn is_any(&self) -> bool {
        self.left || self.right || self.top || self.bottom || self.crush
    }

    /// The same hit seen from the other body's perspective: left and right
    /// swap, top and bottom swap. Crush and slope normal are unchanged.
    #[must_use]
    pub const fn swapped(&self) -> Self {
        Self {
            left: self.right,
            right: self.left,
            top: self.bottom,
            bottom: self.top,
            crush: self.crush,
            slope_normal: self.slope_normal,
        }
    }
}

/// How a body wants the resolver to proceed after a body-vs-body contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitResponse {
    /// Keep resolving: the body accepts a separation push.
    Continue,
    /// Stop: the contact consumed the movement (e.g. a static obstacle hit),
    /// apply no separation to either body.
    AbortMove,
    /// The body insists on its path; only the other body is pushed.
    ForceMove,
}
