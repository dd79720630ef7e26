//! Bodies: the moving rectangles the engine resolves against the world.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geom::Rectf;

/// Unique identifier for a body registered with a collision world.
///
/// Identifiers are allocated by the world and never reused within one
/// world's lifetime, so a stale id after a despawn simply misses.
///
/// # Example
///
/// ```
/// use scree_core::body::BodyId;
///
/// let id = BodyId::new(42);
/// assert_eq!(id.as_u64(), 42);
/// assert_eq!(format!("{id}"), "body-42");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct BodyId(u64);

impl BodyId {
    /// Creates a body id from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body-{}", self.0)
    }
}

impl From<u64> for BodyId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Collision behaviour class of a body. The group decides which of the
/// frame's passes a body takes part in and which pairs are ever tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionGroup {
    /// Does not collide at all.
    Disabled,
    /// Resolved against tiles and static bodies, tested against moving
    /// bodies and touchables. Platforms and pushable blocks live here; they
    /// behave as obstacles to the moving group but still get resolved
    /// themselves.
    MovingStatic,
    /// The ordinary moving object: resolved against tiles, statics and
    /// moving-statics, tested against other moving bodies and touchables.
    Moving,
    /// Like [`Moving`](CollisionGroup::Moving) but skipped in the
    /// moving-vs-moving pass; only the world's solid geometry stops it.
    MovingOnlyStatic,
    /// An immovable obstacle. Never moved by the resolver, never receives
    /// tile attribute callbacks.
    Static,
    /// A pure sensor: overlaps are reported through the callbacks but no
    /// body is ever displaced by it.
    Touchable,
}

impl CollisionGroup {
    /// Whether bodies of this group get the static resolution pass (tiles,
    /// statics and moving-statics clamp their movement).
    #[must_use]
    pub const fn moves_against_world(&self) -> bool {
        matches!(
            self,
            Self::MovingStatic | Self::Moving | Self::MovingOnlyStatic
        )
    }

    /// Whether bodies of this group act as obstacles during another body's
    /// static resolution pass.
    #[must_use]
    pub const fn blocks_as_obstacle(&self) -> bool {
        matches!(self, Self::Static | Self::MovingStatic)
    }

    /// Whether bodies of this group take part in the moving-vs-moving pass.
    #[must_use]
    pub const fn collides_with_moving(&self) -> bool {
        matches!(self, Self::MovingStatic | Self::Moving)
    }
}

/// The engine-owned state of one registered body.
///
/// Games drive a body by writing `movement` each frame (the displacement it
/// wants this frame, not a velocity) and reading back `bbox` after the world
/// update. The resolver owns `bbox` between updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    /// Current world-space bounding box.
    pub bbox: Rectf,
    /// Desired displacement for the current frame. Zeroed by the world once
    /// the frame is committed.
    pub movement: Vec2,
    /// Collision behaviour class.
    pub group: CollisionGroup,
    /// One-way body: blocks other bodies only when they land on its top
    /// edge, like a unisolid tile. The usual shape of a moving platform.
    pub unisolid: bool,
    /// Total movement the body was pushed by this frame's moving-vs-moving
    /// separations, on top of its own movement.
    pub pushed: Vec2,
}

impl BodyState {
    /// Creates a body at `bbox` with no pending movement.
    #[must_use]
    pub fn new(bbox: Rectf, group: CollisionGroup) -> Self {
        Self {
            bbox,
            movement: Vec2::ZERO,
            group,
            unisolid: false,
            pushed: Vec2::ZERO,
        }
    }

    /// The box the body is asking to occupy this frame.
    #[must_use]
    pub fn desired_bbox(&self) -> Rectf {
        self.bbox.translated(self.movement)
    }
}
