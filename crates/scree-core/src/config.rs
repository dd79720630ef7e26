//! Tuning constants for the collision engine.
//!
//! Collision detection is very sensitive to these values: they control how
//! close a body may sit to an obstacle edge before the resolver treats it as
//! "past" the edge rather than blocked by it, and how far off a constraint
//! plane a resolved body is parked so the next frame does not re-classify it
//! as intersecting.
//!
//! All values are expressed in the same world units as tile geometry, so the
//! defaults assume the default 32-unit tile size. Games with a different tile
//! size should scale `shift_delta` along with `tile_size`.

use serde::{Deserialize, Serialize};

/// Default edge length of a square tile cell, in world units.
pub const DEFAULT_TILE_SIZE: f32 = 32.0;

/// Default edge slack: intersections shallower than this are shifted out
/// sideways instead of blocking, so bodies slide past tile seams.
pub const DEFAULT_SHIFT_DELTA: f32 = 7.0;

/// Default flush-snap slack subtracted when parking a body against a
/// constraint plane.
pub const DEFAULT_DELTA: f32 = 0.002;

/// Default per-step displacement clamp, in world units.
pub const DEFAULT_MAX_SPEED: f32 = 16.0;

/// Default number of constraint-propagation iterations per resolution phase.
pub const DEFAULT_ITERATIONS: u32 = 2;

/// Tuning parameters for one [`CollisionWorld`](crate::world::CollisionWorld).
///
/// The iteration bound is empirically chosen, not derived: two passes are
/// sufficient for displacements up to `max_speed` against 32-unit tiles.
/// Bodies moving very fast relative to the tile size may still tunnel; that
/// is an accepted limitation of the discrete resolver, not something to fix
/// by raising `iterations`.
///
/// # Example
///
/// ```
/// use scree_core::config::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.tile_size, 32.0);
/// assert_eq!(config.iterations, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Edge length of a square tile cell, in world units.
    pub tile_size: f32,
    /// Edge slack below which an intersection is shifted out sideways
    /// instead of blocking.
    pub shift_delta: f32,
    /// Flush-snap slack kept between a resolved body and the constraint
    /// plane it was pushed against.
    pub delta: f32,
    /// Per-step displacement clamp. Requested movements longer than this are
    /// scaled down before resolution.
    pub max_speed: f32,
    /// Constraint-propagation iterations per resolution phase.
    pub iterations: u32,
}

impl EngineConfig {
    /// Half a tile cell; the pressure threshold above which a squeezed body
    /// reports a crush rather than a plain two-sided contact.
    #[must_use]
    pub fn crush_threshold(&self) -> f32 {
        self.tile_size / 2.0
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            shift_delta: DEFAULT_SHIFT_DELTA,
            delta: DEFAULT_DELTA,
            max_speed: DEFAULT_MAX_SPEED,
            iterations: DEFAULT_ITERATIONS,
        }
    }
}
