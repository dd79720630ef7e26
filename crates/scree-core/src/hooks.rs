//! The callback seam between the resolver and game logic.

use crate::body::BodyId;
use crate::hit::{CollisionHit, HitResponse};
use crate::tile::TileAttributes;

/// Game-side collision callbacks.
///
/// One hooks value is passed to [`CollisionWorld::update`] per frame and
/// receives every contact the resolver finds, identified by [`BodyId`]. The
/// game keeps its own object state outside the engine and maps ids back to
/// objects however it likes.
///
/// All methods have neutral defaults, so an implementation only overrides
/// what it cares about.
///
/// [`CollisionWorld::update`]: crate::world::CollisionWorld::update
pub trait CollisionHooks {
    /// The body's movement was clamped by solid geometry (tiles or static
    /// bodies). `hit` carries the constrained sides from the body's own
    /// perspective, plus crush and slope normal.
    fn collision_solid(&mut self, body: BodyId, hit: &CollisionHit) {
        let _ = (body, hit);
    }

    /// The body overlaps tiles carrying reportable attributes this frame.
    /// Called at most once per body per frame with the OR of all flags.
    fn collision_tile(&mut self, body: BodyId, attributes: TileAttributes) {
        let _ = (body, attributes);
    }

    /// Pre-filter for a body-vs-body contact. Returning `false` makes the
    /// pair pass through each other this frame; neither body is notified or
    /// displaced. Called before [`collision`](Self::collision), for both
    /// orderings of the pair.
    fn collides(&self, body: BodyId, other: BodyId, hit: &CollisionHit) -> bool {
        let _ = (body, other, hit);
        true
    }

    /// A confirmed body-vs-body contact, from `body`'s perspective. The
    /// returned response steers how the pair is separated.
    fn collision(&mut self, body: BodyId, other: BodyId, hit: &CollisionHit) -> HitResponse {
        let _ = (body, other, hit);
        HitResponse::Continue
    }
}

/// Hooks that accept every contact and do nothing. Useful for tests and for
/// worlds that only need geometry resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHooks;

impl CollisionHooks for NullHooks {}
