//! Whole-frame tests: worlds built from ASCII maps, driven through
//! [`CollisionWorld::update`](crate::world::CollisionWorld::update) and
//! observed through recording hooks.

mod helpers;
