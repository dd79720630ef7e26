//! # Scree Core
//!
//! Tile and body collision resolution for 2D platformers.
//!
//! This crate provides the per-frame movement resolution loop of a
//! platformer: axis-aligned bodies move through a world of solid tile
//! layers (including slopes and one-way platforms) and other bodies, and
//! every frame each body's requested displacement is clamped against that
//! geometry and reported back through callbacks.
//!
//! ## Architecture
//!
//! - **Geometry**: [`geom::Rectf`] boxes and [`geom::AaTriangle`] slope
//!   wedges, plus the [`constraints::Constraints`] accumulator that folds
//!   obstacles into position bounds
//! - **World data**: [`tilemap::SolidLayer`] tile layers and
//!   [`body::BodyState`] bodies grouped by [`body::CollisionGroup`]
//! - **Resolution**: [`world::CollisionWorld::update`] runs the fixed pass
//!   order and reports contacts through [`hooks::CollisionHooks`]
//!
//! ## Usage
//!
//! ```rust
//! use glam::Vec2;
//! use scree_core::{
//!     CollisionGroup, CollisionWorld, EngineConfig, NullHooks, Rectf, Tile, TileAttributes,
//!     TileGrid,
//! };
//!
//! let mut grid = TileGrid::empty(8, 8, Vec2::ZERO, 32.0).unwrap();
//! for x in 0..8 {
//!     grid.set_tile(x, 4, Tile::new(TileAttributes::SOLID, 0));
//! }
//!
//! let mut world = CollisionWorld::new(EngineConfig::default());
//! world.add_layer(grid);
//!
//! let player = world.spawn(Rectf::new(0.0, 96.0, 24.0, 128.0), CollisionGroup::Moving);
//! world.set_movement(player, Vec2::new(0.0, 10.0)); // falls onto the floor
//! world.update(&mut NullHooks);
//!
//! let resolved = world.body(player).unwrap();
//! assert!(resolved.bbox.bottom() <= 128.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod body;
pub mod config;
pub mod constraints;
pub mod geom;
pub mod hit;
pub mod hooks;
pub mod tile;
pub mod tilemap;
pub mod world;

pub use body::{BodyId, BodyState, CollisionGroup};
pub use config::EngineConfig;
pub use constraints::Constraints;
pub use geom::{AaTriangle, Rectf};
pub use hit::{CollisionHit, HitResponse};
pub use hooks::{CollisionHooks, NullHooks};
pub use tile::{Tile, TileAttributes};
pub use tilemap::{GridError, SolidLayer, TileGrid};
pub use world::{CollisionWorld, RaycastHit, RaycastResult};

#[cfg(test)]
mod tests;
