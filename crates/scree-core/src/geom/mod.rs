//! Geometry primitives for collision resolution.
//!
//! Everything in this module is a pure function over value types: no shared
//! mutable state, safe to evaluate for many bodies concurrently.
//!
//! - [`Rectf`]: axis-aligned rectangle in world coordinates (y grows down)
//! - [`AaTriangle`]: axis-aligned right triangle occupying half a tile cell

pub mod rect;
pub mod triangle;

pub use rect::{line_intersects_line, Rectf};
pub use triangle::{rectangle_triangle_constraints, AaTriangle, Deform, SlopeDirection};
