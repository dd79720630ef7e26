//! Per-cell tile attributes and the one-way platform gate.

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geom::Rectf;

bitflags! {
    /// Collision attributes of one tile cell, OR-combined across all solid
    /// layers overlapping the cell.
    ///
    /// The low byte holds flags that influence movement resolution; the high
    /// byte holds "interesting" flags that never block movement but are
    /// reported to the body through the tile-contact callback.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct TileAttributes: u32 {
        /// Blocks movement.
        const SOLID = 0x0001;
        /// Blocks movement only when approached from above while falling.
        const UNISOLID = 0x0002;
        /// Breakable block; solid until the game decides otherwise.
        const BRICK = 0x0004;
        /// Collectible marker.
        const COIN = 0x0008;
        /// The solid region is a triangle described by the tile data code.
        const SLOPE = 0x0010;
        /// Container block with contents.
        const FULLBOX = 0x0020;
        /// Hidden-area marker.
        const SECRET = 0x0040;
        /// Level-goal marker.
        const GOAL = 0x0080;
        /// Slippery surface.
        const ICE = 0x0100;
        /// Swimmable.
        const WATER = 0x0200;
        /// Damages bodies standing in it.
        const HURTS = 0x0400;
        /// Burns bodies standing in it.
        const FIRE = 0x0800;

        /// Flags worth reporting through the tile-contact callback.
        const INTERESTING = Self::ICE.bits()
            | Self::WATER.bits()
            | Self::HURTS.bits()
            | Self::FIRE.bits();
    }
}

/// One cell of a solid layer: its attribute flags plus the raw data code
/// (slope orientation for [`SLOPE`](TileAttributes::SLOPE) tiles).
///
/// # Example
///
/// ```
/// use scree_core::tile::{Tile, TileAttributes};
///
/// let floor = Tile::new(TileAttributes::SOLID, 0);
/// assert!(floor.is_solid());
/// assert!(!floor.is_slope());
/// assert!(!Tile::EMPTY.is_solid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tile {
    attributes: TileAttributes,
    data: u16,
}

impl Tile {
    /// A cell with no attributes at all.
    pub const EMPTY: Tile = Tile {
        attributes: TileAttributes::empty(),
        data: 0,
    };

    /// Creates a tile from attributes and a raw data code.
    #[must_use]
    pub const fn new(attributes: TileAttributes, data: u16) -> Self {
        Self { attributes, data }
    }

    /// All attribute flags of this cell.
    #[must_use]
    pub const fn attributes(&self) -> TileAttributes {
        self.attributes
    }

    /// Raw data code; slope orientation for slope tiles.
    #[must_use]
    pub const fn data(&self) -> u16 {
        self.data
    }

    /// Whether this cell can block movement at all. Unisolid cells pass a
    /// further gate, see [`unisolid_blocks`].
    #[must_use]
    pub const fn is_solid(&self) -> bool {
        self.attributes.contains(TileAttributes::SOLID)
    }

    /// Whether this cell is a one-way platform.
    #[must_use]
    pub const fn is_unisolid(&self) -> bool {
        self.attributes.contains(TileAttributes::UNISOLID)
    }

    /// Whether this cell's solid region is a triangle.
    #[must_use]
    pub const fn is_slope(&self) -> bool {
        self.attributes.contains(TileAttributes::SLOPE)
    }
}

/// The one-way platform gate.
///
/// A unisolid tile blocks only when both hold:
/// - the body's movement relative to the layer is downward (or zero, so a
///   body at rest on the platform stays supported), and
/// - the body's bottom edge starts at or above the tile top, within
///   `shift_delta` of slack.
///
/// This lets bodies jump up through the platform and keeps bodies already
/// embedded from the side from being ejected.
#[must_use]
pub fn unisolid_blocks(
    shift_delta: f32,
    tile_bbox: &Rectf,
    body_rect: &Rectf,
    relative_movement: Vec2,
) -> bool {
    if relative_movement.y < 0.0 {
        return false;
    }
    body_rect.bottom() <= tile_bbox.top() + shift_delta
}
