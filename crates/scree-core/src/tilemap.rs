//! Solid tile layers: the engine's read-only view of level geometry.
//!
//! The engine never owns level data; it consumes any number of
//! [`SolidLayer`] implementations and OR-combines their attributes. The
//! crate ships [`TileGrid`], a plain dense grid, which is what levels and
//! the test suite use; games with streamed or procedural geometry implement
//! the trait themselves.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geom::Rectf;
use crate::tile::Tile;

/// A half-open range of grid cells, in cell coordinates.
///
/// Iteration covers `left..right` by `top..bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellRange {
    /// First column.
    pub left: i32,
    /// First row.
    pub top: i32,
    /// One past the last column.
    pub right: i32,
    /// One past the last row.
    pub bottom: i32,
}

impl CellRange {
    /// Range covering no cells.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            left: 0,
            top: 0,
            right: 0,
            bottom: 0,
        }
    }

    /// Whether the range covers no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }
}

/// A tile layer that participates in physical collision.
///
/// This is the seam to the level/tilemap collaborator: the engine only needs
/// cell lookup, cell geometry, and the layer's own per-frame movement (for
/// tilemaps that ride paths and carry bodies standing on them).
pub trait SolidLayer {
    /// The cells overlapping a world-space rectangle, clamped to the layer's
    /// extent.
    fn tiles_overlapping(&self, rect: &Rectf) -> CellRange;

    /// The tile at cell `(x, y)`; [`Tile::EMPTY`] outside the layer.
    fn tile(&self, x: i32, y: i32) -> Tile;

    /// World-space bounding box of cell `(x, y)`.
    fn tile_bbox(&self, x: i32, y: i32) -> Rectf;

    /// The layer's movement this frame; zero for ordinary static layers.
    fn movement(&self) -> Vec2 {
        Vec2::ZERO
    }
}

/// Construction errors for [`TileGrid`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// The tile vector does not hold `width * height` entries.
    #[error("tile data holds {found} cells, expected {width}x{height} = {expected}")]
    DimensionMismatch {
        /// Grid width in cells.
        width: u32,
        /// Grid height in cells.
        height: u32,
        /// `width * height`.
        expected: usize,
        /// Actual vector length.
        found: usize,
    },
    /// The tile size is zero, negative, or non-finite.
    #[error("tile size must be a positive finite number")]
    BadTileSize,
}

/// A dense, row-major grid of tiles with a world-space offset.
///
/// # Example
///
/// ```
/// use scree_core::tile::{Tile, TileAttributes};
/// use scree_core::tilemap::{SolidLayer, TileGrid};
/// use glam::Vec2;
///
/// let solid = Tile::new(TileAttributes::SOLID, 0);
/// let grid = TileGrid::new(2, 1, Vec2::ZERO, 32.0, vec![solid, Tile::EMPTY]).unwrap();
/// assert!(grid.tile(0, 0).is_solid());
/// assert!(!grid.tile(1, 0).is_solid());
/// assert!(!grid.tile(5, 9).is_solid()); // out of range reads as empty
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    width: u32,
    height: u32,
    offset: Vec2,
    tile_size: f32,
    tiles: Vec<Tile>,
    movement: Vec2,
}

impl TileGrid {
    /// Creates a grid from row-major tile data.
    ///
    /// # Errors
    ///
    /// [`GridError::DimensionMismatch`] when `tiles.len() != width * height`,
    /// [`GridError::BadTileSize`] when `tile_size` is not positive and finite.
    pub fn new(
        width: u32,
        height: u32,
        offset: Vec2,
        tile_size: f32,
        tiles: Vec<Tile>,
    ) -> Result<Self, GridError> {
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(GridError::BadTileSize);
        }
        let expected = width as usize * height as usize;
        if tiles.len() != expected {
            return Err(GridError::DimensionMismatch {
                width,
                height,
                expected,
                found: tiles.len(),
            });
        }
        Ok(Self {
            width,
            height,
            offset,
            tile_size,
            tiles,
            movement: Vec2::ZERO,
        })
    }

    /// Creates an all-empty grid.
    ///
    /// # Errors
    ///
    /// [`GridError::BadTileSize`] when `tile_size` is not positive and finite.
    pub fn empty(
        width: u32,
        height: u32,
        offset: Vec2,
        tile_size: f32,
    ) -> Result<Self, GridError> {
        let tiles = vec![Tile::EMPTY; width as usize * height as usize];
        Self::new(width, height, offset, tile_size, tiles)
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Replaces the tile at `(x, y)`. Writes outside the grid are ignored.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) {
        if x >= 0 && (x as u32) < self.width && y >= 0 && (y as u32) < self.height {
            self.tiles[y as usize * self.width as usize + x as usize] = tile;
        }
    }

    /// Sets the layer's movement for the current frame. Bodies standing on
    /// the layer are carried along by the resolver.
    pub fn set_movement(&mut self, movement: Vec2) {
        self.movement = movement;
    }
}

impl SolidLayer for TileGrid {
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn tiles_overlapping(&self, rect: &Rectf) -> CellRange {
        let inv = 1.0 / self.tile_size;
        let left = ((rect.left() - self.offset.x) * inv).floor();
        let top = ((rect.top() - self.offset.y) * inv).floor();
        let right = ((rect.right() - self.offset.x) * inv).floor() + 1.0;
        let bottom = ((rect.bottom() - self.offset.y) * inv).floor() + 1.0;
        if !(left.is_finite() && top.is_finite() && right.is_finite() && bottom.is_finite()) {
            return CellRange::empty();
        }
        CellRange {
            left: (left.max(0.0) as i32).min(self.width as i32),
            top: (top.max(0.0) as i32).min(self.height as i32),
            right: (right.max(0.0) as i32).min(self.width as i32),
            bottom: (bottom.max(0.0) as i32).min(self.height as i32),
        }
    }

    fn tile(&self, x: i32, y: i32) -> Tile {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return Tile::EMPTY;
        }
        self.tiles[y as usize * self.width as usize + x as usize]
    }

    fn tile_bbox(&self, x: i32, y: i32) -> Rectf {
        #[allow(clippy::cast_precision_loss)]
        let pos = self.offset + Vec2::new(x as f32, y as f32) * self.tile_size;
        Rectf::from_pos_size(pos, Vec2::splat(self.tile_size))
    }

    fn movement(&self) -> Vec2 {
        self.movement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileAttributes;

    fn solid() -> Tile {
        Tile::new(TileAttributes::SOLID, 0)
    }

    #[test]
    fn construction_validates_dimensions() {
        let err = TileGrid::new(2, 2, Vec2::ZERO, 32.0, vec![Tile::EMPTY; 3]).unwrap_err();
        assert_eq!(
            err,
            GridError::DimensionMismatch {
                width: 2,
                height: 2,
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn construction_validates_tile_size() {
        assert_eq!(
            TileGrid::new(1, 1, Vec2::ZERO, 0.0, vec![Tile::EMPTY]).unwrap_err(),
            GridError::BadTileSize
        );
        assert_eq!(
            TileGrid::new(1, 1, Vec2::ZERO, f32::NAN, vec![Tile::EMPTY]).unwrap_err(),
            GridError::BadTileSize
        );
    }

    #[test]
    fn out_of_range_reads_are_empty() {
        let grid = TileGrid::new(1, 1, Vec2::ZERO, 32.0, vec![solid()]).unwrap();
        assert_eq!(grid.tile(-1, 0), Tile::EMPTY);
        assert_eq!(grid.tile(0, 1), Tile::EMPTY);
        assert!(grid.tile(0, 0).is_solid());
    }

    #[test]
    fn set_tile_outside_grid_is_ignored() {
        let mut grid = TileGrid::empty(1, 1, Vec2::ZERO, 32.0).unwrap();
        grid.set_tile(5, 5, solid());
        grid.set_tile(-1, 0, solid());
        assert_eq!(grid.tile(0, 0), Tile::EMPTY);
    }

    #[test]
    fn tile_bbox_respects_offset_and_size() {
        let grid = TileGrid::empty(4, 4, Vec2::new(64.0, -32.0), 32.0).unwrap();
        assert_eq!(grid.tile_bbox(1, 2), Rectf::new(96.0, 32.0, 128.0, 64.0));
    }

    #[test]
    fn tiles_overlapping_covers_touched_cells() {
        let grid = TileGrid::empty(10, 10, Vec2::ZERO, 32.0).unwrap();
        // rect spanning cells (0,0) through (1,1)
        let range = grid.tiles_overlapping(&Rectf::new(10.0, 10.0, 40.0, 40.0));
        assert_eq!(
            range,
            CellRange {
                left: 0,
                top: 0,
                right: 2,
                bottom: 2
            }
        );
    }

    #[test]
    fn tiles_overlapping_clamps_to_grid() {
        let grid = TileGrid::empty(4, 4, Vec2::ZERO, 32.0).unwrap();
        let range = grid.tiles_overlapping(&Rectf::new(-100.0, -100.0, 1000.0, 1000.0));
        assert_eq!(
            range,
            CellRange {
                left: 0,
                top: 0,
                right: 4,
                bottom: 4
            }
        );
    }

    #[test]
    fn rect_outside_grid_yields_empty_range() {
        let grid = TileGrid::empty(4, 4, Vec2::ZERO, 32.0).unwrap();
        let range = grid.tiles_overlapping(&Rectf::new(500.0, 500.0, 600.0, 600.0));
        assert!(range.is_empty());
    }

    #[test]
    fn serialization_roundtrip() {
        let mut grid = TileGrid::empty(2, 2, Vec2::new(8.0, 8.0), 16.0).unwrap();
        grid.set_tile(1, 1, solid());
        let json = serde_json::to_string(&grid).unwrap();
        let back: TileGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
    }
}
