//! Shared fixtures for the whole-frame tests.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;

use crate::body::BodyId;
use crate::hit::{CollisionHit, HitResponse};
use crate::hooks::CollisionHooks;
use crate::tile::{Tile, TileAttributes};
use crate::tilemap::TileGrid;

/// Builds a 32-unit tile grid from ASCII rows.
///
/// Legend: `#` solid, `^` one-way platform, `/` floor slope rising to the
/// right, `\` floor slope rising to the left, `i` icy floor, `w` water,
/// anything else empty.
pub fn grid_from_ascii(rows: &[&str]) -> TileGrid {
    let height = rows.len() as u32;
    let width = rows[0].len() as u32;
    let mut tiles = Vec::with_capacity((width * height) as usize);
    for row in rows {
        assert_eq!(row.len() as u32, width, "ragged ascii map");
        for ch in row.chars() {
            tiles.push(match ch {
                '#' => Tile::new(TileAttributes::SOLID, 0),
                '^' => Tile::new(TileAttributes::SOLID | TileAttributes::UNISOLID, 0),
                // southeast wedge: solid bottom-right half
                '/' => Tile::new(TileAttributes::SOLID | TileAttributes::SLOPE, 2),
                // southwest wedge: solid bottom-left half
                '\\' => Tile::new(TileAttributes::SOLID | TileAttributes::SLOPE, 0),
                'i' => Tile::new(TileAttributes::SOLID | TileAttributes::ICE, 0),
                'w' => Tile::new(TileAttributes::WATER, 0),
                _ => Tile::EMPTY,
            });
        }
    }
    TileGrid::new(width, height, Vec2::ZERO, 32.0, tiles).expect("ascii map dimensions")
}

/// Hooks that record every callback and answer with configurable responses.
#[derive(Debug, Default)]
pub struct RecordingHooks {
    /// Every `collision_solid` call, in order.
    pub solid_hits: Vec<(BodyId, CollisionHit)>,
    /// Every `collision_tile` call, in order.
    pub tile_contacts: Vec<(BodyId, TileAttributes)>,
    /// Every `collision` call, in order.
    pub pair_contacts: Vec<(BodyId, BodyId, CollisionHit)>,
    /// Response returned from `collision` for the given body; `Continue`
    /// when absent.
    pub responses: BTreeMap<BodyId, HitResponse>,
    /// Ordered pairs for which `collides` answers `false`.
    pub refusals: BTreeSet<(BodyId, BodyId)>,
}

impl RecordingHooks {
    /// All solid hits reported for one body.
    pub fn solid_hits_for(&self, id: BodyId) -> Vec<CollisionHit> {
        self.solid_hits
            .iter()
            .filter(|(hit_id, _)| *hit_id == id)
            .map(|(_, hit)| *hit)
            .collect()
    }

    /// The last solid hit reported for one body.
    pub fn last_solid_hit(&self, id: BodyId) -> Option<CollisionHit> {
        self.solid_hits_for(id).last().copied()
    }

    /// OR of all tile attributes reported for one body.
    pub fn tile_attributes_for(&self, id: BodyId) -> TileAttributes {
        self.tile_contacts
            .iter()
            .filter(|(tile_id, _)| *tile_id == id)
            .fold(TileAttributes::empty(), |acc, (_, attrs)| acc | *attrs)
    }

    /// Whether `collision` was called for the ordered pair.
    pub fn saw_pair(&self, body: BodyId, other: BodyId) -> bool {
        self.pair_contacts
            .iter()
            .any(|(a, b, _)| *a == body && *b == other)
    }
}

impl CollisionHooks for RecordingHooks {
    fn collision_solid(&mut self, body: BodyId, hit: &CollisionHit) {
        self.solid_hits.push((body, *hit));
    }

    fn collision_tile(&mut self, body: BodyId, attributes: TileAttributes) {
        self.tile_contacts.push((body, attributes));
    }

    fn collides(&self, body: BodyId, other: BodyId, _hit: &CollisionHit) -> bool {
        !self.refusals.contains(&(body, other))
    }

    fn collision(&mut self, body: BodyId, other: BodyId, hit: &CollisionHit) -> HitResponse {
        self.pair_contacts.push((body, other, *hit));
        self.responses
            .get(&body)
            .copied()
            .unwrap_or(HitResponse::Continue)
    }
}
