//! The collision world: body registry, frame resolution, and spatial queries.
//!
//! One [`CollisionWorld`] owns the solid layers and every registered body.
//! Games write each body's desired movement, call [`CollisionWorld::update`]
//! once per fixed step, and read the resolved boxes back. All contact
//! reporting goes through the [`CollisionHooks`] value passed to `update`.
//!
//! A frame runs in a fixed order:
//!
//! 1. destination boxes are computed from the (speed-clamped) movements,
//! 2. every moving body is clamped against tiles and static bodies,
//! 3. tile attributes under each moving body are reported,
//! 4. moving bodies are tested against touchables,
//! 5. moving bodies are separated from each other,
//! 6. the destination boxes are committed and movements zeroed.
//!
//! Bodies are stored in a `BTreeMap` keyed by id, so every pass visits them
//! in spawn order and two identical worlds resolve identically.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use glam::Vec2;
use tracing::warn;

use crate::body::{BodyId, BodyState, CollisionGroup};
use crate::config::EngineConfig;
use crate::constraints::{Constraints, FoldSide};
use crate::geom::{rectangle_triangle_constraints, AaTriangle, Rectf};
use crate::hit::{CollisionHit, HitResponse};
use crate::hooks::CollisionHooks;
use crate::tile::{unisolid_blocks, Tile, TileAttributes};
use crate::tilemap::{SolidLayer, TileGrid};

/// Collision resolution for one sector's worth of bodies and tile layers.
///
/// The layer type is generic so games keep full access to their own layer
/// representation through [`layers_mut`](Self::layers_mut); it defaults to
/// the crate's [`TileGrid`].
pub struct CollisionWorld<L: SolidLayer = TileGrid> {
    config: EngineConfig,
    bodies: BTreeMap<BodyId, BodyState>,
    layers: Vec<L>,
    next_id: u64,
    logged_bad_slopes: BTreeSet<u16>,
    logged_bad_bodies: BTreeSet<BodyId>,
}

impl<L: SolidLayer> fmt::Debug for CollisionWorld<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollisionWorld")
            .field("config", &self.config)
            .field("bodies", &self.bodies.len())
            .field("layers", &self.layers.len())
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl<L: SolidLayer> Default for CollisionWorld<L> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// What a line query struck.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RaycastHit {
    /// A solid tile.
    Tile(Tile),
    /// An obstacle body.
    Body(BodyId),
}

/// The first obstruction found by
/// [`CollisionWorld::first_line_intersection`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastResult {
    /// The tile or body that blocked the line.
    pub hit: RaycastHit,
    /// World-space box of the blocking tile cell or body.
    pub bbox: Rectf,
}

impl<L: SolidLayer> CollisionWorld<L> {
    /// Creates an empty world with the given tuning parameters.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        debug_assert!(config.tile_size > 0.0, "tile size must be positive");
        debug_assert!(config.iterations > 0, "at least one resolution iteration");
        Self {
            config,
            bodies: BTreeMap::new(),
            layers: Vec::new(),
            next_id: 0,
            logged_bad_slopes: BTreeSet::new(),
            logged_bad_bodies: BTreeSet::new(),
        }
    }

    /// The world's tuning parameters.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========================================================================
    // Layers
    // ========================================================================

    /// Adds a solid layer and returns its index.
    pub fn add_layer(&mut self, layer: L) -> usize {
        self.layers.push(layer);
        self.layers.len() - 1
    }

    /// All solid layers, in the order they were added.
    #[must_use]
    pub fn layers(&self) -> &[L] {
        &self.layers
    }

    /// Mutable access to the solid layers, e.g. to set a moving layer's
    /// per-frame movement before calling [`update`](Self::update).
    pub fn layers_mut(&mut self) -> &mut [L] {
        &mut self.layers
    }

    // ========================================================================
    // Bodies
    // ========================================================================

    /// Registers a body and returns its id. Ids are never reused.
    pub fn spawn(&mut self, bbox: Rectf, group: CollisionGroup) -> BodyId {
        let id = BodyId::new(self.next_id);
        self.next_id += 1;
        self.bodies.insert(id, BodyState::new(bbox, group));
        id
    }

    /// Removes a body. Returns its last state, or `None` for a stale id.
    pub fn despawn(&mut self, id: BodyId) -> Option<BodyState> {
        self.logged_bad_bodies.remove(&id);
        self.bodies.remove(&id)
    }

    /// The current state of a body.
    #[must_use]
    pub fn body(&self, id: BodyId) -> Option<&BodyState> {
        self.bodies.get(&id)
    }

    /// All registered bodies in id order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &BodyState)> {
        self.bodies.iter().map(|(&id, body)| (id, body))
    }

    /// Number of registered bodies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether no bodies are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Sets the displacement a body wants this frame. Returns `false` for a
    /// stale id.
    pub fn set_movement(&mut self, id: BodyId, movement: Vec2) -> bool {
        match self.bodies.get_mut(&id) {
            Some(body) => {
                body.movement = movement;
                true
            }
            None => false,
        }
    }

    /// Teleports a body so its top-left corner sits at `pos`, keeping its
    /// size. No collision test is performed; use the `is_free_*` queries
    /// first when the destination matters.
    pub fn set_position(&mut self, id: BodyId, pos: Vec2) -> bool {
        match self.bodies.get_mut(&id) {
            Some(body) => {
                body.bbox = Rectf::from_pos_size(pos, body.bbox.size());
                true
            }
            None => false,
        }
    }

    /// Resizes a body in place, keeping its top-left corner.
    pub fn set_size(&mut self, id: BodyId, size: Vec2) -> bool {
        match self.bodies.get_mut(&id) {
            Some(body) => {
                body.bbox = Rectf::from_pos_size(body.bbox.p1(), size);
                true
            }
            None => false,
        }
    }

    /// Changes a body's collision group, effective from the next update.
    pub fn set_group(&mut self, id: BodyId, group: CollisionGroup) -> bool {
        match self.bodies.get_mut(&id) {
            Some(body) => {
                body.group = group;
                true
            }
            None => false,
        }
    }

    /// Marks a body as one-way: it blocks other bodies only when they land
    /// on its top edge, like a unisolid tile.
    pub fn set_unisolid(&mut self, id: BodyId, unisolid: bool) -> bool {
        match self.bodies.get_mut(&id) {
            Some(body) => {
                body.unisolid = unisolid;
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Frame resolution
    // ========================================================================

    /// Runs one fixed step of collision resolution.
    ///
    /// Every contact found during the step is reported through `hooks`; see
    /// the module docs for the pass order. After the call, each body's
    /// `bbox` holds its resolved position and its `movement` is zero.
    pub fn update(&mut self, hooks: &mut dyn CollisionHooks) {
        let mut dest: BTreeMap<BodyId, Rectf> = BTreeMap::new();
        for (&id, body) in &mut self.bodies {
            if !body.movement.is_finite() || body.bbox.is_degenerate() {
                if self.logged_bad_bodies.insert(id) {
                    warn!(%id, movement = ?body.movement, bbox = ?body.bbox,
                        "skipping body with degenerate geometry");
                }
                body.movement = Vec2::ZERO;
            }
            let speed = body.movement.length();
            if speed > self.config.max_speed {
                body.movement *= self.config.max_speed / speed;
            }
            body.pushed = Vec2::ZERO;
            dest.insert(id, body.bbox.translated(body.movement));
        }
        let ids: Vec<BodyId> = self.bodies.keys().copied().collect();

        // part 1: clamp moving bodies against tiles and static bodies
        for &id in &ids {
            let moves = self
                .bodies
                .get(&id)
                .is_some_and(|b| b.group.moves_against_world());
            if moves {
                self.resolve_static(id, &mut dest, hooks);
            }
        }

        // part 2: report tile attributes under each moving body
        for &id in &ids {
            let Some(body) = self.bodies.get(&id) else {
                continue;
            };
            if !body.group.moves_against_world() {
                continue;
            }
            let Some(rect) = dest.get(&id) else { continue };
            let attributes = self.tile_attributes_at(rect, body.movement);
            if attributes.intersects(TileAttributes::INTERESTING) {
                hooks.collision_tile(id, attributes);
            }
        }

        // part 3: moving bodies vs touchables. Both callbacks see the hit
        // from the moving body's perspective; sensors only care that the
        // overlap happened.
        for &id in &ids {
            if !self.group_of(id).is_some_and(|g| g.collides_with_moving()) {
                continue;
            }
            for &other in &ids {
                if self.group_of(other) != Some(CollisionGroup::Touchable) {
                    continue;
                }
                let (Some(&r1), Some(&r2)) = (dest.get(&id), dest.get(&other)) else {
                    continue;
                };
                if !r1.overlaps(&r2) {
                    continue;
                }
                let (hit, _) = hit_normal(&r1, &r2);
                if !hooks.collides(id, other, &hit) {
                    continue;
                }
                if !hooks.collides(other, id, &hit) {
                    continue;
                }
                hooks.collision(id, other, &hit);
                hooks.collision(other, id, &hit);
            }
        }

        // part 4: separate moving bodies from each other, each unordered
        // pair once, in id order
        for (i, &id) in ids.iter().enumerate() {
            if !self.group_of(id).is_some_and(|g| g.collides_with_moving()) {
                continue;
            }
            for &other in &ids[i + 1..] {
                if !self
                    .group_of(other)
                    .is_some_and(|g| g.collides_with_moving())
                {
                    continue;
                }
                self.resolve_moving_pair(id, other, &mut dest, hooks);
            }
        }

        // commit
        for (&id, body) in &mut self.bodies {
            if let Some(rect) = dest.get(&id) {
                body.bbox = *rect;
            }
            body.movement = Vec2::ZERO;
        }
    }

    fn group_of(&self, id: BodyId) -> Option<CollisionGroup> {
        self.bodies.get(&id).map(|b| b.group)
    }

    /// Clamps one body's destination box against all solid geometry.
    ///
    /// Runs two sub-passes: a vertical-only one (sideways movement masked
    /// out, so walls grazed while falling do not register as side hits),
    /// then a combined one. Within a sub-pass the constraint accumulator is
    /// carried across iterations and only tightens.
    ///
    /// When a sub-pass leaves less room between opposing bounds than the
    /// body's extent, the body cannot be placed; the deficit is accumulated
    /// as pressure and re-checked at the end, reporting a crush once the
    /// pressure passes the crush threshold.
    fn resolve_static(
        &mut self,
        id: BodyId,
        dest: &mut BTreeMap<BodyId, Rectf>,
        hooks: &mut dyn CollisionHooks,
    ) {
        let Some(body) = self.bodies.get(&id) else {
            return;
        };
        let movement = body.movement;
        let width = body.bbox.width();
        let height = body.bbox.height();
        let Some(mut d) = dest.get(&id).copied() else {
            return;
        };
        let mut pressure = Vec2::ZERO;

        // vertical sub-pass
        let mut constraints = Constraints::new();
        for _ in 0..self.config.iterations {
            self.collision_static(
                &mut constraints,
                Vec2::new(0.0, movement.y),
                &d,
                id,
                hooks,
            );
            if !constraints.has_constraints() {
                break;
            }

            if constraints.position_bottom() < f32::INFINITY {
                let room = constraints.height();
                if room < height {
                    // cannot fit between floor and ceiling yet; remember the
                    // deficit and let the re-check below decide whether it
                    // is a real crush
                    pressure.y += height - room;
                } else {
                    d.set_bottom(constraints.position_bottom() - self.config.delta);
                    d.set_top(d.bottom() - height);
                }
            } else if constraints.position_top() > f32::NEG_INFINITY {
                d.set_top(constraints.position_top() + self.config.delta);
                d.set_bottom(d.top() + height);
            }
        }
        if constraints.has_constraints() {
            if constraints.hit.bottom {
                // ride whatever we landed on
                d.translate(constraints.ground_movement);
            }
            if constraints.hit.top || constraints.hit.bottom {
                let mut hit = constraints.hit;
                hit.left = false;
                hit.right = false;
                hooks.collision_solid(id, &hit);
            }
        }

        // combined sub-pass
        let mut constraints = Constraints::new();
        for _ in 0..self.config.iterations {
            self.collision_static(&mut constraints, movement, &d, id, hooks);
            if !constraints.has_constraints() {
                break;
            }

            let room = constraints.width();
            if room < f32::INFINITY {
                if room + self.config.shift_delta < width {
                    pressure.x += width - room;
                } else {
                    // walls on both sides with enough room: center between
                    let xmid = constraints.x_midpoint();
                    d.set_left(xmid - width / 2.0);
                    d.set_right(xmid + width / 2.0);
                }
            } else if constraints.position_right() < f32::INFINITY {
                d.set_right(constraints.position_right() - self.config.delta);
                d.set_left(d.right() - width);
            } else if constraints.position_left() > f32::NEG_INFINITY {
                d.set_left(constraints.position_left() + self.config.delta);
                d.set_right(d.left() + width);
            }
        }
        if constraints.has_constraints() && constraints.hit.is_any() {
            hooks.collision_solid(id, &constraints.hit);
        }

        // re-check accumulated vertical pressure against the settled box
        if pressure.y > 0.0 {
            let mut check = Constraints::new();
            self.collision_static(&mut check, movement, &d, id, hooks);
            if check.position_bottom() < f32::INFINITY
                && check.height() + self.config.shift_delta < height
            {
                let hit = CollisionHit {
                    top: true,
                    bottom: true,
                    crush: pressure.y > self.config.crush_threshold(),
                    ..CollisionHit::default()
                };
                hooks.collision_solid(id, &hit);
            }
        }

        // and horizontal pressure
        if pressure.x > 0.0 {
            let mut check = Constraints::new();
            self.collision_static(&mut check, movement, &d, id, hooks);
            if check.position_right() < f32::INFINITY
                && check.width() + self.config.shift_delta < width
            {
                let hit = CollisionHit {
                    top: true,
                    bottom: true,
                    left: check.hit.left,
                    right: check.hit.right,
                    crush: pressure.x > self.config.crush_threshold(),
                    ..CollisionHit::default()
                };
                hooks.collision_solid(id, &hit);
            }
        }

        dest.insert(id, d);
    }

    /// One obstacle sweep: folds every solid tile and every obstacle body
    /// overlapping `dest` into the accumulator.
    ///
    /// Both bodies of a confirmed contact receive the collision callback,
    /// each with the hit seen from its own side, and an `AbortMove` from
    /// either lets the mover pass. Obstacle movement is credited to
    /// `ground_movement` only when the fold landed the mover on top of it.
    fn collision_static(
        &mut self,
        constraints: &mut Constraints,
        movement: Vec2,
        dest: &Rectf,
        id: BodyId,
        hooks: &mut dyn CollisionHooks,
    ) {
        self.collision_tilemap(constraints, movement, dest, id);

        let Some(body_bbox) = self.bodies.get(&id).map(|b| b.bbox) else {
            return;
        };
        let dummy = CollisionHit::default();
        for (&other_id, other) in &self.bodies {
            if other_id == id || !other.group.blocks_as_obstacle() {
                continue;
            }
            if !dest.overlaps(&other.bbox) {
                continue;
            }
            if !hooks.collides(other_id, id, &dummy) {
                continue;
            }
            if !hooks.collides(id, other_id, &dummy) {
                continue;
            }

            // one-way bodies only ever catch a body falling onto their top
            if other.unisolid {
                let relative = movement - other.movement;
                if unisolid_blocks(self.config.shift_delta, &other.bbox, &body_bbox, relative) {
                    constraints.constrain_bottom(other.bbox.top());
                    constraints.hit.bottom = true;
                    if other.movement != Vec2::ZERO {
                        constraints.ground_movement += other.movement;
                    }
                }
                continue;
            }

            if shift_out(
                constraints,
                movement,
                dest,
                &other.bbox,
                self.config.shift_delta,
            ) {
                continue;
            }
            let (hit, _) = hit_normal(dest, &other.bbox);
            let response = hooks.collision(id, other_id, &hit);
            let other_response = hooks.collision(other_id, id, &hit.swapped());
            if response == HitResponse::AbortMove || other_response == HitResponse::AbortMove {
                continue;
            }
            let side = constraints.apply_rect_obstacle(dest, &other.bbox);
            if side == FoldSide::Bottom && other.movement != Vec2::ZERO {
                constraints.ground_movement += other.movement;
            }
        }
    }

    /// Folds every solid tile overlapping `dest` into the accumulator.
    ///
    /// The one-way gate uses the body's committed box (not the destination)
    /// and its movement relative to the layer, so a body standing on a
    /// one-way platform riding upward stays supported.
    fn collision_tilemap(
        &mut self,
        constraints: &mut Constraints,
        movement: Vec2,
        dest: &Rectf,
        id: BodyId,
    ) {
        let Some(body_bbox) = self.bodies.get(&id).map(|b| b.bbox) else {
            return;
        };
        let shift_delta = self.config.shift_delta;

        for layer in &self.layers {
            let range = layer.tiles_overlapping(dest);
            for x in range.left..range.right {
                for y in range.top..range.bottom {
                    let tile = layer.tile(x, y);
                    if !tile.is_solid() {
                        continue;
                    }
                    let tile_bbox = layer.tile_bbox(x, y);

                    if tile.is_unisolid() {
                        let relative = movement - layer.movement();
                        if !unisolid_blocks(shift_delta, &tile_bbox, &body_bbox, relative) {
                            continue;
                        }
                    }

                    if tile.is_slope() {
                        let Some(triangle) = AaTriangle::from_tile(tile_bbox, tile.data()) else {
                            if self.logged_bad_slopes.insert(tile.data()) {
                                warn!(
                                    data = tile.data(),
                                    "ignoring slope tile with unknown data code"
                                );
                            }
                            continue;
                        };
                        let bottom_before = constraints.position_bottom();
                        rectangle_triangle_constraints(constraints, dest, &triangle);
                        if constraints.position_bottom() < bottom_before {
                            constraints.ground_movement += layer.movement();
                        }
                    } else {
                        if shift_out(constraints, movement, dest, &tile_bbox, shift_delta) {
                            continue;
                        }
                        if constraints.apply_rect_obstacle(dest, &tile_bbox) == FoldSide::Bottom {
                            constraints.ground_movement += layer.movement();
                        }
                    }
                }
            }
        }
    }

    /// OR of the attributes of every tile the destination box overlaps.
    ///
    /// One-way tiles only contribute when they would actually block. An
    /// extra band of `shift_delta` below the box contributes ICE bits only,
    /// so a body standing on (not in) a slippery floor still reports it.
    fn tile_attributes_at(&self, dest: &Rectf, movement: Vec2) -> TileAttributes {
        let mut result = TileAttributes::empty();
        let fudge = Rectf::new(
            dest.left(),
            dest.top(),
            dest.right(),
            dest.bottom() + self.config.shift_delta,
        );
        for layer in &self.layers {
            let range = layer.tiles_overlapping(dest);
            let range_below = layer.tiles_overlapping(&fudge);
            for x in range.left..range.right {
                for y in range.top..range.bottom {
                    let tile = layer.tile(x, y);
                    if tile.is_unisolid() {
                        let relative = movement - layer.movement();
                        if !unisolid_blocks(
                            self.config.shift_delta,
                            &layer.tile_bbox(x, y),
                            dest,
                            relative,
                        ) {
                            continue;
                        }
                    }
                    result |= tile.attributes();
                }
                for y in range.bottom..range_below.bottom {
                    result |= layer.tile(x, y).attributes() & TileAttributes::ICE;
                }
            }
        }
        result
    }

    /// Separates one pair of moving bodies.
    ///
    /// Both bodies are asked to confirm the contact, then both receive the
    /// collision callback (each from its own perspective). How the overlap
    /// is split depends on the responses: two `Continue`s split it evenly,
    /// a `ForceMove` shoves the full separation onto the other body, and an
    /// `AbortMove` from either side leaves both boxes untouched.
    fn resolve_moving_pair(
        &mut self,
        a: BodyId,
        b: BodyId,
        dest: &mut BTreeMap<BodyId, Rectf>,
        hooks: &mut dyn CollisionHooks,
    ) {
        let (Some(&r1), Some(&r2)) = (dest.get(&a), dest.get(&b)) else {
            return;
        };
        if !r1.overlaps(&r2) {
            return;
        }
        let (hit, normal) = hit_normal(&r1, &r2);
        // one-way bodies only register contacts on their top surface
        let a_unisolid = self.bodies.get(&a).is_some_and(|body| body.unisolid);
        let b_unisolid = self.bodies.get(&b).is_some_and(|body| body.unisolid);
        if (b_unisolid && !hit.bottom) || (a_unisolid && !hit.top) {
            return;
        }
        if !hooks.collides(a, b, &hit) {
            return;
        }
        let swapped = hit.swapped();
        if !hooks.collides(b, a, &swapped) {
            return;
        }
        let response1 = hooks.collision(a, b, &hit);
        let response2 = hooks.collision(b, a, &swapped);

        let (push_a, push_b) = match (response1, response2) {
            (HitResponse::Continue, HitResponse::Continue) => {
                let shift = normal * (0.5 + self.config.delta);
                (-shift, shift)
            }
            (HitResponse::Continue, HitResponse::ForceMove) => {
                (-normal * (1.0 + self.config.delta), Vec2::ZERO)
            }
            (HitResponse::ForceMove, HitResponse::Continue) => {
                (Vec2::ZERO, normal * (1.0 + self.config.delta))
            }
            _ => (Vec2::ZERO, Vec2::ZERO),
        };

        if push_a != Vec2::ZERO {
            if let Some(rect) = dest.get_mut(&a) {
                rect.translate(push_a);
            }
            if let Some(body) = self.bodies.get_mut(&a) {
                body.pushed += push_a;
            }
        }
        if push_b != Vec2::ZERO {
            if let Some(rect) = dest.get_mut(&b) {
                rect.translate(push_b);
            }
            if let Some(body) = self.bodies.get_mut(&b) {
                body.pushed += push_b;
            }
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Whether no solid tile overlaps `rect`.
    ///
    /// One-way tiles count as solid unless `ignore_unisolid` is set; the
    /// query has no movement to feed the one-way gate. Slope tiles only
    /// block when the rectangle reaches into their solid half. Slope tiles
    /// with an unknown data code count as solid here, unlike in the
    /// resolver, since a query result cannot carry a warning.
    #[must_use]
    pub fn is_free_of_tiles(&self, rect: &Rectf, ignore_unisolid: bool) -> bool {
        for layer in &self.layers {
            let range = layer.tiles_overlapping(rect);
            for x in range.left..range.right {
                for y in range.top..range.bottom {
                    let tile = layer.tile(x, y);
                    if !tile.is_solid() {
                        continue;
                    }
                    if tile.is_unisolid() && ignore_unisolid {
                        continue;
                    }
                    if tile.is_slope() {
                        let tile_bbox = layer.tile_bbox(x, y);
                        if let Some(triangle) = AaTriangle::from_tile(tile_bbox, tile.data()) {
                            let mut scratch = Constraints::new();
                            if !rectangle_triangle_constraints(&mut scratch, rect, &triangle) {
                                continue;
                            }
                        }
                    }
                    return false;
                }
            }
        }
        true
    }

    /// Whether neither a solid tile nor a static body overlaps `rect`.
    /// `ignore` exempts one body, typically the asking one.
    #[must_use]
    pub fn is_free_of_statics(
        &self,
        rect: &Rectf,
        ignore: Option<BodyId>,
        ignore_unisolid: bool,
    ) -> bool {
        if !self.is_free_of_tiles(rect, ignore_unisolid) {
            return false;
        }
        for (&id, body) in &self.bodies {
            if Some(id) == ignore {
                continue;
            }
            if body.group == CollisionGroup::Static && rect.overlaps(&body.bbox) {
                return false;
            }
        }
        true
    }

    /// Whether `rect` is free of solid tiles and of every body that can
    /// physically occupy space (static, moving-static, or moving).
    #[must_use]
    pub fn is_free_of_moving_statics(&self, rect: &Rectf, ignore: Option<BodyId>) -> bool {
        if !self.is_free_of_tiles(rect, false) {
            return false;
        }
        for (&id, body) in &self.bodies {
            if Some(id) == ignore {
                continue;
            }
            let occupies = matches!(
                body.group,
                CollisionGroup::Moving | CollisionGroup::MovingStatic | CollisionGroup::Static
            );
            if occupies && rect.overlaps(&body.bbox) {
                return false;
            }
        }
        true
    }

    /// Whether `rect` overlaps no moving-static body. Tiles and every other
    /// group are ignored; this answers "is a platform about to occupy this
    /// space", e.g. before teleporting a body.
    #[must_use]
    pub fn is_free_of_specifically_moving_statics(
        &self,
        rect: &Rectf,
        ignore: Option<BodyId>,
    ) -> bool {
        for (&id, body) in &self.bodies {
            if Some(id) == ignore {
                continue;
            }
            if body.group == CollisionGroup::MovingStatic && rect.overlaps(&body.bbox) {
                return false;
            }
        }
        true
    }

    /// Whether the segment from `start` to `end` crosses no solid tile and
    /// no obstacle body. With `ignore_bodies` only tiles block the line.
    #[must_use]
    pub fn free_line_of_sight(
        &self,
        start: Vec2,
        end: Vec2,
        ignore_bodies: bool,
        ignore: Option<BodyId>,
    ) -> bool {
        self.first_line_intersection(start, end, ignore_bodies, ignore)
            .is_none()
    }

    /// The first obstruction along the segment from `start` to `end`, or
    /// `None` for a clear line.
    ///
    /// Tiles are tested by sampling the segment's bounding box at half-tile
    /// spacing, which can miss thin diagonal gaps; good enough for AI sight
    /// checks. Bodies are checked in id order, not by distance along the
    /// segment. With `ignore_bodies` only tiles are considered.
    #[must_use]
    pub fn first_line_intersection(
        &self,
        start: Vec2,
        end: Vec2,
        ignore_bodies: bool,
        ignore: Option<BodyId>,
    ) -> Option<RaycastResult> {
        let step = self.config.tile_size / 2.0;
        let (lsx, lex) = (start.x.min(end.x), start.x.max(end.x));
        let (lsy, ley) = (start.y.min(end.y), start.y.max(end.y));

        let mut x = lsx;
        while x <= lex {
            let mut y = lsy;
            while y <= ley {
                let sample = Rectf::new(x, y, x, y);
                for layer in &self.layers {
                    let cell = layer.tiles_overlapping(&sample);
                    if cell.is_empty() {
                        continue;
                    }
                    let tile = layer.tile(cell.left, cell.top);
                    if tile.is_solid() {
                        return Some(RaycastResult {
                            hit: RaycastHit::Tile(tile),
                            bbox: layer.tile_bbox(cell.left, cell.top),
                        });
                    }
                }
                y += step;
            }
            x += step;
        }

        if !ignore_bodies {
            for (&id, body) in &self.bodies {
                if Some(id) == ignore {
                    continue;
                }
                if body.group.blocks_as_obstacle() && body.bbox.intersects_line(start, end) {
                    return Some(RaycastResult {
                        hit: RaycastHit::Body(id),
                        bbox: body.bbox,
                    });
                }
            }
        }
        None
    }

    /// Ids of all bodies whose center lies within `max_distance` of `center`,
    /// in id order.
    #[must_use]
    pub fn nearby_bodies(&self, center: Vec2, max_distance: f32) -> Vec<BodyId> {
        self.bodies
            .iter()
            .filter(|(_, body)| body.bbox.distance_to(center) <= max_distance)
            .map(|(&id, _)| id)
            .collect()
    }
}

/// Seam slide-out: intersections shallower than `shift_delta` on the axis
/// perpendicular to the dominant movement direction are constrained without
/// registering a hit, so a body sliding along a row of tiles does not snag
/// on the seams between them. Returns whether the obstacle was handled.
fn shift_out(
    constraints: &mut Constraints,
    movement: Vec2,
    dest: &Rectf,
    obstacle: &Rectf,
    shift_delta: f32,
) -> bool {
    let itop = dest.bottom() - obstacle.top();
    let ibottom = obstacle.bottom() - dest.top();
    let ileft = dest.right() - obstacle.left();
    let iright = obstacle.right() - dest.left();

    if movement.y.abs() > movement.x.abs() {
        if ileft < shift_delta {
            constraints.constrain_right(obstacle.left());
            return true;
        }
        if iright < shift_delta {
            constraints.constrain_left(obstacle.right());
            return true;
        }
    } else {
        if itop < shift_delta {
            constraints.constrain_bottom(obstacle.top());
            return true;
        }
        if ibottom < shift_delta {
            constraints.constrain_top(obstacle.bottom());
            return true;
        }
    }
    false
}

/// Contact classification for two overlapping boxes, from `r1`'s
/// perspective, plus the separation vector that moves `r1` out of `r2` when
/// applied negated. Resolves along the axis of shallower penetration.
fn hit_normal(r1: &Rectf, r2: &Rectf) -> (CollisionHit, Vec2) {
    let itop = r1.bottom() - r2.top();
    let ibottom = r2.bottom() - r1.top();
    let ileft = r1.right() - r2.left();
    let iright = r2.right() - r1.left();

    let vert_penetration = itop.min(ibottom);
    let horiz_penetration = ileft.min(iright);

    let mut hit = CollisionHit::default();
    let mut normal = Vec2::ZERO;
    if vert_penetration < horiz_penetration {
        if itop < ibottom {
            hit.bottom = true;
            normal.y = vert_penetration;
        } else {
            hit.top = true;
            normal.y = -vert_penetration;
        }
    } else if ileft < iright {
        hit.right = true;
        normal.x = horiz_penetration;
    } else {
        hit.left = true;
        normal.x = -horiz_penetration;
    }
    (hit, normal)
}
