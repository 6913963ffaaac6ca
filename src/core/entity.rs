//=========================================================================
// Entities
//=========================================================================
//
// The engine-facing half of a game object.
//
// Architecture:
//   Body         → engine-owned data (position, size, depth, sprite,
//                  collision interests and resolved candidates)
//   dyn Entity   → collaborator-owned behavior (input and lifecycle hooks)
//
// Both halves live in the `Room` under one `EntityId`. Hooks receive the
// id and the room, so an object can move itself, spawn others, schedule
// timers or delete itself from inside any callback.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use crate::core::input::{JoypadState, KeyboardState, MouseButton, MouseState};
use crate::core::render::{Sprite, SpriteId};
use crate::core::room::Room;

//=== EntityId ============================================================

/// Handle to an object owned by a [`Room`].
///
/// Ids are never reused within a room, so a stale id simply stops
/// resolving once its object is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//=== Tag =================================================================

/// Kind of an object, used for collision interest and counting.
///
/// Tags are plain values chosen by the game, typically declared as
/// constants next to the object they describe:
///
/// ```rust
/// use roomloop::prelude::*;
///
/// pub const COIN: Tag = Tag::new("Goldcoin2");
/// pub const PLAYER: Tag = Tag::new("Character");
///
/// assert_ne!(COIN, PLAYER);
/// assert_eq!(COIN.name(), "Goldcoin2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(&'static str);

impl Tag {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

//=== Rect ================================================================

/// Axis-aligned rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns `true` if the rectangles overlap by at least one pixel.
    ///
    /// Touching edges do not count, and empty rectangles never intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        (self.x as i64) < other.right()
            && (other.x as i64) < self.right()
            && (self.y as i64) < other.bottom()
            && (other.y as i64) < self.bottom()
    }

    /// Half-open containment: the left/top edges are inside, the
    /// right/bottom edges are not.
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        (x as i64) >= self.x as i64
            && (x as i64) < self.right()
            && (y as i64) >= self.y as i64
            && (y as i64) < self.bottom()
    }
}

//=== Body ================================================================

/// Engine-side state of an object.
///
/// Built before the object is added to a room. Depth, kind, input
/// capabilities and collision interests are fixed from that point on;
/// position and sprite stay freely mutable.
#[derive(Debug, Clone)]
pub struct Body {
    /// Horizontal position of the top-left corner.
    pub x: i32,
    /// Vertical position of the top-left corner.
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// Visual drawn at `(x, y)`, if any.
    pub sprite: Option<SpriteId>,

    prev_x: i32,
    prev_y: i32,
    depth: i32,
    kind: Tag,
    handles_keyboard: bool,
    handles_mouse: bool,
    collision_interests: Vec<Tag>,
    collision_candidates: Vec<EntityId>,
}

impl Body {
    //--- Construction -----------------------------------------------------

    pub fn new(kind: Tag, x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            width: 0,
            height: 0,
            sprite: None,
            prev_x: x,
            prev_y: y,
            depth: 0,
            kind,
            handles_keyboard: false,
            handles_mouse: false,
            collision_interests: Vec::new(),
            collision_candidates: Vec::new(),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Draw depth; lower values are drawn first (behind).
    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    /// Uses a loaded sprite as the visual and takes its size.
    pub fn with_sprite(mut self, sprite: Sprite) -> Self {
        self.set_image(sprite.id, sprite.width, sprite.height);
        self
    }

    /// Registers for `key_pressed` and `joy_pad_signal`.
    pub fn with_keyboard(mut self) -> Self {
        self.handles_keyboard = true;
        self
    }

    /// Registers for `mouse_event` and `clicked`.
    pub fn with_mouse(mut self) -> Self {
        self.handles_mouse = true;
        self
    }

    /// Builder form of [`Body::register_collision_object`].
    pub fn colliding_with(mut self, kind: Tag) -> Self {
        self.register_collision_object(kind);
        self
    }

    //--- Mutation ---------------------------------------------------------

    /// Replaces the visual and its size.
    pub fn set_image(&mut self, sprite: SpriteId, width: u32, height: u32) {
        self.sprite = Some(sprite);
        self.width = width;
        self.height = height;
    }

    /// Declares interest in colliding with every object of `kind`.
    ///
    /// Interests declared before the object is added are resolved against
    /// the objects already present when the level starts, or immediately
    /// when added to a running level.
    pub fn register_collision_object(&mut self, kind: Tag) {
        if !self.collision_interests.contains(&kind) {
            self.collision_interests.push(kind);
        }
    }

    /// Drops `candidate` from the resolved collision list.
    ///
    /// Returns `true` if it was present.
    pub fn remove_object(&mut self, candidate: EntityId) -> bool {
        let before = self.collision_candidates.len();
        self.collision_candidates.retain(|&id| id != candidate);
        before != self.collision_candidates.len()
    }

    pub(crate) fn add_candidate(&mut self, candidate: EntityId) {
        if !self.collision_candidates.contains(&candidate) {
            self.collision_candidates.push(candidate);
        }
    }

    pub(crate) fn snapshot_position(&mut self) {
        self.prev_x = self.x;
        self.prev_y = self.y;
    }

    //--- Queries ----------------------------------------------------------

    pub fn kind(&self) -> Tag {
        self.kind
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn handles_keyboard(&self) -> bool {
        self.handles_keyboard
    }

    pub fn handles_mouse(&self) -> bool {
        self.handles_mouse
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Position at the start of the current frame.
    pub fn previous_position(&self) -> (i32, i32) {
        (self.prev_x, self.prev_y)
    }

    /// Movement since the start of the current frame.
    pub fn displacement(&self) -> (i32, i32) {
        (self.x - self.prev_x, self.y - self.prev_y)
    }

    pub fn collision_interests(&self) -> &[Tag] {
        &self.collision_interests
    }

    pub fn is_interested_in(&self, kind: Tag) -> bool {
        self.collision_interests.contains(&kind)
    }

    /// Live objects this one is checked against every frame.
    pub fn collision_candidates(&self) -> &[EntityId] {
        &self.collision_candidates
    }
}

//=== Entity ==============================================================

/// Behavior hooks the level calls on every object.
///
/// Every hook has an empty default, so an object only implements what it
/// reacts to. Input hooks are only called if the matching capability was
/// declared on the [`Body`]. `()` is the behavior of purely decorative
/// objects.
///
/// # Frame order
///
/// ```text
/// prestep → key_pressed → joy_pad_signal → mouse_event
///         → update → step → handle_collision → draw
/// ```
///
/// `clicked` fires during event polling, between `prestep` and
/// `key_pressed`.
///
/// # Example
///
/// ```rust
/// use roomloop::prelude::*;
///
/// pub const PLAYER: Tag = Tag::new("Character");
/// pub const COIN: Tag = Tag::new("Goldcoin2");
///
/// struct Coin;
///
/// impl Entity for Coin {
///     fn handle_collision(&mut self, me: EntityId, room: &mut Room, _other: EntityId, kind: Tag) {
///         if kind == PLAYER {
///             room.delete_object(me);
///             room.session_mut().add_score(100);
///         }
///     }
/// }
///
/// let body = Body::new(COIN, 10, 10).with_size(48, 48).colliding_with(PLAYER);
/// # let _ = (body, Coin);
/// ```
pub trait Entity {
    /// Called on every object before input is dispatched.
    fn prestep(&mut self, _me: EntityId, _room: &mut Room) {}

    /// Held-key snapshot, every frame.
    fn key_pressed(&mut self, _me: EntityId, _room: &mut Room, _keys: &KeyboardState) {}

    /// Both players' pads, only on frames where some pad input is active.
    fn joy_pad_signal(
        &mut self,
        _me: EntityId,
        _room: &mut Room,
        _p1: &JoypadState,
        _p2: &JoypadState,
    ) {
    }

    /// Cursor position and button state, every frame.
    fn mouse_event(&mut self, _me: EntityId, _room: &mut Room, _mouse: MouseState) {}

    /// A button was released while the cursor was over this object.
    fn clicked(&mut self, _me: EntityId, _room: &mut Room, _button: MouseButton) {}

    /// Engine-level bookkeeping hook, called right before `step`.
    fn update(&mut self, _me: EntityId, _room: &mut Room) {}

    /// Per-object custom behavior, every frame.
    fn step(&mut self, _me: EntityId, _room: &mut Room) {}

    /// This object overlaps `other`, one of its collision candidates.
    fn handle_collision(&mut self, _me: EntityId, _room: &mut Room, _other: EntityId, _kind: Tag) {}
}

impl Entity for () {}

//=========================================================================
// Unit Tests
//=========================================================================
