//=========================================================================
// Device Snapshots
//=========================================================================
//
// Immutable per-frame views of keyboard and mouse state, handed to
// entities by the input router.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;
use std::ops::Index;

//=== Internal Dependencies ===============================================

use super::event::{KeyCode, MouseButton};

//=== KeyboardState =======================================================

/// Set of keys held down at the start of the frame.
///
/// Indexable by key, so entities can write `keys[KeyCode::KeyW]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardState {
    held: HashSet<KeyCode>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while `key` is held.
    pub fn is_down(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Returns `true` if no key is held.
    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyCode> {
        self.held.iter()
    }
}

impl FromIterator<KeyCode> for KeyboardState {
    fn from_iter<T: IntoIterator<Item = KeyCode>>(iter: T) -> Self {
        Self { held: iter.into_iter().collect() }
    }
}

impl Index<KeyCode> for KeyboardState {
    type Output = bool;

    fn index(&self, key: KeyCode) -> &bool {
        if self.held.contains(&key) {
            &true
        } else {
            &false
        }
    }
}

//=== MouseState ==========================================================

/// Cursor position and the three primary buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseState {
    pub x: i32,
    pub y: i32,
    pub left: bool,
    pub middle: bool,
    pub right: bool,
}

impl MouseState {
    pub fn at(x: i32, y: i32) -> Self {
        Self { x, y, ..Self::default() }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Returns `true` while `button` is held. Extra buttons are not tracked.
    pub fn is_down(&self, button: MouseButton) -> bool {
        match button {
            MouseButton::Left => self.left,
            MouseButton::Middle => self.middle,
            MouseButton::Right => self.right,
            MouseButton::Other => false,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
