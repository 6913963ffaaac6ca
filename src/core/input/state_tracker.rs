//=========================================================================
// State Tracker
//=========================================================================
//
// Folds the stream of `InputEvent`s into persistent device state.
//
// Held keys, held buttons, the cursor and the modifiers survive the frame
// boundary. Edges (presses, releases, clicks) are not kept here; the level
// sees them as the `SystemEvent`s the input source hands out each frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, Modifiers, MouseButton};
use super::snapshot::{KeyboardState, MouseState};

//=== StateTracker ========================================================

/// Persistent keyboard/mouse state.
#[derive(Debug, Default)]
pub struct StateTracker {
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
    mouse_position: (f32, f32),
    modifiers: Modifiers,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Event Processing -------------------------------------------------

    pub fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown { key, modifiers } => {
                self.modifiers = *modifiers;
                self.keys_down.insert(*key);
            }
            InputEvent::KeyUp { key, modifiers } => {
                self.modifiers = *modifiers;
                self.keys_down.remove(key);
            }
            InputEvent::MouseButtonDown { button, modifiers } => {
                self.modifiers = *modifiers;
                self.buttons_down.insert(*button);
            }
            InputEvent::MouseButtonUp { button, modifiers } => {
                self.modifiers = *modifiers;
                self.buttons_down.remove(button);
            }
            InputEvent::MouseMoved { x, y } => {
                self.mouse_position = (*x, *y);
            }
            InputEvent::Unidentified => {}
        }
    }

    //--- Keyboard Queries -------------------------------------------------

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Snapshot of every key currently held.
    pub fn keyboard(&self) -> KeyboardState {
        self.keys_down.iter().copied().collect()
    }

    //--- Mouse Queries ----------------------------------------------------

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    pub fn mouse_position(&self) -> (f32, f32) {
        self.mouse_position
    }

    /// Cursor snapshot in whole pixels.
    pub fn mouse(&self) -> MouseState {
        let (x, y) = self.mouse_position;
        MouseState {
            x: x.round() as i32,
            y: y.round() as i32,
            left: self.is_button_down(MouseButton::Left),
            middle: self.is_button_down(MouseButton::Middle),
            right: self.is_button_down(MouseButton::Right),
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
