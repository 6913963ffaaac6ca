//=========================================================================
// Input Router
//=========================================================================
//
// Turns per-frame device state into entity callbacks.
//
// Per frame, in order:
//   1. keyboard  → key_pressed     every keyboard object, always
//   2. joysticks → joy_pad_signal  every keyboard object, only when some
//                                  button is down or axis off-center
//   3. mouse     → mouse_event     every mouse object, always
//
// Clicks are routed separately as release events arrive: `clicked` goes
// to every mouse object whose rectangle contains the cursor.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::{InputSource, JoypadState, KeyboardState, MouseButton, MouseState};
use crate::core::entity::EntityId;
use crate::core::room::Room;

//=== Constants ===========================================================

/// Number of players with a persisted pad buffer.
pub const MAX_PLAYERS: usize = 2;

//=== InputRouter =========================================================

/// Per-frame dispatcher holding the two players' pad buffers.
#[derive(Debug, Default)]
pub struct InputRouter {
    players: [JoypadState; MAX_PLAYERS],
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Router with buffers sized for the pads `input` has attached.
    pub fn for_source<I: InputSource + ?Sized>(input: &I) -> Self {
        let mut router = Self::new();
        for (index, player) in router.players.iter_mut().enumerate() {
            if let Some(device) = input.joystick(index) {
                *player = JoypadState::for_device(device);
            }
        }
        router
    }

    //--- Dispatch ---------------------------------------------------------

    pub fn dispatch_keyboard(&self, room: &mut Room, keys: &KeyboardState) {
        for id in room.keyboard_objects().to_vec() {
            room.dispatch(id, |entity, room| entity.key_pressed(id, room, keys));
        }
    }

    /// Re-reads both pads and dispatches if any input is active.
    ///
    /// Returns `true` if the snapshot was dispatched.
    pub fn dispatch_joysticks<I: InputSource + ?Sized>(&mut self, room: &mut Room, input: &I) -> bool {
        let mut signal = false;

        for (index, player) in self.players.iter_mut().enumerate() {
            match input.joystick(index) {
                Some(device) => signal |= player.refresh(device),
                None if player.is_connected() => {
                    debug!(target: "input", "Player {} joystick detached", index + 1);
                    *player = JoypadState::new();
                }
                None => {}
            }
        }

        if !signal {
            return false;
        }

        let [p1, p2] = &self.players;
        for id in room.keyboard_objects().to_vec() {
            room.dispatch(id, |entity, room| entity.joy_pad_signal(id, room, p1, p2));
        }
        true
    }

    pub fn dispatch_mouse(&self, room: &mut Room, mouse: MouseState) {
        for id in room.mouse_objects().to_vec() {
            room.dispatch(id, |entity, room| entity.mouse_event(id, room, mouse));
        }
    }

    /// Delivers `clicked(button)` to every mouse object under the cursor.
    ///
    /// Hits are decided before any callback runs. Returns how many objects
    /// received the click.
    pub fn dispatch_click(&self, room: &mut Room, mouse: MouseState, button: MouseButton) -> usize {
        let hits: Vec<EntityId> = room
            .mouse_objects()
            .iter()
            .copied()
            .filter(|&id| {
                room.body(id)
                    .is_some_and(|body| body.rect().contains_point(mouse.x, mouse.y))
            })
            .collect();

        let delivered = hits
            .into_iter()
            .filter(|&id| room.dispatch(id, |entity, room| entity.clicked(id, room, button)))
            .count();

        trace!(
            target: "input",
            "{:?} click at ({}, {}) reached {} objects",
            button, mouse.x, mouse.y, delivered
        );
        delivered
    }

    //--- Queries ----------------------------------------------------------

    /// Pad buffer of player `index` (0 or 1).
    pub fn player(&self, index: usize) -> Option<&JoypadState> {
        self.players.get(index)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
