//=========================================================================
// Input
//=========================================================================
//
// Device-neutral input for the level loop.
//
// Architecture:
// ```text
//   InputSource (platform / scripted)
//     ├─ poll()      → Vec<SystemEvent>      once per frame
//     ├─ keyboard()  → KeyboardState          held keys
//     ├─ mouse()     → MouseState             cursor + 3 buttons
//     └─ joystick(i) → &dyn Joystick          up to two pads
//                         ↓
//                    InputRouter → Entity hooks
// ```
//
// Components:
// - `event`: engine key/button/event types
// - `state_tracker`: folds events into held-key and cursor state
// - `snapshot`: per-frame keyboard and mouse views handed to objects
// - `joypad`: the `Joystick` trait and per-player buffers
// - `router`: per-frame dispatch to keyboard/mouse objects
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;
mod joypad;
mod router;
mod snapshot;
mod state_tracker;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode, Modifiers, MouseButton};
pub use joypad::{Joystick, JoypadState, JoystickSnapshot};
pub use router::{InputRouter, MAX_PLAYERS};
pub use snapshot::{KeyboardState, MouseState};
pub use state_tracker::StateTracker;

//=== SystemEvent =========================================================

/// Everything the level sees when it polls its input source.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemEvent {
    /// The window was closed or the platform went away.
    Quit,

    /// A keyboard or mouse event, in arrival order.
    Input(InputEvent),
}

//=== InputSource =========================================================

/// Where a level reads its devices from.
///
/// `poll` is called once per frame and advances the source; the state
/// queries reflect everything polled so far.
pub trait InputSource {
    /// Events that arrived since the previous poll.
    fn poll(&mut self) -> Vec<SystemEvent>;

    /// Keys currently held.
    fn keyboard(&self) -> KeyboardState;

    /// Cursor position and button state.
    fn mouse(&self) -> MouseState;

    /// Number of joysticks currently attached.
    fn joystick_count(&self) -> usize;

    /// Joystick `index`, if attached.
    fn joystick(&self, index: usize) -> Option<&dyn Joystick>;
}
