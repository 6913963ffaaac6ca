//=========================================================================
// Input Processor
//=========================================================================
//
// Translates winit window events into engine `InputEvent`s.
//
//   WindowEvent → process() → Routed::{Discrete, Continuous} → InputBuffer
//
// Modifier state arrives as its own event (`ModifiersChanged`), so it is
// cached here and stamped onto every key and button event after it.
// Keys without an engine `KeyCode` are dropped.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, KeyEvent, MouseButton as WinitMouseButton, WindowEvent},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== Routed ==============================================================

/// A translated event and the buffer lane it belongs in.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Routed {
    Discrete(InputEvent),
    Continuous(InputEvent),
}

//=== InputProcessor ======================================================

pub(crate) struct InputProcessor {
    modifiers: Modifiers,
}

impl InputProcessor {
    pub(crate) fn new() -> Self {
        Self {
            modifiers: Modifiers::NONE,
        }
    }

    pub(crate) fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Translates one window event.
    ///
    /// Returns `None` for events that carry no input (or only update the
    /// cached modifiers).
    pub(crate) fn process(&mut self, event: &WindowEvent) -> Option<Routed> {
        match event {
            WindowEvent::ModifiersChanged(state) => {
                self.modifiers = Modifiers::from(state.state());
                None
            }
            WindowEvent::KeyboardInput { event, .. } => self.key(event).map(Routed::Discrete),
            WindowEvent::MouseInput { state, button, .. } => {
                Some(Routed::Discrete(self.button(*button, *state)))
            }
            WindowEvent::CursorMoved { position, .. } => {
                Some(Routed::Continuous(cursor(position.x, position.y)))
            }
            _ => None,
        }
    }

    //--- Translation ------------------------------------------------------

    fn key(&self, event: &KeyEvent) -> Option<InputEvent> {
        let PhysicalKey::Code(code) = event.physical_key else {
            return None;
        };

        let key = KeyCode::from(code);
        if key == KeyCode::Unidentified {
            return None;
        }

        Some(self.key_event(key, event.state))
    }

    fn key_event(&self, key: KeyCode, state: ElementState) -> InputEvent {
        let modifiers = self.modifiers;
        match state {
            ElementState::Pressed => InputEvent::KeyDown { key, modifiers },
            ElementState::Released => InputEvent::KeyUp { key, modifiers },
        }
    }

    fn button(&self, button: WinitMouseButton, state: ElementState) -> InputEvent {
        let button = MouseButton::from(button);
        let modifiers = self.modifiers;
        match state {
            ElementState::Pressed => InputEvent::MouseButtonDown { button, modifiers },
            ElementState::Released => InputEvent::MouseButtonUp { button, modifiers },
        }
    }
}

fn cursor(x: f64, y: f64) -> InputEvent {
    InputEvent::MouseMoved { x: x as f32, y: y as f32 }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Winit already folds macOS Cmd into Ctrl and Option into Alt.
impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode as W;
        match code {
            W::Digit0 => Self::Digit0,
            W::Digit1 => Self::Digit1,
            W::Digit2 => Self::Digit2,
            W::Digit3 => Self::Digit3,
            W::Digit4 => Self::Digit4,
            W::Digit5 => Self::Digit5,
            W::Digit6 => Self::Digit6,
            W::Digit7 => Self::Digit7,
            W::Digit8 => Self::Digit8,
            W::Digit9 => Self::Digit9,

            W::KeyA => Self::KeyA,
            W::KeyB => Self::KeyB,
            W::KeyC => Self::KeyC,
            W::KeyD => Self::KeyD,
            W::KeyE => Self::KeyE,
            W::KeyF => Self::KeyF,
            W::KeyG => Self::KeyG,
            W::KeyH => Self::KeyH,
            W::KeyI => Self::KeyI,
            W::KeyJ => Self::KeyJ,
            W::KeyK => Self::KeyK,
            W::KeyL => Self::KeyL,
            W::KeyM => Self::KeyM,
            W::KeyN => Self::KeyN,
            W::KeyO => Self::KeyO,
            W::KeyP => Self::KeyP,
            W::KeyQ => Self::KeyQ,
            W::KeyR => Self::KeyR,
            W::KeyS => Self::KeyS,
            W::KeyT => Self::KeyT,
            W::KeyU => Self::KeyU,
            W::KeyV => Self::KeyV,
            W::KeyW => Self::KeyW,
            W::KeyX => Self::KeyX,
            W::KeyY => Self::KeyY,
            W::KeyZ => Self::KeyZ,

            W::ArrowUp => Self::ArrowUp,
            W::ArrowDown => Self::ArrowDown,
            W::ArrowLeft => Self::ArrowLeft,
            W::ArrowRight => Self::ArrowRight,

            W::ShiftLeft => Self::ShiftLeft,
            W::ShiftRight => Self::ShiftRight,
            W::ControlLeft => Self::ControlLeft,
            W::ControlRight => Self::ControlRight,
            W::AltLeft => Self::AltLeft,
            W::AltRight => Self::AltRight,

            W::F1 => Self::F1,
            W::F2 => Self::F2,
            W::F3 => Self::F3,
            W::F4 => Self::F4,
            W::F5 => Self::F5,
            W::F6 => Self::F6,
            W::F7 => Self::F7,
            W::F8 => Self::F8,
            W::F9 => Self::F9,
            W::F10 => Self::F10,
            W::F11 => Self::F11,
            W::F12 => Self::F12,

            W::Space => Self::Space,
            W::Enter => Self::Enter,
            W::Escape => Self::Escape,
            W::Tab => Self::Tab,
            W::Backspace => Self::Backspace,
            W::Delete => Self::Delete,

            _ => Self::Unidentified,
        }
    }
}

impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => Self::Left,
            WinitMouseButton::Middle => Self::Middle,
            WinitMouseButton::Right => Self::Right,
            _ => Self::Other,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
