//=========================================================================
// Native Gamepads
//=========================================================================
//
// gilrs-backed `GamepadSource`.
//
// Every attached pad is exposed with the same fixed layout, whatever the
// hardware reports:
//
//   buttons: South East West North LB RB LT RT Select Start L3 R3
//            DPadUp DPadDown DPadLeft DPadRight Mode
//   axes:    LeftStickX LeftStickY RightStickX RightStickY LeftZ RightZ
//
// Axis values inside the deadzone read as exactly 0.0, so a resting stick
// never counts as a signal.
//
//=========================================================================

//=== External Dependencies ===============================================

use gilrs::{Axis, Button, Gilrs};
use log::{debug, info};

//=== Internal Dependencies ===============================================

use crate::core::input::{JoystickSnapshot, MAX_PLAYERS};
use crate::core::platform_bridge::GamepadSource;

//=== Layout ==============================================================

const BUTTONS: [Button; 17] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
    Button::Mode,
];

const AXES: [Axis; 6] = [
    Axis::LeftStickX,
    Axis::LeftStickY,
    Axis::RightStickX,
    Axis::RightStickY,
    Axis::LeftZ,
    Axis::RightZ,
];

const DEFAULT_DEADZONE: f32 = 0.15;

//=== GilrsGamepads =======================================================

pub(crate) struct GilrsGamepads {
    gilrs: Gilrs,
    deadzone: f32,
    attached: usize,
}

impl GilrsGamepads {
    pub(crate) fn new() -> Result<Self, gilrs::Error> {
        let gilrs = Gilrs::new()?;
        info!(target: "platform", "Gamepad backend ready");
        Ok(Self {
            gilrs,
            deadzone: DEFAULT_DEADZONE,
            attached: 0,
        })
    }
}

impl GamepadSource for GilrsGamepads {
    fn poll(&mut self, pads: &mut Vec<JoystickSnapshot>) {
        // Draining events is what updates gilrs' cached pad state.
        while self.gilrs.next_event().is_some() {}

        pads.clear();
        for (_, gamepad) in self
            .gilrs
            .gamepads()
            .filter(|(_, gamepad)| gamepad.is_connected())
            .take(MAX_PLAYERS)
        {
            pads.push(JoystickSnapshot {
                buttons: BUTTONS.iter().map(|&button| gamepad.is_pressed(button)).collect(),
                axes: AXES
                    .iter()
                    .map(|&axis| apply_deadzone(gamepad.value(axis), self.deadzone))
                    .collect(),
            });
        }

        if pads.len() != self.attached {
            debug!(target: "platform::input", "Gamepads attached: {} -> {}", self.attached, pads.len());
            self.attached = pads.len();
        }
    }
}

//=== Helpers =============================================================

fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if value.abs() < deadzone {
        0.0
    } else {
        value
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadzone_zeroes_small_values() {
        assert_eq!(apply_deadzone(0.1, DEFAULT_DEADZONE), 0.0);
        assert_eq!(apply_deadzone(-0.14, DEFAULT_DEADZONE), 0.0);
        assert_eq!(apply_deadzone(0.5, DEFAULT_DEADZONE), 0.5);
        assert_eq!(apply_deadzone(-1.0, DEFAULT_DEADZONE), -1.0);
    }

    #[test]
    fn layout_is_fixed() {
        assert_eq!(BUTTONS.len(), 17);
        assert_eq!(AXES.len(), 6);
    }
}
