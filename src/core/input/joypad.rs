//=========================================================================
// Joypads
//=========================================================================
//
// Device-side trait for joysticks/gamepads and the persisted per-player
// state buffer the router dispatches.
//
// Buffer layout (one flat `Vec<f32>` per player):
// ```text
//   index:  0    1    ..  B-1 | ...                | len-A .. len-2  len-1
//           btn0 btn1 ..  btnB|                    | axisA-1 ..  axis1 axis0
// ```
// Buttons are stored as 0.0/1.0 from the front, axes from the back.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Joystick ============================================================

/// A joystick or gamepad as seen by the engine.
pub trait Joystick {
    fn button_count(&self) -> usize;

    /// Returns `true` while button `index` is pressed.
    fn button(&self, index: usize) -> bool;

    fn axis_count(&self) -> usize;

    /// Axis value in `-1.0..=1.0`; `0.0` at rest.
    fn axis(&self, index: usize) -> f32;
}

//=== JoystickSnapshot ====================================================

/// Plain button/axis values implementing [`Joystick`].
///
/// Used as the frozen view of a native pad and by scripted input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoystickSnapshot {
    pub buttons: Vec<bool>,
    pub axes: Vec<f32>,
}

impl JoystickSnapshot {
    pub fn new(button_count: usize, axis_count: usize) -> Self {
        Self {
            buttons: vec![false; button_count],
            axes: vec![0.0; axis_count],
        }
    }
}

impl Joystick for JoystickSnapshot {
    fn button_count(&self) -> usize {
        self.buttons.len()
    }

    fn button(&self, index: usize) -> bool {
        self.buttons.get(index).copied().unwrap_or(false)
    }

    fn axis_count(&self) -> usize {
        self.axes.len()
    }

    fn axis(&self, index: usize) -> f32 {
        self.axes.get(index).copied().unwrap_or(0.0)
    }
}

//=== JoypadState =========================================================

/// Persisted button/axis buffer for one player.
///
/// A disconnected player keeps an empty buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoypadState {
    values: Vec<f32>,
    button_count: usize,
    axis_count: usize,
}

impl JoypadState {
    /// Empty buffer for a player with no device.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer sized for `device`, filled with its current values.
    pub fn for_device(device: &dyn Joystick) -> Self {
        let mut state = Self::new();
        state.refresh(device);
        state
    }

    /// Re-reads every button and axis from `device`.
    ///
    /// Returns `true` if any button is pressed or any axis is off-center.
    pub fn refresh(&mut self, device: &dyn Joystick) -> bool {
        let buttons = device.button_count();
        let axes = device.axis_count();

        if buttons != self.button_count || axes != self.axis_count {
            debug!(
                target: "input",
                "Joypad layout changed: {}b/{}a -> {}b/{}a",
                self.button_count, self.axis_count, buttons, axes
            );
            self.button_count = buttons;
            self.axis_count = axes;
            self.values = vec![0.0; buttons + axes];
        }

        let mut signal = false;

        for i in 0..buttons {
            let pressed = device.button(i);
            self.values[i] = if pressed { 1.0 } else { 0.0 };
            signal |= pressed;
        }

        let len = self.values.len();
        for i in 0..axes {
            let value = device.axis(i);
            self.values[len - 1 - i] = value;
            signal |= value != 0.0;
        }

        signal
    }

    //--- Queries ----------------------------------------------------------

    pub fn button_count(&self) -> usize {
        self.button_count
    }

    pub fn axis_count(&self) -> usize {
        self.axis_count
    }

    /// Returns `true` if this player has a device with at least one input.
    pub fn is_connected(&self) -> bool {
        !self.values.is_empty()
    }

    pub fn button(&self, index: usize) -> bool {
        index < self.button_count && self.values[index] != 0.0
    }

    pub fn axis(&self, index: usize) -> f32 {
        if index < self.axis_count {
            self.values[self.values.len() - 1 - index]
        } else {
            0.0
        }
    }

    /// Returns `true` if any button is pressed or any axis is off-center.
    pub fn has_signal(&self) -> bool {
        (0..self.button_count).any(|i| self.button(i))
            || (0..self.axis_count).any(|i| self.axis(i) != 0.0)
    }

    /// Raw buffer in the layout described at the top of this module.
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_puts_axes_at_the_back() {
        let mut pad = JoystickSnapshot::new(3, 2);
        pad.buttons[1] = true;
        pad.axes[0] = -0.5;
        pad.axes[1] = 0.25;

        let state = JoypadState::for_device(&pad);

        assert_eq!(state.as_slice(), &[0.0, 1.0, 0.0, 0.25, -0.5]);
        assert!(state.button(1));
        assert!(!state.button(0));
        assert_eq!(state.axis(0), -0.5);
        assert_eq!(state.axis(1), 0.25);
    }

    #[test]
    fn refresh_reports_signal() {
        let mut pad = JoystickSnapshot::new(2, 2);
        let mut state = JoypadState::for_device(&pad);
        assert!(!state.refresh(&pad));

        pad.axes[1] = 1.0;
        assert!(state.refresh(&pad));

        pad.axes[1] = 0.0;
        pad.buttons[0] = true;
        assert!(state.refresh(&pad));
        assert!(state.has_signal());
    }

    #[test]
    fn refresh_resizes_on_layout_change() {
        let mut state = JoypadState::for_device(&JoystickSnapshot::new(1, 0));
        assert_eq!(state.as_slice().len(), 1);

        state.refresh(&JoystickSnapshot::new(4, 2));
        assert_eq!(state.button_count(), 4);
        assert_eq!(state.axis_count(), 2);
        assert_eq!(state.as_slice().len(), 6);
    }

    #[test]
    fn out_of_range_queries_are_neutral() {
        let state = JoypadState::new();
        assert!(!state.is_connected());
        assert!(!state.button(3));
        assert_eq!(state.axis(3), 0.0);
        assert!(!state.has_signal());
    }
}
