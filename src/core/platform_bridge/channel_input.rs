//=========================================================================
// Channel Input
//=========================================================================
//
// `InputSource` fed by the platform thread.
//
// Architecture:
//   Receiver<PlatformEvent> → poll() → StateTracker → SystemEvents
//   GamepadSource           → poll() → JoystickSnapshots
//
// Bounded polling prevents a flooded channel from starving the frame.
// A closed window or a dropped sender is reported as `Quit`, on that
// poll and every poll after it.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::input::{
    InputSource, Joystick, JoystickSnapshot, KeyboardState, MouseState, StateTracker, SystemEvent,
};

//=== Constants ===========================================================

const MAX_EVENTS_PER_FRAME: usize = 100;

//=== GamepadSource =======================================================

/// Native gamepad backend polled once per frame.
pub trait GamepadSource {
    /// Rewrites `pads` with the current state of every attached pad,
    /// player 1 first.
    fn poll(&mut self, pads: &mut Vec<JoystickSnapshot>);
}

//=== ChannelInput ========================================================

/// Input source draining [`PlatformEvent`]s from the windowing thread.
pub struct ChannelInput {
    receiver: Receiver<PlatformEvent>,
    tracker: StateTracker,
    pads: Vec<JoystickSnapshot>,
    gamepads: Option<Box<dyn GamepadSource>>,
    closed: bool,
}

impl ChannelInput {
    pub fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            tracker: StateTracker::new(),
            pads: Vec::new(),
            gamepads: None,
            closed: false,
        }
    }

    /// Reads pads from `source`, starting with an immediate poll so pads
    /// attached at startup count toward a level's requirements.
    pub fn with_gamepads(mut self, mut source: Box<dyn GamepadSource>) -> Self {
        source.poll(&mut self.pads);
        debug!(target: "input", "{} gamepads attached at startup", self.pads.len());
        self.gamepads = Some(source);
        self
    }

    /// Returns `true` once the window closed or the platform went away.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self, events: &mut Vec<SystemEvent>) {
        self.closed = true;
        events.push(SystemEvent::Quit);
    }
}

impl InputSource for ChannelInput {
    fn poll(&mut self) -> Vec<SystemEvent> {
        if let Some(gamepads) = self.gamepads.as_mut() {
            gamepads.poll(&mut self.pads);
        }

        let mut events = Vec::new();
        if self.closed {
            events.push(SystemEvent::Quit);
            return events;
        }

        let mut drained = 0;
        while drained < MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(PlatformEvent::Inputs { discrete, continuous }) => {
                    for event in discrete.into_iter().chain(continuous) {
                        self.tracker.process_event(&event);
                        events.push(SystemEvent::Input(event));
                    }
                    drained += 1;
                }
                Ok(PlatformEvent::WindowClosed) => {
                    debug!(target: "input", "Window closed");
                    self.close(&mut events);
                    break;
                }
                Err(TryRecvError::Disconnected) => {
                    warn!(target: "input", "Platform channel disconnected");
                    self.close(&mut events);
                    break;
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= MAX_EVENTS_PER_FRAME {
            warn!(target: "input", "Event queue backlog: drained {} batches this frame", drained);
        }

        events
    }

    fn keyboard(&self) -> KeyboardState {
        self.tracker.keyboard()
    }

    fn mouse(&self) -> MouseState {
        self.tracker.mouse()
    }

    fn joystick_count(&self) -> usize {
        self.pads.len()
    }

    fn joystick(&self, index: usize) -> Option<&dyn Joystick> {
        self.pads.get(index).map(|pad| pad as &dyn Joystick)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
