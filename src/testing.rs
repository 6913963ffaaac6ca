//=========================================================================
// Test Doubles
//=========================================================================
//
// Scripted devices for driving levels without a window.
//
// - `ScriptedInput`: replays queued frames of events and pad states, then
//   reports `Quit` forever.
// - `RecordingCanvas`: records clear/blit/present calls in order.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;

use image::RgbaImage;

//=== Internal Dependencies ===============================================

use crate::core::input::{
    InputEvent, InputSource, Joystick, JoystickSnapshot, KeyboardState, MouseState, StateTracker,
    SystemEvent,
};
use crate::core::render::{Canvas, Color, Sprite, SpriteId, SpriteStore};

//=== ScriptedInput =======================================================

struct ScriptedFrame {
    events: Vec<SystemEvent>,
    pads: Option<Vec<JoystickSnapshot>>,
}

/// Input source replaying a fixed script, one frame per poll.
#[derive(Default)]
pub(crate) struct ScriptedInput {
    frames: VecDeque<ScriptedFrame>,
    tracker: StateTracker,
    pads: Vec<JoystickSnapshot>,
    polls: usize,
}

impl ScriptedInput {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Pad attached from the start, as the next player.
    pub(crate) fn with_joystick(mut self, pad: JoystickSnapshot) -> Self {
        self.pads.push(pad);
        self
    }

    /// Queues one frame of keyboard/mouse events.
    pub(crate) fn frame(mut self, events: Vec<InputEvent>) -> Self {
        self.frames.push_back(ScriptedFrame {
            events: events.into_iter().map(SystemEvent::Input).collect(),
            pads: None,
        });
        self
    }

    /// Queues `count` frames with no events.
    pub(crate) fn idle_frames(mut self, count: usize) -> Self {
        for _ in 0..count {
            self = self.frame(Vec::new());
        }
        self
    }

    /// Queues a frame that replaces the attached pads.
    pub(crate) fn pads_frame(mut self, pads: Vec<JoystickSnapshot>) -> Self {
        self.frames.push_back(ScriptedFrame {
            events: Vec::new(),
            pads: Some(pads),
        });
        self
    }

    pub(crate) fn polls(&self) -> usize {
        self.polls
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Vec<SystemEvent> {
        self.polls += 1;

        let Some(frame) = self.frames.pop_front() else {
            return vec![SystemEvent::Quit];
        };

        if let Some(pads) = frame.pads {
            self.pads = pads;
        }
        for event in &frame.events {
            if let SystemEvent::Input(input) = event {
                self.tracker.process_event(input);
            }
        }
        frame.events
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

//=== RecordingCanvas =====================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CanvasCall {
    Clear(Color),
    Blit(SpriteId, i32, i32),
    Present,
}

/// Canvas that only remembers what it was asked to do.
#[derive(Debug, Default)]
pub(crate) struct RecordingCanvas {
    calls: Vec<CanvasCall>,
    sprites: Vec<(u32, u32)>,
}

impl RecordingCanvas {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn calls(&self) -> &[CanvasCall] {
        &self.calls
    }

    pub(crate) fn presents(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| **call == CanvasCall::Present)
            .count()
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self, color: Color) {
        self.calls.push(CanvasCall::Clear(color));
    }

    fn blit(&mut self, sprite: SpriteId, x: i32, y: i32) {
        self.calls.push(CanvasCall::Blit(sprite, x, y));
    }

    fn present(&mut self) {
        self.calls.push(CanvasCall::Present);
    }
}

impl SpriteStore for RecordingCanvas {
    fn insert_sprite(&mut self, image: RgbaImage) -> Sprite {
        let (width, height) = image.dimensions();
        let id = SpriteId::new(self.sprites.len() as u32);
        self.sprites.push((width, height));
        Sprite { id, width, height }
    }
}
