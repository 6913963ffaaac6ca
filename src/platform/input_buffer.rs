//=========================================================================
// Input Buffer
//=========================================================================
//
// Per-redraw accumulator on the windowing thread.
//
//   discrete:   key/button events, arrival order, consecutive repeats
//               dropped (OS key repeat)
//   continuous: latest cursor position only
//
// `drain()` hands both out at the frame boundary and keeps capacity.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== Constants ===========================================================

const DISCRETE_BASE: usize = 64;

//=== InputBuffer =========================================================

pub(crate) struct InputBuffer {
    discrete: Vec<InputEvent>,
    cursor: Option<InputEvent>,
}

impl InputBuffer {
    pub(crate) fn new() -> Self {
        Self {
            discrete: Vec::with_capacity(DISCRETE_BASE),
            cursor: None,
        }
    }

    /// Keeps only the most recent cursor move.
    pub(crate) fn push_continuous(&mut self, event: InputEvent) {
        self.cursor = Some(event);
    }

    pub(crate) fn push_discrete(&mut self, event: InputEvent) {
        if self.discrete.last() != Some(&event) {
            self.discrete.push(event);
        }
    }

    /// Takes everything buffered since the last drain.
    ///
    /// Returns `None` if nothing arrived.
    pub(crate) fn drain(&mut self) -> Option<(Vec<InputEvent>, Vec<InputEvent>)> {
        if self.is_empty() {
            return None;
        }

        let discrete = self.discrete.drain(..).collect();
        let continuous = self.cursor.take().into_iter().collect();
        Some((discrete, continuous))
    }

    pub(crate) fn len(&self) -> usize {
        self.discrete.len() + usize::from(self.cursor.is_some())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.cursor.is_none()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
