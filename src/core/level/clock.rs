//=========================================================================
// Frame Clock
//=========================================================================
//
// Fixed-rate throttle for the level loop.
//
// tick() sleeps off whatever is left of the previous frame, then starts
// the next one. A frame that overran is not made up for.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use log::trace;

//=== FrameClock ==========================================================

#[derive(Debug)]
pub struct FrameClock {
    frame_duration: Duration,
    frame_start: Option<Instant>,
}

impl FrameClock {
    /// Clock pacing `fps` frames per second.
    ///
    /// # Panics
    ///
    /// Panics if the frame period `1 / fps` is not a valid `Duration`.
    /// `LevelConfig::validate` rejects every such rate.
    pub fn new(fps: f64) -> Self {
        Self {
            frame_duration: Duration::from_secs_f64(1.0 / fps),
            frame_start: None,
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Waits for the previous frame's slot to run out and starts a new one.
    ///
    /// Returns how long the previous frame's work took. The first call
    /// returns immediately.
    pub fn tick(&mut self) -> Duration {
        let elapsed = match self.frame_start {
            Some(start) => start.elapsed(),
            None => Duration::ZERO,
        };

        if self.frame_start.is_some() {
            if elapsed < self.frame_duration {
                thread::sleep(self.frame_duration - elapsed);
            } else {
                trace!(target: "level", "Frame overran by {:?}", elapsed - self.frame_duration);
            }
        }

        self.frame_start = Some(Instant::now());
        elapsed
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
