//=========================================================================
// Session
//=========================================================================
//
// State that outlives a single level: the running score and the
// process-level exit request.
//
// A session is moved into each level at construction and handed back by
// `Level::into_parts()` once the level has finished.
//
//=========================================================================

//=== Session =============================================================

/// Game-wide state carried from one level to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    score: i64,
    exiting: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    /// Adds `delta` (possibly negative) to the score, returning the new total.
    pub fn add_score(&mut self, delta: i64) -> i64 {
        self.score += delta;
        self.score
    }

    pub fn reset_score(&mut self) {
        self.score = 0;
    }

    /// Returns `true` once the player asked to close the game.
    pub fn is_exiting(&self) -> bool {
        self.exiting
    }

    pub fn request_exit(&mut self) {
        self.exiting = true;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
