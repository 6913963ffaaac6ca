//=========================================================================
// Level Errors
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use super::LevelState;

//=== ConfigError =========================================================

/// Malformed [`LevelConfig`](super::LevelConfig).
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Width or height is zero.
    EmptyScreen { width: u32, height: u32 },

    /// Frame rate is zero, negative or not finite.
    InvalidFrameRate(f64),

    /// More joysticks required than there are players.
    TooManyJoysticks(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyScreen { width, height } => {
                write!(f, "Screen size must be non-zero, got {}x{}", width, height)
            }
            Self::InvalidFrameRate(fps) => write!(f, "Frame rate must be positive, got {}", fps),
            Self::TooManyJoysticks(count) => {
                write!(f, "At most two joysticks can be required, got {}", count)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

//=== LevelError ==========================================================

/// Failures constructing or running a level.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelError {
    Config(ConfigError),

    /// A required joystick is not attached.
    MissingJoystick { index: usize },

    /// `run()` called on a level that already ran.
    NotIdle(LevelState),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Invalid level configuration: {}", e),
            Self::MissingJoystick { index } => {
                write!(f, "Required joystick {} is not connected", index + 1)
            }
            Self::NotIdle(state) => write!(f, "Level cannot run from state {:?}", state),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for LevelError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
