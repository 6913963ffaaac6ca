//=========================================================================
// Level Configuration
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use super::error::ConfigError;
use crate::core::input::MAX_PLAYERS;

//=== LevelConfig =========================================================

/// Screen size, frame rate and device requirements of a level.
///
/// # Default Values
///
/// - **FPS**: 60.0
/// - **Required joysticks**: 0
///
/// # Examples
///
/// ```rust
/// use roomloop::prelude::*;
///
/// let config = LevelConfig::new(800, 600)
///     .with_fps(30.0)
///     .with_required_joysticks(1);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelConfig {
    pub screen_width: u32,
    pub screen_height: u32,
    pub fps: f64,
    pub required_joysticks: usize,
}

impl LevelConfig {
    pub fn new(screen_width: u32, screen_height: u32) -> Self {
        Self {
            screen_width,
            screen_height,
            fps: 60.0,
            required_joysticks: 0,
        }
    }

    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    /// Pads that must be attached for the level to start.
    pub fn with_required_joysticks(mut self, count: usize) -> Self {
        self.required_joysticks = count;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(ConfigError::EmptyScreen {
                width: self.screen_width,
                height: self.screen_height,
            });
        }

        // The frame period must also fit in a `Duration`, which rules out
        // rates so small that 1/fps overflows.
        if !self.fps.is_finite() || self.fps <= 0.0 || Duration::try_from_secs_f64(1.0 / self.fps).is_err() {
            return Err(ConfigError::InvalidFrameRate(self.fps));
        }

        if self.required_joysticks > MAX_PLAYERS {
            return Err(ConfigError::TooManyJoysticks(self.required_joysticks));
        }

        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = LevelConfig::new(640, 480);
        assert_eq!(config.fps, 60.0);
        assert_eq!(config.required_joysticks, 0);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn zero_sized_screen_is_rejected() {
        assert_eq!(
            LevelConfig::new(0, 480).validate(),
            Err(ConfigError::EmptyScreen { width: 0, height: 480 })
        );
        assert!(LevelConfig::new(640, 0).validate().is_err());
    }

    #[test]
    fn frame_rate_must_be_positive_and_finite() {
        for fps in [0.0, -30.0, f64::NAN, f64::INFINITY, 1e-30, f64::MIN_POSITIVE] {
            assert!(matches!(
                LevelConfig::new(640, 480).with_fps(fps).validate(),
                Err(ConfigError::InvalidFrameRate(_))
            ));
        }
    }

    #[test]
    fn very_slow_frame_rates_are_accepted() {
        assert!(LevelConfig::new(640, 480).with_fps(0.5).validate().is_ok());
        assert!(LevelConfig::new(640, 480).with_fps(1e-6).validate().is_ok());
    }

    #[test]
    fn at_most_two_joysticks_can_be_required() {
        assert!(LevelConfig::new(640, 480).with_required_joysticks(2).validate().is_ok());
        assert_eq!(
            LevelConfig::new(640, 480).with_required_joysticks(3).validate(),
            Err(ConfigError::TooManyJoysticks(3))
        );
    }
}
