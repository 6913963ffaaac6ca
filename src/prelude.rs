//=========================================================================
// Prelude
//=========================================================================
//
// Re-exports what a game needs to write entities and rooms.
//
// Usage:
//   use roomloop::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Game runner
pub use crate::engine::{EngineError, Game, GameBuilder, RoomSetup};

// Object model
pub use crate::core::entity::{Body, Entity, EntityId, Rect, Tag};
pub use crate::core::room::Room;
pub use crate::core::session::Session;
pub use crate::core::timer::TimerId;

// Levels
pub use crate::core::level::{Level, LevelConfig, LevelError, LevelOutcome, LevelState};

// Input
pub use crate::core::input::{
    InputSource, JoypadState, KeyCode, KeyboardState, Modifiers, MouseButton, MouseState, SystemEvent,
};

// Rendering, sound and assets
pub use crate::core::assets::{AssetError, AssetLoader};
pub use crate::core::audio::{Mixer, SoundId};
pub use crate::core::render::{Canvas, Color, PixelCanvas, PresentedFrame, Sprite, SpriteId};
