//=========================================================================
// Game Runner
//
// Runs a sequence of rooms against a real window.
//
// Architecture:
// ```text
//     GameBuilder  ──build()──>  Game  ──run(rooms)──>  [Runtime]
//         │                                               │
//         ├─ with_fps()                 main thread:  Platform (winit)
//         ├─ with_screen_size()                 PlatformEvent │ ↑ PresentedFrame
//         ├─ with_title()               core thread:  ChannelInput
//         ├─ with_channel_capacity()                      ↓
//         └─ with_asset_root()                        Level per room
//                                                         ↓
//                                                     PixelCanvas::present
// ```
//
// Rooms run in order, each on a fresh `Level` sharing one `Session`.
// Every level draws into a `PixelCanvas` that forwards its presented frames
// to the window over a one-slot channel.
// A quit (window closed) ends the sequence early. When the core thread
// finishes, its shutdown sender drops and the window closes.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::path::PathBuf;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::assets::{AssetError, AssetLoader};
use crate::core::audio::Mixer;
use crate::core::level::{Level, LevelConfig, LevelError};
use crate::core::platform_bridge::{ChannelInput, PlatformError, PlatformEvent};
use crate::core::render::{PixelCanvas, PresentedFrame};
use crate::core::session::Session;
use crate::platform::{GilrsGamepads, Platform, WindowSettings};

//=== RoomSetup ===========================================================

/// Populates one level before it runs: loads sprites, adds objects, sets
/// the background.
pub type RoomSetup =
    Box<dyn FnOnce(&mut Level<ChannelInput, PixelCanvas>, &AssetLoader) -> Result<(), AssetError> + Send>;

//=== EngineError =========================================================

#[derive(Debug)]
pub enum EngineError {
    Platform(PlatformError),
    Level(LevelError),
    Asset(AssetError),

    /// The level loop panicked; the session is lost.
    CoreThreadPanicked,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Platform(e) => write!(f, "Platform error: {}", e),
            Self::Level(e) => write!(f, "Level error: {}", e),
            Self::Asset(e) => write!(f, "Asset error: {}", e),
            Self::CoreThreadPanicked => write!(f, "Core thread panicked"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Platform(e) => Some(e),
            Self::Level(e) => Some(e),
            Self::Asset(e) => Some(e),
            Self::CoreThreadPanicked => None,
        }
    }
}

impl From<PlatformError> for EngineError {
    fn from(e: PlatformError) -> Self {
        Self::Platform(e)
    }
}

impl From<LevelError> for EngineError {
    fn from(e: LevelError) -> Self {
        Self::Level(e)
    }
}

impl From<AssetError> for EngineError {
    fn from(e: AssetError) -> Self {
        Self::Asset(e)
    }
}

//=== GameBuilder =========================================================

/// Builder for a [`Game`].
///
/// # Default Values
///
/// - **FPS**: 60.0
/// - **Screen**: 800x600
/// - **Channel capacity**: 128 batches
/// - **Asset root**: the working directory
///
/// # Examples
///
/// ```no_run
/// use roomloop::prelude::*;
///
/// const PLAYER: Tag = Tag::new("player");
///
/// struct Player;
/// impl Entity for Player {}
///
/// let title: RoomSetup = Box::new(|level, assets| {
///     let ship = assets.load_image(level.canvas_mut(), "ship.png")?;
///     level.add_room_object(Body::new(PLAYER, 100, 100).with_sprite(ship), Player);
///     Ok(())
/// });
///
/// let session = GameBuilder::new()
///     .with_title("Shooter")
///     .with_screen_size(640, 480)
///     .with_asset_root("assets")
///     .build()
///     .run(vec![title])?;
///
/// println!("Final score: {}", session.score());
/// # Ok::<(), EngineError>(())
/// ```
pub struct GameBuilder {
    fps: f64,
    screen_width: u32,
    screen_height: u32,
    title: String,
    channel_capacity: usize,
    asset_root: PathBuf,
}

impl GameBuilder {
    pub fn new() -> Self {
        Self {
            fps: 60.0,
            screen_width: 800,
            screen_height: 600,
            title: "roomloop".to_string(),
            channel_capacity: 128,
            asset_root: PathBuf::from("."),
        }
    }

    /// Target frame rate of every level.
    ///
    /// # Panics
    ///
    /// Panics if `fps` is not a positive finite number.
    pub fn with_fps(mut self, fps: f64) -> Self {
        assert!(fps.is_finite() && fps > 0.0, "FPS must be positive, got {}", fps);
        self.fps = fps;
        self
    }

    /// Window and framebuffer size in pixels.
    pub fn with_screen_size(mut self, width: u32, height: u32) -> Self {
        self.screen_width = width;
        self.screen_height = height;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Batches the platform may queue ahead of the level loop.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Directory holding `Images/` and `Sounds/`.
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    pub fn build(self) -> Game {
        info!(
            target: "engine",
            "Building game ({}x{} @ {} fps, channel: {})",
            self.screen_width, self.screen_height, self.fps, self.channel_capacity
        );

        Game {
            config: LevelConfig::new(self.screen_width, self.screen_height).with_fps(self.fps),
            title: self.title,
            channel_capacity: self.channel_capacity,
            assets: AssetLoader::new(self.asset_root),
        }
    }
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Game ================================================================

/// A configured game, ready to run its rooms.
pub struct Game {
    config: LevelConfig,
    title: String,
    channel_capacity: usize,
    assets: AssetLoader,
}

impl Game {
    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn assets(&self) -> &AssetLoader {
        &self.assets
    }

    /// Opens the window and plays `rooms` in order.
    ///
    /// Blocks until the last room completes or the player quits, then
    /// returns the final session.
    ///
    /// # Errors
    ///
    /// The first platform, level or asset error. A platform failure is
    /// reported even if the rooms finished.
    ///
    /// # Panics
    ///
    /// Must be called from the main thread on platforms where winit
    /// requires it.
    pub fn run(self, rooms: Vec<RoomSetup>) -> Result<Session, EngineError> {
        info!(target: "engine", "Starting game with {} rooms", rooms.len());

        self.config.validate().map_err(LevelError::from)?;

        let (tx, rx) = bounded(self.channel_capacity);
        let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
        let (frame_tx, frame_rx) = bounded(1);

        let config = self.config;
        let assets = self.assets.clone();
        let core_handle = thread::Builder::new()
            .name("roomloop-core".to_string())
            .spawn(move || {
                let result = play_rooms(config, assets, rx, frame_tx, rooms);
                drop(shutdown_tx);
                result
            })
            .map_err(|_| EngineError::CoreThreadPanicked)?;

        let settings = WindowSettings {
            title: self.title,
            width: self.config.screen_width,
            height: self.config.screen_height,
        };
        let platform_result = Platform::new(tx, settings, shutdown_rx, frame_rx).run();
        info!(target: "engine", "Platform event loop exited");

        let core_result = match core_handle.join() {
            Ok(result) => result,
            Err(_) => {
                error!(target: "engine", "Core thread panicked");
                Err(EngineError::CoreThreadPanicked)
            }
        };

        if let Err(e) = platform_result {
            error!(target: "engine", "Platform error: {}", e);
            return Err(e.into());
        }

        let session = core_result?;
        info!(target: "engine", "Game finished with score {}", session.score());
        Ok(session)
    }
}

//=== Core Thread =========================================================

/// Runs each room to completion on the current thread.
///
/// Gamepads and the audio output are opened here because their handles
/// cannot cross threads. The mixer moves from level to level.
fn play_rooms(
    config: LevelConfig,
    assets: AssetLoader,
    receiver: Receiver<PlatformEvent>,
    frames: Sender<PresentedFrame>,
    rooms: Vec<RoomSetup>,
) -> Result<Session, EngineError> {
    let mut input = ChannelInput::new(receiver);
    match GilrsGamepads::new() {
        Ok(gamepads) => input = input.with_gamepads(Box::new(gamepads)),
        Err(e) => warn!(target: "engine", "Gamepads unavailable: {}", e),
    }

    let mut mixer = Mixer::open();
    let mut session = Session::new();
    let total = rooms.len();

    for (index, setup) in rooms.into_iter().enumerate() {
        let canvas =
            PixelCanvas::new(config.screen_width, config.screen_height).with_frame_sender(frames.clone());
        let mut level = Level::new(config, input, canvas, session)?.with_mixer(mixer);

        setup(&mut level, &assets)?;
        info!(target: "engine", "Room {}/{} ready", index + 1, total);

        let outcome = level.run()?;
        mixer = level.take_mixer();
        let (returned_input, _, returned_session) = level.into_parts();
        input = returned_input;
        session = returned_session;

        if outcome.is_quit() || session.is_exiting() {
            info!(target: "engine", "Player quit during room {}/{}", index + 1, total);
            break;
        }
    }

    Ok(session)
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputEvent, InputSource, KeyCode, Modifiers};
    use crate::core::entity::{Body, Tag};
    use crate::core::render::Color;
    use crossbeam_channel::unbounded;
    use image::Rgba;
    use std::path::Path;

    const MARKER: Tag = Tag::new("marker");

    //--- Test Helpers -----------------------------------------------------

    fn small_config() -> LevelConfig {
        LevelConfig::new(16, 16).with_fps(1000.0)
    }

    /// Frame sender whose display end is already gone.
    fn no_display() -> Sender<PresentedFrame> {
        bounded(1).0
    }

    fn setup<F>(f: F) -> RoomSetup
    where
        F: FnOnce(&mut Level<ChannelInput, PixelCanvas>, &AssetLoader) -> Result<(), AssetError> + Send + 'static,
    {
        Box::new(f)
    }

    fn stop_on_first_frame() -> RoomSetup {
        setup(|level, _| {
            level.on_events(|room, _| room.stop());
            Ok(())
        })
    }

    //=====================================================================
    // GameBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = GameBuilder::new();
        assert_eq!(builder.fps, 60.0);
        assert_eq!((builder.screen_width, builder.screen_height), (800, 600));
        assert_eq!(builder.channel_capacity, 128);
        assert_eq!(builder.asset_root, PathBuf::from("."));
    }

    #[test]
    #[should_panic(expected = "FPS must be positive")]
    fn builder_with_fps_panics_on_zero() {
        GameBuilder::new().with_fps(0.0);
    }

    #[test]
    #[should_panic(expected = "FPS must be positive")]
    fn builder_with_fps_panics_on_nan() {
        GameBuilder::new().with_fps(f64::NAN);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        GameBuilder::new().with_channel_capacity(0);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let game = GameBuilder::new()
            .with_fps(30.0)
            .with_screen_size(320, 200)
            .with_title("Pong")
            .with_asset_root("assets")
            .build();

        assert_eq!(game.config().fps, 30.0);
        assert_eq!((game.config().screen_width, game.config().screen_height), (320, 200));
        assert_eq!(game.title, "Pong");
        assert_eq!(game.assets().root(), Path::new("assets"));
    }

    //=====================================================================
    // Room Sequencing Tests
    //=====================================================================

    #[test]
    fn rooms_run_in_order_sharing_the_session() {
        let (_tx, rx) = unbounded();
        let rooms: Vec<RoomSetup> = vec![
            setup(|level, _| {
                level.room_mut().session_mut().add_score(10);
                level.on_events(|room, _| room.stop());
                Ok(())
            }),
            setup(|level, _| {
                level.room_mut().session_mut().add_score(5);
                level.on_events(|room, _| room.stop());
                Ok(())
            }),
        ];

        let session = play_rooms(small_config(), AssetLoader::new("."), rx, no_display(), rooms).unwrap();

        assert_eq!(session.score(), 15);
        assert!(!session.is_exiting());
    }

    #[test]
    fn window_close_skips_remaining_rooms() {
        let (tx, rx) = unbounded();
        tx.send(PlatformEvent::WindowClosed).unwrap();

        let rooms: Vec<RoomSetup> = vec![
            setup(|_, _| Ok(())),
            setup(|level, _| {
                level.room_mut().session_mut().add_score(1000);
                Ok(())
            }),
        ];

        let session = play_rooms(small_config(), AssetLoader::new("."), rx, no_display(), rooms).unwrap();

        assert!(session.is_exiting());
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn held_keys_carry_into_the_next_room() {
        let (tx, rx) = unbounded();
        tx.send(PlatformEvent::Inputs {
            discrete: vec![InputEvent::KeyDown { key: KeyCode::Space, modifiers: Modifiers::NONE }],
            continuous: vec![],
        })
        .unwrap();

        let rooms: Vec<RoomSetup> = vec![
            stop_on_first_frame(),
            setup(|level, _| {
                if level.input().keyboard().is_down(KeyCode::Space) {
                    level.room_mut().session_mut().add_score(1);
                }
                level.on_events(|room, _| room.stop());
                Ok(())
            }),
        ];

        let session = play_rooms(small_config(), AssetLoader::new("."), rx, no_display(), rooms).unwrap();
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn presented_frames_reach_the_platform_side() {
        let (_tx, rx) = unbounded();
        let (frame_tx, frame_rx) = bounded(1);
        let rooms: Vec<RoomSetup> = vec![setup(|level, _| {
            level.set_background_color(Color::rgb(200, 100, 50));
            level.on_events(|room, _| room.stop());
            Ok(())
        })];

        play_rooms(small_config(), AssetLoader::new("."), rx, frame_tx, rooms).unwrap();

        let frame = frame_rx.try_recv().unwrap();
        assert_eq!(frame.dimensions(), (16, 16));
        assert_eq!(frame.get_pixel(8, 8), &Rgba([200, 100, 50, 255]));
    }

    #[test]
    fn setup_errors_abort_the_game() {
        let (_tx, rx) = unbounded();
        let rooms: Vec<RoomSetup> = vec![setup(|level, assets| {
            level.add_room_object(Body::new(MARKER, 0, 0), ());
            assets.load_image(level.canvas_mut(), "missing.png")?;
            Ok(())
        })];

        let err = play_rooms(small_config(), AssetLoader::new("no-such-root"), rx, no_display(), rooms).unwrap_err();
        assert!(matches!(err, EngineError::Asset(AssetError::NotFound(_))));
    }

    #[test]
    fn engine_error_wraps_sources() {
        let err = EngineError::from(PlatformError::EventLoopCreation("no display".to_string()));
        assert!(err.to_string().contains("no display"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(std::error::Error::source(&EngineError::CoreThreadPanicked).is_none());
    }
}
