//=========================================================================
// Level
//=========================================================================
//
// One game screen: owns a room, an input source and a canvas, and runs
// the fixed-rate frame loop over them.
//
// State machine:
// ```text
//   Idle ──run()──> Running ──Room::stop()──> Stopped   → Completed
//                      └─────platform quit──> Quitting  → Quit
// ```
//
// Frame pipeline (one atomic unit per tick):
// ```text
//   clock.tick()
//   snapshot previous positions
//   timers            → due callbacks
//   prestep           → every object
//   poll events       → quit / click dispatch
//   router            → keyboard, joysticks, mouse
//   event hook        → all events this frame
//   background        → clear + (scrolling) image
//   update, step      → every object
//   collisions        → every object
//   sound requests    → mixer
//   draw, present
// ```
//
// Stopping or quitting takes effect once the current frame completes.
//
//=========================================================================

//=== Module Declarations =================================================

mod background;
mod clock;
mod config;
mod error;

//=== Public API ==========================================================

pub use background::Background;
pub use clock::FrameClock;
pub use config::LevelConfig;
pub use error::{ConfigError, LevelError};

//=== External Dependencies ===============================================

use log::{debug, info, trace};

//=== Internal Dependencies ===============================================

use crate::core::audio::Mixer;
use crate::core::entity::{Body, Entity, EntityId, Tag};
use crate::core::input::{InputEvent, InputRouter, InputSource, SystemEvent};
use crate::core::render::{Canvas, Color, Sprite};
use crate::core::room::Room;
use crate::core::session::Session;
use crate::core::timer::TimerId;

//=== LevelState ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelState {
    /// Built, not yet running.
    Idle,
    Running,
    /// Ended by the game itself.
    Stopped,
    /// Ended by the player closing the game.
    Quitting,
}

//=== LevelOutcome ========================================================

/// How a finished level ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelOutcome {
    /// The level stopped itself; the next level may run.
    Completed,
    /// The player quit; no further level should run.
    Quit,
}

impl LevelOutcome {
    pub fn is_quit(self) -> bool {
        self == LevelOutcome::Quit
    }
}

/// Catch-all hook receiving every event polled in a frame.
pub type EventHook = Box<dyn FnMut(&mut Room, &[SystemEvent])>;

//=== Level ===============================================================

/// A room driven by an input source and drawn on a canvas.
///
/// # Examples
///
/// ```rust,ignore
/// let config = LevelConfig::new(800, 600).with_fps(60.0);
/// let mut level = Level::new(config, input, canvas, Session::new())?;
///
/// level.set_background_color(Color::SKY);
/// level.add_room_object(Body::new(PLAYER, 10, 10).with_keyboard(), Player::default());
///
/// match level.run()? {
///     LevelOutcome::Completed => { /* next level */ }
///     LevelOutcome::Quit => { /* stop the game */ }
/// }
/// ```
pub struct Level<I: InputSource, C: Canvas> {
    config: LevelConfig,
    room: Room,
    input: I,
    canvas: C,
    mixer: Mixer,
    background: Background,
    router: InputRouter,
    clock: FrameClock,
    event_hook: Option<EventHook>,
    frame: u64,
}

impl<I: InputSource, C: Canvas> Level<I, C> {
    //--- Construction -----------------------------------------------------

    /// Builds an idle level.
    ///
    /// # Errors
    ///
    /// - [`LevelError::Config`] if `config` does not validate.
    /// - [`LevelError::MissingJoystick`] if a required pad is not attached.
    pub fn new(config: LevelConfig, input: I, canvas: C, session: Session) -> Result<Self, LevelError> {
        config.validate()?;

        for index in 0..config.required_joysticks {
            if input.joystick(index).is_none() {
                return Err(LevelError::MissingJoystick { index });
            }
        }

        debug!(
            target: "level",
            "Level created: {}x{} @ {} fps, {} joysticks attached",
            config.screen_width, config.screen_height, config.fps, input.joystick_count()
        );

        Ok(Self {
            router: InputRouter::for_source(&input),
            clock: FrameClock::new(config.fps),
            config,
            room: Room::new(session),
            input,
            canvas,
            mixer: Mixer::silent(),
            background: Background::new(Color::BLACK),
            event_hook: None,
            frame: 0,
        })
    }

    /// Plays this level's sounds on `mixer` instead of a silent one.
    pub fn with_mixer(mut self, mixer: Mixer) -> Self {
        self.mixer = mixer;
        self
    }

    //--- Objects ----------------------------------------------------------

    pub fn add_room_object<E: Entity + 'static>(&mut self, body: Body, entity: E) -> EntityId {
        self.room.add_room_object(body, entity)
    }

    pub fn add_boxed(&mut self, body: Body, entity: Box<dyn Entity>) -> EntityId {
        self.room.add_boxed(body, entity)
    }

    pub fn delete_object(&mut self, id: EntityId) -> bool {
        self.room.delete_object(id)
    }

    pub fn count_object(&self, kind: Tag) -> usize {
        self.room.count_object(kind)
    }

    pub fn set_timer<F>(&mut self, owner: EntityId, ticks: i64, action: F) -> TimerId
    where
        F: FnOnce(&mut Room) + 'static,
    {
        self.room.set_timer(owner, ticks, action)
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn room_mut(&mut self) -> &mut Room {
        &mut self.room
    }

    //--- Background -------------------------------------------------------

    pub fn set_background_color(&mut self, color: Color) {
        self.background.set_color(color);
    }

    pub fn set_background_image(&mut self, image: Sprite) {
        self.background.set_image(image);
    }

    /// Scrolls the background image vertically by `speed` pixels a frame.
    pub fn set_background_scroll(&mut self, speed: i32) {
        self.background.set_scroll(speed);
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    //--- Hooks ------------------------------------------------------------

    /// Installs a hook called once per frame with every polled event,
    /// after the router has dispatched. Replaces any previous hook.
    pub fn on_events<F>(&mut self, hook: F)
    where
        F: FnMut(&mut Room, &[SystemEvent]) + 'static,
    {
        self.event_hook = Some(Box::new(hook));
    }

    //--- Accessors --------------------------------------------------------

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn state(&self) -> LevelState {
        self.room.state()
    }

    pub fn session(&self) -> &Session {
        self.room.session()
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }

    pub fn mixer_mut(&mut self) -> &mut Mixer {
        &mut self.mixer
    }

    /// Takes the mixer out so the next level can reuse it, leaving a
    /// silent one behind.
    pub fn take_mixer(&mut self) -> Mixer {
        std::mem::take(&mut self.mixer)
    }

    /// Frames completed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Gives back the devices and the session of a finished level.
    pub fn into_parts(self) -> (I, C, Session) {
        (self.input, self.canvas, self.room.into_session())
    }

    //--- Execution --------------------------------------------------------

    /// Runs frames until the level is stopped or quit.
    ///
    /// Every object present when this is called gets its collision list
    /// resolved once before the first frame.
    ///
    /// # Errors
    ///
    /// [`LevelError::NotIdle`] if the level already ran.
    pub fn run(&mut self) -> Result<LevelOutcome, LevelError> {
        let state = self.room.state();
        if state != LevelState::Idle {
            return Err(LevelError::NotIdle(state));
        }

        info!(target: "level", "Level running with {} objects", self.room.len());

        self.room.set_state(LevelState::Running);
        self.room.resolve_all_collision_lists();

        while self.room.is_running() {
            self.run_frame();
        }

        let outcome = match self.room.state() {
            LevelState::Quitting => LevelOutcome::Quit,
            _ => LevelOutcome::Completed,
        };

        info!(
            target: "level",
            "Level finished after {} frames: {:?} (score {})",
            self.frame, outcome, self.room.session().score()
        );

        Ok(outcome)
    }

    fn run_frame(&mut self) {
        self.clock.tick();

        self.room.snapshot_positions();
        self.room.tick_timers();
        self.room.prestep_all();

        let events = self.input.poll();
        self.handle_events(&events);

        let keys = self.input.keyboard();
        self.router.dispatch_keyboard(&mut self.room, &keys);
        self.router.dispatch_joysticks(&mut self.room, &self.input);
        self.router.dispatch_mouse(&mut self.room, self.input.mouse());

        if let Some(hook) = self.event_hook.as_mut() {
            hook(&mut self.room, &events);
        }

        self.background.draw(&mut self.canvas, self.config.screen_height);

        self.room.update_all();
        self.room.check_all_collisions();

        for request in self.room.take_sound_requests() {
            self.mixer.apply(request);
        }

        self.room.draw(&mut self.canvas);
        self.canvas.present();

        self.frame += 1;
        trace!(target: "level", "Frame {} done, {} objects", self.frame, self.room.len());
    }

    fn handle_events(&mut self, events: &[SystemEvent]) {
        for event in events {
            match event {
                SystemEvent::Quit => {
                    if self.room.state() != LevelState::Quitting {
                        info!(target: "level", "Quit received");
                        self.room.quit();
                    }
                }
                SystemEvent::Input(InputEvent::MouseButtonUp { button, .. }) => {
                    self.router.dispatch_click(&mut self.room, self.input.mouse(), *button);
                }
                SystemEvent::Input(_) => {}
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
