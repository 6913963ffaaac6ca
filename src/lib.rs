//=========================================================================
// Roomloop: Library Root
//
// A small 2D game framework built around rooms: each level owns a set of
// entities, runs them through a fixed frame cycle and routes keyboard,
// mouse and gamepad input to the ones that asked for it.
//
// Typical usage:
// ```no_run
// use roomloop::prelude::*;
//
// fn main() -> Result<(), EngineError> {
//     let first: RoomSetup = Box::new(|level, assets| {
//         level.set_background_color(Color::SKY);
//         let jump = assets.load_sound(level.mixer_mut(), "jump.wav")?;
//         level.room_mut().play_sound(jump);
//         Ok(())
//     });
//     GameBuilder::new().build().run(vec![first])?;
//     Ok(())
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the object model, the level loop and input routing. It can
// be driven headless through its `InputSource` and `Canvas` traits.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the winit window, its wgpu presenter and the gamepad
// backend, and stays private.
// `engine` wires it to the core on two threads.
//
mod engine;
mod platform;

#[cfg(test)]
mod testing;

//--- Public Exports ------------------------------------------------------

pub use engine::{EngineError, Game, GameBuilder, RoomSetup};
