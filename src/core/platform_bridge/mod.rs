//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the windowing thread with the level loop.
//
// The platform only ever sends `PlatformEvent`s over a crossbeam channel;
// `ChannelInput` turns that stream back into an `InputSource`, so a level
// does not know whether its input is a real window or a script.
//
// Frames travel the other way: a `PixelCanvas` given a frame sender hands
// each presented frame to the platform as a shared `PresentedFrame`.
//
// Components:
// - `interface`: event types and error definitions (the contract)
// - `channel_input`: core-side event draining and device state
//
//=========================================================================

//=== Module Declarations =================================================

mod channel_input;
mod interface;

//=== Public API ==========================================================

pub use channel_input::{ChannelInput, GamepadSource};
pub use interface::{PlatformError, PlatformEvent};
