//=========================================================================
// Core
//
// Everything that runs on the logic thread: the object model, the room
// that owns it, input routing, timers and the per-level frame loop.
//
// Layout:
// ```text
//  level ──owns──> room ──owns──> slots (Body + Entity)
//    │               ├─ timers
//    │               ├─ sound requests
//    │               └─ collision lists
//    ├─ InputSource  (platform_bridge::ChannelInput in a real game)
//    ├─ Canvas       (render::PixelCanvas)
//    └─ Mixer        (audio)
// ```
//
// Nothing in here touches winit; the platform thread talks to the core
// only through `platform_bridge`.
//
//=========================================================================

pub mod assets;
pub mod audio;
mod collision;
pub mod entity;
pub mod input;
pub mod level;
pub mod platform_bridge;
pub mod render;
pub mod room;
pub mod session;
pub mod timer;
