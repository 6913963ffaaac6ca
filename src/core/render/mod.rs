//=========================================================================
// Rendering Surface
//=========================================================================
//
// The compositor contract the level draws through: clear to a color,
// blit a sprite at a position, present the frame.
//
// Sprites are opaque handles; whoever implements `Canvas` owns the pixels
// behind them. `PixelCanvas` is the in-memory implementation.
//
//=========================================================================

//=== Module Declarations =================================================

mod pixel_canvas;

//=== Public API ==========================================================

pub use pixel_canvas::PixelCanvas;

//=== External Dependencies ===============================================

use std::sync::Arc;

use image::{Rgba, RgbaImage};

//=== PresentedFrame ======================================================

/// A finished frame, shared read-only with whoever displays it.
pub type PresentedFrame = Arc<RgbaImage>;

//=== SpriteId ============================================================

/// Opaque handle to an image registered with a compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteId(u32);

impl SpriteId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// A registered sprite together with its natural size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub id: SpriteId,
    pub width: u32,
    pub height: u32,
}

//=== Color ===============================================================

/// Opaque RGB fill color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const SKY: Color = Color::rgb(135, 206, 235);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<Color> for Rgba<u8> {
    fn from(color: Color) -> Self {
        Rgba([color.r, color.g, color.b, 255])
    }
}

//=== Canvas ==============================================================

/// Blit-based 2D compositor.
pub trait Canvas {
    /// Fills the whole back buffer.
    fn clear(&mut self, color: Color);

    /// Draws `sprite` with its top-left corner at `(x, y)`.
    ///
    /// Parts outside the surface are clipped. Unknown handles draw nothing.
    fn blit(&mut self, sprite: SpriteId, x: i32, y: i32);

    /// Makes the back buffer the visible frame.
    fn present(&mut self);
}

//=== SpriteStore =========================================================

/// Compositors that accept decoded images and hand back a handle.
pub trait SpriteStore {
    fn insert_sprite(&mut self, image: RgbaImage) -> Sprite;
}
