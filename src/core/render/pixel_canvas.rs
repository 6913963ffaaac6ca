//=========================================================================
// Pixel Canvas
//=========================================================================
//
// Software compositor over two RGBA framebuffers.
//
//   blit()/clear() → back buffer
//   present()      → back copied to a new front, frame counter +1
//                    → front offered to the frame sender, if any
//
// Sprites are alpha-blended over the back buffer and clipped at its edges.
//
// The sender is expected to be bounded. When the display has not taken the
// previous frame yet, the new one is dropped rather than queued.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use crossbeam_channel::{Sender, TrySendError};
use image::{imageops, RgbaImage};
use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::{Canvas, Color, PresentedFrame, Sprite, SpriteId, SpriteStore};

//=== PixelCanvas =========================================================

/// In-memory [`Canvas`] with its own sprite store.
pub struct PixelCanvas {
    back: RgbaImage,
    front: PresentedFrame,
    sprites: Vec<RgbaImage>,
    frames_presented: u64,
    frame_sender: Option<Sender<PresentedFrame>>,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            back: RgbaImage::new(width, height),
            front: Arc::new(RgbaImage::new(width, height)),
            sprites: Vec::new(),
            frames_presented: 0,
            frame_sender: None,
        }
    }

    /// Hands every presented frame to `sender` as well.
    pub fn with_frame_sender(mut self, sender: Sender<PresentedFrame>) -> Self {
        self.frame_sender = Some(sender);
        self
    }

    pub fn width(&self) -> u32 {
        self.back.width()
    }

    pub fn height(&self) -> u32 {
        self.back.height()
    }

    /// Back buffer being composed.
    pub fn frame(&self) -> &RgbaImage {
        &self.back
    }

    /// Last presented frame.
    pub fn presented_frame(&self) -> &RgbaImage {
        &self.front
    }

    /// Shared handle to the last presented frame.
    pub fn shared_frame(&self) -> PresentedFrame {
        Arc::clone(&self.front)
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn sprite_size(&self, sprite: SpriteId) -> Option<(u32, u32)> {
        self.sprites
            .get(sprite.raw() as usize)
            .map(|image| image.dimensions())
    }
}

impl SpriteStore for PixelCanvas {
    fn insert_sprite(&mut self, image: RgbaImage) -> Sprite {
        let id = SpriteId::new(self.sprites.len() as u32);
        let (width, height) = image.dimensions();
        self.sprites.push(image);
        Sprite { id, width, height }
    }
}

impl Canvas for PixelCanvas {
    fn clear(&mut self, color: Color) {
        let fill = color.into();
        for pixel in self.back.pixels_mut() {
            *pixel = fill;
        }
    }

    fn blit(&mut self, sprite: SpriteId, x: i32, y: i32) {
        match self.sprites.get(sprite.raw() as usize) {
            Some(image) => imageops::overlay(&mut self.back, image, x as i64, y as i64),
            None => trace!(target: "level", "Blit of unknown sprite {:?} skipped", sprite),
        }
    }

    fn present(&mut self) {
        self.front = Arc::new(self.back.clone());
        self.frames_presented += 1;

        let Some(sender) = &self.frame_sender else {
            return;
        };
        match sender.try_send(Arc::clone(&self.front)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                trace!(target: "level", "Display behind, frame {} dropped", self.frames_presented);
            }
            Err(TrySendError::Disconnected(_)) => {
                debug!(target: "level", "Display gone, no longer sending frames");
                self.frame_sender = None;
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use image::Rgba;

    //--- Test Helpers -----------------------------------------------------

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(rgba))
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn clear_fills_back_buffer_only() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.clear(Color::WHITE);

        assert_eq!(canvas.frame().get_pixel(3, 3), &Rgba([255, 255, 255, 255]));
        assert_eq!(canvas.presented_frame().get_pixel(3, 3), &Rgba([0, 0, 0, 0]));

        canvas.present();
        assert_eq!(canvas.presented_frame().get_pixel(3, 3), &Rgba([255, 255, 255, 255]));
        assert_eq!(canvas.frames_presented(), 1);
    }

    #[test]
    fn blit_clips_at_edges() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.clear(Color::BLACK);
        let red = canvas.insert_sprite(solid(2, 2, [255, 0, 0, 255]));

        canvas.blit(red.id, -1, 3);

        assert_eq!(canvas.frame().get_pixel(0, 3), &Rgba([255, 0, 0, 255]));
        assert_eq!(canvas.frame().get_pixel(1, 3), &Rgba([0, 0, 0, 255]));
        assert_eq!(canvas.frame().get_pixel(0, 2), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn transparent_pixels_keep_background() {
        let mut canvas = PixelCanvas::new(2, 2);
        canvas.clear(Color::rgb(0, 0, 255));
        let ghost = canvas.insert_sprite(solid(2, 2, [255, 0, 0, 0]));

        canvas.blit(ghost.id, 0, 0);

        assert_eq!(canvas.frame().get_pixel(1, 1), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn sprite_store_reports_natural_size() {
        let mut canvas = PixelCanvas::new(8, 8);
        let sprite = canvas.insert_sprite(solid(3, 5, [0, 0, 0, 255]));

        assert_eq!((sprite.width, sprite.height), (3, 5));
        assert_eq!(canvas.sprite_size(sprite.id), Some((3, 5)));
        assert_eq!(canvas.sprite_size(SpriteId::new(99)), None);
    }

    #[test]
    fn presented_frames_reach_the_receiver() {
        let (tx, rx) = bounded(1);
        let mut canvas = PixelCanvas::new(3, 2).with_frame_sender(tx);
        canvas.clear(Color::rgb(10, 20, 30));

        canvas.present();

        let frame = rx.try_recv().unwrap();
        assert_eq!(frame.dimensions(), (3, 2));
        assert_eq!(frame.get_pixel(2, 1), &Rgba([10, 20, 30, 255]));
        assert!(Arc::ptr_eq(&frame, &canvas.shared_frame()));
    }

    #[test]
    fn frames_are_dropped_while_the_receiver_is_behind() {
        let (tx, rx) = bounded(1);
        let mut canvas = PixelCanvas::new(1, 1).with_frame_sender(tx);

        canvas.clear(Color::WHITE);
        canvas.present();
        canvas.clear(Color::BLACK);
        canvas.present();

        assert_eq!(canvas.frames_presented(), 2);
        assert_eq!(rx.try_recv().unwrap().get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_receiver_does_not_stop_presenting() {
        let (tx, rx) = bounded(1);
        let mut canvas = PixelCanvas::new(1, 1).with_frame_sender(tx);
        drop(rx);

        canvas.clear(Color::WHITE);
        canvas.present();
        canvas.present();

        assert_eq!(canvas.frames_presented(), 2);
        assert_eq!(canvas.presented_frame().get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn unknown_sprite_draws_nothing() {
        let mut canvas = PixelCanvas::new(2, 2);
        canvas.clear(Color::WHITE);
        canvas.blit(SpriteId::new(3), 0, 0);
        assert_eq!(canvas.frame().get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
    }
}
