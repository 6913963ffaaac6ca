//=========================================================================
// Background
//=========================================================================
//
// Fill color plus an optional image, optionally scrolling vertically.
//
// Scrolling draws the image twice so the viewport is always covered:
//
//   offset >= 0:  [offset - h, offset)  and  [offset, offset + h)
//   offset <  0:  [offset, offset + h)  and  [offset + h, offset + 2h)
//
// The offset moves by `speed` every frame and snaps back to 0 once it
// travels a full screen height in either direction.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::render::{Canvas, Color, Sprite};

//=== Background ==========================================================

#[derive(Debug, Clone, Default)]
pub struct Background {
    color: Color,
    image: Option<Sprite>,
    scrolling: bool,
    speed: i32,
    offset: i32,
}

impl Background {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_image(&mut self, image: Sprite) {
        self.image = Some(image);
    }

    /// Starts scrolling by `speed` pixels per frame (negative scrolls up).
    pub fn set_scroll(&mut self, speed: i32) {
        self.scrolling = true;
        self.speed = speed;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn image(&self) -> Option<Sprite> {
        self.image
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Moves the scroll offset one frame forward for a viewport of
    /// `height` pixels.
    pub fn advance(&mut self, height: u32) {
        if !self.scrolling {
            return;
        }

        let height = height as i32;
        self.offset += self.speed;
        if self.offset >= height || self.offset <= -height {
            self.offset = 0;
        }
    }

    /// Y positions the image is blitted at this frame.
    pub fn blit_rows(&self, height: u32) -> Vec<i32> {
        if self.image.is_none() {
            return Vec::new();
        }
        if !self.scrolling {
            return vec![0];
        }

        let height = height as i32;
        let second = if self.offset >= 0 {
            self.offset - height
        } else {
            self.offset + height
        };
        vec![self.offset, second]
    }

    /// Advances the scroll, clears the canvas and blits the image.
    pub fn draw<C: Canvas + ?Sized>(&mut self, canvas: &mut C, height: u32) {
        canvas.clear(self.color);

        let Some(image) = self.image else {
            return;
        };

        self.advance(height);
        for y in self.blit_rows(height) {
            canvas.blit(image.id, 0, y);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::SpriteId;
    use crate::testing::{CanvasCall, RecordingCanvas};

    const HEIGHT: u32 = 100;

    //--- Test Helpers -----------------------------------------------------

    fn scrolling(speed: i32) -> Background {
        let mut background = Background::new(Color::BLACK);
        background.set_image(Sprite { id: SpriteId::new(0), width: 50, height: HEIGHT });
        background.set_scroll(speed);
        background
    }

    /// True if two blits of height `h` at `rows` cover `0..h` without gaps.
    fn covers_viewport(rows: &[i32], h: i32) -> bool {
        (0..h).all(|y| rows.iter().any(|&top| top <= y && y < top + h))
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn offset_wraps_on_reaching_height() {
        let mut background = scrolling(30);
        let mut offsets = Vec::new();
        for _ in 0..5 {
            background.advance(HEIGHT);
            offsets.push(background.offset());
        }
        assert_eq!(offsets, vec![30, 60, 90, 0, 30]);
    }

    #[test]
    fn offset_wraps_at_exact_height() {
        let mut background = scrolling(50);
        background.advance(HEIGHT);
        background.advance(HEIGHT);
        assert_eq!(background.offset(), 0);
    }

    #[test]
    fn negative_speed_wraps_too() {
        let mut background = scrolling(-40);
        let mut offsets = Vec::new();
        for _ in 0..4 {
            background.advance(HEIGHT);
            offsets.push(background.offset());
        }
        assert_eq!(offsets, vec![-40, -80, 0, -40]);
    }

    #[test]
    fn two_blits_always_cover_viewport() {
        for speed in [1, 7, 33, 99, 100, 250, -3, -61] {
            let mut background = scrolling(speed);
            for _ in 0..300 {
                background.advance(HEIGHT);
                let rows = background.blit_rows(HEIGHT);
                assert_eq!(rows.len(), 2);
                assert!(covers_viewport(&rows, HEIGHT as i32), "speed {}: {:?}", speed, rows);
            }
        }
    }

    #[test]
    fn static_image_drawn_once_at_origin() {
        let mut background = Background::new(Color::SKY);
        background.set_image(Sprite { id: SpriteId::new(4), width: 10, height: 10 });

        let mut canvas = RecordingCanvas::new();
        background.draw(&mut canvas, HEIGHT);

        assert_eq!(
            canvas.calls(),
            &[CanvasCall::Clear(Color::SKY), CanvasCall::Blit(SpriteId::new(4), 0, 0)]
        );
    }

    #[test]
    fn color_only_background_just_clears() {
        let mut background = Background::new(Color::WHITE);
        background.set_scroll(5);

        let mut canvas = RecordingCanvas::new();
        background.draw(&mut canvas, HEIGHT);

        assert_eq!(canvas.calls(), &[CanvasCall::Clear(Color::WHITE)]);
        assert_eq!(background.offset(), 0);
    }
}
