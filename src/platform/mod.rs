//=========================================================================
// Platform Subsystem
//
// Owns the OS window and forwards its input to the core thread.
//
// Architecture:
// ```text
//  Main Thread:                     Core Thread:
//  ┌──────────────────────────┐    ┌──────────────────────┐
//  │  Winit Event Loop        │    │  ChannelInput        │
//  │   ↓                      │    │   ↓                  │
//  │  InputProcessor          │    │  Level::run          │
//  │   ↓                      │    │   ↓                  │
//  │  InputBuffer             │    │  Room / Entities     │
//  │   ↓                      │    │   ↓                  │
//  │  RedrawRequested (flush) │    │  PixelCanvas::present│
//  │   ↓                      │    └──────────────────────┘
//  │  Channel ────────────────┼──────────↑       │
//  │                          │  PlatformEvent   │
//  │  Presenter (wgpu) ←──────┼──────────────────┘
//  │                          │  PresentedFrame
//  │  about_to_wait ←─────────┼───── shutdown (dropped sender)
//  └──────────────────────────┘
// ```
//
// RedrawRequested is the frame boundary: everything buffered since the
// previous redraw goes out as one `PlatformEvent::Inputs`. Empty batches
// are not sent. The same redraw puts the newest frame from the core
// thread on the window; older undrawn frames are skipped, and the last
// frame is redrawn until a new one arrives.
//
// The event loop exits on a window close or once the core thread signals
// (or drops) the shutdown channel. Winit needs the main thread on macOS,
// so `run()` is called from the thread that called `Game::run()`.
//
//=========================================================================

//=== Submodules ==========================================================

mod gamepad;
mod input_buffer;
mod input_processor;
mod presenter;

pub(crate) use gamepad::GilrsGamepads;

//=== External Crates =====================================================

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use crate::core::render::PresentedFrame;
use input_buffer::InputBuffer;
use input_processor::{InputProcessor, Routed};
use presenter::Presenter;

//=== WindowSettings ======================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

//=== Platform ============================================================

/// Window owner and input batcher. Not `Send`; stays on the main thread.
pub(crate) struct Platform {
    /// Created lazily in `resumed()`, together with the presenter.
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    settings: WindowSettings,
    buffer: InputBuffer,
    event_sender: Sender<PlatformEvent>,
    shutdown: Receiver<()>,
    frames: Receiver<PresentedFrame>,
    /// Newest frame received, redrawn until replaced.
    current_frame: Option<PresentedFrame>,
    input_processor: InputProcessor,
    /// Fatal error raised inside the event loop, returned by `run()`.
    failure: Option<PlatformError>,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    pub fn new(
        event_sender: Sender<PlatformEvent>,
        settings: WindowSettings,
        shutdown: Receiver<()>,
        frames: Receiver<PresentedFrame>,
    ) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            presenter: None,
            settings,
            buffer: InputBuffer::new(),
            event_sender,
            shutdown,
            frames,
            current_frame: None,
            input_processor: InputProcessor::new(),
            failure: None,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the winit event loop until the window closes or the core
    /// thread shuts down.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running, or if the window cannot be presented to.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread on platforms that require it.
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting winit event loop");

        let event_loop = EventLoop::new().map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;

        event_loop
            .run_app(&mut self)
            .map_err(|e| PlatformError::EventLoopExecution(e.to_string()))?;

        match self.failure.take() {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends everything buffered since the last redraw.
    ///
    /// A disconnected core thread only costs the batch; the window stays
    /// usable so it can still be closed.
    fn flush_input_buffer(&mut self) {
        let buffered = self.buffer.len();
        let Some((discrete, continuous)) = self.buffer.drain() else {
            return;
        };

        trace!(
            target: "platform::input",
            "Flushing {} discrete + {} continuous events",
            discrete.len(),
            continuous.len()
        );

        if self.event_sender.send(PlatformEvent::Inputs { discrete, continuous }).is_err() {
            warn!(target: "platform::input", "Channel disconnected, dropping {} events", buffered);
        }
    }

    /// Keeps the newest frame the core thread sent, skipping older ones.
    fn receive_frames(&mut self) {
        if let Some(frame) = self.frames.try_iter().last() {
            self.current_frame = Some(frame);
        }
    }

    fn present_current_frame(&mut self) {
        self.receive_frames();
        if let (Some(presenter), Some(frame)) = (self.presenter.as_mut(), self.current_frame.as_ref()) {
            presenter.draw(frame);
        }
    }

    fn buffer_input(&mut self, event: &WindowEvent) {
        match self.input_processor.process(event) {
            Some(Routed::Discrete(input)) => self.buffer.push_discrete(input),
            Some(Routed::Continuous(input)) => self.buffer.push_continuous(input),
            None => {}
        }
    }

    /// `true` once the core thread asked for shutdown or went away.
    fn shutdown_requested(&self) -> bool {
        match self.shutdown.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => true,
            Err(TryRecvError::Empty) => false,
        }
    }

    fn close_window(&mut self, event_loop: &ActiveEventLoop) {
        let _ = self.event_sender.send(PlatformEvent::WindowClosed);
        event_loop.exit();
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_deref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.settings.title.clone())
            .with_inner_size(LogicalSize::new(self.settings.width, self.settings.height))
            .with_resizable(false);

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                let window = Arc::new(window);

                match Presenter::new(Arc::clone(&window)) {
                    Ok(presenter) => self.presenter = Some(presenter),
                    Err(e) => {
                        error!(target: "platform", "{}", e);
                        self.failure = Some(e);
                        self.close_window(event_loop);
                        return;
                    }
                }

                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.close_window(event_loop);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.close_window(event_loop);
            }

            WindowEvent::Resized(size) => {
                if let Some(presenter) = self.presenter.as_mut() {
                    presenter.resize(*size);
                }
            }

            WindowEvent::RedrawRequested => {
                self.flush_input_buffer();
                self.present_current_frame();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            other => self.buffer_input(other),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.shutdown_requested() {
            info!(target: "platform", "Core thread finished, closing window");
            event_loop.exit();
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputEvent, KeyCode, Modifiers};
    use crossbeam_channel::{bounded, unbounded};
    use image::{Rgba, RgbaImage};

    //--- Test Helpers -----------------------------------------------------

    fn settings() -> WindowSettings {
        WindowSettings {
            title: "test".to_string(),
            width: 320,
            height: 240,
        }
    }

    fn platform() -> (Platform, Receiver<PlatformEvent>, Sender<()>) {
        let (platform, rx, shutdown, _frames) = platform_with_frames();
        (platform, rx, shutdown)
    }

    fn platform_with_frames() -> (Platform, Receiver<PlatformEvent>, Sender<()>, Sender<PresentedFrame>) {
        let (tx, rx) = unbounded();
        let (shutdown_tx, shutdown_rx) = bounded(1);
        let (frame_tx, frame_rx) = unbounded();
        (Platform::new(tx, settings(), shutdown_rx, frame_rx), rx, shutdown_tx, frame_tx)
    }

    fn frame(shade: u8) -> PresentedFrame {
        Arc::new(RgbaImage::from_pixel(2, 2, Rgba([shade, shade, shade, 255])))
    }

    fn key_down(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown { key, modifiers: Modifiers::NONE }
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn window_is_created_lazily() {
        let (platform, _rx, _shutdown) = platform();
        assert!(platform.window().is_none());
    }

    #[test]
    fn flush_of_empty_buffer_sends_nothing() {
        let (mut platform, rx, _shutdown) = platform();

        platform.flush_input_buffer();

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn flush_sends_one_batch() {
        let (mut platform, rx, _shutdown) = platform();
        platform.buffer.push_discrete(key_down(KeyCode::Space));
        platform.buffer.push_continuous(InputEvent::MouseMoved { x: 4.0, y: 2.0 });

        platform.flush_input_buffer();
        platform.flush_input_buffer();

        match rx.try_recv() {
            Ok(PlatformEvent::Inputs { discrete, continuous }) => {
                assert_eq!(discrete, vec![key_down(KeyCode::Space)]);
                assert_eq!(continuous.len(), 1);
            }
            other => panic!("Expected Inputs event, got {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn flush_survives_disconnected_core() {
        let (mut platform, rx, _shutdown) = platform();
        platform.buffer.push_discrete(key_down(KeyCode::KeyA));
        drop(rx);

        platform.flush_input_buffer();

        assert!(platform.buffer.is_empty());
    }

    #[test]
    fn non_input_events_are_not_buffered() {
        let (mut platform, _rx, _shutdown) = platform();

        platform.buffer_input(&WindowEvent::Focused(false));

        assert!(platform.buffer.is_empty());
    }

    #[test]
    fn shutdown_signal_and_drop_both_count() {
        let (platform, _rx, shutdown) = platform();
        assert!(!platform.shutdown_requested());

        shutdown.send(()).unwrap();
        assert!(platform.shutdown_requested());

        drop(shutdown);
        assert!(platform.shutdown_requested());
    }

    #[test]
    fn newest_frame_wins() {
        let (mut platform, _rx, _shutdown, frames) = platform_with_frames();
        frames.send(frame(10)).unwrap();
        frames.send(frame(20)).unwrap();

        platform.receive_frames();

        let current = platform.current_frame.as_ref().unwrap();
        assert_eq!(current.get_pixel(0, 0), &Rgba([20, 20, 20, 255]));
        assert!(platform.frames.is_empty());
    }

    #[test]
    fn last_frame_is_kept_until_replaced() {
        let (mut platform, _rx, _shutdown, frames) = platform_with_frames();
        let first = frame(1);
        frames.send(Arc::clone(&first)).unwrap();

        platform.receive_frames();
        platform.receive_frames();
        assert!(Arc::ptr_eq(platform.current_frame.as_ref().unwrap(), &first));

        drop(frames);
        platform.present_current_frame();
        assert!(Arc::ptr_eq(platform.current_frame.as_ref().unwrap(), &first));
    }

    #[test]
    fn no_frames_before_the_first_present() {
        let (mut platform, _rx, _shutdown, _frames) = platform_with_frames();
        platform.present_current_frame();
        assert!(platform.current_frame.is_none());
        assert!(platform.failure.is_none());
    }
}
