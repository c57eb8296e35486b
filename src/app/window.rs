//! Desktop window runner.
//!
//! Opens a winit window, feeds its events into an [`Input`], and ticks a
//! [`SceneSession`] once per redraw with the measured wall-clock delta.
//!
//! Frames go to a [`NullRenderer`], leaving the window blank, until
//! [`App::with_renderer`] supplies a real one.

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::app::input::Input;
use crate::app::input_adapter::process_window_event;
use crate::errors::Result;
use crate::render::{FrameRenderer, NullRenderer};
use crate::session::SceneSession;
use crate::utils::FrameClock;

pub struct App {
    pub title: String,
    pub session: SceneSession,
    window: Option<Arc<Window>>,
    renderer: Box<dyn FrameRenderer>,
    input: Input,
    wall_clock: FrameClock,
}

impl App {
    #[must_use]
    pub fn new(session: SceneSession) -> Self {
        Self {
            title: "Vignette".into(),
            session,
            window: None,
            renderer: Box::new(NullRenderer::new()),
            input: Input::new(),
            wall_clock: FrameClock::new(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_renderer(mut self, renderer: Box<dyn FrameRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Blocks until the window closes.
    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)?;
        log::info!("Window closed after {} frame(s)", self.wall_clock.frame_count);
        Ok(())
    }

    fn redraw(&mut self) {
        let dt = self.wall_clock.tick();
        self.session.tick_with_input(dt, &self.input, self.renderer.as_mut());
        self.input.start_frame();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attributes = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(1280.0, 720.0));

        match event_loop.create_window(attributes) {
            Ok(window) => {
                let size = window.inner_size();
                self.input.resized(size.width, size.height);
                self.window = Some(Arc::new(window));
            }
            Err(err) => {
                log::error!("Failed to create window: {err}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        process_window_event(&mut self.input, &event);
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
