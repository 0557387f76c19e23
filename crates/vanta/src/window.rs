//! Window management via winit.
//!
//! Implements [`winit::application::ApplicationHandler`] to drive the event
//! loop: window and GPU creation, resize, and the per-frame
//! update → draw → submit cycle.
//!
//! The renderer's pixel space is the window's *logical* size, so a game
//! written for 800×600 draws the same on a HiDPI display.

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::app::Game;
use crate::config::RendererConfig;
use crate::error::{AppError, RenderError};
use crate::input::Input;
use crate::render::GpuContext;
use crate::render2d::{SpriteRenderer, WgpuBackend};
use crate::time::Time;

/// The application state that winit drives.
pub(crate) struct WinitApp<G: Game> {
    config: RendererConfig,
    game: G,
    window: Option<Arc<Window>>,
    renderer: Option<SpriteRenderer<WgpuBackend>>,
    time: Time,
    input: Input,
    pub startup_error: Option<AppError>,
}

impl<G: Game> WinitApp<G> {
    pub fn new(config: RendererConfig, game: G) -> Self {
        Self {
            config,
            game,
            window: None,
            renderer: None,
            time: Time::new(),
            input: Input::new(),
            startup_error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let attrs = Window::default_attributes()
            .with_title(&self.config.window_title)
            .with_inner_size(LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| RenderError::Window(e.to_string()))?,
        );

        let gpu = GpuContext::new(window.clone())?;
        let mut backend = WgpuBackend::new(gpu, &self.config)?;
        self.game.setup(&mut backend)?;

        let (width, height) = logical_size(&window, window.inner_size());
        self.renderer = Some(SpriteRenderer::new(backend, width, height)?);
        self.time = Time::new();

        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        self.time.tick();
        self.game.update(&self.time, &self.input);
        self.input.end_frame();

        renderer.begin_frame();
        self.game.draw(renderer);
        match renderer.end_frame() {
            Ok(stats) => self.game.frame_finished(&stats),
            Err(RenderError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                log::debug!("surface lost or outdated, reconfigured");
            }
            Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                log::error!("Out of GPU memory!");
                event_loop.exit();
            }
            Err(e) => log::warn!("frame dropped: {e}"),
        }
    }
}

fn logical_size(window: &Window, size: PhysicalSize<u32>) -> (u32, u32) {
    let logical: LogicalSize<u32> = size.to_logical(window.scale_factor());
    (logical.width.max(1), logical.height.max(1))
}

impl<G: Game> ApplicationHandler for WinitApp<G> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.startup_error.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("startup failed: {e}");
            self.startup_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                if let (Some(window), Some(renderer)) = (&self.window, self.renderer.as_mut()) {
                    renderer.backend_mut().resize(size.width, size.height);
                    let (width, height) = logical_size(window, size);
                    renderer.resize(width, height);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.input.press(key),
                        ElementState::Released => self.input.release(key),
                    }
                }
            }

            WindowEvent::Focused(false) => self.input.clear(),

            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}
