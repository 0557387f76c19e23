//! App runner and the [`Game`] trait.
//!
//! [`App`] owns the window, the GPU and the sprite renderer. A game plugs in
//! by implementing [`Game`]:
//!
//! ```ignore
//! use vanta::prelude::*;
//!
//! struct Shooter { content: Option<Content> }
//!
//! impl Game for Shooter {
//!     fn setup(&mut self, backend: &mut WgpuBackend) -> Result<(), ContentError> {
//!         let mut builder = Content::builder(backend);
//!         builder.load_texture("sheet", "assets/sheet.png")?;
//!         builder.load_sprite_sheet("sheet", "assets/sheet.xml")?;
//!         self.content = Some(builder.finish());
//!         Ok(())
//!     }
//!
//!     fn draw(&mut self, renderer: &mut SpriteRenderer<WgpuBackend>) {
//!         // draw_sprite / draw_string ...
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     env_logger::init();
//!     App::new(RendererConfig::default())?.run(Shooter { content: None })?;
//!     Ok(())
//! }
//! ```
//!
//! Each redraw runs `update`, then `draw` inside a
//! `begin_frame`/`end_frame` bracket.

use winit::event_loop::{ControlFlow, EventLoop};

use crate::config::RendererConfig;
use crate::error::{AppError, ConfigError, ContentError, RenderError};
use crate::input::Input;
use crate::render2d::{FrameStats, SpriteRenderer, WgpuBackend};
use crate::time::Time;
use crate::window::WinitApp;

/// Game callbacks driven by [`App::run`].
pub trait Game {
    /// Load content. Runs once, after the GPU is ready and before the first
    /// frame. An error aborts startup.
    fn setup(&mut self, backend: &mut WgpuBackend) -> Result<(), ContentError>;

    /// Advance the simulation by one frame.
    fn update(&mut self, _time: &Time, _input: &Input) {}

    /// Issue draw calls. The frame is already open.
    fn draw(&mut self, renderer: &mut SpriteRenderer<WgpuBackend>);

    /// Called after a frame was submitted.
    fn frame_finished(&mut self, _stats: &FrameStats) {}
}

/// Window + renderer runner. Configure, then call [`run()`](App::run).
pub struct App {
    config: RendererConfig,
}

impl App {
    /// Validate `config` and prepare an app.
    pub fn new(config: RendererConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Open the window and run `game` until the window closes.
    ///
    /// Returns an error if the window, GPU or content could not be set up.
    /// Errors during individual frames are logged and the loop keeps going.
    pub fn run<G: Game>(self, game: G) -> Result<(), AppError> {
        let event_loop = EventLoop::new().map_err(|e| RenderError::Window(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = WinitApp::new(self.config, game);
        event_loop
            .run_app(&mut app)
            .map_err(|e| RenderError::Window(e.to_string()))?;

        match app.startup_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
