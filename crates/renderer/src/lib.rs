//! Renderer crate for imagefx, an interactive image effects viewer.
//!
//! Six image slots are bound to the number keys; each slot carries its own
//! colour, filter, and blur effect selection which the fragment shaders read
//! as integer uniforms. The overall flow is:
//!
//! ```text
//!   CLI / imagefx
//!          │ ViewerConfig
//!          ▼
//!   Viewer::run ──▶ WindowState ──▶ winit event loop ──▶ InputController ─▶ ViewState
//!                                          │                                  │
//!                                          └─▶ GpuState::render_frame() ◀─────┘
//!                                                 │ FrameTracker::plan()
//!                                                 └─▶ pipeline / texture / geometry rebuilds
//! ```
//!
//! Input handlers only edit [`ViewState`]. Once per frame the render loop
//! compares that state with what the GPU currently holds and rebuilds the
//! shader program, the texture, or the vertex buffers as needed.

pub mod codec;
pub mod compile;
pub mod effects;
pub mod error;
pub mod frame;
mod gpu;
pub mod input;
pub mod quad;
pub mod types;
pub mod view;
mod window;

pub use effects::{Effect, EffectCategory, EffectSelection};
pub use error::{Stage, ViewerError};
pub use input::{InputController, InputSink, KeyCommand, LoopControl, MouseButtonAction};
pub use types::{ShaderSources, ViewerConfig, DEFAULT_SURFACE_EDGE, IMAGE_SLOT_COUNT};
pub use view::ViewState;

/// Entry point for the interactive viewer.
pub struct Viewer {
    config: ViewerConfig,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        Self { config }
    }

    /// Runs until the window closes. Errors are fatal to the session.
    pub fn run(self) -> anyhow::Result<()> {
        tracing::info!(
            size = ?self.config.surface_size,
            initial_image = self.config.initial_image + 1,
            "starting viewer"
        );
        window::run(self.config)?;
        tracing::info!("Goodbye");
        Ok(())
    }
}
