//! GPU side of the viewer.
//!
//! - `context` owns the wgpu instance, device, and surface, and reconfigures
//!   the swapchain on resize or loss.
//! - `pipeline` compiles the GLSL sources and links them against the fixed
//!   image + effect-uniform layout.
//! - `texture` uploads decoded images with their sampler.
//! - `geometry` turns the CPU quad into vertex buffers.
//! - `uniforms` writes the per-image effect selection.
//! - `state` applies each frame's rebuild plan and records the draw.

mod context;
mod geometry;
mod pipeline;
mod state;
mod texture;
mod uniforms;

pub(crate) use state::{GpuState, RenderError};
