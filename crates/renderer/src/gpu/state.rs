use std::path::{Path, PathBuf};

use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use thiserror::Error;
use tracing::{debug, info};
use winit::dpi::PhysicalSize;

use crate::codec::{self, DecodedImage};
use crate::error::ViewerError;
use crate::frame::{accept_decoded, FrameTracker};
use crate::types::{ShaderSources, ViewerConfig, IMAGE_SLOT_COUNT};
use crate::view::ViewState;

use super::context::GpuContext;
use super::geometry::QuadGeometry;
use super::pipeline::{PipelineLayouts, ShaderPipeline};
use super::texture::ImageTexture;
use super::uniforms::{EffectBuffer, EffectUniforms};

const CLEAR_COLOUR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.2,
    b: 0.2,
    a: 1.0,
};

#[derive(Debug, Error)]
pub(crate) enum RenderError {
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error(transparent)]
    Viewer(#[from] ViewerError),
}

/// GPU resources for the viewer.
///
/// Per-image resources live in `Option` slots and are replaced
/// take-then-build. Fields drop in declaration order, so geometry, texture
/// and pipeline are released before the device and surface.
pub(crate) struct GpuState {
    geometry: Option<QuadGeometry>,
    texture: Option<ImageTexture>,
    pipeline: Option<ShaderPipeline>,
    effects: EffectBuffer,
    layouts: PipelineLayouts,
    context: GpuContext,
    shaders: ShaderSources,
    images: [PathBuf; IMAGE_SLOT_COUNT],
    tracker: FrameTracker,
}

impl GpuState {
    pub(crate) fn new<T>(target: &T, initial_size: PhysicalSize<u32>, config: &ViewerConfig) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, initial_size)?;
        let layouts = PipelineLayouts::new(&context.device);
        let effects = EffectBuffer::new(&context.device, &layouts.uniform_layout);

        Ok(Self {
            geometry: None,
            texture: None,
            pipeline: None,
            effects,
            layouts,
            context,
            shaders: config.shaders.clone(),
            images: config.images.clone(),
            tracker: FrameTracker::new(),
        })
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
    }

    pub(crate) fn reconfigure(&mut self) {
        self.context.reconfigure();
    }

    /// Brings GPU resources in line with `view` and draws one frame.
    ///
    /// Shader failures are returned as [`RenderError::Viewer`] and end the
    /// session; image decode failures are logged and the previous texture is
    /// kept.
    pub(crate) fn render_frame(&mut self, view: &mut ViewState) -> Result<(), RenderError> {
        let plan = self.tracker.plan(view);

        if let Some(category) = plan.shader {
            self.pipeline = None;
            let pipeline = ShaderPipeline::new(
                &self.context.device,
                &self.layouts,
                self.context.surface_format,
                &self.shaders,
                category,
            )?;
            info!(
                category = %pipeline.category,
                fragment = %pipeline.fragment_source.display(),
                "shader program ready"
            );
            self.pipeline = Some(pipeline);
        }

        if let Some(slot) = plan.texture {
            self.reload_texture(view, slot);
        }

        if let Some(texture) = self.texture.as_ref() {
            if self.tracker.geometry_stale(view) {
                self.geometry = None;
                self.geometry = Some(QuadGeometry::build(
                    &self.context.device,
                    view.quad(),
                    (texture.width, texture.height),
                ));
                self.tracker.mark_geometry_uploaded(view.quad_revision());
            }
        }

        self.effects.write(
            &self.context.queue,
            EffectUniforms::from_selection(&view.current_effects()),
        );

        let frame = self.context.surface.get_current_texture()?;
        let target = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });
        self.encode_draw(&mut encoder, &target);
        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn reload_texture(&mut self, view: &mut ViewState, slot: usize) {
        let path = self.images[slot].clone();
        let decoded = codec::decode(&path).and_then(|image| self.check_limits(&path, image));
        if let Some(image) = accept_decoded(view, slot, &path, decoded) {
            self.texture = None;
            self.texture = Some(ImageTexture::upload(
                &self.context.device,
                &self.context.queue,
                &self.layouts.texture_layout,
                slot,
                &image,
            ));
            info!(slot = slot + 1, path = %path.display(), "texture loaded");
        }
    }

    fn check_limits(&self, path: &Path, image: DecodedImage) -> crate::error::Result<DecodedImage> {
        let max = self.context.device.limits().max_texture_dimension_2d;
        if image.width > max || image.height > max {
            return Err(ViewerError::ImageTooLarge {
                path: path.to_path_buf(),
                width: image.width,
                height: image.height,
                max,
            });
        }
        Ok(image)
    }

    fn encode_draw(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("image pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOUR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        let (Some(pipeline), Some(texture), Some(geometry)) =
            (&self.pipeline, &self.texture, &self.geometry)
        else {
            debug!("nothing to draw yet");
            return;
        };
        render_pass.set_pipeline(&pipeline.pipeline);
        render_pass.set_bind_group(0, &texture.bind_group, &[]);
        render_pass.set_bind_group(1, &self.effects.bind_group, &[]);
        render_pass.set_vertex_buffer(0, geometry.positions.slice(..));
        render_pass.set_vertex_buffer(1, geometry.colours.slice(..));
        render_pass.set_vertex_buffer(2, geometry.texcoords.slice(..));
        render_pass.draw(0..QuadGeometry::VERTEX_COUNT, 0..1);
    }
}
