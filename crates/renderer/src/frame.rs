use std::path::Path;

use crate::codec::DecodedImage;
use crate::effects::EffectCategory;
use crate::error::Result;
use crate::quad::QuadVertices;
use crate::view::ViewState;

/// Rebuilds required before the next draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FramePlan {
    /// Recompile the program for this category's fragment shader.
    pub shader: Option<EffectCategory>,
    /// Decode and upload the image in this slot.
    pub texture: Option<usize>,
}

/// Remembers what the GPU currently holds so each frame only rebuilds
/// what changed.
///
/// Textures reload only when the selected slot differs from the previous
/// frame's slot. Geometry is rebuilt when the quad revision differs from
/// the one last uploaded (a texture reload resets the quad, which bumps the
/// revision).
#[derive(Debug, Default)]
pub struct FrameTracker {
    previous_image: Option<usize>,
    uploaded_revision: Option<u64>,
}

impl FrameTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the view once at the top of a frame, consuming the shader
    /// dirty flag and recording the selected slot.
    pub fn plan(&mut self, view: &mut ViewState) -> FramePlan {
        let shader = view.take_shader_dirty();
        let selected = view.selected_image();
        let texture = if self.previous_image != Some(selected) {
            self.previous_image = Some(selected);
            Some(selected)
        } else {
            None
        };
        FramePlan { shader, texture }
    }

    pub fn geometry_stale(&self, view: &ViewState) -> bool {
        self.uploaded_revision != Some(view.quad_revision())
    }

    pub fn mark_geometry_uploaded(&mut self, revision: u64) {
        self.uploaded_revision = Some(revision);
    }
}

/// Applies a texture decode result for `slot`.
///
/// A decoded image resets the quad to its aspect-fit shape and is handed back
/// for upload. A failure is logged and leaves the quad (and whatever texture
/// is bound) untouched.
pub fn accept_decoded(
    view: &mut ViewState,
    slot: usize,
    path: &Path,
    decoded: Result<DecodedImage>,
) -> Option<DecodedImage> {
    match decoded {
        Ok(image) => {
            tracing::debug!(
                slot,
                path = %path.display(),
                width = image.width,
                height = image.height,
                "decoded image"
            );
            view.reset_quad(QuadVertices::aspect_fit(image.width, image.height));
            Some(image)
        }
        Err(error) => {
            tracing::warn!(slot, path = %path.display(), %error, "failed to load image");
            None
        }
    }
}
