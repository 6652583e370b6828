use crate::effects::{Effect, EffectCategory, EffectSelection, EffectTable};
use crate::quad::QuadVertices;
use crate::types::IMAGE_SLOT_COUNT;

/// Left-button drag tracking.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragState {
    pub is_dragging: bool,
    /// Last cursor position reported by the window, in physical pixels.
    pub last_cursor: Option<(f64, f64)>,
}

/// Everything the render loop reads once per frame.
///
/// Input handling writes these fields between frames; the render loop
/// consumes the dirty flag and compares the selected slot and quad
/// revision against what it last built.
#[derive(Debug, Clone)]
pub struct ViewState {
    selected_image: usize,
    effects: EffectTable,
    shader_category: EffectCategory,
    shader_dirty: bool,
    quad: QuadVertices,
    quad_revision: u64,
    drag: DragState,
}

impl ViewState {
    /// Starts on `initial_image` with no effects and the colour shader pending.
    pub fn new(initial_image: usize) -> Self {
        Self {
            selected_image: initial_image.min(IMAGE_SLOT_COUNT - 1),
            effects: EffectTable::default(),
            shader_category: EffectCategory::Colour,
            shader_dirty: true,
            quad: QuadVertices::default(),
            quad_revision: 0,
            drag: DragState::default(),
        }
    }

    pub fn selected_image(&self) -> usize {
        self.selected_image
    }

    /// Selects a slot; returns `false` when the index is out of range.
    pub fn select_image(&mut self, index: usize) -> bool {
        if index >= IMAGE_SLOT_COUNT {
            return false;
        }
        self.selected_image = index;
        true
    }

    /// Effects applied to the selected image.
    pub fn current_effects(&self) -> EffectSelection {
        self.effects_for(self.selected_image)
    }

    pub fn effects_for(&self, index: usize) -> EffectSelection {
        self.effects.slot(index).copied().unwrap_or_default()
    }

    /// Cycles `category` on the selected image and marks the shader dirty.
    pub fn cycle_effect(&mut self, category: EffectCategory) -> Effect {
        let effect = match self.effects.slot_mut(self.selected_image) {
            Some(selection) => selection.cycle(category),
            None => Effect::None,
        };
        self.shader_category = category;
        self.shader_dirty = true;
        effect
    }

    pub fn shader_category(&self) -> EffectCategory {
        self.shader_category
    }

    pub fn is_shader_dirty(&self) -> bool {
        self.shader_dirty
    }

    /// Clears the dirty flag, returning the category to compile if it was set.
    pub fn take_shader_dirty(&mut self) -> Option<EffectCategory> {
        std::mem::take(&mut self.shader_dirty).then_some(self.shader_category)
    }

    pub fn quad(&self) -> &QuadVertices {
        &self.quad
    }

    /// Incremented on every vertex edit.
    pub fn quad_revision(&self) -> u64 {
        self.quad_revision
    }

    pub fn reset_quad(&mut self, quad: QuadVertices) {
        self.edit_quad(|current| *current = quad);
    }

    pub fn edit_quad(&mut self, edit: impl FnOnce(&mut QuadVertices)) {
        edit(&mut self.quad);
        self.quad_revision = self.quad_revision.wrapping_add(1);
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn drag_mut(&mut self) -> &mut DragState {
        &mut self.drag
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(0)
    }
}
