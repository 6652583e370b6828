//! Maps discrete input events onto [`ViewState`] edits.
//!
//! The window loop translates platform events into calls on [`InputSink`],
//! one call per event. [`InputController`] is the sink used by the viewer;
//! it borrows the view state for the duration of a single dispatch.

use crate::effects::EffectCategory;
use crate::quad::ROTATION_STEP;
use crate::types::DEFAULT_SURFACE_EDGE;
use crate::view::ViewState;

/// Scroll scaling baseline; one wheel line changes zoom by two units.
const ZOOM_BASELINE: f64 = 100.0;
const ZOOM_PER_LINE: f64 = 2.0;
/// Smallest zoom factor a single scroll event may apply.
const MIN_ZOOM_STEP: f64 = 0.1;

/// Drag distances are normalised against the default window edge,
/// independent of the live window size.
const DRAG_EXTENT: f64 = DEFAULT_SURFACE_EDGE as f64;

/// Platform-neutral key commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Quit,
    SelectImage(usize),
    CycleEffect(EffectCategory),
    RotateLeft,
    RotateRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButtonAction {
    Press,
    Release,
}

/// Whether the event loop should keep running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Receiver for discrete input events.
pub trait InputSink {
    fn key_pressed(&mut self, command: KeyCommand) -> LoopControl;
    /// Left mouse button transitions, with the cursor position when known.
    fn mouse_button(&mut self, action: MouseButtonAction, position: Option<(f64, f64)>);
    /// Cursor position in physical window pixels.
    fn cursor_moved(&mut self, x: f64, y: f64);
    /// Vertical wheel offset in lines.
    fn scrolled(&mut self, y_offset: f64);
}

pub struct InputController<'a> {
    view: &'a mut ViewState,
}

impl<'a> InputController<'a> {
    pub fn new(view: &'a mut ViewState) -> Self {
        Self { view }
    }
}

impl InputSink for InputController<'_> {
    fn key_pressed(&mut self, command: KeyCommand) -> LoopControl {
        match command {
            KeyCommand::Quit => return LoopControl::Exit,
            KeyCommand::SelectImage(index) => {
                if !self.view.select_image(index) {
                    tracing::debug!(slot = index, "ignoring out-of-range image slot");
                }
            }
            KeyCommand::CycleEffect(category) => {
                let effect = self.view.cycle_effect(category);
                tracing::debug!(
                    slot = self.view.selected_image(),
                    %category,
                    effect = effect.ordinal(),
                    "cycled effect"
                );
            }
            KeyCommand::RotateLeft => self.view.edit_quad(|quad| quad.rotate(ROTATION_STEP)),
            KeyCommand::RotateRight => self.view.edit_quad(|quad| quad.rotate(-ROTATION_STEP)),
        }
        LoopControl::Continue
    }

    fn mouse_button(&mut self, action: MouseButtonAction, position: Option<(f64, f64)>) {
        let drag = self.view.drag_mut();
        drag.is_dragging = matches!(action, MouseButtonAction::Press);
        if drag.is_dragging && position.is_some() {
            drag.last_cursor = position;
        }
    }

    fn cursor_moved(&mut self, x: f64, y: f64) {
        let drag = *self.view.drag();
        if drag.is_dragging {
            if let Some((last_x, last_y)) = drag.last_cursor {
                let dx = (2.0 * (x - last_x) / DRAG_EXTENT) as f32;
                let dy = (-2.0 * (y - last_y) / DRAG_EXTENT) as f32;
                self.view.edit_quad(|quad| quad.translate(dx, dy));
            }
        }
        self.view.drag_mut().last_cursor = Some((x, y));
    }

    fn scrolled(&mut self, y_offset: f64) {
        if self.view.drag().is_dragging || y_offset == 0.0 {
            return;
        }
        let zoom = (ZOOM_BASELINE + y_offset * ZOOM_PER_LINE) / ZOOM_BASELINE;
        let zoom = zoom.max(MIN_ZOOM_STEP);
        self.view.edit_quad(|quad| quad.scale(zoom as f32));
    }
}
