use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing::{error, warn};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

use crate::effects::EffectCategory;
use crate::gpu::{GpuState, RenderError};
use crate::input::{InputController, InputSink, KeyCommand, LoopControl, MouseButtonAction};
use crate::types::{ViewerConfig, IMAGE_SLOT_COUNT};
use crate::view::ViewState;

/// Pixel scroll distance treated as one wheel line.
const PIXELS_PER_LINE: f64 = 20.0;

/// Window, GPU resources, and the view state they render.
struct WindowState {
    // Declared before `window` so the surface is released first.
    gpu: GpuState,
    window: Arc<Window>,
    view: ViewState,
    cursor: Option<(f64, f64)>,
}

impl WindowState {
    fn new(window: Arc<Window>, config: &ViewerConfig) -> Result<Self> {
        let size = window.inner_size();
        let gpu = GpuState::new(window.as_ref(), size, config)?;
        Ok(Self {
            gpu,
            window,
            view: ViewState::new(config.initial_image),
            cursor: None,
        })
    }

    fn window(&self) -> &Window {
        self.window.as_ref()
    }

    fn input(&mut self) -> InputController<'_> {
        InputController::new(&mut self.view)
    }

    fn render(&mut self) -> std::result::Result<(), RenderError> {
        self.gpu.render_frame(&mut self.view)
    }
}

/// Opens the viewer window and runs the event loop until Escape, a window
/// close, or a fatal rendering error.
pub(crate) fn run(config: ViewerConfig) -> Result<()> {
    let event_loop = EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;

    let (width, height) = config.surface_size;
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(PhysicalSize::new(width, height))
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create viewer window: {err}"))?;
    let window = Arc::new(window);

    let mut state =
        WindowState::new(window, &config).context("failed to initialise window renderer")?;
    state.window().request_redraw();

    let mut outcome: Result<()> = Ok(());
    let run_result = event_loop.run(|event, elwt| match event {
        Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
            match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                    elwt.exit();
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if event.state != ElementState::Pressed || event.repeat {
                        return;
                    }
                    if let Some(command) = key_command(&event.logical_key) {
                        if state.input().key_pressed(command) == LoopControl::Exit {
                            elwt.exit();
                        }
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    state.cursor = Some((position.x, position.y));
                    state.input().cursor_moved(position.x, position.y);
                }
                WindowEvent::MouseInput {
                    state: button_state,
                    button: MouseButton::Left,
                    ..
                } => {
                    let action = match button_state {
                        ElementState::Pressed => MouseButtonAction::Press,
                        ElementState::Released => MouseButtonAction::Release,
                    };
                    let cursor = state.cursor;
                    state.input().mouse_button(action, cursor);
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    state.input().scrolled(scroll_lines(delta));
                }
                WindowEvent::Resized(new_size) => {
                    state.gpu.resize(new_size);
                }
                WindowEvent::RedrawRequested => match state.render() {
                    Ok(()) => {}
                    Err(RenderError::Surface(surface_err)) => match surface_err {
                        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                            state.gpu.reconfigure();
                        }
                        wgpu::SurfaceError::OutOfMemory => {
                            error!("surface out of memory; exiting");
                            outcome = Err(anyhow!("surface out of memory"));
                            elwt.exit();
                        }
                        wgpu::SurfaceError::Timeout => {
                            warn!("surface timeout; retrying next frame");
                        }
                        other => {
                            warn!("surface error: {other:?}; retrying next frame");
                        }
                    },
                    Err(RenderError::Viewer(err)) => {
                        error!(error = %err, "rendering failed");
                        outcome = Err(err.into());
                        elwt.exit();
                    }
                },
                _ => {}
            }
        }
        Event::AboutToWait => {
            state.window().request_redraw();
            elwt.set_control_flow(ControlFlow::Wait);
        }
        _ => {}
    });

    if let Err(err) = run_result {
        return Err(anyhow!("window event loop error: {err}"));
    }
    outcome
}

/// Maps a logical key to a viewer command.
///
/// Letters match regardless of case so Shift or Caps Lock do not block the
/// effect keys.
pub(crate) fn key_command(key: &Key) -> Option<KeyCommand> {
    match key {
        Key::Named(NamedKey::Escape) => Some(KeyCommand::Quit),
        Key::Named(NamedKey::ArrowLeft) => Some(KeyCommand::RotateLeft),
        Key::Named(NamedKey::ArrowRight) => Some(KeyCommand::RotateRight),
        Key::Character(text) => character_command(text.as_str()),
        _ => None,
    }
}

fn character_command(text: &str) -> Option<KeyCommand> {
    let mut chars = text.chars();
    let ch = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    match ch.to_ascii_lowercase() {
        'c' => Some(KeyCommand::CycleEffect(EffectCategory::Colour)),
        'f' => Some(KeyCommand::CycleEffect(EffectCategory::Filter)),
        'b' => Some(KeyCommand::CycleEffect(EffectCategory::Blur)),
        digit @ '1'..='9' => {
            let slot = digit.to_digit(10)? as usize - 1;
            (slot < IMAGE_SLOT_COUNT).then_some(KeyCommand::SelectImage(slot))
        }
        _ => None,
    }
}

fn scroll_lines(delta: MouseScrollDelta) -> f64 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => f64::from(y),
        MouseScrollDelta::PixelDelta(position) => position.y / PIXELS_PER_LINE,
    }
}

#[cfg(test)]
mod tests {
    use winit::dpi::PhysicalPosition;

    use super::*;

    fn character(text: &str) -> Key {
        Key::Character(text.into())
    }

    #[test]
    fn number_keys_select_slots() {
        for (index, digit) in ["1", "2", "3", "4", "5", "6"].into_iter().enumerate() {
            assert_eq!(
                key_command(&character(digit)),
                Some(KeyCommand::SelectImage(index))
            );
        }
        assert_eq!(key_command(&character("7")), None);
        assert_eq!(key_command(&character("0")), None);
    }

    #[test]
    fn effect_keys_ignore_case() {
        assert_eq!(
            key_command(&character("c")),
            Some(KeyCommand::CycleEffect(EffectCategory::Colour))
        );
        assert_eq!(
            key_command(&character("F")),
            Some(KeyCommand::CycleEffect(EffectCategory::Filter))
        );
        assert_eq!(
            key_command(&character("b")),
            Some(KeyCommand::CycleEffect(EffectCategory::Blur))
        );
    }

    #[test]
    fn named_keys_map_to_commands() {
        assert_eq!(
            key_command(&Key::Named(NamedKey::Escape)),
            Some(KeyCommand::Quit)
        );
        assert_eq!(
            key_command(&Key::Named(NamedKey::ArrowLeft)),
            Some(KeyCommand::RotateLeft)
        );
        assert_eq!(
            key_command(&Key::Named(NamedKey::ArrowRight)),
            Some(KeyCommand::RotateRight)
        );
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        assert_eq!(key_command(&Key::Named(NamedKey::Space)), None);
        assert_eq!(key_command(&character("x")), None);
        assert_eq!(key_command(&character("cb")), None);
    }

    #[test]
    fn pixel_scroll_converts_to_lines() {
        assert_eq!(scroll_lines(MouseScrollDelta::LineDelta(0.0, 2.0)), 2.0);
        assert_eq!(
            scroll_lines(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -40.0))),
            -2.0
        );
    }
}
