//! Winit event translation into [`Input`].

use glam::Vec2;
use winit::event::{ElementState, MouseScrollDelta, TouchPhase, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::app::input::{ButtonState, Input, Key, MouseButton};

/// Pixel-precise wheels report pixels; scale them to roughly one line per 100 px.
const PIXELS_PER_LINE: f32 = 100.0;

const KEY_TABLE: &[(KeyCode, Key)] = &[
    (KeyCode::KeyC, Key::C),
    (KeyCode::KeyK, Key::K),
    (KeyCode::KeyR, Key::R),
    (KeyCode::Digit1, Key::Key1),
    (KeyCode::Numpad1, Key::Key1),
    (KeyCode::Digit2, Key::Key2),
    (KeyCode::Numpad2, Key::Key2),
    (KeyCode::Digit3, Key::Key3),
    (KeyCode::Numpad3, Key::Key3),
    (KeyCode::Digit4, Key::Key4),
    (KeyCode::Numpad4, Key::Key4),
    (KeyCode::F1, Key::F1),
    (KeyCode::F2, Key::F2),
    (KeyCode::F3, Key::F3),
    (KeyCode::F4, Key::F4),
    (KeyCode::F5, Key::F5),
    (KeyCode::F6, Key::F6),
    (KeyCode::F7, Key::F7),
    (KeyCode::F8, Key::F8),
    (KeyCode::F9, Key::F9),
    (KeyCode::F10, Key::F10),
    (KeyCode::Space, Key::Space),
    (KeyCode::Enter, Key::Enter),
    (KeyCode::NumpadEnter, Key::Enter),
    (KeyCode::Escape, Key::Escape),
];

#[must_use]
pub fn translate_key(physical_key: PhysicalKey) -> Option<Key> {
    let PhysicalKey::Code(code) = physical_key else {
        return None;
    };
    KEY_TABLE.iter().find(|(c, _)| *c == code).map(|&(_, key)| key)
}

#[must_use]
pub fn translate_mouse_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

fn button_state(state: ElementState) -> ButtonState {
    if state.is_pressed() {
        ButtonState::Pressed
    } else {
        ButtonState::Released
    }
}

/// Feeds one winit window event into `input`.
pub fn process_window_event(input: &mut Input, event: &WindowEvent) {
    match event {
        WindowEvent::KeyboardInput { event, .. } if !event.repeat => {
            if let Some(key) = translate_key(event.physical_key) {
                input.key_event(key, button_state(event.state));
            }
        }
        WindowEvent::CursorMoved { position, .. } => {
            input.pointer_moved(Vec2::new(position.x as f32, position.y as f32));
        }
        WindowEvent::MouseInput { state, button, .. } => {
            if let Some(button) = translate_mouse_button(*button) {
                input.button_event(button, button_state(*state));
            }
        }
        WindowEvent::Touch(touch) if touch.phase == TouchPhase::Started => {
            input.touch_started(Vec2::new(touch.location.x as f32, touch.location.y as f32));
        }
        WindowEvent::MouseWheel { delta, .. } => {
            let lines = match delta {
                MouseScrollDelta::LineDelta(x, y) => Vec2::new(*x, *y),
                MouseScrollDelta::PixelDelta(pos) => {
                    Vec2::new(pos.x as f32, pos.y as f32) / PIXELS_PER_LINE
                }
            };
            input.scrolled(lines);
        }
        WindowEvent::Resized(size) => input.resized(size.width, size.height),
        _ => {}
    }
}
