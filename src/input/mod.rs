use std::collections::{HashSet, VecDeque};

use glam::Vec2;
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

/// One platform input event, already translated into layout coordinates.
///
/// The application loop queues these as they arrive and hands them to the
/// active state one at a time, before the fixed-step update runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    MouseMoved { position: Vec2 },
    MouseButtonPressed { button: MouseButton, position: Vec2 },
    MouseButtonReleased { button: MouseButton, position: Vec2 },
    KeyPressed(KeyCode),
    KeyReleased(KeyCode),
    Resized { width: u32, height: u32 },
}

/// Level-triggered device state plus the queue of edge events not yet
/// consumed by the state stack.
#[derive(Debug, Default)]
pub struct InputState {
    pub keys_held: HashSet<KeyCode>,
    pub mouse_held: HashSet<MouseButton>,
    pub mouse_pos: Vec2,
    events: VecDeque<InputEvent>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `event`: update held sets and the pointer, then queue it.
    pub fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::MouseMoved { position } => self.mouse_pos = position,
            InputEvent::MouseButtonPressed { button, position } => {
                self.mouse_pos = position;
                self.mouse_held.insert(button);
            }
            InputEvent::MouseButtonReleased { button, position } => {
                self.mouse_pos = position;
                self.mouse_held.remove(&button);
            }
            InputEvent::KeyPressed(code) => {
                self.keys_held.insert(code);
            }
            InputEvent::KeyReleased(code) => {
                self.keys_held.remove(&code);
            }
            InputEvent::Resized { .. } => {}
        }
        self.events.push_back(event);
    }

    /// Take every queued event in arrival order.
    pub fn drain_events(&mut self) -> Vec<InputEvent> {
        self.events.drain(..).collect()
    }

    pub fn pending(&self) -> usize {
        self.events.len()
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool { self.keys_held.contains(&key) }
    pub fn is_mouse_held(&self, button: MouseButton) -> bool { self.mouse_held.contains(&button) }
}
