//! Platform-agnostic input handling system

/// Platform-independent input events
#[derive(Debug, Clone)]
pub enum InputEvent {
    // Keyboard events, carrying the physical key code ("Space", "KeyA", ...)
    KeyDown(String),
    KeyUp(String),

    // Mouse events
    MouseMove { dx: f32, dy: f32 },

    // Window events
    FocusLost,
    PointerLockChanged { locked: bool },
}

/// What a key press means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    ChargeThrow,
    ReleaseThrow,
    OrbitLeft,
    OrbitRight,
}

/// Pointer state shared between event handlers and the frame loop
#[derive(Default)]
pub struct InputState {
    pub look_delta: (f32, f32),
    pub pointer_locked: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process an input event and update state
    pub fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::MouseMove { dx, dy } => {
                if self.pointer_locked {
                    self.look_delta.0 += dx;
                    self.look_delta.1 += dy;
                }
            }
            InputEvent::FocusLost => {
                self.look_delta = (0.0, 0.0);
            }
            InputEvent::PointerLockChanged { locked } => {
                self.pointer_locked = *locked;
                if !locked {
                    self.look_delta = (0.0, 0.0);
                }
            }
            InputEvent::KeyDown(_) | InputEvent::KeyUp(_) => {}
        }
    }

    pub fn consume_look(&mut self) -> (f32, f32) {
        let result = self.look_delta;
        self.look_delta = (0.0, 0.0);
        result
    }
}

/// Key mapping configuration, matched against `KeyboardEvent.code`
#[derive(Clone)]
pub struct KeyBindings {
    pub throw: String,
    pub orbit_left: String,
    pub orbit_right: String,
    pub escape: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            throw: "Space".to_string(),
            orbit_left: "KeyA".to_string(),
            orbit_right: "KeyD".to_string(),
            escape: "Escape".to_string(),
        }
    }
}

/// High-level input processor
#[derive(Clone, Default)]
pub struct InputProcessor {
    bindings: KeyBindings,
}

impl InputProcessor {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Map a raw event to a game action, if any
    pub fn action_for(&self, event: &InputEvent) -> Option<GameAction> {
        match event {
            InputEvent::KeyDown(code) => self.on_key_down(code),
            InputEvent::KeyUp(code) => self.on_key_up(code),
            _ => None,
        }
    }

    pub fn on_key_down(&self, code: &str) -> Option<GameAction> {
        if code == self.bindings.throw {
            Some(GameAction::ChargeThrow)
        } else if code == self.bindings.orbit_left {
            Some(GameAction::OrbitLeft)
        } else if code == self.bindings.orbit_right {
            Some(GameAction::OrbitRight)
        } else {
            None
        }
    }

    pub fn on_key_up(&self, code: &str) -> Option<GameAction> {
        (code == self.bindings.throw).then_some(GameAction::ReleaseThrow)
    }

    pub fn is_escape(&self, code: &str) -> bool {
        code == self.bindings.escape
    }

    /// Keys whose browser default (page scroll) should be suppressed
    pub fn is_game_key(&self, code: &str) -> bool {
        code == self.bindings.throw || code == self.bindings.orbit_left || code == self.bindings.orbit_right
    }
}

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use super::*;
    use web_sys::{KeyboardEvent, MouseEvent};

    pub fn keyboard_event_to_input(e: &KeyboardEvent, is_down: bool) -> InputEvent {
        let code = e.code();
        if is_down {
            InputEvent::KeyDown(code)
        } else {
            InputEvent::KeyUp(code)
        }
    }

    pub fn mouse_move_to_input(e: &MouseEvent) -> InputEvent {
        InputEvent::MouseMove {
            dx: e.movement_x() as f32,
            dy: e.movement_y() as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_map_to_actions() {
        let p = InputProcessor::default();
        assert_eq!(p.action_for(&InputEvent::KeyDown("Space".into())), Some(GameAction::ChargeThrow));
        assert_eq!(p.action_for(&InputEvent::KeyUp("Space".into())), Some(GameAction::ReleaseThrow));
        assert_eq!(p.action_for(&InputEvent::KeyDown("KeyA".into())), Some(GameAction::OrbitLeft));
        assert_eq!(p.action_for(&InputEvent::KeyDown("KeyD".into())), Some(GameAction::OrbitRight));
    }

    #[test]
    fn other_keys_do_nothing() {
        let p = InputProcessor::default();
        assert_eq!(p.on_key_down("KeyW"), None);
        assert_eq!(p.on_key_up("KeyA"), None);
        assert_eq!(p.action_for(&InputEvent::FocusLost), None);
        assert!(!p.is_game_key("KeyW"));
        assert!(p.is_game_key("Space"));
    }

    #[test]
    fn look_only_accumulates_while_locked() {
        let mut s = InputState::new();
        s.process_event(&InputEvent::MouseMove { dx: 3.0, dy: 1.0 });
        assert_eq!(s.consume_look(), (0.0, 0.0));

        s.process_event(&InputEvent::PointerLockChanged { locked: true });
        s.process_event(&InputEvent::MouseMove { dx: 3.0, dy: 1.0 });
        s.process_event(&InputEvent::MouseMove { dx: 1.0, dy: -2.0 });
        assert_eq!(s.consume_look(), (4.0, -1.0));
        assert_eq!(s.consume_look(), (0.0, 0.0));
    }

    #[test]
    fn custom_bindings() {
        let p = InputProcessor::new(KeyBindings {
            throw: "KeyF".into(),
            ..KeyBindings::default()
        });
        assert_eq!(p.on_key_down("KeyF"), Some(GameAction::ChargeThrow));
        assert_eq!(p.on_key_down("Space"), None);
    }
}
