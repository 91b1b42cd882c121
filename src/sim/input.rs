//! Keyboard state and paddle movement intents
//!
//! The host updates a [`KeyState`] from its key events; the simulation only
//! reads it once per tick and turns it into one [`MoveIntent`] per paddle.

use std::collections::HashMap;

use glam::Vec2;

use super::state::Player;

/// Held/released state per lowercase key name (`"w"`, `"arrowleft"`, ...)
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashMap<String, bool>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key event. Names are case-insensitive (`"ArrowUp"` == `"arrowup"`).
    pub fn set(&mut self, key: &str, held: bool) {
        self.held.insert(key.to_lowercase(), held);
    }

    pub fn press(&mut self, key: &str) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: &str) {
        self.set(key, false);
    }

    /// Lookup by lowercase name. Unknown keys count as not pressed.
    pub fn is_held(&self, key: &str) -> bool {
        self.held.get(key).copied().unwrap_or(false)
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }
}

/// Keys steering one paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    pub left: &'static str,
    pub right: &'static str,
    pub up: &'static str,
    pub down: &'static str,
}

impl KeyBindings {
    pub const PLAYER_ONE: KeyBindings = KeyBindings {
        left: "a",
        right: "d",
        up: "w",
        down: "s",
    };

    pub const PLAYER_TWO: KeyBindings = KeyBindings {
        left: "arrowleft",
        right: "arrowright",
        up: "arrowup",
        down: "arrowdown",
    };

    pub fn for_player(player: Player) -> Self {
        match player {
            Player::One => Self::PLAYER_ONE,
            Player::Two => Self::PLAYER_TWO,
        }
    }
}

/// Which directions a paddle is being pushed this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl MoveIntent {
    pub fn from_keys(keys: &KeyState, bindings: &KeyBindings) -> Self {
        Self {
            left: keys.is_held(bindings.left),
            right: keys.is_held(bindings.right),
            up: keys.is_held(bindings.up),
            down: keys.is_held(bindings.down),
        }
    }

    /// One unit axis step per held direction, in application order.
    ///
    /// Steps are applied (and clamped) one at a time, so a diagonal is the
    /// sum of two axis moves and opposite keys cancel.
    pub fn steps(&self) -> impl Iterator<Item = Vec2> + '_ {
        [
            (self.left, Vec2::NEG_X),
            (self.right, Vec2::X),
            (self.up, Vec2::Y),
            (self.down, Vec2::NEG_Y),
        ]
        .into_iter()
        .filter_map(|(held, dir)| held.then_some(dir))
    }

    pub fn is_idle(&self) -> bool {
        !(self.left || self.right || self.up || self.down)
    }
}
