//! Keyboard controls for the player horse

use serde::{Deserialize, Serialize};

use crate::game_server::horse::Horse;

/// Movement intent a key maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
}

impl Intent {
    /// Map a key name to an intent (case-insensitive)
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "w" | "arrowup" => Some(Self::Forward),
            "s" | "arrowdown" => Some(Self::Backward),
            "a" | "arrowleft" => Some(Self::TurnLeft),
            "d" | "arrowright" => Some(Self::TurnRight),
            _ => None,
        }
    }
}

/// Which intents are currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle key down event, returns whether the key was mapped
    pub fn key_down(&mut self, key: &str) -> bool {
        self.set_key(key, true)
    }

    /// Handle key up event, returns whether the key was mapped
    pub fn key_up(&mut self, key: &str) -> bool {
        self.set_key(key, false)
    }

    pub fn set(&mut self, intent: Intent, held: bool) {
        match intent {
            Intent::Forward => self.forward = held,
            Intent::Backward => self.backward = held,
            Intent::TurnLeft => self.turn_left = held,
            Intent::TurnRight => self.turn_right = held,
        }
    }

    /// Release every key
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn set_key(&mut self, key: &str, held: bool) -> bool {
        match Intent::from_key(key) {
            Some(intent) => {
                self.set(intent, held);
                true
            }
            None => false,
        }
    }
}

/// Applies held intents to a horse transform
pub struct Controls;

impl Controls {
    /// Units per second
    pub const MOVEMENT_SPEED: f32 = 5.0;
    /// Radians per second
    pub const TURN_SPEED: f32 = 2.0;

    pub fn apply(horse: &mut Horse, input: &InputState, dt: f32) {
        let step = horse.forward() * Self::MOVEMENT_SPEED * dt;
        if input.forward {
            horse.position += step;
        }
        if input.backward {
            horse.position -= step;
        }

        if input.turn_left {
            horse.heading += Self::TURN_SPEED * dt;
        }
        if input.turn_right {
            horse.heading -= Self::TURN_SPEED * dt;
        }
    }
}
