//! Per-tick input snapshot
//!
//! The host polls its input device once per tick and hands the simulation a
//! snapshot. Each key reports whether it is held and whether it went down
//! this tick.

use serde::{Deserialize, Serialize};

/// Named keys the simulation reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    TurnLeft,
    TurnRight,
    ThrustForward,
    ThrustBackward,
    Fire,
    Confirm,
}

impl Key {
    #[inline]
    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Key state for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    held: u8,
    pressed: u8,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a key as held (not newly pressed)
    pub fn with_held(mut self, key: Key) -> Self {
        self.held |= key.bit();
        self
    }

    /// Mark a key as pressed this tick. A pressed key is also held.
    pub fn with_pressed(mut self, key: Key) -> Self {
        self.pressed |= key.bit();
        self.held |= key.bit();
        self
    }

    pub fn set_held(&mut self, key: Key, held: bool) {
        if held {
            self.held |= key.bit();
        } else {
            self.held &= !key.bit();
        }
    }

    pub fn set_pressed(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.pressed |= key.bit();
        } else {
            self.pressed &= !key.bit();
        }
    }

    #[inline]
    pub fn is_held(&self, key: Key) -> bool {
        self.held & key.bit() != 0
    }

    #[inline]
    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed & key.bit() != 0
    }
}
