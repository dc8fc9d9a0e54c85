//! Polled input state
//!
//! Hosts translate raw key/touch events into held-state bits. The engine
//! samples `pressed` once per tick, so a held key reads as pressed for every
//! tick it stays down.

use serde::{Deserialize, Serialize};

/// Logical actions the simulation can poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Jump,
}

impl Action {
    const fn bit(self) -> u8 {
        match self {
            Action::Jump => 1 << 0,
        }
    }
}

/// Anything that can report whether an action is currently held
pub trait InputSource {
    fn pressed(&self, action: Action) -> bool;
}

/// Held-state bitfield, updated by key down/up events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    bits: u8,
}

impl KeyState {
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Key down
    pub fn press(&mut self, action: Action) {
        self.bits |= action.bit();
    }

    /// Key up
    pub fn release(&mut self, action: Action) {
        self.bits &= !action.bit();
    }

    pub fn set(&mut self, action: Action, held: bool) {
        if held {
            self.press(action);
        } else {
            self.release(action);
        }
    }
}

impl InputSource for KeyState {
    fn pressed(&self, action: Action) -> bool {
        self.bits & action.bit() != 0
    }
}

impl<T: InputSource + ?Sized> InputSource for &T {
    fn pressed(&self, action: Action) -> bool {
        (**self).pressed(action)
    }
}
