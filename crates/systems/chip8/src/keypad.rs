//! 16-key hexadecimal keypad
//!
//! The host writes key state between steps; the engine only reads it.
//! Physical-to-logical mapping is left to the host.

use crate::cpu::Fault;

pub const KEY_COUNT: usize = 16;

/// Snapshot of all sixteen keys, index = logical key 0x0-0xF
pub type KeyState = [bool; KEY_COUNT];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: KeyState,
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Press or release one key; keys above 0xF are ignored
    pub fn set(&mut self, key: u8, down: bool) {
        if let Some(k) = self.keys.get_mut(key as usize) {
            *k = down;
        }
    }

    pub fn set_all(&mut self, keys: KeyState) {
        self.keys = keys;
    }

    pub fn release_all(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    pub fn state(&self) -> &KeyState {
        &self.keys
    }

    /// Key index comes from a register, so anything above 0xF is a program fault
    pub fn is_down(&self, key: u8) -> Result<bool, Fault> {
        self.keys
            .get(key as usize)
            .copied()
            .ok_or(Fault::KeyOutOfRange { key })
    }

    /// Lowest-numbered key currently held
    pub fn first_down(&self) -> Option<u8> {
        self.keys.iter().position(|&down| down).map(|k| k as u8)
    }
}
