//! Display and input capability supplied by whoever drives the machine.
//!
//! The machine never talks to a window, terminal or keyboard directly. Once
//! per frame the driver asks the host for the current key state and hands it
//! the framebuffer to show.

use std::collections::VecDeque;

use emu_core::types::Frame;

use crate::display::Framebuffer;
use crate::keypad::{KeyState, KEY_COUNT};

pub trait Host {
    /// Show the current framebuffer
    fn present(&mut self, framebuffer: &Framebuffer);

    /// Current state of all sixteen keys, or `None` when the user asked to quit
    fn poll_keys(&mut self) -> Option<KeyState>;
}

/// Host that replays a fixed key script, one entry per frame, and records
/// every presented frame. Asks to stop once the script runs out.
#[derive(Debug, Default)]
pub struct ScriptedHost {
    script: VecDeque<KeyState>,
    frames: Vec<Frame>,
}

impl ScriptedHost {
    pub fn new(script: impl IntoIterator<Item = KeyState>) -> Self {
        Self {
            script: script.into_iter().collect(),
            frames: Vec::new(),
        }
    }

    /// Hold `keys` down for `frames` frames
    pub fn holding(keys: &[u8], frames: usize) -> Self {
        let mut state = [false; KEY_COUNT];
        for &key in keys {
            if let Some(k) = state.get_mut(key as usize) {
                *k = true;
            }
        }
        Self::new(std::iter::repeat(state).take(frames))
    }

    /// No keys pressed for `frames` frames
    pub fn idle(frames: usize) -> Self {
        Self::holding(&[], frames)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Host for ScriptedHost {
    fn present(&mut self, framebuffer: &Framebuffer) {
        self.frames.push(framebuffer.to_frame());
    }

    fn poll_keys(&mut self) -> Option<KeyState> {
        self.script.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::PIXEL_ON;

    #[test]
    fn test_script_runs_out() {
        let mut host = ScriptedHost::idle(2);
        assert_eq!(host.poll_keys(), Some([false; KEY_COUNT]));
        assert_eq!(host.remaining(), 1);
        assert!(host.poll_keys().is_some());
        assert_eq!(host.poll_keys(), None);
    }

    #[test]
    fn test_holding_keys() {
        let mut host = ScriptedHost::holding(&[0x1, 0xF, 0x20], 1);
        let keys = host.poll_keys().unwrap();
        assert!(keys[0x1]);
        assert!(keys[0xF]);
        assert_eq!(keys.iter().filter(|&&k| k).count(), 2);
    }

    #[test]
    fn test_present_records_snapshot() {
        let mut host = ScriptedHost::default();
        let mut fb = Framebuffer::new();
        fb.set_linear(5, PIXEL_ON);
        host.present(&fb);
        fb.clear();
        host.present(&fb);

        assert_eq!(host.frames().len(), 2);
        assert_eq!(host.frames()[0].pixels[5], PIXEL_ON);
        assert_eq!(host.last_frame().map(|f| f.pixels[5]), Some(0));
    }
}
