//! Terminal host: holds a fixed set of keys and draws frames as text.

use std::io::{self, Write};

use emu_chip8::display::{Framebuffer, SCREEN_HEIGHT, SCREEN_WIDTH};
use emu_chip8::keypad::{KeyState, KEY_COUNT};
use emu_chip8::Host;

const LIT: char = '█';
const DARK: char = ' ';

pub struct TerminalHost {
    keys: KeyState,
    frames_left: u32,
    /// Redraw every frame in place instead of only printing the last one
    live: bool,
}

impl TerminalHost {
    pub fn new(held_keys: &[u8], frames: u32, live: bool) -> Self {
        let mut keys = [false; KEY_COUNT];
        for &key in held_keys {
            if let Some(k) = keys.get_mut(key as usize) {
                *k = true;
            }
        }
        Self {
            keys,
            frames_left: frames,
            live,
        }
    }
}

impl Host for TerminalHost {
    fn present(&mut self, framebuffer: &Framebuffer) {
        if !self.live {
            return;
        }
        let mut out = io::stdout().lock();
        // Cursor home, then overwrite the previous frame
        if write!(out, "\x1b[H{}", render(framebuffer)).and_then(|_| out.flush()).is_err() {
            log::warn!("stdout closed, stopping live output");
            self.live = false;
        }
    }

    fn poll_keys(&mut self) -> Option<KeyState> {
        if self.frames_left == 0 {
            return None;
        }
        self.frames_left -= 1;
        Some(self.keys)
    }
}

/// One text line per pixel row
pub fn render(framebuffer: &Framebuffer) -> String {
    let mut out = String::with_capacity((SCREEN_WIDTH * LIT.len_utf8() + 1) * SCREEN_HEIGHT);
    for y in 0..SCREEN_HEIGHT {
        for x in 0..SCREEN_WIDTH {
            out.push(if framebuffer.is_on(x, y) { LIT } else { DARK });
        }
        out.push('\n');
    }
    out
}

/// Parse one hexadecimal keypad key (`0`-`F`)
pub fn parse_key(s: &str) -> Result<u8, String> {
    match u8::from_str_radix(s.trim(), 16) {
        Ok(key) if (key as usize) < KEY_COUNT => Ok(key),
        _ => Err(format!("invalid key '{}': expected a hex digit 0-F", s)),
    }
}
