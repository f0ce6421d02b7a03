//! Machine configuration
//!
//! Loaded from JSON; every field is optional and falls back to its default.
//!
//! ```json
//! { "semantics": "corrected", "cycles_per_frame": 15, "seed": 42 }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Which reading of the two ambiguous opcodes to execute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Semantics {
    /// Bnnn writes V0 + nnn into I, Fx65 stores registers like Fx55, 8xy0 does nothing
    #[default]
    ReferenceExact,
    /// Bnnn jumps to V0 + nnn, Fx65 loads registers from memory, 8xy0 copies Vy into Vx
    Corrected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chip8Config {
    pub semantics: Semantics,
    /// Instructions executed per emulated frame
    pub cycles_per_frame: u32,
    /// Timer decrements per emulated frame
    pub timer_ticks_per_frame: u32,
    /// Frame cadence used by hosts that pace in real time
    pub frame_rate_hz: u32,
    /// Fixed seed for Cxkk; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for Chip8Config {
    fn default() -> Self {
        Self {
            semantics: Semantics::ReferenceExact,
            cycles_per_frame: 11, // ~660 instructions/s at 60 Hz
            timer_ticks_per_frame: 1,
            frame_rate_hz: 60,
            seed: None,
        }
    }
}

impl Chip8Config {
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Read a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let contents = fs::read_to_string(path)?;
        Ok(Self::from_json_str(&contents)?)
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}
