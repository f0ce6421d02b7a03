//! CHIP-8 virtual machine
//!
//! # Architecture
//!
//! - **Memory**: 4 KB, glyph table at 0x050, programs loaded at 0x200
//! - **CPU**: 16 8-bit registers (VF doubles as flag), 16-bit index, 16-level stack
//! - **Display**: 64x32 monochrome, XOR sprite drawing with collision flag
//! - **Input**: 16-key hexadecimal keypad
//! - **Timers**: delay and sound, decremented once per tick (60 Hz by default)
//!
//! [`Chip8System`] runs the machine at frame granularity: a fixed number of
//! instructions followed by a fixed number of timer ticks. Frontends drive it
//! either through [`emu_core::System`] or through [`Chip8System::run_frame`]
//! with a [`Host`] that supplies keys and shows frames.

pub mod config;
pub mod cpu;
pub mod display;
pub mod host;
pub mod instruction;
pub mod keypad;
pub mod memory;

pub use config::{Chip8Config, Semantics};
pub use cpu::{Chip8Cpu, Fault};
pub use display::Framebuffer;
pub use host::{Host, ScriptedHost};
pub use keypad::KeyState;
pub use memory::LoadError;

use emu_core::logging::{log, LogCategory, LogLevel};
use emu_core::{types::Frame, MountPointInfo, System};
use thiserror::Error;

/// Id of the single media slot
pub const PROGRAM_MOUNT: &str = "Program";

#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("Program error: {0}")]
    Load(#[from] LoadError),
    #[error("Fault at PC={pc:04X}: {fault}")]
    Fault { pc: u16, fault: Fault },
    #[error("No program loaded")]
    NoProgram,
    #[error("Invalid mount point: {0}")]
    InvalidMountPoint(String),
}

/// CHIP-8 system
#[derive(Debug)]
pub struct Chip8System {
    cpu: Chip8Cpu,
    config: Chip8Config,
    /// Mounted program image, kept so reset can rebuild memory
    program: Option<Vec<u8>>,
    frames: u64,
}

impl Default for Chip8System {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip8System {
    pub fn new() -> Self {
        Self::with_config(Chip8Config::default())
    }

    pub fn with_config(config: Chip8Config) -> Self {
        Self {
            cpu: Chip8Cpu::new(config.semantics, config.seed),
            config,
            program: None,
            frames: 0,
        }
    }

    pub fn config(&self) -> &Chip8Config {
        &self.config
    }

    pub fn cpu(&self) -> &Chip8Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Chip8Cpu {
        &mut self.cpu
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.cpu.framebuffer
    }

    /// Frames emulated since the last reset
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Install a program image and restart the machine.
    ///
    /// A rejected image leaves the previously mounted program (if any) in place.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        self.cpu.load_program(program)?;
        self.program = Some(program.to_vec());
        self.reset();
        Ok(())
    }

    /// Poll the host for keys, emulate one frame and present it.
    ///
    /// Returns `Ok(false)` without emulating anything when the host asks to stop.
    pub fn run_frame(&mut self, host: &mut impl Host) -> Result<bool, Chip8Error> {
        let Some(keys) = host.poll_keys() else {
            log(LogCategory::Input, LogLevel::Info, || {
                format!("Input: host requested stop after {} frames", self.frames)
            });
            return Ok(false);
        };

        self.cpu.keypad.set_all(keys);
        self.emulate_frame()?;
        host.present(&self.cpu.framebuffer);
        Ok(true)
    }

    fn emulate_frame(&mut self) -> Result<(), Chip8Error> {
        if self.program.is_none() {
            return Err(Chip8Error::NoProgram);
        }

        for _ in 0..self.config.cycles_per_frame {
            self.cpu.step().map_err(|fault| Chip8Error::Fault {
                pc: self.cpu.pc,
                fault,
            })?;
        }

        for _ in 0..self.config.timer_ticks_per_frame {
            self.cpu.tick_timers();
        }

        if self.cpu.sound_active() {
            log(LogCategory::Timers, LogLevel::Trace, || {
                format!("Timers: buzzer on, sound timer {}", self.cpu.sound_timer)
            });
        }

        self.frames += 1;
        Ok(())
    }
}

impl System for Chip8System {
    type Error = Chip8Error;

    /// Rebuild the memory image (glyphs + mounted program) and zero everything else
    fn reset(&mut self) {
        self.cpu.reset();
        self.cpu.reseed(self.config.seed);
        if let Some(program) = &self.program {
            if let Err(e) = self.cpu.load_program(program) {
                log(LogCategory::Memory, LogLevel::Error, || {
                    format!("Memory: could not reload program on reset: {}", e)
                });
            }
        }
        self.frames = 0;
    }

    fn step_frame(&mut self) -> Result<Frame, Self::Error> {
        self.emulate_frame()?;
        Ok(self.cpu.framebuffer.to_frame())
    }

    fn mount_points(&self) -> Vec<MountPointInfo> {
        vec![MountPointInfo {
            id: PROGRAM_MOUNT.to_string(),
            name: "Program ROM".to_string(),
            extensions: vec!["ch8".to_string(), "c8".to_string(), "bin".to_string()],
            required: true,
        }]
    }

    fn mount(&mut self, mount_point_id: &str, data: &[u8]) -> Result<(), Self::Error> {
        if mount_point_id != PROGRAM_MOUNT {
            return Err(Chip8Error::InvalidMountPoint(mount_point_id.to_string()));
        }
        self.load_program(data)
    }

    fn unmount(&mut self, mount_point_id: &str) -> Result<(), Self::Error> {
        if mount_point_id != PROGRAM_MOUNT {
            return Err(Chip8Error::InvalidMountPoint(mount_point_id.to_string()));
        }
        self.program = None;
        self.cpu.memory.clear_program();
        Ok(())
    }

    fn is_mounted(&self, mount_point_id: &str) -> bool {
        mount_point_id == PROGRAM_MOUNT && self.program.is_some()
    }
}
