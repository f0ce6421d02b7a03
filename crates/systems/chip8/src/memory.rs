//! CHIP-8 memory image
//!
//! Layout of the 4K address space:
//!   0x000-0x04F  reserved (interpreter area, left zeroed)
//!   0x050-0x09F  hexadecimal glyph table (16 glyphs x 5 bytes)
//!   0x0A0-0x1FF  reserved
//!   0x200-0xFFF  program image
//!
//! Programs are opaque byte sequences: nothing is validated beyond size.
//! Every accessor is bounds-checked and reports a [`Fault`] instead of
//! touching memory outside the array.

use emu_core::logging::{log, LogCategory, LogLevel};
use thiserror::Error;

use crate::cpu::Fault;

/// Total addressable memory
pub const MEMORY_SIZE: usize = 4096;

/// Where programs are loaded (and where execution starts)
pub const PROGRAM_START: u16 = 0x200;

/// Where the glyph table lives
pub const GLYPH_START: u16 = 0x050;

/// Bytes per glyph
pub const GLYPH_SIZE: u16 = 5;

/// Largest program that fits above `PROGRAM_START`
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Hexadecimal digits 0-F, one 8x5 bitmap per digit (only the high nibble is lit)
pub const GLYPHS: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("Empty program")]
    Empty,
    #[error("Program too large: {len} bytes (capacity {capacity})")]
    TooLarge { len: usize, capacity: usize },
}

/// The 4K byte array shared by program, glyphs and data
#[derive(Debug, Clone)]
pub struct Memory {
    bytes: Box<[u8; MEMORY_SIZE]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Zeroed memory, no glyphs and no program
    pub fn new() -> Self {
        Self {
            bytes: Box::new([0; MEMORY_SIZE]),
        }
    }

    /// Zero the whole address space
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Write the glyph table at `GLYPH_START`
    pub fn load_glyphs(&mut self) {
        let start = GLYPH_START as usize;
        self.bytes[start..start + GLYPHS.len()].copy_from_slice(&GLYPHS);
    }

    /// Copy a program image to `PROGRAM_START`.
    ///
    /// Memory is left untouched when the image is rejected.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), LoadError> {
        if program.is_empty() {
            return Err(LoadError::Empty);
        }
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(LoadError::TooLarge {
                len: program.len(),
                capacity: MAX_PROGRAM_SIZE,
            });
        }

        let start = PROGRAM_START as usize;
        self.bytes[start..start + program.len()].copy_from_slice(program);

        log(LogCategory::Memory, LogLevel::Info, || {
            format!(
                "Memory: loaded {} byte program at {:03X}",
                program.len(),
                PROGRAM_START
            )
        });
        Ok(())
    }

    /// Zero the program region
    pub fn clear_program(&mut self) {
        self.bytes[PROGRAM_START as usize..].fill(0);
    }

    pub fn read(&self, addr: usize) -> Result<u8, Fault> {
        self.bytes
            .get(addr)
            .copied()
            .ok_or(Fault::MemoryOutOfRange { addr })
    }

    pub fn write(&mut self, addr: usize, val: u8) -> Result<(), Fault> {
        let cell = self
            .bytes
            .get_mut(addr)
            .ok_or(Fault::MemoryOutOfRange { addr })?;
        *cell = val;
        Ok(())
    }

    /// Big-endian instruction word at `addr`
    pub fn read_word(&self, addr: usize) -> Result<u16, Fault> {
        let word = self.slice(addr, 2)?;
        Ok(u16::from_be_bytes([word[0], word[1]]))
    }

    /// Read-only view of `len` bytes starting at `addr`
    pub fn slice(&self, addr: usize, len: usize) -> Result<&[u8], Fault> {
        Self::check_range(addr, len)?;
        Ok(&self.bytes[addr..addr + len])
    }

    /// Copy `data` to `addr`; nothing is written if any byte would fall outside memory
    pub fn write_slice(&mut self, addr: usize, data: &[u8]) -> Result<(), Fault> {
        Self::check_range(addr, data.len())?;
        self.bytes[addr..addr + data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Row `row` of the built-in glyph for `digit`, straight from the constant table
    pub fn glyph(digit: u8, row: u8) -> u8 {
        GLYPHS[(digit as usize & 0xF) * GLYPH_SIZE as usize + (row as usize % GLYPH_SIZE as usize)]
    }

    /// Report the first address of `addr..addr+len` that lies outside memory
    fn check_range(addr: usize, len: usize) -> Result<(), Fault> {
        if len == 0 {
            return Ok(());
        }
        let last = addr.saturating_add(len - 1);
        if addr >= MEMORY_SIZE {
            Err(Fault::MemoryOutOfRange { addr })
        } else if last >= MEMORY_SIZE {
            Err(Fault::MemoryOutOfRange { addr: MEMORY_SIZE })
        } else {
            Ok(())
        }
    }
}
