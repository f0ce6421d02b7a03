//! Instruction decoding
//!
//! Every instruction is one big-endian 16-bit word. The top nibble picks the
//! group; groups 0x0, 0x8, 0xE and 0xF look at the low byte or low
//! nibble to pick the operation. Field names follow the usual notation:
//!
//! ```text
//!   x   = bits 8-11 (register index)
//!   y   = bits 4-7  (register index)
//!   n   = bits 0-3
//!   kk  = bits 0-7
//!   nnn = bits 0-11 (address)
//! ```
//!
//! Decoding is pure. A word that names no operation decodes to `None`; the
//! engine treats that as a one-cycle no-op.

use std::fmt;

/// A decoded instruction with its operand fields already extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0 - clear the framebuffer
    ClearScreen,
    /// 00EE - return from subroutine
    Return,
    /// 1nnn - jump to nnn
    Jump { nnn: u16 },
    /// 2nnn - call subroutine at nnn
    Call { nnn: u16 },
    /// 3xkk - skip next if Vx == kk
    SkipEqImm { x: usize, kk: u8 },
    /// 4xkk - skip next if Vx != kk
    SkipNeImm { x: usize, kk: u8 },
    /// 5xy0 - skip next if Vx == Vy
    SkipEqReg { x: usize, y: usize },
    /// 6xkk - Vx = kk
    LoadImm { x: usize, kk: u8 },
    /// 7xkk - Vx += kk, no flag
    AddImm { x: usize, kk: u8 },
    /// 8xy0 - Vx = Vy
    Copy { x: usize, y: usize },
    /// 8xy1 - Vx |= Vy
    Or { x: usize, y: usize },
    /// 8xy2 - Vx &= Vy
    And { x: usize, y: usize },
    /// 8xy3 - Vx ^= Vy
    Xor { x: usize, y: usize },
    /// 8xy4 - Vx += Vy, VF = carry
    AddCarry { x: usize, y: usize },
    /// 8xy5 - Vx -= Vy, VF = Vy < Vx
    SubBorrow { x: usize, y: usize },
    /// 8xy6 - Vx >>= 1, VF = old low bit
    ShiftRight { x: usize },
    /// 8xy7 - Vx = Vy - Vx, VF = Vy > Vx
    SubReverse { x: usize, y: usize },
    /// 8xyE - Vx <<= 1, VF = old high bit
    ShiftLeft { x: usize },
    /// 9xy0 - skip next if Vx != Vy
    SkipNeReg { x: usize, y: usize },
    /// Annn - I = nnn
    LoadIndex { nnn: u16 },
    /// Bnnn - V0 + nnn
    JumpOffset { nnn: u16 },
    /// Cxkk - Vx = random & kk
    Random { x: usize, kk: u8 },
    /// Dxyn - draw n-row sprite from I at (Vx, Vy)
    Draw { x: usize, y: usize, n: u8 },
    /// Ex9E - skip next if key Vx is down
    SkipKeyDown { x: usize },
    /// ExA1 - skip next if key Vx is up
    SkipKeyUp { x: usize },
    /// Fx07 - Vx = delay timer
    ReadDelay { x: usize },
    /// Fx0A - wait until a key is down, Vx = key
    WaitKey { x: usize },
    /// Fx15 - delay timer = Vx
    SetDelay { x: usize },
    /// Fx18 - sound timer = Vx
    SetSound { x: usize },
    /// Fx1E - I += Vx
    AddIndex { x: usize },
    /// Fx29 - I = glyph address of digit Vx
    GlyphAddress { x: usize },
    /// Fx33 - BCD of Vx at I, I+1, I+2
    StoreBcd { x: usize },
    /// Fx55 - store V0..=Vx at I
    StoreRegisters { x: usize },
    /// Fx65 - load V0..=Vx from I
    LoadRegisters { x: usize },
}

impl Instruction {
    pub fn decode(word: u16) -> Option<Self> {
        let group = (word >> 12) as u8;
        let x = ((word >> 8) & 0xF) as usize;
        let y = ((word >> 4) & 0xF) as usize;
        let n = (word & 0xF) as u8;
        let kk = (word & 0xFF) as u8;
        let nnn = word & 0x0FFF;

        let instruction = match group {
            // Only the low byte selects: 05E0 clears the screen like 00E0
            0x0 => match kk {
                0xE0 => Self::ClearScreen,
                0xEE => Self::Return,
                _ => return None,
            },
            0x1 => Self::Jump { nnn },
            0x2 => Self::Call { nnn },
            0x3 => Self::SkipEqImm { x, kk },
            0x4 => Self::SkipNeImm { x, kk },
            0x5 => Self::SkipEqReg { x, y },
            0x6 => Self::LoadImm { x, kk },
            0x7 => Self::AddImm { x, kk },
            0x8 => match n {
                0x0 => Self::Copy { x, y },
                0x1 => Self::Or { x, y },
                0x2 => Self::And { x, y },
                0x3 => Self::Xor { x, y },
                0x4 => Self::AddCarry { x, y },
                0x5 => Self::SubBorrow { x, y },
                0x6 => Self::ShiftRight { x },
                0x7 => Self::SubReverse { x, y },
                0xE => Self::ShiftLeft { x },
                _ => return None,
            },
            0x9 => Self::SkipNeReg { x, y },
            0xA => Self::LoadIndex { nnn },
            0xB => Self::JumpOffset { nnn },
            0xC => Self::Random { x, kk },
            0xD => Self::Draw { x, y, n },
            0xE => match kk {
                0x9E => Self::SkipKeyDown { x },
                0xA1 => Self::SkipKeyUp { x },
                _ => return None,
            },
            0xF => match kk {
                0x07 => Self::ReadDelay { x },
                0x0A => Self::WaitKey { x },
                0x15 => Self::SetDelay { x },
                0x18 => Self::SetSound { x },
                0x1E => Self::AddIndex { x },
                0x29 => Self::GlyphAddress { x },
                0x33 => Self::StoreBcd { x },
                0x55 => Self::StoreRegisters { x },
                0x65 => Self::LoadRegisters { x },
                _ => return None,
            },
            _ => return None,
        };

        Some(instruction)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ClearScreen => write!(f, "CLS"),
            Self::Return => write!(f, "RET"),
            Self::Jump { nnn } => write!(f, "JP {:03X}", nnn),
            Self::Call { nnn } => write!(f, "CALL {:03X}", nnn),
            Self::SkipEqImm { x, kk } => write!(f, "SE V{:X}, {:02X}", x, kk),
            Self::SkipNeImm { x, kk } => write!(f, "SNE V{:X}, {:02X}", x, kk),
            Self::SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            Self::LoadImm { x, kk } => write!(f, "LD V{:X}, {:02X}", x, kk),
            Self::AddImm { x, kk } => write!(f, "ADD V{:X}, {:02X}", x, kk),
            Self::Copy { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Self::Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            Self::And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Self::Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            Self::AddCarry { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Self::SubBorrow { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Self::ShiftRight { x } => write!(f, "SHR V{:X}", x),
            Self::SubReverse { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Self::ShiftLeft { x } => write!(f, "SHL V{:X}", x),
            Self::SkipNeReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            Self::LoadIndex { nnn } => write!(f, "LD I, {:03X}", nnn),
            Self::JumpOffset { nnn } => write!(f, "JP V0, {:03X}", nnn),
            Self::Random { x, kk } => write!(f, "RND V{:X}, {:02X}", x, kk),
            Self::Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {:X}", x, y, n),
            Self::SkipKeyDown { x } => write!(f, "SKP V{:X}", x),
            Self::SkipKeyUp { x } => write!(f, "SKNP V{:X}", x),
            Self::ReadDelay { x } => write!(f, "LD V{:X}, DT", x),
            Self::WaitKey { x } => write!(f, "LD V{:X}, K", x),
            Self::SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            Self::SetSound { x } => write!(f, "LD ST, V{:X}", x),
            Self::AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            Self::GlyphAddress { x } => write!(f, "LD F, V{:X}", x),
            Self::StoreBcd { x } => write!(f, "LD B, V{:X}", x),
            Self::StoreRegisters { x } => write!(f, "LD [I], V{:X}", x),
            Self::LoadRegisters { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}
