//! CHIP-8 execution engine
//!
//! Owns the whole machine state and executes one instruction per [`Chip8Cpu::step`].
//! The program counter is advanced past the fetched word before execution,
//! so jumps, calls and skips simply overwrite or bump it.
//!
//! Timers are never decremented here; the host calls [`Chip8Cpu::tick_timers`]
//! on its own cadence.
//!
//! Out-of-range accesses (stack over/underflow, memory past 0xFFF, key index
//! above 0xF) abort the step with a [`Fault`]. A faulting step changes
//! nothing: handlers check every range before writing, and the program
//! counter is rolled back to the faulting instruction.

use emu_core::logging::{log, LogCategory, LogLevel};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::config::Semantics;
use crate::display::Framebuffer;
use crate::instruction::Instruction;
use crate::keypad::Keypad;
use crate::memory::{LoadError, Memory, GLYPH_SIZE, GLYPH_START, PROGRAM_START};

pub const REGISTER_COUNT: usize = 16;
pub const STACK_DEPTH: usize = 16;

/// VF: carry, borrow, shifted-out bit and collision flag
pub const FLAG: usize = 0xF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("Stack overflow: more than {STACK_DEPTH} nested calls")]
    StackOverflow,
    #[error("Stack underflow: return with empty stack")]
    StackUnderflow,
    #[error("Memory access out of range at {addr:#06X}")]
    MemoryOutOfRange { addr: usize },
    #[error("Key index out of range: {key:#04X}")]
    KeyOutOfRange { key: u8 },
}

/// Complete CHIP-8 machine state
#[derive(Debug, Clone)]
pub struct Chip8Cpu {
    pub memory: Memory,
    /// V0-VF
    pub registers: [u8; REGISTER_COUNT],
    /// Return addresses
    pub stack: [u16; STACK_DEPTH],
    /// Next free stack slot
    pub sp: u8,
    pub pc: u16,
    /// I
    pub index: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
    /// Most recently fetched word
    pub instruction: u16,
    pub framebuffer: Framebuffer,
    pub keypad: Keypad,
    pub semantics: Semantics,
    rng: StdRng,
}

impl Default for Chip8Cpu {
    fn default() -> Self {
        Self::new(Semantics::default(), None)
    }
}

impl Chip8Cpu {
    /// Power-on state: glyphs loaded, no program, pc at 0x200
    pub fn new(semantics: Semantics, seed: Option<u64>) -> Self {
        let mut memory = Memory::new();
        memory.load_glyphs();

        let mut cpu = Self {
            memory,
            registers: [0; REGISTER_COUNT],
            stack: [0; STACK_DEPTH],
            sp: 0,
            pc: PROGRAM_START,
            index: 0,
            delay_timer: 0,
            sound_timer: 0,
            instruction: 0,
            framebuffer: Framebuffer::new(),
            keypad: Keypad::new(),
            semantics,
            rng: StdRng::seed_from_u64(0),
        };
        cpu.reseed(seed);
        cpu
    }

    /// Back to power-on state. The program image is wiped with the rest of memory.
    pub fn reset(&mut self) {
        self.memory.clear();
        self.memory.load_glyphs();
        self.registers = [0; REGISTER_COUNT];
        self.stack = [0; STACK_DEPTH];
        self.sp = 0;
        self.pc = PROGRAM_START;
        self.index = 0;
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.instruction = 0;
        self.framebuffer.clear();
        self.keypad.release_all();
    }

    /// Restart the Cxkk random sequence
    pub fn reseed(&mut self, seed: Option<u64>) {
        self.rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
    }

    pub fn load_program(&mut self, program: &[u8]) -> Result<(), LoadError> {
        self.memory.load_program(program)
    }

    /// Decrement both timers by one, stopping at zero
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    /// The buzzer sounds while the sound timer is non-zero
    pub fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    /// Fetch, decode and execute one instruction
    pub fn step(&mut self) -> Result<(), Fault> {
        let address = self.pc;
        let word = self.memory.read_word(address as usize).inspect_err(|fault| {
            log(LogCategory::CPU, LogLevel::Warn, || {
                format!("CPU: fetch fault at PC={:04X}: {}", address, fault)
            });
        })?;

        let previous = self.instruction;
        self.instruction = word;
        self.pc = address.wrapping_add(2);

        let Some(instruction) = Instruction::decode(word) else {
            log(LogCategory::Stubs, LogLevel::Debug, || {
                format!("CPU: undefined opcode {:04X} at PC={:04X}, skipped", word, address)
            });
            return Ok(());
        };

        log(LogCategory::CPU, LogLevel::Trace, || {
            format!("CPU: {:04X}  {:04X}  {}", address, word, instruction)
        });

        self.execute(instruction).inspect_err(|fault| {
            self.pc = address;
            self.instruction = previous;
            log(LogCategory::CPU, LogLevel::Warn, || {
                format!("CPU: {} at PC={:04X} ({:04X})", fault, address, word)
            });
        })
    }

    fn execute(&mut self, instruction: Instruction) -> Result<(), Fault> {
        let v = &mut self.registers;

        match instruction {
            Instruction::ClearScreen => self.framebuffer.clear(),
            Instruction::Return => {
                if self.sp == 0 {
                    return Err(Fault::StackUnderflow);
                }
                self.sp -= 1;
                self.pc = self.stack[self.sp as usize];
            }
            Instruction::Jump { nnn } => self.pc = nnn,
            Instruction::Call { nnn } => {
                let slot = self.sp as usize;
                if slot >= STACK_DEPTH {
                    return Err(Fault::StackOverflow);
                }
                self.stack[slot] = self.pc;
                self.sp += 1;
                self.pc = nnn;
            }
            Instruction::SkipEqImm { x, kk } => {
                if v[x] == kk {
                    self.skip();
                }
            }
            Instruction::SkipNeImm { x, kk } => {
                if v[x] != kk {
                    self.skip();
                }
            }
            Instruction::SkipEqReg { x, y } => {
                if v[x] == v[y] {
                    self.skip();
                }
            }
            Instruction::LoadImm { x, kk } => v[x] = kk,
            Instruction::AddImm { x, kk } => v[x] = v[x].wrapping_add(kk),
            Instruction::Copy { x, y } => match self.semantics {
                Semantics::Corrected => v[x] = v[y],
                Semantics::ReferenceExact => {
                    log(LogCategory::Stubs, LogLevel::Debug, || {
                        format!("CPU: 8{:X}{:X}0 ignored", x, y)
                    });
                }
            },
            Instruction::Or { x, y } => v[x] |= v[y],
            Instruction::And { x, y } => v[x] &= v[y],
            Instruction::Xor { x, y } => v[x] ^= v[y],
            // Flag is written before the result, so with x == F the result wins
            Instruction::AddCarry { x, y } => {
                let (sum, carry) = v[x].overflowing_add(v[y]);
                v[FLAG] = carry as u8;
                v[x] = sum;
            }
            Instruction::SubBorrow { x, y } => {
                let (vx, vy) = (v[x], v[y]);
                v[FLAG] = (vy < vx) as u8;
                v[x] = vx.wrapping_sub(vy);
            }
            Instruction::ShiftRight { x } => {
                let vx = v[x];
                v[FLAG] = vx & 0x01;
                v[x] = vx >> 1;
            }
            Instruction::SubReverse { x, y } => {
                let (vx, vy) = (v[x], v[y]);
                v[FLAG] = (vy > vx) as u8;
                v[x] = vy.wrapping_sub(vx);
            }
            Instruction::ShiftLeft { x } => {
                let vx = v[x];
                v[FLAG] = vx >> 7;
                v[x] = vx << 1;
            }
            Instruction::SkipNeReg { x, y } => {
                if v[x] != v[y] {
                    self.skip();
                }
            }
            Instruction::LoadIndex { nnn } => self.index = nnn,
            Instruction::JumpOffset { nnn } => {
                let target = v[0] as u16 + nnn;
                match self.semantics {
                    Semantics::ReferenceExact => self.index = target,
                    Semantics::Corrected => self.pc = target,
                }
            }
            Instruction::Random { x, kk } => v[x] = self.rng.gen::<u8>() & kk,
            Instruction::Draw { x, y, n } => {
                let (vx, vy) = (v[x], v[y]);
                let rows = self.memory.slice(self.index as usize, n as usize)?;
                let collision = self.framebuffer.draw_sprite(vx, vy, rows);
                self.registers[FLAG] = collision as u8;
            }
            Instruction::SkipKeyDown { x } => {
                if self.keypad.is_down(v[x])? {
                    self.skip();
                }
            }
            Instruction::SkipKeyUp { x } => {
                if !self.keypad.is_down(v[x])? {
                    self.skip();
                }
            }
            Instruction::ReadDelay { x } => v[x] = self.delay_timer,
            Instruction::WaitKey { x } => match self.keypad.first_down() {
                Some(key) => v[x] = key,
                None => {
                    // Re-fetch this instruction next step until a key is down
                    self.pc = self.pc.wrapping_sub(2);
                    log(LogCategory::Input, LogLevel::Trace, || {
                        format!("CPU: waiting for key at PC={:04X}", self.pc)
                    });
                }
            },
            Instruction::SetDelay { x } => self.delay_timer = v[x],
            Instruction::SetSound { x } => self.sound_timer = v[x],
            Instruction::AddIndex { x } => self.index = self.index.wrapping_add(v[x] as u16),
            Instruction::GlyphAddress { x } => {
                self.index = GLYPH_START + v[x] as u16 * GLYPH_SIZE;
            }
            Instruction::StoreBcd { x } => {
                let value = v[x];
                let digits = [value / 100, (value / 10) % 10, value % 10];
                self.memory.write_slice(self.index as usize, &digits)?;
            }
            Instruction::StoreRegisters { x } => {
                self.memory
                    .write_slice(self.index as usize, &self.registers[..=x])?;
            }
            Instruction::LoadRegisters { x } => match self.semantics {
                Semantics::ReferenceExact => {
                    self.memory
                        .write_slice(self.index as usize, &self.registers[..=x])?;
                }
                Semantics::Corrected => {
                    let src = self.memory.slice(self.index as usize, x + 1)?;
                    self.registers[..=x].copy_from_slice(src);
                }
            },
        }

        Ok(())
    }

    fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }
}
