//! Monochrome 64x32 framebuffer
//!
//! Each pixel is a full 32-bit word that is either `PIXEL_OFF` (all zero) or
//! `PIXEL_ON` (all one-bits), so hosts can hand the buffer straight to an
//! ARGB texture. Sprites are XOR-drawn.
//!
//! Addressing is linear (`y * 64 + x`). The sprite start position wraps once;
//! individual pixels do not. A pixel that runs past the right edge lands on
//! the next row, and a pixel whose offset falls past the end of the buffer is
//! clipped.

use emu_core::logging::{log, LogCategory, LogLevel};
use emu_core::types::Frame;

pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;
pub const PIXEL_COUNT: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

pub const PIXEL_OFF: u32 = 0x0000_0000;
pub const PIXEL_ON: u32 = 0xFFFF_FFFF;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pixels: Box<[u32; PIXEL_COUNT]>,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framebuffer {
    pub fn new() -> Self {
        Self {
            pixels: Box::new([PIXEL_OFF; PIXEL_COUNT]),
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(PIXEL_OFF);
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels[..]
    }

    /// Pixel at screen coordinates, `None` off-screen
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < SCREEN_WIDTH && y < SCREEN_HEIGHT {
            Some(self.pixels[y * SCREEN_WIDTH + x])
        } else {
            None
        }
    }

    pub fn is_on(&self, x: usize, y: usize) -> bool {
        self.pixel(x, y).is_some_and(|p| p != PIXEL_OFF)
    }

    /// Overwrite one pixel by linear offset; offsets past the end are ignored
    pub fn set_linear(&mut self, offset: usize, value: u32) {
        if let Some(p) = self.pixels.get_mut(offset) {
            *p = value;
        }
    }

    /// XOR-draw `rows` (one byte per row, MSB leftmost) at `(x, y)`.
    ///
    /// Returns true when any lit pixel was switched off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let origin_x = x as usize % SCREEN_WIDTH;
        let origin_y = y as usize % SCREEN_HEIGHT;
        let mut collision = false;

        for (row, &bits) in rows.iter().enumerate() {
            for col in 0..8 {
                if bits & (0x80 >> col) == 0 {
                    continue;
                }

                let offset = (origin_y + row) * SCREEN_WIDTH + origin_x + col;
                let Some(pixel) = self.pixels.get_mut(offset) else {
                    log(LogCategory::Display, LogLevel::Trace, || {
                        format!("Display: clipped sprite pixel at offset {}", offset)
                    });
                    continue;
                };

                if *pixel == PIXEL_ON {
                    collision = true;
                }
                *pixel ^= PIXEL_ON;
            }
        }

        if collision {
            log(LogCategory::Display, LogLevel::Trace, || {
                format!("Display: collision drawing at ({}, {})", origin_x, origin_y)
            });
        }
        collision
    }

    /// Owned copy for hosts that render on their own schedule
    pub fn to_frame(&self) -> Frame {
        Frame {
            width: SCREEN_WIDTH as u32,
            height: SCREEN_HEIGHT as u32,
            pixels: self.pixels.to_vec(),
        }
    }
}
