use emu_chip8::{Chip8System, PROGRAM_MOUNT};
use emu_core::System;

/// Draws the glyphs "C" and "8" side by side, then spins
const PROGRAM: [u8; 20] = [
    0x60, 0x0A, // LD V0, 0A
    0x61, 0x0C, // LD V1, 0C
    0x62, 0x0C, // LD V2, 0C
    0xF2, 0x29, // LD F, V2
    0xD0, 0x15, // DRW V0, V1, 5
    0x70, 0x08, // ADD V0, 08
    0x62, 0x08, // LD V2, 08
    0xF2, 0x29, // LD F, V2
    0xD0, 0x15, // DRW V0, V1, 5
    0x12, 0x12, // JP 212
];

fn main() -> anyhow::Result<()> {
    let mut sys = Chip8System::default();
    sys.mount(PROGRAM_MOUNT, &PROGRAM)?;

    let frame = sys.step_frame()?;
    println!("Headless CHIP-8 frame: {}x{}", frame.width, frame.height);
    for row in frame.rows() {
        let line: String = row.iter().map(|&p| if p != 0 { '#' } else { '.' }).collect();
        println!("{}", line);
    }
    Ok(())
}
