use anyhow::{Context, Result};
use clap::Parser;
use emu_chip8::{Chip8Config, Chip8System, Semantics, PROGRAM_MOUNT};
use emu_core::logging::{LogCategory, LogConfig, LogLevel};
use emu_core::System;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

mod terminal;

use terminal::TerminalHost;

#[derive(Parser)]
#[command(name = "emu_cli", about = "Run a CHIP-8 program in the terminal")]
struct Args {
    /// Path to the program image (.ch8)
    rom: PathBuf,

    /// Number of frames to run
    #[arg(long, default_value_t = 60)]
    frames: u32,

    /// JSON machine configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to this file and continue
    #[arg(long)]
    dump_config: Option<PathBuf>,

    /// Use corrected Bnnn/Fx65/8xy0 semantics
    #[arg(long, default_value_t = false)]
    corrected: bool,

    /// Seed for the random-number instruction
    #[arg(long)]
    seed: Option<u64>,

    /// Instructions per frame
    #[arg(long)]
    cycles: Option<u32>,

    /// Keypad keys held down for the whole run, e.g. "1,a,f"
    #[arg(long, value_delimiter = ',', value_parser = terminal::parse_key)]
    keys: Vec<u8>,

    /// Pace frames to the configured frame rate and redraw every frame
    #[arg(long, default_value_t = false)]
    realtime: bool,

    /// Suppress frame output
    #[arg(long, default_value_t = false)]
    quiet: bool,

    /// Core log level for every category (off, error, warn, info, debug, trace)
    #[arg(long, value_parser = parse_level)]
    log_level: Option<LogLevel>,

    /// Core log level for instruction tracing and faults
    #[arg(long, value_parser = parse_level)]
    log_cpu: Option<LogLevel>,

    /// Send core logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_level(s: &str) -> Result<LogLevel, String> {
    LogLevel::from_str(s).ok_or_else(|| format!("unknown log level '{}'", s))
}

fn configure_logging(args: &Args) -> Result<()> {
    let config = LogConfig::global();
    if let Some(level) = args.log_level {
        config.set_global_level(level);
    }
    if let Some(level) = args.log_cpu {
        config.set_level(LogCategory::CPU, level);
    }
    if let Some(path) = &args.log_file {
        config
            .set_log_file(path.clone())
            .with_context(|| format!("cannot open log file {}", path.display()))?;
    }
    Ok(())
}

fn machine_config(args: &Args) -> Result<Chip8Config> {
    let mut config = match &args.config {
        Some(path) => Chip8Config::load(path)
            .map_err(|e| anyhow::anyhow!(e))
            .with_context(|| format!("cannot load config {}", path.display()))?,
        None => Chip8Config::default(),
    };

    if args.corrected {
        config.semantics = Semantics::Corrected;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(cycles) = args.cycles {
        config.cycles_per_frame = cycles;
    }
    if config.frame_rate_hz == 0 {
        anyhow::bail!("frame_rate_hz must be greater than zero");
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    configure_logging(&args)?;
    let config = machine_config(&args)?;
    if let Some(path) = &args.dump_config {
        config
            .save(path)
            .map_err(|e| anyhow::anyhow!(e))
            .with_context(|| format!("cannot write config {}", path.display()))?;
    }

    let program = std::fs::read(&args.rom)
        .with_context(|| format!("cannot read {}", args.rom.display()))?;
    let frame_time = Duration::from_secs_f64(1.0 / config.frame_rate_hz as f64);

    let mut sys = Chip8System::with_config(config);
    sys.mount(PROGRAM_MOUNT, &program)
        .with_context(|| format!("cannot load {}", args.rom.display()))?;
    log::info!(
        "Loaded {} ({} bytes, {:?})",
        args.rom.display(),
        program.len(),
        sys.config().semantics
    );

    let live = args.realtime && !args.quiet;
    if live {
        // Clear once; frames then redraw from the top-left corner
        print!("\x1b[2J");
    }

    let mut host = TerminalHost::new(&args.keys, args.frames, live);
    loop {
        let started = Instant::now();
        let frame = sys.frames();
        if !sys
            .run_frame(&mut host)
            .with_context(|| format!("emulation stopped in frame {}", frame + 1))?
        {
            break;
        }

        if sys.cpu().sound_active() {
            log::debug!("Buzzer on (frame {})", sys.frames());
        }
        if args.realtime {
            thread::sleep(frame_time.saturating_sub(started.elapsed()));
        }
    }

    if !args.quiet && !live {
        print!("{}", terminal::render(sys.framebuffer()));
    }
    log::info!("Ran {} frames", sys.frames());

    Ok(())
}
