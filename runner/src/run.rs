use std::path::Path;
use std::time::Instant;

use anyhow::Context;

use chip8_core::{Chip8, Config, Pacer, Sound, Step};

use crate::keypad::Keypad;
use crate::terminal::Terminal;

/// Runs a ROM in the terminal, drawing frames to stdout and tapping keys read from stdin.
///
/// Stops after `max_cycles` CPU cycles if given, otherwise at the first fault.
pub fn run(rom: &Path, config: Config, max_cycles: Option<u64>) -> anyhow::Result<()> {
    let mut chip8 = Chip8::with_config(config)?;
    let mut terminal = Terminal::stdout();
    let mut keypad = Keypad::stdin();
    let mut pacer = Pacer::new(&config);

    // Load ROM
    let image = std::fs::read(rom).with_context(|| format!("unable to read {}", rom.display()))?;
    chip8.load_rom(&image)?;
    log::info!("loaded {} ({} bytes)", rom.display(), image.len());

    let tick_time = pacer.tick_interval();
    let mut cycles: u64 = 0;
    let mut awaiting_key = false;

    'emulation: loop {
        let tick_start = Instant::now();

        // Handle input
        keypad.update(&mut chip8)?;

        for _ in 0..pacer.steps_before_tick() {
            if max_cycles.map_or(false, |max| cycles >= max) {
                break 'emulation;
            }
            cycles += 1;
            match chip8.step()? {
                Step::AwaitingKey { register } if !awaiting_key => {
                    log::info!("waiting on a key for V{:X}, type a hex digit", register);
                    awaiting_key = true;
                }
                Step::AwaitingKey { .. } => {}
                Step::Executed(_) => awaiting_key = false,
            }
        }

        if chip8.advance_timers() == Sound::Beep {
            terminal.beep()?;
        }

        // If the draw flag is set, unset it and render the current frame
        if let Some(frame) = chip8.take_frame() {
            terminal.render(frame)?;
        }

        // Handle timing
        let elapsed = tick_start.elapsed();
        if tick_time > elapsed {
            std::thread::sleep(tick_time - elapsed);
        }
    }

    log::info!("stopped after {} cycles", cycles);
    Ok(())
}
