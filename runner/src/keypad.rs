use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use chip8_core::{Chip8, Result};

/// # Keypad
/// Taps Chip-8 keys from lines of text.
///
/// Every hex digit on a line presses that key for one timer tick; the next call to
/// `update` releases it. This is enough for ROMs that wait on `FX0A` or poll with `EX9E`.
pub struct Keypad {
    lines: Receiver<String>,
    held: Vec<u8>,
}

impl Keypad {
    pub fn new(lines: Receiver<String>) -> Self {
        Keypad {
            lines,
            held: Vec::new(),
        }
    }

    /// Reads lines from stdin on a background thread
    pub fn stdin() -> Self {
        let (sender, lines) = mpsc::channel();
        thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if sender.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        log::warn!("stopped reading keys: {}", e);
                        break;
                    }
                }
            }
        });
        Keypad::new(lines)
    }

    /// Releases the keys tapped last tick and presses any that arrived since.
    ///
    /// # Arguments
    /// * `chip8` the interpreter receiving the key events
    pub fn update(&mut self, chip8: &mut Chip8) -> Result<()> {
        for key in self.held.drain(..) {
            chip8.key_release(key)?;
        }
        for line in self.lines.try_iter() {
            self.held.extend(parse_keys(&line));
        }
        for &key in &self.held {
            log::debug!("key {:X} down", key);
            chip8.key_press(key)?;
        }
        Ok(())
    }
}

/// Hex digits in `line` as key indices; anything else is skipped
fn parse_keys(line: &str) -> Vec<u8> {
    line.chars()
        .filter(|c| !c.is_whitespace())
        .filter_map(|c| match c.to_digit(16) {
            Some(key) => Some(key as u8),
            None => {
                log::warn!("ignoring {:?}, keys are 0-9 and a-f", c);
                None
            }
        })
        .collect()
}
