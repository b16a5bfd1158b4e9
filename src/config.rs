use crate::constants::{CLOCK_SPEED, TIMER_SPEED};
use crate::error::{Chip8Error, Result};

/// What happens to sprite pixels that land past the right or bottom edge of the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteEdge {
    /// Pixels outside the display are dropped and never collide
    Clip,
    /// Pixels outside the display reappear on the opposite edge
    Wrap,
}

impl Default for SpriteEdge {
    fn default() -> Self {
        SpriteEdge::Clip
    }
}

/// # Config
/// Tunables for an emulation session.
///
/// - `sprite_edge` is read by the interpreter when drawing
/// - `cpu_hz` and `timer_hz` are only read by a host's `Pacer`; the interpreter has no clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub sprite_edge: SpriteEdge,
    pub cpu_hz: u32,
    pub timer_hz: u32,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.cpu_hz == 0 {
            return Err(Chip8Error::InvalidConfig("cpu_hz must be non-zero"));
        }
        if self.timer_hz == 0 {
            return Err(Chip8Error::InvalidConfig("timer_hz must be non-zero"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sprite_edge: SpriteEdge::default(),
            cpu_hz: CLOCK_SPEED,
            timer_hz: TIMER_SPEED,
        }
    }
}
