use std::time::Duration;

use crate::config::Config;

/// # Pacer
/// Splits a CPU rate into whole cycles per timer tick.
///
/// The Chip8 has no clock, so its owner has to interleave `step` and `advance_timers`.
/// 500Hz doesn't divide evenly into 60Hz, so the remainder is carried from tick to tick:
/// any `timer_hz` consecutive calls to `steps_before_tick` add up to exactly `cpu_hz`.
#[derive(Debug, Clone)]
pub struct Pacer {
    cpu_hz: u64,
    timer_hz: u64,
    remainder: u64,
}

impl Pacer {
    pub fn new(config: &Config) -> Self {
        Pacer {
            cpu_hz: u64::from(config.cpu_hz),
            timer_hz: u64::from(config.timer_hz.max(1)),
            remainder: 0,
        }
    }

    /// How many CPU cycles to run before the next timer tick
    pub fn steps_before_tick(&mut self) -> u32 {
        // remainder < timer_hz, so the quotient never exceeds cpu_hz
        let total = self.remainder + self.cpu_hz;
        self.remainder = total % self.timer_hz;
        (total / self.timer_hz) as u32
    }

    /// Wall clock time between timer ticks
    pub fn tick_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.timer_hz)
    }
}
