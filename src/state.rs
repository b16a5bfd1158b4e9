use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET, SPRITE_SHEET_START,
    STACK_SIZE,
};
use crate::error::{Chip8Error, Result};

/// The FrameBuffer is row-major: pixel (x, y) lives at `x + y * DISPLAY_WIDTH`
pub type FrameBuffer = [u8; DISPLAY_WIDTH * DISPLAY_HEIGHT];

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry, borrow and collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) the number of return addresses currently on the stack
///
/// Timers
/// - 2 8-bit timers (delay & sound)
/// - When the sound timer runs out it plays a beep
///
/// ## Memory
/// - 16 entry stack of return addresses
/// - 4096 bytes of addressable memory
///     - 0x050..0x0A0 holds the sprite sheet
///     - 0x200.. holds the loaded ROM
/// - 64x32 byte frame buffer
///     - stores the contents of the next frame to be drawn
///
/// ## Input
/// - Emulation spins on FX0A until some key is down; `register_needing_key`
///   records which register is waiting
#[derive(Copy, Clone)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_SIZE],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub register_needing_key: Option<u8>,
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let font_start = SPRITE_SHEET_START as usize;
        memory[font_start..font_start + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            memory,
            frame_buffer: [0; DISPLAY_WIDTH * DISPLAY_HEIGHT],
            // Present a blank first frame
            draw_flag: true,
            register_needing_key: None,
        }
    }

    /// Bounds-checked view of `len` bytes of memory starting at `address`
    pub fn memory_slice(&self, address: usize, len: usize) -> Result<&[u8]> {
        let end = Self::checked_end(address, len)?;
        Ok(&self.memory[address..end])
    }

    /// Bounds-checked mutable view of `len` bytes of memory starting at `address`
    pub fn memory_slice_mut(&mut self, address: usize, len: usize) -> Result<&mut [u8]> {
        let end = Self::checked_end(address, len)?;
        Ok(&mut self.memory[address..end])
    }

    fn checked_end(address: usize, len: usize) -> Result<usize> {
        let end = address + len;
        if end > MEMORY_SIZE {
            // Report the first byte that doesn't exist
            return Err(Chip8Error::OutOfBounds {
                address: address.max(MEMORY_SIZE),
            });
        }
        Ok(end)
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_reset() {
        let state = State::new();
        assert_eq!(state.pc, 0x200);
        assert_eq!(state.i, 0);
        assert_eq!(state.sp, 0);
        assert_eq!(state.v, [0; 16]);
        assert_eq!(state.delay_timer, 0);
        assert_eq!(state.sound_timer, 0);
        assert!(state.frame_buffer.iter().all(|&p| p == 0));
        assert!(state.draw_flag);
        assert_eq!(state.register_needing_key, None);
    }

    #[test]
    fn test_new_state_installs_sprite_sheet() {
        let state = State::new();
        assert_eq!(state.memory[0x050..0x0A0], SPRITE_SHEET[..]);
        assert!(state.memory[..0x050].iter().all(|&b| b == 0));
        assert!(state.memory[0x0A0..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_memory_slice_at_end_of_memory() {
        let state = State::new();
        assert_eq!(state.memory_slice(0xFFD, 3).unwrap().len(), 3);
    }

    #[test]
    fn test_memory_slice_past_end_of_memory() {
        let state = State::new();
        assert_eq!(
            state.memory_slice(0xFFE, 3),
            Err(Chip8Error::OutOfBounds { address: 0x1000 })
        );
        assert_eq!(
            state.memory_slice(0x1005, 1),
            Err(Chip8Error::OutOfBounds { address: 0x1005 })
        );
    }
}
