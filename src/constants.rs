/// Width of the frame buffer in pixels
pub const DISPLAY_WIDTH: usize = 64;
/// Height of the frame buffer in pixels
pub const DISPLAY_HEIGHT: usize = 32;

/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 4096;
/// Address ROMs are loaded at and execution starts from
pub const PROGRAM_START: u16 = 0x200;
/// Largest ROM that fits between `PROGRAM_START` and the end of memory
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Nested subroutine calls the stack can hold
pub const STACK_SIZE: usize = 16;
/// Number of keys on the hexadecimal keypad
pub const KEY_COUNT: usize = 16;

/// Address the sprite sheet is installed at
pub const SPRITE_SHEET_START: u16 = 0x050;
/// Bytes per glyph in the sprite sheet
pub const SPRITE_HEIGHT: u16 = 5;

/// Default CPU clock speed in Hz
pub const CLOCK_SPEED: u32 = 500;
/// Rate the delay and sound timers count down at in Hz
pub const TIMER_SPEED: u32 = 60;

/// # Sprite Sheet
/// Glyphs for the hexadecimal digits 0..F, each 4 pixels wide and 5 rows tall.
///
/// Only the high nibble of each byte is used, e.g. 0:
/// ```text
/// 0xF0  ####
/// 0x90  #  #
/// 0x90  #  #
/// 0x90  #  #
/// 0xF0  ####
/// ```
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
