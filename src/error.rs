use thiserror::Error;

/// Faults reported by the interpreter.
///
/// Every fault is local to the call that reports it and leaves the interpreter's
/// state as it was before that call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Chip8Error {
    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("a ROM is already loaded; reset before loading another")]
    AlreadyLoaded,

    #[error("unknown opcode {opcode:#06X} at {address:#05X}")]
    UnknownOpcode { opcode: u16, address: u16 },

    #[error("memory access out of bounds at address {address:#06X}")]
    OutOfBounds { address: usize },

    #[error("stack overflow: call at {address:#05X} exceeds 16 nested subroutines")]
    StackOverflow { address: u16 },

    #[error("stack underflow: return at {address:#05X} with an empty call stack")]
    StackUnderflow { address: u16 },

    #[error("key {key:#04X} is outside the keypad range 0x0..=0xF")]
    InvalidKey { key: u8 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = std::result::Result<T, Chip8Error>;
