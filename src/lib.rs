pub use chip8::{Chip8, Sound, Step};
pub use config::{Config, SpriteEdge};
pub use constants::CLOCK_SPEED;
pub use error::{Chip8Error, Result};
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use pacer::Pacer;
pub use state::FrameBuffer;

mod chip8;
mod config;
pub mod constants;
mod error;
mod instruction;
mod opcode;
mod operations;
mod pacer;
mod state;
