use crate::config::Config;
use crate::constants::{KEY_COUNT, MAX_ROM_SIZE, PROGRAM_START};
use crate::error::{Chip8Error, Result};
use crate::instruction::Instruction;
use crate::opcode::Opcode;
use crate::state::{FrameBuffer, State};

/// What a single CPU cycle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The instruction ran to completion
    Executed(Instruction),
    /// Fx0A found no key down; the same instruction runs again next cycle
    AwaitingKey { register: u8 },
}

/// What the sound timer asks of the audio device after a timer tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Sound {
    Silent,
    /// The sound timer just ran out
    Beep,
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `pressed_keys` with public interfaces for manipulating them
///  - the session's `config`
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing the CPU
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
///
/// The CPU and timers have no clock of their own; whoever owns the Chip8 calls
/// `step` at the instruction rate and `advance_timers` at 60Hz.
pub struct Chip8 {
    state: State,
    pressed_keys: [u8; KEY_COUNT],
    config: Config,
    rom_loaded: bool,
}

impl Chip8 {
    pub fn new() -> Self {
        Chip8 {
            state: State::new(),
            pressed_keys: [0; KEY_COUNT],
            config: Config::default(),
            rom_loaded: false,
        }
    }

    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Chip8 {
            config,
            ..Self::new()
        })
    }

    /// Returns the Chip8 to its power-on state, releasing all keys.
    /// The config is kept and a new rom may be loaded afterwards.
    pub fn reset(&mut self) {
        log::debug!("resetting interpreter");
        self.state = State::new();
        self.pressed_keys = [0; KEY_COUNT];
        self.rom_loaded = false;
    }

    /// Load a rom into memory at 0x200
    ///
    /// Nothing is written unless the whole rom fits. Registers and the pc are left alone,
    /// and only one rom may be loaded between resets.
    ///
    /// # Arguments
    /// * `rom` raw Chip-8 machine code
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        if self.rom_loaded {
            return Err(Chip8Error::AlreadyLoaded);
        }
        if rom.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: rom.len(),
                max_size: MAX_ROM_SIZE,
            });
        }
        self.state
            .memory_slice_mut(PROGRAM_START as usize, rom.len())?
            .copy_from_slice(rom);
        self.rom_loaded = true;
        log::debug!("loaded {} byte rom", rom.len());
        Ok(())
    }

    /// Returns the FrameBuffer and clears the draw flag if the display should be redrawn
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    /// The current FrameBuffer, whether or not it has changed
    pub fn frame(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    pub fn needs_redraw(&self) -> bool {
        self.state.draw_flag
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was pressed
    pub fn key_press(&mut self, key: u8) -> Result<()> {
        self.set_key(key, 0x1)
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) -> Result<()> {
        self.set_key(key, 0x0)
    }

    pub fn is_key_pressed(&self, key: u8) -> bool {
        self.pressed_keys
            .get(key as usize)
            .map_or(false, |&status| status != 0x0)
    }

    fn set_key(&mut self, key: u8, status: u8) -> Result<()> {
        let slot = self
            .pressed_keys
            .get_mut(key as usize)
            .ok_or(Chip8Error::InvalidKey { key })?;
        *slot = status;
        Ok(())
    }

    /// Advances the CPU by a single cycle
    /// - gets, decodes and executes the next opcode
    /// - reports `AwaitingKey` while Fx0A has no key to read
    ///
    /// On error nothing about the Chip8 has changed.
    pub fn step(&mut self) -> Result<Step> {
        match self.next_state() {
            Ok((instruction, next)) => {
                self.state = next;
                Ok(match self.state.register_needing_key {
                    Some(register) => Step::AwaitingKey { register },
                    None => Step::Executed(instruction),
                })
            }
            Err(e) => {
                log::warn!("cycle at {:03X} faulted: {}", self.state.pc, e);
                Err(e)
            }
        }
    }

    /// Fetches, decodes and executes the opcode at the pc without committing the result
    fn next_state(&self) -> Result<(Instruction, State)> {
        let op = self.get_op()?;
        let instruction = Instruction::decode(op).ok_or(Chip8Error::UnknownOpcode {
            opcode: op.0,
            address: self.state.pc,
        })?;
        log::trace!(
            "{} v{:02X?} i{:04X} pc{:04X}",
            op,
            self.state.v,
            self.state.i,
            self.state.pc
        );
        let next = instruction.execute(&self.state, self.pressed_keys, &self.config)?;
        Ok((instruction, next))
    }

    /// Moves the pc past the current instruction without executing it.
    /// For hosts that choose to carry on after `step` reports a fault.
    pub fn skip_instruction(&mut self) {
        self.state.pc = self.state.pc.wrapping_add(0x2);
        self.state.register_needing_key = None;
    }

    /// Handles the 60Hz timer tick
    /// - decrements the delay timer
    /// - decrements the sound timer, asking for a beep as it runs out
    pub fn advance_timers(&mut self) -> Sound {
        if self.state.delay_timer > 0 {
            self.state.delay_timer -= 1;
        }

        let mut sound = Sound::Silent;
        if self.state.sound_timer > 0 {
            if self.state.sound_timer == 1 {
                sound = Sound::Beep;
            }
            self.state.sound_timer -= 1;
        }
        sound
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    fn get_op(&self) -> Result<Opcode> {
        let bytes = self.state.memory_slice(self.state.pc as usize, 2)?;
        Ok(Opcode::from_bytes(bytes[0], bytes[1]))
    }

    pub fn pc(&self) -> u16 {
        self.state.pc
    }

    pub fn i(&self) -> u16 {
        self.state.i
    }

    pub fn v(&self) -> &[u8; 16] {
        &self.state.v
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }

    /// Number of return addresses on the stack
    pub fn stack_depth(&self) -> usize {
        self.state.sp as usize
    }

    pub fn memory(&self) -> &[u8] {
        &self.state.memory
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpriteEdge;
    use crate::constants::{DISPLAY_WIDTH, SPRITE_SHEET};

    fn loaded(rom: &[u8]) -> Chip8 {
        let mut chip8 = Chip8::new();
        chip8.load_rom(rom).unwrap();
        chip8
    }

    #[test]
    fn test_chip8_gets_op() {
        let chip8 = loaded(&[0xAA, 0xBB]);
        assert_eq!(chip8.get_op(), Ok(Opcode(0xAABB)));
    }

    #[test]
    fn test_get_op_past_end_of_memory() {
        let mut chip8 = Chip8::new();
        chip8.state.pc = 0xFFF;
        assert_eq!(
            chip8.step(),
            Err(Chip8Error::OutOfBounds { address: 0x1000 })
        );
    }

    #[test]
    fn test_new_chip8_is_blank_with_font() {
        let chip8 = Chip8::new();
        assert_eq!(chip8.pc(), 0x200);
        assert_eq!(chip8.memory()[0x050..0x0A0], SPRITE_SHEET[..]);
        assert!(chip8.needs_redraw());
        assert!(chip8.frame().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_cycles_while_no_register_needs_key() {
        // a cls opcode so we don't read from empty memory
        let mut chip8 = loaded(&[0x00, 0xE0]);
        let starting_pc = chip8.pc();
        assert_eq!(chip8.step(), Ok(Step::Executed(Instruction::Clear)));
        assert_eq!(chip8.pc(), starting_pc + 0x2);
    }

    #[test]
    fn test_load_rom_rejects_oversized_rom() {
        let mut chip8 = Chip8::new();
        let rom = vec![0xAB; MAX_ROM_SIZE + 1];
        assert_eq!(
            chip8.load_rom(&rom),
            Err(Chip8Error::RomTooLarge {
                size: 3585,
                max_size: 3584
            })
        );
        assert!(chip8.memory()[0x200..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_load_rom_accepts_largest_rom() {
        let mut chip8 = Chip8::new();
        let rom = vec![0xAB; MAX_ROM_SIZE];
        assert_eq!(chip8.load_rom(&rom), Ok(()));
        assert_eq!(chip8.memory()[0xFFF], 0xAB);
    }

    #[test]
    fn test_load_rom_twice_requires_reset() {
        let mut chip8 = loaded(&[0x00, 0xE0]);
        assert_eq!(chip8.load_rom(&[0x12, 0x00]), Err(Chip8Error::AlreadyLoaded));
        chip8.reset();
        assert_eq!(chip8.load_rom(&[0x12, 0x00]), Ok(()));
        assert_eq!(chip8.memory()[0x200..0x202], [0x12, 0x00]);
    }

    #[test]
    fn test_reset_keeps_config() {
        let config = Config {
            sprite_edge: SpriteEdge::Wrap,
            ..Config::default()
        };
        let mut chip8 = Chip8::with_config(config).unwrap();
        chip8.key_press(0x3).unwrap();
        chip8.reset();
        assert_eq!(chip8.config().sprite_edge, SpriteEdge::Wrap);
        assert!(!chip8.is_key_pressed(0x3));
    }

    #[test]
    fn test_with_config_rejects_invalid_config() {
        let config = Config {
            cpu_hz: 0,
            ..Config::default()
        };
        assert!(Chip8::with_config(config).is_err());
    }

    #[test]
    fn test_unknown_opcode_is_reported_and_state_kept() {
        let mut chip8 = loaded(&[0xF1, 0xFF]);
        assert_eq!(
            chip8.step(),
            Err(Chip8Error::UnknownOpcode {
                opcode: 0xF1FF,
                address: 0x200
            })
        );
        assert_eq!(chip8.pc(), 0x200);
        chip8.skip_instruction();
        assert_eq!(chip8.pc(), 0x202);
    }

    #[test]
    fn test_fault_leaves_state_untouched() {
        // V1 = 0xEA; I = 0xFFE; BCD would write past the end of memory
        let mut chip8 = loaded(&[0x61, 0xEA, 0xAF, 0xFE, 0xF1, 0x33]);
        chip8.step().unwrap();
        chip8.step().unwrap();
        let before = *chip8.memory().last().unwrap();
        assert!(matches!(chip8.step(), Err(Chip8Error::OutOfBounds { .. })));
        assert_eq!(chip8.pc(), 0x204);
        assert_eq!(*chip8.memory().last().unwrap(), before);
    }

    #[test]
    fn test_stack_underflow_is_reported() {
        let mut chip8 = loaded(&[0x00, 0xEE]);
        assert_eq!(
            chip8.step(),
            Err(Chip8Error::StackUnderflow { address: 0x200 })
        );
        assert_eq!(chip8.stack_depth(), 0);
    }

    #[test]
    fn test_doesnt_advance_while_awaiting_key() {
        let mut chip8 = loaded(&[0xF1, 0x0A]);
        assert_eq!(chip8.step(), Ok(Step::AwaitingKey { register: 0x1 }));
        assert_eq!(chip8.step(), Ok(Step::AwaitingKey { register: 0x1 }));
        assert_eq!(chip8.pc(), 0x200);
    }

    #[test]
    fn test_captures_key_presses() {
        let mut chip8 = loaded(&[0xF1, 0x0A]);
        assert_eq!(chip8.step(), Ok(Step::AwaitingKey { register: 0x1 }));
        chip8.key_press(0xE).unwrap();
        chip8.key_press(0x7).unwrap();
        assert_eq!(
            chip8.step(),
            Ok(Step::Executed(Instruction::AwaitKey { x: 0x1 }))
        );
        assert_eq!(chip8.v()[0x1], 0x7);
        assert_eq!(chip8.pc(), 0x202);
    }

    #[test]
    fn test_key_press_and_release() {
        let mut chip8 = Chip8::new();
        chip8.key_press(0xF).unwrap();
        assert!(chip8.is_key_pressed(0xF));
        chip8.key_release(0xF).unwrap();
        assert!(!chip8.is_key_pressed(0xF));
        assert_eq!(chip8.key_press(0x10), Err(Chip8Error::InvalidKey { key: 0x10 }));
    }

    #[test]
    fn test_take_frame_clears_draw_flag() {
        let mut chip8 = Chip8::new();
        assert!(chip8.take_frame().is_some());
        assert!(!chip8.needs_redraw());
        assert!(chip8.take_frame().is_none());
    }

    #[test]
    fn test_draw_then_take_frame() {
        // I = 0x300; draw 5 rows at V0, V1
        let mut chip8 = loaded(&[0xA3, 0x00, 0xD0, 0x05]);
        let _ = chip8.take_frame();
        chip8.step().unwrap();
        assert_eq!(chip8.i(), 0x300);
        assert_eq!(chip8.pc(), 0x202);
        chip8.step().unwrap();
        let frame = chip8.take_frame().expect("draw should request a redraw");
        // memory at 0x300.. is empty, so nothing is lit
        assert!(frame.iter().all(|&p| p == 0));
        assert_eq!(frame.len(), DISPLAY_WIDTH * 32);
    }

    #[test]
    fn test_delay_timer_counts_down_to_zero() {
        let mut chip8 = Chip8::new();
        chip8.state.delay_timer = 2;
        assert_eq!(chip8.advance_timers(), Sound::Silent);
        assert_eq!(chip8.delay_timer(), 1);
        assert_eq!(chip8.advance_timers(), Sound::Silent);
        assert_eq!(chip8.advance_timers(), Sound::Silent);
        assert_eq!(chip8.delay_timer(), 0);
    }

    #[test]
    fn test_sound_timer_beeps_once() {
        // V1 = 1; ST = V1
        let mut chip8 = loaded(&[0x61, 0x01, 0xF1, 0x18]);
        chip8.step().unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.sound_timer(), 1);
        assert_eq!(chip8.advance_timers(), Sound::Beep);
        assert_eq!(chip8.sound_timer(), 0);
        assert_eq!(chip8.advance_timers(), Sound::Silent);
    }

    #[test]
    fn test_sound_timer_beeps_only_as_it_runs_out() {
        let mut chip8 = Chip8::new();
        chip8.state.sound_timer = 3;
        assert_eq!(chip8.advance_timers(), Sound::Silent);
        assert_eq!(chip8.advance_timers(), Sound::Silent);
        assert_eq!(chip8.advance_timers(), Sound::Beep);
        assert_eq!(chip8.advance_timers(), Sound::Silent);
    }
}
