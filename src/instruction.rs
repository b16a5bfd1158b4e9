use crate::config::Config;
use crate::constants::KEY_COUNT;
use crate::error::Result;
use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::State;

/// A decoded Chip-8 instruction.
///
/// Operands are pulled out of the opcode once at decode time:
/// `x`/`y` name registers, `kk` is an 8-bit immediate, `n` a 4-bit immediate
/// and `addr` a 12-bit address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    Clear,
    /// 00EE
    Return,
    /// 0nnn
    MachineCall { addr: u16 },
    /// 1nnn
    Jump { addr: u16 },
    /// 2nnn
    Call { addr: u16 },
    /// 3xkk
    SkipEqual { x: u8, kk: u8 },
    /// 4xkk
    SkipNotEqual { x: u8, kk: u8 },
    /// 5xy0
    SkipRegistersEqual { x: u8, y: u8 },
    /// 6xkk
    Load { x: u8, kk: u8 },
    /// 7xkk
    Add { x: u8, kk: u8 },
    /// 8xy0
    Move { x: u8, y: u8 },
    /// 8xy1
    Or { x: u8, y: u8 },
    /// 8xy2
    And { x: u8, y: u8 },
    /// 8xy3
    Xor { x: u8, y: u8 },
    /// 8xy4
    AddRegisters { x: u8, y: u8 },
    /// 8xy5
    Sub { x: u8, y: u8 },
    /// 8xy6
    ShiftRight { x: u8 },
    /// 8xy7
    SubNegated { x: u8, y: u8 },
    /// 8xyE
    ShiftLeft { x: u8 },
    /// 9xy0
    SkipRegistersNotEqual { x: u8, y: u8 },
    /// Annn
    LoadIndex { addr: u16 },
    /// Bnnn
    JumpOffset { addr: u16 },
    /// Cxkk
    Random { x: u8, kk: u8 },
    /// Dxyn
    Draw { x: u8, y: u8, n: u8 },
    /// Ex9E
    SkipPressed { x: u8 },
    /// ExA1
    SkipReleased { x: u8 },
    /// Fx07
    ReadDelay { x: u8 },
    /// Fx0A
    AwaitKey { x: u8 },
    /// Fx15
    SetDelay { x: u8 },
    /// Fx18
    SetSound { x: u8 },
    /// Fx1E
    AddIndex { x: u8 },
    /// Fx29
    LoadGlyph { x: u8 },
    /// Fx33
    StoreBcd { x: u8 },
    /// Fx55
    StoreRegisters { x: u8 },
    /// Fx65
    LoadRegisters { x: u8 },
}

impl Instruction {
    /// Selects the Instruction for a given Opcode, or None if no instruction matches
    pub fn decode(op: Opcode) -> Option<Self> {
        use Instruction::*;

        let (x, y, n, kk, addr) = (op.x(), op.y(), op.n(), op.kk(), op.nnn());
        let instruction = match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Clear,
            (0x0, 0x0, 0xE, 0xE) => Return,
            (0x0, ..) => MachineCall { addr },
            (0x1, ..) => Jump { addr },
            (0x2, ..) => Call { addr },
            (0x3, ..) => SkipEqual { x, kk },
            (0x4, ..) => SkipNotEqual { x, kk },
            (0x5, .., 0x0) => SkipRegistersEqual { x, y },
            (0x6, ..) => Load { x, kk },
            (0x7, ..) => Add { x, kk },
            (0x8, .., 0x0) => Move { x, y },
            (0x8, .., 0x1) => Or { x, y },
            (0x8, .., 0x2) => And { x, y },
            (0x8, .., 0x3) => Xor { x, y },
            (0x8, .., 0x4) => AddRegisters { x, y },
            (0x8, .., 0x5) => Sub { x, y },
            (0x8, .., 0x6) => ShiftRight { x },
            (0x8, .., 0x7) => SubNegated { x, y },
            (0x8, .., 0xE) => ShiftLeft { x },
            (0x9, .., 0x0) => SkipRegistersNotEqual { x, y },
            (0xA, ..) => LoadIndex { addr },
            (0xB, ..) => JumpOffset { addr },
            (0xC, ..) => Random { x, kk },
            (0xD, ..) => Draw { x, y, n },
            (0xE, .., 0x9, 0xE) => SkipPressed { x },
            (0xE, .., 0xA, 0x1) => SkipReleased { x },
            (0xF, .., 0x0, 0x7) => ReadDelay { x },
            (0xF, .., 0x0, 0xA) => AwaitKey { x },
            (0xF, .., 0x1, 0x5) => SetDelay { x },
            (0xF, .., 0x1, 0x8) => SetSound { x },
            (0xF, .., 0x1, 0xE) => AddIndex { x },
            (0xF, .., 0x2, 0x9) => LoadGlyph { x },
            (0xF, .., 0x3, 0x3) => StoreBcd { x },
            (0xF, .., 0x5, 0x5) => StoreRegisters { x },
            (0xF, .., 0x6, 0x5) => LoadRegisters { x },
            _ => return None,
        };
        Some(instruction)
    }

    /// Applies the instruction to `state`, returning the state that follows it
    pub fn execute(
        self,
        state: &State,
        pressed_keys: [u8; KEY_COUNT],
        config: &Config,
    ) -> Result<State> {
        use Instruction::*;

        let next = match self {
            Clear => clr(state),
            Return => rts(state)?,
            MachineCall { addr } => sys(state, addr),
            Jump { addr } => jump(state, addr),
            Call { addr } => call(state, addr)?,
            SkipEqual { x, kk } => ske(state, x, kk),
            SkipNotEqual { x, kk } => skne(state, x, kk),
            SkipRegistersEqual { x, y } => skre(state, x, y),
            Load { x, kk } => load(state, x, kk),
            Add { x, kk } => add(state, x, kk),
            Move { x, y } => mv(state, x, y),
            Or { x, y } => or(state, x, y),
            And { x, y } => and(state, x, y),
            Xor { x, y } => xor(state, x, y),
            AddRegisters { x, y } => addr(state, x, y),
            Sub { x, y } => sub(state, x, y),
            ShiftRight { x } => shr(state, x),
            SubNegated { x, y } => subn(state, x, y),
            ShiftLeft { x } => shl(state, x),
            SkipRegistersNotEqual { x, y } => skrne(state, x, y),
            LoadIndex { addr } => loadi(state, addr),
            JumpOffset { addr } => jumpi(state, addr),
            Random { x, kk } => rand(state, x, kk),
            Draw { x, y, n } => draw(state, x, y, n, config.sprite_edge)?,
            SkipPressed { x } => skpr(state, x, pressed_keys)?,
            SkipReleased { x } => skup(state, x, pressed_keys)?,
            ReadDelay { x } => moved(state, x),
            AwaitKey { x } => keyd(state, x, pressed_keys),
            SetDelay { x } => loads(state, x),
            SetSound { x } => ld(state, x),
            AddIndex { x } => addi(state, x),
            LoadGlyph { x } => ldspr(state, x),
            StoreBcd { x } => bcd(state, x)?,
            StoreRegisters { x } => stor(state, x)?,
            LoadRegisters { x } => read(state, x)?,
        };
        Ok(next)
    }
}
