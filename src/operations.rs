use crate::config::SpriteEdge;
use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, KEY_COUNT, SPRITE_HEIGHT, SPRITE_SHEET_START, STACK_SIZE,
};
use crate::error::{Chip8Error, Result};
use crate::state::State;

// Every operation builds the next State from the current one. A failed operation
// returns before anything is committed, so faults never leave partial writes behind.

fn next(state: &State) -> u16 {
    state.pc + 0x2
}

fn skip_if(state: &State, condition: bool) -> u16 {
    if condition {
        state.pc + 0x4
    } else {
        state.pc + 0x2
    }
}

fn key_is_down(state: &State, x: u8, pressed_keys: [u8; KEY_COUNT]) -> Result<bool> {
    let key = state.v[x as usize];
    match pressed_keys.get(key as usize) {
        Some(&status) => Ok(status != 0x0),
        None => Err(Chip8Error::InvalidKey { key }),
    }
}

/// clear
pub fn clr(state: &State) -> State {
    State {
        pc: next(state),
        frame_buffer: [0; DISPLAY_WIDTH * DISPLAY_HEIGHT],
        draw_flag: true,
        ..*state
    }
}

/// PC = STACK.pop()
pub fn rts(state: &State) -> Result<State> {
    if state.sp == 0 {
        return Err(Chip8Error::StackUnderflow { address: state.pc });
    }
    let sp = state.sp - 0x1;
    Ok(State {
        pc: state.stack[sp as usize] + 0x2,
        sp,
        ..*state
    })
}

/// 0nnn: machine code routines aren't emulated
pub fn sys(state: &State, addr: u16) -> State {
    log::debug!("ignoring machine code call to {:03X} at {:03X}", addr, state.pc);
    State {
        pc: next(state),
        ..*state
    }
}

/// PC = addr
pub fn jump(state: &State, addr: u16) -> State {
    State { pc: addr, ..*state }
}

/// STACK.push(PC); PC = addr
pub fn call(state: &State, addr: u16) -> Result<State> {
    if state.sp as usize >= STACK_SIZE {
        return Err(Chip8Error::StackOverflow { address: state.pc });
    }
    let mut stack = state.stack;
    stack[state.sp as usize] = state.pc;
    Ok(State {
        pc: addr,
        sp: state.sp + 0x1,
        stack,
        ..*state
    })
}

/// if Vx == kk then pc += 2
pub fn ske(state: &State, x: u8, kk: u8) -> State {
    State {
        pc: skip_if(state, state.v[x as usize] == kk),
        ..*state
    }
}

/// if Vx != kk then pc += 2
pub fn skne(state: &State, x: u8, kk: u8) -> State {
    State {
        pc: skip_if(state, state.v[x as usize] != kk),
        ..*state
    }
}

/// if Vx == Vy then pc += 2
pub fn skre(state: &State, x: u8, y: u8) -> State {
    State {
        pc: skip_if(state, state.v[x as usize] == state.v[y as usize]),
        ..*state
    }
}

/// if Vx != Vy then pc += 2
pub fn skrne(state: &State, x: u8, y: u8) -> State {
    State {
        pc: skip_if(state, state.v[x as usize] != state.v[y as usize]),
        ..*state
    }
}

/// Vx = kk
pub fn load(state: &State, x: u8, kk: u8) -> State {
    let mut v = state.v;
    v[x as usize] = kk;
    State {
        pc: next(state),
        v,
        ..*state
    }
}

/// Vx += kk
/// Add kk to Vx; allow for overflow but implicitly drop it
pub fn add(state: &State, x: u8, kk: u8) -> State {
    let mut v = state.v;
    v[x as usize] = v[x as usize].wrapping_add(kk);
    State {
        pc: next(state),
        v,
        ..*state
    }
}

/// Applies a bitwise or assignment operation to Vx
fn alu(state: &State, x: u8, y: u8, f: impl Fn(u8, u8) -> u8) -> State {
    let mut v = state.v;
    v[x as usize] = f(v[x as usize], v[y as usize]);
    State {
        pc: next(state),
        v,
        ..*state
    }
}

/// Writes Vx then VF, so the flag survives when x is F
fn alu_with_flag(state: &State, x: u8, result: u8, flag: bool) -> State {
    let mut v = state.v;
    v[x as usize] = result;
    v[0xF] = u8::from(flag);
    State {
        pc: next(state),
        v,
        ..*state
    }
}

/// Vx = Vy
pub fn mv(state: &State, x: u8, y: u8) -> State {
    alu(state, x, y, |_, vy| vy)
}

/// Vx |= Vy
pub fn or(state: &State, x: u8, y: u8) -> State {
    alu(state, x, y, |vx, vy| vx | vy)
}

/// Vx &= Vy
pub fn and(state: &State, x: u8, y: u8) -> State {
    alu(state, x, y, |vx, vy| vx & vy)
}

/// Vx ^= Vy
pub fn xor(state: &State, x: u8, y: u8) -> State {
    alu(state, x, y, |vx, vy| vx ^ vy)
}

/// Vx += Vy; VF = overflow
pub fn addr(state: &State, x: u8, y: u8) -> State {
    let (res, over) = state.v[x as usize].overflowing_add(state.v[y as usize]);
    alu_with_flag(state, x, res, over)
}

/// Vx -= Vy; VF = !underflow
pub fn sub(state: &State, x: u8, y: u8) -> State {
    let (res, under) = state.v[x as usize].overflowing_sub(state.v[y as usize]);
    alu_with_flag(state, x, res, !under)
}

/// Vx /= 2; VF = lsb
pub fn shr(state: &State, x: u8) -> State {
    let vx = state.v[x as usize];
    alu_with_flag(state, x, vx >> 1, vx & 0x1 == 0x1)
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(state: &State, x: u8, y: u8) -> State {
    let (res, under) = state.v[y as usize].overflowing_sub(state.v[x as usize]);
    alu_with_flag(state, x, res, !under)
}

/// Vx *= 2; VF = msb
pub fn shl(state: &State, x: u8) -> State {
    let vx = state.v[x as usize];
    alu_with_flag(state, x, vx << 1, vx & 0x80 == 0x80)
}

/// I = addr
pub fn loadi(state: &State, addr: u16) -> State {
    State {
        pc: next(state),
        i: addr,
        ..*state
    }
}

/// PC = V0 + addr
pub fn jumpi(state: &State, addr: u16) -> State {
    State {
        pc: u16::from(state.v[0x0]) + addr,
        ..*state
    }
}

/// Vx = rand_byte & kk
pub fn rand(state: &State, x: u8, kk: u8) -> State {
    let rand_byte: u8 = rand::random();
    let mut v = state.v;
    v[x as usize] = rand_byte & kk;
    State {
        pc: next(state),
        v,
        ..*state
    }
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position Vx, Vy on the FrameBuffer.
/// Sets VF if any pixels were erased.
///
/// Pixels past the right or bottom edge are handled according to `edge`.
pub fn draw(state: &State, x: u8, y: u8, n: u8, edge: SpriteEdge) -> Result<State> {
    let sprite = state.memory_slice(state.i as usize, n as usize)?;
    let origin_x = state.v[x as usize] as usize;
    let origin_y = state.v[y as usize] as usize;

    let mut v = state.v;
    let mut frame_buffer = state.frame_buffer;

    // Reset the carry flag (used for collision detection)
    v[0xF] = 0x0;

    for (row, byte) in sprite.iter().enumerate() {
        for bit in 0..8 {
            if (byte >> (7 - bit)) & 0x1 == 0 {
                continue;
            }
            let (px, py) = match edge {
                SpriteEdge::Clip => {
                    let (px, py) = (origin_x + bit, origin_y + row);
                    if px >= DISPLAY_WIDTH || py >= DISPLAY_HEIGHT {
                        continue;
                    }
                    (px, py)
                }
                SpriteEdge::Wrap => (
                    (origin_x + bit) % DISPLAY_WIDTH,
                    (origin_y + row) % DISPLAY_HEIGHT,
                ),
            };
            let pixel = &mut frame_buffer[px + py * DISPLAY_WIDTH];
            if *pixel == 0x1 {
                v[0xF] = 0x1;
            }
            *pixel ^= 0x1;
        }
    }

    Ok(State {
        pc: next(state),
        draw_flag: true,
        v,
        frame_buffer,
        ..*state
    })
}

/// if Vx.pressed then pc += 2
pub fn skpr(state: &State, x: u8, pressed_keys: [u8; KEY_COUNT]) -> Result<State> {
    let pressed = key_is_down(state, x, pressed_keys)?;
    Ok(State {
        pc: skip_if(state, pressed),
        ..*state
    })
}

/// if !Vx.pressed then pc += 2
pub fn skup(state: &State, x: u8, pressed_keys: [u8; KEY_COUNT]) -> Result<State> {
    let pressed = key_is_down(state, x, pressed_keys)?;
    Ok(State {
        pc: skip_if(state, !pressed),
        ..*state
    })
}

/// Vx = DT
pub fn moved(state: &State, x: u8) -> State {
    let mut v = state.v;
    v[x as usize] = state.delay_timer;
    State {
        pc: next(state),
        v,
        ..*state
    }
}

/// await keypress for Vx
/// Holds the pc in place until some key is down; the lowest key down wins.
pub fn keyd(state: &State, x: u8, pressed_keys: [u8; KEY_COUNT]) -> State {
    match pressed_keys.iter().position(|&status| status != 0x0) {
        Some(key) => {
            let mut v = state.v;
            v[x as usize] = key as u8;
            State {
                pc: next(state),
                v,
                register_needing_key: None,
                ..*state
            }
        }
        None => State {
            register_needing_key: Some(x),
            ..*state
        },
    }
}

/// DT = Vx
pub fn loads(state: &State, x: u8) -> State {
    State {
        pc: next(state),
        delay_timer: state.v[x as usize],
        ..*state
    }
}

/// ST = Vx
pub fn ld(state: &State, x: u8) -> State {
    State {
        pc: next(state),
        sound_timer: state.v[x as usize],
        ..*state
    }
}

/// I += Vx
pub fn addi(state: &State, x: u8) -> State {
    State {
        pc: next(state),
        i: state.i.wrapping_add(u16::from(state.v[x as usize])),
        ..*state
    }
}

/// I = &SPRITE_SHEET[Vx]
/// Set I to the memory address of the glyph for the low nibble of Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(state: &State, x: u8) -> State {
    let digit = u16::from(state.v[x as usize] & 0xF);
    State {
        pc: next(state),
        i: SPRITE_SHEET_START + digit * SPRITE_HEIGHT,
        ..*state
    }
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(state: &State, x: u8) -> Result<State> {
    let vx = state.v[x as usize];
    let bcd = [vx / 100 % 10, vx / 10 % 10, vx % 10];
    let mut next_state = State {
        pc: next(state),
        ..*state
    };
    next_state
        .memory_slice_mut(state.i as usize, bcd.len())?
        .copy_from_slice(&bcd);
    Ok(next_state)
}

/// mem[I..=I+x] = V0..=Vx
/// Fill memory starting at address i with V0..=Vx; I is left alone
pub fn stor(state: &State, x: u8) -> Result<State> {
    let count = x as usize + 1;
    let mut next_state = State {
        pc: next(state),
        ..*state
    };
    next_state
        .memory_slice_mut(state.i as usize, count)?
        .copy_from_slice(&state.v[..count]);
    Ok(next_state)
}

/// V0..=Vx = mem[I..=I+x]; I += x + 1
/// Fill V0..=Vx with memory starting at address i, leaving I just past the last byte read
pub fn read(state: &State, x: u8) -> Result<State> {
    let count = x as usize + 1;
    let mut v = state.v;
    v[..count].copy_from_slice(state.memory_slice(state.i as usize, count)?);
    Ok(State {
        pc: next(state),
        i: state.i.wrapping_add(count as u16),
        v,
        ..*state
    })
}
