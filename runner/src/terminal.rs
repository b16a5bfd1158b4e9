use std::io::{self, Write};

use chip8_core::constants::DISPLAY_WIDTH;
use chip8_core::FrameBuffer;

const LIT: char = '█';
const UNLIT: char = ' ';
/// Moves the cursor to the top left so each frame overwrites the last
const HOME: &str = "\x1B[H";
const BELL: &str = "\x07";

/// # Terminal
/// Presents Chip-8 frames on stdout as rows of block characters.
/// Only gets a call to `render` when the Chip-8 FrameBuffer is updated.
pub struct Terminal<W: Write> {
    out: W,
}

impl Terminal<io::Stdout> {
    pub fn stdout() -> Self {
        Terminal { out: io::stdout() }
    }
}

impl<W: Write> Terminal<W> {
    /// Formats a Chip-8 FrameBuffer as text.
    ///
    /// The flat frame buffer is split into rows of `DISPLAY_WIDTH` pixels and each
    /// pixel becomes one character.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    fn frame_to_text(frame: &FrameBuffer) -> String {
        frame
            .chunks(DISPLAY_WIDTH)
            .map(|row| {
                row.iter()
                    .map(|&pixel| if pixel == 1 { LIT } else { UNLIT })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Draws the frame over the previous one.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    pub fn render(&mut self, frame: &FrameBuffer) -> io::Result<()> {
        writeln!(self.out, "{}{}", HOME, Self::frame_to_text(frame))?;
        self.out.flush()
    }

    /// Rings the terminal bell
    pub fn beep(&mut self) -> io::Result<()> {
        self.out.write_all(BELL.as_bytes())?;
        self.out.flush()
    }
}
