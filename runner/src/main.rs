use std::path::PathBuf;

use clap::Parser;

use chip8_core::{Config, SpriteEdge, CLOCK_SPEED};

mod keypad;
mod run;
mod terminal;

#[derive(Parser, Debug)]
#[command(
    name = "chip8-runner",
    about = "Runs a Chip-8 ROM in the terminal. Type hex digits and press enter to tap keys."
)]
struct Options {
    /// ROM image to load at 0x200.
    rom: PathBuf,

    /// CPU cycles per second.
    #[arg(long, default_value_t = CLOCK_SPEED, value_parser = clap::value_parser!(u32).range(1..))]
    hz: u32,

    /// Stop after this many CPU cycles.
    #[arg(long, value_name = "N")]
    cycles: Option<u64>,

    /// Wrap sprites around the screen edges instead of clipping them.
    #[arg(long, default_value_t = false)]
    wrap: bool,
}

impl Options {
    fn config(&self) -> Config {
        Config {
            sprite_edge: if self.wrap {
                SpriteEdge::Wrap
            } else {
                SpriteEdge::Clip
            },
            cpu_hz: self.hz,
            ..Config::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let options = Options::parse();
    if let Err(e) = run::run(&options.rom, options.config(), options.cycles) {
        log::error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Options, clap::Error> {
        Options::try_parse_from(std::iter::once("chip8-runner").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_defaults() {
        let options = parse(&["game.ch8"]).unwrap();
        assert_eq!(options.rom, PathBuf::from("game.ch8"));
        assert_eq!(options.config(), Config::default());
        assert_eq!(options.cycles, None);
    }

    #[test]
    fn test_parse_all_options() {
        let options = parse(&["--hz", "1000", "game.ch8", "--cycles", "20", "--wrap"]).unwrap();
        let config = options.config();
        assert_eq!(config.cpu_hz, 1000);
        assert_eq!(config.sprite_edge, SpriteEdge::Wrap);
        assert_eq!(options.cycles, Some(20));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_accepts_the_largest_rate() {
        let options = parse(&["game.ch8", "--hz", "4294967295"]).unwrap();
        assert_eq!(options.config().cpu_hz, u32::MAX);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["game.ch8", "--hz", "0"]).is_err());
        assert!(parse(&["game.ch8", "--hz", "4294967296"]).is_err());
        assert!(parse(&["game.ch8", "--hz"]).is_err());
        assert!(parse(&["game.ch8", "--fast"]).is_err());
        assert!(parse(&["a.ch8", "b.ch8"]).is_err());
    }
}
