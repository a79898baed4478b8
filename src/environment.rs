use crate::config::{Config, OpcodePolicy};
use crate::display::Display;
use crate::error::Chip8Error;
use crate::input::Input;
use crate::interpreter::Chip8Interpreter;
use crate::sound::Sound;
use std::error::Error;
use std::io;
use std::time::{Duration, Instant};

/// Sets everything up and runs the main loop: wires input, display and
/// sound to the interpreter and keeps the logical clock.
pub struct Environment<'a> {
    interpreter: Chip8Interpreter,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
    config: Config,
    ticks: u64,
    frame_accumulator: u32,
}

impl<'a> Environment<'a> {
    pub fn new(
        config: Config,
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
    ) -> Result<Environment<'a>, Chip8Error> {
        Ok(Environment {
            interpreter: Chip8Interpreter::new(&config)?,
            display,
            input,
            sound,
            config,
            ticks: 0,
            frame_accumulator: 0,
        })
    }

    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize, Chip8Error> {
        self.interpreter.load_program(reader)
    }

    pub fn interpreter(&self) -> &Chip8Interpreter {
        &self.interpreter
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// one tick of the logical clock, unpaced
    pub fn step(&mut self) -> Result<(), Box<dyn Error>> {
        let keys = self.input.scan()?;
        match self.interpreter.tick(&keys) {
            Ok(_) => {}
            Err(Chip8Error::InvalidOpcode { opcode, address })
                if self.config.on_invalid_opcode == OpcodePolicy::Skip =>
            {
                log::debug!("skipping invalid opcode {:04x} at {:04x}", opcode, address);
                self.interpreter.skip_instruction();
            }
            Err(e) => return Err(e.into()),
        }
        self.ticks += 1;

        self.sound.gate(self.interpreter.is_sounding())?;

        // present at frames_per_second, and only if something changed
        self.frame_accumulator += self.config.frames_per_second;
        if self.frame_accumulator >= self.config.ticks_per_second {
            self.frame_accumulator %= self.config.ticks_per_second.max(1);
            if self.interpreter.frame_mut().take_dirty() {
                self.display.draw(self.interpreter.frame())?;
            }
        }
        Ok(())
    }

    /// run at ticks_per_second until `limit` ticks have gone by (if given) or
    /// the user asks to quit
    pub fn main_loop(&mut self, limit: Option<u64>) -> Result<u64, Box<dyn Error>> {
        let tick = Duration::from_secs_f64(1.0 / self.config.ticks_per_second.max(1) as f64);
        log::info!("running at {} ticks/s", self.config.ticks_per_second);

        let mut deadline = Instant::now();
        while limit.map_or(true, |l| self.ticks < l) && !self.input.quit_requested() {
            deadline += tick;
            self.step()?;
            let now = Instant::now();
            if deadline > now {
                spin_sleep::sleep(deadline - now);
            }
        }
        // don't leave the buzzer going
        self.sound.gate(false)?;

        log::info!("stopped after {} ticks", self.ticks);
        Ok(self.ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DummyDisplay;
    use crate::input::{DummyInput, KeySnapshot};
    use crate::interpreter::CycleState;
    use crate::sound::Mute;

    fn config() -> Config {
        Config {
            ticks_per_second: 600,
            seed: Some(1),
            ..Config::default()
        }
    }

    fn program(words: &[u16]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_be_bytes()).collect()
    }

    #[test]
    fn test_draws_only_changed_frames() -> Result<(), Box<dyn Error>> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::default();
        let mut sound = Mute::new();
        let mut env = Environment::new(config(), &mut display, &mut input, &mut sound)?;
        // CLS ; JP 0x202
        env.load_program(&mut program(&[0x00E0, 0x1202]).as_slice())?;
        // 600 ticks at 60 fps is 60 frame slots; only the first has anything new
        for _ in 0..600 {
            env.step()?;
        }
        assert_eq!(env.ticks(), 600);
        drop(env);
        assert_eq!(display.frames, 1);
        Ok(())
    }

    #[test]
    fn test_sound_follows_timer() -> Result<(), Box<dyn Error>> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::default();
        let mut sound = Mute::new();
        {
            let mut env = Environment::new(config(), &mut display, &mut input, &mut sound)?;
            // LD V0,02 ; LD ST,V0 ; JP 0x204
            env.load_program(&mut program(&[0x6002, 0xF018, 0x1204]).as_slice())?;
            env.step()?;
            assert!(!env.interpreter().is_sounding());
            env.step()?;
            assert!(env.interpreter().is_sounding());
            // 2/60ths of a second at 600 ticks/s
            for _ in 0..20 {
                env.step()?;
            }
            assert!(!env.interpreter().is_sounding());
        }
        assert_eq!(sound.beeps, 1);
        assert!(!sound.is_beeping());
        Ok(())
    }

    #[test]
    fn test_invalid_opcode_halts() -> Result<(), Box<dyn Error>> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::default();
        let mut sound = Mute::new();
        let mut env = Environment::new(config(), &mut display, &mut input, &mut sound)?;
        env.load_program(&mut program(&[0xFFFF]).as_slice())?;
        let err = env.step().unwrap_err();
        assert!(err.to_string().contains("invalid opcode 0xffff"));
        assert_eq!(env.ticks(), 0);
        Ok(())
    }

    #[test]
    fn test_invalid_opcode_skipped() -> Result<(), Box<dyn Error>> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::default();
        let mut sound = Mute::new();
        let config = Config {
            on_invalid_opcode: OpcodePolicy::Skip,
            ..config()
        };
        let mut env = Environment::new(config, &mut display, &mut input, &mut sound)?;
        // junk ; LD V1,07
        env.load_program(&mut program(&[0xFFFF, 0x6107]).as_slice())?;
        env.step()?;
        env.step()?;
        assert_eq!(env.interpreter().registers().get(1), 7);
        Ok(())
    }

    #[test]
    fn test_key_wait_through_input() -> Result<(), Box<dyn Error>> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(&[
            KeySnapshot::default(),
            KeySnapshot::pressing(&[0xc]),
            KeySnapshot::releasing(0xc),
        ]);
        let mut sound = Mute::new();
        let mut env = Environment::new(config(), &mut display, &mut input, &mut sound)?;
        // LD V2,K ; JP 0x202
        env.load_program(&mut program(&[0xF20A, 0x1202]).as_slice())?;
        env.step()?;
        assert_eq!(env.interpreter().state(), CycleState::AwaitingKey);
        env.step()?;
        assert_eq!(env.interpreter().state(), CycleState::AwaitingKey);
        env.step()?;
        assert_eq!(env.interpreter().state(), CycleState::Running);
        assert_eq!(env.interpreter().registers().get(2), 0xc);
        Ok(())
    }

    #[test]
    fn test_main_loop_tick_limit() -> Result<(), Box<dyn Error>> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::default();
        let mut sound = Mute::new();
        let mut env = Environment::new(config(), &mut display, &mut input, &mut sound)?;
        // JP 0x200
        env.load_program(&mut program(&[0x1200]).as_slice())?;
        assert_eq!(env.main_loop(Some(30))?, 30);
        Ok(())
    }
}
