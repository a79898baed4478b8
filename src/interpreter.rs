//! # interpreter
//!
//! The execution engine. It owns memory, registers, stack, timers, keypad
//! and frame buffer, and moves them forward one tick at a time:
//!
//!  1. refresh the keypad from the input snapshot, or resolve an
//!     outstanding key wait with a released key
//!  2. if not waiting on a key, fetch/decode/execute one instruction
//!  3. advance the delay timer
//!  4. advance the sound timer
//!
//! A key wait (FX0A) doesn't block anything: the engine just stops fetching
//! until a released key turns up, and the tick that resolves the wait
//! doesn't fetch either.
use crate::config::{BoundsPolicy, Config};
use crate::display::FrameBuffer;
use crate::error::Chip8Error;
use crate::input::{KeySnapshot, Keypad};
use crate::instruction::{decode, Instruction};
use crate::memory::{self, MemoryMap};
use crate::registers::Registers;
use crate::stack::Stack;
use crate::timer::Timer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::io;

const INSTRUCTION_BYTES: u16 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleState {
    Running,
    AwaitingKey,
}

pub struct Chip8Interpreter {
    memory: memory::Chip8MemoryMap,
    registers: Registers,
    stack: Stack,
    program_counter: u16,
    index: u16,
    delay_timer: Timer,
    sound_timer: Timer,
    keypad: Keypad,
    frame: FrameBuffer,
    rng: StdRng,
    bounds: BoundsPolicy,
}

impl Chip8Interpreter {
    pub fn new(config: &Config) -> Result<Chip8Interpreter, Chip8Error> {
        let memory = memory::Chip8MemoryMap::new()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Chip8Interpreter {
            program_counter: memory.program_addr,
            memory,
            registers: Registers::new(),
            stack: Stack::new(config.bounds),
            index: 0,
            delay_timer: Timer::new(config.ticks_per_second, config.timer_rate_hz),
            sound_timer: Timer::new(config.ticks_per_second, config.timer_rate_hz),
            keypad: Keypad::new(),
            frame: FrameBuffer::new(),
            rng,
            bounds: config.bounds,
        })
    }

    /// load a chip8 program
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize, Chip8Error> {
        self.memory.load_program(reader)
    }

    /// run one tick. an error from the instruction is returned only after
    /// the timers have moved on
    pub fn tick(&mut self, keys: &KeySnapshot) -> Result<CycleState, Chip8Error> {
        let executed = if self.keypad.is_waiting() {
            if let Some(key) = keys.released {
                if let Some(x) = self.keypad.resolve() {
                    self.registers.set(x, key & 0xf);
                    log::debug!("key wait over: V{:x} := {:x}", x, key & 0xf);
                }
            }
            Ok(())
        } else {
            self.keypad.refresh(&keys.pressed);
            self.cycle()
        };

        self.delay_timer.tick();
        self.sound_timer.tick();

        executed.map(|_| self.state())
    }

    /// one fetch/decode/execute. on error nothing is committed, the program
    /// counter included
    pub fn cycle(&mut self) -> Result<(), Chip8Error> {
        let address = self.fetch_address()?;
        let opcode = self.memory.read_word(address);
        let instruction = decode(opcode).ok_or(Chip8Error::InvalidOpcode { opcode, address })?;
        log::trace!("{:04x}: {:04x} {}", address, opcode, instruction);

        let saved = self.program_counter;
        self.program_counter = address.wrapping_add(INSTRUCTION_BYTES);
        if let Err(e) = self.execute(instruction) {
            self.program_counter = saved;
            return Err(e);
        }

        log::trace!("{}", self);
        Ok(())
    }

    fn fetch_address(&self) -> Result<u16, Chip8Error> {
        let pc = self.program_counter;
        match self.bounds {
            BoundsPolicy::Wrap => Ok(pc % memory::CHIP8_RAM_SIZE_BYTES),
            BoundsPolicy::Fail if pc < memory::CHIP8_RAM_SIZE_BYTES - 1 => Ok(pc),
            BoundsPolicy::Fail => Err(Chip8Error::ProgramCounterOutOfBounds { address: pc }),
        }
    }

    /// step over the next instruction word
    pub fn skip_instruction(&mut self) {
        self.program_counter = self.program_counter.wrapping_add(INSTRUCTION_BYTES);
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.skip_instruction();
        }
    }

    /// every instruction checks what it needs before it changes anything
    pub fn execute(&mut self, instruction: Instruction) -> Result<(), Chip8Error> {
        use Instruction::*;

        match instruction {
            ClearScreen => self.frame.clear(),
            Return => self.program_counter = self.stack.pop()?,
            Jump { nnn } => self.program_counter = nnn,
            Call { nnn } => {
                self.stack.push(self.program_counter)?;
                self.program_counter = nnn;
            }
            SkipEqual { x, nn } => self.skip_if(self.registers.get(x) == nn),
            SkipNotEqual { x, nn } => self.skip_if(self.registers.get(x) != nn),
            SkipEqualRegister { x, y } => {
                self.skip_if(self.registers.get(x) == self.registers.get(y))
            }
            Load { x, nn } => self.registers.set(x, nn),
            Add { x, nn } => self.registers.set(x, self.registers.get(x).wrapping_add(nn)),
            LoadRegister { x, y } => self.registers.set(x, self.registers.get(y)),
            Or { x, y } => self
                .registers
                .set(x, self.registers.get(x) | self.registers.get(y)),
            And { x, y } => self
                .registers
                .set(x, self.registers.get(x) & self.registers.get(y)),
            Xor { x, y } => self
                .registers
                .set(x, self.registers.get(x) ^ self.registers.get(y)),
            // arithmetic and shifts: result first, then VF
            AddRegister { x, y } => {
                let (sum, carry) = self.registers.get(x).overflowing_add(self.registers.get(y));
                self.registers.set(x, sum);
                self.registers.set_flag(carry);
            }
            SubRegister { x, y } => {
                let (vx, vy) = (self.registers.get(x), self.registers.get(y));
                self.registers.set(x, vx.wrapping_sub(vy));
                self.registers.set_flag(vy <= vx);
            }
            ShiftRight { x, y } => {
                let vy = self.registers.get(y);
                self.registers.set(x, vy >> 1);
                self.registers.set_flag(vy & 1 == 1);
            }
            ReverseSubRegister { x, y } => {
                let (vx, vy) = (self.registers.get(x), self.registers.get(y));
                self.registers.set(x, vy.wrapping_sub(vx));
                self.registers.set_flag(vx <= vy);
            }
            ShiftLeft { x, y } => {
                let vy = self.registers.get(y);
                self.registers.set(x, vy << 1);
                self.registers.set_flag(vy >> 7 == 1);
            }
            SkipNotEqualRegister { x, y } => {
                self.skip_if(self.registers.get(x) != self.registers.get(y))
            }
            LoadIndex { nnn } => self.index = nnn,
            JumpV0 { nnn } => {
                self.program_counter = nnn.wrapping_add(self.registers.get(0) as u16)
            }
            Random { x, nn } => {
                let r: u8 = self.rng.gen();
                self.registers.set(x, r & nn);
            }
            DrawSprite { x, y, n } => {
                let sprite: Vec<u8> = (0..n as u16)
                    .map(|i| self.memory.read_byte(self.index.wrapping_add(i)))
                    .collect();
                let collision =
                    self.frame
                        .draw_sprite(self.registers.get(x), self.registers.get(y), &sprite);
                self.registers.set_flag(collision);
            }
            SkipPressed { x } => self.skip_if(self.keypad.is_pressed(self.registers.get(x))),
            SkipNotPressed { x } => self.skip_if(!self.keypad.is_pressed(self.registers.get(x))),
            LoadDelayTimer { x } => self.registers.set(x, self.delay_timer.value()),
            WaitKey { x } => {
                log::debug!("waiting for a key for V{:x}", x);
                self.keypad.wait(x);
            }
            SetDelayTimer { x } => self.delay_timer.set_value(self.registers.get(x)),
            SetSoundTimer { x } => self.sound_timer.set_value(self.registers.get(x)),
            AddIndex { x } => self.index = self.index.wrapping_add(self.registers.get(x) as u16),
            LoadGlyph { x } => self.index = self.memory.glyph_addr(self.registers.get(x)),
            StoreBcd { x } => {
                let v = self.registers.get(x);
                self.memory.write(self.index, &[v / 100, v / 10 % 10, v % 10])?;
            }
            StoreRegisters { x } => {
                self.memory.write(self.index, self.registers.up_to(x))?;
                self.index = self.index.wrapping_add(x as u16 + 1);
            }
            LoadRegisters { x } => {
                for (i, v) in self.registers.up_to_mut(x).iter_mut().enumerate() {
                    *v = self.memory.read_byte(self.index.wrapping_add(i as u16));
                }
                self.index = self.index.wrapping_add(x as u16 + 1);
            }
        }
        Ok(())
    }

    pub fn state(&self) -> CycleState {
        if self.keypad.is_waiting() {
            CycleState::AwaitingKey
        } else {
            CycleState::Running
        }
    }

    pub fn set_ticks_per_second(&mut self, ticks_per_second: u32) {
        self.delay_timer.set_ticks_per_second(ticks_per_second);
        self.sound_timer.set_ticks_per_second(ticks_per_second);
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn memory(&self) -> &memory::Chip8MemoryMap {
        &self.memory
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer.value()
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer.value()
    }

    /// the audio gate
    pub fn is_sounding(&self) -> bool {
        !self.sound_timer.is_zero()
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn frame_mut(&mut self) -> &mut FrameBuffer {
        &mut self.frame
    }
}

/// machine state on one line, for trace logs
impl fmt::Display for Chip8Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "PC:{:04x} I:{:04x} V:[{}] S:{} DT:{} ST:{} K:[{}]",
            self.program_counter,
            self.index,
            self.registers,
            self.stack,
            self.delay_timer,
            self.sound_timer,
            self.keypad
        )
    }
}
