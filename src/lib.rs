//! A CHIP-8 virtual machine.
//!
//! ## Design
//!
//! * the interpreter is the whole machine: memory, registers, stack,
//!   timers, keypad and the logical frame buffer. nothing else touches them
//! * one tick of a configurable logical clock runs at most one instruction;
//!   the timers are rate-converted so they still count down at 60Hz
//! * abstract display, input and sound so we can plug alternatives; starting
//!   with TUI in-console
//! * FX0A doesn't block: the interpreter just stops fetching until a key is
//!   released, while the timers carry on
//!
//! Model
//!
//! Environment
//!  |-- display, input, sound, config
//!  |-- interpreter(config)
//!  |    |-- memory map (font, program)
//!  |    |-- registers, stack, timers, keypad, frame buffer
//!  |    `-- instruction set: decode(word) then execute
//!  `-- main loop, paced to ticks_per_second
//!       |-- keys = input.scan()
//!       |-- interpreter.tick(keys)   // key wait, cycle, delay timer, sound timer
//!       |-- sound.gate(sound timer != 0)
//!       `-- display.draw(frame) at frames_per_second, if it changed
pub mod config;
pub mod display;
pub mod environment;
pub mod error;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod memory;
pub mod registers;
pub mod sound;
pub mod stack;
pub mod timer;

pub use error::Chip8Error;
