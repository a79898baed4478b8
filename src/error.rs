use std::io;
use thiserror::Error;

/// Everything that can go wrong inside the interpreter or while talking to
/// its collaborators
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("invalid opcode {opcode:#06x} at {address:#06x}")]
    InvalidOpcode { opcode: u16, address: u16 },

    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("memory access out of bounds: {len} byte(s) at {address:#06x}")]
    MemoryOutOfBounds { address: u16, len: usize },

    #[error("stack overflow: more than 16 nested subroutine calls")]
    StackOverflow,

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("program counter out of bounds at {address:#06x}")]
    ProgramCounterOutOfBounds { address: u16 },

    #[error(transparent)]
    Io(#[from] io::Error),
}
