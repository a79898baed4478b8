use crate::config::BoundsPolicy;
use crate::error::Chip8Error;
use std::fmt;

pub const STACK_LEVELS: usize = 16;

/// return addresses for subroutine calls. push stores then increments, pop
/// decrements then loads
#[derive(Clone, Debug)]
pub struct Stack {
    entries: [u16; STACK_LEVELS],
    pointer: usize,
    policy: BoundsPolicy,
}

impl Stack {
    pub fn new(policy: BoundsPolicy) -> Self {
        Stack {
            entries: [0; STACK_LEVELS],
            pointer: 0,
            policy,
        }
    }

    pub fn push(&mut self, addr: u16) -> Result<(), Chip8Error> {
        if self.pointer >= STACK_LEVELS {
            match self.policy {
                BoundsPolicy::Fail => return Err(Chip8Error::StackOverflow),
                BoundsPolicy::Wrap => self.pointer = 0,
            }
        }
        self.entries[self.pointer] = addr;
        self.pointer += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, Chip8Error> {
        if self.pointer == 0 {
            match self.policy {
                BoundsPolicy::Fail => return Err(Chip8Error::StackUnderflow),
                BoundsPolicy::Wrap => self.pointer = STACK_LEVELS,
            }
        }
        self.pointer -= 1;
        Ok(self.entries[self.pointer])
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "sp:{:x} [", self.pointer)?;
        for (i, a) in self.entries[..self.pointer].iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:04x}", a)?;
        }
        write!(f, "]")
    }
}
