use std::fmt;

pub const REGISTER_COUNT: usize = 16;

/// VF doubles as the carry/borrow/collision flag
pub const FLAG_REGISTER: u8 = 0xf;

/// general purpose registers V0..VF
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registers([u8; REGISTER_COUNT]);

impl Registers {
    pub fn new() -> Self {
        Registers::default()
    }

    /// register indices come from a 4-bit field so are always in range
    pub fn get(&self, x: u8) -> u8 {
        self.0[(x & 0xf) as usize]
    }

    pub fn set(&mut self, x: u8, value: u8) {
        self.0[(x & 0xf) as usize] = value;
    }

    pub fn set_flag(&mut self, flag: bool) {
        self.0[FLAG_REGISTER as usize] = flag as u8;
    }

    pub fn flag(&self) -> u8 {
        self.0[FLAG_REGISTER as usize]
    }

    /// V0..=Vx
    pub fn up_to(&self, x: u8) -> &[u8] {
        &self.0[..=(x & 0xf) as usize]
    }

    pub fn up_to_mut(&mut self, x: u8) -> &mut [u8] {
        &mut self.0[..=(x & 0xf) as usize]
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:x}:{:02x}", i, v)?;
        }
        Ok(())
    }
}
