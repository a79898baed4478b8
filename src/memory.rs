use crate::error::Chip8Error;
use std::io::{self, Read};

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// Represents memory map, font, program space etc.
pub trait MemoryMap {
    /// get a r/w slice of the underlying memory, refusing anything that runs
    /// off the end
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8], Chip8Error>;

    /// get a r/o slice of the underlying memory, refusing anything that runs
    /// off the end
    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8], Chip8Error>;

    /// get a single byte; addresses past the end wrap round
    fn read_byte(&self, addr: u16) -> u8;

    /// get a big-endian two-byte word (instructions)
    fn read_word(&self, addr: u16) -> u16 {
        ((self.read_byte(addr) as u16) << 8) | (self.read_byte(addr.wrapping_add(1)) as u16)
    }

    /// write a chunk of bytes into "RAM"; nothing is written if any of it
    /// would overrun
    fn write(&mut self, addr: u16, data: &[u8]) -> Result<(), Chip8Error> {
        self.get_rw_slice(addr, data.len())?.copy_from_slice(data);
        Ok(())
    }
}

/// Defines the CHIP-8 standard memory map
///   0x0000-0x01ff  interpreter (font lives at 0x0050)
///   0x0200-0x0fff  program
///
/// the stack, registers and display are kept outside addressable memory
pub struct Chip8MemoryMap {
    bytes: Box<[u8]>,
    pub program_addr: u16,
    pub font_addr: u16,
}

impl MemoryMap for Chip8MemoryMap {
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8], Chip8Error> {
        let a = addr as usize;
        if a + len > self.bytes.len() {
            return Err(Chip8Error::MemoryOutOfBounds { address: addr, len });
        }
        Ok(&mut self.bytes[a..(a + len)])
    }

    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8], Chip8Error> {
        let a = addr as usize;
        if a + len > self.bytes.len() {
            return Err(Chip8Error::MemoryOutOfBounds { address: addr, len });
        }
        Ok(&self.bytes[a..(a + len)])
    }

    fn read_byte(&self, addr: u16) -> u8 {
        self.bytes[addr as usize % self.bytes.len()]
    }
}

/// how much RAM we have
pub const CHIP8_RAM_SIZE_BYTES: u16 = 4096;

/// where the program is loaded
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// biggest ROM that fits between the program origin and the top of RAM
pub const CHIP8_MAX_PROGRAM_BYTES: usize = (CHIP8_RAM_SIZE_BYTES - CHIP8_PROGRAM_ADDR) as usize;

impl Chip8MemoryMap {
    /// initialises CHIP-8 with contemporary memory contents
    pub fn new() -> Result<Self, Chip8Error> {
        let mut mm = Chip8MemoryMap {
            bytes: Box::new([0u8; CHIP8_RAM_SIZE_BYTES as usize]),
            program_addr: CHIP8_PROGRAM_ADDR,
            font_addr: CHIP8_FONT_ADDR,
        };
        mm.write(CHIP8_FONT_ADDR, &CHIP8_FONT)?;
        Ok(mm)
    }

    /// load a CHIP-8 program at 0x200, returning how many bytes it took.
    /// memory is untouched if the program doesn't fit
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize, Chip8Error> {
        // one byte over the limit is enough to know it doesn't fit
        let mut buf = Vec::new();
        let size = reader
            .take(CHIP8_MAX_PROGRAM_BYTES as u64 + 1)
            .read_to_end(&mut buf)?;
        if size > CHIP8_MAX_PROGRAM_BYTES {
            return Err(Chip8Error::RomTooLarge {
                size,
                max_size: CHIP8_MAX_PROGRAM_BYTES,
            });
        }
        self.write(self.program_addr, &buf)?;
        log::info!("ROM loaded: {} bytes at {:#06x}", size, self.program_addr);
        Ok(size)
    }

    /// address of the glyph for hex digit `digit`
    pub fn glyph_addr(&self, digit: u8) -> u16 {
        self.font_addr + digit as u16 * CHIP8_GLYPH_BYTES
    }
}

pub const CHIP8_FONT_ADDR: u16 = 0x050;
pub const CHIP8_GLYPH_BYTES: u16 = 5;
const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_zeroed() -> Result<(), Chip8Error> {
        let m = Chip8MemoryMap::new()?;
        // NB. memory is zeroed from 0x200 because before that we bake in the font
        assert_eq!(m.bytes[0x200..], [0; 0xe00]);
        Ok(())
    }

    #[test]
    fn test_font_loaded() -> Result<(), Chip8Error> {
        let m = Chip8MemoryMap::new()?;
        assert_eq!(m.get_ro_slice(m.glyph_addr(0), 5)?, &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert_eq!(m.glyph_addr(0xf), 0x050 + 75);
        assert_eq!(m.read_byte(0x050 + 75), 0xF0);
        Ok(())
    }

    #[test]
    fn test_read_word() {
        let mut m = Chip8MemoryMap::new().unwrap();
        m.write(0x300, &[0, 1, 2, 3, 4, 5, 6, 7]).unwrap();
        assert_eq!(m.read_word(0x304), 0x0405);
    }

    #[test]
    fn test_read_wraps() {
        let mut m = Chip8MemoryMap::new().unwrap();
        m.write(0xfff, &[0xab]).unwrap();
        assert_eq!(m.read_byte(0x1fff), 0xab);
        // high byte at the top of RAM, low byte from address 0
        assert_eq!(m.read_word(0xfff), 0xab00);
    }

    #[test]
    fn test_write_overrun_rejected() {
        let mut dst = Chip8MemoryMap::new().unwrap();
        let res = dst.write(4089, &[0xff; 8]);
        assert!(matches!(
            res,
            Err(Chip8Error::MemoryOutOfBounds { address: 4089, len: 8 })
        ));
        // and nothing was written
        assert_eq!(dst.bytes[4089..], [0; 7]);
    }

    #[test]
    fn test_program_load_ok() -> Result<(), Chip8Error> {
        let mut dst = Chip8MemoryMap::new()?;
        let mut prog: &[u8] = &[0x00, 0xe0]; // clear screen
        assert_eq!(dst.load_program(&mut prog)?, 2);
        assert_eq!(dst.get_ro_slice(0x200, 2)?, &[0x00, 0xe0]);
        Ok(())
    }

    #[test]
    fn test_program_load_max_size() -> Result<(), Chip8Error> {
        let mut dst = Chip8MemoryMap::new()?;
        let prog = vec![0x12u8; CHIP8_MAX_PROGRAM_BYTES];
        assert_eq!(dst.load_program(&mut prog.as_slice())?, 0xe00);
        assert_eq!(dst.read_byte(0xfff), 0x12);
        Ok(())
    }

    #[test]
    fn test_program_too_large() {
        let mut dst = Chip8MemoryMap::new().unwrap();
        let prog = vec![0x12u8; CHIP8_MAX_PROGRAM_BYTES + 1];
        let res = dst.load_program(&mut prog.as_slice());
        assert!(matches!(
            res,
            Err(Chip8Error::RomTooLarge { size: 0xe01, max_size: 0xe00 })
        ));
        assert_eq!(dst.bytes[0x200..], [0; 0xe00]);
    }

    #[test]
    fn test_program_load_endless_reader() {
        let mut dst = Chip8MemoryMap::new().unwrap();
        let res = dst.load_program(&mut io::repeat(0x12));
        assert!(matches!(
            res,
            Err(Chip8Error::RomTooLarge { size: 0xe01, max_size: 0xe00 })
        ));
        assert_eq!(dst.bytes[0x200..], [0; 0xe00]);
    }
}
