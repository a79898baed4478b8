//! # instruction set
//!
//! the base CHIP-8 instructions. field names follow the usual notation:
//! `x`/`y` pick registers, `nn` is an 8-bit immediate, `nnn` a 12-bit
//! address and `n` a nibble.
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump { nnn: u16 },
    /// 2NNN
    Call { nnn: u16 },
    /// 3XNN
    SkipEqual { x: u8, nn: u8 },
    /// 4XNN
    SkipNotEqual { x: u8, nn: u8 },
    /// 5XY0
    SkipEqualRegister { x: u8, y: u8 },
    /// 6XNN
    Load { x: u8, nn: u8 },
    /// 7XNN
    Add { x: u8, nn: u8 },
    /// 8XY0
    LoadRegister { x: u8, y: u8 },
    /// 8XY1
    Or { x: u8, y: u8 },
    /// 8XY2
    And { x: u8, y: u8 },
    /// 8XY3
    Xor { x: u8, y: u8 },
    /// 8XY4
    AddRegister { x: u8, y: u8 },
    /// 8XY5
    SubRegister { x: u8, y: u8 },
    /// 8XY6
    ShiftRight { x: u8, y: u8 },
    /// 8XY7
    ReverseSubRegister { x: u8, y: u8 },
    /// 8XYE
    ShiftLeft { x: u8, y: u8 },
    /// 9XY0
    SkipNotEqualRegister { x: u8, y: u8 },
    /// ANNN
    LoadIndex { nnn: u16 },
    /// BNNN
    JumpV0 { nnn: u16 },
    /// CXNN
    Random { x: u8, nn: u8 },
    /// DXYN
    DrawSprite { x: u8, y: u8, n: u8 },
    /// EX9E
    SkipPressed { x: u8 },
    /// EXA1
    SkipNotPressed { x: u8 },
    /// FX07
    LoadDelayTimer { x: u8 },
    /// FX0A
    WaitKey { x: u8 },
    /// FX15
    SetDelayTimer { x: u8 },
    /// FX18
    SetSoundTimer { x: u8 },
    /// FX1E
    AddIndex { x: u8 },
    /// FX29
    LoadGlyph { x: u8 },
    /// FX33
    StoreBcd { x: u8 },
    /// FX55
    StoreRegisters { x: u8 },
    /// FX65
    LoadRegisters { x: u8 },
}

/// turn an instruction word into an instruction, or None if it isn't one
pub fn decode(word: u16) -> Option<Instruction> {
    use Instruction::*;

    let op = word & 0xF000;
    let x = ((word >> 8) & 0xF) as u8;
    let y = ((word >> 4) & 0xF) as u8;
    let n = (word & 0xF) as u8;
    let nn = (word & 0xFF) as u8;
    let nnn = word & 0xFFF;

    let instruction = match op {
        0x0000 => match nn {
            0xE0 => ClearScreen,
            0xEE => Return,
            _ => return None,
        },
        0x1000 => Jump { nnn },
        0x2000 => Call { nnn },
        0x3000 => SkipEqual { x, nn },
        0x4000 => SkipNotEqual { x, nn },
        0x5000 => SkipEqualRegister { x, y },
        0x6000 => Load { x, nn },
        0x7000 => Add { x, nn },
        0x8000 => match n {
            0x0 => LoadRegister { x, y },
            0x1 => Or { x, y },
            0x2 => And { x, y },
            0x3 => Xor { x, y },
            0x4 => AddRegister { x, y },
            0x5 => SubRegister { x, y },
            0x6 => ShiftRight { x, y },
            0x7 => ReverseSubRegister { x, y },
            0xE => ShiftLeft { x, y },
            _ => return None,
        },
        0x9000 => SkipNotEqualRegister { x, y },
        0xA000 => LoadIndex { nnn },
        0xB000 => JumpV0 { nnn },
        0xC000 => Random { x, nn },
        0xD000 => DrawSprite { x, y, n },
        0xE000 => match nn {
            0x9E => SkipPressed { x },
            0xA1 => SkipNotPressed { x },
            _ => return None,
        },
        0xF000 => match nn {
            0x07 => LoadDelayTimer { x },
            0x0A => WaitKey { x },
            0x15 => SetDelayTimer { x },
            0x18 => SetSoundTimer { x },
            0x1E => AddIndex { x },
            0x29 => LoadGlyph { x },
            0x33 => StoreBcd { x },
            0x55 => StoreRegisters { x },
            0x65 => LoadRegisters { x },
            _ => return None,
        },
        _ => return None,
    };
    Some(instruction)
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Instruction::*;

        match *self {
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump { nnn } => write!(f, "JP {:03x}", nnn),
            Call { nnn } => write!(f, "CALL {:03x}", nnn),
            SkipEqual { x, nn } => write!(f, "SE V{:x},{:02x}", x, nn),
            SkipNotEqual { x, nn } => write!(f, "SNE V{:x},{:02x}", x, nn),
            SkipEqualRegister { x, y } => write!(f, "SE V{:x},V{:x}", x, y),
            Load { x, nn } => write!(f, "LD V{:x},{:02x}", x, nn),
            Add { x, nn } => write!(f, "ADD V{:x},{:02x}", x, nn),
            LoadRegister { x, y } => write!(f, "LD V{:x},V{:x}", x, y),
            Or { x, y } => write!(f, "OR V{:x},V{:x}", x, y),
            And { x, y } => write!(f, "AND V{:x},V{:x}", x, y),
            Xor { x, y } => write!(f, "XOR V{:x},V{:x}", x, y),
            AddRegister { x, y } => write!(f, "ADD V{:x},V{:x}", x, y),
            SubRegister { x, y } => write!(f, "SUB V{:x},V{:x}", x, y),
            ShiftRight { x, y } => write!(f, "SHR V{:x},V{:x}", x, y),
            ReverseSubRegister { x, y } => write!(f, "SUBN V{:x},V{:x}", x, y),
            ShiftLeft { x, y } => write!(f, "SHL V{:x},V{:x}", x, y),
            SkipNotEqualRegister { x, y } => write!(f, "SNE V{:x},V{:x}", x, y),
            LoadIndex { nnn } => write!(f, "LD I,{:03x}", nnn),
            JumpV0 { nnn } => write!(f, "JP V0,{:03x}", nnn),
            Random { x, nn } => write!(f, "RND V{:x},{:02x}", x, nn),
            DrawSprite { x, y, n } => write!(f, "DRW V{:x},V{:x},{:x}", x, y, n),
            SkipPressed { x } => write!(f, "SKP V{:x}", x),
            SkipNotPressed { x } => write!(f, "SKNP V{:x}", x),
            LoadDelayTimer { x } => write!(f, "LD V{:x},DT", x),
            WaitKey { x } => write!(f, "LD V{:x},K", x),
            SetDelayTimer { x } => write!(f, "LD DT,V{:x}", x),
            SetSoundTimer { x } => write!(f, "LD ST,V{:x}", x),
            AddIndex { x } => write!(f, "ADD I,V{:x}", x),
            LoadGlyph { x } => write!(f, "LD F,V{:x}", x),
            StoreBcd { x } => write!(f, "LD B,V{:x}", x),
            StoreRegisters { x } => write!(f, "LD [I],V{:x}", x),
            LoadRegisters { x } => write!(f, "LD V{:x},[I]", x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Instruction::*;
    use super::*;

    #[test]
    fn test_decode_clear_screen() {
        assert_eq!(decode(0x00E0), Some(ClearScreen));
    }

    #[test]
    fn test_decode_invalid() {
        assert_eq!(decode(0xFFFF), None);
        // 0NNN machine routines aren't supported
        assert_eq!(decode(0x0123), None);
        assert_eq!(decode(0x8008), None);
        assert_eq!(decode(0xE000), None);
        assert_eq!(decode(0xF0FF), None);
    }

    #[test]
    fn test_decode_table() {
        let table = [
            (0x00EE, Return),
            (0x1ABC, Jump { nnn: 0xABC }),
            (0x2ABC, Call { nnn: 0xABC }),
            (0x3A12, SkipEqual { x: 0xA, nn: 0x12 }),
            (0x4A12, SkipNotEqual { x: 0xA, nn: 0x12 }),
            (0x5AB0, SkipEqualRegister { x: 0xA, y: 0xB }),
            (0x6A12, Load { x: 0xA, nn: 0x12 }),
            (0x7A12, Add { x: 0xA, nn: 0x12 }),
            (0x8AB0, LoadRegister { x: 0xA, y: 0xB }),
            (0x8AB1, Or { x: 0xA, y: 0xB }),
            (0x8AB2, And { x: 0xA, y: 0xB }),
            (0x8AB3, Xor { x: 0xA, y: 0xB }),
            (0x8AB4, AddRegister { x: 0xA, y: 0xB }),
            (0x8AB5, SubRegister { x: 0xA, y: 0xB }),
            (0x8AB6, ShiftRight { x: 0xA, y: 0xB }),
            (0x8AB7, ReverseSubRegister { x: 0xA, y: 0xB }),
            (0x8ABE, ShiftLeft { x: 0xA, y: 0xB }),
            (0x9AB0, SkipNotEqualRegister { x: 0xA, y: 0xB }),
            (0xAABC, LoadIndex { nnn: 0xABC }),
            (0xBABC, JumpV0 { nnn: 0xABC }),
            (0xCA12, Random { x: 0xA, nn: 0x12 }),
            (0xDAB5, DrawSprite { x: 0xA, y: 0xB, n: 5 }),
            (0xEA9E, SkipPressed { x: 0xA }),
            (0xEAA1, SkipNotPressed { x: 0xA }),
            (0xFA07, LoadDelayTimer { x: 0xA }),
            (0xFA0A, WaitKey { x: 0xA }),
            (0xFA15, SetDelayTimer { x: 0xA }),
            (0xFA18, SetSoundTimer { x: 0xA }),
            (0xFA1E, AddIndex { x: 0xA }),
            (0xFA29, LoadGlyph { x: 0xA }),
            (0xFA33, StoreBcd { x: 0xA }),
            (0xFA55, StoreRegisters { x: 0xA }),
            (0xFA65, LoadRegisters { x: 0xA }),
        ];
        for (word, expected) in table {
            assert_eq!(decode(word), Some(expected), "decoding {:04x}", word);
        }
    }

    #[test]
    fn test_5xy_and_9xy_ignore_low_nibble() {
        // the base set doesn't look at n for these
        assert_eq!(decode(0x5AB1), Some(SkipEqualRegister { x: 0xA, y: 0xB }));
        assert_eq!(decode(0x9AB7), Some(SkipNotEqualRegister { x: 0xA, y: 0xB }));
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(decode(0x00E0).unwrap().to_string(), "CLS");
        assert_eq!(decode(0x2ABC).unwrap().to_string(), "CALL abc");
        assert_eq!(decode(0xD125).unwrap().to_string(), "DRW V1,V2,5");
        assert_eq!(decode(0xF355).unwrap().to_string(), "LD [I],V3");
        assert_eq!(decode(0x8017).unwrap().to_string(), "SUBN V0,V1");
    }
}
