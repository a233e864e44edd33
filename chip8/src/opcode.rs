use std::fmt::Display as FmtDisplay;

/// The nibble and byte fields of a raw instruction word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub raw: u16,
    pub c: u8,
    pub x: u8,
    pub y: u8,
    pub n: u8,
    pub nn: u8,
    pub nnn: u16,
}

impl From<u16> for Opcode {
    fn from(raw: u16) -> Self {
        Self {
            raw,
            c: ((raw & 0xF000) >> 12) as u8,
            x: ((raw & 0x0F00) >> 8) as u8,
            y: ((raw & 0x00F0) >> 4) as u8,
            n: (raw & 0x000F) as u8,
            nn: (raw & 0x00FF) as u8,
            nnn: raw & 0x0FFF,
        }
    }
}

impl FmtDisplay for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04X}", self.raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    Cls,
    /// 00EE
    Return,
    /// 1NNN
    Jump(u16),
    /// 2NNN
    Call(u16),
    /// 3XNN
    SkipEq(u8, u8),
    /// 4XNN
    SkipNe(u8, u8),
    /// 5XY0
    SkipRegEq(u8, u8),
    /// 6XNN
    Set(u8, u8),
    /// 7XNN
    Add(u8, u8),
    /// 8XY0
    RegSet(u8, u8),
    /// 8XY1
    RegOr(u8, u8),
    /// 8XY2
    RegAnd(u8, u8),
    /// 8XY3
    RegXor(u8, u8),
    /// 8XY4
    RegAdd(u8, u8),
    /// 8XY5
    RegSubRight(u8, u8),
    /// 8XY6
    RegShiftRight(u8, u8),
    /// 8XY7
    RegSubLeft(u8, u8),
    /// 8XYE
    RegShiftLeft(u8, u8),
    /// 9XY0
    SkipRegNe(u8, u8),
    /// ANNN
    SetIndex(u16),
    /// BNNN
    JumpWithOffset(u16, u8),
    /// CXNN
    Random(u8, u8),
    /// DXYN
    Draw(u8, u8, u8),
    /// EX9E
    SkipIfKeyDown(u8),
    /// EXA1
    SkipIfKeyUp(u8),
    /// FX07
    DelayGet(u8),
    /// FX0A
    GetKey(u8),
    /// FX15
    DelaySet(u8),
    /// FX18
    SoundSet(u8),
    /// FX1E
    AddToIndex(u8),
    /// FX29
    FontCharacter(u8),
    /// FX33
    Bcd(u8),
    /// FX55
    MemoryStore(u8),
    /// FX65
    MemoryLoad(u8),
}

impl Instruction {
    /// Decode an instruction word, returning None when it matches no known operation
    pub fn decode(opcode: Opcode) -> Option<Self> {
        let Opcode {
            c, x, y, n, nn, nnn, ..
        } = opcode;

        let instruction = match c {
            0x0 => match opcode.raw {
                0x00E0 => Self::Cls,
                0x00EE => Self::Return,
                _ => return None,
            },
            0x1 => Self::Jump(nnn),
            0x2 => Self::Call(nnn),
            0x3 => Self::SkipEq(x, nn),
            0x4 => Self::SkipNe(x, nn),
            0x5 if n == 0 => Self::SkipRegEq(x, y),
            0x6 => Self::Set(x, nn),
            0x7 => Self::Add(x, nn),
            0x8 => match n {
                0x0 => Self::RegSet(x, y),
                0x1 => Self::RegOr(x, y),
                0x2 => Self::RegAnd(x, y),
                0x3 => Self::RegXor(x, y),
                0x4 => Self::RegAdd(x, y),
                0x5 => Self::RegSubRight(x, y),
                0x6 => Self::RegShiftRight(x, y),
                0x7 => Self::RegSubLeft(x, y),
                0xE => Self::RegShiftLeft(x, y),
                _ => return None,
            },
            0x9 if n == 0 => Self::SkipRegNe(x, y),
            0xA => Self::SetIndex(nnn),
            0xB => Self::JumpWithOffset(nnn, x),
            0xC => Self::Random(x, nn),
            0xD => Self::Draw(x, y, n),
            0xE => match nn {
                0x9E => Self::SkipIfKeyDown(x),
                0xA1 => Self::SkipIfKeyUp(x),
                _ => return None,
            },
            0xF => match nn {
                0x07 => Self::DelayGet(x),
                0x0A => Self::GetKey(x),
                0x15 => Self::DelaySet(x),
                0x18 => Self::SoundSet(x),
                0x1E => Self::AddToIndex(x),
                0x29 => Self::FontCharacter(x),
                0x33 => Self::Bcd(x),
                0x55 => Self::MemoryStore(x),
                0x65 => Self::MemoryLoad(x),
                _ => return None,
            },
            _ => return None,
        };
        Some(instruction)
    }
}
