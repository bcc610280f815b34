//! CHIP-8 instruction decoding.
//!
//! Register operands are indices 0x0-0xF into V0-VF. Addresses are 12-bit.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    Clear,
    /// 00EE
    Return,
    /// 0nnn: native routine call, ignored.
    Sys(u16),
    /// 1nnn
    Jump(u16),
    /// 2nnn
    Call(u16),
    /// 3xnn: skip if Vx == nn
    SkipEqImm { x: usize, nn: u8 },
    /// 4xnn: skip if Vx != nn
    SkipNeImm { x: usize, nn: u8 },
    /// 5xyN: skip if Vx == Vy (N is ignored)
    SkipEqReg { x: usize, y: usize },
    /// 6xnn: Vx = nn
    LoadImm { x: usize, nn: u8 },
    /// 7xnn: Vx += nn, no carry
    AddImm { x: usize, nn: u8 },
    /// 8xy0
    Move { x: usize, y: usize },
    /// 8xy1
    Or { x: usize, y: usize },
    /// 8xy2
    And { x: usize, y: usize },
    /// 8xy3
    Xor { x: usize, y: usize },
    /// 8xy4: VF = carry
    AddReg { x: usize, y: usize },
    /// 8xy5: Vx -= Vy, VF = no borrow
    Sub { x: usize, y: usize },
    /// 8xy6: Vx >>= 1, VF = shifted-out bit
    ShiftRight { x: usize },
    /// 8xy7: Vx = Vy - Vx, VF = no borrow
    SubReversed { x: usize, y: usize },
    /// 8xyE: Vx <<= 1, VF = shifted-out bit
    ShiftLeft { x: usize },
    /// 9xyN: skip if Vx != Vy (N is ignored)
    SkipNeReg { x: usize, y: usize },
    /// Annn: I = nnn
    LoadIndex(u16),
    /// Bnnn: jump to V0 + nnn
    JumpOffset(u16),
    /// Cxnn: Vx = random & nn
    Random { x: usize, mask: u8 },
    /// Dxyn: draw n-row sprite from I at (Vx, Vy)
    Draw { x: usize, y: usize, rows: usize },
    /// Ex9E
    SkipKeyDown { x: usize },
    /// ExA1
    SkipKeyUp { x: usize },
    /// Fx07: Vx = DT
    ReadDelay { x: usize },
    /// Fx0A: block until a key is held, store it in Vx
    WaitKey { x: usize },
    /// Fx15: DT = Vx
    SetDelay { x: usize },
    /// Fx18: ST = Vx
    SetSound { x: usize },
    /// Fx1E: I += Vx
    AddIndex { x: usize },
    /// Fx29: I = font glyph for Vx
    FontGlyph { x: usize },
    /// Fx33: BCD of Vx at I..I+3
    Bcd { x: usize },
    /// Fx55: store V0..=Vx at I
    StoreRegs { x: usize },
    /// Fx65: load V0..=Vx from I
    LoadRegs { x: usize },
    /// Anything else.
    Invalid(u16),
}

impl Instruction {
    pub fn decode(opcode: u16) -> Self {
        let x = ((opcode >> 8) & 0xF) as usize;
        let y = ((opcode >> 4) & 0xF) as usize;
        let n = (opcode & 0xF) as usize;
        let nn = (opcode & 0xFF) as u8;
        let nnn = opcode & 0x0FFF;

        match opcode >> 12 {
            0x0 => match opcode {
                0x00E0 => Self::Clear,
                0x00EE => Self::Return,
                _ => Self::Sys(nnn),
            },
            0x1 => Self::Jump(nnn),
            0x2 => Self::Call(nnn),
            0x3 => Self::SkipEqImm { x, nn },
            0x4 => Self::SkipNeImm { x, nn },
            0x5 => Self::SkipEqReg { x, y },
            0x6 => Self::LoadImm { x, nn },
            0x7 => Self::AddImm { x, nn },
            0x8 => match n {
                0x0 => Self::Move { x, y },
                0x1 => Self::Or { x, y },
                0x2 => Self::And { x, y },
                0x3 => Self::Xor { x, y },
                0x4 => Self::AddReg { x, y },
                0x5 => Self::Sub { x, y },
                0x6 => Self::ShiftRight { x },
                0x7 => Self::SubReversed { x, y },
                0xE => Self::ShiftLeft { x },
                _ => Self::Invalid(opcode),
            },
            0x9 => Self::SkipNeReg { x, y },
            0xA => Self::LoadIndex(nnn),
            0xB => Self::JumpOffset(nnn),
            0xC => Self::Random { x, mask: nn },
            0xD => Self::Draw { x, y, rows: n },
            0xE => match nn {
                0x9E => Self::SkipKeyDown { x },
                0xA1 => Self::SkipKeyUp { x },
                _ => Self::Invalid(opcode),
            },
            0xF => match nn {
                0x07 => Self::ReadDelay { x },
                0x0A => Self::WaitKey { x },
                0x15 => Self::SetDelay { x },
                0x18 => Self::SetSound { x },
                0x1E => Self::AddIndex { x },
                0x29 => Self::FontGlyph { x },
                0x33 => Self::Bcd { x },
                0x55 => Self::StoreRegs { x },
                0x65 => Self::LoadRegs { x },
                _ => Self::Invalid(opcode),
            },
            _ => Self::Invalid(opcode),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Clear => write!(f, "CLS"),
            Self::Return => write!(f, "RET"),
            Self::Sys(a) => write!(f, "SYS ${a:03X}"),
            Self::Jump(a) => write!(f, "JP ${a:03X}"),
            Self::Call(a) => write!(f, "CALL ${a:03X}"),
            Self::SkipEqImm { x, nn } => write!(f, "SE V{x:X}, ${nn:02X}"),
            Self::SkipNeImm { x, nn } => write!(f, "SNE V{x:X}, ${nn:02X}"),
            Self::SkipEqReg { x, y } => write!(f, "SE V{x:X}, V{y:X}"),
            Self::LoadImm { x, nn } => write!(f, "LD V{x:X}, ${nn:02X}"),
            Self::AddImm { x, nn } => write!(f, "ADD V{x:X}, ${nn:02X}"),
            Self::Move { x, y } => write!(f, "LD V{x:X}, V{y:X}"),
            Self::Or { x, y } => write!(f, "OR V{x:X}, V{y:X}"),
            Self::And { x, y } => write!(f, "AND V{x:X}, V{y:X}"),
            Self::Xor { x, y } => write!(f, "XOR V{x:X}, V{y:X}"),
            Self::AddReg { x, y } => write!(f, "ADD V{x:X}, V{y:X}"),
            Self::Sub { x, y } => write!(f, "SUB V{x:X}, V{y:X}"),
            Self::ShiftRight { x } => write!(f, "SHR V{x:X}"),
            Self::SubReversed { x, y } => write!(f, "SUBN V{x:X}, V{y:X}"),
            Self::ShiftLeft { x } => write!(f, "SHL V{x:X}"),
            Self::SkipNeReg { x, y } => write!(f, "SNE V{x:X}, V{y:X}"),
            Self::LoadIndex(a) => write!(f, "LD I, ${a:03X}"),
            Self::JumpOffset(a) => write!(f, "JP V0, ${a:03X}"),
            Self::Random { x, mask } => write!(f, "RND V{x:X}, ${mask:02X}"),
            Self::Draw { x, y, rows } => write!(f, "DRW V{x:X}, V{y:X}, {rows}"),
            Self::SkipKeyDown { x } => write!(f, "SKP V{x:X}"),
            Self::SkipKeyUp { x } => write!(f, "SKNP V{x:X}"),
            Self::ReadDelay { x } => write!(f, "LD V{x:X}, DT"),
            Self::WaitKey { x } => write!(f, "LD V{x:X}, K"),
            Self::SetDelay { x } => write!(f, "LD DT, V{x:X}"),
            Self::SetSound { x } => write!(f, "LD ST, V{x:X}"),
            Self::AddIndex { x } => write!(f, "ADD I, V{x:X}"),
            Self::FontGlyph { x } => write!(f, "LD F, V{x:X}"),
            Self::Bcd { x } => write!(f, "LD B, V{x:X}"),
            Self::StoreRegs { x } => write!(f, "LD [I], V{x:X}"),
            Self::LoadRegs { x } => write!(f, "LD V{x:X}, [I]"),
            Self::Invalid(op) => write!(f, "??? ${op:04X}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_screen_ops() {
        assert_eq!(Instruction::decode(0x00E0), Instruction::Clear);
        assert_eq!(
            Instruction::decode(0xD12F),
            Instruction::Draw {
                x: 1,
                y: 2,
                rows: 15
            }
        );
    }

    #[test]
    fn decodes_operand_fields() {
        assert_eq!(Instruction::decode(0x1ABC), Instruction::Jump(0xABC));
        assert_eq!(
            Instruction::decode(0x3A42),
            Instruction::SkipEqImm { x: 0xA, nn: 0x42 }
        );
        assert_eq!(Instruction::decode(0x8AB4), Instruction::AddReg { x: 0xA, y: 0xB });
        assert_eq!(Instruction::decode(0x8A0E), Instruction::ShiftLeft { x: 0xA });
        assert_eq!(Instruction::decode(0xF733), Instruction::Bcd { x: 7 });
        assert_eq!(Instruction::decode(0x0123), Instruction::Sys(0x123));
    }

    #[test]
    fn unknown_encodings_are_invalid() {
        for op in [0x8008, 0x800F, 0xE100, 0xF0FF] {
            assert_eq!(Instruction::decode(op), Instruction::Invalid(op), "{op:04X}");
        }
    }

    #[test]
    fn register_skips_ignore_low_nibble() {
        assert_eq!(Instruction::decode(0x5121), Instruction::SkipEqReg { x: 1, y: 2 });
        assert_eq!(Instruction::decode(0x912F), Instruction::SkipNeReg { x: 1, y: 2 });
    }

    #[test]
    fn disassembles() {
        assert_eq!(Instruction::decode(0x00EE).to_string(), "RET");
        assert_eq!(Instruction::decode(0x6A05).to_string(), "LD VA, $05");
        assert_eq!(Instruction::decode(0xD015).to_string(), "DRW V0, V1, 5");
        assert_eq!(Instruction::decode(0xF065).to_string(), "LD V0, [I]");
        assert_eq!(Instruction::decode(0xFFFF).to_string(), "??? $FFFF");
    }
}
