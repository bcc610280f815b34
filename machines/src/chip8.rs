use std::fmt;
use std::path::Path;

use chipbox_core::core::{
    FrameBuffer, KeyCode, LoadError, Machine, OperationClass, OperationDescriptor,
};
use rand::Rng;
use tracing::{info, trace};

use crate::instruction::Instruction;
use crate::rom_loader::ProgramImage;

// ---------------------------------------------------------------------------
// Memory map
// ---------------------------------------------------------------------------

pub const MEMORY_SIZE: usize = 0x1000;

/// Programs are loaded and start executing here.
pub const PROGRAM_START: u16 = 0x200;

pub const PROGRAM_CAPACITY: usize = MEMORY_SIZE - PROGRAM_START as usize;

pub const STACK_DEPTH: usize = 16;

/// Built-in hex digit glyphs, 4x5 pixels each, stored at address 0.
const FONT: [u8; 80] = [
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

const GLYPH_BYTES: u16 = 5;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Conditions that halt execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chip8Error {
    InvalidOpcode { address: u16, opcode: u16 },
    StackOverflow { address: u16 },
    StackUnderflow { address: u16 },
    /// An instruction fetch or memory operand ran past the end of RAM.
    AddressOutOfRange { address: u16, target: usize },
}

impl fmt::Display for Chip8Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOpcode { address, opcode } => {
                write!(f, "invalid opcode ${opcode:04X} at ${address:03X}")
            }
            Self::StackOverflow { address } => {
                write!(f, "call stack overflow at ${address:03X}")
            }
            Self::StackUnderflow { address } => {
                write!(f, "return with empty call stack at ${address:03X}")
            }
            Self::AddressOutOfRange { address, target } => {
                write!(f, "memory access ${target:04X} out of range at ${address:03X}")
            }
        }
    }
}

impl std::error::Error for Chip8Error {}

// ---------------------------------------------------------------------------
// Register snapshot
// ---------------------------------------------------------------------------

/// Copy of the register file, for tests and debug output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chip8State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: usize,
    pub dt: u8,
    pub st: u8,
}

impl fmt::Display for Chip8State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PC:${:03X} SP:{} I:${:03X} ", self.pc, self.sp, self.i)?;
        write!(f, "DT:${:02X} ST:${:02X} V:", self.dt, self.st)?;
        for r in self.v {
            write!(f, "{r:02X}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Chip8System
// ---------------------------------------------------------------------------

pub struct Chip8System {
    v: [u8; 16],
    i: u16,
    pc: u16,
    stack: Vec<u16>,
    dt: u8,
    st: u8,
    ram: [u8; MEMORY_SIZE],
    framebuffer: FrameBuffer,
    keys: [bool; KeyCode::COUNT],
    program: Vec<u8>,
}

impl Default for Chip8System {
    fn default() -> Self {
        let mut sys = Self {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            stack: Vec::with_capacity(STACK_DEPTH),
            dt: 0,
            st: 0,
            ram: [0; MEMORY_SIZE],
            framebuffer: FrameBuffer::new(),
            keys: [false; KeyCode::COUNT],
            program: Vec::new(),
        };
        sys.reset();
        sys
    }
}

impl Chip8System {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a program from memory and reset. Returns the bytes loaded.
    pub fn load_program(&mut self, data: &[u8]) -> Result<usize, LoadError> {
        let image = ProgramImage::from_bytes(data.to_vec(), PROGRAM_CAPACITY)?;
        Ok(self.install(image))
    }

    pub fn state(&self) -> Chip8State {
        Chip8State {
            v: self.v,
            i: self.i,
            pc: self.pc,
            sp: self.stack.len(),
            dt: self.dt,
            st: self.st,
        }
    }

    pub fn memory(&self) -> &[u8] {
        &self.ram
    }

    pub fn is_key_down(&self, code: KeyCode) -> bool {
        self.keys[code.index()]
    }

    fn install(&mut self, image: ProgramImage) -> usize {
        let len = image.len();
        info!(bytes = len, crc32 = format_args!("{:08X}", image.crc32()), "program loaded");
        self.program = image.data().to_vec();
        self.reset();
        len
    }

    fn fetch(&self) -> Result<u16, Chip8Error> {
        let addr = self.pc as usize;
        if addr + 1 >= MEMORY_SIZE {
            return Err(Chip8Error::AddressOutOfRange {
                address: self.pc,
                target: addr + 1,
            });
        }
        Ok(u16::from_be_bytes([self.ram[addr], self.ram[addr + 1]]))
    }

    /// Bounds-checked RAM range `I..I+len` for the instruction at `address`.
    fn index_range(&self, address: u16, len: usize) -> Result<std::ops::Range<usize>, Chip8Error> {
        let start = self.i as usize;
        let end = start + len;
        if end > MEMORY_SIZE {
            return Err(Chip8Error::AddressOutOfRange {
                address,
                target: end - 1,
            });
        }
        Ok(start..end)
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc = self.pc.wrapping_add(2);
        }
    }

    fn draw(&mut self, address: u16, x: usize, y: usize, rows: usize) -> Result<(), Chip8Error> {
        let sprite = self.index_range(address, rows)?;
        let px = self.v[x] as usize;
        let py = self.v[y] as usize;
        let mut collision = false;
        for (row, addr) in sprite.enumerate() {
            let bits = self.ram[addr];
            for col in 0..8 {
                if bits & (0x80 >> col) != 0 {
                    collision |= self.framebuffer.toggle(px + col, py + row);
                }
            }
        }
        self.v[0xF] = collision as u8;
        Ok(())
    }

    fn execute(&mut self, address: u16, instruction: Instruction) -> Result<(), Chip8Error> {
        match instruction {
            Instruction::Clear => self.framebuffer.clear(),
            Instruction::Return => {
                self.pc = self
                    .stack
                    .pop()
                    .ok_or(Chip8Error::StackUnderflow { address })?;
            }
            Instruction::Sys(_) => {}
            Instruction::Jump(target) => self.pc = target,
            Instruction::Call(target) => {
                if self.stack.len() == STACK_DEPTH {
                    return Err(Chip8Error::StackOverflow { address });
                }
                self.stack.push(self.pc);
                self.pc = target;
            }
            Instruction::SkipEqImm { x, nn } => self.skip_if(self.v[x] == nn),
            Instruction::SkipNeImm { x, nn } => self.skip_if(self.v[x] != nn),
            Instruction::SkipEqReg { x, y } => self.skip_if(self.v[x] == self.v[y]),
            Instruction::LoadImm { x, nn } => self.v[x] = nn,
            Instruction::AddImm { x, nn } => self.v[x] = self.v[x].wrapping_add(nn),
            Instruction::Move { x, y } => self.v[x] = self.v[y],
            Instruction::Or { x, y } => self.v[x] |= self.v[y],
            Instruction::And { x, y } => self.v[x] &= self.v[y],
            Instruction::Xor { x, y } => self.v[x] ^= self.v[y],
            Instruction::AddReg { x, y } => {
                let (sum, carry) = self.v[x].overflowing_add(self.v[y]);
                self.v[x] = sum;
                self.v[0xF] = carry as u8;
            }
            Instruction::Sub { x, y } => {
                let (diff, borrow) = self.v[x].overflowing_sub(self.v[y]);
                self.v[x] = diff;
                self.v[0xF] = !borrow as u8;
            }
            Instruction::ShiftRight { x } => {
                let out = self.v[x] & 0x01;
                self.v[x] >>= 1;
                self.v[0xF] = out;
            }
            Instruction::SubReversed { x, y } => {
                let (diff, borrow) = self.v[y].overflowing_sub(self.v[x]);
                self.v[x] = diff;
                self.v[0xF] = !borrow as u8;
            }
            Instruction::ShiftLeft { x } => {
                let out = self.v[x] >> 7;
                self.v[x] <<= 1;
                self.v[0xF] = out;
            }
            Instruction::SkipNeReg { x, y } => self.skip_if(self.v[x] != self.v[y]),
            Instruction::LoadIndex(nnn) => self.i = nnn,
            Instruction::JumpOffset(nnn) => self.pc = nnn + self.v[0] as u16,
            Instruction::Random { x, mask } => self.v[x] = rand::thread_rng().r#gen::<u8>() & mask,
            Instruction::Draw { x, y, rows } => self.draw(address, x, y, rows)?,
            Instruction::SkipKeyDown { x } => {
                self.skip_if(self.keys[(self.v[x] & 0xF) as usize]);
            }
            Instruction::SkipKeyUp { x } => {
                self.skip_if(!self.keys[(self.v[x] & 0xF) as usize]);
            }
            Instruction::ReadDelay { x } => self.v[x] = self.dt,
            Instruction::WaitKey { x } => match self.keys.iter().position(|&held| held) {
                Some(key) => self.v[x] = key as u8,
                // Re-execute this instruction until a key is held.
                None => self.pc = address,
            },
            Instruction::SetDelay { x } => self.dt = self.v[x],
            Instruction::SetSound { x } => self.st = self.v[x],
            Instruction::AddIndex { x } => self.i = self.i.wrapping_add(self.v[x] as u16),
            Instruction::FontGlyph { x } => self.i = (self.v[x] & 0xF) as u16 * GLYPH_BYTES,
            Instruction::Bcd { x } => {
                let range = self.index_range(address, 3)?;
                let value = self.v[x];
                self.ram[range].copy_from_slice(&[value / 100, (value / 10) % 10, value % 10]);
            }
            Instruction::StoreRegs { x } => {
                let range = self.index_range(address, x + 1)?;
                self.ram[range].copy_from_slice(&self.v[..=x]);
            }
            Instruction::LoadRegs { x } => {
                let range = self.index_range(address, x + 1)?;
                self.v[..=x].copy_from_slice(&self.ram[range]);
            }
            Instruction::Invalid(opcode) => {
                return Err(Chip8Error::InvalidOpcode { address, opcode });
            }
        }
        Ok(())
    }
}

impl Machine for Chip8System {
    type Error = Chip8Error;

    fn load(&mut self, path: &Path) -> Result<usize, LoadError> {
        let image = ProgramImage::from_file(path, PROGRAM_CAPACITY)?;
        Ok(self.install(image))
    }

    fn reset(&mut self) {
        self.v = [0; 16];
        self.i = 0;
        self.pc = PROGRAM_START;
        self.stack.clear();
        self.dt = 0;
        self.st = 0;
        self.ram = [0; MEMORY_SIZE];
        self.ram[..FONT.len()].copy_from_slice(&FONT);
        let start = PROGRAM_START as usize;
        self.ram[start..start + self.program.len()].copy_from_slice(&self.program);
        self.framebuffer.clear();
        self.keys = [false; KeyCode::COUNT];
    }

    fn step(&mut self) -> Result<OperationDescriptor, Chip8Error> {
        let address = self.pc;
        let opcode = self.fetch()?;
        let instruction = Instruction::decode(opcode);
        trace!(pc = format_args!("{address:03X}"), op = %instruction);

        self.pc = self.pc.wrapping_add(2);
        self.execute(address, instruction)?;

        let class = match instruction {
            Instruction::Clear => OperationClass::Clear,
            Instruction::Draw { .. } => OperationClass::Draw,
            _ => OperationClass::Other,
        };
        Ok(OperationDescriptor::new(address, opcode, class))
    }

    fn tick(&mut self) {
        self.dt = self.dt.saturating_sub(1);
        self.st = self.st.saturating_sub(1);
    }

    fn key_event(&mut self, code: KeyCode, pressed: bool) {
        self.keys[code.index()] = pressed;
    }

    fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    fn sound_timer_active(&self) -> bool {
        self.st > 0
    }
}
