pub mod chip8;
pub mod instruction;
pub mod rom_loader;

pub use chip8::{Chip8Error, Chip8State, Chip8System};
pub use instruction::Instruction;
