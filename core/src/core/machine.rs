use std::path::Path;

use super::framebuffer::FrameBuffer;
use super::keycode::KeyCode;

/// How an executed instruction touched the display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationClass {
    /// Sprite draw.
    Draw,
    /// Whole-screen clear.
    Clear,
    /// Anything that leaves the framebuffer alone.
    Other,
}

/// Describes the instruction executed by a single [`Machine::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OperationDescriptor {
    /// Address the instruction was fetched from.
    pub address: u16,
    /// Raw instruction word.
    pub opcode: u16,
    pub class: OperationClass,
}

impl OperationDescriptor {
    pub fn new(address: u16, opcode: u16, class: OperationClass) -> Self {
        Self {
            address,
            opcode,
            class,
        }
    }

    /// True for sprite draws and screen clears, the only operations after
    /// which the host re-renders the framebuffer.
    pub fn is_draw_class(&self) -> bool {
        matches!(self.class, OperationClass::Draw | OperationClass::Clear)
    }
}

/// Errors that can occur when loading a program into a machine.
#[derive(Debug)]
pub enum LoadError {
    /// Underlying I/O error (file not found, permission denied, etc.)
    Io(std::io::Error),

    /// Program does not fit in the machine's program memory.
    TooLarge { size: usize, capacity: usize },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::TooLarge { size, capacity } => write!(
                f,
                "program is {size} bytes, program memory holds {capacity}"
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::TooLarge { .. } => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Interface the host loop drives.
///
/// The host knows nothing about the instruction set, memory map, or
/// registers. It only loads a program, advances execution one instruction at
/// a time, ticks the timers at their own cadence, forwards keypad transitions,
/// and reads back the framebuffer and the sound-timer state.
pub trait Machine {
    /// Fatal execution error (invalid opcode, stack fault, ...). The host
    /// stops the loop when a step returns one.
    type Error: std::error::Error + 'static;

    /// Load a program file into memory, returning the number of bytes loaded.
    fn load(&mut self, path: &Path) -> Result<usize, LoadError>;

    /// Reset the machine to its power-on state, keeping the loaded program.
    fn reset(&mut self);

    /// Execute exactly one instruction.
    fn step(&mut self) -> Result<OperationDescriptor, Self::Error>;

    /// Decrement the delay and sound timers by one, floored at zero.
    fn tick(&mut self);

    /// Latch the held state of one logical keypad key.
    fn key_event(&mut self, code: KeyCode, pressed: bool);

    /// Current 64x32 monochrome display contents.
    fn framebuffer(&self) -> &FrameBuffer;

    /// True while the sound timer is nonzero.
    fn sound_timer_active(&self) -> bool;
}
