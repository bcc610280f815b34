//! Seams between the host loop and the windowing/input platform.

use crate::keypad::PhysicalKey;
use crate::video::Frame;

/// Input event, already translated out of the platform's representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    /// Window closed or the user asked to leave.
    Quit,
    KeyDown(PhysicalKey),
    KeyUp(PhysicalKey),
}

/// Queue of pending input events.
pub trait EventSource {
    /// Next pending event, or `None` once the queue is empty. Never blocks.
    fn poll_event(&mut self) -> Option<HostEvent>;
}

/// Display surface the rendered frames go to.
pub trait Screen {
    /// Surface size in pixels; frames are rendered at exactly this size.
    fn size(&self) -> (u32, u32);

    /// Replace the whole surface with `frame`, anchored at (0, 0).
    fn blit(&mut self, frame: &Frame) -> Result<(), PlatformError>;

    /// Flip the surface to the window.
    fn present(&mut self) -> Result<(), PlatformError>;
}

/// Failure reported by the windowing or audio platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    Init(String),
    Video(String),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "platform init failed: {msg}"),
            Self::Video(msg) => write!(f, "video error: {msg}"),
        }
    }
}

impl std::error::Error for PlatformError {}
