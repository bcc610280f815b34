pub mod framebuffer;
pub mod keycode;
pub mod machine;

pub use framebuffer::{DISPLAY_HEIGHT, DISPLAY_WIDTH, FrameBuffer};
pub use keycode::KeyCode;
pub use machine::{LoadError, Machine, OperationClass, OperationDescriptor};
