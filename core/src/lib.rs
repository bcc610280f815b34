pub mod audio;
pub mod clock;
pub mod core;
pub mod host;
pub mod keypad;
pub mod platform;
pub mod scheduler;
pub mod tone;
pub mod video;

pub mod prelude {
    pub use crate::audio::{AudioController, AudioState, SilentOutput, ToneOutput};
    pub use crate::clock::{Clock, ClockSample, ManualClock, MonotonicClock};
    pub use crate::core::{
        FrameBuffer, KeyCode, LoadError, Machine, OperationClass, OperationDescriptor,
    };
    pub use crate::host::{Host, HostError, Iteration};
    pub use crate::keypad::{KeyLatch, PhysicalKey};
    pub use crate::platform::{EventSource, HostEvent, PlatformError, Screen};
    pub use crate::scheduler::Scheduler;
    pub use crate::tone::{ToneBuffer, ToneLoop};
    pub use crate::video::{Frame, FrameRenderer, Palette, Rgb};
}
