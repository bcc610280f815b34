#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

use chipbox_core::prelude::*;

/// Everything the host asked the machine to do, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Call {
    Key(u8, bool),
    Step,
    Tick,
}

#[derive(Debug)]
pub struct Fault;

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "scripted fault")
    }
}

impl std::error::Error for Fault {}

/// Machine double: records calls and replays a script of operation classes.
#[derive(Default)]
pub struct RecordingMachine {
    pub calls: Vec<Call>,
    pub script: VecDeque<Result<OperationClass, Fault>>,
    pub framebuffer: FrameBuffer,
    pub sound: bool,
}

impl RecordingMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(script: impl IntoIterator<Item = OperationClass>) -> Self {
        Self {
            script: script.into_iter().map(Ok).collect(),
            ..Self::default()
        }
    }

    pub fn key_calls(&self) -> Vec<(u8, bool)> {
        self.calls
            .iter()
            .filter_map(|c| match *c {
                Call::Key(code, pressed) => Some((code, pressed)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: Call) -> usize {
        self.calls.iter().filter(|&&c| c == call).count()
    }
}

impl Machine for RecordingMachine {
    type Error = Fault;

    fn load(&mut self, _path: &Path) -> Result<usize, LoadError> {
        Ok(0)
    }

    fn reset(&mut self) {}

    fn step(&mut self) -> Result<OperationDescriptor, Fault> {
        self.calls.push(Call::Step);
        let class = self.script.pop_front().unwrap_or(Ok(OperationClass::Other))?;
        Ok(OperationDescriptor::new(0x200, 0x0000, class))
    }

    fn tick(&mut self) {
        self.calls.push(Call::Tick);
    }

    fn key_event(&mut self, code: KeyCode, pressed: bool) {
        self.calls.push(Call::Key(code.value(), pressed));
    }

    fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    fn sound_timer_active(&self) -> bool {
        self.sound
    }
}

#[derive(Default)]
pub struct ScriptedEvents {
    pub pending: VecDeque<HostEvent>,
}

impl ScriptedEvents {
    pub fn push(&mut self, event: HostEvent) {
        self.pending.push_back(event);
    }
}

impl EventSource for ScriptedEvents {
    fn poll_event(&mut self) -> Option<HostEvent> {
        self.pending.pop_front()
    }
}

pub struct RecordingScreen {
    pub size: (u32, u32),
    pub blits: Vec<Frame>,
    pub presents: usize,
}

impl RecordingScreen {
    pub fn new(size: (u32, u32)) -> Self {
        Self {
            size,
            blits: Vec::new(),
            presents: 0,
        }
    }
}

impl Screen for RecordingScreen {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn blit(&mut self, frame: &Frame) -> Result<(), PlatformError> {
        self.blits.push(frame.clone());
        Ok(())
    }

    fn present(&mut self) -> Result<(), PlatformError> {
        self.presents += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct CountingTone {
    pub starts: usize,
    pub stops: usize,
}

impl ToneOutput for CountingTone {
    fn start(&mut self) {
        self.starts += 1;
    }

    fn stop(&mut self) {
        self.stops += 1;
    }
}

pub type TestHost<M> = Host<M, ScriptedEvents, RecordingScreen, CountingTone, ManualClock>;

/// Host over `machine` whose clock advances `stride` per iteration, with
/// 60 Hz steps and ticks and a 480x320 screen.
pub fn host_with<M: Machine>(machine: M, stride: Duration) -> TestHost<M> {
    Host::new(
        machine,
        ScriptedEvents::default(),
        RecordingScreen::new((480, 320)),
        CountingTone::default(),
        ManualClock::new(ClockSample::from_nanos(0), stride),
        Scheduler::from_rates(60, 60).unwrap(),
        FrameRenderer::new(Palette::default()),
    )
}
