#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;

use chipbox_core::prelude::*;
use chipbox_machines::Chip8System;

#[derive(Default)]
pub struct ScriptedEvents {
    pending: VecDeque<HostEvent>,
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

#[derive(Default)]
pub struct RecordingScreen {
    pub blits: Vec<Frame>,
    pub presents: usize,
}

impl Screen for RecordingScreen {
    fn size(&self) -> (u32, u32) {
        (480, 320)
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

pub type Chip8Host = Host<Chip8System, ScriptedEvents, RecordingScreen, CountingTone, ManualClock>;

/// Write `program` to a temp file named after `name` and return its path.
pub fn write_rom(name: &str, program: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("chipbox_{name}.ch8"));
    std::fs::write(&path, program).unwrap();
    path
}

/// A CHIP-8 host at 60 Hz whose clock advances 1 ms per iteration.
pub fn chip8_host(program: &[u8], name: &str) -> Chip8Host {
    let path = write_rom(name, program);
    let mut machine = Chip8System::new();
    machine.load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    Host::new(
        machine,
        ScriptedEvents::default(),
        RecordingScreen::default(),
        CountingTone::default(),
        ManualClock::new(ClockSample::from_nanos(0), Duration::from_millis(1)),
        Scheduler::default(),
        FrameRenderer::new(Palette::default()),
    )
}
