//! The host loop.
//!
//! One iteration samples the clock once, drains input, then runs at most one
//! instruction step and at most one timer tick according to the
//! [`Scheduler`], syncs the beep to the sound timer, and presents the screen.
//! The frame is only re-rendered after a draw or clear instruction; every
//! other iteration re-presents the previous frame.
//!
//! There is no sleep between iterations: the loop polls as fast as event
//! draining and presenting allow.

use tracing::info;

use crate::audio::{AudioController, ToneOutput};
use crate::clock::Clock;
use crate::core::Machine;
use crate::keypad::KeyLatch;
use crate::platform::{EventSource, HostEvent, PlatformError, Screen};
use crate::scheduler::Scheduler;
use crate::video::FrameRenderer;

/// Fatal error that stops the loop.
#[derive(Debug)]
pub enum HostError<E> {
    /// The machine failed to execute an instruction.
    Machine(E),
    Platform(PlatformError),
}

impl<E: std::fmt::Display> std::fmt::Display for HostError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Machine(e) => write!(f, "machine halted: {e}"),
            Self::Platform(e) => write!(f, "{e}"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for HostError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Machine(e) => Some(e),
            Self::Platform(e) => Some(e),
        }
    }
}

impl<E> From<PlatformError> for HostError<E> {
    fn from(e: PlatformError) -> Self {
        Self::Platform(e)
    }
}

/// What a single [`Host::iterate`] call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Iteration {
    pub stepped: bool,
    pub ticked: bool,
    pub rendered: bool,
}

/// Owns the machine and every host-side component for the process lifetime.
pub struct Host<M, E, S, O, C>
where
    M: Machine,
    E: EventSource,
    S: Screen,
    O: ToneOutput,
    C: Clock,
{
    machine: M,
    events: E,
    screen: S,
    audio: AudioController<O>,
    clock: C,
    scheduler: Scheduler,
    renderer: FrameRenderer,
    keys: KeyLatch,
    running: bool,
}

impl<M, E, S, O, C> Host<M, E, S, O, C>
where
    M: Machine,
    E: EventSource,
    S: Screen,
    O: ToneOutput,
    C: Clock,
{
    pub fn new(
        machine: M,
        events: E,
        screen: S,
        tone: O,
        clock: C,
        scheduler: Scheduler,
        renderer: FrameRenderer,
    ) -> Self {
        Self {
            machine,
            events,
            screen,
            audio: AudioController::new(tone),
            clock,
            scheduler,
            renderer,
            keys: KeyLatch::new(),
            running: true,
        }
    }

    /// Iterate until a quit event arrives or a fatal error occurs.
    pub fn run(&mut self) -> Result<(), HostError<M::Error>> {
        info!(
            step_period = ?self.scheduler.step_period(),
            tick_period = ?self.scheduler.tick_period(),
            "host loop started"
        );
        while self.running {
            self.iterate()?;
        }
        self.audio.sync(false);
        info!("host loop stopped");
        Ok(())
    }

    /// Run exactly one loop iteration.
    pub fn iterate(&mut self) -> Result<Iteration, HostError<M::Error>> {
        let now = self.clock.now();
        let mut report = Iteration::default();

        while let Some(event) = self.events.poll_event() {
            match event {
                HostEvent::Quit => self.running = false,
                HostEvent::KeyDown(key) => {
                    if let Some(code) = self.keys.press(key) {
                        self.machine.key_event(code, true);
                    }
                }
                HostEvent::KeyUp(key) => {
                    if let Some(code) = self.keys.release(key) {
                        self.machine.key_event(code, false);
                    }
                }
            }
        }

        if self.scheduler.due_step(now) {
            let op = self.machine.step().map_err(HostError::Machine)?;
            report.stepped = true;
            if op.is_draw_class() {
                let frame = self
                    .renderer
                    .render(self.machine.framebuffer(), self.screen.size());
                self.screen.blit(&frame)?;
                report.rendered = true;
            }
        }

        if self.scheduler.due_tick(now) {
            self.machine.tick();
            report.ticked = true;
        }

        self.audio.sync(self.machine.sound_timer_active());
        self.screen.present()?;

        Ok(report)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn machine(&self) -> &M {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut M {
        &mut self.machine
    }

    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn audio(&self) -> &AudioController<O> {
        &self.audio
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}
