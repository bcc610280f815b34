use chipbox_core::platform::{EventSource, HostEvent};
use sdl2::EventPump;
use sdl2::event::Event;
use sdl2::keyboard::Scancode;

use crate::input::physical_key;

/// SDL event queue as seen by the host loop.
pub struct SdlEvents {
    pump: EventPump,
}

impl SdlEvents {
    pub fn new(pump: EventPump) -> Self {
        Self { pump }
    }
}

impl EventSource for SdlEvents {
    fn poll_event(&mut self) -> Option<HostEvent> {
        // Skip window, mouse and other events the host has no use for.
        while let Some(event) = self.pump.poll_event() {
            if let Some(host_event) = translate(event) {
                return Some(host_event);
            }
        }
        None
    }
}

/// Escape quits, like closing the window. Auto-repeated key-downs pass
/// through; the keypad latch ignores them.
fn translate(event: Event) -> Option<HostEvent> {
    match event {
        Event::Quit { .. } => Some(HostEvent::Quit),

        Event::KeyDown {
            scancode: Some(Scancode::Escape),
            ..
        } => Some(HostEvent::Quit),

        Event::KeyDown {
            scancode: Some(sc), ..
        } => Some(HostEvent::KeyDown(physical_key(sc))),

        Event::KeyUp {
            scancode: Some(sc), ..
        } => Some(HostEvent::KeyUp(physical_key(sc))),

        _ => None,
    }
}
