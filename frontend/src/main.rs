use std::path::PathBuf;

use chipbox_core::prelude::*;
use chipbox_core::video::TARGET_SIZE;
use chipbox_machines::{Chip8Error, Chip8System};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod audio;
mod config;
mod events;
mod input;
mod video;

use config::Settings;
use events::SdlEvents;
use video::SdlScreen;

#[derive(Parser, Debug)]
#[command(name = "chipbox", version, about = "CHIP-8 interpreter")]
struct Args {
    /// Program image to load at $200
    rom: PathBuf,
}

fn main() {
    let args = Args::parse();
    setup_logging();

    let settings = config::load(config::default_path().as_deref());

    let mut machine = Chip8System::new();
    match machine.load(&args.rom) {
        Ok(bytes) => info!(rom = %args.rom.display(), bytes, "ROM loaded"),
        Err(e) => {
            error!(rom = %args.rom.display(), "failed to load ROM: {e}");
            std::process::exit(1);
        }
    }

    if let Err(e) = run(machine, settings) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .init();
}

/// Open the window and audio device and run until the user quits.
fn run(machine: Chip8System, settings: Settings) -> Result<(), HostError<Chip8Error>> {
    let sdl_context = sdl2::init().map_err(PlatformError::Init)?;
    let sdl_video = sdl_context.video().map_err(PlatformError::Init)?;

    let canvas = video::open_window(&sdl_video, "chipbox", TARGET_SIZE)?;
    let texture_creator = canvas.texture_creator();
    let screen = SdlScreen::new(canvas, &texture_creator)?;
    let events = SdlEvents::new(sdl_context.event_pump().map_err(PlatformError::Init)?);
    let speaker = audio::open(sdl_context.audio());

    let mut host = Host::new(
        machine,
        events,
        screen,
        speaker,
        MonotonicClock::new(),
        settings.scheduler,
        FrameRenderer::new(settings.palette),
    );
    host.run()
}
