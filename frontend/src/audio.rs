use chipbox_core::audio::{SilentOutput, ToneOutput};
use chipbox_core::tone::{SAMPLE_RATE_HZ, TONE_FREQUENCY_HZ, TONE_VOLUME, ToneBuffer, ToneLoop};
use sdl2::AudioSubsystem;
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};
use tracing::{debug, warn};

/// Samples per SDL callback (~23 ms at 44.1 kHz).
const CALLBACK_SAMPLES: u16 = 1024;

/// Runs on SDL's audio thread, looping the beep for as long as the device
/// is resumed.
pub struct ToneCallback {
    tone: ToneLoop,
}

impl AudioCallback for ToneCallback {
    type Channel = i16;

    fn callback(&mut self, out: &mut [i16]) {
        self.tone.fill(out);
    }
}

/// An open playback device. Paused means silent.
pub struct DeviceTone {
    device: AudioDevice<ToneCallback>,
}

impl ToneOutput for DeviceTone {
    fn start(&mut self) {
        // Every beep starts on the same edge of the wave.
        self.device.lock().tone.rewind();
        self.device.resume();
    }

    fn stop(&mut self) {
        self.device.pause();
    }
}

/// Whatever audio the platform could give us.
pub enum Speaker {
    Device(DeviceTone),
    Silent(SilentOutput),
}

impl ToneOutput for Speaker {
    fn start(&mut self) {
        match self {
            Self::Device(device) => device.start(),
            Self::Silent(silent) => silent.start(),
        }
    }

    fn stop(&mut self) {
        match self {
            Self::Device(device) => device.stop(),
            Self::Silent(silent) => silent.stop(),
        }
    }
}

/// Open mono 16-bit playback at 44.1 kHz, or fall back to silence.
///
/// The device starts paused. A missing audio subsystem or a device that
/// refuses to open is logged and otherwise ignored.
pub fn open(audio: Result<AudioSubsystem, String>) -> Speaker {
    match audio.and_then(|subsystem| open_device(&subsystem)) {
        Ok(device) => Speaker::Device(device),
        Err(e) => {
            warn!(error = %e, "audio unavailable, running without sound");
            Speaker::Silent(SilentOutput)
        }
    }
}

fn open_device(audio: &AudioSubsystem) -> Result<DeviceTone, String> {
    let desired = AudioSpecDesired {
        freq: Some(SAMPLE_RATE_HZ as i32),
        channels: Some(1),
        samples: Some(CALLBACK_SAMPLES),
    };

    let device = audio.open_playback(None, &desired, |spec| {
        // SDL may pick a different rate; build the wave for the one we got.
        let rate = u32::try_from(spec.freq).unwrap_or(SAMPLE_RATE_HZ);
        debug!(sample_rate = rate, channels = spec.channels, "audio device opened");
        tone_callback(rate)
    })?;

    Ok(DeviceTone { device })
}

fn tone_callback(sample_rate: u32) -> ToneCallback {
    ToneCallback {
        tone: ToneLoop::new(ToneBuffer::square(TONE_FREQUENCY_HZ, sample_rate), TONE_VOLUME),
    }
}
