use tracing::debug;

/// Whether the beep is currently sounding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AudioState {
    #[default]
    Silent,
    Playing,
}

/// Audio backend able to loop the beep tone.
pub trait ToneOutput {
    /// Begin looping the tone indefinitely.
    fn start(&mut self);

    /// Stop the tone immediately.
    fn stop(&mut self);
}

/// Output used when no audio device is available. The machine runs the
/// same, it just never makes a sound.
#[derive(Default)]
pub struct SilentOutput;

impl ToneOutput for SilentOutput {
    fn start(&mut self) {}

    fn stop(&mut self) {}
}

/// Drives a [`ToneOutput`] from the machine's sound-timer flag.
///
/// Sampled once per loop iteration. The output is only touched on a state
/// change, so a tone that is already playing is never restarted.
pub struct AudioController<O: ToneOutput> {
    output: O,
    state: AudioState,
}

impl<O: ToneOutput> AudioController<O> {
    pub fn new(output: O) -> Self {
        Self {
            output,
            state: AudioState::Silent,
        }
    }

    pub fn sync(&mut self, sound_timer_active: bool) {
        match (self.state, sound_timer_active) {
            (AudioState::Silent, true) => {
                debug!("tone on");
                self.output.start();
                self.state = AudioState::Playing;
            }
            (AudioState::Playing, false) => {
                debug!("tone off");
                self.output.stop();
                self.state = AudioState::Silent;
            }
            _ => {}
        }
    }

    pub fn state(&self) -> AudioState {
        self.state
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}
