use std::sync::Arc;

/// Beep pitch.
pub const TONE_FREQUENCY_HZ: u32 = 440;

/// Output sample rate (mono, signed 16-bit).
pub const SAMPLE_RATE_HZ: u32 = 44_100;

/// Playback gain applied to the tone (half of full scale).
pub const TONE_VOLUME: f32 = 0.5;

/// One period of a square wave, generated once at startup.
///
/// Cloning is cheap: the samples are shared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToneBuffer {
    samples: Arc<[i16]>,
    sample_rate: u32,
}

impl ToneBuffer {
    /// Build one period of a full-scale square wave at `frequency`.
    ///
    /// The period is `round(sample_rate / frequency)` samples long: the first
    /// half sits at `+i16::MAX`, the second at `-i16::MAX`. Always at least
    /// two samples so the wave has both a high and a low phase.
    pub fn square(frequency: u32, sample_rate: u32) -> Self {
        let frequency = frequency.max(1);
        let len = ((sample_rate as f64 / frequency as f64).round() as usize).max(2);
        let half = len / 2;
        let samples: Arc<[i16]> = (0..len)
            .map(|i| if i < half { i16::MAX } else { -i16::MAX })
            .collect();
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl Default for ToneBuffer {
    fn default() -> Self {
        Self::square(TONE_FREQUENCY_HZ, SAMPLE_RATE_HZ)
    }
}

/// Loops a [`ToneBuffer`] into an output stream at a fixed gain.
///
/// Owned by whatever audio backend pulls samples; the phase carries over
/// between fills so the wave stays continuous across buffer boundaries.
pub struct ToneLoop {
    tone: ToneBuffer,
    position: usize,
    volume: f32,
}

impl ToneLoop {
    pub fn new(tone: ToneBuffer, volume: f32) -> Self {
        Self {
            tone,
            position: 0,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    /// Fill `out` with the next samples of the looped tone.
    pub fn fill(&mut self, out: &mut [i16]) {
        let samples = self.tone.samples();
        for sample in out.iter_mut() {
            *sample = (samples[self.position] as f32 * self.volume) as i16;
            self.position = (self.position + 1) % samples.len();
        }
    }

    /// Restart from the beginning of the period.
    pub fn rewind(&mut self) {
        self.position = 0;
    }
}
