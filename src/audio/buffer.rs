use crate::assets::media::{AudioPcm, STEREO_CHANNELS};
use crate::foundation::error::{StoryreelError, StoryreelResult};

/// Number of audio frames spanned by `sec` seconds at `sample_rate`,
/// truncated the same way silence padding is sized.
pub fn sec_to_frames(sample_rate: u32, sec: f64) -> usize {
    (f64::from(sample_rate) * sec.max(0.0)) as usize
}

/// Interleaved stereo f32 PCM at a fixed sample rate.
///
/// All mixing happens on these buffers; the encoder receives the final mix
/// as raw f32le bytes. Samples are not clamped until [`AudioBuffer::clamp`]
/// so intermediate sums keep full precision.
#[derive(Clone, Debug)]
pub struct AudioBuffer {
    sample_rate: u32,
    samples: Vec<f32>,
}

impl AudioBuffer {
    /// A silent buffer of `duration_sec` seconds.
    pub fn silence(sample_rate: u32, duration_sec: f64) -> Self {
        let frames = sec_to_frames(sample_rate, duration_sec);
        Self {
            sample_rate,
            samples: vec![0.0; frames * usize::from(STEREO_CHANNELS)],
        }
    }

    /// Wrap decoded PCM. The PCM must already be stereo.
    pub fn from_pcm(pcm: AudioPcm) -> StoryreelResult<Self> {
        if pcm.channels != STEREO_CHANNELS {
            return Err(StoryreelError::validation(format!(
                "AudioBuffer requires stereo PCM, got {} channels",
                pcm.channels
            )));
        }
        Self::from_interleaved(pcm.sample_rate, pcm.interleaved_f32)
    }

    /// Wrap raw interleaved stereo samples.
    pub fn from_interleaved(sample_rate: u32, samples: Vec<f32>) -> StoryreelResult<Self> {
        if !samples.len().is_multiple_of(usize::from(STEREO_CHANNELS)) {
            return Err(StoryreelError::validation(
                "interleaved sample count must be a multiple of the channel count",
            ));
        }
        Ok(Self {
            sample_rate,
            samples,
        })
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of audio frames (sample instants across both channels).
    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(STEREO_CHANNELS)
    }

    /// Duration in seconds.
    pub fn duration_sec(&self) -> f64 {
        self.frames() as f64 / f64::from(self.sample_rate)
    }

    /// Interleaved sample data.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Append `other`'s samples after this buffer's.
    pub fn append(&mut self, other: &AudioBuffer) -> StoryreelResult<()> {
        if other.sample_rate != self.sample_rate {
            return Err(StoryreelError::validation(format!(
                "cannot append audio at {} Hz to a {} Hz buffer",
                other.sample_rate, self.sample_rate
            )));
        }
        self.samples.extend_from_slice(&other.samples);
        Ok(())
    }

    /// Linear fade from silence over the first `duration_sec` seconds.
    pub fn fade_in(&mut self, duration_sec: f64) {
        let ramp = sec_to_frames(self.sample_rate, duration_sec).min(self.frames());
        if ramp == 0 {
            return;
        }
        for frame in 0..ramp {
            let gain = frame as f32 / ramp as f32;
            self.samples[frame * 2] *= gain;
            self.samples[frame * 2 + 1] *= gain;
        }
    }

    /// Linear fade to silence over the last `duration_sec` seconds.
    pub fn fade_out(&mut self, duration_sec: f64) {
        let ramp = sec_to_frames(self.sample_rate, duration_sec).min(self.frames());
        if ramp == 0 {
            return;
        }
        let total = self.frames();
        for step in 0..ramp {
            let frame = total - 1 - step;
            let gain = step as f32 / ramp as f32;
            self.samples[frame * 2] *= gain;
            self.samples[frame * 2 + 1] *= gain;
        }
    }

    /// Multiply every sample by `gain`.
    pub fn scale(&mut self, gain: f32) {
        for s in &mut self.samples {
            *s *= gain;
        }
    }

    /// Root-mean-square energy over all samples; 0.0 for an empty buffer.
    pub fn rms(&self) -> f32 {
        rms_of(&self.samples)
    }

    /// A copy lasting exactly `target_frames`: looped whole if shorter,
    /// truncated if longer.
    pub fn loop_or_fit(&self, target_frames: usize) -> AudioBuffer {
        let ch = usize::from(STEREO_CHANNELS);
        let target_len = target_frames * ch;
        let mut samples = Vec::with_capacity(target_len);
        if self.samples.is_empty() {
            samples.resize(target_len, 0.0);
        } else {
            while samples.len() < target_len {
                let remaining = target_len - samples.len();
                let take = remaining.min(self.samples.len());
                samples.extend_from_slice(&self.samples[..take]);
            }
        }
        AudioBuffer {
            sample_rate: self.sample_rate,
            samples,
        }
    }

    /// Add `other` into this buffer starting at `offset_frames`, growing
    /// this buffer with silence if `other` extends past its end.
    pub fn add_at(&mut self, other: &AudioBuffer, offset_frames: usize) {
        let ch = usize::from(STEREO_CHANNELS);
        let needed = (offset_frames + other.frames()) * ch;
        if self.samples.len() < needed {
            self.samples.resize(needed, 0.0);
        }
        let base = offset_frames * ch;
        for (i, s) in other.samples.iter().enumerate() {
            self.samples[base + i] += s;
        }
    }

    /// Clamp every sample into [-1, 1]. Applied once to the final mix.
    pub fn clamp(&mut self) {
        for s in &mut self.samples {
            *s = s.clamp(-1.0, 1.0);
        }
    }
}

/// RMS energy of a raw sample slice; 0.0 when empty.
pub fn rms_of(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
    ((sum_sq / samples.len() as f64).sqrt()) as f32
}
