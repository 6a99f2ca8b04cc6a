use std::path::Path;

use crate::audio::buffer::AudioBuffer;
use crate::foundation::error::{StoryreelError, StoryreelResult};
use crate::foundation::time::TimeSpan;

/// Where a page sits in the slide sequence; decides its silence framing.
///
/// The first page carries trailing slide silence only; every other page is
/// framed on both sides (the last page is symmetric with interior pages).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagePosition {
    /// Page 1.
    First,
    /// Pages 2..N-1.
    Interior,
    /// Page N.
    Last,
}

impl PagePosition {
    /// Position of 0-based page `index` among `num_pages` pages.
    pub fn from_index(index: usize, num_pages: usize) -> Self {
        if index == 0 {
            Self::First
        } else if index + 1 == num_pages {
            Self::Last
        } else {
            Self::Interior
        }
    }

    fn leading_slide(self) -> bool {
        !matches!(self, Self::First)
    }
}

/// Mixing knobs for one page, a subset of the compose configuration.
#[derive(Clone, Copy, Debug)]
pub struct AudioMixConfig {
    /// Silence framing each page's speech for visual cross-fades, seconds.
    pub fade_duration: f64,
    /// Silence reserved for the slide transition overlap, seconds.
    pub slide_duration: f64,
    /// Base sound-effect volume before loudness balancing.
    pub sound_volume: f32,
    /// Loudness of background tracks relative to speech.
    pub bg_speech_ratio: f32,
}

/// One page's fully mixed audio track.
///
/// `narration` spans are relative to the track start; the orchestrator
/// shifts them by the page clip's timeline start to make them absolute.
#[derive(Clone, Debug)]
pub struct PageMix {
    /// Mixed track: silence framing + speech, with any sound effect baked in.
    pub track: AudioBuffer,
    /// One span per speech utterance, relative to the track start.
    pub narration: Vec<TimeSpan>,
    /// RMS energy of the page's speech (before framing), used for
    /// balancing background tracks against it.
    pub speech_rms: f32,
}

/// Mix one page: concatenate its speech utterances inside silence framing
/// and blend in the optional sound effect at a loudness proportional to the
/// speech.
///
/// The sound effect is scaled by `sound_volume * (speech_rms / sound_rms) *
/// bg_speech_ratio`, looped if shorter than the page track and truncated if
/// longer, and faded in/out over `fade_duration`. A silent or empty effect
/// is skipped with a warning rather than dividing by zero.
pub fn mix_page(
    speech: &[AudioBuffer],
    sound: Option<&AudioBuffer>,
    position: PagePosition,
    cfg: &AudioMixConfig,
) -> StoryreelResult<PageMix> {
    let Some(first) = speech.first() else {
        return Err(StoryreelError::validation(
            "mix_page requires at least one speech utterance",
        ));
    };
    let rate = first.sample_rate();

    let lead_sec = if position.leading_slide() {
        cfg.slide_duration
    } else {
        0.0
    };

    let mut track = AudioBuffer::silence(rate, lead_sec);
    let fade = AudioBuffer::silence(rate, cfg.fade_duration);
    track.append(&fade)?;

    let mut narration = Vec::with_capacity(speech.len());
    let mut speech_sq_sum = 0.0f64;
    let mut speech_samples = 0usize;
    for utterance in speech {
        let start_sec = track.frames() as f64 / f64::from(rate);
        track.append(utterance)?;
        let end_sec = track.frames() as f64 / f64::from(rate);
        narration.push(TimeSpan::new(start_sec, end_sec)?);

        for &s in utterance.samples() {
            speech_sq_sum += f64::from(s) * f64::from(s);
        }
        speech_samples += utterance.samples().len();
    }
    track.append(&fade)?;
    track.append(&AudioBuffer::silence(rate, cfg.slide_duration))?;

    let speech_rms = if speech_samples == 0 {
        0.0
    } else {
        ((speech_sq_sum / speech_samples as f64).sqrt()) as f32
    };

    if let Some(effect) = sound {
        if effect.sample_rate() != rate {
            return Err(StoryreelError::validation(format!(
                "sound effect rate {} Hz does not match speech rate {} Hz",
                effect.sample_rate(),
                rate
            )));
        }
        let sound_rms = effect.rms();
        if effect.frames() == 0 || sound_rms <= 0.0 {
            tracing::warn!("skipping silent sound effect for loudness balancing");
        } else {
            let gain = background_gain(cfg.sound_volume, speech_rms, sound_rms, cfg.bg_speech_ratio);
            let mut fitted = effect.loop_or_fit(track.frames());
            fitted.fade_in(cfg.fade_duration);
            fitted.fade_out(cfg.fade_duration);
            fitted.scale(gain);
            track.add_at(&fitted, 0);
        }
    }

    Ok(PageMix {
        track,
        narration,
        speech_rms,
    })
}

/// Scale factor for a background track (sound effect or music) so its
/// perceived loudness tracks the speech regardless of source levels.
pub fn background_gain(
    base_volume: f32,
    speech_rms: f32,
    background_rms: f32,
    bg_speech_ratio: f32,
) -> f32 {
    if background_rms <= 0.0 {
        return 0.0;
    }
    base_volume * (speech_rms / background_rms) * bg_speech_ratio
}

/// Write an interleaved f32 mix as raw little-endian bytes, the format the
/// encoder feeds to ffmpeg's second input.
pub fn write_f32le_file(mix: &AudioBuffer, out_path: &Path) -> StoryreelResult<()> {
    let samples = mix.samples();
    let mut bytes = Vec::<u8>::with_capacity(samples.len() * 4);
    for &sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        StoryreelError::encoding(format!(
            "failed to write mixed audio file '{}': {e}",
            out_path.display()
        ))
    })
}

/// Expected duration in seconds of a page track mixed at `position`,
/// given its speech seconds and the mix config. Mirrors the silence
/// framing in [`mix_page`]; used by sizing math and tests.
pub fn framed_duration_sec(
    speech_sec: f64,
    position: PagePosition,
    cfg: &AudioMixConfig,
) -> f64 {
    let lead = if position.leading_slide() {
        cfg.slide_duration
    } else {
        0.0
    };
    lead + cfg.fade_duration + speech_sec + cfg.fade_duration + cfg.slide_duration
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
