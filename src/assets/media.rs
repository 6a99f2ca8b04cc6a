use std::path::Path;

use crate::foundation::error::{StoryreelError, StoryreelResult};

/// Channel count all audio is decoded to.
pub const STEREO_CHANNELS: u16 = 2;

/// Decoded PCM audio: interleaved f32 samples at a known rate.
#[derive(Clone, Debug)]
pub struct AudioPcm {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count (always [`STEREO_CHANNELS`] from [`decode_audio_f32_stereo`]).
    pub channels: u16,
    /// Interleaved f32 samples, `channels` values per frame.
    pub interleaved_f32: Vec<f32>,
}

/// Decode any audio file `ffmpeg` understands into interleaved stereo f32
/// PCM at `sample_rate`.
///
/// We intentionally shell out to the system `ffmpeg` binary rather than link
/// native FFmpeg libraries, so the crate builds without dev headers.
pub fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> StoryreelResult<AudioPcm> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            &STEREO_CHANNELS.to_string(),
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| {
            StoryreelError::encoding(format!("failed to run ffmpeg for audio decode: {e}"))
        })?;

    if !out.status.success() {
        return Err(StoryreelError::encoding(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    if !out.stdout.len().is_multiple_of(4) {
        return Err(StoryreelError::encoding(format!(
            "decoded audio from '{}' is not aligned to f32 samples",
            path.display()
        )));
    }
    if out.stdout.is_empty() {
        return Err(StoryreelError::encoding(format!(
            "ffmpeg decoded zero audio samples from '{}'",
            path.display()
        )));
    }

    let mut pcm = Vec::<f32>::with_capacity(out.stdout.len() / 4);
    for chunk in out.stdout.chunks_exact(4) {
        pcm.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }

    Ok(AudioPcm {
        sample_rate,
        channels: STEREO_CHANNELS,
        interleaved_f32: pcm,
    })
}
