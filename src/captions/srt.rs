use std::path::Path;

use anyhow::Context as _;

use crate::captions::segment::segment_caption;
use crate::foundation::error::{StoryreelError, StoryreelResult};
use crate::foundation::time::TimeSpan;

/// Render an SRT subtitle track from narration spans and page captions.
///
/// `spans` and `captions` must be the same length (one entry per page); a
/// mismatch is a caller bug. Each caption is segmented into display lines
/// (see [`segment_caption`]); a caption of K lines tiles its span into K
/// equal sub-intervals, one cue per line, numbered globally from 1. A
/// caption segmenting to zero lines contributes zero cues without
/// disturbing the numbering.
pub fn build_srt(
    spans: &[TimeSpan],
    captions: &[String],
    max_length: usize,
) -> StoryreelResult<String> {
    if spans.len() != captions.len() {
        return Err(StoryreelError::validation(format!(
            "timestamps/captions length mismatch: {} spans vs {} captions",
            spans.len(),
            captions.len()
        )));
    }

    let mut out = String::new();
    let mut cue_index = 0usize;
    for (span, caption) in spans.iter().zip(captions) {
        let lines = segment_caption(caption, max_length);
        if lines.is_empty() {
            continue;
        }
        let step = span.duration_sec() / lines.len() as f64;
        for (k, line) in lines.iter().enumerate() {
            cue_index += 1;
            let cue_start = span.start_sec + step * k as f64;
            let cue_end = span.start_sec + step * (k + 1) as f64;
            out.push_str(&format!(
                "{cue_index}\n{} --> {}\n{line}\n\n",
                format_timecode(cue_start),
                format_timecode(cue_end)
            ));
        }
    }
    Ok(out)
}

/// Build and write the SRT track to `path` as UTF-8.
pub fn write_srt(
    path: &Path,
    spans: &[TimeSpan],
    captions: &[String],
    max_length: usize,
) -> StoryreelResult<()> {
    let content = build_srt(spans, captions, max_length)?;
    std::fs::write(path, content)
        .with_context(|| format!("write subtitle file '{}'", path.display()))?;
    Ok(())
}

/// Format seconds as an SRT timecode, `HH:MM:SS,mmm`, milliseconds
/// truncated (not rounded).
pub fn format_timecode(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0) as u64;
    let ms = total_ms % 1000;
    let total_sec = total_ms / 1000;
    let s = total_sec % 60;
    let m = (total_sec / 60) % 60;
    let h = total_sec / 3600;
    format!("{h:02}:{m:02}:{s:02},{ms:03}")
}
