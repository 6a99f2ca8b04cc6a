use crate::foundation::error::{StoryreelError, StoryreelResult};
use crate::foundation::time::TimeSpan;

/// Explicit fold state for the page loop: a running timeline cursor plus
/// the absolute narration spans accumulated so far.
///
/// Adjacent page clips overlap by one slide window, so registering a page
/// advances the cursor by its track duration minus the slide duration; the
/// cursor before registration is exactly that page's clip start.
#[derive(Clone, Debug, Default)]
pub struct TimelineCursor {
    cursor_sec: f64,
    utterances: Vec<TimeSpan>,
    pages: Vec<TimeSpan>,
}

impl TimelineCursor {
    /// Fresh fold state starting at t = 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one page's mix and return the page clip's timeline start.
    ///
    /// `local_spans` are the page's narration spans relative to its own
    /// track (at least one is required); they become absolute by shifting
    /// with the current cursor. The page-level span runs from the first
    /// utterance's start to the last one's end.
    pub fn push_page(
        &mut self,
        local_spans: &[TimeSpan],
        track_duration_sec: f64,
        slide_duration_sec: f64,
    ) -> StoryreelResult<f64> {
        let (Some(first), Some(last)) = (local_spans.first(), local_spans.last()) else {
            return Err(StoryreelError::validation(
                "a page must carry at least one narration span",
            ));
        };
        if track_duration_sec < slide_duration_sec {
            return Err(StoryreelError::validation(format!(
                "page track of {track_duration_sec}s is shorter than the slide window"
            )));
        }

        let start = self.cursor_sec;
        for span in local_spans {
            self.utterances.push(span.shifted(start));
        }
        self.pages
            .push(TimeSpan::new(start + first.start_sec, start + last.end_sec)?);

        self.cursor_sec += track_duration_sec - slide_duration_sec;
        Ok(start)
    }

    /// Current cursor position: the start of the next page's clip.
    pub fn cursor_sec(&self) -> f64 {
        self.cursor_sec
    }

    /// Absolute narration spans, one per utterance, in timeline order.
    pub fn utterance_spans(&self) -> &[TimeSpan] {
        &self.utterances
    }

    /// Absolute narration spans collapsed to one per page (first utterance
    /// start to last utterance end), matching the caption list 1:1.
    pub fn page_spans(&self) -> &[TimeSpan] {
        &self.pages
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/timeline.rs"]
mod tests;
