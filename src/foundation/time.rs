use crate::foundation::error::{StoryreelError, StoryreelResult};

/// An interval of timeline seconds during which a narration segment is
/// audible. `end_sec > start_sec` always holds for constructed values.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeSpan {
    /// Interval start, in seconds.
    pub start_sec: f64,
    /// Interval end, in seconds (strictly after the start).
    pub end_sec: f64,
}

impl TimeSpan {
    /// Build a span, rejecting non-finite or non-increasing bounds.
    pub fn new(start_sec: f64, end_sec: f64) -> StoryreelResult<Self> {
        if !start_sec.is_finite() || !end_sec.is_finite() {
            return Err(StoryreelError::validation("TimeSpan bounds must be finite"));
        }
        if end_sec <= start_sec {
            return Err(StoryreelError::validation(format!(
                "TimeSpan end must be after start (got {start_sec}..{end_sec})"
            )));
        }
        Ok(Self { start_sec, end_sec })
    }

    /// Length of the span in seconds.
    pub fn duration_sec(self) -> f64 {
        self.end_sec - self.start_sec
    }

    /// The same span translated by `offset_sec`.
    pub fn shifted(self, offset_sec: f64) -> Self {
        Self {
            start_sec: self.start_sec + offset_sec,
            end_sec: self.end_sec + offset_sec,
        }
    }
}

/// Number of whole video frames that fit in `secs` at `fps`.
pub fn secs_to_frames_floor(secs: f64, fps: u32) -> u64 {
    (secs * f64::from(fps)).floor().max(0.0) as u64
}

/// Timeline second at which video frame `frame` starts, at `fps`.
pub fn frame_time_sec(frame: u64, fps: u32) -> f64 {
    (frame as f64) / f64::from(fps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_rejects_inverted_bounds() {
        assert!(TimeSpan::new(1.0, 1.0).is_err());
        assert!(TimeSpan::new(2.0, 1.0).is_err());
        assert!(TimeSpan::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn span_shift_preserves_duration() {
        let s = TimeSpan::new(1.5, 4.0).unwrap();
        let t = s.shifted(10.0);
        assert_eq!(t.start_sec, 11.5);
        assert!((t.duration_sec() - s.duration_sec()).abs() < 1e-12);
    }

    #[test]
    fn frame_conversions_are_consistent() {
        assert_eq!(secs_to_frames_floor(13.7, 10), 137);
        assert_eq!(secs_to_frames_floor(0.099, 10), 0);
        assert!((frame_time_sec(137, 10) - 13.7).abs() < 1e-12);
    }
}
