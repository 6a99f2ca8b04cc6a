use rand::Rng;

use crate::foundation::error::{StoryreelError, StoryreelResult};

/// Side a clip slides out toward, or slides in from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideDir {
    /// The left edge of the canvas.
    Left,
    /// The right edge of the canvas.
    Right,
}

impl SlideDir {
    /// The other side. An incoming clip always enters from the side
    /// opposite the previous clip's exit.
    pub fn opposite(self) -> SlideDir {
        match self {
            SlideDir::Left => SlideDir::Right,
            SlideDir::Right => SlideDir::Left,
        }
    }
}

/// One clip's placement and slide phases within the composite timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlideStep {
    /// Timeline second this clip starts at.
    pub start_sec: f64,
    /// The clip's raw duration in seconds.
    pub duration_sec: f64,
    /// Side the clip slides in from, `None` for the first clip.
    pub slide_in: Option<SlideDir>,
    /// Side the clip slides out toward, `None` for the last clip.
    pub slide_out: Option<SlideDir>,
}

/// Derived transition plan across all page clips. Never persisted.
#[derive(Clone, Debug)]
pub struct SlidePlan {
    /// One step per clip, in page order.
    pub steps: Vec<SlideStep>,
    /// Overlap window between adjacent clips, in seconds.
    pub slide_duration: f64,
    /// Composite duration: `sum(durations) - slide_duration * (N - 1)`.
    pub total_duration: f64,
}

/// Chain clips with cross-slide transitions.
///
/// Clip 0 slides out toward the left; each interior clip slides in from
/// the side opposite the previous clip's exit and slides out toward a
/// uniformly random side; the final clip only slides in. Clip `i` starts
/// at `sum(durations[..i]) - slide_duration * i`, so adjacent clips
/// overlap by exactly one slide.
///
/// Callers must have reserved at least `slide_duration` of silence at
/// each clip's tail (the page mixer's slide framing); a clip shorter than
/// the slide window is rejected. A single clip yields a plan with no
/// slides at all.
pub fn plan_slides(
    durations: &[f64],
    slide_duration: f64,
    rng: &mut impl Rng,
) -> StoryreelResult<SlidePlan> {
    if durations.is_empty() {
        return Err(StoryreelError::validation(
            "cannot sequence an empty clip list",
        ));
    }
    if !(slide_duration.is_finite() && slide_duration > 0.0) {
        return Err(StoryreelError::validation(
            "slide_duration must be finite and > 0",
        ));
    }
    for (idx, &d) in durations.iter().enumerate() {
        if !(d.is_finite() && d >= slide_duration) {
            return Err(StoryreelError::validation(format!(
                "clip {idx} duration {d}s is shorter than the slide window {slide_duration}s"
            )));
        }
    }

    let n = durations.len();
    let mut steps = Vec::with_capacity(n);
    let mut cursor = 0.0f64;

    if n == 1 {
        steps.push(SlideStep {
            start_sec: 0.0,
            duration_sec: durations[0],
            slide_in: None,
            slide_out: None,
        });
        return Ok(SlidePlan {
            steps,
            slide_duration,
            total_duration: durations[0],
        });
    }

    let mut prev_out = SlideDir::Left;
    for (idx, &duration) in durations.iter().enumerate() {
        let slide_in = (idx > 0).then(|| prev_out.opposite());
        let slide_out = if idx == 0 {
            Some(SlideDir::Left)
        } else if idx + 1 < n {
            let dir = if rng.random_bool(0.5) {
                SlideDir::Left
            } else {
                SlideDir::Right
            };
            prev_out = dir;
            Some(dir)
        } else {
            None
        };

        steps.push(SlideStep {
            start_sec: cursor,
            duration_sec: duration,
            slide_in,
            slide_out,
        });
        cursor += duration - slide_duration;
    }

    Ok(SlidePlan {
        steps,
        slide_duration,
        total_duration: cursor + slide_duration,
    })
}

/// Horizontal pixel offset of a clip at `t_sec` into it, from its slide
/// phases: an incoming clip travels from fully off-canvas to 0 across the
/// slide window, an outgoing clip mirrors that over its final window.
pub fn slide_offset_px(step: &SlideStep, slide_duration: f64, t_sec: f64, width: u32) -> f64 {
    let w = f64::from(width);
    if let Some(dir) = step.slide_in
        && t_sec < slide_duration
    {
        let progress = (t_sec / slide_duration).clamp(0.0, 1.0);
        return match dir {
            SlideDir::Left => -w * (1.0 - progress),
            SlideDir::Right => w * (1.0 - progress),
        };
    }
    if let Some(dir) = step.slide_out {
        let out_start = step.duration_sec - slide_duration;
        if t_sec > out_start {
            let progress = ((t_sec - out_start) / slide_duration).clamp(0.0, 1.0);
            return match dir {
                SlideDir::Left => -w * progress,
                SlideDir::Right => w * progress,
            };
        }
    }
    0.0
}

#[cfg(test)]
#[path = "../../tests/unit/effects/slide.rs"]
mod tests;
