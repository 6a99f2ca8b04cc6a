use kurbo::Affine;

use crate::assets::decode::PageImage;
use crate::effects::motion::{Motion, crossfade_opacity};
use crate::effects::slide::{SlidePlan, slide_offset_px};
use crate::foundation::time::{frame_time_sec, secs_to_frames_floor};
use crate::render::composite::warp_over;

/// One page's visual clip: the prepared still plus its motion effect.
/// Durations come from the page's mixed audio track.
#[derive(Clone, Debug)]
pub struct PageClip {
    /// Prepared still, already canvas-sized.
    pub image: PageImage,
    /// Motion effect applied across the clip.
    pub motion: Motion,
    /// Clip duration in seconds (equals the page track duration).
    pub duration_sec: f64,
}

impl PageClip {
    fn total_frames(&self, fps: u32) -> u64 {
        secs_to_frames_floor(self.duration_sec, fps)
    }
}

/// Composite one output frame.
///
/// Starts from an opaque black canvas, layers every clip active at the
/// frame's timeline instant (warped by its motion, faded by the crossfade,
/// offset by its slide phase; later pages above earlier ones), then fills
/// the bottom caption bar. During a transition exactly two clips overlap.
#[allow(clippy::too_many_arguments)]
pub fn render_frame(
    frame: u64,
    fps: u32,
    clips: &[PageClip],
    plan: &SlidePlan,
    fade_duration: f64,
    caption_area_height: u32,
    canvas_width: u32,
    canvas_height: u32,
) -> Vec<u8> {
    let mut canvas = vec![0u8; canvas_width as usize * canvas_height as usize * 4];
    for px in canvas.chunks_exact_mut(4) {
        px[3] = 255;
    }

    let t = frame_time_sec(frame, fps);
    for (clip, step) in clips.iter().zip(&plan.steps) {
        let local = t - step.start_sec;
        if local < 0.0 || local >= clip.duration_sec {
            continue;
        }
        let local_frame = secs_to_frames_floor(local, fps);
        let motion = clip.motion.dest_to_src(
            local_frame,
            clip.total_frames(fps),
            canvas_width,
            canvas_height,
        );
        let offset = slide_offset_px(step, plan.slide_duration, local, canvas_width);
        let dest_to_src = motion * Affine::translate((-offset, 0.0));
        let opacity = crossfade_opacity(local, clip.duration_sec, fade_duration);
        warp_over(
            &mut canvas,
            canvas_width,
            canvas_height,
            &clip.image,
            dest_to_src,
            opacity,
        );
    }

    fill_caption_bar(&mut canvas, canvas_width, canvas_height, caption_area_height);
    canvas
}

// Solid black strip at the bottom of the frame, behind the burned-in
// subtitles.
fn fill_caption_bar(canvas: &mut [u8], width: u32, height: u32, area_height: u32) {
    let area_height = area_height.min(height);
    let first_row = (height - area_height) as usize;
    let row_bytes = width as usize * 4;
    for row in first_row..height as usize {
        let base = row * row_bytes;
        for px in canvas[base..base + row_bytes].chunks_exact_mut(4) {
            px.copy_from_slice(&[0, 0, 0, 255]);
        }
    }
}
