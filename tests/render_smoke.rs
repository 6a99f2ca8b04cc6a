//! Frame-compositor smoke tests over the public API: a tiny canvas, solid
//! stills, and hand-built slide plans.

use std::sync::Arc;

use rand::SeedableRng as _;
use rand::rngs::StdRng;

use storyreel::{
    Motion, PageClip, PageImage, SlidePlan, ZoomAnchor, ZoomDir, plan_slides, render_frame,
};

fn solid(width: u32, height: u32, rgb: [u8; 3]) -> PageImage {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        data.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
    }
    PageImage {
        width,
        height,
        rgba8_premul: Arc::new(data),
    }
}

fn still(duration_sec: f64, rgb: [u8; 3]) -> PageClip {
    PageClip {
        image: solid(16, 16, rgb),
        motion: Motion::Zoom {
            dir: ZoomDir::In,
            anchor: ZoomAnchor::Center,
            speed: 0.0,
        },
        duration_sec,
    }
}

fn pixel(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
    let idx = (y as usize * width as usize + x as usize) * 4;
    [frame[idx], frame[idx + 1], frame[idx + 2], frame[idx + 3]]
}

#[test]
fn two_page_sequence_shows_each_page_in_turn() {
    let clips = vec![still(3.0, [200, 0, 0]), still(3.0, [0, 200, 0])];
    let mut rng = StdRng::seed_from_u64(3);
    let plan = plan_slides(&[3.0, 3.0], 0.4, &mut rng).unwrap();

    // t = 1.5s: page 1 fully visible (fade of 0.5s is over).
    let frame = render_frame(15, 10, &clips, &plan, 0.5, 0, 16, 16);
    assert_eq!(pixel(&frame, 16, 8, 8), [200, 0, 0, 255]);

    // t = 4.2s: inside page 2 (starts at 2.6s), past its fade-in.
    let frame = render_frame(42, 10, &clips, &plan, 0.5, 0, 16, 16);
    assert_eq!(pixel(&frame, 16, 8, 8), [0, 200, 0, 255]);
}

#[test]
fn total_frame_count_covers_the_whole_composite() {
    let mut rng = StdRng::seed_from_u64(3);
    let plan = plan_slides(&[3.0, 3.0], 0.4, &mut rng).unwrap();
    assert!((plan.total_duration - 5.6).abs() < 1e-9);

    // The frame after the composite's end is fully black.
    let clips = vec![still(3.0, [200, 0, 0]), still(3.0, [0, 200, 0])];
    let frame = render_frame(60, 10, &clips, &plan, 0.5, 0, 16, 16);
    assert!(frame.chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
}

#[test]
fn caption_bar_is_painted_over_every_page() {
    let clips = vec![still(3.0, [200, 0, 0])];
    let plan = SlidePlan {
        steps: vec![storyreel::SlideStep {
            start_sec: 0.0,
            duration_sec: 3.0,
            slide_in: None,
            slide_out: None,
        }],
        slide_duration: 0.4,
        total_duration: 3.0,
    };
    let frame = render_frame(15, 10, &clips, &plan, 0.5, 4, 16, 16);
    assert_eq!(pixel(&frame, 16, 8, 15), [0, 0, 0, 255]);
    assert_eq!(pixel(&frame, 16, 8, 12), [0, 0, 0, 255]);
    assert_eq!(pixel(&frame, 16, 8, 8), [200, 0, 0, 255]);
}
