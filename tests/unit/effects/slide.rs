use super::*;

use rand::SeedableRng as _;
use rand::rngs::StdRng;

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

#[test]
fn starts_follow_the_overlap_formula() {
    let durations = [4.4, 5.8, 4.3];
    let plan = plan_slides(&durations, 0.4, &mut rng()).unwrap();

    assert!((plan.steps[0].start_sec - 0.0).abs() < 1e-9);
    assert!((plan.steps[1].start_sec - 4.0).abs() < 1e-9);
    assert!((plan.steps[2].start_sec - 9.4).abs() < 1e-9);
    assert!((plan.total_duration - (4.4 + 5.8 + 4.3 - 0.4 * 2.0)).abs() < 1e-9);
}

#[test]
fn first_slides_out_left_and_last_only_slides_in() {
    let plan = plan_slides(&[2.0, 2.0, 2.0, 2.0], 0.4, &mut rng()).unwrap();

    let first = &plan.steps[0];
    assert_eq!(first.slide_in, None);
    assert_eq!(first.slide_out, Some(SlideDir::Left));

    let last = plan.steps.last().unwrap();
    assert!(last.slide_in.is_some());
    assert_eq!(last.slide_out, None);

    for step in &plan.steps[1..plan.steps.len() - 1] {
        assert!(step.slide_in.is_some());
        assert!(step.slide_out.is_some());
    }
}

#[test]
fn each_clip_enters_opposite_the_previous_exit() {
    let plan = plan_slides(&[2.0; 8], 0.4, &mut rng()).unwrap();
    for pair in plan.steps.windows(2) {
        let out = pair[0].slide_out.unwrap();
        let incoming = pair[1].slide_in.unwrap();
        assert_eq!(incoming, out.opposite());
    }
}

#[test]
fn plans_are_reproducible_for_a_seed() {
    let a = plan_slides(&[2.0; 10], 0.4, &mut StdRng::seed_from_u64(9)).unwrap();
    let b = plan_slides(&[2.0; 10], 0.4, &mut StdRng::seed_from_u64(9)).unwrap();
    assert_eq!(a.steps, b.steps);
}

#[test]
fn single_clip_needs_no_transitions() {
    let plan = plan_slides(&[3.0], 0.4, &mut rng()).unwrap();
    assert_eq!(plan.steps.len(), 1);
    assert_eq!(plan.steps[0].slide_in, None);
    assert_eq!(plan.steps[0].slide_out, None);
    assert!((plan.total_duration - 3.0).abs() < 1e-9);
}

#[test]
fn clips_shorter_than_the_slide_window_are_rejected() {
    assert!(plan_slides(&[0.3, 2.0], 0.4, &mut rng()).is_err());
    assert!(plan_slides(&[], 0.4, &mut rng()).is_err());
    assert!(plan_slides(&[2.0], 0.0, &mut rng()).is_err());
}

#[test]
fn slide_offsets_travel_the_full_canvas_width() {
    let step = SlideStep {
        start_sec: 0.0,
        duration_sec: 4.0,
        slide_in: Some(SlideDir::Right),
        slide_out: Some(SlideDir::Left),
    };

    // Entering from the right: +width at t=0, settled at the window's end.
    assert!((slide_offset_px(&step, 0.4, 0.0, 640) - 640.0).abs() < 1e-9);
    assert!((slide_offset_px(&step, 0.4, 0.2, 640) - 320.0).abs() < 1e-9);
    assert_eq!(slide_offset_px(&step, 0.4, 0.4, 640), 0.0);

    // Steady in the middle.
    assert_eq!(slide_offset_px(&step, 0.4, 2.0, 640), 0.0);

    // Exiting left: 0 at the window start, -width at the clip end.
    assert!((slide_offset_px(&step, 0.4, 3.8, 640) - (-320.0)).abs() < 1e-6);
    assert!((slide_offset_px(&step, 0.4, 4.0, 640) - (-640.0)).abs() < 1e-9);
}
