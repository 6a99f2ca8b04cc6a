//! End-to-end timeline arithmetic over the public API, without touching
//! ffmpeg: mix pages, fold them onto the timeline, sequence the slides,
//! and check every duration and timestamp against the closed-form values.

use rand::SeedableRng as _;
use rand::rngs::StdRng;

use storyreel::{
    AudioBuffer, AudioMixConfig, PagePosition, TimelineCursor, background_gain, build_srt,
    mix_page, plan_slides,
};

const RATE: u32 = 16_000;

fn speech(duration_sec: f64) -> AudioBuffer {
    let frames = (f64::from(RATE) * duration_sec) as usize;
    AudioBuffer::from_interleaved(RATE, vec![0.3; frames * 2]).unwrap()
}

fn mix_cfg() -> AudioMixConfig {
    AudioMixConfig {
        fade_duration: 1.0,
        slide_duration: 0.4,
        sound_volume: 0.2,
        bg_speech_ratio: 0.4,
    }
}

struct Timeline {
    fold: TimelineCursor,
    starts: Vec<f64>,
    tracks: Vec<AudioBuffer>,
    durations: Vec<f64>,
}

fn fold_pages(speech_secs: &[f64]) -> Timeline {
    let cfg = mix_cfg();
    let n = speech_secs.len();
    let mut fold = TimelineCursor::new();
    let mut starts = Vec::new();
    let mut tracks = Vec::new();
    let mut durations = Vec::new();
    for (idx, &sec) in speech_secs.iter().enumerate() {
        let mix = mix_page(
            &[speech(sec)],
            None,
            PagePosition::from_index(idx, n),
            &cfg,
        )
        .unwrap();
        let duration = mix.track.duration_sec();
        let start = fold
            .push_page(&mix.narration, duration, cfg.slide_duration)
            .unwrap();
        starts.push(start);
        durations.push(duration);
        tracks.push(mix.track);
    }
    Timeline {
        fold,
        starts,
        tracks,
        durations,
    }
}

#[test]
fn three_pages_tile_the_timeline_exactly() {
    let timeline = fold_pages(&[2.0, 3.0, 1.5]);

    // Page track durations: framing silence around each speech segment.
    assert!((timeline.durations[0] - 4.4).abs() < 1e-9); // fade+2.0+fade+slide
    assert!((timeline.durations[1] - 5.8).abs() < 1e-9); // slide+fade+3.0+fade+slide
    assert!((timeline.durations[2] - 4.3).abs() < 1e-9);

    // Clip starts follow sum(d[..i]) - slide * i.
    assert!((timeline.starts[0] - 0.0).abs() < 1e-9);
    assert!((timeline.starts[1] - 4.0).abs() < 1e-9);
    assert!((timeline.starts[2] - 9.4).abs() < 1e-9);

    // One absolute narration span per page.
    let spans = timeline.fold.page_spans();
    assert_eq!(spans.len(), 3);
    assert!((spans[0].start_sec - 1.0).abs() < 1e-9);
    assert!((spans[0].end_sec - 3.0).abs() < 1e-9);
    assert!((spans[1].start_sec - 5.4).abs() < 1e-9);
    assert!((spans[1].end_sec - 8.4).abs() < 1e-9);
    assert!((spans[2].start_sec - 10.8).abs() < 1e-9);
    assert!((spans[2].end_sec - 12.3).abs() < 1e-9);

    // Composite duration: sum of raw durations minus two slide overlaps.
    let mut rng = StdRng::seed_from_u64(1);
    let plan = plan_slides(&timeline.durations, 0.4, &mut rng).unwrap();
    assert!((plan.total_duration - 13.7).abs() < 1e-9);
    for (step, start) in plan.steps.iter().zip(&timeline.starts) {
        assert!((step.start_sec - start).abs() < 1e-9);
    }
}

#[test]
fn master_mix_and_music_fit_the_composite_exactly() {
    let timeline = fold_pages(&[2.0, 3.0, 1.5]);

    let mut master = AudioBuffer::silence(RATE, 0.0);
    for (start, track) in timeline.starts.iter().zip(&timeline.tracks) {
        let offset = (start * f64::from(RATE)).round() as usize;
        master.add_at(track, offset);
    }

    // The overlapped placement ends exactly at the composite duration.
    let expected_frames = (13.7 * f64::from(RATE)).round() as usize;
    assert_eq!(master.frames(), expected_frames);

    // A 10s music bed loops to the composite length; a 20s one truncates.
    let short_music = speech(10.0);
    assert_eq!(short_music.loop_or_fit(master.frames()).frames(), expected_frames);
    let long_music = speech(20.0);
    assert_eq!(long_music.loop_or_fit(master.frames()).frames(), expected_frames);
}

#[test]
fn narration_spans_feed_a_valid_srt() {
    let timeline = fold_pages(&[2.0, 3.0, 1.5]);
    let captions = vec![
        "A cat sat on the mat and looked at the bird".to_string(),
        "The bird flew away".to_string(),
        String::new(),
    ];
    let srt = build_srt(timeline.fold.page_spans(), &captions, 15).unwrap();

    // Page 1 narration runs 1.0..3.0; its first cue starts there.
    assert!(srt.starts_with("1\n00:00:01,000 --> "));
    // The empty caption contributes no cue.
    let cue_count = srt.matches(" --> ").count();
    let last_cue_number = srt
        .lines()
        .filter(|l| l.chars().all(|c| c.is_ascii_digit()) && !l.is_empty())
        .next_back()
        .unwrap()
        .parse::<usize>()
        .unwrap();
    assert_eq!(cue_count, last_cue_number);
}

#[test]
fn sound_effect_gain_reduces_to_the_documented_formula() {
    // Sound RMS twice the speech RMS, sound_volume 0.2, ratio 0.4 -> 0.04.
    assert!((background_gain(0.2, 0.3, 0.6, 0.4) - 0.04).abs() < 1e-7);
}

#[test]
fn renders_are_reproducible_for_a_seed() {
    let timeline = fold_pages(&[2.0, 2.5, 3.0, 1.5]);
    let plan_a = plan_slides(&timeline.durations, 0.4, &mut StdRng::seed_from_u64(7)).unwrap();
    let plan_b = plan_slides(&timeline.durations, 0.4, &mut StdRng::seed_from_u64(7)).unwrap();
    assert_eq!(plan_a.steps, plan_b.steps);
}
