use super::*;

const RATE: u32 = 16_000;

fn cfg() -> AudioMixConfig {
    AudioMixConfig {
        fade_duration: 1.0,
        slide_duration: 0.4,
        sound_volume: 0.2,
        bg_speech_ratio: 0.4,
    }
}

fn constant(duration_sec: f64, value: f32) -> AudioBuffer {
    let frames = (f64::from(RATE) * duration_sec) as usize;
    AudioBuffer::from_interleaved(RATE, vec![value; frames * 2]).unwrap()
}

#[test]
fn first_page_has_trailing_slide_only() {
    let mix = mix_page(&[constant(2.0, 0.5)], None, PagePosition::First, &cfg()).unwrap();
    // fade + speech + fade + slide
    assert!((mix.track.duration_sec() - 4.4).abs() < 1e-9);
    assert_eq!(mix.narration.len(), 1);
    assert!((mix.narration[0].start_sec - 1.0).abs() < 1e-9);
    assert!((mix.narration[0].end_sec - 3.0).abs() < 1e-9);
}

#[test]
fn interior_page_is_framed_on_both_sides() {
    let mix = mix_page(&[constant(3.0, 0.5)], None, PagePosition::Interior, &cfg()).unwrap();
    // slide + fade + speech + fade + slide
    assert!((mix.track.duration_sec() - 5.8).abs() < 1e-9);
    assert!((mix.narration[0].start_sec - 1.4).abs() < 1e-9);
    assert!((mix.narration[0].end_sec - 4.4).abs() < 1e-9);
}

#[test]
fn last_page_matches_interior_framing() {
    let interior = mix_page(&[constant(1.5, 0.5)], None, PagePosition::Interior, &cfg()).unwrap();
    let last = mix_page(&[constant(1.5, 0.5)], None, PagePosition::Last, &cfg()).unwrap();
    assert_eq!(interior.track.frames(), last.track.frames());
    assert_eq!(interior.narration, last.narration);
}

#[test]
fn utterances_concatenate_without_inner_padding() {
    let parts = [constant(1.0, 0.5), constant(0.5, 0.5), constant(0.25, 0.5)];
    let mix = mix_page(&parts, None, PagePosition::Interior, &cfg()).unwrap();

    assert_eq!(mix.narration.len(), 3);
    // Leading slide silence is part of the local offsets.
    assert!((mix.narration[0].start_sec - 1.4).abs() < 1e-9);
    for pair in mix.narration.windows(2) {
        assert!((pair[0].end_sec - pair[1].start_sec).abs() < 1e-9);
    }
    assert!((mix.narration[2].end_sec - 3.15).abs() < 1e-9);
}

#[test]
fn sound_effect_gain_follows_the_loudness_formula() {
    // speech rms 0.4, sound rms 0.8 => gain = 0.2 * 0.5 * 0.4 = 0.04.
    let speech = constant(2.0, 0.4);
    let sound = constant(2.0, 0.8);
    let mix = mix_page(&[speech], Some(&sound), PagePosition::First, &cfg()).unwrap();

    // Sample the middle of the narration: past the effect's fade-in, where
    // speech contributes 0.4 and the scaled effect 0.8 * 0.04.
    let idx = (f64::from(RATE) * 2.0) as usize * 2;
    let got = mix.track.samples()[idx];
    assert!((got - (0.4 + 0.8 * 0.04)).abs() < 1e-5, "got {got}");
}

#[test]
fn short_sound_effect_loops_to_the_track_length() {
    let speech = constant(3.0, 0.4);
    let sound = constant(0.5, 0.8);
    let mix = mix_page(&[speech], Some(&sound), PagePosition::First, &cfg()).unwrap();
    // Track length is unchanged by the effect: loop, not extend.
    assert!((mix.track.duration_sec() - 5.4).abs() < 1e-9);
}

#[test]
fn silent_sound_effect_is_skipped() {
    let speech = constant(1.0, 0.4);
    let sound = AudioBuffer::silence(RATE, 1.0);
    let with = mix_page(&[speech.clone()], Some(&sound), PagePosition::First, &cfg()).unwrap();
    let without = mix_page(&[speech], None, PagePosition::First, &cfg()).unwrap();
    assert_eq!(with.track.samples(), without.track.samples());
}

#[test]
fn empty_speech_is_rejected() {
    assert!(mix_page(&[], None, PagePosition::First, &cfg()).is_err());
}

#[test]
fn background_gain_reduces_to_base_volume_at_equal_rms() {
    assert!((background_gain(0.2, 0.5, 0.5, 1.0) - 0.2).abs() < 1e-7);
    assert!((background_gain(0.2, 0.5, 1.0, 0.4) - 0.04).abs() < 1e-7);
    assert_eq!(background_gain(0.2, 0.5, 0.0, 1.0), 0.0);
}

#[test]
fn framed_duration_matches_the_mixer() {
    let c = cfg();
    let mix = mix_page(&[constant(2.0, 0.5)], None, PagePosition::Interior, &c).unwrap();
    assert!(
        (framed_duration_sec(2.0, PagePosition::Interior, &c) - mix.track.duration_sec()).abs()
            < 1e-9
    );
}
