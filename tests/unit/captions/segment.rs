use super::*;

#[test]
fn latin_lines_stay_within_the_limit() {
    let lines = segment_caption("A cat sat on the mat and looked at the bird", 15);
    assert!(!lines.is_empty());
    for line in &lines {
        assert!(line.chars().count() <= 15, "line too long: {line:?}");
    }
}

#[test]
fn latin_words_are_never_split_or_dropped() {
    let caption = "A cat sat on the mat and looked at the bird";
    let lines = segment_caption(caption, 15);
    let rejoined = lines.join(" ");
    assert_eq!(rejoined, caption);
}

#[test]
fn latin_packs_greedily() {
    assert_eq!(
        segment_caption("one two three four", 9),
        vec!["one two", "three", "four"]
    );
}

#[test]
fn oversized_word_gets_its_own_line() {
    let lines = segment_caption("a pneumonoultramicroscopic b", 10);
    assert_eq!(lines, vec!["a", "pneumonoultramicroscopic", "b"]);
}

#[test]
fn empty_caption_yields_no_lines() {
    assert!(segment_caption("", 10).is_empty());
    assert!(segment_caption("   ", 10).is_empty());
}

#[test]
fn cjk_wraps_at_punctuation() {
    let caption = "\u{5c0f}\u{732b}\u{5750}\u{5728}\u{5730}\u{6bef}\u{4e0a}\u{ff0c}\u{5b83}\u{770b}\u{7740}\u{5c0f}\u{9e1f}\u{3002}";
    let lines = segment_caption(caption, 8);
    assert_eq!(lines.len(), 2);
    // The comma stays attached to the first clause.
    assert!(lines[0].ends_with('\u{ff0c}'));
    for line in &lines {
        assert!(line.chars().count() <= 9);
    }
}

#[test]
fn cjk_round_trips_content() {
    let caption = "\u{4eca}\u{5929}\u{5929}\u{6c14}\u{5f88}\u{597d}\u{3002}\u{6211}\u{4eec}\u{53bb}\u{516c}\u{56ed}\u{6563}\u{6b65}\u{ff01}";
    let lines = segment_caption(caption, 6);
    let rejoined: String = lines.concat();
    assert_eq!(rejoined, caption);
}

#[test]
fn cjk_clause_longer_than_limit_stays_whole() {
    let caption = "\u{4e00}\u{4e8c}\u{4e09}\u{56db}\u{4e94}\u{516d}\u{4e03}\u{516b}\u{3002}";
    let lines = segment_caption(caption, 4);
    assert_eq!(lines[0].chars().count(), 9);
}

#[test]
fn mode_is_picked_from_the_first_character() {
    // Digit-leading captions take the CJK path: no word splitting.
    let lines = segment_caption("12345 67890", 5);
    assert_eq!(lines, vec!["12345 67890"]);
}
