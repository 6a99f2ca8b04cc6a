use super::*;

fn span(start: f64, end: f64) -> TimeSpan {
    TimeSpan::new(start, end).unwrap()
}

#[test]
fn cursor_advances_by_duration_minus_slide() {
    let mut fold = TimelineCursor::new();
    let start1 = fold.push_page(&[span(1.0, 3.0)], 4.4, 0.4).unwrap();
    assert_eq!(start1, 0.0);
    assert!((fold.cursor_sec() - 4.0).abs() < 1e-9);

    let start2 = fold.push_page(&[span(1.4, 4.4)], 5.8, 0.4).unwrap();
    assert!((start2 - 4.0).abs() < 1e-9);
    assert!((fold.cursor_sec() - 9.4).abs() < 1e-9);
}

#[test]
fn spans_become_absolute() {
    let mut fold = TimelineCursor::new();
    fold.push_page(&[span(1.0, 3.0)], 4.4, 0.4).unwrap();
    fold.push_page(&[span(1.4, 4.4)], 5.8, 0.4).unwrap();

    let spans = fold.utterance_spans();
    assert!((spans[0].start_sec - 1.0).abs() < 1e-9);
    assert!((spans[1].start_sec - 5.4).abs() < 1e-9);
    assert!((spans[1].end_sec - 8.4).abs() < 1e-9);
}

#[test]
fn page_spans_collapse_multi_utterance_pages() {
    let mut fold = TimelineCursor::new();
    fold.push_page(
        &[span(1.0, 2.0), span(2.0, 2.5), span(2.5, 3.0)],
        4.4,
        0.4,
    )
    .unwrap();

    assert_eq!(fold.utterance_spans().len(), 3);
    let pages = fold.page_spans();
    assert_eq!(pages.len(), 1);
    assert!((pages[0].start_sec - 1.0).abs() < 1e-9);
    assert!((pages[0].end_sec - 3.0).abs() < 1e-9);
}

#[test]
fn empty_span_list_is_rejected() {
    let mut fold = TimelineCursor::new();
    assert!(fold.push_page(&[], 4.4, 0.4).is_err());
}
