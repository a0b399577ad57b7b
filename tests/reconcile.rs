use chapterize::candidate::{Candidate, Source};
use chapterize::reconcile::{estimate_page_offset, merge_and_sort, reconcile};

fn cand(text: &str, page: i32, score: f32) -> Candidate {
    Candidate::neutral(text, page, score, Source::TocText).expect("non-empty text")
}

#[test]
fn sorts_by_score_descending() {
    let candidates = vec![cand("Minor", 1, 0.3), cand("Major", 2, 0.9)];
    let headings = reconcile(candidates, 10);
    assert_eq!(headings[0].title, "Major");
    assert_eq!(headings[1].title, "Minor");
}

#[test]
fn equal_scores_keep_merge_order() {
    let candidates = vec![cand("A", 1, 0.5), cand("B", 2, 0.5), cand("C", 3, 0.5)];
    let titles: Vec<String> = reconcile(candidates, 10)
        .into_iter()
        .map(|h| h.title)
        .collect();
    assert_eq!(titles, vec!["A", "B", "C"]);
}

#[test]
fn first_seen_duplicate_wins() {
    let candidates = vec![
        cand("Intro", 1, 0.2),
        cand("  INTRO ", 1, 0.9),
        cand("Body", 2, 0.5),
    ];
    let headings = merge_and_sort(candidates, 0, 10);
    assert_eq!(headings.len(), 2);
    let intro = headings.iter().find(|h| h.title.trim() == "Intro").unwrap();
    assert!((intro.score - 0.2).abs() < 1e-6);
}

#[test]
fn merge_is_idempotent() {
    let candidates = vec![
        cand("One", 1, 0.5),
        cand("one", 1, 0.8),
        cand("Two", 2, 0.5),
        cand("Three", 3, 0.5),
    ];
    let first = merge_and_sort(candidates, 0, 10);

    let again: Vec<Candidate> = first
        .iter()
        .map(|h| cand(&h.title, h.page, h.score))
        .collect();
    let second = merge_and_sort(again, 0, 10);

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.title, b.title);
        assert_eq!(a.page, b.page);
    }
}

#[test]
fn constant_offset_is_estimated_and_applied() {
    let candidates = vec![
        cand("A", 6, 0.5),
        cand("B", 7, 0.5),
        cand("C", 8, 0.5),
        cand("D", 9, 0.5),
    ];
    assert_eq!(estimate_page_offset(&candidates, 20), 5);

    let pages: Vec<i32> = reconcile(candidates, 20).into_iter().map(|h| h.page).collect();
    assert_eq!(pages, vec![1, 2, 3, 4]);
}

#[test]
fn out_of_range_correction_keeps_original_page() {
    let candidates = vec![
        cand("A", 6, 0.5),
        cand("B", 7, 0.5),
        cand("C", 8, 0.5),
        cand("D", 2, 0.5),
    ];
    assert_eq!(estimate_page_offset(&candidates, 20), 5);

    let headings = reconcile(candidates, 20);
    let d = headings.iter().find(|h| h.title == "D").unwrap();
    assert_eq!(d.page, 2);
}

#[test]
fn unresolved_pages_do_not_feed_the_estimator() {
    let candidates = vec![cand("A", -1, 0.5), cand("B", -1, 0.5)];
    assert_eq!(estimate_page_offset(&candidates, 20), 0);
}
