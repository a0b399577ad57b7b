use chapterize::classify::{is_probable_heading, score_heading, LineFeatures};
use chapterize::config::Classify;

fn neutral() -> LineFeatures {
    LineFeatures::neutral()
}

#[test]
fn special_keyword_always_accepted() {
    let cfg = Classify::default();
    // Keyword match takes precedence over every font rule, even strict.
    assert!(is_probable_heading("Prologue", neutral(), &[], &cfg, true));
    assert!(is_probable_heading(
        "Foreword by the Editor",
        neutral(),
        &[],
        &cfg,
        true
    ));
}

#[test]
fn chapter_regex_accepted() {
    let cfg = Classify::default();
    assert!(is_probable_heading(
        "Chapter 3: The Reckoning",
        neutral(),
        &[],
        &cfg,
        true
    ));
    assert!(is_probable_heading("PART IV - The Fall", neutral(), &[], &cfg, true));
    assert!(is_probable_heading("Volume II", neutral(), &[], &cfg, true));
}

#[test]
fn rejects_empty_short_and_symbol_lines() {
    let cfg = Classify::default();
    assert!(!is_probable_heading("", neutral(), &[], &cfg, false));
    assert!(!is_probable_heading("   ", neutral(), &[], &cfg, false));
    assert!(!is_probable_heading("A", neutral(), &[], &cfg, false));
    assert!(!is_probable_heading("=======", neutral(), &[], &cfg, false));
    assert!(!is_probable_heading("- - - -", neutral(), &[], &cfg, false));
}

#[test]
fn custom_keyword_substring_match() {
    let cfg = Classify::default();
    let kws = vec!["recipes".to_string()];
    assert!(is_probable_heading(
        "Best RECIPES of 1900",
        neutral(),
        &kws,
        &cfg,
        true
    ));
}

#[test]
fn strict_disables_loose_font_rule() {
    let cfg = Classify::default();
    // Neutral features only pass the loose rule (font == avg, gap > 10).
    assert!(is_probable_heading("Just a sentence", neutral(), &[], &cfg, false));
    assert!(!is_probable_heading("Just a sentence", neutral(), &[], &cfg, true));
}

#[test]
fn tight_font_rule_survives_strict() {
    let cfg = Classify::default();
    let feat = LineFeatures {
        font_size: 18.0,
        y: 40.0,
        page_height: 800.0,
        whitespace_above: 30.0,
        avg_font: 12.0,
    };
    assert!(is_probable_heading("An Unmarked Title", feat, &[], &cfg, true));
}

#[test]
fn score_is_additive() {
    // y in top quarter (+0.2), chapter regex (+0.3), gap > 20 (+0.1).
    let s = score_heading("Chapter 2", neutral(), &[]);
    assert!((s - 0.6).abs() < 1e-6);

    // Special keyword and custom keyword bonuses stack.
    let kws = vec!["recipes".to_string()];
    let s = score_heading("Epilogue of recipes", neutral(), &kws);
    assert!((s - 0.7).abs() < 1e-6);
}

#[test]
fn score_unbounded_with_many_custom_keywords() {
    let kws = vec![
        "alpha".to_string(),
        "beta".to_string(),
        "gamma".to_string(),
        "delta".to_string(),
        "epsilon".to_string(),
    ];
    let s = score_heading("alpha beta gamma delta epsilon", neutral(), &kws);
    assert!(s > 1.0);
}
