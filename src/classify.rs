//! Heading classifier and scorer. Pure functions; every pipeline funnels
//! its candidate lines through these before emitting a `Candidate`.

use crate::config::Classify;
use regex::Regex;
use std::sync::OnceLock;

/// Fixed trigger phrases matched as a whole word at the start of a title.
pub const SPECIAL_KEYWORDS: [&str; 5] = [
    "prologue",
    "epilogue",
    "introduction",
    "preface",
    "foreword",
];

/// Generic division headings: "CHAPTER 3", "Part IV: The Fall", "SECTION 2 - Scope".
pub fn chapter_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(CHAPTER|SECTION|PART|UNIT|BOOK|VOLUME|MODULE)\s+(\d+|[IVXLCDM]+)?(\s*[:\-].*)?$")
            .expect("valid chapter regex")
    })
}

/// Decorative separator lines ("====", "----", "* * *").
fn symbol_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[=\-_~*.\s]+$").expect("valid symbol-line regex"))
}

/// Does `text` equal a special keyword, or start with one followed by a space?
pub fn matches_special_keyword(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    SPECIAL_KEYWORDS
        .iter()
        .any(|kw| lower == *kw || lower.starts_with(&format!("{kw} ")))
}

fn matches_custom_keyword(text: &str, custom_keywords: &[String]) -> bool {
    let lower = text.to_lowercase();
    custom_keywords
        .iter()
        .any(|kw| !kw.is_empty() && lower.contains(&kw.to_lowercase()))
}

/// Layout and context features for one candidate line.
///
/// Metadata-only sources (outline, TOC text, OCR) pass the neutral values
/// from [`crate::candidate`]; the layout pipeline passes real measurements
/// and its running font average.
#[derive(Debug, Clone, Copy)]
pub struct LineFeatures {
    pub font_size: f32,
    pub y: f32,
    pub page_height: f32,
    pub whitespace_above: f32,
    pub avg_font: f32,
}

impl LineFeatures {
    pub fn neutral() -> Self {
        Self {
            font_size: crate::candidate::NEUTRAL_FONT_SIZE,
            y: 0.0,
            page_height: crate::candidate::NEUTRAL_PAGE_HEIGHT,
            whitespace_above: crate::candidate::NEUTRAL_WHITESPACE,
            avg_font: crate::candidate::NEUTRAL_FONT_SIZE,
        }
    }
}

/// Is this line a probable heading?
///
/// Rules are ordered by precision: the keyword/regex rules fire first, the
/// font/whitespace rules are a positional catch-all. `strict` disables the
/// loosest font rule so callers can restrict acceptance to high-confidence
/// matches.
pub fn is_probable_heading(
    text: &str,
    feat: LineFeatures,
    custom_keywords: &[String],
    cfg: &Classify,
    strict: bool,
) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.chars().count() < cfg.min_title_chars {
        return false;
    }
    if symbol_line_regex().is_match(trimmed) {
        return false;
    }
    if chapter_regex().is_match(&trimmed.to_uppercase()) {
        return true;
    }
    if matches_special_keyword(trimmed) {
        return true;
    }
    if matches_custom_keyword(trimmed, custom_keywords) {
        return true;
    }
    if feat.font_size >= feat.avg_font + 2.0 && feat.whitespace_above > 20.0 {
        return true;
    }
    if !strict && feat.font_size >= feat.avg_font && feat.whitespace_above > 10.0 {
        return true;
    }
    false
}

/// Confidence score for an accepted line. Purely additive and unclamped;
/// keyword bonuses stack, so this is a ranking signal rather than a
/// probability.
pub fn score_heading(text: &str, feat: LineFeatures, custom_keywords: &[String]) -> f32 {
    let trimmed = text.trim();
    let mut score = 0.0;

    if feat.font_size >= feat.avg_font + 2.0 {
        score += 0.4;
    }
    if feat.y < 0.25 * feat.page_height {
        score += 0.2;
    }
    if chapter_regex().is_match(&trimmed.to_uppercase()) {
        score += 0.3;
    }
    if matches_special_keyword(trimmed) {
        score += 0.2;
    }
    let lower = trimmed.to_lowercase();
    for kw in custom_keywords {
        if !kw.is_empty() && lower.contains(&kw.to_lowercase()) {
            score += 0.2;
        }
    }
    if feat.whitespace_above > 20.0 {
        score += 0.1;
    }
    score
}
