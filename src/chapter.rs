//! Chapter-level filter: a stricter second pass over reconciled headings
//! for callers that only want top-level divisions.

use crate::candidate::{Heading, NEUTRAL_PAGE_HEIGHT};
use crate::classify::{chapter_regex, matches_special_keyword};

/// Mean font size across the reconciled headings; 0 when there are none.
pub fn average_font_size(headings: &[Heading]) -> f32 {
    if headings.is_empty() {
        return 0.0;
    }
    headings.iter().map(|h| h.font_size).sum::<f32>() / headings.len() as f32
}

/// Estimated page height when no explicit geometry survived reconciliation:
/// at least the neutral height, stretched to cover the deepest y observed.
pub fn estimate_page_height(headings: &[Heading]) -> f32 {
    let max_y = headings
        .iter()
        .map(|h| h.y)
        .filter(|y| *y > 0.0)
        .fold(0.0_f32, f32::max);
    NEUTRAL_PAGE_HEIGHT.max(1.5 * max_y)
}

/// A heading is chapter-level when any of the prominence signals holds:
/// chapter keyword, special keyword, short all-uppercase title, or a
/// clearly oversized font near the top of the page.
pub fn is_chapter_heading(h: &Heading, avg_font: f32, page_height: f32) -> bool {
    let text = h.title.trim();
    if text.is_empty() {
        return false;
    }
    if chapter_regex().is_match(&text.to_uppercase()) {
        return true;
    }
    if matches_special_keyword(text) {
        return true;
    }
    if text == text.to_uppercase() && text.split_whitespace().count() <= 8 {
        return true;
    }
    if h.font_size >= avg_font + 2.0 && h.y < 0.25 * page_height {
        return true;
    }
    false
}

/// Assigns `level` on every heading (1 when the font stands out from the
/// document average) and returns the chapter-only view: headings that are
/// both chapter-level and level 1.
pub fn chapter_view(headings: &mut [Heading]) -> Vec<Heading> {
    let avg_font = average_font_size(headings);
    let page_height = estimate_page_height(headings);

    for h in headings.iter_mut() {
        h.level = if h.font_size >= avg_font + 2.0 { 1 } else { 0 };
    }

    headings
        .iter()
        .filter(|h| h.level == 1 && is_chapter_heading(h, avg_font, page_height))
        .cloned()
        .collect()
}

/// Assigns levels without filtering, for the full heading listing.
pub fn assign_levels(headings: &mut [Heading]) {
    let avg_font = average_font_size(headings);
    for h in headings.iter_mut() {
        h.level = if h.font_size >= avg_font + 2.0 { 1 } else { 0 };
    }
}
