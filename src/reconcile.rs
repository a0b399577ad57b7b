//! Reconciler: page-offset estimation, deduplication, and final ordering
//! over the combined candidate list.

use crate::candidate::{Candidate, Heading};
use std::collections::HashSet;
use tracing::debug;

/// Estimates the constant offset between printed page labels and physical
/// page indexes as the median of `page - position - 1` over candidates
/// whose page is in `[1, page_count]`. Zero when nothing qualifies.
///
/// Keying off the candidate's position in the unsorted sequence is a
/// coarse approximation; see DESIGN.md.
pub fn estimate_page_offset(candidates: &[Candidate], page_count: u32) -> i32 {
    let mut diffs: Vec<i32> = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| c.page >= 1 && c.page <= page_count as i32)
        .map(|(pos, c)| c.page - pos as i32 - 1)
        .collect();
    if diffs.is_empty() {
        return 0;
    }
    diffs.sort_unstable();
    diffs[diffs.len() / 2]
}

/// Applies `offset` to a candidate page, keeping the original when the
/// corrected index would leave `[1, page_count]`.
fn corrected_page(page: i32, offset: i32, page_count: u32) -> i32 {
    let shifted = page - offset;
    if shifted >= 1 && shifted <= page_count as i32 {
        shifted
    } else {
        page
    }
}

/// Merge key: trimmed, lowercased text plus the corrected page. The first
/// candidate seen for a key wins; callers wanting highest-score-wins must
/// pre-sort before merging.
fn merge_key(text: &str, page: i32) -> String {
    format!("{}@{}", text.trim().to_lowercase(), page)
}

/// Full reconciliation: estimate the global page offset, then merge and
/// order. `level` starts at 0 for every heading; the chapter filter
/// assigns it.
pub fn reconcile(candidates: Vec<Candidate>, page_count: u32) -> Vec<Heading> {
    let offset = estimate_page_offset(&candidates, page_count);
    if offset != 0 {
        debug!("estimated page offset: {offset}");
    }
    merge_and_sort(candidates, offset, page_count)
}

/// Deduplicates candidates under the text@page key and produces final
/// headings sorted by score descending. The sort is stable, so equal
/// scores keep merge order; the step is idempotent for a given offset.
pub fn merge_and_sort(candidates: Vec<Candidate>, offset: i32, page_count: u32) -> Vec<Heading> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut headings: Vec<Heading> = Vec::new();
    for c in candidates {
        let page = corrected_page(c.page, offset, page_count);
        let key = merge_key(&c.text, page);
        if !seen.insert(key) {
            continue;
        }
        headings.push(Heading {
            title: c.text,
            page,
            level: 0,
            score: c.score,
            font_size: c.font_size,
            y: c.y,
        });
    }

    headings.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    headings
}
