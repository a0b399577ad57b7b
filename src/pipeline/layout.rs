//! Layout-heuristic pipeline: an explicit fold over the document's text
//! lines carrying the per-run accumulators (running font average, per-page
//! fallback flags, hyphen-continuation buffer). Lines must arrive in
//! reading order; this pass is strictly sequential.

use crate::{
    candidate::{Candidate, FontStats, Source, TextLine, NEUTRAL_PAGE_HEIGHT},
    classify::{self, LineFeatures},
    config::Config,
    source::DocumentSource,
};
use anyhow::Result;
use std::collections::HashSet;

#[derive(Debug, Default)]
struct LayoutState {
    font_stats: FontStats,
    /// Pages where the positional fallback already fired.
    fallback_pages: HashSet<u32>,
    /// Word fragments from hyphen-broken lines, joined without separator.
    hyphen_buffer: Vec<String>,
}

pub fn run(
    cfg: &Config,
    source: &dyn DocumentSource,
    custom_keywords: &[String],
) -> Result<Vec<Candidate>> {
    let heights = source.page_heights()?;
    let lines = source.text_lines()?;

    let mut state = LayoutState::default();
    let mut out = Vec::new();

    for line in &lines {
        // The running average covers every line, heading or not, so the
        // baseline tracks body text as the document is consumed.
        state.font_stats.push(line.font_size);

        let trimmed = line.text.trim();
        if let Some(stem) = trimmed.strip_suffix('-') {
            state.hyphen_buffer.push(stem.to_string());
            continue;
        }

        let text = if state.hyphen_buffer.is_empty() {
            trimmed.to_string()
        } else {
            let mut joined = state.hyphen_buffer.concat();
            joined.push_str(trimmed);
            state.hyphen_buffer.clear();
            joined
        };

        let page_height = heights
            .get((line.page as usize).saturating_sub(1))
            .copied()
            .unwrap_or(NEUTRAL_PAGE_HEIGHT);
        let feat = LineFeatures {
            font_size: line.font_size,
            y: line.y,
            page_height,
            whitespace_above: line.whitespace_above,
            avg_font: state.font_stats.average(),
        };

        let probable = classify::is_probable_heading(
            &text,
            feat,
            custom_keywords,
            &cfg.classify,
            cfg.classify.strict,
        );
        let fallback = positional_fallback(&mut state, line, feat);

        if (probable || fallback) && !text.trim().is_empty() {
            let score = classify::score_heading(&text, feat, custom_keywords);
            if let Some(c) = Candidate::new(
                &text,
                line.page as i32,
                line.font_size,
                line.y,
                line.whitespace_above,
                score,
                Source::LayoutHeuristic,
            ) {
                out.push(c);
            }
        }
    }
    Ok(out)
}

/// At most one prominent line per page is accepted regardless of the
/// classifier: bold or at least average-sized, in the top third of the
/// page. Keeps pages with no keyword match from going unrepresented
/// without flooding them with weak detections.
fn positional_fallback(state: &mut LayoutState, line: &TextLine, feat: LineFeatures) -> bool {
    if state.fallback_pages.contains(&line.page) {
        return false;
    }
    if (line.bold || line.font_size >= feat.avg_font) && line.y < feat.page_height * 0.33 {
        state.fallback_pages.insert(line.page);
        return true;
    }
    false
}
