//! OCR fallback for image-only documents. Each page is rendered and
//! recognized independently; a failing page is logged and skipped so one
//! bad raster never aborts the whole document.

use crate::{
    candidate::{Candidate, Source},
    classify::{self, LineFeatures},
    config::Config,
    source::{DocumentSource, OcrEngine},
};
use anyhow::Result;
use tracing::warn;
use unicode_normalization::UnicodeNormalization;

/// Samples up to `density_sample_pages` pages; the document counts as
/// image-based when every sampled page yields fewer than
/// `density_min_chars` extractable characters.
pub fn looks_image_based(cfg: &Config, source: &dyn DocumentSource) -> Result<bool> {
    let page_count = source.page_count()?;
    if page_count == 0 {
        return Ok(false);
    }
    let sample = cfg.ocr.density_sample_pages.min(page_count);
    for page in 1..=sample {
        let text = source.plain_text(page, page)?;
        if text.trim().chars().count() >= cfg.ocr.density_min_chars {
            return Ok(false);
        }
    }
    Ok(true)
}

pub fn run(
    cfg: &Config,
    source: &dyn DocumentSource,
    ocr: &dyn OcrEngine,
    custom_keywords: &[String],
) -> Result<Vec<Candidate>> {
    let page_count = source.page_count()?;
    let feat = LineFeatures::neutral();
    let mut out = Vec::new();

    for page in 1..=page_count {
        let text = match ocr.page_text(page, cfg.ocr.dpi) {
            Ok(t) => t,
            Err(err) => {
                warn!("ocr failed for page {page}, skipping: {err:#}");
                continue;
            }
        };
        for raw in text.lines() {
            let line: String = raw.trim().nfkc().collect();
            if line.is_empty() {
                continue;
            }
            if !classify::is_probable_heading(
                &line,
                feat,
                custom_keywords,
                &cfg.classify,
                cfg.classify.strict,
            ) {
                continue;
            }
            let score = classify::score_heading(&line, feat, custom_keywords);
            if let Some(c) = Candidate::neutral(&line, page as i32, score, Source::Ocr) {
                out.push(c);
            }
        }
    }
    Ok(out)
}
