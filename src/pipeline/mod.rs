pub mod layout;
pub mod ocr;
pub mod outline;
pub mod toc;

use crate::{
    candidate::{Candidate, DetectOptions, Heading, Source},
    config::Config,
    reconcile,
    report::DetectReport,
    source::{DocumentSource, OcrEngine},
};
use anyhow::Result;
use tracing::{info, warn};

/// Multi-source heading detector over one document.
///
/// The outline, TOC-text, and layout pipelines are order-independent and
/// all complete before reconciliation; OCR runs only as a fallback. Each
/// run owns its accumulators, so a detector is safe to reuse across
/// documents.
pub struct Detector<'a, S: DocumentSource + OcrEngine> {
    cfg: &'a Config,
    source: &'a S,
}

pub struct DetectOutput {
    pub headings: Vec<Heading>,
    pub report: DetectReport,
}

impl<'a, S: DocumentSource + OcrEngine> Detector<'a, S> {
    pub fn new(cfg: &'a Config, source: &'a S) -> Self {
        Self { cfg, source }
    }

    /// Best-effort entry point for embedders that only want the list:
    /// never errors. Per-source failures are logged and skipped inside
    /// the pipelines; a total failure (document unreadable, resource
    /// exhaustion) yields an empty list. The CLI calls [`Self::run`]
    /// instead because it persists the report and surfaces total failure
    /// to the user.
    pub fn detect_headings(&self, opts: &DetectOptions) -> Vec<Heading> {
        match self.run(opts) {
            Ok(out) => out.headings,
            Err(err) => {
                warn!("detection failed, returning no headings: {err:#}");
                Vec::new()
            }
        }
    }

    /// Full run with per-source diagnostics, for callers that persist a
    /// report. Errors only on total failure.
    pub fn run(&self, opts: &DetectOptions) -> Result<DetectOutput> {
        let cfg = self.cfg;
        let source = self.source;
        let page_count = source.page_count()?;
        let keywords = &opts.custom_keywords;

        let mut candidates: Vec<Candidate> = Vec::new();

        let from_outline = log_or_empty("outline", outline::run(cfg, source, keywords));
        let from_toc = log_or_empty("toc", toc::run(cfg, source, keywords));
        let from_layout = log_or_empty("layout", layout::run(cfg, source, keywords));

        let (outline_n, toc_n, layout_n) =
            (from_outline.len(), from_toc.len(), from_layout.len());
        candidates.extend(from_outline);
        candidates.extend(from_toc);
        candidates.extend(from_layout);

        let image_based = ocr::looks_image_based(cfg, source).unwrap_or(false);
        let ocr_ran = candidates.is_empty() || image_based;
        let mut ocr_n = 0;
        if ocr_ran {
            info!(
                "running OCR fallback (empty={} image_based={})",
                candidates.is_empty(),
                image_based
            );
            let from_ocr = log_or_empty("ocr", ocr::run(cfg, source, source, keywords));
            ocr_n = from_ocr.len();
            candidates.extend(from_ocr);
        }

        let mut manual_n = 0;
        for (page, title) in &opts.manual_headings {
            if let Some(c) = Candidate::neutral(title, *page as i32, 1.0, Source::Manual) {
                candidates.push(c);
                manual_n += 1;
            }
        }

        let page_offset = reconcile::estimate_page_offset(&candidates, page_count);
        let headings = reconcile::reconcile(candidates, page_count);

        info!(
            "detected {} headings (outline={} toc={} layout={} ocr={} manual={})",
            headings.len(),
            outline_n,
            toc_n,
            layout_n,
            ocr_n,
            manual_n
        );

        Ok(DetectOutput {
            report: DetectReport {
                page_count,
                outline_candidates: outline_n,
                toc_candidates: toc_n,
                layout_candidates: layout_n,
                ocr_candidates: ocr_n,
                manual_candidates: manual_n,
                ocr_ran,
                image_based,
                page_offset,
                heading_count: headings.len(),
            },
            headings,
        })
    }
}

/// A single source failing to produce is never fatal; the remaining
/// sources still contribute.
fn log_or_empty(name: &str, res: Result<Vec<Candidate>>) -> Vec<Candidate> {
    match res {
        Ok(v) => v,
        Err(err) => {
            warn!("{name} pipeline failed, skipping: {err:#}");
            Vec::new()
        }
    }
}
