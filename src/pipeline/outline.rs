use crate::{
    candidate::{Candidate, Source},
    classify::{self, LineFeatures},
    config::Config,
    source::DocumentSource,
};
use anyhow::Result;
use tracing::debug;

/// Walks the document's top-level bookmarks. Outline entries carry no
/// layout metadata, so every entry is classified with neutral features;
/// unresolvable destinations keep page -1 rather than aborting the walk.
pub fn run(
    cfg: &Config,
    source: &dyn DocumentSource,
    custom_keywords: &[String],
) -> Result<Vec<Candidate>> {
    let mut out = Vec::new();
    let feat = LineFeatures::neutral();

    for entry in source.outline()? {
        if entry.page < 0 {
            debug!("outline entry without resolvable page: {:?}", entry.title);
        }
        if !classify::is_probable_heading(
            &entry.title,
            feat,
            custom_keywords,
            &cfg.classify,
            cfg.classify.strict,
        ) {
            continue;
        }
        let score = classify::score_heading(&entry.title, feat, custom_keywords);
        if let Some(c) = Candidate::neutral(&entry.title, entry.page, score, Source::Outline) {
            out.push(c);
        }
    }
    Ok(out)
}
