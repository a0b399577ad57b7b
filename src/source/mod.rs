pub mod script;
pub mod types;

use crate::candidate::{OutlineEntry, TextLine};
use anyhow::Result;

pub use script::ScriptSource;
pub use types::{OcrPageOut, SourceDiag, StructureOut, WireLine};

/// Parsed-document collaborator: geometry, bookmarks, and a line-level
/// text stream in reading order. Implementations own all raw parsing.
pub trait DocumentSource {
    fn page_count(&self) -> Result<u32>;
    /// Page heights indexed by page-1. May be shorter than `page_count`;
    /// missing entries fall back to the neutral height.
    fn page_heights(&self) -> Result<Vec<f32>>;
    /// Top-level bookmarks with resolved 1-based destinations (-1 when
    /// unresolvable). Nested children are not descended.
    fn outline(&self) -> Result<Vec<OutlineEntry>>;
    /// All text lines in reading order, whitespace gaps already derived.
    fn text_lines(&self) -> Result<Vec<TextLine>>;
    /// Extracted plain text for an inclusive 1-based page range.
    fn plain_text(&self, first: u32, last: u32) -> Result<String>;
}

/// Render+recognize collaborator for image-only documents. Failures are
/// per-page and non-fatal to the caller.
pub trait OcrEngine {
    fn page_text(&self, page: u32, dpi: u32) -> Result<String>;
}

/// Derives per-line whitespace gaps from consecutive y positions.
/// The first line on each page gets the sentinel gap.
pub fn derive_text_lines(lines: &[WireLine]) -> Vec<TextLine> {
    let mut out = Vec::with_capacity(lines.len());
    let mut last_y = -1.0_f32;
    let mut last_page = 0_u32;

    for l in lines {
        let whitespace_above = if l.page == last_page {
            (l.y - last_y).abs()
        } else {
            crate::candidate::WHITESPACE_SENTINEL
        };
        let name = l.font_name.to_lowercase();
        out.push(TextLine {
            text: l.text.clone(),
            page: l.page,
            font_size: l.font_size,
            bold: name.contains("bold") || name.contains("black"),
            y: l.y,
            whitespace_above,
        });
        last_y = l.y;
        last_page = l.page;
    }
    out
}
