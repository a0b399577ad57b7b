use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Neutral feature values used when a source carries no layout metadata
/// (bookmarks, TOC text, OCR output).
pub const NEUTRAL_FONT_SIZE: f32 = 14.0;
pub const NEUTRAL_PAGE_HEIGHT: f32 = 800.0;
pub const NEUTRAL_WHITESPACE: f32 = 100.0;

/// Vertical-gap sentinel for the first line on a page.
pub const WHITESPACE_SENTINEL: f32 = 100.0;

/// One extracted text line in reading order, as delivered by the
/// document source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextLine {
    pub text: String,
    /// 1-based page index.
    pub page: u32,
    pub font_size: f32,
    pub bold: bool,
    /// Distance from the top of the page, extractor units.
    pub y: f32,
    /// Gap to the previous line on the same page; [`WHITESPACE_SENTINEL`]
    /// when the page changed.
    pub whitespace_above: f32,
}

/// One top-level bookmark with its resolved destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub title: String,
    /// 1-based page index, or -1 when the destination could not be resolved.
    pub page: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Source {
    Outline,
    TocText,
    LayoutHeuristic,
    Ocr,
    Manual,
}

/// An unreconciled, possibly duplicate heading detection from one source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub text: String,
    /// 1-based page index; -1 when unknown.
    pub page: i32,
    pub font_size: f32,
    pub y: f32,
    pub whitespace_above: f32,
    /// Reserved; never computed by the current extractors.
    pub whitespace_below: f32,
    pub score: f32,
    pub source: Source,
}

impl Candidate {
    /// Builds a candidate, refusing text that is empty after trimming.
    pub fn new(
        text: &str,
        page: i32,
        font_size: f32,
        y: f32,
        whitespace_above: f32,
        score: f32,
        source: Source,
    ) -> Option<Self> {
        if text.trim().is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            page,
            font_size,
            y,
            whitespace_above,
            whitespace_below: 0.0,
            score,
            source,
        })
    }

    /// Candidate with neutral layout features for metadata-only sources.
    pub fn neutral(text: &str, page: i32, score: f32, source: Source) -> Option<Self> {
        Self::new(
            text,
            page,
            NEUTRAL_FONT_SIZE,
            0.0,
            NEUTRAL_WHITESPACE,
            score,
            source,
        )
    }
}

/// Final reconciled heading. Created once by the reconciler, immutable
/// afterwards; the chapter filter only reads it.
///
/// Downstream consumers see `{title, pageNumber, level, score}`; the layout
/// features stay internal for the chapter filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heading {
    pub title: String,
    #[serde(rename = "pageNumber")]
    pub page: i32,
    /// 0 = generic heading, 1 = chapter-level.
    pub level: u8,
    pub score: f32,
    #[serde(skip)]
    pub font_size: f32,
    #[serde(skip)]
    pub y: f32,
}

/// Caller-supplied knobs for one detection run.
#[derive(Debug, Clone, Default)]
pub struct DetectOptions {
    /// Extra trigger phrases matched case-insensitively as substrings.
    pub custom_keywords: Vec<String>,
    /// Explicit page -> title overrides, injected with a maximal score.
    pub manual_headings: BTreeMap<u32, String>,
}

/// Online mean of font sizes seen so far in one layout pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontStats {
    pub sum: f32,
    pub count: u32,
}

impl FontStats {
    pub fn push(&mut self, font_size: f32) {
        self.sum += font_size;
        self.count += 1;
    }

    /// Average so far, or the neutral baseline before any line was seen.
    pub fn average(&self) -> f32 {
        if self.count == 0 {
            NEUTRAL_FONT_SIZE
        } else {
            self.sum / self.count as f32
        }
    }
}
