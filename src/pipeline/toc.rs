//! Printed table-of-contents scanner. Matches "Title ..... 12" style lines
//! in the early pages, including titles that wrap onto a following line
//! and page labels printed as roman numerals.

use crate::{
    candidate::{Candidate, Source},
    classify::{self, LineFeatures},
    config::Config,
    source::DocumentSource,
};
use anyhow::Result;
use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

/// Title, then a run of >=2 dots or >=2 spaces, then an integer or roman
/// numeral page label at the end of the line.
fn toc_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(.*?)(\.{2,}|\s{2,})\s*(\d+|[ivxlcdmIVXLCDM]+)$").expect("valid TOC regex")
    })
}

/// Converts a roman numeral by right-to-left subtractive scan. Returns
/// None for characters outside the numeral alphabet or an empty string.
pub fn roman_to_int(s: &str) -> Option<i32> {
    fn value(c: char) -> Option<i32> {
        match c.to_ascii_uppercase() {
            'I' => Some(1),
            'V' => Some(5),
            'X' => Some(10),
            'L' => Some(50),
            'C' => Some(100),
            'D' => Some(500),
            'M' => Some(1000),
            _ => None,
        }
    }

    if s.is_empty() {
        return None;
    }
    let mut total = 0;
    let mut prev = 0;
    for c in s.chars().rev() {
        let v = value(c)?;
        if v < prev {
            total -= v;
        } else {
            total += v;
            prev = v;
        }
    }
    Some(total)
}

/// Parses a TOC page label: plain integer first, roman numeral otherwise.
pub fn parse_page_label(label: &str) -> Option<i32> {
    if let Ok(n) = label.parse::<i32>() {
        return Some(n);
    }
    roman_to_int(label)
}

/// One matched TOC entry before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct TocLine {
    pub title: String,
    pub page: i32,
}

/// Scans raw text for TOC-pattern lines. Non-matching lines are buffered
/// and prepended to the next match, joined with single spaces, so wrapped
/// titles are reassembled.
pub fn scan_lines(text: &str) -> Vec<TocLine> {
    let mut out = Vec::new();
    let mut wrapped: Vec<String> = Vec::new();

    for raw in text.lines() {
        let line: String = raw.trim().nfkc().collect();
        if line.is_empty() {
            continue;
        }
        let Some(caps) = toc_line_regex().captures(&line) else {
            wrapped.push(line);
            continue;
        };
        let Some(page) = parse_page_label(&caps[3]) else {
            wrapped.push(line);
            continue;
        };
        let mut title = caps[1].trim().to_string();
        if !wrapped.is_empty() {
            let prefix = wrapped.join(" ");
            title = if title.is_empty() {
                prefix
            } else {
                format!("{prefix} {title}")
            };
            wrapped.clear();
        }
        out.push(TocLine { title, page });
    }
    out
}

/// Scans the first min(scan_pages, page_count) pages of extracted text
/// for printed TOC entries.
pub fn run(
    cfg: &Config,
    source: &dyn DocumentSource,
    custom_keywords: &[String],
) -> Result<Vec<Candidate>> {
    let page_count = source.page_count()?;
    let last = cfg.toc.scan_pages.min(page_count);
    if last == 0 {
        return Ok(Vec::new());
    }
    let text = source.plain_text(1, last)?;

    let feat = LineFeatures::neutral();
    let mut out = Vec::new();
    for entry in scan_lines(&text) {
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
        if let Some(c) = Candidate::neutral(&entry.title, entry.page, score, Source::TocText) {
            out.push(c);
        }
    }
    Ok(out)
}
