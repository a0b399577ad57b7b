use serde::{Deserialize, Serialize};

/// Per-run diagnostics written alongside the heading list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectReport {
    pub page_count: u32,
    pub outline_candidates: usize,
    pub toc_candidates: usize,
    pub layout_candidates: usize,
    pub ocr_candidates: usize,
    pub manual_candidates: usize,
    pub ocr_ran: bool,
    pub image_based: bool,
    pub page_offset: i32,
    pub heading_count: usize,
}
