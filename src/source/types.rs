use crate::candidate::OutlineEntry;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDiag {
    pub python_exe: String,
    pub python_version: String,
    pub pdf_backend: Option<String>,
    pub ocr_backend: Option<String>,
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Raw line as emitted by the structure script, before whitespace gaps
/// are derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireLine {
    pub text: String,
    pub page: u32,
    pub font_size: f32,
    #[serde(default)]
    pub font_name: String,
    pub y: f32,
}

/// Full structure dump for one document: geometry, bookmarks, and the
/// line stream in reading order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureOut {
    pub ok: bool,
    pub page_count: u32,
    #[serde(default)]
    pub page_heights: Vec<f32>,
    #[serde(default)]
    pub outline: Vec<OutlineEntry>,
    #[serde(default)]
    pub lines: Vec<WireLine>,
    /// Plain text per page, 0-indexed by page-1.
    #[serde(default)]
    pub page_texts: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrPageOut {
    pub ok: bool,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub error: Option<String>,
}
