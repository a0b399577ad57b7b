use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub global: Global,
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub hashing: Hashing,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub toc: Toc,
    #[serde(default)]
    pub classify: Classify,
    #[serde(default)]
    pub ocr: Ocr,
    #[serde(default)]
    pub source: SourceCfg,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub security: Security,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }

    /// A stable, normalization-friendly string for hashing.
    pub fn normalized_for_hash(&self) -> String {
        toml::to_string(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Global {
    pub job_name: String,
    pub resume: bool,
    pub print_summary: bool,
}
impl Default for Global {
    fn default() -> Self {
        Self {
            job_name: "default".into(),
            resume: true,
            print_summary: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paths {
    pub out_dir: String,
    pub scripts_dir: String,
}
impl Default for Paths {
    fn default() -> Self {
        Self {
            out_dir: "out".into(),
            scripts_dir: "scripts".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hashing {
    pub mode: String,
    pub fast_window_bytes: u64,
}
impl Default for Hashing {
    fn default() -> Self {
        Self {
            mode: "fast_2x16mb".into(),
            fast_window_bytes: 16 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Limits {
    pub max_input_file_bytes: u64,
    pub max_input_pages: u32,
}
impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_file_bytes: 2 * 1024 * 1024 * 1024,
            max_input_pages: 20000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Toc {
    /// Printed tables of contents are expected within the first N pages.
    pub scan_pages: u32,
}
impl Default for Toc {
    fn default() -> Self {
        Self { scan_pages: 15 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classify {
    /// Suppress the loose font/whitespace acceptance rule everywhere.
    pub strict: bool,
    /// Reject candidate titles shorter than this, after trimming.
    pub min_title_chars: usize,
}
impl Default for Classify {
    fn default() -> Self {
        Self {
            strict: false,
            min_title_chars: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ocr {
    pub dpi: u32,
    /// Pages sampled by the image-density probe.
    pub density_sample_pages: u32,
    /// A sampled page with fewer extractable characters than this counts
    /// as image-based.
    pub density_min_chars: usize,
}
impl Default for Ocr {
    fn default() -> Self {
        Self {
            dpi: 300,
            density_sample_pages: 5,
            density_min_chars: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceCfg {
    pub python_exe: String,
    pub structure_timeout_seconds: u64,
    pub ocr_page_timeout_seconds: u64,
    pub keep_script_stderr: bool,
}
impl Default for SourceCfg {
    fn default() -> Self {
        Self {
            python_exe: "python3".into(),
            structure_timeout_seconds: 120,
            ocr_page_timeout_seconds: 120,
            keep_script_stderr: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub write_headings_json: bool,
    pub write_report_json: bool,
    pub write_index_json: bool,
    pub headings_filename: String,
    pub report_filename: String,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            write_headings_json: true,
            write_report_json: true,
            write_index_json: true,
            headings_filename: "headings.json".into(),
            report_filename: "report.json".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: true,
            file_path: "".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Security {
    pub reject_url_inputs: bool,
    pub pin_scripts_dir: bool,
}
impl Default for Security {
    fn default() -> Self {
        Self {
            reject_url_inputs: true,
            pin_scripts_dir: true,
        }
    }
}
