//! Filesystem and job-identity helpers. A job id pins one (config, input)
//! pair to one output directory, so reruns resume instead of duplicating
//! work.

use crate::config::Config;
use anyhow::{bail, Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use time::format_description::well_known::Rfc3339;

pub fn ensure_dir(p: &Path) -> Result<()> {
    std::fs::create_dir_all(p).with_context(|| format!("create_dir_all {}", p.display()))
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    format!("{:x}", h.finalize())
}

pub fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

/// How much of the input document feeds its identity hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashMode {
    /// Digest the whole file.
    Full,
    /// Digest a leading and a trailing window plus the file length.
    /// Large scanned PDFs hash in near-constant time, and the trailer
    /// (xref, metadata) still lands in the tail window when the document
    /// is rewritten.
    Windowed,
}

impl HashMode {
    pub fn from_config(mode: &str) -> Result<Self> {
        match mode {
            "full_sha256" => Ok(Self::Full),
            "fast_2x16mb" => Ok(Self::Windowed),
            other => bail!("unknown hashing.mode: {other}"),
        }
    }
}

/// Job id for one detection run: sha256 over the normalized config hash
/// and the input document hash, joined with `:`. Same config plus same
/// document resolves to the same output directory.
pub fn job_id(cfg: &Config, input: &Path) -> Result<String> {
    let cfg_hash = sha256_hex(cfg.normalized_for_hash().as_bytes());
    let input_hash = hash_input(cfg, input)
        .with_context(|| format!("hashing input: {}", input.display()))?;
    Ok(sha256_hex(format!("{cfg_hash}:{input_hash}").as_bytes()))
}

/// Hashes the input document under the configured [`HashMode`].
pub fn hash_input(cfg: &Config, path: &Path) -> Result<String> {
    let mode = HashMode::from_config(&cfg.hashing.mode)?;
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let size = f.metadata().with_context(|| "metadata")?.len();

    let mut h = Sha256::new();
    match mode {
        HashMode::Full => {
            let mut buf = vec![0u8; 1024 * 1024];
            loop {
                let n = f.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                h.update(&buf[..n]);
            }
        }
        HashMode::Windowed => {
            let w = cfg.hashing.fast_window_bytes.min(size);
            if w > 0 {
                let mut head = vec![0u8; w as usize];
                f.read_exact(&mut head)?;
                h.update(&head);

                if size > w {
                    f.seek(SeekFrom::Start(size - w))?;
                    let mut tail = vec![0u8; w as usize];
                    f.read_exact(&mut tail)?;
                    h.update(&tail);
                }
            }
            // The length disambiguates files that only differ in the
            // unhashed middle.
            h.update(size.to_le_bytes());
        }
    }
    Ok(format!("{:x}", h.finalize()))
}
