use super::{derive_text_lines, types::*, DocumentSource, OcrEngine};
use crate::candidate::{OutlineEntry, TextLine};
use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use std::cell::OnceCell;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Process-based collaborator: talks JSON over stdin/stdout to helper
/// scripts for parsing and OCR. One structure dump is fetched lazily and
/// cached for the lifetime of the source.
pub struct ScriptSource {
    cfg: Config,
    scripts_dir: PathBuf,
    python_exe: PathBuf,
    input: PathBuf,
    structure: OnceCell<StructureOut>,
}

impl ScriptSource {
    pub fn new(cfg: &Config, input: &Path) -> Result<Self> {
        let scripts_dir = PathBuf::from(&cfg.paths.scripts_dir);
        if cfg.security.pin_scripts_dir {
            let cwd = std::env::current_dir().with_context(|| "current_dir")?;
            let canon = scripts_dir
                .canonicalize()
                .with_context(|| format!("canonicalize scripts_dir: {}", scripts_dir.display()))?;
            if !canon.starts_with(&cwd) {
                return Err(anyhow!(
                    "scripts_dir is outside cwd while pin_scripts_dir=true: {}",
                    canon.display()
                ));
            }
        }
        for script in ["pdf_structure.py", "pdf_ocr.py"] {
            let path = scripts_dir.join(script);
            if !path.exists() {
                return Err(anyhow!("missing script: {}", path.display()));
            }
        }
        Ok(Self {
            cfg: cfg.clone(),
            scripts_dir,
            python_exe: PathBuf::from(&cfg.source.python_exe),
            input: input.to_path_buf(),
            structure: OnceCell::new(),
        })
    }

    pub fn doctor(&self) -> Result<SourceDiag> {
        let script = self.scripts_dir.join("pdf_structure.py");
        self.run_json(
            &script,
            &serde_json::json!({"cmd": "doctor"}),
            Some(self.cfg.source.structure_timeout_seconds),
        )
    }

    fn structure(&self) -> Result<&StructureOut> {
        if let Some(s) = self.structure.get() {
            return Ok(s);
        }
        let script = self.scripts_dir.join("pdf_structure.py");
        let req = serde_json::json!({
            "cmd": "structure",
            "input_pdf": self.input,
        });
        let out: StructureOut =
            self.run_json(&script, &req, Some(self.cfg.source.structure_timeout_seconds))?;
        if !out.ok {
            let msg = out.error.unwrap_or_else(|| "pdf_structure failed".to_string());
            return Err(anyhow!(msg));
        }
        Ok(self.structure.get_or_init(|| out))
    }

    fn run_json<I: serde::Serialize, O: for<'de> serde::Deserialize<'de>>(
        &self,
        script: &Path,
        input: &I,
        timeout_seconds: Option<u64>,
    ) -> Result<O> {
        debug!(
            "script run {} timeout={:?}",
            script.display(),
            timeout_seconds
        );
        let mut cmd = Command::new(&self.python_exe);
        cmd.arg(script);
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning python: {}", script.display()))?;

        {
            let mut stdin = child.stdin.take().ok_or_else(|| anyhow!("no stdin"))?;
            let bytes = serde_json::to_vec(input)?;
            use std::io::Write;
            stdin.write_all(&bytes)?;
            stdin.flush().ok();
        }

        let output = if let Some(secs) = timeout_seconds {
            wait_with_timeout(&mut child, Duration::from_secs(secs))?
        } else {
            child
                .wait_with_output()
                .with_context(|| "waiting for python")?
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "script failed: {}\n{}",
                script.display(),
                stderr
            ));
        }

        if self.cfg.source.keep_script_stderr && !output.stderr.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("script stderr {}: {}", script.display(), stderr.trim());
        }

        let out: O = serde_json::from_slice(&output.stdout)
            .with_context(|| format!("parsing script JSON output: {}", script.display()))?;
        Ok(out)
    }
}

impl DocumentSource for ScriptSource {
    fn page_count(&self) -> Result<u32> {
        Ok(self.structure()?.page_count)
    }

    fn page_heights(&self) -> Result<Vec<f32>> {
        Ok(self.structure()?.page_heights.clone())
    }

    fn outline(&self) -> Result<Vec<OutlineEntry>> {
        Ok(self.structure()?.outline.clone())
    }

    fn text_lines(&self) -> Result<Vec<TextLine>> {
        Ok(derive_text_lines(&self.structure()?.lines))
    }

    fn plain_text(&self, first: u32, last: u32) -> Result<String> {
        let s = self.structure()?;
        let first = first.max(1) as usize;
        let last = (last.min(s.page_count)) as usize;
        if first > last {
            return Ok(String::new());
        }
        Ok(s.page_texts
            .iter()
            .skip(first - 1)
            .take(last - first + 1)
            .cloned()
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

impl OcrEngine for ScriptSource {
    fn page_text(&self, page: u32, dpi: u32) -> Result<String> {
        let script = self.scripts_dir.join("pdf_ocr.py");
        let req = serde_json::json!({
            "cmd": "ocr_page",
            "input_pdf": self.input,
            "page": page,
            "dpi": dpi,
        });
        let out: OcrPageOut =
            self.run_json(&script, &req, Some(self.cfg.source.ocr_page_timeout_seconds))?;
        if !out.ok {
            let msg = out.error.unwrap_or_else(|| "pdf_ocr failed".to_string());
            return Err(anyhow!("ocr page {page}: {msg}"));
        }
        Ok(out.text)
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<Output> {
    // Drain pipes while waiting so verbose script logging can't deadlock
    // the child on a full stdout/stderr buffer.
    let stdout_reader = child.stdout.take();
    let stderr_reader = child.stderr.take();

    let stdout_thread = std::thread::spawn(move || -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut out) = stdout_reader {
            out.read_to_end(&mut buf).with_context(|| "read stdout")?;
        }
        Ok(buf)
    });

    let stderr_thread = std::thread::spawn(move || -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut err) = stderr_reader {
            err.read_to_end(&mut buf).with_context(|| "read stderr")?;
        }
        Ok(buf)
    });

    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait().with_context(|| "try_wait")? {
            let stdout = stdout_thread
                .join()
                .map_err(|_| anyhow!("stdout reader thread panicked"))??;
            let stderr = stderr_thread
                .join()
                .map_err(|_| anyhow!("stderr reader thread panicked"))??;
            return Ok(Output {
                status,
                stdout,
                stderr,
            });
        }

        if start.elapsed() > timeout {
            warn!("script process timed out after {:?}", timeout);
            let _ = child.kill();
            let status = child.wait().with_context(|| "wait after kill")?;
            let stdout = stdout_thread
                .join()
                .map_err(|_| anyhow!("stdout reader thread panicked"))??;
            let stderr = stderr_thread
                .join()
                .map_err(|_| anyhow!("stderr reader thread panicked"))??;
            let output = Output {
                status,
                stdout,
                stderr,
            };
            return Err(anyhow!(
                "script process exceeded timeout ({:?}); stderr: {}",
                timeout,
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        std::thread::sleep(Duration::from_millis(50));
    }
}
