use crate::{
    candidate::DetectOptions,
    chapter,
    config::Config,
    pipeline::Detector,
    source::ScriptSource,
    util::{ensure_dir, now_rfc3339},
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "chapterize")]
#[command(about = "Multi-source PDF heading and chapter detection")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./chapterize.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check the collaborator scripts and print diagnostics.
    Doctor {},
    /// Detect every heading and write the full reconciled list.
    Detect {
        #[arg(long)]
        input: PathBuf,
        /// Extra heading trigger phrase; repeatable.
        #[arg(long = "keyword")]
        keywords: Vec<String>,
        /// Explicit override as PAGE=TITLE; repeatable.
        #[arg(long = "manual")]
        manual: Vec<String>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Detect headings and keep only the chapter-level view.
    Chapters {
        #[arg(long)]
        input: PathBuf,
        #[arg(long = "keyword")]
        keywords: Vec<String>,
        #[arg(long = "manual")]
        manual: Vec<String>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg_path = resolve_config_path(args.config.as_deref())?;
    let cfg = Config::load(&cfg_path)?;

    match &args.cmd {
        Command::Doctor {} => {
            let log_path = resolve_log_path(&cfg, None);
            let _guard = init_logging(&args, &cfg, log_path.as_deref())?;
            doctor(&cfg)
        }
        Command::Detect {
            input,
            keywords,
            manual,
            out_dir,
        } => run(
            &args,
            &cfg,
            input,
            keywords,
            manual,
            out_dir.as_deref(),
            false,
        ),
        Command::Chapters {
            input,
            keywords,
            manual,
            out_dir,
        } => run(
            &args,
            &cfg,
            input,
            keywords,
            manual,
            out_dir.as_deref(),
            true,
        ),
    }
}

fn resolve_config_path(user: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = user {
        return Ok(p.to_path_buf());
    }
    let default = PathBuf::from("chapterize.toml");
    if default.exists() {
        Ok(default)
    } else {
        Ok(PathBuf::from("chapterize.example.toml"))
    }
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stdout_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn doctor(cfg: &Config) -> Result<()> {
    // Scripts are probed against a placeholder input; doctor never parses.
    let source = ScriptSource::new(cfg, Path::new("doctor.pdf"))?;
    let diag = source.doctor()?;
    println!("{}", serde_json::to_string_pretty(&diag)?);
    Ok(())
}

fn run(
    args: &Args,
    cfg: &Config,
    input: &Path,
    keywords: &[String],
    manual: &[String],
    out_override: Option<&Path>,
    chapters_only: bool,
) -> Result<()> {
    validate_input(cfg, input)?;

    let opts = DetectOptions {
        custom_keywords: keywords.to_vec(),
        manual_headings: parse_manual(manual)?,
    };

    let job_id = crate::util::job_id(cfg, input)?;

    let out_root = out_override
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&cfg.paths.out_dir));
    let job_dir = out_root.join(&job_id);

    if job_dir.exists() && !cfg.global.resume {
        return Err(anyhow!(
            "job_dir already exists and resume=false: {}",
            job_dir.display()
        ));
    }

    ensure_dir(&job_dir)?;
    ensure_dir(&job_dir.join("logs"))?;

    let log_path = resolve_log_path(cfg, Some(&job_dir));
    let _guard = init_logging(args, cfg, log_path.as_deref())?;

    info!("job_id={job_id} out={}", job_dir.display());

    let source = ScriptSource::new(cfg, input)?;
    {
        use crate::source::DocumentSource;
        let pages = source.page_count()?;
        if pages > cfg.limits.max_input_pages {
            return Err(anyhow!("input exceeds max_input_pages: {pages}"));
        }
    }
    let detector = Detector::new(cfg, &source);

    let started = now_rfc3339();
    let mut result = detector.run(&opts)?;

    let headings = if chapters_only {
        chapter::chapter_view(&mut result.headings)
    } else {
        chapter::assign_levels(&mut result.headings);
        result.headings
    };

    if cfg.output.write_headings_json {
        std::fs::write(
            job_dir.join(&cfg.output.headings_filename),
            serde_json::to_string_pretty(&headings)?,
        )?;
    }

    if cfg.output.write_report_json {
        std::fs::write(
            job_dir.join(&cfg.output.report_filename),
            serde_json::to_string_pretty(&result.report)?,
        )?;
    }

    if cfg.output.write_index_json {
        let index = serde_json::json!({
            "job_id": job_id,
            "started": started,
            "finished": now_rfc3339(),
            "headings": cfg.output.headings_filename,
            "report": cfg.output.report_filename,
            "chapters_only": chapters_only,
        });
        std::fs::write(job_dir.join("index.json"), serde_json::to_string_pretty(&index)?)?;
    }

    if cfg.global.print_summary {
        println!("{}", serde_json::to_string_pretty(&headings)?);
    }

    Ok(())
}

/// Parses repeated `PAGE=TITLE` override flags.
fn parse_manual(entries: &[String]) -> Result<BTreeMap<u32, String>> {
    let mut map = BTreeMap::new();
    for raw in entries {
        let (page, title) = raw
            .split_once('=')
            .ok_or_else(|| anyhow!("manual override must be PAGE=TITLE: {raw}"))?;
        let page: u32 = page
            .trim()
            .parse()
            .with_context(|| format!("manual override page: {raw}"))?;
        if title.trim().is_empty() {
            return Err(anyhow!("manual override has empty title: {raw}"));
        }
        map.insert(page, title.trim().to_string());
    }
    Ok(map)
}

fn validate_input(cfg: &Config, input: &Path) -> Result<()> {
    let input_str = input.display().to_string();

    if cfg.security.reject_url_inputs && looks_like_url(&input_str) {
        return Err(anyhow!("URL inputs are disabled: {input_str}"));
    }

    if !input.exists() {
        return Err(anyhow!("input does not exist: {}", input.display()));
    }

    if let Ok(meta) = std::fs::metadata(input) {
        if meta.len() > cfg.limits.max_input_file_bytes {
            return Err(anyhow!(
                "input exceeds max_input_file_bytes: {}",
                meta.len()
            ));
        }
    }

    if let Some(ext) = input.extension().and_then(|s| s.to_str()) {
        if ext.to_ascii_lowercase() != "pdf" {
            return Err(anyhow!("input is not a PDF: {}", input.display()));
        }
    } else {
        warn!("input has no extension; assuming PDF: {}", input.display());
    }

    Ok(())
}

fn looks_like_url(s: &str) -> bool {
    let s = s.to_ascii_lowercase();
    s.starts_with("http://") || s.starts_with("https://") || s.starts_with("file://")
}

fn resolve_log_path(cfg: &Config, job_dir: Option<&Path>) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }

    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }

    if let Some(job_dir) = job_dir {
        return Some(job_dir.join("logs").join("chapterize.log"));
    }

    Some(PathBuf::from(&cfg.paths.out_dir).join("chapterize.log"))
}
