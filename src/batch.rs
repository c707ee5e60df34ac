//! Batch resizing of a whole directory tree.
//!
//! Every input file gets its own [`ImageDocument`], so workers share nothing
//! and run on a rayon pool sized by [`effective_threads`]. A failing file is
//! recorded in the report and the rest of the batch carries on.
//!
//! Output mirrors the input tree: `in/a/b.png` → `out/a/b.<ext>`, where the
//! extension is the requested output format or the input's own.

use crate::config::{EngineConfig, effective_threads};
use crate::imaging::{Dimension, ImageDocument, ImageError, ImageFormat, ResizeFlags};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("Input is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// What to do to every image in the batch.
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub width: Dimension,
    pub height: Dimension,
    pub flags: ResizeFlags,
    pub sharpen: bool,
    /// Output format; `None` keeps each file's own format.
    pub format: Option<ImageFormat>,
    pub quality: Option<u8>,
}

/// One successfully written output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutput {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// One file that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    pub source: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub outputs: Vec<BatchOutput>,
    pub failures: Vec<BatchFailure>,
}

/// Collect files under `root` whose extension maps to a registered format,
/// sorted for stable output.
pub fn collect_sources(root: &Path) -> Result<Vec<PathBuf>, BatchError> {
    if !root.is_dir() {
        return Err(BatchError::NotADirectory(root.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let has_image_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| ImageFormat::from_extension(e).is_ok());
        if has_image_ext {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Run `job` over every image under its input directory.
pub fn run(job: &BatchJob, config: &EngineConfig) -> Result<BatchReport, BatchError> {
    let sources = collect_sources(&job.input_dir)?;
    let threads = effective_threads(&config.processing);
    tracing::info!(
        files = sources.len(),
        threads,
        input = %job.input_dir.display(),
        "starting batch"
    );

    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
    let results: Vec<(PathBuf, Result<BatchOutput, ImageError>)> = pool.install(|| {
        sources
            .par_iter()
            .map(|source| (source.clone(), process_one(job, config, source)))
            .collect()
    });

    let mut report = BatchReport::default();
    for (source, result) in results {
        match result {
            Ok(out) => {
                tracing::info!(source = %source.display(), output = %out.output.display(), "processed");
                report.outputs.push(out);
            }
            Err(e) => {
                tracing::warn!(source = %source.display(), error = %e, "failed");
                report.failures.push(BatchFailure {
                    source,
                    error: e.to_string(),
                });
            }
        }
    }
    Ok(report)
}

fn process_one(
    job: &BatchJob,
    config: &EngineConfig,
    source: &Path,
) -> Result<BatchOutput, ImageError> {
    let (doc, detected) = ImageDocument::from_path_with_limits(source, &config.decode_limits())?;
    let mut doc = doc.with_encode_options(config.encode_options());
    doc.resize(job.width, job.height, job.flags)?;
    if job.sharpen {
        doc.sharpen();
    }

    let format = job.format.unwrap_or(detected);
    let output = output_path(&job.input_dir, &job.output_dir, source, format);
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    doc.save(&output, job.quality, Some(format))?;

    Ok(BatchOutput {
        source: source.to_path_buf(),
        output,
        width: doc.width(),
        height: doc.height(),
    })
}

/// Map a source path to its output path under `output_dir`.
pub fn output_path(input_dir: &Path, output_dir: &Path, source: &Path, format: ImageFormat) -> PathBuf {
    let relative = source.strip_prefix(input_dir).unwrap_or(source);
    let relative = match relative.file_name() {
        Some(_) => relative.to_path_buf(),
        None => PathBuf::from("image"),
    };
    output_dir.join(relative).with_extension(format.extension())
}
