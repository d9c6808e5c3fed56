//! Make sure a model directory holds the inference files, fetching them if needed.
//!
//! Sources are classified once ([`ModelSource::classify`]) and dispatched to
//! download+extract, extract, or copy.

use crate::error::{StageError, StageResult};
use crate::extract::{copy_from_dir, extract_tar};
use crate::fetch::{download_with_progress, FetchOptions, ProgressSink};
use crate::resolve::{archive_file_name, is_link, is_tar};
use std::fs;
use std::path::{Path, PathBuf};

/// Files that make up a model. Staged whenever the source has them.
pub const MODEL_FILE_NAMES: [&str; 3] = [
    "inference.pdiparams",
    "inference.pdiparams.info",
    "inference.pdmodel",
];

/// Files whose presence means the model is usable and staging can be skipped.
/// The `.info` sidecar is not required; some archives ship without it.
pub const ESSENTIAL_FILE_NAMES: [&str; 2] = ["inference.pdiparams", "inference.pdmodel"];

/// Where model files come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// `http(s)://.../*.tar`: download, then extract.
    RemoteTar(String),
    /// Local `*.tar`: extract only.
    LocalTar(PathBuf),
    /// Local directory holding the files directly.
    Directory(PathBuf),
}

impl ModelSource {
    /// Classify a URL or path string. Touches the filesystem for non-tar paths.
    pub fn classify(source: &str) -> StageResult<Self> {
        if is_tar(source) {
            if is_link(source) {
                return Ok(ModelSource::RemoteTar(source.to_string()));
            }
            return Ok(ModelSource::LocalTar(PathBuf::from(source)));
        }
        let path = Path::new(source);
        if path.is_dir() {
            Ok(ModelSource::Directory(path.to_path_buf()))
        } else if !path.exists() {
            Err(StageError::PathNotFound(path.to_path_buf()))
        } else {
            Err(StageError::UnknownPath(path.to_path_buf()))
        }
    }
}

/// What [`maybe_download`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// Essential files were already there; nothing was touched.
    AlreadyPresent,
    /// Archive was downloaded and these files extracted from it.
    Downloaded { files: Vec<String> },
    /// Local archive was extracted.
    Extracted { files: Vec<String> },
    /// Files were copied from a local directory.
    Copied { files: Vec<String> },
}

impl StageOutcome {
    pub fn files(&self) -> &[String] {
        match self {
            StageOutcome::AlreadyPresent => &[],
            StageOutcome::Downloaded { files }
            | StageOutcome::Extracted { files }
            | StageOutcome::Copied { files } => files,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StageOptions {
    pub fetch: FetchOptions,
    /// Keep the downloaded `.tar` in the model dir after extraction.
    pub keep_archive: bool,
}

/// Per-file presence report for a model directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelStatus {
    pub present: Vec<&'static str>,
    pub missing: Vec<&'static str>,
}

impl ModelStatus {
    /// True when every essential file is present.
    pub fn is_usable(&self) -> bool {
        ESSENTIAL_FILE_NAMES
            .iter()
            .all(|name| self.present.contains(name))
    }
}

pub fn model_status(model_dir: &Path) -> ModelStatus {
    let (present, missing): (Vec<&'static str>, Vec<&'static str>) = MODEL_FILE_NAMES
        .iter()
        .partition(|name| model_dir.join(name).is_file());
    ModelStatus { present, missing }
}

/// True if every essential file exists in `model_dir`.
pub fn is_model_present(model_dir: &Path) -> bool {
    ESSENTIAL_FILE_NAMES
        .iter()
        .all(|name| model_dir.join(name).is_file())
}

/// Ensure `model_dir` holds the model files from `source`.
///
/// With `force == false` and the essential files already present, returns
/// [`StageOutcome::AlreadyPresent`] without any network or disk I/O.
/// Otherwise creates `model_dir` and stages from the classified source.
pub fn maybe_download(
    model_dir: &Path,
    source: &str,
    force: bool,
    opts: &StageOptions,
    progress: &mut dyn ProgressSink,
) -> StageResult<StageOutcome> {
    if !force && is_model_present(model_dir) {
        tracing::debug!(model_dir = %model_dir.display(), "model already present");
        return Ok(StageOutcome::AlreadyPresent);
    }

    fs::create_dir_all(model_dir).map_err(|e| StageError::io(model_dir, e))?;

    let outcome = match ModelSource::classify(source)? {
        ModelSource::RemoteTar(url) => {
            let archive_name = archive_file_name(&url).unwrap_or_else(|| "model.tar".to_string());
            let archive = model_dir.join(archive_name);
            download_with_progress(&url, &archive, &opts.fetch, progress)?;
            let extracted = extract_tar(model_dir, &MODEL_FILE_NAMES, &archive);
            if !opts.keep_archive {
                remove_archive(&archive, extracted.is_ok())?;
            }
            StageOutcome::Downloaded { files: extracted? }
        }
        ModelSource::LocalTar(archive) => {
            let files = extract_tar(model_dir, &MODEL_FILE_NAMES, &archive)?;
            StageOutcome::Extracted { files }
        }
        ModelSource::Directory(dir) => {
            let files = copy_from_dir(model_dir, &MODEL_FILE_NAMES, &dir)?;
            StageOutcome::Copied { files }
        }
    };

    ensure_usable(model_dir)?;
    Ok(outcome)
}

/// Delete a downloaded archive. When extraction already failed, a removal
/// error is only logged so the extraction error reaches the caller.
fn remove_archive(archive: &Path, extracted: bool) -> StageResult<()> {
    match fs::remove_file(archive) {
        Ok(()) => Ok(()),
        Err(e) if !extracted => {
            tracing::warn!(path = %archive.display(), "could not remove archive: {}", e);
            Ok(())
        }
        Err(e) => Err(StageError::io(archive, e)),
    }
}

/// Fail with [`StageError::IncompleteModel`] unless the essential files are
/// in `model_dir`. A missing `.info` sidecar is only reported.
fn ensure_usable(model_dir: &Path) -> StageResult<()> {
    let status = model_status(model_dir);
    if !status.is_usable() {
        return Err(StageError::IncompleteModel {
            dir: model_dir.to_path_buf(),
            missing: status.missing.iter().map(|s| s.to_string()).collect(),
        });
    }
    if !status.missing.is_empty() {
        tracing::warn!(
            model_dir = %model_dir.display(),
            missing = ?status.missing,
            "model staged without optional files"
        );
    }
    Ok(())
}
