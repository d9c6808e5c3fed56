//! Path resolution: decide where a model lives locally and where it comes from.
//!
//! A caller hands over either nothing, a URL, or a directory. URLs (and the
//! absent case) are mapped to a per-model subdirectory of the default root,
//! named after the archive; directories are used as-is.

use std::path::{Path, PathBuf};

const TAR_SUFFIX: &str = ".tar";

/// Storage directory and source URL picked by [`resolve_model_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModel {
    pub model_dir: PathBuf,
    pub url: String,
}

/// True if `s` parses as an `http` or `https` URL.
pub fn is_link(s: &str) -> bool {
    url::Url::parse(s)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// True if the source names a tar archive. For links only the URL path
/// counts, so `.../model.tar?sig=...` is a tar.
pub fn is_tar(source: &str) -> bool {
    if is_link(source) {
        return archive_file_name(source).map_or(false, |name| name.ends_with(TAR_SUFFIX));
    }
    source.ends_with(TAR_SUFFIX)
}

/// Final path component of a URL or path, as the archive would be saved.
///
/// For links the URL path is used (query and fragment ignored). Returns
/// `None` for an empty or root path.
pub fn archive_file_name(source: &str) -> Option<String> {
    if is_link(source) {
        let parsed = url::Url::parse(source).ok()?;
        let segment = parsed.path().split('/').filter(|s| !s.is_empty()).last()?;
        if segment == "." || segment == ".." {
            return None;
        }
        return Some(segment.to_string());
    }
    Path::new(source)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
}

/// Subdirectory name derived from a model URL: the file name with a
/// trailing `.tar` stripped, or the full file name for anything else.
pub fn model_dir_name(url: &str) -> Option<String> {
    let name = archive_file_name(url)?;
    match name.strip_suffix(TAR_SUFFIX) {
        Some(stem) if !stem.is_empty() => Some(stem.to_string()),
        _ => Some(name),
    }
}

/// Pick the storage directory and source URL for a model.
///
/// - `candidate` absent: `default_root/<name of default_url>`, source `default_url`.
/// - `candidate` is a link: `default_root/<name of candidate>`, source `candidate`.
/// - otherwise: `candidate` is the directory, source `default_url`.
///
/// # Examples
///
/// - `(None, "/m", "http://x/y/model.tar")` → `("/m/model", "http://x/y/model.tar")`
/// - `(Some("/opt/rec"), "/m", "http://x/y/model.tar")` → `("/opt/rec", "http://x/y/model.tar")`
pub fn resolve_model_dir(
    candidate: Option<&str>,
    default_root: &Path,
    default_url: &str,
) -> ResolvedModel {
    match candidate {
        Some(dir) if !is_link(dir) => ResolvedModel {
            model_dir: PathBuf::from(dir),
            url: default_url.to_string(),
        },
        _ => {
            let url = candidate.unwrap_or(default_url);
            let model_dir = match model_dir_name(url) {
                Some(name) => default_root.join(name),
                None => default_root.to_path_buf(),
            };
            tracing::debug!(url, model_dir = %model_dir.display(), "resolved model directory");
            ResolvedModel {
                model_dir,
                url: url.to_string(),
            }
        }
    }
}
