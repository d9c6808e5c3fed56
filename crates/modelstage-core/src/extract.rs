//! Stage model files from a tar archive or a directory into the model dir.
//!
//! Only members whose base name is in the wanted set are written, and always
//! at the top level of the model dir. When an archive holds several members
//! with the same base name (e.g. `a/inference.pdmodel` and
//! `b/inference.pdmodel`) each one overwrites the previous: the last member
//! in archive order wins.

use crate::error::{StageError, StageResult};
use std::fs::{self, File};
use std::path::Path;

/// Base name of an archive member path (`a/b/c.txt` -> `c.txt`).
fn base_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// Extract every regular-file member of `archive` whose base name is in
/// `names` into `model_dir`, dropping any directory prefix.
///
/// Returns the base names written, in archive order (duplicates included).
pub fn extract_tar(model_dir: &Path, names: &[&str], archive: &Path) -> StageResult<Vec<String>> {
    let file = File::open(archive).map_err(|e| StageError::io(archive, e))?;
    let mut tar = tar::Archive::new(file);
    let entries = tar
        .entries()
        .map_err(|e| StageError::archive(archive, e))?;

    let mut staged = Vec::new();
    for entry in entries {
        let mut entry = entry.map_err(|e| StageError::archive(archive, e))?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let member = entry
            .path()
            .map_err(|e| StageError::archive(archive, e))?
            .into_owned();
        let name = match base_name(&member) {
            Some(n) if names.contains(&n) => n.to_string(),
            _ => continue,
        };
        let dest = model_dir.join(&name);
        entry
            .unpack(&dest)
            .map_err(|e| StageError::archive(archive, e))?;
        tracing::info!(member = %member.display(), "{} reloaded", name);
        staged.push(name);
    }
    Ok(staged)
}

/// True if both paths name the same file on disk, however they are reached
/// (symlinked directory, bind mount, `..` components).
fn same_file(a: &Path, b: &Path) -> bool {
    let (Ok(ma), Ok(mb)) = (fs::metadata(a), fs::metadata(b)) else {
        return false;
    };
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        ma.dev() == mb.dev() && ma.ino() == mb.ino()
    }
    #[cfg(not(unix))]
    {
        let _ = (ma, mb);
        matches!(
            (fs::canonicalize(a), fs::canonicalize(b)),
            (Ok(ca), Ok(cb)) if ca == cb
        )
    }
}

/// Copy each file in `names` that exists directly under `src_dir` into
/// `model_dir`. Anything else in `src_dir` is ignored.
pub fn copy_from_dir(model_dir: &Path, names: &[&str], src_dir: &Path) -> StageResult<Vec<String>> {
    let mut staged = Vec::new();
    for name in names {
        let src = src_dir.join(name);
        if !src.is_file() {
            tracing::debug!(path = %src.display(), "not present in source directory");
            continue;
        }
        let dest = model_dir.join(name);
        if same_file(&src, &dest) {
            // fs::copy would truncate the destination, i.e. the source itself.
            tracing::debug!(path = %dest.display(), "source is already the staged file");
            staged.push(name.to_string());
            continue;
        }
        fs::copy(&src, &dest).map_err(|e| StageError::io(&src, e))?;
        tracing::info!("{} reloaded", src.display());
        staged.push(name.to_string());
    }
    Ok(staged)
}
