//! Single-stream HTTP GET of a model archive.
//!
//! Uses the curl crate (libcurl). The body goes to `<dest>.part` in
//! `chunk_size` pieces and is renamed to `dest` once the transfer succeeded
//! with a 2xx status; on any failure the partial file is removed.

mod parse;
mod progress;

pub use progress::{NoProgress, ProgressSink, ProgressStats};

use crate::error::{StageError, StageResult};
use std::cell::Cell;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str;
use std::time::{Duration, Instant};

/// Write/report granularity when nothing is configured (1 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Transfer knobs for [`download_with_progress`].
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// Bytes per buffered write and per progress update.
    pub chunk_size: usize,
    /// Connect timeout; `None` keeps the libcurl default.
    pub connect_timeout: Option<Duration>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            connect_timeout: None,
        }
    }
}

/// Temp path used while the body is streaming in.
pub fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

/// Downloads `url` to `dest`, reporting cumulative bytes to `progress`.
/// Returns the number of bytes written.
///
/// A non-2xx final status is returned as [`StageError::DownloadFailed`]; the
/// caller decides whether to retry or give up.
pub fn download_with_progress(
    url: &str,
    dest: &Path,
    opts: &FetchOptions,
    progress: &mut dyn ProgressSink,
) -> StageResult<u64> {
    let part = part_path(dest);
    let file = File::create(&part).map_err(|e| StageError::io(&part, e))?;
    let mut writer = BufWriter::with_capacity(opts.chunk_size.max(1), file);

    tracing::info!(url, dest = %dest.display(), "downloading");
    let result = stream_body(url, &mut writer, &part, opts, progress).and_then(|n| {
        writer.flush().map_err(|e| StageError::io(&part, e))?;
        Ok(n)
    });
    drop(writer);

    match result {
        Ok(written) => {
            fs::rename(&part, dest).map_err(|e| StageError::io(dest, e))?;
            tracing::debug!(bytes = written, dest = %dest.display(), "download complete");
            Ok(written)
        }
        Err(e) => {
            if let Err(rm) = fs::remove_file(&part) {
                if rm.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(path = %part.display(), "could not remove partial file: {}", rm);
                }
            }
            Err(e)
        }
    }
}

fn stream_body<W: Write>(
    url: &str,
    writer: &mut W,
    part: &Path,
    opts: &FetchOptions,
    progress: &mut dyn ProgressSink,
) -> StageResult<u64> {
    let curl_err = |source: curl::Error| StageError::Transfer {
        url: url.to_string(),
        source,
    };
    let chunk_size = opts.chunk_size.max(1);

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(curl_err)?;
    easy.follow_location(true).map_err(curl_err)?;
    easy.max_redirections(10).map_err(curl_err)?;
    if let Some(timeout) = opts.connect_timeout {
        easy.connect_timeout(timeout).map_err(curl_err)?;
    }

    let status = Cell::new(0u32);
    let total = Cell::new(None::<u64>);
    let mut written = 0u64;
    let mut write_err: Option<io::Error> = None;
    let started = Instant::now();

    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                if let Ok(line) = str::from_utf8(data) {
                    if let Some(code) = parse::status_code(line) {
                        // New response in a redirect chain; forget the old length.
                        status.set(code);
                        total.set(None);
                    } else if let Some(n) = parse::content_length(line) {
                        total.set(Some(n));
                    }
                }
                true
            })
            .map_err(curl_err)?;
        transfer
            .write_function(|data| {
                if !(200..300).contains(&status.get()) {
                    // Error page; swallow it, the status check below reports.
                    return Ok(data.len());
                }
                for chunk in data.chunks(chunk_size) {
                    if let Err(e) = writer.write_all(chunk) {
                        write_err = Some(e);
                        return Ok(0); // abort transfer
                    }
                    written += chunk.len() as u64;
                    progress.on_progress(&ProgressStats {
                        bytes_done: written,
                        total_bytes: total.get().unwrap_or(1),
                        elapsed_secs: started.elapsed().as_secs_f64(),
                    });
                }
                Ok(data.len())
            })
            .map_err(curl_err)?;
        transfer.perform()
    };

    if let Some(e) = write_err {
        return Err(StageError::io(part, e));
    }
    performed.map_err(curl_err)?;

    let code = easy.response_code().map_err(curl_err)?;
    if !(200..300).contains(&code) {
        tracing::error!(url, status = code, "something went wrong while downloading model");
        return Err(StageError::DownloadFailed {
            url: url.to_string(),
            status: code,
        });
    }
    Ok(written)
}
