//! Progress reporting for a single download (bytes done, rate, ETA).

/// Snapshot of download progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressStats {
    /// Bytes written to disk so far.
    pub bytes_done: u64,
    /// Advertised `Content-Length`, or 1 when the server sent none.
    pub total_bytes: u64,
    /// Elapsed time since the transfer started (seconds).
    pub elapsed_secs: f64,
}

impl ProgressStats {
    /// Download rate in bytes per second (0 if elapsed is 0).
    pub fn bytes_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.bytes_done as f64 / self.elapsed_secs
    }

    /// Estimated seconds remaining (None if rate is 0).
    pub fn eta_secs(&self) -> Option<f64> {
        let remaining = self.total_bytes.saturating_sub(self.bytes_done);
        if remaining == 0 {
            return Some(0.0);
        }
        let rate = self.bytes_per_sec();
        if rate <= 0.0 {
            return None;
        }
        Some(remaining as f64 / rate)
    }

    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total_bytes == 0 {
            return 1.0;
        }
        (self.bytes_done as f64 / self.total_bytes as f64).min(1.0)
    }
}

/// Receiver of progress updates, called once per written chunk.
pub trait ProgressSink {
    fn on_progress(&mut self, stats: &ProgressStats);
}

impl<F> ProgressSink for F
where
    F: FnMut(&ProgressStats),
{
    fn on_progress(&mut self, stats: &ProgressStats) {
        self(stats)
    }
}

/// Sink that drops every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&mut self, _stats: &ProgressStats) {}
}
