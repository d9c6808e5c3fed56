//! Console progress line for downloads.

use modelstage_core::{ProgressSink, ProgressStats};
use std::io::Write;
use std::time::{Duration, Instant};

const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);
const MIB: f64 = 1_048_576.0;

/// Prints a throttled `\r`-rewritten progress line to stdout.
#[derive(Debug, Default)]
pub struct ConsoleProgress {
    last_print: Option<Instant>,
    printed: bool,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Terminate the progress line if one was printed.
    pub fn finish(&mut self) {
        if self.printed {
            println!();
            self.printed = false;
        }
    }
}

/// Progress line text. A total of 1 means the server sent no length.
pub(crate) fn format_line(stats: &ProgressStats) -> String {
    let done_mib = stats.bytes_done as f64 / MIB;
    let rate_mib = stats.bytes_per_sec() / MIB;
    if stats.total_bytes <= 1 {
        return format!("  {:.1} MiB  {:.2} MiB/s", done_mib, rate_mib);
    }
    let total_mib = stats.total_bytes as f64 / MIB;
    let eta = stats
        .eta_secs()
        .map(|s| format!("{:.0}s", s))
        .unwrap_or_else(|| "?".to_string());
    format!(
        "  {:.1} / {:.1} MiB ({:.1}%)  {:.2} MiB/s  ETA {}",
        done_mib,
        total_mib,
        stats.fraction() * 100.0,
        rate_mib,
        eta
    )
}

impl ProgressSink for ConsoleProgress {
    fn on_progress(&mut self, stats: &ProgressStats) {
        let now = Instant::now();
        let complete = stats.total_bytes > 1 && stats.bytes_done >= stats.total_bytes;
        let due = self
            .last_print
            .map_or(true, |t| now.duration_since(t) >= PROGRESS_INTERVAL);
        if !(due || complete) {
            return;
        }
        print!("\r{}  ", format_line(stats));
        let _ = std::io::stdout().flush();
        self.last_print = Some(now);
        self.printed = true;
    }
}
