use std::io::{self, IsTerminal, Write};
use std::time::{Duration, Instant};

use colored::*;

use crate::error::SkipReason;

/// Running counters for the progress line and the closing performance summary.
pub struct PerformanceMetrics {
    pub files_processed: u64,
    pub lines_processed: u64,
    pub files_unsupported: u64,
    pub files_unreadable: u64,
    start_time: Instant,
    last_update: Instant,
    writer: Box<dyn Write + Send>,
    progress_enabled: bool,
}

impl PerformanceMetrics {
    /// Writes to stdout; the progress line is only shown on a terminal.
    pub fn new() -> Self {
        let progress = io::stdout().is_terminal();
        PerformanceMetrics::with_writer(Box::new(io::stdout()), progress)
    }

    pub fn with_writer(writer: Box<dyn Write + Send>, progress_enabled: bool) -> Self {
        PerformanceMetrics {
            files_processed: 0,
            lines_processed: 0,
            files_unsupported: 0,
            files_unreadable: 0,
            start_time: Instant::now(),
            last_update: Instant::now(),
            writer,
            progress_enabled,
        }
    }

    pub fn update(&mut self, new_lines: u64) {
        self.files_processed += 1;
        self.lines_processed += new_lines;

        let now = Instant::now();
        if now.duration_since(self.last_update) >= Duration::from_secs(1) {
            self.print_progress();
            self.last_update = now;
        }
    }

    fn print_progress(&mut self) {
        if !self.progress_enabled {
            return;
        }
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let _ = write!(
            self.writer,
            "\rProcessed {} files ({:.1} files/sec) and {} lines ({:.1} lines/sec)...",
            self.files_processed,
            safe_rate(self.files_processed, elapsed),
            self.lines_processed,
            safe_rate(self.lines_processed, elapsed)
        );
        let _ = self.writer.flush();
    }

    /// Count a file that was seen but contributed nothing.
    pub fn record_skip(&mut self, reason: &SkipReason) {
        if reason.is_failure() {
            self.files_unreadable += 1;
        } else {
            self.files_unsupported += 1;
        }
    }

    pub fn print_final_stats(&mut self) {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let lines_per_sec = safe_rate(self.lines_processed, elapsed);

        let _ = writeln!(self.writer, "\n{}", "Performance Summary:".blue().bold());
        let _ = writeln!(
            self.writer,
            "Classified {} file(s), {} line(s) in {}s ({} lines/sec)",
            self.files_processed.to_string().bright_yellow(),
            self.lines_processed.to_string().bright_yellow(),
            format!("{:.2}", elapsed).bright_yellow(),
            format!("{:.1}", lines_per_sec).bright_yellow()
        );
        if self.files_unsupported + self.files_unreadable > 0 {
            let _ = writeln!(
                self.writer,
                "Skipped {} unsupported and {} unreadable file(s)",
                self.files_unsupported.to_string().bright_yellow(),
                self.files_unreadable.to_string().bright_yellow()
            );
        }
    }
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

pub fn safe_rate(value: u64, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= f64::EPSILON {
        0.0
    } else {
        value as f64 / elapsed_secs
    }
}
