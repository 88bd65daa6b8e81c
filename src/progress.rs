//! Progress reporting for page recompression.
//!
//! The conversion pipeline never writes progress itself; callers pass a
//! [`ProgressSink`] into [`ConverterConfig::convert`](crate::ConverterConfig::convert).

use std::io::Write;

/// How often [`StderrProgress`] refreshes its counter.
pub const DEFAULT_REPORT_INTERVAL: usize = 50;

/// Receives page-processing progress.
pub trait ProgressSink {
    /// Called after each page has been recompressed and embedded. `done` is 1-based.
    fn image_processed(&mut self, done: usize, total: usize);

    /// Called once after the last page.
    fn finished(&mut self, total: usize);
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn image_processed(&mut self, _done: usize, _total: usize) {}

    fn finished(&mut self, _total: usize) {}
}

/// Rewrites a single `Processed i/n images...` line on stderr.
#[derive(Debug, Clone, Copy)]
pub struct StderrProgress {
    interval: usize,
}

impl StderrProgress {
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
        }
    }
}

impl Default for StderrProgress {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_INTERVAL)
    }
}

impl ProgressSink for StderrProgress {
    fn image_processed(&mut self, done: usize, total: usize) {
        if done % self.interval == 0 {
            let mut stderr = std::io::stderr().lock();
            // Progress output is best effort.
            let _ = write!(stderr, "\rProcessed {}/{} images...", done, total);
            let _ = stderr.flush();
        }
    }

    fn finished(&mut self, total: usize) {
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "\rProcessed {}/{} images...", total, total);
        let _ = stderr.flush();
    }
}
