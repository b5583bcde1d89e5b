//! Progress reporting abstraction
//!
//! Keeps the batch loops free of indicatif, and lets the prompt hide the
//! bar while it waits for input.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// A handle to an active progress bar
pub trait ProgressHandle: Send + Sync {
    fn inc(&self, n: u64);
    fn finish(&self);
}

/// Factory for creating progress handles
pub trait ProgressReporter: Send + Sync {
    fn start(&self, label: &str, total: u64) -> Box<dyn ProgressHandle>;
}

/// Indicatif-based progress reporter for CLI usage
///
/// Bars live in a shared [`MultiProgress`] so other terminal output can
/// suspend them.
pub struct IndicatifProgress {
    bars: MultiProgress,
}

impl IndicatifProgress {
    pub fn new(bars: MultiProgress) -> Self {
        Self { bars }
    }
}

impl ProgressReporter for IndicatifProgress {
    fn start(&self, label: &str, total: u64) -> Box<dyn ProgressHandle> {
        let pb = self.bars.add(ProgressBar::new(total));
        pb.set_style(
            ProgressStyle::default_bar()
                .template(&format!(
                    "{{spinner:.green}} {}: [{{bar:40.cyan/blue}}] {{pos}}/{{len}}",
                    label
                ))
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        Box::new(IndicatifHandle(pb))
    }
}

struct IndicatifHandle(ProgressBar);

impl ProgressHandle for IndicatifHandle {
    fn inc(&self, n: u64) {
        self.0.inc(n);
    }

    fn finish(&self) {
        self.0.finish_and_clear();
    }
}

/// No-op progress reporter for tests and `--quiet`
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn start(&self, _label: &str, _total: u64) -> Box<dyn ProgressHandle> {
        Box::new(NoopHandle)
    }
}

struct NoopHandle;

impl ProgressHandle for NoopHandle {
    fn inc(&self, _n: u64) {}
    fn finish(&self) {}
}

/// Picks the reporter for an invocation
pub fn reporter(quiet: bool, bars: &MultiProgress) -> Box<dyn ProgressReporter> {
    if quiet {
        bars.set_draw_target(ProgressDrawTarget::hidden());
        Box::new(NoopProgress)
    } else {
        Box::new(IndicatifProgress::new(bars.clone()))
    }
}
