use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};

/// Result of processing one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The map was written to this path
    Saved(PathBuf),
    /// The file could not be decoded
    DecodeFailed(String),
    /// Everything in the image was classified as background
    NoForeground,
    /// Extraction failed for a reason specific to this image
    ExtractionFailed(String),
    /// The output could not be written
    EncodeFailed(String),
}

impl Outcome {
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Saved(_))
    }
}

/// Progress notification for one file
#[derive(Debug, Clone, Copy)]
pub struct ProgressEvent<'a> {
    /// 1-based position in the batch
    pub index: usize,
    pub total: usize,
    pub path: &'a Path,
    pub outcome: &'a Outcome,
}

/// End-of-batch statistics
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub flatten_enabled: bool,
    pub output_dir: PathBuf,
    pub elapsed: Duration,
}

/// Observer of batch progress
///
/// Reporters only observe; they cannot change how files are processed.
/// Files may finish out of order when processing in parallel.
pub trait Reporter: Sync {
    /// Called before the file at 1-based `index` is decoded.
    fn on_file_start(&self, _index: usize, _total: usize, _path: &Path) {}
    fn on_file(&self, event: &ProgressEvent<'_>);
    fn on_summary(&self, summary: &BatchSummary);
}

/// Reporter writing through the `log` facade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogReporter {
    pub show_progress: bool,
    pub show_stats: bool,
}

impl Reporter for LogReporter {
    fn on_file_start(&self, index: usize, total: usize, path: &Path) {
        if !self.show_progress {
            return;
        }
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        info!("[{index}/{total}] Processing: {name}");
    }

    fn on_file(&self, event: &ProgressEvent<'_>) {
        if !self.show_progress {
            return;
        }
        match event.outcome {
            Outcome::Saved(path) => info!("    -> [OK] Saved: {}", path.display()),
            Outcome::DecodeFailed(reason) => warn!("    -> [FAILED] {reason}"),
            Outcome::NoForeground => {
                warn!("    -> [FAILED] No map detected: {}", event.path.display());
            }
            Outcome::ExtractionFailed(reason) | Outcome::EncodeFailed(reason) => {
                warn!("    -> [FAILED] {reason}");
            }
        }
    }

    fn on_summary(&self, summary: &BatchSummary) {
        if !self.show_stats {
            return;
        }
        info!("========= MAPMATTE STATS =========");
        info!("Total files found      : {}", summary.total);
        info!("Processed successfully : {}", summary.succeeded);
        info!("Failed                 : {}", summary.failed);
        info!("Flatten colors enabled : {}", summary.flatten_enabled);
        info!("Output directory       : {}", summary.output_dir.display());
        info!(
            "Total time             : {:.2} seconds",
            summary.elapsed.as_secs_f64()
        );
        info!("==================================");
    }
}
