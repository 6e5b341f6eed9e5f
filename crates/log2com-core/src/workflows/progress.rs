use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Events emitted while a batch of geometry files is converted.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    BatchStarted {
        total_files: u64,
    },
    FileStarted {
        path: PathBuf,
    },
    /// A deck was written for `path`.
    FileConverted {
        path: PathBuf,
        output: PathBuf,
        bonds: usize,
    },
    /// `path` was skipped; `reason` is the rendered error.
    FileFailed {
        path: PathBuf,
        reason: String,
    },
    BatchFinished {
        converted: usize,
        failed: usize,
    },
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards batch events to an optional callback.
///
/// A silent reporter never builds the events, so the path clones and error
/// rendering only happen when someone listens.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    pub fn is_silent(&self) -> bool {
        self.callback.is_none()
    }

    #[inline]
    fn emit(&self, event: impl FnOnce() -> Progress) {
        if let Some(cb) = &self.callback {
            cb(event());
        }
    }

    pub fn batch_started(&self, total_files: usize) {
        self.emit(|| Progress::BatchStarted {
            total_files: total_files as u64,
        });
    }

    pub fn file_started(&self, path: &Path) {
        self.emit(|| Progress::FileStarted {
            path: path.to_path_buf(),
        });
    }

    pub fn file_converted(&self, path: &Path, output: &Path, bonds: usize) {
        self.emit(|| Progress::FileConverted {
            path: path.to_path_buf(),
            output: output.to_path_buf(),
            bonds,
        });
    }

    pub fn file_failed(&self, path: &Path, reason: &dyn Display) {
        self.emit(|| Progress::FileFailed {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        });
    }

    pub fn batch_finished(&self, converted: usize, failed: usize) {
        self.emit(|| Progress::BatchFinished { converted, failed });
    }
}
