use std::path::{Path, PathBuf};
use thiserror::Error;
use super::bc_tools::BatchTask;

pub(super) const OUTPUT_SUFFIX: &str = "_bw";
pub(super) const MAX_REPORTED_ERRORS: usize = 5;
pub(super) const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tiff"];

pub(super) const STATUS_IDLE: &str = "Please select images and an output folder.";
pub(super) const STATUS_FILES_PICKED: &str = "Images selected. Choose an output folder and press Start.";
pub(super) const STATUS_FILES_CLEARED: &str = "Please select the images to convert.";
pub(super) const STATUS_DIR_PICKED: &str = "Output folder selected. Choose images and press Start.";
pub(super) const STATUS_DIR_CLEARED: &str = "Please select the folder to save results to.";
pub(super) const STATUS_STARTING: &str = "Starting conversion...";

/// Per-file failure, split the way the summary dialog reports it.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("'{file}' is not a valid image file.")]
    InvalidImage { file: String },
    #[error("Error while processing '{file}': {message}")]
    Processing { file: String, message: String },
}

pub type ConversionResult = Result<PathBuf, ConvertError>;

/// Reasons a batch refuses to start. Nothing on disk is touched when one of these is returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BatchError {
    #[error("Please select the images to convert first.")]
    NoFilesSelected,
    #[error("Please select the folder to save results to first.")]
    NoOutputDirectory,
}

/// Input files in picker order plus the destination folder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub files: Vec<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

impl Selection {
    /// Replaces the file list. `None` (a cancelled picker) clears it.
    /// Returns whether any file is selected afterwards.
    pub fn set_files(&mut self, files: Option<Vec<PathBuf>>) -> bool {
        self.files = files.unwrap_or_default();
        !self.files.is_empty()
    }

    pub fn set_output_dir(&mut self, dir: Option<PathBuf>) -> bool {
        self.output_dir = dir.filter(|d| !d.as_os_str().is_empty());
        self.output_dir.is_some()
    }

    pub fn validate(&self) -> Result<&Path, BatchError> {
        if self.files.is_empty() {
            return Err(BatchError::NoFilesSelected);
        }
        match &self.output_dir {
            Some(dir) if !dir.as_os_str().is_empty() => Ok(dir.as_path()),
            _ => Err(BatchError::NoOutputDirectory),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchReport {
    pub total: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub errors: Vec<String>,
    pub omitted_errors: usize,
    pub finished_at: chrono::DateTime<chrono::Local>,
}

impl BatchReport {
    pub(super) fn new(total: usize) -> Self {
        Self {
            total,
            success_count: 0,
            error_count: 0,
            errors: Vec::new(),
            omitted_errors: 0,
            finished_at: chrono::Local::now(),
        }
    }

    pub(super) fn record(&mut self, result: &ConversionResult) {
        match result {
            Ok(_) => self.success_count += 1,
            Err(e) => {
                self.error_count += 1;
                if self.errors.len() < MAX_REPORTED_ERRORS {
                    self.errors.push(e.to_string());
                } else {
                    self.omitted_errors += 1;
                }
            }
        }
    }

    pub(super) fn finish(mut self) -> Self {
        self.finished_at = chrono::Local::now();
        self
    }

    pub fn is_clean(&self) -> bool {
        self.error_count == 0
    }

    pub fn status_line(&self) -> String {
        let mut line = format!("Done! {} images converted successfully.", self.success_count);
        if self.error_count > 0 {
            line.push_str(&format!(" {} images failed.", self.error_count));
        }
        line
    }

    /// The reported error messages, with a trailing `...` when some were dropped.
    pub fn error_lines(&self) -> Vec<String> {
        let mut lines = self.errors.clone();
        if self.omitted_errors > 0 {
            lines.push("...".to_string());
        }
        lines
    }
}

/// Messages sent from the worker thread to the panel, in emission order.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    /// `index` is 1-based.
    Processing { index: usize, total: usize, file_name: String },
    Progress(u8),
    Finished(BatchReport),
}

impl BatchEvent {
    pub fn status_text(&self) -> Option<String> {
        match self {
            BatchEvent::Processing { index, total, file_name } => {
                Some(format!("Processing: {}/{} - {}", index, total, file_name))
            }
            BatchEvent::Progress(_) => None,
            BatchEvent::Finished(report) => Some(report.status_line()),
        }
    }
}

/// Dialogs the panel asks the shell to show.
#[derive(Debug, Clone)]
pub enum Notice {
    MissingInput(BatchError),
    Summary(BatchReport),
}

pub(super) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

pub struct BwConverter {
    pub(super) selection: Selection,
    pub(super) status: String,
    pub(super) progress: u8,
    pub(super) task: Option<BatchTask>,
    pub(super) last_report: Option<BatchReport>,
    pub(super) batch_started: bool,
    pub(super) notice: Option<Notice>,
}

impl BwConverter {
    pub fn new() -> Self {
        Self {
            selection: Selection::default(),
            status: STATUS_IDLE.to_string(),
            progress: 0,
            task: None,
            last_report: None,
            batch_started: false,
            notice: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.task.is_some()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}
