//! Upload Pipeline
//!
//! State machine for sending one genomic data file to the analysis API:
//!
//! ```text
//! Idle -> FileSelected -> Uploading -> Analyzing -> Done
//!                             |
//!                             +-> Failed (file kept, retry allowed)
//! ```
//!
//! Progress while uploading is synthetic: it advances on a timer and stops
//! at a cap until the network call settles, then jumps to 100. The
//! pipeline itself never touches a clock or the network; drivers call
//! [`UploadPipeline::tick`] and report the outcome.

#[cfg(feature = "native")]
mod driver;

#[cfg(feature = "native")]
pub use driver::{run_upload, Navigator, UploadError};

use std::time::Duration;

use thiserror::Error;

use crate::analysis::{AnalysisResult, UPLOAD_FALLBACK_ERROR};
use crate::routing::Route;

pub const NO_FILE_MESSAGE: &str = "Please select a file first";
pub const STORE_FAILED_MESSAGE: &str = "Could not save the analysis. Please try again.";

/// Formats listed on the upload page
pub const SUPPORTED_FORMATS: [(&str, &str); 6] = [
    ("VCF", "Variant Call Format"),
    ("CSV", "Comma-separated genotype data"),
    ("FASTA", "Sequence data"),
    ("PED", "PLINK pedigree files"),
    ("BED", "PLINK binary files"),
    ("PDF", "Lab reports"),
];

/// File picker `accept` attribute
pub const ACCEPTED_EXTENSIONS: &str = ".vcf,.csv,.txt,.ped,.map,.bed,.fam,.bim,.fasta,.fa,.pdf";

/// Size shown in the advisory note. Not enforced.
pub const ADVISORY_MAX_BYTES: u64 = 50 * 1024 * 1024;

/// A file picked by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    size: u64,
    /// Contents to send. Empty when the caller sends the file itself
    /// (the browser hands its `File` straight to `FormData`).
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            bytes,
        }
    }

    /// Name and size only
    pub fn metadata(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            bytes: Vec::new(),
        }
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// e.g. `"1.50 MB"`
    pub fn size_mb_label(&self) -> String {
        format!("{:.2} MB", self.size as f64 / (1024.0 * 1024.0))
    }

    /// Whether the extension is one the picker offers
    pub fn has_accepted_extension(&self) -> bool {
        let Some((_, ext)) = self.name.rsplit_once('.') else {
            return false;
        };
        let ext = format!(".{}", ext.to_ascii_lowercase());
        ACCEPTED_EXTENSIONS.split(',').any(|a| a == ext)
    }
}

/// Timer settings for the cosmetic parts of the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTiming {
    pub tick_interval: Duration,
    pub progress_step: u8,
    /// Progress never passes this until the upload settles
    pub progress_cap: u8,
    /// How long "Analyzing" is shown
    pub analyzing_delay: Duration,
    /// Pause between storing the result and moving to the results view
    pub redirect_delay: Duration,
}

impl Default for UploadTiming {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(200),
            progress_step: 10,
            progress_cap: 90,
            analyzing_delay: Duration::from_millis(2000),
            redirect_delay: Duration::from_millis(1500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    FileSelected,
    Uploading,
    Analyzing,
    Done,
    Failed,
}

impl UploadPhase {
    /// A request or a cosmetic delay is running
    pub fn is_busy(&self) -> bool {
        matches!(self, UploadPhase::Uploading | UploadPhase::Analyzing)
    }

    pub fn label(&self) -> &'static str {
        match self {
            UploadPhase::Idle => "Waiting for file",
            UploadPhase::FileSelected => "Ready to upload",
            UploadPhase::Uploading => "Uploading...",
            UploadPhase::Analyzing => "Analyzing genomic data...",
            UploadPhase::Done => "Analysis complete!",
            UploadPhase::Failed => "Upload failed",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Please select a file first")]
    NoFile,

    #[error("An upload is already in progress")]
    Busy,

    #[error("Cannot {action} while {phase:?}")]
    UnexpectedPhase {
        action: &'static str,
        phase: UploadPhase,
    },
}

#[derive(Debug, Clone)]
pub struct UploadPipeline {
    phase: UploadPhase,
    file: Option<UploadFile>,
    progress: u8,
    error: Option<String>,
    result: Option<AnalysisResult>,
    redirected: bool,
    timing: UploadTiming,
}

impl Default for UploadPipeline {
    fn default() -> Self {
        Self::new(UploadTiming::default())
    }
}

impl UploadPipeline {
    pub fn new(timing: UploadTiming) -> Self {
        Self {
            phase: UploadPhase::Idle,
            file: None,
            progress: 0,
            error: None,
            result: None,
            redirected: false,
            timing,
        }
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn file(&self) -> Option<&UploadFile> {
        self.file.as_ref()
    }

    /// Progress bar value, 0..=100
    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Inline error message, if the last attempt failed
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn timing(&self) -> &UploadTiming {
        &self.timing
    }

    /// Pick (or drop) a file. Clears any earlier error.
    pub fn select_file(&mut self, file: UploadFile) -> Result<(), PipelineError> {
        if self.phase.is_busy() {
            return Err(PipelineError::Busy);
        }

        tracing::debug!(file = %file.name, size = file.size(), "File selected");
        self.file = Some(file);
        self.phase = UploadPhase::FileSelected;
        self.progress = 0;
        self.error = None;
        self.result = None;
        self.redirected = false;
        Ok(())
    }

    /// Drop the selected file
    pub fn clear(&mut self) -> Result<(), PipelineError> {
        if self.phase.is_busy() {
            return Err(PipelineError::Busy);
        }

        self.file = None;
        self.phase = UploadPhase::Idle;
        self.progress = 0;
        self.error = None;
        self.result = None;
        self.redirected = false;
        Ok(())
    }

    /// Start uploading the selected file. Returns the file to send.
    pub fn begin_upload(&mut self) -> Result<UploadFile, PipelineError> {
        if self.phase.is_busy() {
            return Err(PipelineError::Busy);
        }

        let Some(file) = self.file.clone() else {
            self.error = Some(NO_FILE_MESSAGE.to_string());
            return Err(PipelineError::NoFile);
        };

        if self.phase == UploadPhase::Done {
            return Err(PipelineError::UnexpectedPhase {
                action: "upload",
                phase: self.phase,
            });
        }

        tracing::info!(file = %file.name, "Upload started");
        self.phase = UploadPhase::Uploading;
        self.progress = 0;
        self.error = None;
        Ok(file)
    }

    /// Advance synthetic progress by one step. No-op outside `Uploading`.
    pub fn tick(&mut self) -> u8 {
        if self.phase == UploadPhase::Uploading && self.progress < self.timing.progress_cap {
            self.progress = self
                .progress
                .saturating_add(self.timing.progress_step)
                .min(self.timing.progress_cap);
        }
        self.progress
    }

    pub fn upload_succeeded(&mut self, result: AnalysisResult) -> Result<(), PipelineError> {
        self.expect_phase(UploadPhase::Uploading, "finish upload")?;

        tracing::info!(
            file = %result.file_processed,
            risks = result.identified_risks.len(),
            "Upload succeeded, analyzing"
        );
        self.progress = 100;
        self.phase = UploadPhase::Analyzing;
        self.result = Some(result);
        Ok(())
    }

    /// Record a failed upload. `message` is the server-supplied error, if any.
    pub fn upload_failed(&mut self, message: Option<String>) -> Result<(), PipelineError> {
        self.expect_phase(UploadPhase::Uploading, "fail upload")?;

        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| UPLOAD_FALLBACK_ERROR.to_string());
        tracing::warn!("Upload failed: {}", message);

        self.phase = UploadPhase::Failed;
        self.progress = 0;
        self.error = Some(message);
        Ok(())
    }

    /// The analyzing delay is over. Returns the result to persist.
    pub fn analysis_elapsed(&mut self) -> Result<AnalysisResult, PipelineError> {
        self.expect_phase(UploadPhase::Analyzing, "complete analysis")?;

        let result = self.result.clone().ok_or(PipelineError::UnexpectedPhase {
            action: "complete analysis",
            phase: self.phase,
        })?;
        self.phase = UploadPhase::Done;
        Ok(result)
    }

    /// The finished analysis could not be stored. Back to `Failed` with the
    /// file kept, so the upload can be retried.
    pub fn store_failed(&mut self) -> Result<(), PipelineError> {
        self.expect_phase(UploadPhase::Done, "fail storing")?;

        tracing::warn!("Analysis could not be stored");
        self.phase = UploadPhase::Failed;
        self.progress = 0;
        self.result = None;
        self.error = Some(STORE_FAILED_MESSAGE.to_string());
        Ok(())
    }

    /// Where to go once the redirect delay is over. Yields at most once.
    pub fn take_redirect(&mut self) -> Option<Route> {
        if self.phase != UploadPhase::Done || self.redirected {
            return None;
        }
        self.redirected = true;
        Some(Route::Results)
    }

    fn expect_phase(&self, expected: UploadPhase, action: &'static str) -> Result<(), PipelineError> {
        if self.phase != expected {
            return Err(PipelineError::UnexpectedPhase {
                action,
                phase: self.phase,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Risk;

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            file_processed: "genome.vcf".to_string(),
            genomic_summary: Default::default(),
            identified_risks: vec![Risk::new("Diabetes", 0.7, "")],
        }
    }

    fn selected() -> UploadPipeline {
        let mut pipeline = UploadPipeline::default();
        pipeline
            .select_file(UploadFile::new("genome.vcf", b"##fileformat=VCFv4.2".to_vec()))
            .unwrap();
        pipeline
    }

    #[test]
    fn test_upload_without_file() {
        let mut pipeline = UploadPipeline::default();
        assert_eq!(pipeline.begin_upload(), Err(PipelineError::NoFile));
        assert_eq!(pipeline.error(), Some("Please select a file first"));
        assert_eq!(pipeline.phase(), UploadPhase::Idle);
    }

    #[test]
    fn test_progress_capped_until_settled() {
        let mut pipeline = selected();
        pipeline.begin_upload().unwrap();

        let mut last = 0;
        for _ in 0..50 {
            let p = pipeline.tick();
            assert!(p >= last && p <= 90);
            last = p;
        }
        assert_eq!(last, 90);

        pipeline.upload_succeeded(sample_result()).unwrap();
        assert_eq!(pipeline.progress(), 100);
        assert_eq!(pipeline.phase(), UploadPhase::Analyzing);

        // Ticks after settling do nothing
        assert_eq!(pipeline.tick(), 100);
    }

    #[test]
    fn test_happy_path_redirects_once() {
        let mut pipeline = selected();
        pipeline.begin_upload().unwrap();
        pipeline.upload_succeeded(sample_result()).unwrap();

        assert_eq!(pipeline.take_redirect(), None);
        let result = pipeline.analysis_elapsed().unwrap();
        assert_eq!(result.file_processed, "genome.vcf");
        assert_eq!(pipeline.phase(), UploadPhase::Done);

        assert_eq!(pipeline.take_redirect(), Some(Route::Results));
        assert_eq!(pipeline.take_redirect(), None);
    }

    #[test]
    fn test_failure_keeps_file_for_retry() {
        let mut pipeline = selected();
        pipeline.begin_upload().unwrap();
        pipeline.tick();
        pipeline.upload_failed(None).unwrap();

        assert_eq!(pipeline.phase(), UploadPhase::Failed);
        assert_eq!(pipeline.progress(), 0);
        assert_eq!(pipeline.error(), Some("Upload failed. Please try again."));
        assert!(pipeline.file().is_some());

        pipeline.begin_upload().unwrap();
        assert_eq!(pipeline.error(), None);
        assert_eq!(pipeline.phase(), UploadPhase::Uploading);
    }

    #[test]
    fn test_store_failure_allows_retry() {
        let mut pipeline = selected();
        pipeline.begin_upload().unwrap();
        pipeline.upload_succeeded(sample_result()).unwrap();
        pipeline.analysis_elapsed().unwrap();
        pipeline.store_failed().unwrap();

        assert_eq!(pipeline.phase(), UploadPhase::Failed);
        assert_eq!(pipeline.error(), Some(STORE_FAILED_MESSAGE));
        assert_eq!(pipeline.take_redirect(), None);
        assert!(pipeline.file().is_some());

        pipeline.begin_upload().unwrap();
        assert_eq!(pipeline.phase(), UploadPhase::Uploading);
    }

    #[test]
    fn test_server_message_surfaced() {
        let mut pipeline = selected();
        pipeline.begin_upload().unwrap();
        pipeline
            .upload_failed(Some("Unsupported file type".to_string()))
            .unwrap();
        assert_eq!(pipeline.error(), Some("Unsupported file type"));
    }

    #[test]
    fn test_new_file_clears_error() {
        let mut pipeline = selected();
        pipeline.begin_upload().unwrap();
        pipeline.upload_failed(None).unwrap();

        pipeline.select_file(UploadFile::metadata("other.csv", 10)).unwrap();
        assert_eq!(pipeline.error(), None);
        assert_eq!(pipeline.phase(), UploadPhase::FileSelected);
    }

    #[test]
    fn test_busy_rejects_changes() {
        let mut pipeline = selected();
        pipeline.begin_upload().unwrap();

        assert_eq!(pipeline.begin_upload(), Err(PipelineError::Busy));
        assert_eq!(pipeline.clear(), Err(PipelineError::Busy));
        assert_eq!(
            pipeline.select_file(UploadFile::metadata("x.vcf", 1)),
            Err(PipelineError::Busy)
        );
    }

    #[test]
    fn test_clear_returns_to_idle() {
        let mut pipeline = selected();
        pipeline.clear().unwrap();
        assert_eq!(pipeline.phase(), UploadPhase::Idle);
        assert!(pipeline.file().is_none());
    }

    #[test]
    fn test_out_of_order_events_rejected() {
        let mut pipeline = selected();
        assert!(pipeline.upload_succeeded(sample_result()).is_err());
        assert!(pipeline.analysis_elapsed().is_err());
        assert!(pipeline.upload_failed(None).is_err());
    }

    #[test]
    fn test_file_labels() {
        let file = UploadFile::metadata("Sample.VCF", 1_572_864);
        assert_eq!(file.size_mb_label(), "1.50 MB");
        assert!(file.has_accepted_extension());
        assert!(!UploadFile::metadata("notes.docx", 1).has_accepted_extension());
        assert!(!UploadFile::metadata("README", 1).has_accepted_extension());
    }
}
