//! Import options and configuration.

use crate::model::PROVENANCE_NOTE;

/// Options for importing PAGE documents.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Note appended to the metadata comments
    pub provenance_note: String,
}

impl ImportOptions {
    /// Create new import options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip invalid regions).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the provenance note appended to the metadata comments.
    pub fn with_provenance_note(mut self, note: impl Into<String>) -> Self {
        self.provenance_note = note.into();
        self
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            provenance_note: PROVENANCE_NOTE.to_string(),
        }
    }
}

/// Error handling mode during import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any invalid region or missing comments
    #[default]
    Strict,
    /// Skip invalid regions and create missing comments
    Lenient,
}
