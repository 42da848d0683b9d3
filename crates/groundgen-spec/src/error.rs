//! Error types for request validation and backend reporting.

use thiserror::Error;

/// Error codes for request validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// E001: Grid size must be at least one cell
    InvalidGridSize,
    /// E002: Wrap amount exceeds the grid size
    WrapTooLarge,
    /// E003: A relative distance is negative or not finite
    InvalidDistance,
    /// E004: DPI must be positive
    InvalidDpi,
    /// E005: Asphalt resolution has a zero dimension
    InvalidResolution,
    /// E006: Crack width must be at least one pixel
    InvalidCrackWidth,
    /// E007: Parameters do not match the ground type
    GroundParamsMismatch,
    /// E008: Output name is empty or contains a path separator
    InvalidOutputName,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::InvalidGridSize => "E001",
            ErrorCode::WrapTooLarge => "E002",
            ErrorCode::InvalidDistance => "E003",
            ErrorCode::InvalidDpi => "E004",
            ErrorCode::InvalidResolution => "E005",
            ErrorCode::InvalidCrackWidth => "E006",
            ErrorCode::GroundParamsMismatch => "E007",
            ErrorCode::InvalidOutputName => "E008",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, and optional JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// JSON path to the problematic field (e.g., "params.wrap_amount").
    pub path: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation error with a JSON path.
    pub fn with_path(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// Top-level error type for request operations.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Request validation failed with one or more errors.
    #[error("request validation failed with {0} error(s)")]
    ValidationFailed(usize),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Result of request validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Adds an error to the result.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Converts to a Result, returning Err if there are errors.
    pub fn into_result(self) -> Result<(), Vec<ValidationError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Common trait for backend errors.
///
/// Each backend error type implements this trait so callers can report a
/// stable code and category without depending on the backend crate's types.
pub trait BackendError: std::error::Error {
    /// Get the error code for reporting, e.g. "GROUND_004".
    fn code(&self) -> &'static str;

    /// Get a human-readable message describing the error.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Get the error category for grouping related errors.
    fn category(&self) -> &'static str;
}
