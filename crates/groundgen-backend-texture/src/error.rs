//! Errors from ground generation.

use groundgen_spec::BackendError;
use thiserror::Error;

use crate::png::PngError;

/// Errors from ground generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("shape mismatch: expected {expected} components, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("invalid color value: {0}")]
    InvalidColorValue(String),

    #[error("cannot wrap {amount} more than the grid size {size}")]
    WrapTooLarge { amount: usize, size: usize },

    #[error("unknown crack direction: {0}")]
    InvalidDirection(i32),

    #[error("invalid step index {index} for a crack of {max_steps} steps")]
    InvalidStepIndex { index: u32, max_steps: u32 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("SVG error: {0}")]
    Svg(#[from] usvg::Error),

    #[error("raster error: {0}")]
    Raster(String),

    #[error("PNG error: {0}")]
    Png(#[from] PngError),

    #[error("image error: {0}")]
    Image(image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for GenerateError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(io) => GenerateError::Io(io),
            other => GenerateError::Image(other),
        }
    }
}

impl BackendError for GenerateError {
    fn code(&self) -> &'static str {
        match self {
            GenerateError::ShapeMismatch { .. } => "GROUND_001",
            GenerateError::InvalidColorValue(_) => "GROUND_002",
            GenerateError::WrapTooLarge { .. } => "GROUND_003",
            GenerateError::InvalidDirection(_) => "GROUND_004",
            GenerateError::InvalidStepIndex { .. } => "GROUND_005",
            GenerateError::InvalidParameter(_) => "GROUND_006",
            GenerateError::Svg(_) => "GROUND_007",
            GenerateError::Raster(_) => "GROUND_008",
            GenerateError::Png(_) => "GROUND_009",
            GenerateError::Image(_) => "GROUND_010",
            GenerateError::Io(_) => "GROUND_011",
        }
    }

    fn category(&self) -> &'static str {
        match self {
            GenerateError::ShapeMismatch { .. } | GenerateError::InvalidColorValue(_) => "geometry",
            GenerateError::WrapTooLarge { .. } | GenerateError::InvalidParameter(_) => "parameter",
            GenerateError::InvalidDirection(_) | GenerateError::InvalidStepIndex { .. } => "crack",
            GenerateError::Svg(_) | GenerateError::Raster(_) => "render",
            GenerateError::Png(_) | GenerateError::Image(_) | GenerateError::Io(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        let err = GenerateError::WrapTooLarge { amount: 6, size: 5 };
        assert_eq!(err.code(), "GROUND_003");
        assert_eq!(err.category(), "parameter");
        assert_eq!(err.message(), "cannot wrap 6 more than the grid size 5");

        let err = GenerateError::InvalidDirection(8);
        assert_eq!(err.code(), "GROUND_004");
        assert_eq!(err.category(), "crack");
    }

    #[test]
    fn test_image_io_error_maps_to_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: GenerateError = image::ImageError::IoError(io).into();
        assert!(matches!(err, GenerateError::Io(_)));
    }
}
