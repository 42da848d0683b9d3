//! Request validation logic.

use crate::error::{ErrorCode, ValidationError, ValidationResult};
use crate::ground::{
    AsphaltParams, CellularParams, GroundParams, GroundRequest, MAX_CRACK_LENGTH,
};

/// Validates a request and returns a validation result.
///
/// Generation must not start unless the result is ok.
///
/// # Example
/// ```
/// use groundgen_spec::{GroundRequest, GroundType};
/// use groundgen_spec::validation::validate_request;
///
/// let request = GroundRequest::new(GroundType::Asphalt, "asphalt-00000", "out");
/// assert!(validate_request(&request).is_ok());
/// ```
pub fn validate_request(request: &GroundRequest) -> ValidationResult {
    let mut result = ValidationResult::default();

    validate_name(&request.name, &mut result);

    match (&request.params, request.ground_type.is_cellular()) {
        (GroundParams::Cellular(params), true) => validate_cellular(params, &mut result),
        (GroundParams::Asphalt(params), false) => validate_asphalt(params, &mut result),
        _ => result.add_error(ValidationError::with_path(
            ErrorCode::GroundParamsMismatch,
            format!(
                "ground type '{}' cannot be generated from these parameters",
                request.ground_type
            ),
            "params",
        )),
    }

    result
}

fn validate_name(name: &str, result: &mut ValidationResult) {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidOutputName,
            format!("output name must be a plain file stem, got '{}'", name),
            "name",
        ));
    }
}

/// Validates the parameters of the cellular generator.
pub fn validate_cellular(params: &CellularParams, result: &mut ValidationResult) {
    if params.wrap_amount > params.size {
        result.add_error(ValidationError::with_path(
            ErrorCode::WrapTooLarge,
            format!(
                "cannot wrap {} more than the grid size {}",
                params.wrap_amount, params.size
            ),
            "params.wrap_amount",
        ));
    }

    if params.size == 0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidGridSize,
            "grid size must be at least 1",
            "params.size",
        ));
    }

    let distances = [
        ("grid_distortion", params.grid_distortion),
        ("distance", params.distance),
        ("corner_size", params.corner_size),
        ("max_z_displace", params.max_z_displace),
        ("max_slant", params.max_slant),
    ];
    for (field, value) in distances {
        if !value.is_finite() || value < 0.0 {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidDistance,
                format!("{} must be finite and non-negative, got {}", field, value),
                format!("params.{}", field),
            ));
        }
    }

    if !params.dpi.is_finite() || params.dpi <= 0.0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidDpi,
            format!("dpi must be positive, got {}", params.dpi),
            "params.dpi",
        ));
    }
}

/// Validates the parameters of the asphalt generator.
pub fn validate_asphalt(params: &AsphaltParams, result: &mut ValidationResult) {
    let [width, height] = params.resolution;
    if width == 0 || height == 0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidResolution,
            format!("resolution must be non-zero, got {}x{}", width, height),
            "params.resolution",
        ));
    }

    if params.crack_width == 0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidCrackWidth,
            "crack width must be at least 1 pixel",
            "params.crack_width",
        ));
    }

    if !params.crack_length.is_finite() || params.crack_length < 0.0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidDistance,
            format!(
                "crack_length must be finite and non-negative, got {}",
                params.crack_length
            ),
            "params.crack_length",
        ));
    } else if params.crack_length > MAX_CRACK_LENGTH {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidDistance,
            format!(
                "crack_length must be at most {}, got {}",
                MAX_CRACK_LENGTH, params.crack_length
            ),
            "params.crack_length",
        ));
    }
}
