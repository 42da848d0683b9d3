//! groundgen Request Library
//!
//! This crate provides the types that describe a single ground-texture
//! generation call: which generator to run, with which parameters, and where
//! the texture / defects / depth triple is written.
//!
//! # Example
//!
//! ```
//! use groundgen_spec::{CellularParams, GroundParams, GroundRequest, GroundType};
//! use groundgen_spec::validation::validate_request;
//!
//! let request = GroundRequest::new(GroundType::Cobblestone, "cobblestone", "out")
//!     .with_seed(42)
//!     .with_params(GroundParams::Cellular(CellularParams::cobblestone()));
//!
//! assert!(validate_request(&request).is_ok());
//! ```
//!
//! # Modules
//!
//! - [`error`]: Validation errors, error codes, and the backend error trait
//! - [`ground`]: Ground types, generator parameters, and presets
//! - [`output`]: Output file naming for an image set
//! - [`validation`]: Request validation

pub mod error;
pub mod ground;
pub mod output;
pub mod validation;

pub use error::{BackendError, ErrorCode, RequestError, ValidationError, ValidationResult};
pub use ground::{
    AsphaltParams, CellularParams, DepthRange, GroundParams, GroundRequest, GroundType,
    MAX_CRACK_LENGTH,
};
pub use output::OutputNames;
