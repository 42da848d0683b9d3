//! groundgen Ground Texture Backend
//!
//! This crate synthesizes matched texture / defects / depth image triples for
//! training defect detectors. Two generators are provided:
//!
//! - **Cellular stone** (cobblestone, slate): a jittered lattice is turned
//!   into Voronoi cells, shrunk into stones, optionally slanted, and rendered
//!   through SVG documents. Wrapping the lattice makes the images tile.
//! - **Asphalt**: palette noise with stamped aggregate inlays and random-walk
//!   cracks drawn into all three images at once.
//!
//! # Example
//!
//! ```no_run
//! use groundgen_backend_texture::generate::{generate_ground, save_ground_set};
//! use groundgen_spec::{GroundRequest, GroundType};
//! use std::path::Path;
//!
//! let request = GroundRequest::new(GroundType::Cobblestone, "cobblestone", "output")
//!     .with_seed(42);
//! let result = generate_ground(&request).unwrap();
//! save_ground_set(&result, Path::new("output"), &request.name, request.depth_range).unwrap();
//! ```
//!
//! # Determinism
//!
//! - Same request + same seed = byte-identical output
//! - PCG32 RNG is used for all random operations
//! - PNG encoding uses fixed compression settings

pub mod asphalt;
pub mod cells;
pub mod cellular;
pub mod error;
pub mod generate;
pub mod lattice;
pub mod offset;
pub mod png;
pub mod point;
pub mod polygon;
pub mod raster;
pub mod rng;
pub mod svg;
pub mod voronoi;

// Re-export main types for convenience
pub use cells::{Cell, CellTexture};
pub use error::GenerateError;
pub use generate::{generate_ground, save_ground_set, GroundResult, SavedFile};
pub use offset::JoinType;
pub use point::{ColorRgb, Point2, Point3, Point4};
pub use png::{PngConfig, PngError};
pub use raster::RgbBuffer;
pub use rng::DeterministicRng;
pub use svg::SvgDocument;
