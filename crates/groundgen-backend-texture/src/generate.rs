//! Main entry point for ground generation.
//!
//! [`generate_ground`] validates a request and runs the matching generator;
//! [`save_ground_set`] writes the resulting image set.

use std::path::{Path, PathBuf};

use groundgen_spec::validation::validate_request;
use groundgen_spec::{DepthRange, ErrorCode, GroundParams, GroundRequest, GroundType, OutputNames};
use tracing::{debug, instrument, warn};

use crate::asphalt::generate_asphalt;
use crate::cellular::{generate_cellular, CellularDocuments};
use crate::error::GenerateError;
use crate::png::{
    hash_png, write_rgb16_to_vec_with_hash, write_rgb_to_vec_with_hash, PngConfig,
};
use crate::raster::RgbBuffer;
use crate::rng::DeterministicRng;

/// The generated images of one request.
#[derive(Debug, Clone)]
pub struct GroundResult {
    pub ground_type: GroundType,
    pub texture: RgbBuffer,
    pub defects: RgbBuffer,
    pub depth: RgbBuffer,
    /// Vector sources of the cellular images, when requested.
    pub documents: Option<CellularDocuments>,
}

/// A file written by [`save_ground_set`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub path: PathBuf,
    /// BLAKE3 hash of the file contents.
    pub hash: String,
}

/// Generates the texture, defects, and depth images for `request`.
///
/// The request is validated first. A wrap amount larger than the grid is
/// reported as [`GenerateError::WrapTooLarge`]; other validation failures
/// as [`GenerateError::InvalidParameter`].
#[instrument(skip(request), fields(ground = %request.ground_type, name = %request.name, seed = request.seed))]
pub fn generate_ground(request: &GroundRequest) -> Result<GroundResult, GenerateError> {
    if let Err(errors) = validate_request(request).into_result() {
        return Err(validation_error(request, &errors));
    }

    let result = match &request.params {
        GroundParams::Cellular(params) => {
            let images = generate_cellular(params, request.seed)?;
            GroundResult {
                ground_type: request.ground_type,
                texture: images.texture,
                defects: images.defects,
                depth: images.depth,
                documents: params.render_svg.then_some(images.documents),
            }
        }
        GroundParams::Asphalt(params) => {
            let mut rng = DeterministicRng::new(request.seed);
            let images = generate_asphalt(params, &mut rng)?;
            GroundResult {
                ground_type: request.ground_type,
                texture: images.texture,
                defects: images.defects,
                depth: images.depth,
                documents: None,
            }
        }
    };
    debug!(
        width = result.texture.width,
        height = result.texture.height,
        "generated ground"
    );
    Ok(result)
}

fn validation_error(
    request: &GroundRequest,
    errors: &[groundgen_spec::ValidationError],
) -> GenerateError {
    if errors.iter().any(|e| e.code == ErrorCode::WrapTooLarge) {
        if let GroundParams::Cellular(params) = &request.params {
            return GenerateError::WrapTooLarge {
                amount: params.wrap_amount,
                size: params.size,
            };
        }
    }
    let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    GenerateError::InvalidParameter(messages.join("; "))
}

/// Writes the image set of `result` into `output_dir` as `<name>_texture`,
/// `<name>_defects`, and `<name>_depth` (plus `.svg` siblings when the result
/// carries documents).
///
/// All files are encoded in memory and written to temporary siblings first,
/// then renamed into place. On failure the files of this set written so far
/// and all temporaries are removed.
pub fn save_ground_set(
    result: &GroundResult,
    output_dir: &Path,
    name: &str,
    depth_range: DepthRange,
) -> Result<Vec<SavedFile>, GenerateError> {
    let names = OutputNames::for_set(output_dir, name);
    let config = PngConfig::default();

    let (texture, texture_hash) = write_rgb_to_vec_with_hash(&result.texture, &config)?;
    let (defects, defects_hash) = write_rgb_to_vec_with_hash(&result.defects, &config)?;
    let (depth, depth_hash) = match depth_range {
        DepthRange::Eight => write_rgb_to_vec_with_hash(&result.depth, &config)?,
        DepthRange::Sixteen => write_rgb16_to_vec_with_hash(&result.depth, &config)?,
    };

    let [texture_path, defects_path, depth_path] = names.pngs();
    let mut files: Vec<(&Path, Vec<u8>, String)> = vec![
        (texture_path, texture, texture_hash),
        (defects_path, defects, defects_hash),
        (depth_path, depth, depth_hash),
    ];
    if let Some(documents) = &result.documents {
        let [texture_svg, defects_svg, depth_svg] = names.svgs();
        for (path, document) in [
            (texture_svg, &documents.texture),
            (defects_svg, &documents.defects),
            (depth_svg, &documents.depth),
        ] {
            let data = document.text.clone().into_bytes();
            let hash = hash_png(&data);
            files.push((path, data, hash));
        }
    }

    std::fs::create_dir_all(output_dir)?;
    write_all_or_nothing(&files)?;

    Ok(files
        .into_iter()
        .map(|(path, _, hash)| SavedFile {
            path: path.to_path_buf(),
            hash,
        })
        .collect())
}

fn partial_path(path: &Path) -> PathBuf {
    hidden_sibling(path, "partial")
}

fn backup_path(path: &Path) -> PathBuf {
    hidden_sibling(path, "backup")
}

fn hidden_sibling(path: &Path, suffix: &str) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}", file_name, suffix))
}

/// Moves every staged file into place. On failure the previous contents of
/// the destinations are put back.
fn write_all_or_nothing(files: &[(&Path, Vec<u8>, String)]) -> Result<(), GenerateError> {
    let mut written: Vec<PathBuf> = Vec::with_capacity(files.len());
    let staged = files.iter().try_for_each(|(path, data, _)| {
        let tmp = partial_path(path);
        std::fs::write(&tmp, data)?;
        written.push(tmp);
        Ok::<(), std::io::Error>(())
    });
    if let Err(err) = staged {
        cleanup(&written);
        return Err(err.into());
    }

    let mut placed: Vec<(&Path, Option<PathBuf>)> = Vec::with_capacity(files.len());
    for (i, (path, _, _)) in files.iter().enumerate() {
        let backup = match back_up(path) {
            Ok(backup) => backup,
            Err(err) => {
                roll_back(&placed);
                cleanup(&written[i..]);
                return Err(err.into());
            }
        };
        if let Err(err) = std::fs::rename(&written[i], path) {
            if let Some(backup) = &backup {
                restore(backup, path);
            }
            roll_back(&placed);
            cleanup(&written[i..]);
            return Err(err.into());
        }
        placed.push((*path, backup));
    }

    let backups: Vec<PathBuf> = placed.into_iter().filter_map(|(_, b)| b).collect();
    cleanup(&backups);
    debug!(files = files.len(), replaced = backups.len(), "wrote image set");
    Ok(())
}

/// Moves an existing regular file out of the way of `path`.
fn back_up(path: &Path) -> std::io::Result<Option<PathBuf>> {
    if !path.is_file() {
        return Ok(None);
    }
    let backup = backup_path(path);
    std::fs::rename(path, &backup)?;
    Ok(Some(backup))
}

fn restore(backup: &Path, path: &Path) {
    if let Err(err) = std::fs::rename(backup, path) {
        warn!(path = %path.display(), %err, "failed to restore previous output");
    }
}

fn roll_back(placed: &[(&Path, Option<PathBuf>)]) {
    for (path, backup) in placed.iter().rev() {
        match backup {
            Some(backup) => restore(backup, path),
            None => cleanup(&[path.to_path_buf()]),
        }
    }
}

fn cleanup(paths: &[PathBuf]) {
    for path in paths {
        if let Err(err) = std::fs::remove_file(path) {
            warn!(path = %path.display(), %err, "failed to remove temporary output");
        }
    }
}
