//! Generate command implementation
//!
//! Generates a batch of image sets for one ground type. Every set gets its
//! own seed derived from the base seed and its index.

use anyhow::{Context, Result};
use colored::Colorize;
use groundgen_backend_texture::{generate_ground, save_ground_set, DeterministicRng};
use groundgen_spec::output::batch_set_name;
use groundgen_spec::validation::validate_request;
use groundgen_spec::{
    DepthRange, ErrorCode, GroundParams, GroundRequest, GroundType, ValidationError,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::info;

use super::reporting;

/// Options of the generate command, after argument parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOptions {
    pub ground: GroundType,
    /// Number of image sets.
    pub count: u32,
    pub output_dir: PathBuf,
    /// Overrides the preset defect count.
    pub defects: Option<u32>,
    pub seed: u32,
    pub depth_range: DepthRange,
    /// Also write the SVG sources (cellular grounds only).
    pub svg: bool,
    pub texture_images: Vec<PathBuf>,
    pub background_texture: Option<PathBuf>,
    /// Overrides the asphalt resolution.
    pub resolution: Option<[u32; 2]>,
    pub json: bool,
    pub quiet: bool,
}

impl GenerateOptions {
    /// Options for `count` sets of `ground` with preset parameters.
    pub fn new(ground: GroundType, count: u32, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            ground,
            count,
            output_dir: output_dir.into(),
            defects: None,
            seed: 0,
            depth_range: DepthRange::default(),
            svg: false,
            texture_images: Vec::new(),
            background_texture: None,
            resolution: None,
            json: false,
            quiet: false,
        }
    }
}

/// Applies the command-line overrides to the preset of `options.ground`.
///
/// Overrides that do not apply to the chosen generator are reported as
/// validation errors.
pub fn build_params(options: &GenerateOptions) -> Result<GroundParams, Vec<ValidationError>> {
    let mut params = options.ground.default_params();
    if let Some(defects) = options.defects {
        params = params.with_defects(defects);
    }

    let mut errors = Vec::new();
    match &mut params {
        GroundParams::Cellular(cellular) => {
            cellular.render_svg = options.svg;
            cellular.texture_images = options.texture_images.clone();
            cellular.background_texture = options.background_texture.clone();
            if options.resolution.is_some() {
                errors.push(not_applicable("--resolution", options.ground, "params.resolution"));
            }
        }
        GroundParams::Asphalt(asphalt) => {
            if let Some(resolution) = options.resolution {
                asphalt.resolution = resolution;
            }
            if options.svg {
                errors.push(not_applicable("--svg", options.ground, "params.render_svg"));
            }
            if !options.texture_images.is_empty() {
                errors.push(not_applicable("--texture", options.ground, "params.texture_images"));
            }
            if options.background_texture.is_some() {
                errors.push(not_applicable(
                    "--background-texture",
                    options.ground,
                    "params.background_texture",
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(params)
    } else {
        Err(errors)
    }
}

fn not_applicable(flag: &str, ground: GroundType, path: &str) -> ValidationError {
    ValidationError::with_path(
        ErrorCode::GroundParamsMismatch,
        format!("{} does not apply to {}", flag, ground),
        path,
    )
}

/// The requests of a batch, in index order.
pub fn batch_requests(options: &GenerateOptions, params: &GroundParams) -> Vec<GroundRequest> {
    (0..options.count)
        .map(|index| {
            GroundRequest::new(
                options.ground,
                batch_set_name(options.ground.as_str(), index),
                &options.output_dir,
            )
            .with_seed(DeterministicRng::derive_image_seed(options.seed, index))
            .with_depth_range(options.depth_range)
            .with_params(params.clone())
        })
        .collect()
}

/// Run the generate command
///
/// # Returns
/// Exit code: 0 success, 1 invalid request, 2 generation error
pub fn run(options: &GenerateOptions) -> Result<ExitCode> {
    let start = Instant::now();
    let human = !options.json && !options.quiet;

    if human {
        println!("{} {}", "Ground:".cyan().bold(), options.ground);
        println!("{} {}", "Output dir:".cyan().bold(), options.output_dir.display());
        println!(
            "{} {} {}",
            "Sets:".cyan().bold(),
            options.count,
            format!("(base seed {})", options.seed).dimmed()
        );
    }

    let requests = match build_params(options) {
        Ok(params) => batch_requests(options, &params),
        Err(errors) => return Ok(report_invalid(options, &errors)),
    };
    // All sets share their parameters and differ only in name and seed.
    if let Some(first) = requests.first() {
        if let Err(errors) = validate_request(first).into_result() {
            return Ok(report_invalid(options, &errors));
        }
    }

    let mut sets = Vec::with_capacity(requests.len());
    for request in &requests {
        let written = generate_ground(request).and_then(|result| {
            save_ground_set(&result, &request.output_dir, &request.name, request.depth_range)
        });
        let files = match written {
            Ok(files) => files,
            Err(e) => {
                if options.json {
                    let output = serde_json::json!({
                        "success": false,
                        "name": request.name,
                        "error": reporting::generate_error_to_json(&e),
                        "sets": sets,
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                } else if !options.quiet {
                    println!("\n{} {}: {}", "GENERATION FAILED".red().bold(), request.name, e);
                }
                let e = anyhow::Error::new(e)
                    .context(format!("failed to generate image set '{}'", request.name));
                tracing::error!("{:#}", e);
                return Ok(ExitCode::from(2));
            }
        };
        info!(name = %request.name, seed = request.seed, "wrote image set");

        if options.json {
            sets.push(reporting::saved_set_to_json(&request.name, request.seed, &files));
        } else if human {
            reporting::print_saved_files(&request.name, request.seed, &files);
        }
    }

    if options.json {
        let output = serde_json::json!({ "success": true, "sets": sets });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("failed to serialize output")?
        );
    } else if human {
        println!(
            "\n{} Generated {} set(s) in {}ms",
            "Done.".green().bold(),
            requests.len(),
            start.elapsed().as_millis()
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn report_invalid(options: &GenerateOptions, errors: &[ValidationError]) -> ExitCode {
    if options.json {
        let output = serde_json::json!({
            "success": false,
            "errors": reporting::validation_errors_to_json(errors),
        });
        if let Ok(text) = serde_json::to_string_pretty(&output) {
            println!("{}", text);
        }
    } else if !options.quiet {
        reporting::print_validation_errors(errors);
    }
    ExitCode::from(1)
}
