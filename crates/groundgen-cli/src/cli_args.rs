//! CLI argument definitions for the groundgen command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{ArgAction, Parser, Subcommand};
use groundgen_spec::{DepthRange, GroundType};

/// groundgen - Procedural ground textures with defect masks and depth maps
#[derive(Parser)]
#[command(name = "groundgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress human-readable output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Generate texture / defects / depth image sets
    Generate {
        /// Ground type (cobblestone, slate, asphalt)
        #[arg(short, long)]
        ground: GroundType,

        /// Number of image sets to generate
        #[arg(short = 'n', long, default_value = "1")]
        count: u32,

        /// Output directory (default: current directory)
        #[arg(short, long, default_value = ".")]
        output_dir: String,

        /// Number of defects per set (default: preset value)
        #[arg(short, long)]
        defects: Option<u32>,

        /// Base seed; each set derives its own seed from it
        #[arg(long, default_value = "0")]
        seed: u32,

        /// Bit depth of the depth image (8bit, 16bit)
        #[arg(long, default_value = "16bit")]
        depth_range: DepthRange,

        /// Also write the SVG sources (cobblestone and slate only)
        #[arg(long)]
        svg: bool,

        /// Texture images assigned to stones at random (can be repeated)
        #[arg(long = "texture", value_name = "PATH")]
        textures: Vec<String>,

        /// Texture image behind the stones
        #[arg(long, value_name = "PATH")]
        background_texture: Option<String>,

        /// Image resolution as WIDTHxHEIGHT (asphalt only)
        #[arg(short, long, value_parser = parse_resolution)]
        resolution: Option<[u32; 2]>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print the preset parameters as JSON
    Presets {
        /// Only print the preset of this ground type
        #[arg(short, long)]
        ground: Option<GroundType>,
    },
}

/// Parses `WIDTHxHEIGHT`, e.g. `1024x768`.
pub(crate) fn parse_resolution(value: &str) -> Result<[u32; 2], String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", value))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid dimension '{}': {}", s, e))
    };
    Ok([parse(width)?, parse(height)?])
}
