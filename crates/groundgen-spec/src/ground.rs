//! Ground types, generator parameters, and presets.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The ground surface to synthesize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroundType {
    /// Small, regular stones with narrow joints.
    Cobblestone,
    /// Larger, irregular slabs.
    Slate,
    /// Noise-based asphalt with cracks.
    Asphalt,
}

impl GroundType {
    /// Returns the snake_case name used in file names and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            GroundType::Cobblestone => "cobblestone",
            GroundType::Slate => "slate",
            GroundType::Asphalt => "asphalt",
        }
    }

    /// Returns the preset parameters for this ground type.
    pub fn default_params(&self) -> GroundParams {
        match self {
            GroundType::Cobblestone => GroundParams::Cellular(CellularParams::cobblestone()),
            GroundType::Slate => GroundParams::Cellular(CellularParams::slate()),
            GroundType::Asphalt => GroundParams::Asphalt(AsphaltParams::default()),
        }
    }

    /// Whether this ground type is produced by the cellular generator.
    pub fn is_cellular(&self) -> bool {
        matches!(self, GroundType::Cobblestone | GroundType::Slate)
    }
}

impl std::fmt::Display for GroundType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroundType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cobblestone" => Ok(GroundType::Cobblestone),
            "slate" => Ok(GroundType::Slate),
            "asphalt" => Ok(GroundType::Asphalt),
            other => Err(format!(
                "unknown ground type '{}' (expected cobblestone, slate, or asphalt)",
                other
            )),
        }
    }
}

/// Pixel bit depth of the depth image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DepthRange {
    /// 8 bits per channel.
    #[serde(rename = "8bit")]
    Eight,
    /// 16 bits per channel.
    #[serde(rename = "16bit")]
    #[default]
    Sixteen,
}

impl FromStr for DepthRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "8bit" => Ok(DepthRange::Eight),
            "16bit" => Ok(DepthRange::Sixteen),
            other => Err(format!(
                "unknown depth range '{}' (expected 8bit or 16bit)",
                other
            )),
        }
    }
}

/// Parameters of the Voronoi-based stone generator.
///
/// Distances (`grid_distortion`, `distance`, `corner_size`) are relative to
/// the lattice spacing; `max_z_displace` is in depth-color units (0-255).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CellularParams {
    /// Edge length of the source grid in cells. The image spans `size` cm.
    #[serde(default = "default_size")]
    pub size: usize,
    /// Maximum jitter of each lattice site, relative to the cell spacing.
    #[serde(default = "default_grid_distortion")]
    pub grid_distortion: f64,
    /// Gap between neighboring cells.
    #[serde(default = "default_distance")]
    pub distance: f64,
    /// Corner cut-off size.
    #[serde(default = "default_corner_size")]
    pub corner_size: f64,
    /// Depth color of a cell at height 0.
    #[serde(default = "default_foreground")]
    pub foreground: [u8; 3],
    /// Color between cells and of maximum height.
    #[serde(default = "default_background")]
    pub background: [u8; 3],
    /// Cells receive a random height up to this value.
    #[serde(default = "default_max_z_displace")]
    pub max_z_displace: f64,
    /// Cells are randomly sheared in z up to this value per unit distance.
    #[serde(default)]
    pub max_slant: f64,
    /// Lattice rows/columns replicated across the edges for seamless tiling.
    #[serde(default = "default_wrap_amount")]
    pub wrap_amount: usize,
    /// Number of cells removed as defects.
    #[serde(default)]
    pub defects: u32,
    /// Texture images assigned to cells at random.
    #[serde(default)]
    pub texture_images: Vec<PathBuf>,
    /// Image tiled behind the cells of the texture image.
    #[serde(default)]
    pub background_texture: Option<PathBuf>,
    /// Output pixel density.
    #[serde(default = "default_dpi")]
    pub dpi: f64,
    /// Also write the vector documents next to the PNG files.
    #[serde(default)]
    pub render_svg: bool,
    /// Mark each cell's site with a red dot.
    #[serde(default)]
    pub debug_cell_center: bool,
}

fn default_size() -> usize {
    10
}

fn default_grid_distortion() -> f64 {
    0.5
}

fn default_distance() -> f64 {
    0.1
}

fn default_corner_size() -> f64 {
    0.3
}

fn default_foreground() -> [u8; 3] {
    [255, 255, 255]
}

fn default_background() -> [u8; 3] {
    [0, 0, 0]
}

fn default_max_z_displace() -> f64 {
    20.0
}

fn default_wrap_amount() -> usize {
    4
}

fn default_dpi() -> f64 {
    96.0
}

impl Default for CellularParams {
    fn default() -> Self {
        Self {
            size: default_size(),
            grid_distortion: default_grid_distortion(),
            distance: default_distance(),
            corner_size: default_corner_size(),
            foreground: default_foreground(),
            background: default_background(),
            max_z_displace: default_max_z_displace(),
            max_slant: 0.0,
            wrap_amount: default_wrap_amount(),
            defects: 0,
            texture_images: Vec::new(),
            background_texture: None,
            dpi: default_dpi(),
            render_svg: false,
            debug_cell_center: false,
        }
    }
}

impl CellularParams {
    /// Small regular stones.
    pub fn cobblestone() -> Self {
        Self {
            size: 10,
            grid_distortion: 0.2,
            distance: 0.08,
            corner_size: 0.3,
            max_z_displace: 130.0,
            max_slant: 0.0,
            wrap_amount: 5,
            dpi: 96.0 * 3.0,
            ..Self::default()
        }
    }

    /// Larger irregular slabs.
    pub fn slate() -> Self {
        Self {
            size: 7,
            grid_distortion: 0.5,
            distance: 0.04,
            corner_size: 0.3,
            max_z_displace: 150.0,
            max_slant: 0.0,
            wrap_amount: 5,
            dpi: 96.0 * 3.0,
            ..Self::default()
        }
    }
}

/// Parameters of the asphalt generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AsphaltParams {
    /// Image width and height in pixels.
    #[serde(default = "default_resolution")]
    pub resolution: [u32; 2],
    /// Palette selector: 1, 2, or anything else for black/white noise.
    #[serde(default = "default_asphalt_type")]
    pub asphalt_type: u8,
    /// Crack length relative to the image width.
    #[serde(default = "default_crack_length")]
    pub crack_length: f64,
    /// Crack width in pixels at its widest point.
    #[serde(default = "default_crack_width")]
    pub crack_width: u32,
    /// Number of main cracks.
    #[serde(default)]
    pub defects: u32,
}

fn default_resolution() -> [u32; 2] {
    [1024, 1024]
}

fn default_asphalt_type() -> u8 {
    1
}

/// Largest accepted `crack_length`.
pub const MAX_CRACK_LENGTH: f64 = 10.0;

fn default_crack_length() -> f64 {
    0.8
}

fn default_crack_width() -> u32 {
    10
}

impl Default for AsphaltParams {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            asphalt_type: default_asphalt_type(),
            crack_length: default_crack_length(),
            crack_width: default_crack_width(),
            defects: 0,
        }
    }
}

/// Generator-specific parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroundParams {
    /// Voronoi stone generator.
    Cellular(CellularParams),
    /// Asphalt noise and crack generator.
    Asphalt(AsphaltParams),
}

impl GroundParams {
    /// Number of defects requested, regardless of generator.
    pub fn defects(&self) -> u32 {
        match self {
            GroundParams::Cellular(p) => p.defects,
            GroundParams::Asphalt(p) => p.defects,
        }
    }

    /// Returns a copy with the defect count replaced.
    pub fn with_defects(mut self, defects: u32) -> Self {
        match &mut self {
            GroundParams::Cellular(p) => p.defects = defects,
            GroundParams::Asphalt(p) => p.defects = defects,
        }
        self
    }
}

/// One generation call: generator, parameters, seed, and output location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroundRequest {
    /// Ground surface to synthesize.
    pub ground_type: GroundType,
    /// Base file name of the image set (without suffix or extension).
    pub name: String,
    /// Directory the image set is written to.
    pub output_dir: PathBuf,
    /// Bit depth of the depth image.
    #[serde(default)]
    pub depth_range: DepthRange,
    /// Seed for all random decisions of this call.
    #[serde(default)]
    pub seed: u32,
    /// Generator parameters.
    pub params: GroundParams,
}

impl GroundRequest {
    /// Creates a request using the preset parameters of `ground_type`.
    pub fn new(
        ground_type: GroundType,
        name: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            ground_type,
            name: name.into(),
            output_dir: output_dir.into(),
            depth_range: DepthRange::default(),
            seed: 0,
            params: ground_type.default_params(),
        }
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Replaces the generator parameters.
    pub fn with_params(mut self, params: GroundParams) -> Self {
        self.params = params;
        self
    }

    /// Sets the depth image bit depth.
    pub fn with_depth_range(mut self, depth_range: DepthRange) -> Self {
        self.depth_range = depth_range;
        self
    }

    /// Parses a request from JSON.
    pub fn from_json(json: &str) -> Result<Self, crate::error::RequestError> {
        Ok(serde_json::from_str(json)?)
    }
}
