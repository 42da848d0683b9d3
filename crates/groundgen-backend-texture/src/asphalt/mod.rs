//! Asphalt generator: palette noise, stamped aggregate inlays, and cracks.
//!
//! All three images are plain pixel buffers drawn in lockstep. Only cracks
//! touch the defects and depth images.

mod crack;
mod shapes;

pub use crack::{depth_brightness, draw_crack, dynamic_width_crack, generate_cracks};
pub use shapes::{point_randrange, random_quad, Direction, DIR_V};

use groundgen_spec::{AsphaltParams, MAX_CRACK_LENGTH};
use tracing::{debug, instrument};

use crate::error::GenerateError;
use crate::point::Point2;
use crate::raster::RgbBuffer;
use crate::rng::DeterministicRng;

use shapes::stamp_inlay;

/// Number of aggregate inlays stamped onto every texture.
pub const INLAY_COUNT: usize = 6000;

/// Corner jitter range of an inlay quad, in pixels.
const INLAY_EXTENT: (f64, f64) = (1.0, 3.0);

const BLACK: [u8; 3] = [0, 0, 0];
const WHITE: [u8; 3] = [255, 255, 255];

/// The texture, defects, and depth images of one asphalt sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsphaltImages {
    pub texture: RgbBuffer,
    pub defects: RgbBuffer,
    pub depth: RgbBuffer,
}

impl AsphaltImages {
    /// White texture and depth, black defects.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            texture: RgbBuffer::new(width, height, WHITE),
            defects: RgbBuffer::new(width, height, BLACK),
            depth: RgbBuffer::new(width, height, WHITE),
        }
    }

    pub fn width(&self) -> u32 {
        self.texture.width
    }

    pub fn height(&self) -> u32 {
        self.texture.height
    }
}

/// `count` integers spread evenly from `min` to `max`, both inclusive.
pub fn int_ramp(min: i32, max: i32, count: usize) -> Vec<i32> {
    if count < 2 {
        return vec![min; count];
    }
    let step = (max - min) as f64 / (count - 1) as f64;
    (0..count)
        .map(|v| (v as f64 * step).round() as i32 + min)
        .collect()
}

/// 40 dark greys ramped over 0..=98 followed by 4 light greys over 105..=190.
pub fn color_list() -> Vec<[u8; 3]> {
    int_ramp(0, 98, 40)
        .into_iter()
        .chain(int_ramp(105, 190, 4))
        .map(|v| {
            let v = v.clamp(0, 255) as u8;
            [v, v, v]
        })
        .collect()
}

/// Noise palette of an asphalt type: 1 is light, 2 is dark, anything else
/// is black and white.
pub fn palette(asphalt_type: u8) -> Vec<[u8; 3]> {
    let colors = color_list();
    match asphalt_type {
        1 => colors[30..].to_vec(),
        2 => colors[3..45.min(colors.len())].to_vec(),
        _ => vec![BLACK, WHITE],
    }
}

/// Generates an asphalt sample.
#[instrument(skip(params, rng), fields(width = params.resolution[0], height = params.resolution[1], cracks = params.defects))]
pub fn generate_asphalt(
    params: &AsphaltParams,
    rng: &mut DeterministicRng,
) -> Result<AsphaltImages, GenerateError> {
    let [width, height] = params.resolution;
    if width == 0 || height == 0 {
        return Err(GenerateError::InvalidParameter(format!(
            "resolution must be non-zero, got {}x{}",
            width, height
        )));
    }
    if params.crack_width == 0 {
        return Err(GenerateError::InvalidParameter(
            "crack_width must be at least 1".to_string(),
        ));
    }
    if !(0.0..=MAX_CRACK_LENGTH).contains(&params.crack_length) {
        return Err(GenerateError::InvalidParameter(format!(
            "crack_length must be in [0, {}], got {}",
            MAX_CRACK_LENGTH, params.crack_length
        )));
    }

    let mut images = AsphaltImages::new(width, height);
    fill_noise(&mut images.texture, &palette(params.asphalt_type), rng);
    debug!(asphalt_type = params.asphalt_type, "filled palette noise");

    draw_inlays(&mut images.texture, rng);
    debug!(inlays = INLAY_COUNT, "stamped inlays");

    generate_cracks(
        &mut images,
        params.crack_length,
        params.crack_width,
        params.defects,
        rng,
    )?;
    debug!(cracks = params.defects, "drew cracks");

    Ok(images)
}

/// Sets every pixel to a random palette color, column by column.
fn fill_noise(texture: &mut RgbBuffer, colors: &[[u8; 3]], rng: &mut DeterministicRng) {
    for x in 0..texture.width {
        for y in 0..texture.height {
            if let Some(&color) = rng.choose(colors) {
                texture.set(x, y, color);
            }
        }
    }
}

/// Stamps [`INLAY_COUNT`] small quads, each colored from a randomly darkened
/// four-band ramp with per-channel jitter.
fn draw_inlays(texture: &mut RgbBuffer, rng: &mut DeterministicRng) {
    let margin = INLAY_EXTENT.1 as i64;
    let (width, height) = (texture.width as i64, texture.height as i64);
    for _ in 0..INLAY_COUNT {
        let (x_max, y_max) = ((width - margin).max(margin), (height - margin).max(margin));
        let center = Point2::new(
            rng.gen_range(margin..=x_max) as f64,
            rng.gen_range(margin..=y_max) as f64,
        );
        let darkening = rng.gen_range(0..=80);
        let colors: Vec<[u8; 3]> = int_ramp(169 - darkening, 220 - darkening, 4)
            .into_iter()
            .map(|v| {
                let r = v + rng.gen_range(-10..=10);
                let g = v + rng.gen_range(-15..=10);
                let b = v + rng.gen_range(-20..=10);
                [r, g, b].map(|c| c.clamp(0, 255) as u8)
            })
            .collect();
        stamp_inlay(texture, center, INLAY_EXTENT, &colors, rng);
    }
}
