//! RGB pixel buffers, polygon filling, and SVG rasterization.

use resvg::tiny_skia::{Pixmap, Transform};
use tracing::debug;

use crate::error::GenerateError;
use crate::svg::SvgDocument;

/// An integer pixel position. May lie outside the buffer.
pub type Pixel = (i64, i64);

/// An 8-bit RGB image, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel data.
    pub data: Vec<[u8; 3]>,
}

impl RgbBuffer {
    /// Create a new buffer filled with a color.
    pub fn new(width: u32, height: u32, fill: [u8; 3]) -> Self {
        Self {
            width,
            height,
            data: vec![fill; width as usize * height as usize],
        }
    }

    /// Converts premultiplied RGBA, as produced by tiny-skia, to RGB
    /// composited over black.
    pub fn from_premultiplied_rgba(width: u32, height: u32, rgba: &[u8]) -> Self {
        let data = rgba.chunks_exact(4).map(|px| [px[0], px[1], px[2]]).collect();
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get a pixel at the given coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        self.data[self.index(x, y)]
    }

    /// Set a pixel at the given coordinates.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: [u8; 3]) {
        let idx = self.index(x, y);
        self.data[idx] = color;
    }

    /// Blends `color` over the pixel with opacity `alpha` (0-255).
    #[inline]
    pub fn blend(&mut self, x: u32, y: u32, color: [u8; 3], alpha: u8) {
        let idx = self.index(x, y);
        let dst = self.data[idx];
        let a = alpha as u32;
        let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a) + 127) / 255) as u8;
        self.data[idx] = [
            mix(color[0], dst[0]),
            mix(color[1], dst[1]),
            mix(color[2], dst[2]),
        ];
    }

    /// Fills a polygon with an opaque color. Pixels outside the buffer are
    /// ignored.
    pub fn fill_polygon(&mut self, points: &[Pixel], color: [u8; 3]) {
        for (x, y) in self.polygon_pixels(points) {
            self.set(x, y, color);
        }
    }

    /// Blends a polygon with opacity `alpha` over the buffer.
    pub fn blend_polygon(&mut self, points: &[Pixel], color: [u8; 3], alpha: u8) {
        for (x, y) in self.polygon_pixels(points) {
            self.blend(x, y, color, alpha);
        }
    }

    /// Pixels covered by the polygon: on each row, every pixel between the
    /// leftmost and rightmost edge crossing, inclusive, clipped to the buffer.
    fn polygon_pixels(&self, points: &[Pixel]) -> Vec<(u32, u32)> {
        let mut pixels = Vec::new();
        let (Some(y_min), Some(y_max)) = (
            points.iter().map(|p| p.1).min(),
            points.iter().map(|p| p.1).max(),
        ) else {
            return pixels;
        };
        let (w, h) = (self.width as i64, self.height as i64);
        let n = points.len();
        for y in y_min.max(0)..=y_max.min(h - 1) {
            let mut lo = i64::MAX;
            let mut hi = i64::MIN;
            for i in 0..n {
                let (a, b) = (points[i], points[(i + 1) % n]);
                if y < a.1.min(b.1) || y > a.1.max(b.1) {
                    continue;
                }
                if a.1 == b.1 {
                    lo = lo.min(a.0.min(b.0));
                    hi = hi.max(a.0.max(b.0));
                } else {
                    let t = (y - a.1) as f64 / (b.1 - a.1) as f64;
                    let x = (a.0 as f64 + t * (b.0 - a.0) as f64).round() as i64;
                    lo = lo.min(x);
                    hi = hi.max(x);
                }
            }
            for x in lo.max(0)..=hi.min(w - 1) {
                pixels.push((x as u32, y as u32));
            }
        }
        pixels
    }

    /// Row-major RGB bytes.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.data.iter().flatten().copied().collect()
    }

    /// Row-major big-endian 16-bit RGB samples, each value scaled by 257.
    pub fn to_rgb16(&self) -> Vec<u8> {
        self.data
            .iter()
            .flatten()
            .flat_map(|&v| (v as u16 * 257).to_be_bytes())
            .collect()
    }
}

/// Rasterizes a document at its pixel size.
///
/// Relative image references resolve against the current directory.
pub fn rasterize_svg(document: &SvgDocument) -> Result<RgbBuffer, GenerateError> {
    let options = usvg::Options {
        resources_dir: std::env::current_dir().ok(),
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(&document.text, &options)?;

    let mut pixmap = Pixmap::new(document.width, document.height).ok_or_else(|| {
        GenerateError::Raster(format!(
            "failed to allocate a {}x{} pixmap",
            document.width, document.height
        ))
    })?;

    let sx = document.width as f32 / tree.size().width();
    let sy = document.height as f32 / tree.size().height();
    resvg::render(&tree, Transform::from_scale(sx, sy), &mut pixmap.as_mut());
    debug!(
        width = document.width,
        height = document.height,
        "rasterized svg document"
    );

    Ok(RgbBuffer::from_premultiplied_rgba(
        document.width,
        document.height,
        pixmap.data(),
    ))
}
