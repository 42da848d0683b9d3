//! Deterministic PNG writer.
//!
//! Uses fixed compression and filter settings so identical buffers encode to
//! byte-identical files, which keeps the reported hashes stable across runs.

use std::io::Write;

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use thiserror::Error;

use crate::raster::RgbBuffer;

/// Errors from PNG operations.
#[derive(Debug, Error)]
pub enum PngError {
    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),
}

/// PNG export configuration for deterministic output.
#[derive(Debug, Clone)]
pub struct PngConfig {
    /// Compression level. Use a fixed value for determinism.
    pub compression: Compression,
    /// Filter type. Use a fixed value for determinism.
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            filter: FilterType::NoFilter,
        }
    }
}

/// Write an RGB buffer as an 8-bit-per-channel PNG.
pub fn write_rgb_to_writer<W: Write>(
    buffer: &RgbBuffer,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    write_raw(&buffer.to_rgb8(), buffer, BitDepth::Eight, writer, config)
}

/// Write an RGB buffer as a 16-bit-per-channel PNG.
///
/// Each 8-bit channel value `v` is stored as `v * 257`, so 255 maps to 65535.
pub fn write_rgb16_to_writer<W: Write>(
    buffer: &RgbBuffer,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    write_raw(&buffer.to_rgb16(), buffer, BitDepth::Sixteen, writer, config)
}

fn write_raw<W: Write>(
    data: &[u8],
    buffer: &RgbBuffer,
    depth: BitDepth,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    if buffer.width == 0 || buffer.height == 0 {
        return Err(PngError::InvalidDimensions(format!(
            "{}x{} image has no pixels",
            buffer.width, buffer.height
        )));
    }
    let bytes_per_sample = match depth {
        BitDepth::Sixteen => 2,
        _ => 1,
    };
    let expected = buffer.width as usize * buffer.height as usize * 3 * bytes_per_sample;
    if data.len() != expected {
        return Err(PngError::InvalidDimensions(format!(
            "Expected {} bytes for {}x{} RGB, got {}",
            expected,
            buffer.width,
            buffer.height,
            data.len()
        )));
    }

    let mut encoder = Encoder::new(writer, buffer.width, buffer.height);
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(depth);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(data)?;

    Ok(())
}

/// Compute the BLAKE3 hash of PNG data.
pub fn hash_png(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Encode 8-bit RGB into a Vec<u8> and return it with its hash.
pub fn write_rgb_to_vec_with_hash(
    buffer: &RgbBuffer,
    config: &PngConfig,
) -> Result<(Vec<u8>, String), PngError> {
    let mut data = Vec::new();
    write_rgb_to_writer(buffer, &mut data, config)?;
    let hash = hash_png(&data);
    Ok((data, hash))
}

/// Encode 16-bit RGB into a Vec<u8> and return it with its hash.
pub fn write_rgb16_to_vec_with_hash(
    buffer: &RgbBuffer,
    config: &PngConfig,
) -> Result<(Vec<u8>, String), PngError> {
    let mut data = Vec::new();
    write_rgb16_to_writer(buffer, &mut data, config)?;
    let hash = hash_png(&data);
    Ok((data, hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> RgbBuffer {
        let mut buffer = RgbBuffer::new(width, height, [0, 0, 0]);
        for y in 0..height {
            for x in 0..width {
                buffer.set(x, y, [(x * 4) as u8, (y * 4) as u8, 128]);
            }
        }
        buffer
    }

    #[test]
    fn test_rgb_deterministic() {
        let buffer = gradient(64, 64);
        let config = PngConfig::default();

        let (data1, hash1) = write_rgb_to_vec_with_hash(&buffer, &config).unwrap();
        let (data2, hash2) = write_rgb_to_vec_with_hash(&buffer, &config).unwrap();

        assert_eq!(data1, data2, "PNG data should be identical");
        assert_eq!(hash1, hash2, "PNG hashes should be identical");
    }

    #[test]
    fn test_rgb16_decodes_to_scaled_values() {
        let mut buffer = RgbBuffer::new(2, 1, [255, 255, 255]);
        buffer.set(1, 0, [1, 2, 3]);
        let (data, _) = write_rgb16_to_vec_with_hash(&buffer, &PngConfig::default()).unwrap();

        let decoder = png::Decoder::new(std::io::Cursor::new(data));
        let mut reader = decoder.read_info().unwrap();
        let mut out = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut out).unwrap();
        assert_eq!(info.bit_depth, BitDepth::Sixteen);
        assert_eq!(info.color_type, ColorType::Rgb);
        let samples: Vec<u16> = out[..info.buffer_size()]
            .chunks_exact(2)
            .map(|b| u16::from_be_bytes([b[0], b[1]]))
            .collect();
        assert_eq!(samples, vec![65535, 65535, 65535, 257, 514, 771]);
    }

    #[test]
    fn test_empty_image_rejected() {
        let buffer = RgbBuffer::new(0, 4, [0, 0, 0]);
        let err = write_rgb_to_vec_with_hash(&buffer, &PngConfig::default()).unwrap_err();
        assert!(matches!(err, PngError::InvalidDimensions(_)));
    }

    #[test]
    fn test_hash_is_hex() {
        let hash = hash_png(b"groundgen");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
