//! Decoded source image types

use crate::image_pipeline::common::error::{MapError, Result};

/// Decoded input photograph with 8-bit interleaved channels.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Samples per pixel: 1 (gray), 2 (gray + alpha), 3 (RGB) or 4 (RGBA)
    pub channels: usize,
    /// Pixel data interleaved row-major
    pub data: Vec<u8>,
}

impl SourceImage {
    pub fn new(width: usize, height: usize, channels: usize, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MapError::InvalidDimensions(width, height));
        }
        if !(1..=4).contains(&channels) {
            return Err(MapError::UnsupportedFormat(format!(
                "{} channels per pixel",
                channels
            )));
        }
        let expected = width * height * channels;
        if data.len() != expected {
            return Err(MapError::DecodeError(format!(
                "expected {} samples for {}x{}x{}, got {}",
                expected,
                width,
                height,
                channels,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let start = (y * self.width + x) * self.channels;
        &self.data[start..start + self.channels]
    }
}
