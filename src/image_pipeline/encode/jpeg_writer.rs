use std::io::Write;

use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;
use tracing::debug;

use crate::image_pipeline::common::error::{MapError, Result};
use crate::image_pipeline::encode::writer::RasterWriter;
use crate::image_pipeline::raster::{GrayRaster, RgbaRaster};

/// Highest JPEG quality, the default for both samples and the final map.
pub const DEFAULT_JPEG_QUALITY: u8 = 100;

/// JPEG encoder. Alpha is dropped since JPEG cannot store it.
#[derive(Debug, Clone, Copy)]
pub struct JpegWriter {
    quality: u8,
}

impl JpegWriter {
    /// `quality` is clamped to 1..=100.
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    fn encode(
        &self,
        pixels: &[u8],
        width: usize,
        height: usize,
        color: ExtendedColorType,
        output: &mut dyn Write,
    ) -> Result<()> {
        debug!("Encoding JPEG image: {}x{} q={}", width, height, self.quality);

        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, self.quality)
            .encode(pixels, width as u32, height as u32, color)
            .map_err(|e| MapError::EncodeError(e.to_string()))?;
        output.write_all(&buffer)?;
        Ok(())
    }
}

impl Default for JpegWriter {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl RasterWriter for JpegWriter {
    fn extension(&self) -> &'static str {
        "jpg"
    }

    fn write_gray(&self, image: &GrayRaster, output: &mut dyn Write) -> Result<()> {
        self.encode(
            image.data(),
            image.width(),
            image.height(),
            ExtendedColorType::L8,
            output,
        )
    }

    fn write_rgba(&self, image: &RgbaRaster, output: &mut dyn Write) -> Result<()> {
        self.encode(
            &image.to_rgb(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
            output,
        )
    }
}
