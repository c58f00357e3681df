use image::DynamicImage;
use tracing::debug;

use crate::image_pipeline::common::error::{MapError, Result};
use crate::image_pipeline::source::reader::SourceReader;
use crate::image_pipeline::source::types::SourceImage;

/// Reader for the formats the `image` crate understands (JPEG, PNG, BMP, TIFF, ...).
///
/// 8-bit gray, gray + alpha and RGBA layouts are kept as decoded; everything else is
/// converted to 8-bit RGB.
#[derive(Default)]
pub struct StandardImageReader;

impl SourceReader for StandardImageReader {
    fn read_source(&self, data: &[u8]) -> Result<SourceImage> {
        debug!("Decoding image, {} bytes", data.len());

        let decoded =
            image::load_from_memory(data).map_err(|e| MapError::DecodeError(e.to_string()))?;
        let width = decoded.width() as usize;
        let height = decoded.height() as usize;

        let (channels, pixels) = match decoded {
            DynamicImage::ImageLuma8(img) => (1, img.into_raw()),
            DynamicImage::ImageLumaA8(img) => (2, img.into_raw()),
            DynamicImage::ImageRgba8(img) => (4, img.into_raw()),
            other => (3, other.to_rgb8().into_raw()),
        };

        debug!("Decoded image: {}x{}, {} channels", width, height, channels);
        SourceImage::new(width, height, channels, pixels)
    }
}
