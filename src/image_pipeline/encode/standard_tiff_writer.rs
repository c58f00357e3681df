use std::io::{Cursor, Write};

use tiff::encoder::colortype::{ColorType, Gray8, RGBA8};
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder};
use tiff::tags::Predictor;
use tracing::debug;

use crate::image_pipeline::common::error::{MapError, Result};
use crate::image_pipeline::encode::types::TiffCompression;
use crate::image_pipeline::encode::writer::RasterWriter;
use crate::image_pipeline::raster::{GrayRaster, RgbaRaster};

/// Lossless TIFF encoder built on the `tiff` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTiffWriter {
    pub compression: TiffCompression,
    /// Horizontal differencing before compression
    pub predictor: bool,
}

impl StandardTiffWriter {
    pub fn new(compression: TiffCompression) -> Self {
        Self {
            compression,
            predictor: false,
        }
    }

    fn encode<C: ColorType<Inner = u8>>(
        &self,
        pixels: &[u8],
        width: usize,
        height: usize,
        output: &mut dyn Write,
    ) -> Result<()> {
        debug!("Encoding TIFF image: {}x{}", width, height);

        let compression = match self.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        };

        let mut buffer = Vec::new();
        let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
            .map_err(|e| MapError::EncodeError(e.to_string()))?
            .with_compression(compression);
        if self.predictor {
            encoder = encoder.with_predictor(Predictor::Horizontal);
        }
        encoder
            .write_image::<C>(width as u32, height as u32, pixels)
            .map_err(|e| MapError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;
        debug!("TIFF encoding complete");
        Ok(())
    }
}

impl RasterWriter for StandardTiffWriter {
    fn extension(&self) -> &'static str {
        "tiff"
    }

    fn write_gray(&self, image: &GrayRaster, output: &mut dyn Write) -> Result<()> {
        self.encode::<Gray8>(image.data(), image.width(), image.height(), output)
    }

    fn write_rgba(&self, image: &RgbaRaster, output: &mut dyn Write) -> Result<()> {
        self.encode::<RGBA8>(image.data(), image.width(), image.height(), output)
    }
}
