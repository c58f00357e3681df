use image::ImageFormat;
use tracing::debug;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::source::rawloader_reader::RawLoaderReader;
use crate::image_pipeline::source::reader::SourceReader;
use crate::image_pipeline::source::standard_reader::StandardImageReader;
use crate::image_pipeline::source::types::SourceImage;

/// Picks a decoder from the file signature.
///
/// Most camera RAW containers are TIFF-based, so TIFF-looking and unrecognised data is
/// tried as RAW first and only then handed to the `image` crate.
#[derive(Default)]
pub struct AutoReader {
    standard: StandardImageReader,
    raw: RawLoaderReader,
}

impl SourceReader for AutoReader {
    fn read_source(&self, data: &[u8]) -> Result<SourceImage> {
        match image::guess_format(data) {
            Ok(format) if format != ImageFormat::Tiff => {
                debug!("Detected {:?} input", format);
                self.standard.read_source(data)
            }
            _ => match self.raw.read_source(data) {
                Ok(image) => Ok(image),
                Err(raw_err) => {
                    debug!("RAW decode failed ({}), trying standard decoders", raw_err);
                    self.standard.read_source(data)
                }
            },
        }
    }
}
