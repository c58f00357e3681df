use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::source::types::SourceImage;

pub trait SourceReader {
    fn read_source(&self, data: &[u8]) -> Result<SourceImage>;
}
