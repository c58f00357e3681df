use std::io::Write;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raster::{GrayRaster, RgbaRaster};

pub trait RasterWriter {
    /// File extension, without the dot, for files this writer produces.
    fn extension(&self) -> &'static str;
    fn write_gray(&self, image: &GrayRaster, output: &mut dyn Write) -> Result<()>;
    fn write_rgba(&self, image: &RgbaRaster, output: &mut dyn Write) -> Result<()>;
}

impl<T: RasterWriter + ?Sized> RasterWriter for Box<T> {
    fn extension(&self) -> &'static str {
        (**self).extension()
    }

    fn write_gray(&self, image: &GrayRaster, output: &mut dyn Write) -> Result<()> {
        (**self).write_gray(image, output)
    }

    fn write_rgba(&self, image: &RgbaRaster, output: &mut dyn Write) -> Result<()> {
        (**self).write_rgba(image, output)
    }
}
