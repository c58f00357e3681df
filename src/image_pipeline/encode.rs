//! Output encoding module
//!
//! Writers for sample masks and the final recoloured map.

mod writer;
mod jpeg_writer;
mod standard_tiff_writer;
pub mod types;

pub use writer::RasterWriter;
pub use jpeg_writer::JpegWriter;
pub use standard_tiff_writer::StandardTiffWriter;
pub use types::{OutputFormat, TiffCompression};
