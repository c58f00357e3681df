//! Source image reading module
//!
//! Decodes input photographs into a [`SourceImage`]. Ordinary formats go through the
//! `image` crate; camera RAW files are decoded with rawloader and demosaiced on the CPU.

mod reader;
mod standard_reader;
mod rawloader_reader;
mod cpu_debayer;
mod auto_reader;
pub mod types;

pub use reader::SourceReader;
pub use standard_reader::StandardImageReader;
pub use rawloader_reader::RawLoaderReader;
pub use auto_reader::AutoReader;
pub use types::SourceImage;
