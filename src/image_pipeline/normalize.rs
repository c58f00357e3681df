//! Grayscale conversion and inversion.
//!
//! Dice are bright against a darker table, but the photograph is inverted before
//! thresholding so the convention downstream is "subject ends up high". Callers pick
//! the threshold by eye from the sweep, so only consistency matters here.

use crate::image_pipeline::common::error::{MapError, Result};
use crate::image_pipeline::raster::GrayRaster;
use crate::image_pipeline::source::SourceImage;

/// RGB luminance coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LumaWeights {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl LumaWeights {
    /// ITU-R BT.601, the classic NTSC weighting.
    pub const REC601: LumaWeights = LumaWeights {
        r: 0.299,
        g: 0.587,
        b: 0.114,
    };

    /// ITU-R BT.709 (sRGB primaries).
    pub const REC709: LumaWeights = LumaWeights {
        r: 0.2126,
        g: 0.7152,
        b: 0.0722,
    };

    fn apply(&self, r: u8, g: u8, b: u8) -> u8 {
        let y = self.r * r as f32 + self.g * g as f32 + self.b * b as f32;
        y.round().clamp(0.0, 255.0) as u8
    }
}

impl Default for LumaWeights {
    fn default() -> Self {
        Self::REC601
    }
}

/// Single-channel intensity of every source pixel. Alpha is ignored.
pub fn grayscale(src: &SourceImage, weights: LumaWeights) -> Result<GrayRaster> {
    let data = match src.channels {
        1 => src.data.clone(),
        2 => src.data.chunks_exact(2).map(|px| px[0]).collect(),
        3 | 4 => src
            .data
            .chunks_exact(src.channels)
            .map(|px| weights.apply(px[0], px[1], px[2]))
            .collect(),
        n => {
            return Err(MapError::UnsupportedFormat(format!(
                "{} channels per pixel",
                n
            )));
        }
    };
    GrayRaster::from_vec(src.width, src.height, data)
}

/// `255 - v` for every pixel.
pub fn invert(src: &GrayRaster) -> GrayRaster {
    src.map(|v| 255 - v)
}

/// Grayscale followed by inversion: the first stage of the pipeline.
pub fn normalize(src: &SourceImage, weights: LumaWeights) -> Result<GrayRaster> {
    Ok(invert(&grayscale(src, weights)?))
}
