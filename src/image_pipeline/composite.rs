use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raster::{Mask, RgbaRaster};

/// The two opaque colours a finished map is painted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub foreground: [u8; 4],
    pub background: [u8; 4],
}

impl Palette {
    /// Olive land on slate-blue water.
    pub const MAP: Palette = Palette {
        foreground: [128, 128, 0, 255],
        background: [51, 51, 128, 255],
    };
}

impl Default for Palette {
    fn default() -> Self {
        Self::MAP
    }
}

pub fn recolor(mask: &Mask, palette: &Palette) -> Result<RgbaRaster> {
    let fg = mask.sentinels().foreground();
    let data = mask
        .as_raster()
        .data()
        .iter()
        .flat_map(|&v| {
            if v == fg {
                palette.foreground
            } else {
                palette.background
            }
        })
        .collect();
    RgbaRaster::from_vec(mask.width(), mask.height(), data)
}
