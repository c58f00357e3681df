use crate::image_pipeline::raster::{GrayRaster, Mask, Sentinels};

/// Thresholds `src` into a mask.
///
/// Strictly greater than `threshold` is foreground; a pixel equal to the threshold is
/// background.
pub fn binarize(src: &GrayRaster, threshold: u8, sentinels: Sentinels) -> Mask {
    let fg = sentinels.foreground();
    let bg = sentinels.background();
    let raster = src.map(|v| if v > threshold { fg } else { bg });
    Mask::from_raster_unchecked(raster, sentinels)
}
