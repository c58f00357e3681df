//! Pipeline configuration types

use crate::image_pipeline::composite::Palette;
use crate::image_pipeline::normalize::LumaWeights;
use crate::image_pipeline::raster::Sentinels;
use crate::image_pipeline::sampling::{SmoothingSweep, ThresholdSweep};

/// Noise-removal erosions applied right after thresholding. One pass clears
/// single-pixel specks without eating visibly into the dice.
pub const DEFAULT_ERODE_PASSES: u32 = 1;

/// Configuration for turning a dice photograph into a map
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Values written for foreground and background in every mask
    pub sentinels: Sentinels,
    /// Grayscale conversion coefficients
    pub luma: LumaWeights,
    /// Thresholds offered for manual selection
    pub threshold_sweep: ThresholdSweep,
    /// Erosions between thresholding and smoothing
    pub erode_passes: u32,
    /// Smoothing counts offered for manual selection
    pub smoothing_sweep: SmoothingSweep,
    /// Colours of the finished map
    pub palette: Palette,
    /// Whether to validate image dimensions after decoding
    pub validate_dimensions: bool,
    /// Largest width or height accepted when validating
    pub max_dimension: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sentinels: Sentinels::default(),
            luma: LumaWeights::default(),
            threshold_sweep: ThresholdSweep::default(),
            erode_passes: DEFAULT_ERODE_PASSES,
            smoothing_sweep: SmoothingSweep::default(),
            palette: Palette::default(),
            validate_dimensions: true,
            max_dimension: None,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }
}

/// Builder for PipelineConfig
#[derive(Default)]
pub struct PipelineConfigBuilder {
    sentinels: Option<Sentinels>,
    luma: Option<LumaWeights>,
    threshold_sweep: Option<ThresholdSweep>,
    erode_passes: Option<u32>,
    smoothing_sweep: Option<SmoothingSweep>,
    palette: Option<Palette>,
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
}

impl PipelineConfigBuilder {
    pub fn sentinels(mut self, sentinels: Sentinels) -> Self {
        self.sentinels = Some(sentinels);
        self
    }

    pub fn luma(mut self, luma: LumaWeights) -> Self {
        self.luma = Some(luma);
        self
    }

    pub fn threshold_sweep(mut self, sweep: ThresholdSweep) -> Self {
        self.threshold_sweep = Some(sweep);
        self
    }

    pub fn erode_passes(mut self, passes: u32) -> Self {
        self.erode_passes = Some(passes);
        self
    }

    pub fn smoothing_sweep(mut self, sweep: SmoothingSweep) -> Self {
        self.smoothing_sweep = Some(sweep);
        self
    }

    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn build(self) -> PipelineConfig {
        let default = PipelineConfig::default();
        PipelineConfig {
            sentinels: self.sentinels.unwrap_or(default.sentinels),
            luma: self.luma.unwrap_or(default.luma),
            threshold_sweep: self.threshold_sweep.unwrap_or(default.threshold_sweep),
            erode_passes: self.erode_passes.unwrap_or(default.erode_passes),
            smoothing_sweep: self.smoothing_sweep.unwrap_or(default.smoothing_sweep),
            palette: self.palette.unwrap_or(default.palette),
            validate_dimensions: self
                .validate_dimensions
                .unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
        }
    }
}
