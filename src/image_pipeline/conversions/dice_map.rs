use std::io::Write;
use std::path::Path;

use tracing::{info, instrument};

use crate::image_pipeline::{
    binarize::binarize,
    common::error::{MapError, Result},
    common::timing::{PipelineTimings, Timer},
    composite::recolor,
    config::PipelineConfig,
    encode::{JpegWriter, RasterWriter},
    morphology::{MorphOp, dilate_n},
    normalize::normalize,
    raster::{GrayRaster, Mask},
    sampling::{SamplePhase, SampleSink, sweep_smoothing, sweep_thresholds},
    selection::ParameterSelector,
    source::{AutoReader, SourceReader},
};

/// Parameters a run ended up using.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapSelection {
    pub threshold: u8,
    pub smoothing: u32,
}

/// Outcome of a complete run.
#[derive(Debug)]
pub struct MapReport {
    pub width: usize,
    pub height: usize,
    pub selection: MapSelection,
    pub foreground_pixels: usize,
    pub timings: PipelineTimings,
}

/// Photograph in, two-colour dice map out.
///
/// Stages: normalize, threshold sweep, binarize, erode, smoothing sweep, dilate,
/// recolor. Each stage consumes the previous stage's raster and allocates its own.
pub struct DiceMapPipeline<R: SourceReader, W: RasterWriter> {
    reader: R,
    writer: W,
    config: PipelineConfig,
}

impl DiceMapPipeline<AutoReader, JpegWriter> {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            reader: AutoReader::default(),
            writer: JpegWriter::default(),
            config,
        }
    }
}

impl<R: SourceReader, W: RasterWriter> DiceMapPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: PipelineConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(MapError::InvalidDimensions(width, height));
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                return Err(MapError::InvalidDimensions(width, height));
            }
        }

        Ok(())
    }

    /// Decodes `input_data` and returns the inverted grayscale image.
    #[instrument(skip(self, input_data), fields(input_size = input_data.len()))]
    pub fn load(&self, input_data: &[u8]) -> Result<GrayRaster> {
        let source = {
            let _span = tracing::info_span!("decode_source").entered();
            self.reader.read_source(input_data)?
        };

        self.validate_dimensions(source.width, source.height)?;

        let _span = tracing::info_span!("normalize", width = source.width, height = source.height)
            .entered();
        normalize(&source, self.config.luma)
    }

    /// Emits one candidate mask per configured threshold.
    #[instrument(name = "threshold_sweep", skip_all)]
    pub fn sample_thresholds(&self, gray: &GrayRaster, sink: &mut dyn SampleSink) -> Result<()> {
        sweep_thresholds(
            gray,
            &self.config.threshold_sweep,
            self.config.sentinels,
            sink,
        )
    }

    /// Thresholds at `threshold` and removes speckle noise.
    #[instrument(skip(self, gray))]
    pub fn isolate(&self, gray: &GrayRaster, threshold: u8) -> Mask {
        let mask = binarize(gray, threshold, self.config.sentinels);
        MorphOp::Erode.apply_n(&mask, self.config.erode_passes)
    }

    /// Emits the isolated mask after each configured number of dilations.
    #[instrument(name = "smoothing_sweep", skip_all)]
    pub fn sample_smoothing(&self, mask: &Mask, sink: &mut dyn SampleSink) -> Result<()> {
        sweep_smoothing(mask, &self.config.smoothing_sweep, sink)
    }

    /// Dilates the isolated mask exactly `passes` times.
    #[instrument(skip(self, mask))]
    pub fn smooth(&self, mask: &Mask, passes: u32) -> Mask {
        dilate_n(mask, passes)
    }

    /// Paints the mask with the configured palette and encodes it.
    #[instrument(skip_all)]
    pub fn render(&self, mask: &Mask, output: &mut dyn Write) -> Result<()> {
        let map = recolor(mask, &self.config.palette)?;
        self.writer.write_rgba(&map, output)
    }

    /// Runs every stage, asking `selector` for the two parameters.
    #[instrument(skip_all, fields(input_size = input_data.len()))]
    pub fn convert(
        &self,
        input_data: &[u8],
        output: &mut dyn Write,
        sink: &mut dyn SampleSink,
        selector: &mut dyn ParameterSelector,
    ) -> Result<MapReport> {
        let mut timings = PipelineTimings::new();
        info!("Starting dice map conversion");

        let timer = Timer::start("load");
        let gray = self.load(input_data)?;
        timings.record(timer);

        if selector.wants_samples(SamplePhase::Threshold) {
            let timer = Timer::start("threshold_sweep");
            self.sample_thresholds(&gray, sink)?;
            timings.record(timer);
        }
        let threshold = selector.select_threshold()?;
        info!(threshold, "Threshold selected");

        let timer = Timer::start("isolate");
        let isolated = self.isolate(&gray, threshold);
        timings.record(timer);
        drop(gray);

        if selector.wants_samples(SamplePhase::Smoothing) {
            let timer = Timer::start("smoothing_sweep");
            self.sample_smoothing(&isolated, sink)?;
            timings.record(timer);
        }
        let smoothing = selector.select_smoothing()?;
        info!(smoothing, "Smoothing selected");

        let timer = Timer::start("smooth");
        let smoothed = self.smooth(&isolated, smoothing);
        timings.record(timer);

        let timer = Timer::start("render");
        self.render(&smoothed, output)?;
        timings.record(timer);

        let report = MapReport {
            width: smoothed.width(),
            height: smoothed.height(),
            selection: MapSelection {
                threshold,
                smoothing,
            },
            foreground_pixels: smoothed.foreground_count(),
            timings,
        };
        info!(
            width = report.width,
            height = report.height,
            foreground = report.foreground_pixels,
            "Conversion complete in {:.3}ms",
            report.timings.total_duration().as_secs_f64() * 1000.0
        );
        Ok(report)
    }

    /// File-to-file [`convert`](Self::convert). The output file is only created once
    /// the whole map has been encoded.
    #[instrument(skip_all)]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
        sink: &mut dyn SampleSink,
        selector: &mut dyn ParameterSelector,
    ) -> Result<MapReport> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                MapError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        let mut encoded = Vec::new();
        let report = self.convert(&input_data, &mut encoded, sink, selector)?;

        {
            let _span = tracing::info_span!("write_output_file").entered();
            std::fs::write(output_path, &encoded).map_err(|e| {
                MapError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?;
        }

        Ok(report)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: PipelineConfig) {
        self.config = config;
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}
