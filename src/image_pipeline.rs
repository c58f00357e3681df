//! Dice photo to map pipeline
//!
//! Decoding lives in `source`, the per-pixel stages in `normalize`, `binarize`,
//! `morphology` and `composite`, encoding in `encode`, and orchestration of the
//! whole run in `conversions`.

pub mod binarize;
pub mod common;
pub mod composite;
pub mod config;
pub mod conversions;
pub mod encode;
pub mod morphology;
pub mod normalize;
pub mod raster;
pub mod sampling;
pub mod selection;
pub mod source;

pub use common::{MapError, PipelineTimings, Result};

pub use raster::{GrayRaster, Mask, RgbaRaster, Sentinels};

pub use source::{AutoReader, RawLoaderReader, SourceImage, SourceReader, StandardImageReader};

pub use encode::{JpegWriter, OutputFormat, RasterWriter, StandardTiffWriter, TiffCompression};

pub use sampling::{DirectorySink, NullSink, SamplePhase, SampleSet, SampleSink};

pub use selection::{FixedSelector, ParameterSelector, PresetSelector, PromptSelector};

pub use config::{PipelineConfig, PipelineConfigBuilder};

pub use normalize::LumaWeights;

pub use composite::Palette;

pub use conversions::{DiceMapPipeline, MapReport, MapSelection};
