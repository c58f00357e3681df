use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use dice_map_rs::image_pipeline::{
    AutoReader, DiceMapPipeline, DirectorySink, JpegWriter, LumaWeights, OutputFormat,
    PipelineConfig, PresetSelector, PromptSelector, RasterWriter, StandardTiffWriter,
    TiffCompression,
};
use dice_map_rs::logger;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Jpeg,
    Tiff,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Jpeg => OutputFormat::Jpeg,
            FormatArg::Tiff => OutputFormat::Tiff,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CompressionArg {
    None,
    Lzw,
    DeflateFast,
    DeflateBalanced,
    DeflateBest,
}

impl From<CompressionArg> for TiffCompression {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::None => TiffCompression::None,
            CompressionArg::Lzw => TiffCompression::Lzw,
            CompressionArg::DeflateFast => TiffCompression::DeflateFast,
            CompressionArg::DeflateBalanced => TiffCompression::DeflateBalanced,
            CompressionArg::DeflateBest => TiffCompression::DeflateBest,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LumaArg {
    Rec601,
    Rec709,
}

/// Turn a photograph of dice into a two-colour map.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Dice photograph (JPEG, PNG, TIFF or camera RAW). Asked for when omitted.
    input: Option<PathBuf>,

    /// Threshold to use instead of choosing from threshold samples
    #[arg(long)]
    threshold: Option<u8>,

    /// Dilation count to use instead of choosing from smoothing samples
    #[arg(long)]
    smooth: Option<u32>,

    /// Where the finished map is written (default: result.<ext>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory that receives threshold_samples/ and smooth_samples/
    #[arg(long, default_value = ".")]
    samples_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = FormatArg::Jpeg)]
    format: FormatArg,

    /// JPEG quality, 1-100
    #[arg(long, default_value_t = 100)]
    quality: u8,

    #[arg(long, value_enum, default_value_t = CompressionArg::Lzw)]
    tiff_compression: CompressionArg,

    /// Erosions applied after thresholding
    #[arg(long, default_value_t = 1)]
    erode_passes: u32,

    #[arg(long, value_enum, default_value_t = LumaArg::Rec601)]
    luma: LumaArg,

    /// Print per-stage timings when done
    #[arg(long)]
    timings: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn writer(&self) -> Box<dyn RasterWriter> {
        match OutputFormat::from(self.format) {
            OutputFormat::Jpeg => Box::new(JpegWriter::new(self.quality)),
            OutputFormat::Tiff => Box::new(StandardTiffWriter::new(self.tiff_compression.into())),
        }
    }

    fn config(&self) -> PipelineConfig {
        let luma = match self.luma {
            LumaArg::Rec601 => LumaWeights::REC601,
            LumaArg::Rec709 => LumaWeights::REC709,
        };
        PipelineConfig::builder()
            .erode_passes(self.erode_passes)
            .luma(luma)
            .build()
    }
}

fn run<R: BufRead, W: Write>(args: Args, mut prompt: PromptSelector<R, W>) -> Result<()> {
    let input = match &args.input {
        Some(path) => path.clone(),
        None => prompt.ask_input_path().context("Failed to read the input path")?,
    };

    let pipeline = DiceMapPipeline::with_custom(AutoReader::default(), args.writer(), args.config());
    let output = args.output.clone().unwrap_or_else(|| {
        PathBuf::from(format!("result.{}", pipeline.writer().extension()))
    });

    info!("Dice map pipeline initialized");
    info!("Erode passes: {}", pipeline.config().erode_passes);
    info!("Samples directory: {}", args.samples_dir.display());

    let mut sink = DirectorySink::new(&args.samples_dir, args.writer());
    let mut selector = PresetSelector {
        threshold: args.threshold,
        smoothing: args.smooth,
        inner: prompt,
    };

    let report = pipeline
        .convert_file(&input, &output, &mut sink, &mut selector)
        .with_context(|| format!("Failed to turn {} into a map", input.display()))?;

    info!(
        "Map written to {} (threshold {}, smoothing {})",
        output.display(),
        report.selection.threshold,
        report.selection.smoothing
    );
    if args.timings {
        report.timings.log_summary();
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.verbose);

    info!("Starting dice_map...");

    let stdin = io::stdin();
    let prompt = PromptSelector::new(stdin.lock(), io::stdout(), args.samples_dir.clone());
    run(args, prompt)
}
