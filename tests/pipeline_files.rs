//! End-to-end runs through real files in a scratch directory.

use std::path::{Path, PathBuf};

use dice_map_rs::image_pipeline::{
    DiceMapPipeline, DirectorySink, FixedSelector, JpegWriter, MapError, PipelineConfig,
    PresetSelector, PromptSelector, SamplePhase, StandardTiffWriter, TiffCompression,
};
use dice_map_rs::image_pipeline::source::AutoReader;
use image::{GrayImage, Luma};
use tempfile::TempDir;

const SIZE: u32 = 32;

/// Dark table with one bright 8x8 die in the middle.
fn write_dice_photo(dir: &Path) -> PathBuf {
    let photo = GrayImage::from_fn(SIZE, SIZE, |x, y| {
        if (12..20).contains(&x) && (12..20).contains(&y) {
            Luma([220])
        } else {
            Luma([30])
        }
    });
    let path = dir.join("dice.png");
    photo.save(&path).unwrap();
    path
}

#[test]
fn interactive_run_writes_samples_and_map() {
    let dir = TempDir::new().unwrap();
    let input = write_dice_photo(dir.path());
    let output = dir.path().join("result.jpg");

    let pipeline = DiceMapPipeline::new(PipelineConfig::default());
    let mut sink = DirectorySink::new(dir.path(), JpegWriter::default());
    let answers = std::io::Cursor::new(b"150\n5\n".to_vec());
    let mut selector = PromptSelector::new(answers, Vec::new(), dir.path());

    let report = pipeline
        .convert_file(&input, &output, &mut sink, &mut selector)
        .unwrap();
    assert_eq!(report.selection.threshold, 150);
    assert_eq!(report.selection.smoothing, 5);

    for t in (100..=200).step_by(10) {
        let path = dir.path().join("threshold_samples").join(format!("{}.jpg", t));
        assert!(path.exists(), "missing {}", path.display());
    }
    for n in (0..=30).step_by(5) {
        let path = sink.sample_path(SamplePhase::Smoothing, n);
        assert!(path.exists(), "missing {}", path.display());
    }

    let map = image::open(&output).unwrap();
    assert_eq!((map.width(), map.height()), (SIZE, SIZE));
}

#[test]
fn preset_run_is_lossless_in_tiff() {
    let dir = TempDir::new().unwrap();
    let input = write_dice_photo(dir.path());
    let output = dir.path().join("result.tiff");

    let pipeline = DiceMapPipeline::with_custom(
        AutoReader::default(),
        StandardTiffWriter::new(TiffCompression::Lzw),
        PipelineConfig::default(),
    );
    let mut sink = DirectorySink::new(dir.path(), StandardTiffWriter::default());
    let mut selector = FixedSelector {
        threshold: 150,
        smoothing: 0,
    };

    pipeline
        .convert_file(&input, &output, &mut sink, &mut selector)
        .unwrap();
    assert!(!dir.path().join("threshold_samples").exists());

    let palette = pipeline.config().palette;
    let map = image::open(&output).unwrap().to_rgba8();
    // Border is always background; the inverted table is foreground; the die is not.
    assert_eq!(map.get_pixel(0, 0).0, palette.background);
    assert_eq!(map.get_pixel(4, 4).0, palette.foreground);
    assert_eq!(map.get_pixel(15, 15).0, palette.background);
}

#[test]
fn preset_threshold_still_samples_smoothing() {
    let dir = TempDir::new().unwrap();
    let input = write_dice_photo(dir.path());
    let output = dir.path().join("result.jpg");

    let pipeline = DiceMapPipeline::new(PipelineConfig::default());
    let mut sink = DirectorySink::new(dir.path(), JpegWriter::default());
    let mut selector = PresetSelector {
        threshold: Some(120),
        smoothing: None,
        inner: PromptSelector::new(std::io::Cursor::new(b"2\n".to_vec()), Vec::new(), dir.path()),
    };

    let report = pipeline
        .convert_file(&input, &output, &mut sink, &mut selector)
        .unwrap();
    assert_eq!(report.selection.smoothing, 2);
    assert!(!dir.path().join("threshold_samples").exists());
    assert!(dir.path().join("smooth_samples").join("30.jpg").exists());
}

#[test]
fn missing_input_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("result.jpg");

    let pipeline = DiceMapPipeline::new(PipelineConfig::default());
    let mut sink = DirectorySink::new(dir.path(), JpegWriter::default());
    let mut selector = FixedSelector {
        threshold: 150,
        smoothing: 1,
    };

    let err = pipeline
        .convert_file(dir.path().join("nope.png"), &output, &mut sink, &mut selector)
        .unwrap_err();
    assert!(matches!(err, MapError::InputReadError(_)));
    assert!(!output.exists());
}

#[test]
fn unreadable_selection_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    let input = write_dice_photo(dir.path());
    let output = dir.path().join("result.jpg");

    let pipeline = DiceMapPipeline::new(PipelineConfig::default());
    let mut sink = DirectorySink::new(dir.path(), JpegWriter::default());
    let answers = std::io::Cursor::new(b"not a number\n".to_vec());
    let mut selector = PromptSelector::new(answers, Vec::new(), dir.path());

    let err = pipeline
        .convert_file(&input, &output, &mut sink, &mut selector)
        .unwrap_err();
    assert!(matches!(err, MapError::InvalidSelection(_)));
    assert!(dir.path().join("threshold_samples").join("100.jpg").exists());
    assert!(!output.exists());
}

#[test]
fn garbage_input_is_a_decode_error() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("notes.txt");
    std::fs::write(&input, b"these are not pixels").unwrap();

    let pipeline = DiceMapPipeline::new(PipelineConfig::default());
    let mut selector = FixedSelector {
        threshold: 150,
        smoothing: 1,
    };
    let err = pipeline
        .convert_file(&input, dir.path().join("out.jpg"), &mut dice_map_rs::image_pipeline::NullSink, &mut selector)
        .unwrap_err();
    assert!(matches!(err, MapError::DecodeError(_) | MapError::UnsupportedFormat(_)));
}
