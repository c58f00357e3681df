//! Candidate masks for picking the threshold and the smoothing amount by eye.
//!
//! Sweeps produce `(parameter, Mask)` pairs and push them into a [`SampleSink`]. The
//! sweep policy is plain data so it can be tested without any morphology.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::image_pipeline::binarize::binarize;
use crate::image_pipeline::common::error::{MapError, Result};
use crate::image_pipeline::encode::RasterWriter;
use crate::image_pipeline::morphology::dilate;
use crate::image_pipeline::raster::{GrayRaster, Mask, Sentinels};

/// Lowest threshold offered. Below it typical table textures flood the mask.
pub const DEFAULT_THRESHOLD_START: u8 = 100;
/// Highest threshold offered. Above it even white dice start to break apart.
pub const DEFAULT_THRESHOLD_END: u8 = 200;
/// Gap between offered thresholds; finer steps look identical side by side.
pub const DEFAULT_THRESHOLD_STEP: u8 = 10;
/// Dilations between smoothing samples.
pub const DEFAULT_SMOOTHING_INTERVAL: u32 = 5;
/// Most dilations sampled; larger counts can still be typed in by hand.
pub const DEFAULT_SMOOTHING_MAX: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplePhase {
    Threshold,
    Smoothing,
}

impl SamplePhase {
    pub fn dir_name(&self) -> &'static str {
        match self {
            SamplePhase::Threshold => "threshold_samples",
            SamplePhase::Smoothing => "smooth_samples",
        }
    }
}

/// Inclusive range of thresholds, `start, start + step, ..., <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdSweep {
    pub start: u8,
    pub end: u8,
    pub step: u8,
}

impl ThresholdSweep {
    pub fn thresholds(&self) -> impl Iterator<Item = u8> + use<> {
        let step = self.step.max(1) as usize;
        (self.start..=self.end).step_by(step)
    }
}

impl Default for ThresholdSweep {
    fn default() -> Self {
        Self {
            start: DEFAULT_THRESHOLD_START,
            end: DEFAULT_THRESHOLD_END,
            step: DEFAULT_THRESHOLD_STEP,
        }
    }
}

/// Dilation counts `0, interval, 2 * interval, ..., <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmoothingSweep {
    pub interval: u32,
    pub max: u32,
}

impl SmoothingSweep {
    pub fn checkpoints(&self) -> impl Iterator<Item = u32> + use<> {
        let interval = self.interval.max(1) as usize;
        (0..=self.max).step_by(interval)
    }
}

impl Default for SmoothingSweep {
    fn default() -> Self {
        Self {
            interval: DEFAULT_SMOOTHING_INTERVAL,
            max: DEFAULT_SMOOTHING_MAX,
        }
    }
}

pub trait SampleSink {
    fn accept(&mut self, phase: SamplePhase, parameter: u32, mask: &Mask) -> Result<()>;
}

/// Keeps every sample in memory, in arrival order.
#[derive(Debug, Default)]
pub struct SampleSet {
    samples: Vec<(SamplePhase, u32, Mask)>,
}

impl SampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `(parameter, mask)` pairs of one phase.
    pub fn phase(&self, phase: SamplePhase) -> Vec<(u32, &Mask)> {
        self.samples
            .iter()
            .filter(|(p, _, _)| *p == phase)
            .map(|(_, param, mask)| (*param, mask))
            .collect()
    }

    pub fn get(&self, phase: SamplePhase, parameter: u32) -> Option<&Mask> {
        self.samples
            .iter()
            .find(|(p, param, _)| *p == phase && *param == parameter)
            .map(|(_, _, mask)| mask)
    }
}

impl SampleSink for SampleSet {
    fn accept(&mut self, phase: SamplePhase, parameter: u32, mask: &Mask) -> Result<()> {
        self.samples.push((phase, parameter, mask.clone()));
        Ok(())
    }
}

/// Discards samples.
#[derive(Debug, Default)]
pub struct NullSink;

impl SampleSink for NullSink {
    fn accept(&mut self, _phase: SamplePhase, _parameter: u32, _mask: &Mask) -> Result<()> {
        Ok(())
    }
}

/// Writes `<root>/<phase dir>/<parameter>.<ext>` for every sample.
pub struct DirectorySink<W: RasterWriter> {
    root: PathBuf,
    writer: W,
}

impl<W: RasterWriter> DirectorySink<W> {
    pub fn new(root: impl Into<PathBuf>, writer: W) -> Self {
        Self {
            root: root.into(),
            writer,
        }
    }

    pub fn phase_dir(&self, phase: SamplePhase) -> PathBuf {
        self.root.join(phase.dir_name())
    }

    pub fn sample_path(&self, phase: SamplePhase, parameter: u32) -> PathBuf {
        self.phase_dir(phase)
            .join(format!("{}.{}", parameter, self.writer.extension()))
    }

    fn ensure_dir(dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .map_err(|e| MapError::OutputWriteError(format!("{}: {}", dir.display(), e)))
    }
}

impl<W: RasterWriter> SampleSink for DirectorySink<W> {
    fn accept(&mut self, phase: SamplePhase, parameter: u32, mask: &Mask) -> Result<()> {
        Self::ensure_dir(&self.phase_dir(phase))?;
        let path = self.sample_path(phase, parameter);
        debug!(path = %path.display(), "Writing sample");

        let mut buffer = Vec::new();
        self.writer.write_gray(mask.as_raster(), &mut buffer)?;
        fs::write(&path, &buffer)
            .map_err(|e| MapError::OutputWriteError(format!("{}: {}", path.display(), e)))
    }
}

/// Binarizes `gray` at every threshold of `sweep`.
pub fn sweep_thresholds(
    gray: &GrayRaster,
    sweep: &ThresholdSweep,
    sentinels: Sentinels,
    sink: &mut dyn SampleSink,
) -> Result<()> {
    for t in sweep.thresholds() {
        let mask = binarize(gray, t, sentinels);
        sink.accept(SamplePhase::Threshold, t as u32, &mask)?;
    }
    Ok(())
}

/// Dilates `mask` step by step, emitting the mask after each checkpoint's number of
/// dilations. Checkpoint 0 is `mask` itself.
pub fn sweep_smoothing(
    mask: &Mask,
    sweep: &SmoothingSweep,
    sink: &mut dyn SampleSink,
) -> Result<()> {
    let mut current = mask.clone();
    let mut applied = 0;
    for checkpoint in sweep.checkpoints() {
        while applied < checkpoint {
            current = dilate(&current);
            applied += 1;
        }
        sink.accept(SamplePhase::Smoothing, checkpoint, &current)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::morphology::dilate_n;

    #[test]
    fn default_threshold_sweep() {
        let thresholds: Vec<u8> = ThresholdSweep::default().thresholds().collect();
        assert_eq!(
            thresholds,
            vec![100, 110, 120, 130, 140, 150, 160, 170, 180, 190, 200]
        );
    }

    #[test]
    fn threshold_sweep_stops_at_end() {
        let sweep = ThresholdSweep {
            start: 250,
            end: 255,
            step: 3,
        };
        assert_eq!(sweep.thresholds().collect::<Vec<_>>(), vec![250, 253]);

        let zero_step = ThresholdSweep {
            start: 0,
            end: 2,
            step: 0,
        };
        assert_eq!(zero_step.thresholds().count(), 3);
    }

    #[test]
    fn default_smoothing_checkpoints() {
        let points: Vec<u32> = SmoothingSweep::default().checkpoints().collect();
        assert_eq!(points, vec![0, 5, 10, 15, 20, 25, 30]);
    }

    #[test]
    fn threshold_samples_match_direct_binarization() {
        let gray = GrayRaster::from_vec(16, 16, (0..=255).collect()).unwrap();
        let mut set = SampleSet::new();
        sweep_thresholds(&gray, &ThresholdSweep::default(), Sentinels::BINARY, &mut set).unwrap();

        assert_eq!(set.len(), 11);
        let sample = set.get(SamplePhase::Threshold, 170).unwrap();
        assert_eq!(sample, &binarize(&gray, 170, Sentinels::BINARY));
        assert_eq!(sample.foreground_count(), 85);
    }

    #[test]
    fn smoothing_sample_label_is_dilation_count() {
        let mut seed = Mask::filled(21, 21, false, Sentinels::BINARY).unwrap();
        let mut raster = seed.as_raster().clone();
        raster.data_mut()[10 * 21 + 10] = 255;
        seed = Mask::from_raster(raster, Sentinels::BINARY).unwrap();

        let sweep = SmoothingSweep { interval: 2, max: 6 };
        let mut set = SampleSet::new();
        sweep_smoothing(&seed, &sweep, &mut set).unwrap();

        let phase = set.phase(SamplePhase::Smoothing);
        assert_eq!(
            phase.iter().map(|(p, _)| *p).collect::<Vec<_>>(),
            vec![0, 2, 4, 6]
        );
        for (count, mask) in phase {
            assert_eq!(mask, &dilate_n(&seed, count));
        }
        assert_eq!(set.get(SamplePhase::Smoothing, 4).unwrap().foreground_count(), 81);
    }

    #[test]
    fn null_sink_accepts_everything() {
        let mask = Mask::filled(2, 2, true, Sentinels::BINARY).unwrap();
        assert!(NullSink.accept(SamplePhase::Threshold, 1, &mask).is_ok());
    }
}
