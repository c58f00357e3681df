//! Choosing the threshold and the smoothing count.
//!
//! The pipeline asks a [`ParameterSelector`] for both numbers after the matching
//! samples have been emitted. The interactive selector reads them from a terminal;
//! preset values skip the question and the samples that would support it.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::image_pipeline::common::error::{MapError, Result};
use crate::image_pipeline::sampling::SamplePhase;

pub trait ParameterSelector {
    /// Whether samples for `phase` should be produced before asking.
    fn wants_samples(&self, _phase: SamplePhase) -> bool {
        true
    }

    fn select_threshold(&mut self) -> Result<u8>;

    fn select_smoothing(&mut self) -> Result<u32>;
}

pub fn parse_threshold(input: &str) -> Result<u8> {
    input.trim().parse::<u8>().map_err(|_| {
        MapError::InvalidSelection(format!(
            "'{}' is not a threshold between 0 and 255",
            input.trim()
        ))
    })
}

pub fn parse_smoothing(input: &str) -> Result<u32> {
    input.trim().parse::<u32>().map_err(|_| {
        MapError::InvalidSelection(format!(
            "'{}' is not a non-negative smoothing count",
            input.trim()
        ))
    })
}

/// Both values known up front; no samples are needed.
#[derive(Debug, Clone, Copy)]
pub struct FixedSelector {
    pub threshold: u8,
    pub smoothing: u32,
}

impl ParameterSelector for FixedSelector {
    fn wants_samples(&self, _phase: SamplePhase) -> bool {
        false
    }

    fn select_threshold(&mut self) -> Result<u8> {
        Ok(self.threshold)
    }

    fn select_smoothing(&mut self) -> Result<u32> {
        Ok(self.smoothing)
    }
}

/// Uses whichever values are preset and defers the rest to `inner`.
pub struct PresetSelector<S: ParameterSelector> {
    pub threshold: Option<u8>,
    pub smoothing: Option<u32>,
    pub inner: S,
}

impl<S: ParameterSelector> ParameterSelector for PresetSelector<S> {
    fn wants_samples(&self, phase: SamplePhase) -> bool {
        let preset = match phase {
            SamplePhase::Threshold => self.threshold.is_some(),
            SamplePhase::Smoothing => self.smoothing.is_some(),
        };
        !preset && self.inner.wants_samples(phase)
    }

    fn select_threshold(&mut self) -> Result<u8> {
        match self.threshold {
            Some(t) => Ok(t),
            None => self.inner.select_threshold(),
        }
    }

    fn select_smoothing(&mut self) -> Result<u32> {
        match self.smoothing {
            Some(n) => Ok(n),
            None => self.inner.select_smoothing(),
        }
    }
}

/// Line-oriented terminal dialogue.
pub struct PromptSelector<R: BufRead, W: Write> {
    input: R,
    output: W,
    samples_root: PathBuf,
}

impl<R: BufRead, W: Write> PromptSelector<R, W> {
    pub fn new(input: R, output: W, samples_root: impl Into<PathBuf>) -> Self {
        Self {
            input,
            output,
            samples_root: samples_root.into(),
        }
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        self.output.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            return Err(MapError::InvalidSelection(
                "input ended before an answer was given".to_string(),
            ));
        }
        Ok(line.trim().to_string())
    }

    fn samples_dir(&self, phase: SamplePhase) -> PathBuf {
        self.samples_root.join(phase.dir_name())
    }

    pub fn ask_input_path(&mut self) -> Result<PathBuf> {
        self.say("Please input the file path of the dice photo you want to turn into a map.")?;
        let answer = self.read_line()?;
        if answer.is_empty() {
            return Err(MapError::InvalidSelection("no input path given".to_string()));
        }
        Ok(Path::new(&answer).to_path_buf())
    }
}

impl<R: BufRead, W: Write> ParameterSelector for PromptSelector<R, W> {
    fn select_threshold(&mut self) -> Result<u8> {
        let dir = self.samples_dir(SamplePhase::Threshold);
        self.say(&format!(
            "Please review the images in \"{}\" and pick the best one.",
            dir.display()
        ))?;
        self.say(
            "Look for an image where the dice are almost completely white with little to no \
             noise around the edges.",
        )?;
        self.say("Type the number from the chosen file's name (e.g. 170 if 170.jpg looks best).")?;
        parse_threshold(&self.read_line()?)
    }

    fn select_smoothing(&mut self) -> Result<u32> {
        let dir = self.samples_dir(SamplePhase::Smoothing);
        self.say(&format!(
            "Please review the images in \"{}\" and pick the best one. This will be the final \
             shape of your map.",
            dir.display()
        ))?;
        self.say(
            "Type the number from the chosen file's name, or a larger number if none are \
             bloated enough.",
        )?;
        parse_smoothing(&self.read_line()?)
    }
}
