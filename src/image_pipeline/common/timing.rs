use std::fmt::Write as _;
use std::time::{Duration, Instant};

use tracing::info;

/// Wall-clock duration of one named pipeline stage.
#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: &'static str,
    pub duration: Duration,
}

impl StepTiming {
    fn millis(&self) -> f64 {
        self.duration.as_secs_f64() * 1000.0
    }
}

/// Stages of one run, in the order they finished. A stage name may appear more
/// than once; lookups by name sum every occurrence.
#[derive(Debug, Default)]
pub struct PipelineTimings {
    steps: Vec<StepTiming>,
}

impl PipelineTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_step(&mut self, name: &'static str, duration: Duration) {
        self.steps.push(StepTiming { name, duration });
    }

    /// Stops `timer` and records it.
    pub fn record(&mut self, timer: Timer) {
        self.steps.push(timer.stop());
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    pub fn get_step(&self, name: &str) -> Option<Duration> {
        self.steps
            .iter()
            .filter(|s| s.name == name)
            .map(|s| s.duration)
            .reduce(|a, b| a + b)
    }

    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    /// One line per stage with its share of the run, then the total.
    pub fn summary(&self) -> String {
        let total = self.total_duration().as_secs_f64();
        let mut out = String::from("stage timings\n");
        for step in &self.steps {
            let share = match total {
                t if t > 0.0 => 100.0 * step.duration.as_secs_f64() / t,
                _ => 0.0,
            };
            let _ = writeln!(out, "  {:<18}{:>10.3} ms {:>6.1}%", step.name, step.millis(), share);
        }
        let _ = write!(out, "  {:<18}{:>10.3} ms", "total", total * 1000.0);
        out
    }

    pub fn log_summary(&self) {
        self.summary().lines().for_each(|line| info!("{}", line));
    }
}

/// Running stopwatch for a single stage.
pub struct Timer {
    name: &'static str,
    started: Instant,
}

impl Timer {
    pub fn start(name: &'static str) -> Self {
        Self {
            name,
            started: Instant::now(),
        }
    }

    pub fn stop(self) -> StepTiming {
        StepTiming {
            name: self.name,
            duration: self.started.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_steps_accumulate_by_name() {
        let mut timings = PipelineTimings::new();
        timings.add_step("dilate", Duration::from_millis(2));
        timings.add_step("erode", Duration::from_millis(1));
        timings.add_step("dilate", Duration::from_millis(3));

        assert_eq!(timings.steps().len(), 3);
        assert_eq!(timings.get_step("dilate"), Some(Duration::from_millis(5)));
        assert_eq!(timings.total_duration(), Duration::from_millis(6));
        assert_eq!(timings.get_step("recolor"), None);
    }

    #[test]
    fn summary_lists_every_step() {
        let mut timings = PipelineTimings::new();
        timings.add_step("normalize", Duration::from_millis(4));
        timings.record(Timer::start("binarize"));

        let summary = timings.summary();
        assert!(summary.contains("normalize"));
        assert!(summary.contains("binarize"));
        assert!(summary.lines().last().unwrap().trim_start().starts_with("total"));
    }
}
