//! Fixed-rate tick source
//!
//! Turns irregular host frame times into whole simulation ticks so the
//! logical step rate never depends on the display refresh rate.

/// Fixed timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedStep {
    step_ms: u32,
    max_substeps: u32,
    accumulator_ms: f64,
}

impl FixedStep {
    pub fn new(step_ms: u32, max_substeps: u32) -> Self {
        Self {
            step_ms: step_ms.max(1),
            max_substeps: max_substeps.max(1),
            accumulator_ms: 0.0,
        }
    }

    pub fn step_ms(&self) -> u32 {
        self.step_ms
    }

    /// Feed elapsed wall-clock time and return how many ticks to run now
    ///
    /// Backlog beyond `max_substeps` ticks is dropped rather than replayed.
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        if elapsed_ms > 0.0 {
            self.accumulator_ms += elapsed_ms;
        }
        let step = self.step_ms as f64;
        let mut ticks = 0;
        while self.accumulator_ms >= step && ticks < self.max_substeps {
            self.accumulator_ms -= step;
            ticks += 1;
        }
        if self.accumulator_ms >= step {
            log::debug!("Dropping {:.0}ms of simulation backlog", self.accumulator_ms - step);
            self.accumulator_ms %= step;
        }
        ticks
    }
}
