//! Frame clock
//!
//! Turns display-refresh timestamps into a whole number of fixed simulation
//! ticks. Physics is tuned per tick, so the tick rate stays fixed no matter
//! how fast the display refreshes.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Largest frame delta fed into the accumulator (seconds)
const MAX_FRAME_DT: f32 = 0.1;

/// Fixed-timestep accumulator driven by `requestAnimationFrame` timestamps
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a frame timestamp (milliseconds) and get the ticks to run.
    ///
    /// The very first frame runs exactly one tick.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let dt = match self.last_time {
            Some(last) => (((now_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
            None => SIM_DT,
        };
        self.last_time = Some(now_ms);

        self.accumulator += dt;
        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        // Anything left past the substep cap is dropped rather than replayed later
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        steps
    }

    /// Forget accumulated time (after the page was hidden, for instance)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time = None;
    }
}
