//! Simulated time.

use std::time::Duration;

/// Frame interval when no display refresh drives the loop (headless runs)
pub const FIXED_FRAME_INTERVAL: Duration = Duration::from_millis(50);

/// Animation loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
}

impl RunState {
    pub fn from_paused(paused: bool) -> Self {
        if paused {
            RunState::Paused
        } else {
            RunState::Running
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
        }
    }
}

/// Monotonic simulated time, advanced by wall-clock deltas × time scale
#[derive(Debug, Clone, Default)]
pub struct SimulationClock {
    elapsed_s: f64,
    last_timestamp_s: Option<f64>,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated seconds since start
    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    /// Advance to the frame at `timestamp_s` (host clock, seconds).
    ///
    /// The timestamp is recorded even while paused, so resuming does not
    /// replay the paused interval. The first frame and any backwards step
    /// count as a zero delta. Returns the wall-clock delta used.
    pub fn advance(&mut self, timestamp_s: f64, time_scale: f64, state: RunState) -> f64 {
        let dt = match self.last_timestamp_s {
            Some(last) => (timestamp_s - last).max(0.0),
            None => 0.0,
        };
        self.last_timestamp_s = Some(timestamp_s);

        if state == RunState::Running {
            self.elapsed_s += dt * time_scale;
        }
        dt
    }
}
