//! Animation loop: simulated clock plus the per-frame particle and curve update.

mod clock;
mod system;

// Re-export public types
pub use clock::{RunState, SimulationClock, FIXED_FRAME_INTERVAL};
pub use system::{is_occluded, Frame, HighlightSample, ParticleSample, Simulation};
