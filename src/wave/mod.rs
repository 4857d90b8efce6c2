//! Plane-wave model for a longitudinal sound wave.

mod cache;
mod model;
mod transform;
mod waveform;

// Re-export public types
pub use cache::{WaveParameters, AIR_DENSITY_KG_PER_M3, REFERENCE_PRESSURE_PA};
pub use model::WaveModel;
pub use transform::{displacement, CoordinateScale, PhaseSnapshot, Trace};
pub use waveform::{square, triangle, Waveform, WaveformKind, SINE, SQUARE, TRIANGLE};
