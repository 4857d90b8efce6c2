//! Parameter definitions with physical units and documented semantics.
//!
//! Every user-facing quantity carries its unit in the field name or in an
//! explicit [`LengthUnit`], and every control has a validated range.

mod presets;
mod render;
mod units;
mod wave;

// Re-export all types
pub use presets::{PresetBook, DEFAULT_PRESET};
pub use render::{Layout, RecordingConfig, RenderConfig};
pub use units::{unit_factor, LengthUnit};
pub use wave::{limits, ModelConfig, PartialConfig};
