//! Error types for configuration, presets and rendering.

use thiserror::Error;

/// Rejected configuration input.
///
/// Raised at the configuration boundary; the wave model itself never sees
/// an invalid value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Length unit label outside the supported set.
    #[error("Unknown length unit: {0:?}")]
    UnknownUnit(String),

    /// Waveform key outside the registry.
    #[error("Unknown waveform: {0:?}")]
    UnknownWaveform(String),

    /// Numeric value outside its valid range.
    #[error("{field} = {value} is outside the valid range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Preset name not present in the preset book.
    #[error("Unknown preset: {0:?}")]
    UnknownPreset(String),
}

/// Failure loading or saving a preset file.
#[derive(Debug, Error)]
pub enum PresetError {
    #[error("Preset file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preset file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failure setting up or driving the GPU renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("Failed to find suitable GPU adapter")]
    NoAdapter,

    #[error("Failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("Surface lost or outdated: {0}")]
    Frame(#[from] wgpu::SurfaceError),

    #[error("Frame readback failed: {0}")]
    Readback(#[from] wgpu::BufferAsyncError),

    #[error("Failed to write frame: {0}")]
    Capture(#[from] image::ImageError),

    #[error("Frame capture I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
