//! Wave model configuration with physical units and validated ranges.

use serde::{Deserialize, Serialize};

use super::units::LengthUnit;
use crate::error::ConfigError;
use crate::wave::WaveformKind;

/// Valid ranges for user-editable controls.
pub mod limits {
    use crate::field::MARGIN_FRACTION;

    /// Inclusive numeric range with a suggested control step
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct ControlRange {
        pub min: f64,
        pub max: f64,
        pub step: f64,
    }

    impl ControlRange {
        pub const fn new(min: f64, max: f64, step: f64) -> Self {
            Self { min, max, step }
        }

        pub fn contains(&self, value: f64) -> bool {
            value.is_finite() && value >= self.min && value <= self.max
        }

        pub fn clamp(&self, value: f64) -> f64 {
            value.clamp(self.min, self.max)
        }
    }

    /// Frequency (Hz): the audible band. Also keeps wavelength finite.
    pub const FREQUENCY_HZ: ControlRange = ControlRange::new(20.0, 20_000.0, 1.0);

    /// Speed of sound (m/s)
    pub const SPEED_OF_SOUND_M_PER_S: ControlRange = ControlRange::new(100.0, 1000.0, 1.0);

    /// Particle count
    pub const PARTICLE_COUNT: ControlRange = ControlRange::new(0.0, 15_000.0, 100.0);

    /// Simulated seconds per wall-clock second
    pub const TIME_SCALE: ControlRange = ControlRange::new(1e-5, 0.1, 1e-5);

    /// Particle dot half-size (pixels)
    pub const PARTICLE_SIZE_PX: ControlRange = ControlRange::new(0.5, 10.0, 0.5);

    /// Simulated width (meters)
    pub const SIM_WIDTH_M: ControlRange = ControlRange::new(1e-9, 1000.0, 0.0);

    /// Preset simulated widths (meters) offered by the width control
    pub const SIM_WIDTH_OPTIONS_M: [f64; 9] =
        [0.000_001, 0.000_01, 0.0001, 0.001, 0.01, 0.1, 1.0, 10.0, 200.0];

    /// Largest amplitude as a fraction of simulated width.
    ///
    /// The cone sits `MARGIN_FRACTION` of the particle area in from the left and
    /// leads particles by two amplitudes, so an amplitude beyond half the margin
    /// would push particles past the cone.
    pub const MAX_AMPLITUDE_FRACTION: f64 = MARGIN_FRACTION / 2.0;

    /// Amplitude range (meters) for a given simulated width (meters)
    pub fn amplitude_m(sim_width_m: f64) -> ControlRange {
        let max = sim_width_m * MAX_AMPLITUDE_FRACTION;
        ControlRange::new(0.0, max, max / 100.0)
    }
}

/// User-tunable wave model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Source frequency (Hz)
    pub frequency_hz: f64,

    /// Propagation speed (m/s)
    pub speed_of_sound_m_per_s: f64,

    /// Peak particle displacement, in `amplitude_unit`
    pub amplitude: f64,
    pub amplitude_unit: LengthUnit,

    /// Spatial extent shown across the viewport, in `width_unit`
    pub sim_width: f64,
    pub width_unit: LengthUnit,

    /// Simulated seconds per wall-clock second (dimensionless)
    pub time_scale: f64,

    pub particle_count: usize,

    /// Particle dot half-size (pixels)
    pub particle_size_px: f64,

    pub waveform: WaveformKind,

    pub paused: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 261.63, // Middle C
            speed_of_sound_m_per_s: 343.0, // Air at 20 °C
            amplitude: 0.1,
            amplitude_unit: LengthUnit::Meters,
            sim_width: 10.0,
            width_unit: LengthUnit::Meters,
            time_scale: 0.002,
            particle_count: 2000,
            particle_size_px: 1.5,
            waveform: WaveformKind::Sine,
            paused: false,
        }
    }
}

impl ModelConfig {
    pub fn amplitude_m(&self) -> f64 {
        self.amplitude_unit.to_meters(self.amplitude)
    }

    pub fn sim_width_m(&self) -> f64 {
        self.width_unit.to_meters(self.sim_width)
    }

    /// Check every field against its control range
    pub fn validate(&self) -> Result<(), ConfigError> {
        check("frequency_hz", self.frequency_hz, &limits::FREQUENCY_HZ)?;
        check(
            "speed_of_sound_m_per_s",
            self.speed_of_sound_m_per_s,
            &limits::SPEED_OF_SOUND_M_PER_S,
        )?;
        check("time_scale", self.time_scale, &limits::TIME_SCALE)?;
        check("particle_count", self.particle_count as f64, &limits::PARTICLE_COUNT)?;
        check("particle_size_px", self.particle_size_px, &limits::PARTICLE_SIZE_PX)?;
        check("sim_width_m", self.sim_width_m(), &limits::SIM_WIDTH_M)?;
        check(
            "amplitude_m",
            self.amplitude_m(),
            &limits::amplitude_m(self.sim_width_m()),
        )?;
        Ok(())
    }

    /// Overwrite only the fields present in `partial`
    pub fn merge(&mut self, partial: &PartialConfig) {
        let PartialConfig {
            frequency_hz,
            speed_of_sound_m_per_s,
            amplitude,
            amplitude_unit,
            sim_width,
            width_unit,
            time_scale,
            particle_count,
            particle_size_px,
            waveform,
            paused,
        } = partial;

        if let Some(v) = frequency_hz {
            self.frequency_hz = *v;
        }
        if let Some(v) = speed_of_sound_m_per_s {
            self.speed_of_sound_m_per_s = *v;
        }
        if let Some(v) = amplitude {
            self.amplitude = *v;
        }
        if let Some(v) = amplitude_unit {
            self.amplitude_unit = *v;
        }
        if let Some(v) = sim_width {
            self.sim_width = *v;
        }
        if let Some(v) = width_unit {
            self.width_unit = *v;
        }
        if let Some(v) = time_scale {
            self.time_scale = *v;
        }
        if let Some(v) = particle_count {
            self.particle_count = *v;
        }
        if let Some(v) = particle_size_px {
            self.particle_size_px = *v;
        }
        if let Some(v) = waveform {
            self.waveform = *v;
        }
        if let Some(v) = paused {
            self.paused = *v;
        }
    }
}

fn check(field: &'static str, value: f64, range: &limits::ControlRange) -> Result<(), ConfigError> {
    if range.contains(value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min: range.min,
            max: range.max,
        })
    }
}

/// Subset of [`ModelConfig`] fields; absent fields leave the target unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_hz: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_of_sound_m_per_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amplitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amplitude_unit: Option<LengthUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sim_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width_unit: Option<LengthUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub particle_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub particle_size_px: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waveform: Option<WaveformKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
}

impl PartialConfig {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&ModelConfig> for PartialConfig {
    fn from(config: &ModelConfig) -> Self {
        Self {
            frequency_hz: Some(config.frequency_hz),
            speed_of_sound_m_per_s: Some(config.speed_of_sound_m_per_s),
            amplitude: Some(config.amplitude),
            amplitude_unit: Some(config.amplitude_unit),
            sim_width: Some(config.sim_width),
            width_unit: Some(config.width_unit),
            time_scale: Some(config.time_scale),
            particle_count: Some(config.particle_count),
            particle_size_px: Some(config.particle_size_px),
            waveform: Some(config.waveform),
            paused: Some(config.paused),
        }
    }
}
