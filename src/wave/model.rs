//! Wave model: configuration plus its derived parameters, kept in lockstep.

use log::{debug, info};

use super::cache::WaveParameters;
use super::waveform::WaveformKind;
use crate::error::ConfigError;
use crate::params::{LengthUnit, ModelConfig, PartialConfig};

/// Owns the model configuration and the parameters derived from it.
///
/// Fields are private: every mutation goes through a setter that validates
/// the new configuration and recomputes [`WaveParameters`] before returning,
/// so the derived state can never be stale. A rejected change leaves the
/// model untouched.
#[derive(Debug, Clone)]
pub struct WaveModel {
    config: ModelConfig,
    params: WaveParameters,
    viewport_width: f64,
}

impl WaveModel {
    pub fn new(config: ModelConfig, viewport_width: f64) -> Result<Self, ConfigError> {
        config.validate()?;
        check_viewport(viewport_width)?;
        let params = WaveParameters::recompute(&config, viewport_width);
        let model = Self {
            config,
            params,
            viewport_width,
        };
        model.log_readout();
        Ok(model)
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn params(&self) -> &WaveParameters {
        &self.params
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    /// Copy of the current configuration (preset "save")
    pub fn snapshot(&self) -> ModelConfig {
        self.config.clone()
    }

    /// Merge `partial` into the configuration, all or nothing
    pub fn apply(&mut self, partial: &PartialConfig) -> Result<(), ConfigError> {
        let mut next = self.config.clone();
        next.merge(partial);
        self.commit(next)
    }

    pub fn set_frequency(&mut self, frequency_hz: f64) -> Result<(), ConfigError> {
        self.update(|c| c.frequency_hz = frequency_hz)
    }

    pub fn set_speed_of_sound(&mut self, speed_m_per_s: f64) -> Result<(), ConfigError> {
        self.update(|c| c.speed_of_sound_m_per_s = speed_m_per_s)
    }

    pub fn set_amplitude(&mut self, amplitude: f64, unit: LengthUnit) -> Result<(), ConfigError> {
        self.update(|c| {
            c.amplitude = amplitude;
            c.amplitude_unit = unit;
        })
    }

    pub fn set_sim_width(&mut self, width: f64, unit: LengthUnit) -> Result<(), ConfigError> {
        self.update(|c| {
            c.sim_width = width;
            c.width_unit = unit;
        })
    }

    pub fn set_time_scale(&mut self, time_scale: f64) -> Result<(), ConfigError> {
        self.update(|c| c.time_scale = time_scale)
    }

    pub fn set_particle_count(&mut self, count: usize) -> Result<(), ConfigError> {
        self.update(|c| c.particle_count = count)
    }

    pub fn set_waveform(&mut self, waveform: WaveformKind) -> Result<(), ConfigError> {
        self.update(|c| c.waveform = waveform)
    }

    pub fn set_paused(&mut self, paused: bool) {
        // Pausing touches no derived value
        self.config.paused = paused;
    }

    pub fn set_viewport_width(&mut self, viewport_width: f64) -> Result<(), ConfigError> {
        check_viewport(viewport_width)?;
        self.viewport_width = viewport_width;
        self.params = WaveParameters::recompute(&self.config, viewport_width);
        debug!("Viewport width: {}", viewport_width);
        Ok(())
    }

    fn update(&mut self, edit: impl FnOnce(&mut ModelConfig)) -> Result<(), ConfigError> {
        let mut next = self.config.clone();
        edit(&mut next);
        self.commit(next)
    }

    fn commit(&mut self, next: ModelConfig) -> Result<(), ConfigError> {
        next.validate()?;
        self.config = next;
        self.params = WaveParameters::recompute(&self.config, self.viewport_width);
        self.log_readout();
        Ok(())
    }

    fn log_readout(&self) {
        let p = &self.params;
        info!(
            "f={:.2} Hz, c={:.1} m/s, λ={:.4} m, A={} {}, Z₀={:.1} Pa·s/m, peak={:.1} Pa, SPL={:.1} dB ({})",
            self.config.frequency_hz,
            self.config.speed_of_sound_m_per_s,
            p.wavelength_m,
            self.config.amplitude,
            self.config.amplitude_unit,
            p.acoustic_impedance,
            p.peak_pressure_pa,
            p.sound_pressure_level_db(),
            p.waveform.name,
        );
    }
}

fn check_viewport(viewport_width: f64) -> Result<(), ConfigError> {
    if viewport_width.is_finite() && viewport_width > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field: "viewport_width",
            value: viewport_width,
            min: f64::MIN_POSITIVE,
            max: f64::MAX,
        })
    }
}
