//! Derived wave parameters.
//!
//! Everything here is a pure function of a [`ModelConfig`] and the viewport
//! width. Nothing outside [`WaveParameters::recompute`] builds or edits one.

use std::f64::consts::TAU;

use super::waveform::Waveform;
use crate::params::ModelConfig;

/// Air density (kg/m³) at 20 °C, sea level
pub const AIR_DENSITY_KG_PER_M3: f64 = 1.204;

/// SPL reference pressure: 20 µPa
pub const REFERENCE_PRESSURE_PA: f64 = 20e-6;

/// Parameters derived from the current model configuration
#[derive(Debug, Clone, Copy)]
pub struct WaveParameters {
    pub amplitude_m: f64,
    pub sim_width_m: f64,

    /// ω = 2π·f (rad/s)
    pub angular_frequency: f64,

    /// λ = c / f (m)
    pub wavelength_m: f64,

    /// k = 2π / λ (rad/m)
    pub wavenumber: f64,

    /// T = 1 / f (s)
    pub period_s: f64,

    /// Scale from rendering coordinates to meters
    pub meters_per_screen_unit: f64,

    /// Scale from meters to rendering coordinates
    pub screen_units_per_meter: f64,

    /// Z₀ = ρ·c (Pa·s/m)
    pub acoustic_impedance: f64,

    /// Peak pressure deviation (Pa)
    pub peak_pressure_pa: f64,

    /// Waveform looked up once per recompute
    pub waveform: &'static Waveform,
}

impl WaveParameters {
    /// Derive all wave parameters.
    ///
    /// `config` must already be validated (frequency and speed of sound > 0).
    pub fn recompute(config: &ModelConfig, viewport_width: f64) -> Self {
        let amplitude_m = config.amplitude_m();
        let sim_width_m = config.sim_width_m();

        let period_s = 1.0 / config.frequency_hz;
        let wavelength_m = config.speed_of_sound_m_per_s / config.frequency_hz;
        let wavenumber = TAU / wavelength_m;
        let angular_frequency = TAU * config.frequency_hz;

        let acoustic_impedance = AIR_DENSITY_KG_PER_M3 * config.speed_of_sound_m_per_s;
        let peak_pressure_pa = amplitude_m * angular_frequency * acoustic_impedance;

        Self {
            amplitude_m,
            sim_width_m,
            angular_frequency,
            wavelength_m,
            wavenumber,
            period_s,
            meters_per_screen_unit: sim_width_m / viewport_width,
            screen_units_per_meter: viewport_width / sim_width_m,
            acoustic_impedance,
            peak_pressure_pa,
            waveform: config.waveform.waveform(),
        }
    }

    /// Amplitude in rendering coordinates
    pub fn amplitude_screen(&self) -> f64 {
        self.amplitude_m * self.screen_units_per_meter
    }

    /// Wavelength in rendering coordinates
    pub fn wavelength_screen(&self) -> f64 {
        self.wavelength_m * self.screen_units_per_meter
    }

    /// RMS pressure for the active waveform (Pa)
    pub fn rms_pressure_pa(&self) -> f64 {
        self.peak_pressure_pa * self.waveform.rms_factor
    }

    /// Sound pressure level (dB re 20 µPa). -∞ for zero amplitude.
    pub fn sound_pressure_level_db(&self) -> f64 {
        20.0 * (self.rms_pressure_pa() / REFERENCE_PRESSURE_PA).log10()
    }
}
