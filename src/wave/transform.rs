//! Displacement transform: rest position + time → signed screen-space offset.
//!
//! One function serves particle motion and both curves; the curves differ
//! only by the phase offset carried in [`Trace`].

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use super::cache::WaveParameters;
use super::waveform::Waveform;

/// What a displacement sample is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trace {
    /// Particle motion along x
    Particle,
    /// Displacement-vs-position curve
    Displacement,
    /// Pressure-vs-position curve (a quarter cycle from displacement)
    Pressure,
}

impl Trace {
    pub fn phase_offset(self) -> f64 {
        match self {
            Trace::Particle => 0.0,
            Trace::Displacement => PI,
            Trace::Pressure => PI + FRAC_PI_2,
        }
    }
}

/// Conversion between rendering coordinates and meters
#[derive(Debug, Clone, Copy)]
pub struct CoordinateScale {
    pub meters_per_screen_unit: f64,
    pub screen_units_per_meter: f64,
}

impl From<&WaveParameters> for CoordinateScale {
    fn from(params: &WaveParameters) -> Self {
        Self {
            meters_per_screen_unit: params.meters_per_screen_unit,
            screen_units_per_meter: params.screen_units_per_meter,
        }
    }
}

/// Signed displacement (rendering coordinates) of the particle resting at `origin_x`.
///
/// `θ = ω·t − k·x + φ`, reduced mod 2π before the waveform is evaluated so
/// long sessions keep their precision.
#[allow(clippy::too_many_arguments)]
pub fn displacement(
    origin_x: f64,
    elapsed_s: f64,
    phase_offset: f64,
    amplitude_m: f64,
    wavenumber: f64,
    angular_frequency: f64,
    waveform: &Waveform,
    scale: CoordinateScale,
) -> f64 {
    let x_m = origin_x * scale.meters_per_screen_unit;
    let temporal = (angular_frequency * elapsed_s).rem_euclid(TAU);
    let theta = (temporal - wavenumber * x_m + phase_offset).rem_euclid(TAU);
    let displacement_m = amplitude_m * (waveform.evaluate)(theta);
    displacement_m * scale.screen_units_per_meter
}

/// Frame-constant part of the transform.
///
/// Hoists `ω·t`, the meter conversion and the amplitude scaling out of the
/// per-particle loop. Matches [`displacement`] to rounding error.
#[derive(Debug, Clone, Copy)]
pub struct PhaseSnapshot {
    temporal_phase: f64,
    wavenumber_screen: f64,
    amplitude_m: f64,
    screen_units_per_meter: f64,
    evaluate: fn(f64) -> f64,
}

impl PhaseSnapshot {
    pub fn new(params: &WaveParameters, elapsed_s: f64) -> Self {
        Self {
            temporal_phase: (params.angular_frequency * elapsed_s).rem_euclid(TAU),
            wavenumber_screen: params.wavenumber * params.meters_per_screen_unit,
            amplitude_m: params.amplitude_m,
            screen_units_per_meter: params.screen_units_per_meter,
            evaluate: params.waveform.evaluate,
        }
    }

    /// Displacement (rendering coordinates) at `origin_x` for `trace`
    #[inline]
    pub fn sample(&self, origin_x: f64, trace: Trace) -> f64 {
        let theta = (self.temporal_phase - self.wavenumber_screen * origin_x
            + trace.phase_offset())
        .rem_euclid(TAU);
        self.amplitude_m * (self.evaluate)(theta) * self.screen_units_per_meter
    }
}
