//! Control panel actions: discrete steps applied to a running simulation.

use log::info;

use crate::error::ConfigError;
use crate::params::{limits, LengthUnit, PartialConfig};
use crate::simulation::Simulation;
use crate::wave::WaveformKind;

/// Frequency ratio of one equal-tempered semitone
pub const SEMITONE: f64 = 1.059_463_094_359_295_3;

/// Particles added or removed per step
pub const PARTICLE_STEP: i64 = 500;

/// Amplitude change per step, as a fraction of the current maximum
pub const AMPLITUDE_STEP_FRACTION: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    TogglePause,
    /// Up or down by a number of semitones
    Frequency(i32),
    /// Up or down by steps of [`AMPLITUDE_STEP_FRACTION`]
    Amplitude(i32),
    Particles(i32),
    /// Up or down by steps of `limits::PARTICLE_SIZE_PX.step`
    ParticleSize(i32),
    /// Halve (negative) or double (positive)
    TimeScale(i32),
    Waveform(WaveformKind),
    /// Cycle through `limits::SIM_WIDTH_OPTIONS_M`
    NextWidth,
    /// Cycle the amplitude display unit, keeping the physical amplitude
    NextAmplitudeUnit,
}

impl Control {
    /// Apply to `sim`. Steps clamp to the control range, so only an
    /// inconsistent combination can be rejected.
    pub fn apply(self, sim: &mut Simulation) -> Result<(), ConfigError> {
        let config = sim.config().clone();

        match self {
            Control::TogglePause => {
                sim.toggle_pause();
                Ok(())
            }
            Control::Frequency(steps) => {
                let f = config.frequency_hz * SEMITONE.powi(steps);
                let f = limits::FREQUENCY_HZ.clamp(f);
                sim.configure(|m| m.set_frequency(f))?;
                info!("Frequency: {:.2} Hz", f);
                Ok(())
            }
            Control::Amplitude(steps) => {
                let range = limits::amplitude_m(config.sim_width_m());
                let step = range.max * AMPLITUDE_STEP_FRACTION;
                let meters = range.clamp(config.amplitude_m() + step * steps as f64);
                let unit = config.amplitude_unit;
                let value = amplitude_in_unit(meters, range.max, unit);
                sim.configure(|m| m.set_amplitude(value, unit))
            }
            Control::Particles(steps) => {
                let count = config.particle_count as i64 + PARTICLE_STEP * steps as i64;
                let count = limits::PARTICLE_COUNT.clamp(count as f64) as usize;
                sim.configure(|m| m.set_particle_count(count))?;
                info!("Particles: {}", count);
                Ok(())
            }
            Control::ParticleSize(steps) => {
                let range = limits::PARTICLE_SIZE_PX;
                let size = range.clamp(config.particle_size_px + range.step * steps as f64);
                sim.apply(&PartialConfig {
                    particle_size_px: Some(size),
                    ..Default::default()
                })?;
                info!("Particle size: {} px", size);
                Ok(())
            }
            Control::TimeScale(steps) => {
                let scale = limits::TIME_SCALE.clamp(config.time_scale * 2f64.powi(steps));
                sim.configure(|m| m.set_time_scale(scale))?;
                info!("Time scale: {}", scale);
                Ok(())
            }
            Control::Waveform(kind) => {
                sim.configure(|m| m.set_waveform(kind))?;
                info!("Waveform: {}", kind);
                Ok(())
            }
            Control::NextWidth => {
                let width_m = next_width_m(config.sim_width_m());
                let max = limits::amplitude_m(width_m).max;
                let amplitude = if config.amplitude_m() <= max {
                    config.amplitude
                } else {
                    amplitude_in_unit(max, max, config.amplitude_unit)
                };

                sim.apply(&PartialConfig {
                    sim_width: Some(width_m),
                    width_unit: Some(LengthUnit::Meters),
                    amplitude: Some(amplitude),
                    ..Default::default()
                })?;
                info!("Simulated width: {} m", width_m);
                Ok(())
            }
            Control::NextAmplitudeUnit => {
                let unit = config.amplitude_unit.next();
                let max = limits::amplitude_m(config.sim_width_m()).max;
                let value = amplitude_in_unit(config.amplitude_m(), max, unit);
                sim.configure(|m| m.set_amplitude(value, unit))?;
                info!("Amplitude: {} {}", value, unit);
                Ok(())
            }
        }
    }
}

/// `meters` expressed in `unit`, never converting back above `max_m`
fn amplitude_in_unit(meters: f64, max_m: f64, unit: LengthUnit) -> f64 {
    let value = unit.from_meters(meters.min(max_m));
    if unit.to_meters(value) > max_m {
        value * (1.0 - f64::EPSILON)
    } else {
        value
    }
}

/// Width option after the one closest to `current_m`, wrapping around
pub fn next_width_m(current_m: f64) -> f64 {
    let options = &limits::SIM_WIDTH_OPTIONS_M;
    let closest = options
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            let da = (a.ln() - current_m.ln()).abs();
            let db = (b.ln() - current_m.ln()).abs();
            da.total_cmp(&db)
        })
        .map(|(i, _)| i)
        .unwrap_or(0);
    options[(closest + 1) % options.len()]
}
