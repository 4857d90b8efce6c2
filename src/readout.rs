//! Human-readable formulas and values for the current wave.

use crate::params::ModelConfig;
use crate::simulation::Simulation;
use crate::wave::{PhaseSnapshot, Trace, WaveParameters, AIR_DENSITY_KG_PER_M3};

/// One-line summary for the window title
pub fn title(sim: &Simulation) -> String {
    let config = sim.config();
    let p = sim.params();
    format!(
        "Soundwave | {} {:.2} Hz | λ {:.4} m | A {} {} | {:.1} dB SPL | {} particles{}",
        config.waveform,
        config.frequency_hz,
        p.wavelength_m,
        config.amplitude,
        config.amplitude_unit,
        p.sound_pressure_level_db(),
        config.particle_count,
        if config.paused { " | paused" } else { "" }
    )
}

/// Formula lines with current values substituted.
///
/// `sample_x` is the rest position (rendering coordinates) of the particle
/// whose instantaneous displacement is shown, if any.
pub fn equations(
    config: &ModelConfig,
    params: &WaveParameters,
    elapsed_s: f64,
    sample_x: Option<f64>,
) -> Vec<String> {
    let f = config.frequency_hz;
    let c = config.speed_of_sound_m_per_s;
    let func = params.waveform.equation_name;

    let mut lines = vec![
        format!("λ = c / f = {} / {} = {:.4} m", c, f, params.wavelength_m),
        format!("T = 1 / f = {:.6} s", params.period_s),
        format!("k = 2π / λ = {:.4} rad/m", params.wavenumber),
        format!("ω = 2π·f = {:.2} rad/s", params.angular_frequency),
        format!(
            "s(x, t) = A·{}(ωt − kx) with A = {} {} ({} m)",
            func, config.amplitude, config.amplitude_unit, params.amplitude_m
        ),
        format!(
            "Z₀ = ρ·c = {} · {} = {:.1} Pa·s/m",
            AIR_DENSITY_KG_PER_M3, c, params.acoustic_impedance
        ),
        format!(
            "p_peak = A·ω·Z₀ = {:.3} Pa, p_rms = {:.3} Pa",
            params.peak_pressure_pa,
            params.rms_pressure_pa()
        ),
        format!("SPL = 20·log10(p_rms / 20 µPa) = {:.1} dB", params.sound_pressure_level_db()),
    ];

    if let Some(x) = sample_x {
        let x_m = x * params.meters_per_screen_unit;
        let offset = PhaseSnapshot::new(params, elapsed_s).sample(x, Trace::Particle);
        let s_m = offset * params.meters_per_screen_unit;
        lines.push(format!("s({:.4} m, {:.6} s) = {:.3e} m", x_m, elapsed_s, s_m));
    }

    lines
}
