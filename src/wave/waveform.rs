//! Periodic basis functions driving the speaker cone.
//!
//! Each waveform is a plain data record (evaluate function + RMS factor).
//! Callers look a record up once and use its fields; nothing downstream
//! matches on which waveform is active.

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, PI, TAU};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Immutable waveform record
#[derive(Debug)]
pub struct Waveform {
    /// Display name
    pub name: &'static str,

    /// Function name as it appears in `A·f(kx − ωt)`
    pub equation_name: &'static str,

    /// Periodic function of phase (radians), range [-1, 1]
    pub evaluate: fn(f64) -> f64,

    /// RMS value relative to peak
    pub rms_factor: f64,
}

/// Named `sine` but evaluates cosine, so displacement reads `A·cos(kx − ωt)`.
pub static SINE: Waveform = Waveform {
    name: "sine",
    equation_name: "cos",
    evaluate: f64::cos,
    rms_factor: FRAC_1_SQRT_2,
};

pub static SQUARE: Waveform = Waveform {
    name: "square",
    equation_name: "square",
    evaluate: square,
    rms_factor: 1.0,
};

pub static TRIANGLE: Waveform = Waveform {
    name: "triangle",
    equation_name: "triangle",
    evaluate: triangle,
    // 1/√3
    rms_factor: 0.577_350_269_189_625_8,
};

/// -1 for the first half of each cycle, +1 for the second
pub fn square(radians: f64) -> f64 {
    if radians.rem_euclid(TAU) < PI {
        -1.0
    } else {
        1.0
    }
}

/// Linear ramps 0 → 1 → 0 → -1 → 0, one per quarter cycle
pub fn triangle(radians: f64) -> f64 {
    let cycle = radians.rem_euclid(TAU);
    // rem_euclid of a tiny negative phase rounds up to TAU
    let cycle = if cycle >= TAU { 0.0 } else { cycle };
    let quarter = (cycle / FRAC_PI_2).floor();
    let progress = (cycle - quarter * FRAC_PI_2) / FRAC_PI_2;

    match quarter as u8 {
        0 => progress,
        1 => 1.0 - progress,
        2 => -progress,
        _ => -(1.0 - progress),
    }
}

/// Key into the waveform registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WaveformKind {
    #[default]
    Sine,
    Square,
    Triangle,
}

impl WaveformKind {
    pub const ALL: [WaveformKind; 3] = [
        WaveformKind::Sine,
        WaveformKind::Square,
        WaveformKind::Triangle,
    ];

    /// Registry lookup
    pub fn waveform(self) -> &'static Waveform {
        match self {
            WaveformKind::Sine => &SINE,
            WaveformKind::Square => &SQUARE,
            WaveformKind::Triangle => &TRIANGLE,
        }
    }

    pub fn key(self) -> &'static str {
        self.waveform().name
    }
}

impl FromStr for WaveformKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            // Older preset files use "sin"
            "sine" | "sin" => Ok(WaveformKind::Sine),
            "square" => Ok(WaveformKind::Square),
            "triangle" => Ok(WaveformKind::Triangle),
            _ => Err(ConfigError::UnknownWaveform(s.to_string())),
        }
    }
}

impl TryFrom<String> for WaveformKind {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WaveformKind> for String {
    fn from(kind: WaveformKind) -> Self {
        kind.key().to_string()
    }
}

impl fmt::Display for WaveformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample_phases() -> impl Iterator<Item = f64> {
        // Covers negative phases and several cycles
        (-2000..2000).map(|i| i as f64 * 0.0173)
    }

    #[test]
    fn test_all_waveforms_bounded() {
        for kind in WaveformKind::ALL {
            let wf = kind.waveform();
            for theta in sample_phases() {
                let v = (wf.evaluate)(theta);
                assert!(
                    (-1.0..=1.0).contains(&v),
                    "{} out of range at {}: {}",
                    wf.name,
                    theta,
                    v
                );
            }
        }
    }

    #[test]
    fn test_sine_is_cosine() {
        assert_abs_diff_eq!((SINE.evaluate)(0.0), 1.0);
        assert_abs_diff_eq!((SINE.evaluate)(PI), -1.0, epsilon = 1e-12);
        assert_eq!(SINE.equation_name, "cos");
    }

    #[test]
    fn test_square_halves() {
        assert_eq!(square(0.1), -1.0);
        assert_eq!(square(PI - 0.01), -1.0);
        assert_eq!(square(PI + 0.01), 1.0);
        // Negative phase lands in the second half of its cycle
        assert_eq!(square(-0.1), 1.0);
    }

    #[test]
    fn test_triangle_corners() {
        assert_abs_diff_eq!(triangle(0.0), 0.0);
        assert_abs_diff_eq!(triangle(FRAC_PI_2), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(triangle(PI), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(triangle(3.0 * FRAC_PI_2), -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(triangle(FRAC_PI_2 / 2.0), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_triangle_is_periodic_for_negative_phase() {
        for theta in [0.3, 1.9, 4.0, 5.5] {
            assert_abs_diff_eq!(triangle(theta - TAU), triangle(theta), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_triangle_near_zero_from_below() {
        for theta in [-1e-17, -1e-300, -f64::EPSILON] {
            assert_abs_diff_eq!(triangle(theta), 0.0, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(triangle(-1e-3), -1e-3 / FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_rms_factors_match_numeric_rms() {
        let n = 100_000;
        for kind in WaveformKind::ALL {
            let wf = kind.waveform();
            let mean_sq: f64 = (0..n)
                .map(|i| (wf.evaluate)(TAU * (i as f64 + 0.5) / n as f64).powi(2))
                .sum::<f64>()
                / n as f64;
            assert_abs_diff_eq!(mean_sq.sqrt(), wf.rms_factor, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_waveform_keys() {
        assert_eq!("sin".parse::<WaveformKind>().unwrap(), WaveformKind::Sine);
        assert_eq!(
            "Triangle".parse::<WaveformKind>().unwrap(),
            WaveformKind::Triangle
        );
        assert_eq!(
            "sawtooth".parse::<WaveformKind>(),
            Err(ConfigError::UnknownWaveform("sawtooth".to_string()))
        );
    }
}
