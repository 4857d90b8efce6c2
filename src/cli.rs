//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::error::ConfigError;
use crate::params::{
    LengthUnit, ModelConfig, PartialConfig, PresetBook, RecordingConfig, RenderConfig,
};
use crate::wave::WaveformKind;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "soundwave")]
#[command(about = "Longitudinal sound wave visualizer", long_about = None)]
pub struct Args {
    /// Source frequency (Hz)
    #[arg(long, value_name = "HZ")]
    pub frequency: Option<f64>,

    /// Speed of sound (m/s)
    #[arg(long, value_name = "M_PER_S")]
    pub speed_of_sound: Option<f64>,

    /// Peak particle displacement, in --amplitude-unit
    #[arg(long, value_name = "VALUE")]
    pub amplitude: Option<f64>,

    /// Amplitude unit: m, cm, mm, um, nm
    #[arg(long, value_name = "UNIT")]
    pub amplitude_unit: Option<LengthUnit>,

    /// Simulated width shown across the window, in --width-unit
    #[arg(long, value_name = "VALUE")]
    pub width: Option<f64>,

    /// Width unit: m, cm, mm, um, nm
    #[arg(long, value_name = "UNIT")]
    pub width_unit: Option<LengthUnit>,

    /// Simulated seconds per wall-clock second
    #[arg(long, value_name = "FACTOR")]
    pub time_scale: Option<f64>,

    /// Number of particles
    #[arg(long, value_name = "COUNT")]
    pub particles: Option<usize>,

    /// Particle dot half-size (pixels)
    #[arg(long, value_name = "PIXELS")]
    pub particle_size: Option<f64>,

    /// Waveform: sine, square, triangle
    #[arg(long, value_name = "SHAPE")]
    pub waveform: Option<WaveformKind>,

    /// Start paused
    #[arg(long)]
    pub paused: bool,

    /// Preset applied before the other flags
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Preset file (JSON), merged over the built-in presets
    #[arg(long, value_name = "FILE", default_value = "presets.json")]
    pub presets: PathBuf,

    /// Record frames to PNG (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Run without a window for N frames at a fixed interval
    #[arg(long, value_name = "FRAMES")]
    pub headless: Option<usize>,

    /// Window width (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "1280")]
    pub window_width: u32,

    /// Window height (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "720")]
    pub window_height: u32,
}

impl Args {
    /// Model flags given on the command line
    pub fn overrides(&self) -> PartialConfig {
        PartialConfig {
            frequency_hz: self.frequency,
            speed_of_sound_m_per_s: self.speed_of_sound,
            amplitude: self.amplitude,
            amplitude_unit: self.amplitude_unit,
            sim_width: self.width,
            width_unit: self.width_unit,
            time_scale: self.time_scale,
            particle_count: self.particles,
            particle_size_px: self.particle_size,
            waveform: self.waveform,
            paused: self.paused.then_some(true),
        }
    }

    /// Starting configuration: defaults, then the named preset, then flags
    pub fn initial_config(&self, presets: &PresetBook) -> Result<ModelConfig, ConfigError> {
        let mut config = ModelConfig::default();
        if let Some(name) = &self.preset {
            config.merge(presets.get(name)?);
        }
        config.merge(&self.overrides());
        config.validate()?;
        Ok(config)
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.window_width.max(1),
            window_height: self.window_height.max(1),
            ..Default::default()
        }
    }

    /// Create recording configuration if recording mode is enabled
    pub fn create_recording_config(&self) -> Option<RecordingConfig> {
        self.record.map(RecordingConfig::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("soundwave").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_flags_gives_defaults() {
        let args = parse(&[]);
        assert!(args.overrides().is_empty());
        let config = args.initial_config(&PresetBook::builtin()).unwrap();
        assert_eq!(config, ModelConfig::default());
    }

    #[test]
    fn test_flags_override_preset() {
        let args = parse(&["--preset", "Sine C8", "--frequency", "440", "--waveform", "square"]);
        let config = args.initial_config(&PresetBook::builtin()).unwrap();
        assert_eq!(config.frequency_hz, 440.0);
        assert_eq!(config.waveform, WaveformKind::Square);
    }

    #[test]
    fn test_preset_applies() {
        let args = parse(&["--preset", "Clear particles"]);
        let config = args.initial_config(&PresetBook::builtin()).unwrap();
        assert_eq!(config.particle_count, 100);
        assert_eq!(config.amplitude_unit, LengthUnit::Millimeters);
        assert_eq!(config.particle_size_px, 3.0);

        let args = parse(&["--preset", "Clear particles", "--particle-size", "2"]);
        let config = args.initial_config(&PresetBook::builtin()).unwrap();
        assert_eq!(config.particle_size_px, 2.0);
    }

    #[test]
    fn test_units_parse() {
        let args = parse(&["--amplitude", "3", "--amplitude-unit", "mm", "--width", "1"]);
        let config = args.initial_config(&PresetBook::builtin()).unwrap();
        assert!((config.amplitude_m() - 0.003).abs() < 1e-12);
    }

    #[test]
    fn test_bad_unit_rejected_by_parser() {
        let result = Args::try_parse_from(["soundwave", "--amplitude-unit", "furlong"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_preset() {
        let args = parse(&["--preset", "Nope"]);
        assert_eq!(
            args.initial_config(&PresetBook::builtin()),
            Err(ConfigError::UnknownPreset("Nope".to_string()))
        );
    }

    #[test]
    fn test_out_of_range_flag() {
        let args = parse(&["--particles", "20000"]);
        assert!(matches!(
            args.initial_config(&PresetBook::builtin()),
            Err(ConfigError::OutOfRange {
                field: "particle_count",
                ..
            })
        ));
    }

    #[test]
    fn test_modes() {
        let args = parse(&["--record", "2", "--headless", "10", "--paused"]);
        assert_eq!(args.create_recording_config().unwrap().total_frames(), 120);
        assert_eq!(args.headless, Some(10));
        assert_eq!(args.overrides().paused, Some(true));
    }
}
