//! Named configuration presets, persisted as JSON.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{info, warn};

use super::units::LengthUnit;
use super::wave::{ModelConfig, PartialConfig};
use crate::error::{ConfigError, PresetError};
use crate::wave::WaveformKind;

/// Preset applied at startup when none is named
pub const DEFAULT_PRESET: &str = "Middle C";

/// Preset name → partial configuration.
///
/// On disk this is a flat JSON object, e.g.
/// `{"Sine C7": {"frequency_hz": 2093.0}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetBook {
    presets: BTreeMap<String, PartialConfig>,
}

impl PresetBook {
    /// Presets shipped with the binary
    pub fn builtin() -> Self {
        let mut presets = BTreeMap::new();

        presets.insert(
            "Clear wave bands".to_string(),
            PartialConfig {
                frequency_hz: Some(10_350.0),
                speed_of_sound_m_per_s: Some(343.0),
                amplitude: Some(2.0),
                amplitude_unit: Some(LengthUnit::Millimeters),
                sim_width: Some(1.0),
                width_unit: Some(LengthUnit::Meters),
                time_scale: Some(0.000_02),
                particle_count: Some(14_410),
                particle_size_px: Some(1.0),
                waveform: Some(WaveformKind::Sine),
                ..Default::default()
            },
        );

        presets.insert(
            "Clear particles".to_string(),
            PartialConfig {
                frequency_hz: Some(9_180.0),
                speed_of_sound_m_per_s: Some(343.0),
                amplitude: Some(5.0),
                amplitude_unit: Some(LengthUnit::Millimeters),
                sim_width: Some(1.0),
                width_unit: Some(LengthUnit::Meters),
                time_scale: Some(0.000_04),
                particle_count: Some(100),
                particle_size_px: Some(3.0),
                ..Default::default()
            },
        );

        // Sine tones at C7..C10
        for (name, frequency_hz) in [
            ("Sine C7", 2_093.0),
            ("Sine C8", 4_186.0),
            ("Sine C9", 8_372.0),
            ("Sine C10", 16_744.0),
        ] {
            presets.insert(
                name.to_string(),
                PartialConfig {
                    frequency_hz: Some(frequency_hz),
                    waveform: Some(WaveformKind::Sine),
                    ..Default::default()
                },
            );
        }

        let mut book = Self { presets };
        book.insert_snapshot(DEFAULT_PRESET, &ModelConfig::default());
        book
    }

    /// Built-ins overlaid with the presets in `path` (file wins on name clash).
    ///
    /// A missing file yields just the built-ins. Every preset must produce a
    /// valid configuration when applied to the defaults.
    pub fn load(path: &Path) -> Result<Self, PresetError> {
        let mut book = Self::builtin();

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No preset file at {}, using built-ins", path.display());
                return Ok(book);
            }
            Err(e) => return Err(e.into()),
        };

        let loaded: BTreeMap<String, PartialConfig> = serde_json::from_str(&text)?;
        for (name, partial) in &loaded {
            let mut config = ModelConfig::default();
            config.merge(partial);
            if let Err(e) = config.validate() {
                warn!("Preset {:?} rejected: {}", name, e);
                return Err(e.into());
            }
        }

        info!("Loaded {} presets from {}", loaded.len(), path.display());
        book.presets.extend(loaded);
        Ok(book)
    }

    /// Write every preset to `path` as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), PresetError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.presets)?;
        fs::write(path, json)?;
        info!("Saved {} presets to {}", self.presets.len(), path.display());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&PartialConfig, ConfigError> {
        self.presets
            .get(name)
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))
    }

    /// Store a full snapshot of `config` under `name`, replacing any existing preset
    pub fn insert_snapshot(&mut self, name: impl Into<String>, config: &ModelConfig) {
        let mut partial = PartialConfig::from(config);
        // Presets never carry the pause state
        partial.paused = None;
        self.presets.insert(name.into(), partial);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Name following `current` in sorted order, wrapping around
    pub fn next_name(&self, current: Option<&str>) -> Option<&str> {
        let mut names = self.names();
        match current {
            Some(current) => self
                .presets
                .range::<str, _>((
                    std::ops::Bound::Excluded(current),
                    std::ops::Bound::Unbounded,
                ))
                .next()
                .map(|(name, _)| name.as_str())
                .or_else(|| names.next()),
            None => names.next(),
        }
    }
}

impl Default for PresetBook {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_builtins_are_valid() {
        let book = PresetBook::builtin();
        assert_eq!(book.len(), 7);
        for name in book.names() {
            let mut config = ModelConfig::default();
            config.merge(book.get(name).unwrap());
            assert!(config.validate().is_ok(), "preset {name} invalid");
        }
    }

    #[test]
    fn test_builtins_leave_pause_alone() {
        let book = PresetBook::builtin();
        for name in book.names() {
            assert_eq!(book.get(name).unwrap().paused, None, "preset {name}");
        }

        let dir = tempdir().unwrap();
        let path = dir.path().join("presets.json");
        book.save(&path).unwrap();
        assert!(!fs::read_to_string(&path).unwrap().contains("paused"));
    }

    #[test]
    fn test_clear_presets_set_particle_size() {
        let book = PresetBook::builtin();
        assert_eq!(book.get("Clear wave bands").unwrap().particle_size_px, Some(1.0));
        assert_eq!(book.get("Clear particles").unwrap().particle_size_px, Some(3.0));
    }

    #[test]
    fn test_unknown_preset() {
        let book = PresetBook::builtin();
        assert_eq!(
            book.get("Tuba"),
            Err(ConfigError::UnknownPreset("Tuba".to_string()))
        );
    }

    #[test]
    fn test_missing_file_gives_builtins() {
        let dir = tempdir().unwrap();
        let book = PresetBook::load(&dir.path().join("none.json")).unwrap();
        assert_eq!(book, PresetBook::builtin());
    }

    #[test]
    fn test_save_and_reload_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("presets").join("mine.json");

        let config = ModelConfig {
            frequency_hz: 440.0,
            waveform: WaveformKind::Triangle,
            paused: true,
            ..Default::default()
        };
        let mut book = PresetBook::builtin();
        book.insert_snapshot("A4", &config);
        book.save(&path).unwrap();

        let loaded = PresetBook::load(&path).unwrap();
        let preset = loaded.get("A4").unwrap();
        assert_eq!(preset.frequency_hz, Some(440.0));
        assert_eq!(preset.waveform, Some(WaveformKind::Triangle));
        assert_eq!(preset.paused, None);
    }

    #[test]
    fn test_file_overrides_builtin() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("presets.json");
        fs::write(&path, r#"{"Sine C7": {"frequency_hz": 2000.0}}"#).unwrap();

        let book = PresetBook::load(&path).unwrap();
        assert_eq!(book.get("Sine C7").unwrap().frequency_hz, Some(2000.0));
        assert_eq!(book.len(), 7);
    }

    #[test]
    fn test_unknown_unit_fails_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("presets.json");
        fs::write(&path, r#"{"Bad": {"amplitude_unit": "furlong"}}"#).unwrap();

        assert!(matches!(
            PresetBook::load(&path),
            Err(PresetError::Json(_))
        ));
    }

    #[test]
    fn test_out_of_range_fails_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("presets.json");
        fs::write(&path, r#"{"Loud": {"frequency_hz": 0.0}}"#).unwrap();

        assert!(matches!(
            PresetBook::load(&path),
            Err(PresetError::Config(ConfigError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_next_name_wraps() {
        let book = PresetBook::builtin();
        let first = book.names().next().unwrap().to_string();
        let last = book.names().last().unwrap().to_string();

        assert_eq!(book.next_name(None), Some(first.as_str()));
        assert_eq!(book.next_name(Some(&last)), Some(first.as_str()));
        assert_eq!(book.next_name(Some("Clear particles")), Some("Clear wave bands"));
    }
}
