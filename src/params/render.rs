//! Rendering, layout and recording configuration.

use crate::field::Bounds;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Highlighted particle dot radius (pixels)
    pub highlight_radius_px: f32,

    /// Clear color (linear RGBA)
    pub background: [f64; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            highlight_radius_px: 4.0,
            background: [0.02, 0.02, 0.04, 1.0],
        }
    }
}

impl RenderConfig {
    pub fn layout(&self) -> Layout {
        Layout::for_viewport(self.window_width as f64, self.window_height as f64)
    }
}

/// Screen regions, derived from the viewport size.
///
/// Particle area spans the middle 60% vertically and 80% horizontally; the
/// pressure curve sits above it and the displacement curve below.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub particle_bounds: Bounds,
    /// Pressure curve zero line (y)
    pub pressure_baseline_y: f64,
    /// Displacement curve zero line (y)
    pub displacement_baseline_y: f64,
    /// Curve excursion at full amplitude
    pub curve_half_height: f64,
}

impl Layout {
    const PARTICLE_LEFT: f64 = 0.1;
    const PARTICLE_TOP: f64 = 0.2;
    const PARTICLE_WIDTH: f64 = 0.8;
    const PARTICLE_HEIGHT: f64 = 0.6;
    const PRESSURE_BASELINE: f64 = 0.15;
    const DISPLACEMENT_BASELINE: f64 = 0.85;
    const CURVE_HALF_HEIGHT: f64 = 0.05;

    pub fn for_viewport(width: f64, height: f64) -> Self {
        Self {
            viewport_width: width,
            viewport_height: height,
            particle_bounds: Bounds::new(
                width * Self::PARTICLE_LEFT,
                height * Self::PARTICLE_TOP,
                width * Self::PARTICLE_WIDTH,
                height * Self::PARTICLE_HEIGHT,
            ),
            pressure_baseline_y: height * Self::PRESSURE_BASELINE,
            displacement_baseline_y: height * Self::DISPLACEMENT_BASELINE,
            curve_half_height: height * Self::CURVE_HALF_HEIGHT,
        }
    }
}

/// Recording mode configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds)
    pub duration_secs: f32,

    /// Output directory for frames
    pub output_dir: String,

    /// Frame rate (FPS)
    pub fps: u32,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            output_dir: "recording".to_string(),
            fps: 60,
        }
    }

    /// Total number of frames to capture
    pub fn total_frames(&self) -> usize {
        (self.duration_secs * self.fps as f32).ceil() as usize
    }

    /// Wall-clock seconds between captured frames
    pub fn frame_interval_s(&self) -> f64 {
        1.0 / self.fps as f64
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> String {
        format!("{}/frames", self.output_dir)
    }

    /// Path of frame `index`
    pub fn frame_path(&self, index: usize) -> String {
        format!("{}/frame_{:05}.png", self.frames_dir(), index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_regions() {
        let layout = Layout::for_viewport(1000.0, 500.0);
        assert_eq!(
            layout.particle_bounds,
            Bounds::new(100.0, 100.0, 800.0, 300.0)
        );
        assert_eq!(layout.pressure_baseline_y, 75.0);
        assert_eq!(layout.displacement_baseline_y, 425.0);
        assert_eq!(layout.curve_half_height, 25.0);

        // Curves clear the particle area
        let b = layout.particle_bounds;
        assert!(layout.pressure_baseline_y + layout.curve_half_height <= b.top);
        assert!(layout.displacement_baseline_y - layout.curve_half_height >= b.bottom());
    }

    #[test]
    fn test_recording_frames() {
        let rec = RecordingConfig::new(2.5);
        assert_eq!(rec.total_frames(), 150);
        assert_eq!(rec.frame_path(7), "recording/frames/frame_00007.png");
        assert!((rec.frame_interval_s() - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_default_layout_matches_window() {
        let config = RenderConfig::default();
        let layout = config.layout();
        assert_eq!(layout.viewport_width, 1280.0);
        assert_eq!(layout.viewport_height, 720.0);
    }
}
