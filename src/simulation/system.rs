//! Animation loop: advances the clock and transforms the particle field each frame.

use glam::DVec2;
use log::{debug, info};

use super::clock::{RunState, SimulationClock};
use crate::error::ConfigError;
use crate::field::{Bounds, ParticleField};
use crate::params::{Layout, ModelConfig, PartialConfig};
use crate::wave::{PhaseSnapshot, Trace, WaveModel, WaveParameters};

/// Per-particle output for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSample {
    pub origin: DVec2,
    /// Displaced render position
    pub position: DVec2,
    /// False when hidden behind the speaker cone
    pub visible: bool,
    pub highlighted: bool,
}

/// Curve values at a highlighted particle's rest x
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightSample {
    pub origin: DVec2,
    pub pressure: f64,
    pub displacement: f64,
}

/// Everything the render adapter needs for one frame.
///
/// Buffers are reused across frames.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub elapsed_s: f64,
    /// Speaker cone rest position (x)
    pub cone_x: f64,
    /// Current cone displacement
    pub cone_offset: f64,
    pub amplitude_screen: f64,
    /// Particle dot half-size (pixels)
    pub particle_size_px: f64,
    /// Canonical particle order
    pub particles: Vec<ParticleSample>,
    pub highlights: Vec<HighlightSample>,
    /// `(origin x, signed offset)`, ascending x
    pub pressure_curve: Vec<DVec2>,
    /// `(origin x, signed offset)`, ascending x
    pub displacement_curve: Vec<DVec2>,
    pub visible_count: usize,
}

/// Whether the speaker body hides the particle resting at `origin_x`.
///
/// Uses the rest position only, so a particle cannot oscillate out of
/// occlusion. A particle exactly at the cone is always hidden.
pub fn is_occluded(origin_x: f64, cone_x: f64, amplitude_screen: f64) -> bool {
    origin_x <= cone_x || origin_x < cone_x + 2.0 * amplitude_screen
}

/// The simulation: wave model, particle field, clock and latest frame
pub struct Simulation {
    model: WaveModel,
    field: ParticleField,
    bounds: Bounds,
    clock: SimulationClock,
    frame: Frame,
}

impl Simulation {
    pub fn new(
        config: ModelConfig,
        layout: &Layout,
        mut field: ParticleField,
    ) -> Result<Self, ConfigError> {
        let model = WaveModel::new(config, layout.viewport_width)?;
        let bounds = layout.particle_bounds;
        field.resize(model.config().particle_count, &bounds);

        Ok(Self {
            model,
            field,
            bounds,
            clock: SimulationClock::new(),
            frame: Frame::default(),
        })
    }

    pub fn model(&self) -> &WaveModel {
        &self.model
    }

    pub fn config(&self) -> &ModelConfig {
        self.model.config()
    }

    pub fn params(&self) -> &WaveParameters {
        self.model.params()
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn elapsed_s(&self) -> f64 {
        self.clock.elapsed_s()
    }

    pub fn run_state(&self) -> RunState {
        RunState::from_paused(self.model.config().paused)
    }

    /// Edit the model through one of its setters, then bring the field in line
    pub fn configure(
        &mut self,
        edit: impl FnOnce(&mut WaveModel) -> Result<(), ConfigError>,
    ) -> Result<(), ConfigError> {
        edit(&mut self.model)?;
        self.sync_field();
        Ok(())
    }

    /// Merge a partial config (preset) into the model
    pub fn apply(&mut self, partial: &PartialConfig) -> Result<(), ConfigError> {
        self.configure(|model| model.apply(partial))
    }

    pub fn toggle_pause(&mut self) -> RunState {
        let next = self.run_state().toggled();
        self.model.set_paused(next == RunState::Paused);
        info!(
            "Simulation {}",
            if next == RunState::Paused {
                "paused"
            } else {
                "resumed"
            }
        );
        next
    }

    /// Adopt a new viewport: rescale the model and respawn the field inside the new area
    pub fn set_layout(&mut self, layout: &Layout) -> Result<(), ConfigError> {
        self.model.set_viewport_width(layout.viewport_width)?;
        self.bounds = layout.particle_bounds;
        self.field
            .regenerate(self.model.config().particle_count, &self.bounds);
        debug!("Layout updated: {:?}", self.bounds);
        Ok(())
    }

    fn sync_field(&mut self) {
        let target = self.model.config().particle_count;
        if target != self.field.len() {
            self.field.resize(target, &self.bounds);
        }
    }

    /// Run one animation frame at host time `timestamp_s` (seconds)
    pub fn tick(&mut self, timestamp_s: f64) -> &Frame {
        let state = self.run_state();
        let time_scale = self.model.config().time_scale;
        self.clock.advance(timestamp_s, time_scale, state);
        self.compute_frame();
        &self.frame
    }

    fn compute_frame(&mut self) {
        let params = self.model.params();
        let elapsed = self.clock.elapsed_s();
        let wave = PhaseSnapshot::new(params, elapsed);
        let amplitude = params.amplitude_screen();
        let cone_x = self.bounds.margin_x();
        let particle_size_px = self.model.config().particle_size_px;

        let frame = &mut self.frame;
        frame.elapsed_s = elapsed;
        frame.cone_x = cone_x;
        frame.amplitude_screen = amplitude;
        frame.particle_size_px = particle_size_px;

        // Sample just ahead of the nearest visible particles so the cone
        // appears to push them
        frame.cone_offset = wave.sample(cone_x + 2.0 * amplitude, Trace::Particle);

        frame.particles.clear();
        frame.highlights.clear();
        frame.visible_count = 0;
        for (index, particle) in self.field.particles().iter().enumerate() {
            let origin = particle.origin;
            let offset = wave.sample(origin.x, Trace::Particle);
            let visible = !is_occluded(origin.x, cone_x, amplitude);
            let highlighted = ParticleField::is_highlighted(index);

            frame.visible_count += visible as usize;
            frame.particles.push(ParticleSample {
                origin,
                position: DVec2::new(origin.x + offset, origin.y),
                visible,
                highlighted,
            });

            if highlighted {
                frame.highlights.push(HighlightSample {
                    origin,
                    pressure: wave.sample(origin.x, Trace::Pressure),
                    displacement: wave.sample(origin.x, Trace::Displacement),
                });
            }
        }

        frame.pressure_curve.clear();
        frame.displacement_curve.clear();
        for particle in self.field.iter_sorted() {
            let x = particle.origin.x;
            frame
                .pressure_curve
                .push(DVec2::new(x, wave.sample(x, Trace::Pressure)));
            frame
                .displacement_curve
                .push(DVec2::new(x, wave.sample(x, Trace::Displacement)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::HIGHLIGHT_COUNT;
    use crate::params::{LengthUnit, PresetBook};
    use crate::wave::{displacement, CoordinateScale};
    use approx::assert_abs_diff_eq;

    fn layout() -> Layout {
        Layout::for_viewport(1000.0, 600.0)
    }

    fn simulation(config: ModelConfig) -> Simulation {
        Simulation::new(config, &layout(), ParticleField::with_seed(11)).unwrap()
    }

    #[test]
    fn test_particle_positions_follow_transform() {
        let mut sim = simulation(ModelConfig::default());
        sim.tick(0.0);
        sim.tick(0.5);

        let params = *sim.params();
        let t = sim.elapsed_s();
        assert_abs_diff_eq!(t, 0.5 * 0.002);

        for sample in sim.frame().particles.iter().take(50) {
            let expected = displacement(
                sample.origin.x,
                t,
                0.0,
                params.amplitude_m,
                params.wavenumber,
                params.angular_frequency,
                params.waveform,
                CoordinateScale::from(&params),
            );
            assert_abs_diff_eq!(sample.position.x, sample.origin.x + expected, epsilon = 1e-7);
            assert_eq!(sample.position.y, sample.origin.y);
        }
    }

    #[test]
    fn test_cone_offset_samples_ahead_of_cone() {
        let mut sim = simulation(ModelConfig::default());
        sim.tick(0.0);
        let frame = sim.tick(0.8).clone();
        let params = *sim.params();
        let t = sim.elapsed_s();
        assert!(frame.amplitude_screen > 0.0);
        assert!(t > 0.0);

        let reference_x = frame.cone_x + 2.0 * frame.amplitude_screen;
        let expected = displacement(
            reference_x,
            t,
            0.0,
            params.amplitude_m,
            params.wavenumber,
            params.angular_frequency,
            params.waveform,
            CoordinateScale::from(&params),
        );
        assert_abs_diff_eq!(frame.cone_offset, expected, epsilon = 1e-7);
        assert!(frame.cone_offset.abs() <= frame.amplitude_screen + 1e-9);
    }

    #[test]
    fn test_presets_keep_pause_state() {
        let book = PresetBook::builtin();
        let mut sim = simulation(ModelConfig::default());
        sim.toggle_pause();
        for name in book.names() {
            sim.apply(book.get(name).unwrap()).unwrap();
            assert_eq!(sim.run_state(), RunState::Paused, "preset {name}");
        }
    }

    #[test]
    fn test_occlusion_boundaries() {
        let cone = 100.0;
        let amp = 5.0;
        assert!(is_occluded(cone, cone, amp));
        assert!(is_occluded(cone, cone, 0.0));
        assert!(is_occluded(cone + 9.999, cone, amp));
        assert!(!is_occluded(cone + 2.0 * amp + 1e-9, cone, amp));
    }

    #[test]
    fn test_occlusion_uses_origin_not_position() {
        let mut sim = simulation(ModelConfig::default());
        for step in 0..20 {
            let frame = sim.tick(step as f64 * 0.05);
            let limit = frame.cone_x + 2.0 * frame.amplitude_screen;
            for p in &frame.particles {
                assert_eq!(p.visible, p.origin.x >= limit && p.origin.x > frame.cone_x);
            }
        }
    }

    #[test]
    fn test_curves_sorted_and_phase_consistent() {
        let mut sim = simulation(ModelConfig::default());
        sim.tick(0.0);
        let frame = sim.tick(0.8);

        assert_eq!(frame.pressure_curve.len(), 2000);
        assert_eq!(frame.displacement_curve.len(), 2000);
        for pair in frame.pressure_curve.windows(2) {
            assert!(pair[0].x <= pair[1].x);
        }

        // Sine: displacement curve is -A·cos(θ), pressure is A·sin(θ)
        let amp = frame.amplitude_screen;
        for (p, d) in frame.pressure_curve.iter().zip(&frame.displacement_curve) {
            assert_eq!(p.x, d.x);
            assert_abs_diff_eq!(p.y * p.y + d.y * d.y, amp * amp, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_highlights_use_canonical_order() {
        let mut sim = simulation(ModelConfig::default());
        let frame = sim.tick(0.0);
        assert_eq!(frame.highlights.len(), HIGHLIGHT_COUNT);
        for (h, p) in frame.highlights.iter().zip(&frame.particles) {
            assert_eq!(h.origin, p.origin);
            assert!(p.highlighted);
        }
        assert!(!frame.particles[HIGHLIGHT_COUNT].highlighted);
    }

    #[test]
    fn test_empty_field_renders_nothing() {
        let mut sim = simulation(ModelConfig {
            particle_count: 0,
            ..Default::default()
        });
        let frame = sim.tick(1.0);
        assert!(frame.particles.is_empty());
        assert!(frame.pressure_curve.is_empty());
        assert!(frame.displacement_curve.is_empty());
        assert_eq!(frame.visible_count, 0);
    }

    #[test]
    fn test_zero_amplitude_is_flat() {
        let mut sim = simulation(ModelConfig {
            amplitude: 0.0,
            ..Default::default()
        });
        sim.tick(0.0);
        let frame = sim.tick(0.3);
        assert_eq!(frame.cone_offset, 0.0);
        assert!(frame.pressure_curve.iter().all(|p| p.y == 0.0));
        assert!(frame.particles.iter().all(|p| p.position == p.origin));
    }

    #[test]
    fn test_pause_freezes_particles() {
        let mut sim = simulation(ModelConfig::default());
        sim.tick(0.0);
        sim.tick(0.2);
        sim.toggle_pause();
        let frozen = sim.tick(5.0).particles.clone();
        let again = sim.tick(9.0).particles.clone();
        assert_eq!(frozen, again);

        assert_eq!(sim.toggle_pause(), RunState::Running);
        let before = sim.elapsed_s();
        sim.tick(9.05);
        assert_abs_diff_eq!(sim.elapsed_s() - before, 0.05 * 0.002, epsilon = 1e-12);
    }

    #[test]
    fn test_particle_count_changes_resize_field() {
        let mut sim = simulation(ModelConfig::default());
        for _ in 0..2 {
            sim.configure(|m| m.set_particle_count(0)).unwrap();
            assert!(sim.field().is_empty());
            sim.configure(|m| m.set_particle_count(2000)).unwrap();
            assert_eq!(sim.field().len(), 2000);
        }
        assert_eq!(sim.tick(0.0).particles.len(), 2000);
    }

    #[test]
    fn test_apply_preset_updates_field_and_params() {
        let mut sim = simulation(ModelConfig::default());
        let partial = PartialConfig {
            particle_count: Some(100),
            frequency_hz: Some(343.0),
            ..Default::default()
        };
        sim.apply(&partial).unwrap();
        assert_eq!(sim.field().len(), 100);
        assert_abs_diff_eq!(sim.params().wavelength_m, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rejected_change_keeps_field() {
        let mut sim = simulation(ModelConfig::default());
        let before = sim.field().particles().to_vec();
        assert!(sim.configure(|m| m.set_particle_count(99_999)).is_err());
        assert_eq!(sim.field().particles(), &before[..]);
    }

    #[test]
    fn test_layout_change_respawns_inside_new_area() {
        let mut sim = simulation(ModelConfig::default());
        let small = Layout::for_viewport(400.0, 300.0);
        sim.set_layout(&small).unwrap();

        assert_eq!(sim.field().len(), 2000);
        let b = small.particle_bounds;
        for p in sim.field().particles() {
            assert!(p.origin.x >= b.margin_x() && p.origin.x <= b.right());
        }
        assert_abs_diff_eq!(sim.params().screen_units_per_meter, 40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_amplitude_limit_keeps_visible_particles_right_of_cone() {
        // Near the largest allowed amplitude for a 1 m field
        let config = ModelConfig {
            sim_width: 1.0,
            amplitude: 49.0,
            amplitude_unit: LengthUnit::Millimeters,
            ..Default::default()
        };
        let mut sim = simulation(config);
        for step in 0..40 {
            let frame = sim.tick(step as f64 * 0.37);
            for p in frame.particles.iter().filter(|p| p.visible) {
                assert!(p.position.x >= frame.cone_x);
            }
        }
    }
}
