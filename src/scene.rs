//! Scene geometry: turns a simulation [`Frame`] into vertex lists for the GPU.
//!
//! Everything is in rendering coordinates (pixels, y down). Filled shapes go
//! to a triangle list, strokes to a line list.

use bytemuck::{Pod, Zeroable};
use glam::DVec2;

use crate::params::{Layout, RenderConfig};
use crate::simulation::Frame;

/// Vertex for both pipelines
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Scene colors (linear RGBA)
pub mod palette {
    pub const PARTICLE: [f32; 4] = [0.75, 0.8, 0.9, 0.9];
    pub const HIGHLIGHT: [f32; 4] = [1.0, 0.35, 0.25, 1.0];
    pub const PRESSURE: [f32; 4] = [0.3, 0.8, 1.0, 1.0];
    pub const DISPLACEMENT: [f32; 4] = [0.5, 1.0, 0.45, 1.0];
    pub const SPEAKER: [f32; 4] = [0.55, 0.55, 0.6, 1.0];
    pub const WAVELENGTH: [f32; 4] = [1.0, 0.85, 0.3, 0.35];
    pub const AXIS: [f32; 4] = [0.6, 0.6, 0.6, 0.6];
}

/// Distance scale intervals along the bottom of the particle area
pub const DISTANCE_TICKS: usize = 10;

/// Wavelength markers closer than this (pixels) are not drawn
pub const MIN_MARKER_SPACING: f64 = 4.0;

const TICK_LENGTH: f64 = 6.0;
const CURVE_MARKER_SIZE: f64 = 3.0;

/// Vertex lists for one frame. Buffers are reused between builds.
#[derive(Debug, Default)]
pub struct Scene {
    pub triangles: Vec<Vertex>,
    pub lines: Vec<Vertex>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild all geometry for `frame`
    pub fn build(
        &mut self,
        frame: &Frame,
        layout: &Layout,
        wavelength_screen: f64,
        style: &RenderConfig,
    ) {
        self.triangles.clear();
        self.lines.clear();

        self.speaker(frame, layout);
        self.scales(frame, layout, wavelength_screen);
        self.curves(frame, layout);
        self.particles(frame, style);
    }

    fn speaker(&mut self, frame: &Frame, layout: &Layout) {
        let b = &layout.particle_bounds;
        let cone = frame.cone_x + frame.cone_offset;
        let mid_y = b.top + b.height * 0.5;
        let body_half = b.height * 0.15;
        let body_left = b.left + (frame.cone_x - b.left) * 0.5;

        // Magnet housing, then the diaphragm across the full area height
        self.rect(
            DVec2::new(body_left, mid_y - body_half),
            DVec2::new(cone, mid_y + body_half),
            palette::SPEAKER,
        );
        self.segment(
            DVec2::new(cone, b.top),
            DVec2::new(cone, b.bottom()),
            palette::SPEAKER,
        );
    }

    fn scales(&mut self, frame: &Frame, layout: &Layout, wavelength_screen: f64) {
        let b = &layout.particle_bounds;

        if wavelength_screen.is_finite() && wavelength_screen >= MIN_MARKER_SPACING {
            let mut x = frame.cone_x + wavelength_screen;
            while x <= b.right() {
                self.segment(
                    DVec2::new(x, b.top),
                    DVec2::new(x, b.bottom()),
                    palette::WAVELENGTH,
                );
                x += wavelength_screen;
            }
        }

        let axis_y = b.bottom() + TICK_LENGTH;
        self.segment(
            DVec2::new(b.left, axis_y),
            DVec2::new(b.right(), axis_y),
            palette::AXIS,
        );
        for i in 0..=DISTANCE_TICKS {
            let x = b.left + b.width * i as f64 / DISTANCE_TICKS as f64;
            self.segment(
                DVec2::new(x, axis_y),
                DVec2::new(x, axis_y + TICK_LENGTH),
                palette::AXIS,
            );
        }
    }

    fn curves(&mut self, frame: &Frame, layout: &Layout) {
        let b = &layout.particle_bounds;
        let scale = curve_scale(layout.curve_half_height, frame.amplitude_screen);

        for (baseline, points, color) in [
            (
                layout.pressure_baseline_y,
                &frame.pressure_curve,
                palette::PRESSURE,
            ),
            (
                layout.displacement_baseline_y,
                &frame.displacement_curve,
                palette::DISPLACEMENT,
            ),
        ] {
            self.segment(
                DVec2::new(b.left, baseline),
                DVec2::new(b.right(), baseline),
                palette::AXIS,
            );
            for pair in points.windows(2) {
                self.segment(
                    curve_point(pair[0], baseline, scale),
                    curve_point(pair[1], baseline, scale),
                    color,
                );
            }
        }

        let marker = DVec2::splat(CURVE_MARKER_SIZE);
        for h in &frame.highlights {
            let p = curve_point(
                DVec2::new(h.origin.x, h.pressure),
                layout.pressure_baseline_y,
                scale,
            );
            let d = curve_point(
                DVec2::new(h.origin.x, h.displacement),
                layout.displacement_baseline_y,
                scale,
            );
            self.rect(p - marker, p + marker, palette::HIGHLIGHT);
            self.rect(d - marker, d + marker, palette::HIGHLIGHT);
        }
    }

    fn particles(&mut self, frame: &Frame, style: &RenderConfig) {
        let r = frame.particle_size_px;
        for p in frame.particles.iter().filter(|p| p.visible && !p.highlighted) {
            let half = DVec2::splat(r);
            self.rect(p.position - half, p.position + half, palette::PARTICLE);
        }

        // Highlighted particles on top, each with its ±amplitude bar
        let r = style.highlight_radius_px as f64;
        for p in frame.particles.iter().filter(|p| p.visible && p.highlighted) {
            let amp = frame.amplitude_screen;
            self.segment(
                DVec2::new(p.origin.x - amp, p.origin.y),
                DVec2::new(p.origin.x + amp, p.origin.y),
                palette::HIGHLIGHT,
            );
            let half = DVec2::splat(r);
            self.rect(p.position - half, p.position + half, palette::HIGHLIGHT);
        }
    }

    fn segment(&mut self, a: DVec2, b: DVec2, color: [f32; 4]) {
        self.lines.push(vertex(a, color));
        self.lines.push(vertex(b, color));
    }

    fn rect(&mut self, min: DVec2, max: DVec2, color: [f32; 4]) {
        let [a, b, c, d] = [
            vertex(min, color),
            vertex(DVec2::new(max.x, min.y), color),
            vertex(max, color),
            vertex(DVec2::new(min.x, max.y), color),
        ];
        self.triangles.extend_from_slice(&[a, b, c, a, c, d]);
    }
}

/// Pixels of curve excursion per unit of screen-space displacement.
///
/// Full amplitude maps to `half_height`; zero amplitude gives a flat curve.
pub fn curve_scale(half_height: f64, amplitude_screen: f64) -> f64 {
    if amplitude_screen > 0.0 {
        half_height / amplitude_screen
    } else {
        0.0
    }
}

/// Positive values plot upward (y down)
fn curve_point(sample: DVec2, baseline: f64, scale: f64) -> DVec2 {
    DVec2::new(sample.x, baseline - sample.y * scale)
}

fn vertex(p: DVec2, color: [f32; 4]) -> Vertex {
    Vertex {
        position: p.as_vec2().to_array(),
        color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ParticleField;
    use crate::params::ModelConfig;
    use crate::simulation::Simulation;

    fn layout() -> Layout {
        Layout::for_viewport(1000.0, 600.0)
    }

    fn frame_for(config: ModelConfig) -> (Frame, f64) {
        let mut sim = Simulation::new(config, &layout(), ParticleField::with_seed(3)).unwrap();
        sim.tick(0.0);
        let frame = sim.tick(0.25).clone();
        (frame, sim.params().wavelength_screen())
    }

    fn build(frame: &Frame, wavelength: f64) -> Scene {
        let mut scene = Scene::new();
        scene.build(frame, &layout(), wavelength, &RenderConfig::default());
        scene
    }

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }

    #[test]
    fn test_one_quad_per_visible_particle() {
        let (frame, lambda) = frame_for(ModelConfig::default());
        let scene = build(&frame, lambda);

        let highlights = frame.highlights.len();
        // Speaker body + particles + two markers per highlighted particle
        let quads = 1 + frame.visible_count + 2 * highlights;
        assert_eq!(scene.triangles.len(), quads * 6);
    }

    #[test]
    fn test_particle_quads_follow_particle_size() {
        for size in [1.0, 3.0] {
            let (frame, lambda) = frame_for(ModelConfig {
                particle_size_px: size,
                ..Default::default()
            });
            let scene = build(&frame, lambda);

            let quad: Vec<_> = scene
                .triangles
                .iter()
                .filter(|v| v.color == palette::PARTICLE)
                .take(6)
                .collect();
            assert_eq!(quad.len(), 6);
            let xs = quad.iter().map(|v| v.position[0]);
            let width = xs.clone().fold(f32::MIN, f32::max) - xs.fold(f32::MAX, f32::min);
            assert!((width as f64 - 2.0 * size).abs() < 1e-3, "width {width} for size {size}");
        }
    }

    #[test]
    fn test_curves_flat_at_zero_amplitude() {
        let (frame, lambda) = frame_for(ModelConfig {
            amplitude: 0.0,
            ..Default::default()
        });
        let scene = build(&frame, lambda);

        let l = layout();
        let pressure_y = l.pressure_baseline_y as f32;
        let curve_vertices: Vec<_> = scene
            .lines
            .iter()
            .filter(|v| v.color == palette::PRESSURE)
            .collect();
        assert_eq!(curve_vertices.len(), 2 * (frame.pressure_curve.len() - 1));
        assert!(curve_vertices.iter().all(|v| v.position[1] == pressure_y));
    }

    #[test]
    fn test_curve_stays_within_half_height() {
        let (frame, lambda) = frame_for(ModelConfig::default());
        let scene = build(&frame, lambda);

        let l = layout();
        for v in scene.lines.iter().filter(|v| v.color == palette::DISPLACEMENT) {
            let dy = (v.position[1] as f64 - l.displacement_baseline_y).abs();
            assert!(dy <= l.curve_half_height + 1e-3);
        }
    }

    #[test]
    fn test_wavelength_markers_every_lambda() {
        // λ = 1.31 m on a 10 m field over 1000 px = 131 px; cone at 180 px, area ends at 900
        let (frame, lambda) = frame_for(ModelConfig::default());
        let scene = build(&frame, lambda);

        let markers = scene
            .lines
            .iter()
            .filter(|v| v.color == palette::WAVELENGTH)
            .count()
            / 2;
        let expected = ((layout().particle_bounds.right() - frame.cone_x) / lambda).floor();
        assert_eq!(markers, expected as usize);
        assert_eq!(markers, 5);
    }

    #[test]
    fn test_dense_wavelength_markers_skipped() {
        let (frame, _) = frame_for(ModelConfig::default());
        let scene = build(&frame, 0.5);
        assert!(scene.lines.iter().all(|v| v.color != palette::WAVELENGTH));
    }

    #[test]
    fn test_empty_field_still_draws_speaker_and_scales() {
        let (frame, lambda) = frame_for(ModelConfig {
            particle_count: 0,
            ..Default::default()
        });
        let scene = build(&frame, lambda);
        assert_eq!(scene.triangles.len(), 6);
        assert!(scene
            .lines
            .iter()
            .all(|v| v.color != palette::PRESSURE && v.color != palette::DISPLACEMENT));
    }

    #[test]
    fn test_curve_scale() {
        assert_eq!(curve_scale(30.0, 10.0), 3.0);
        assert_eq!(curve_scale(30.0, 0.0), 0.0);
    }
}
