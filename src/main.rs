//! Soundwave - a longitudinal sound wave, drawn as moving air particles
//!
//! A speaker cone on the left drives a field of particles; the pressure and
//! displacement curves above and below show the same wave as graphs.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use log::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use soundwave::cli::Args;
use soundwave::controls::Control;
use soundwave::field::ParticleField;
use soundwave::params::{ModelConfig, PresetBook, RecordingConfig, RenderConfig};
use soundwave::readout;
use soundwave::rendering::RenderSystem;
use soundwave::scene::Scene;
use soundwave::simulation::{Simulation, FIXED_FRAME_INTERVAL};
use soundwave::wave::WaveformKind;

/// Main application state
struct App {
    window: Arc<Window>,
    render_system: RenderSystem,
    simulation: Simulation,
    scene: Scene,
    render_config: RenderConfig,

    // Presets
    presets: PresetBook,
    presets_path: PathBuf,
    current_preset: Option<String>,

    // Recording
    recording: Option<RecordingConfig>,
    frame_num: usize,

    // Time tracking
    start_time: Instant,
    fps_timer: Instant,
    frame_count: u32,
}

impl App {
    /// Host timestamp for the next frame (seconds)
    fn timestamp_s(&self) -> f64 {
        match &self.recording {
            Some(rec) => self.frame_num as f64 * rec.frame_interval_s(),
            None => self.start_time.elapsed().as_secs_f64(),
        }
    }

    /// Advance, draw, and (when recording) capture one frame.
    /// Returns false once a recording is complete.
    fn frame(&mut self) -> bool {
        let timestamp = self.timestamp_s();
        let layout = self.render_config.layout();
        let wavelength_screen = self.simulation.params().wavelength_screen();

        let frame = self.simulation.tick(timestamp);
        self.scene
            .build(frame, &layout, wavelength_screen, &self.render_config);
        self.render_system.update_scene(&self.scene);

        match self.render_system.render(self.frame_num) {
            Ok(()) => {}
            Err(soundwave::error::RenderError::Frame(
                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated,
            )) => self.render_system.reconfigure(),
            Err(e) => error!("Render error: {}", e),
        }
        self.frame_num += 1;

        self.frame_count += 1;
        if self.fps_timer.elapsed().as_secs() >= 1 {
            debug!(
                "FPS: {} | Particles: {} visible of {}",
                self.frame_count,
                self.simulation.frame().visible_count,
                self.simulation.field().len()
            );
            self.frame_count = 0;
            self.fps_timer = Instant::now();
        }

        match &self.recording {
            Some(rec) if self.frame_num >= rec.total_frames() => {
                info!(
                    "Recording complete: {} frames in {}",
                    self.frame_num,
                    rec.frames_dir()
                );
                false
            }
            _ => true,
        }
    }

    fn update_title(&self) {
        self.window.set_title(&readout::title(&self.simulation));
    }

    fn handle_input(&mut self, keycode: KeyCode) {
        let control = match keycode {
            KeyCode::Space => Some(Control::TogglePause),
            KeyCode::ArrowUp => Some(Control::Frequency(1)),
            KeyCode::ArrowDown => Some(Control::Frequency(-1)),
            KeyCode::ArrowRight => Some(Control::Amplitude(1)),
            KeyCode::ArrowLeft => Some(Control::Amplitude(-1)),
            KeyCode::Equal | KeyCode::NumpadAdd => Some(Control::Particles(1)),
            KeyCode::Minus | KeyCode::NumpadSubtract => Some(Control::Particles(-1)),
            KeyCode::Period => Some(Control::ParticleSize(1)),
            KeyCode::Comma => Some(Control::ParticleSize(-1)),
            KeyCode::BracketRight => Some(Control::TimeScale(1)),
            KeyCode::BracketLeft => Some(Control::TimeScale(-1)),
            KeyCode::Digit1 => Some(Control::Waveform(WaveformKind::Sine)),
            KeyCode::Digit2 => Some(Control::Waveform(WaveformKind::Square)),
            KeyCode::Digit3 => Some(Control::Waveform(WaveformKind::Triangle)),
            KeyCode::KeyW => Some(Control::NextWidth),
            KeyCode::KeyU => Some(Control::NextAmplitudeUnit),
            KeyCode::KeyP => {
                self.next_preset();
                None
            }
            KeyCode::KeyS => {
                self.save_snapshot();
                None
            }
            KeyCode::KeyE => {
                self.print_equations();
                None
            }
            _ => None,
        };

        if let Some(control) = control {
            if let Err(e) = control.apply(&mut self.simulation) {
                warn!("Rejected {:?}: {}", control, e);
            }
        }
        self.update_title();
    }

    fn print_equations(&self) {
        let sample_x = self.simulation.frame().highlights.first().map(|h| h.origin.x);
        println!();
        for line in readout::equations(
            self.simulation.config(),
            self.simulation.params(),
            self.simulation.elapsed_s(),
            sample_x,
        ) {
            println!("  {}", line);
        }
    }

    fn next_preset(&mut self) {
        let Some(name) = self
            .presets
            .next_name(self.current_preset.as_deref())
            .map(str::to_string)
        else {
            return;
        };

        let result = self
            .presets
            .get(&name)
            .and_then(|preset| self.simulation.apply(preset));
        match result {
            Ok(()) => info!("Preset: {}", name),
            Err(e) => warn!("Preset {:?} not applied: {}", name, e),
        }
        self.current_preset = Some(name);
    }

    fn save_snapshot(&mut self) {
        let name = (1..)
            .map(|n| format!("Snapshot {}", n))
            .find(|name| self.presets.get(name).is_err())
            .unwrap_or_else(|| "Snapshot".to_string());

        self.presets.insert_snapshot(name.clone(), self.simulation.config());
        match self.presets.save(&self.presets_path) {
            Ok(()) => {
                info!("Saved preset {:?}", name);
                self.current_preset = Some(name);
            }
            Err(e) => warn!("Could not save presets: {}", e),
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.render_config.window_width = new_size.width;
        self.render_config.window_height = new_size.height;
        self.render_system.resize(new_size.width, new_size.height);

        if let Err(e) = self.simulation.set_layout(&self.render_config.layout()) {
            warn!("Viewport {}x{} rejected: {}", new_size.width, new_size.height, e);
        }
    }
}

/// Everything needed to build the [`App`] once a window exists
struct Startup {
    config: ModelConfig,
    render_config: RenderConfig,
    presets: PresetBook,
    presets_path: PathBuf,
    current_preset: Option<String>,
    recording: Option<RecordingConfig>,
}

// === Event Handler ===

struct AppHandler {
    startup: Option<Startup>,
    app: Option<App>,
    failed: bool,
}

impl AppHandler {
    fn create_app(
        &mut self,
        event_loop: &ActiveEventLoop,
    ) -> Result<App, Box<dyn std::error::Error>> {
        let startup = self.startup.take().ok_or("Application already started")?;

        let window_attributes = Window::default_attributes()
            .with_title("Soundwave")
            .with_inner_size(winit::dpi::PhysicalSize::new(
                startup.render_config.window_width,
                startup.render_config.window_height,
            ));
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let mut render_config = startup.render_config;
        let size = window.inner_size();
        if size.width > 0 && size.height > 0 {
            render_config.window_width = size.width;
            render_config.window_height = size.height;
        }

        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &render_config,
            startup.recording.clone(),
        ))?;

        let simulation = Simulation::new(
            startup.config,
            &render_config.layout(),
            ParticleField::new(),
        )?;

        Ok(App {
            window,
            render_system,
            simulation,
            scene: Scene::new(),
            render_config,
            presets: startup.presets,
            presets_path: startup.presets_path,
            current_preset: startup.current_preset,
            recording: startup.recording,
            frame_num: 0,
            start_time: Instant::now(),
            fps_timer: Instant::now(),
            frame_count: 0,
        })
    }
}

impl ApplicationHandler for AppHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_some() {
            return; // Already initialized
        }

        match self.create_app(event_loop) {
            Ok(app) => {
                app.update_title();
                println!("\nSoundwave is running!");
                self.app = Some(app);
            }
            Err(e) => {
                error!("Startup failed: {}", e);
                self.failed = true;
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(app) = &mut self.app else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(physical_size) => {
                app.resize(physical_size);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(keycode),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                app.handle_input(keycode);
            }
            WindowEvent::RedrawRequested => {
                if !app.frame() {
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(app) = &self.app {
            app.window.request_redraw();
        }
    }
}

/// Step the simulation without a window at the fixed frame interval
fn run_headless(
    config: ModelConfig,
    render_config: &RenderConfig,
    frames: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut simulation = Simulation::new(config, &render_config.layout(), ParticleField::new())?;
    let interval = FIXED_FRAME_INTERVAL.as_secs_f64();
    let frames_per_second = (1.0 / interval).round() as usize;

    info!(
        "Headless: {} frames at {:?} intervals",
        frames, FIXED_FRAME_INTERVAL
    );
    let start = Instant::now();
    for i in 0..frames {
        let frame = simulation.tick(i as f64 * interval);
        if (i + 1) % frames_per_second == 0 {
            debug!(
                "t={:.6} s | cone offset {:.3} | {} visible",
                frame.elapsed_s, frame.cone_offset, frame.visible_count
            );
        }
    }

    info!(
        "Simulated {:.6} s in {} frames ({:.1} ms wall)",
        simulation.elapsed_s(),
        frames,
        start.elapsed().as_secs_f64() * 1000.0
    );
    for line in readout::equations(
        simulation.config(),
        simulation.params(),
        simulation.elapsed_s(),
        simulation.frame().highlights.first().map(|h| h.origin.x),
    ) {
        info!("{}", line);
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let presets = PresetBook::load(&args.presets)?;
    let config = args.initial_config(&presets)?;
    let render_config = args.render_config();

    println!("=== Soundwave: longitudinal sound wave ===");
    println!(
        "Frequency: {} Hz | Speed of sound: {} m/s | Width: {} {}",
        config.frequency_hz, config.speed_of_sound_m_per_s, config.sim_width, config.width_unit
    );

    if let Some(frames) = args.headless {
        return run_headless(config, &render_config, frames);
    }

    let recording = args.create_recording_config();
    if let Some(rec) = &recording {
        println!(
            "Recording {} frames to {}/",
            rec.total_frames(),
            rec.frames_dir()
        );
    }

    println!("\nControls:");
    println!("  Space - Pause/resume");
    println!("  Up/Down - Frequency ± semitone");
    println!("  Left/Right - Amplitude ± 10% of max");
    println!("  +/- - Particles ± 500");
    println!("  ,/. - Particle size ± 0.5 px");
    println!("  [/] - Time scale ×½ / ×2");
    println!("  1/2/3 - Sine / square / triangle");
    println!("  W - Next simulated width");
    println!("  U - Next amplitude unit");
    println!("  P - Next preset");
    println!("  S - Save current settings as a preset");
    println!("  E - Print wave equations");
    println!("  ESC - Quit");
    println!();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut handler = AppHandler {
        startup: Some(Startup {
            config,
            render_config,
            presets,
            presets_path: args.presets.clone(),
            current_preset: args.preset.clone(),
            recording,
        }),
        app: None,
        failed: false,
    };
    event_loop.run_app(&mut handler)?;

    if handler.failed {
        return Err("Window or GPU initialisation failed".into());
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}
