use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};
use voxrelic_camera::Camera;
use voxrelic_hud::{FpsCounter, HudStatus};
use voxrelic_input::{Action, InputTracker};
use voxrelic_render_wgpu::WgpuRenderer;
use voxrelic_world::World;

#[derive(Parser)]
#[command(name = "voxrelic-desktop", about = "Voxel relic-hunt demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory containing dirt.png and wall.png; procedural textures
    /// are generated when omitted
    #[arg(long)]
    assets: Option<PathBuf>,
}

/// Everything the per-frame update touches, kept apart from the GPU
/// plumbing so the frame order reads in one place.
struct AppState {
    camera: Camera,
    world: World,
    tracker: InputTracker,
    fps: FpsCounter,
    start: Instant,
    last_frame: Instant,
    mouse_captured: bool,
}

impl AppState {
    fn new() -> Self {
        Self {
            camera: Camera::new(16.0 / 9.0),
            world: World::new(),
            tracker: InputTracker::new(),
            fps: FpsCounter::new(),
            start: Instant::now(),
            last_frame: Instant::now(),
            mouse_captured: false,
        }
    }

    /// One frame of core logic, in the fixed order input -> camera ->
    /// game state. Rendering and the HUD read the result afterwards.
    fn update(&mut self, now: f64) {
        let snap = self.tracker.snapshot();

        if snap.look != (0.0, 0.0) {
            self.camera.look(snap.look.0, snap.look.1);
        }
        if snap.pan_left {
            self.camera.pan_left();
        }
        if snap.pan_right {
            self.camera.pan_right();
        }
        if snap.move_forward {
            self.camera.move_forward();
        }
        if snap.move_back {
            self.camera.move_back();
        }
        if snap.move_left {
            self.camera.move_left();
        }
        if snap.move_right {
            self.camera.move_right();
        }

        if snap.place_block {
            self.world.add_block(self.camera.cell_in_front(1.2));
        }
        if snap.break_block {
            self.world.remove_block(self.camera.cell_in_front(1.2));
        }

        self.camera.update_view();
        self.world.update_game(self.camera.eye, now);
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool, repeat: bool) {
        let action = match key {
            KeyCode::KeyW => Action::MoveForward,
            KeyCode::KeyS => Action::MoveBack,
            KeyCode::KeyA => Action::MoveLeft,
            KeyCode::KeyD => Action::MoveRight,
            KeyCode::KeyQ => Action::PanLeft,
            KeyCode::KeyE => Action::PanRight,
            KeyCode::KeyF => Action::PlaceBlock,
            KeyCode::KeyR => Action::BreakBlock,
            _ => return,
        };
        if pressed && !repeat {
            self.tracker.press(action);
        } else if !pressed {
            self.tracker.release(action);
        }
    }

    fn draw_ui(&self, ctx: &EguiContext, now: f64) {
        let status = HudStatus::gather(&self.camera, &self.world, self.fps.fps(), now);
        egui::Window::new("voxrelic")
            .anchor(egui::Align2::LEFT_TOP, [8.0, 8.0])
            .resizable(false)
            .title_bar(false)
            .show(ctx, |ui| {
                ui.label(format!(
                    "pos: ({:.2}, {:.2}, {:.2})",
                    status.position[0], status.position[1], status.position[2]
                ));
                ui.label(format!("fps: {:.0}", status.fps));
                ui.label(format!(
                    "relics: {}/{}",
                    status.relics_collected, status.relics_total
                ));
                if !status.message.is_empty() {
                    ui.separator();
                    ui.label(egui::RichText::new(&status.message).strong());
                }
                ui.separator();
                ui.small("WASD move | Q/E pan | click: mouse look | F/R place/break | Esc release");
            });
    }
}

struct GpuApp {
    state: AppState,
    assets: Option<PathBuf>,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<WgpuRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(assets: Option<PathBuf>) -> Self {
        Self {
            state: AppState::new(),
            assets,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    fn set_mouse_captured(&mut self, captured: bool) {
        let Some(window) = &self.window else { return };
        if captured {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = grabbed {
                tracing::warn!("pointer capture unavailable: {e}");
                return;
            }
        } else {
            let _ = window.set_cursor_grab(CursorGrabMode::None);
        }
        window.set_cursor_visible(!captured);
        self.state.mouse_captured = captured;
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("voxrelic")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("voxrelic_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        self.state.camera.resize(size.width, size.height);

        // Texture problems are fatal here, before the first frame.
        let renderer = match WgpuRenderer::new(
            &device,
            &queue,
            surface_format,
            size.width,
            size.height,
            self.assets.as_deref(),
        ) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("renderer setup failed: {e}");
                tracing::error!("renderer setup failed: {e}");
                event_loop.exit();
                return;
            }
        };

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(egui_winit) = &mut self.egui_winit {
            let response = egui_winit.on_window_event(self.window.as_ref().unwrap(), &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                    self.state.camera.resize(config.width, config.height);
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, config.width, config.height);
                    }
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat,
                        ..
                    },
                ..
            } => {
                if key == KeyCode::Escape && key_state == ElementState::Pressed {
                    self.set_mouse_captured(false);
                    return;
                }
                self.state
                    .handle_key(key, key_state == ElementState::Pressed, repeat);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => {
                if !self.state.mouse_captured {
                    self.set_mouse_captured(true);
                }
            }
            WindowEvent::Focused(false) => {
                self.state.tracker.clear_held();
                self.set_mouse_captured(false);
            }
            WindowEvent::RedrawRequested => {
                let frame_start = Instant::now();
                let dt = (frame_start - self.state.last_frame).as_secs_f32().min(0.1);
                self.state.last_frame = frame_start;
                self.state.fps.tick(dt);

                let now = self.state.start.elapsed().as_secs_f64();
                self.state.update(now);

                let (Some(surface), Some(device), Some(queue)) =
                    (&self.surface, &self.device, &self.queue)
                else {
                    return;
                };

                let output = match surface.get_current_texture() {
                    Ok(t) => t,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(config) = &self.config {
                            surface.configure(device, config);
                        }
                        return;
                    }
                    Err(e) => {
                        tracing::error!("surface error: {e}");
                        return;
                    }
                };

                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                if let Some(renderer) = &self.renderer {
                    let calls = self.state.world.draw_list(self.state.camera.eye, now);
                    renderer.render(
                        device,
                        queue,
                        &view,
                        self.state.camera.view(),
                        self.state.camera.proj(),
                        &calls,
                    );
                }

                let raw_input = self
                    .egui_winit
                    .as_mut()
                    .unwrap()
                    .take_egui_input(self.window.as_ref().unwrap());
                let full_output = self.egui_ctx.run(raw_input, |ctx| {
                    self.state.draw_ui(ctx, now);
                });

                self.egui_winit.as_mut().unwrap().handle_platform_output(
                    self.window.as_ref().unwrap(),
                    full_output.platform_output,
                );

                let paint_jobs = self
                    .egui_ctx
                    .tessellate(full_output.shapes, full_output.pixels_per_point);

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [
                        self.config.as_ref().unwrap().width,
                        self.config.as_ref().unwrap().height,
                    ],
                    pixels_per_point: full_output.pixels_per_point,
                };

                {
                    let egui_renderer = self.egui_renderer.as_mut().unwrap();
                    for (id, image_delta) in &full_output.textures_delta.set {
                        egui_renderer.update_texture(device, queue, *id, image_delta);
                    }
                    let mut encoder =
                        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("egui_encoder"),
                        });
                    egui_renderer.update_buffers(
                        device,
                        queue,
                        &mut encoder,
                        &paint_jobs,
                        &screen_descriptor,
                    );
                    {
                        let mut pass = encoder
                            .begin_render_pass(&wgpu::RenderPassDescriptor {
                                label: Some("egui_pass"),
                                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                    view: &view,
                                    resolve_target: None,
                                    ops: wgpu::Operations {
                                        load: wgpu::LoadOp::Load,
                                        store: wgpu::StoreOp::Store,
                                    },
                                })],
                                depth_stencil_attachment: None,
                                ..Default::default()
                            })
                            .forget_lifetime();
                        egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
                    }
                    queue.submit(std::iter::once(encoder.finish()));
                    for id in &full_output.textures_delta.free {
                        egui_renderer.free_texture(id);
                    }
                }

                output.present();
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.mouse_captured {
                self.state.tracker.look(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("voxrelic-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(cli.assets);
    event_loop.run_app(&mut app)?;

    Ok(())
}
