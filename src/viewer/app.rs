use anyhow::{anyhow, Context};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalPosition,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use super::autopan::AutoPan;
use super::camera::{OrbitCamera, ORBIT_SENSITIVITY};
use super::config::ViewerConfig;
use super::dialogs::{pick_mesh_path, pick_screenshot_path};
use super::lighting::EnvironmentLight;
use super::renderer::{FrameSettings, MeshRenderer};
use super::ui::{step_quality, UiAction, UiStatus, ViewerUi};
use crate::loaders::load_mesh;
use crate::mesh::Mesh;

/// Pixels of touchpad scroll per zoom line
const PIXELS_PER_LINE: f32 = 50.0;

/// Camera looking at the mesh centroid from five times its size
fn initial_camera(mesh: &Mesh, fov: f32) -> OrbitCamera {
    let centroid = mesh.centroid().as_vec3();
    match mesh.bounds() {
        Some(bounds) => OrbitCamera::framing(&bounds, centroid, fov),
        None => OrbitCamera::new(centroid, 2.0, fov),
    }
}

/// Interactive viewer application, driven by the winit event loop
pub struct ViewerApp {
    config: ViewerConfig,
    mesh: Mesh,
    file_path: PathBuf,
    window: Option<Arc<Window>>,
    renderer: Option<MeshRenderer>,
    camera: OrbitCamera,
    autopan: AutoPan,
    ui: ViewerUi,
    settings: FrameSettings,
    quality: u32,
    last_frame_time: Instant,
    dragging: bool,
    last_cursor: Option<PhysicalPosition<f64>>,
    init_error: Option<anyhow::Error>,
}

impl ViewerApp {
    /// Build the application state; colors must already be validated
    pub fn new(config: ViewerConfig, mesh: Mesh) -> anyhow::Result<Self> {
        let settings = FrameSettings {
            background: config.background_rgba()?,
            model_color: config.model_rgba()?,
            light: EnvironmentLight::default(),
            show_axes: true,
            show_outline: false,
        };
        Ok(Self {
            camera: initial_camera(&mesh, config.fov),
            autopan: AutoPan::new(config.autopan_speed),
            quality: config.clamped_quality(),
            file_path: config.file_path.clone(),
            config,
            mesh,
            window: None,
            renderer: None,
            ui: ViewerUi::new(),
            settings,
            last_frame_time: Instant::now(),
            dragging: false,
            last_cursor: None,
            init_error: None,
        })
    }

    /// Open the window and run until it is closed
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.run_app(&mut self)?;
        match self.init_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    fn status(&self) -> UiStatus {
        UiStatus {
            file_name: self.file_path.display().to_string(),
            background: self.settings.background,
            model_color: self.settings.model_color,
            autopan_enabled: self.autopan.is_enabled(),
            autopan_speed: self.autopan.speed(),
            outline_visible: self.settings.show_outline,
            quality: self.quality,
            sample_count: self.renderer.as_ref().map_or(1, |r| r.sample_count()),
            light: self.settings.light,
        }
    }

    /// Apply one UI request; errors are reported by the caller
    fn apply(&mut self, action: UiAction, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        match action {
            UiAction::ToggleAxes => self.settings.show_axes = !self.settings.show_axes,
            UiAction::SetBackground(color) => self.settings.background = color,
            UiAction::SetModelColor(color) => self.settings.model_color = color,
            UiAction::SetAutopan(enabled) => self.autopan.set_enabled(enabled),
            UiAction::SetAutopanSpeed(speed) => self.autopan.set_speed(speed),
            UiAction::IncreaseQuality => self.change_quality(true)?,
            UiAction::DecreaseQuality => self.change_quality(false)?,
            UiAction::SetOutline(visible) => self.settings.show_outline = visible,
            UiAction::SaveScreenshot => {
                if let Some(path) = pick_screenshot_path(&self.file_path) {
                    self.save_screenshot(&path)?;
                }
            }
            UiAction::OpenMesh => {
                if let Some(path) = pick_mesh_path(&self.file_path) {
                    self.reload_mesh(path)?;
                }
            }
            UiAction::SetLighting(light) => self.settings.light = light,
            UiAction::Exit => event_loop.exit(),
        }
        Ok(())
    }

    fn change_quality(&mut self, increase: bool) -> anyhow::Result<()> {
        let Some(quality) = step_quality(self.quality, increase) else {
            return Ok(());
        };
        let renderer = self.renderer.as_mut().context("Renderer is not initialized")?;
        // Camera pose lives outside the renderer and survives the rebuild
        let samples = renderer.set_quality(quality);
        self.quality = quality;
        self.ui.show_info(format!(
            "Quality {} to {} ({} samples).",
            if increase { "increased" } else { "decreased" },
            quality,
            samples
        ));
        Ok(())
    }

    fn save_screenshot(&mut self, path: &Path) -> anyhow::Result<()> {
        let renderer = self.renderer.as_mut().context("Renderer is not initialized")?;
        let image = renderer.capture(&self.camera, &self.settings)?;
        image
            .save(path)
            .with_context(|| format!("Failed to save screenshot: {:?}", path))?;
        log::info!("screenshot saved to {:?}", path);
        self.ui.show_info("Screenshot saved successfully.");
        Ok(())
    }

    fn reload_mesh(&mut self, path: PathBuf) -> anyhow::Result<()> {
        let mesh = load_mesh(&path)?;
        let bounds = mesh
            .bounds()
            .with_context(|| format!("{:?} contains no vertices", path))?;

        if let Some(renderer) = self.renderer.as_mut() {
            renderer.set_mesh(&mesh);
        }
        self.camera.refocus(&bounds, mesh.centroid().as_vec3());
        self.settings.show_outline = false;
        if let Some(window) = &self.window {
            window.set_title(&path.display().to_string());
        }
        self.mesh = mesh;
        self.file_path = path;
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;

        let pan = self.autopan.update(delta);
        if pan != 0.0 {
            self.camera.orbit(pan, 0.0);
        }

        let status = self.status();
        let (Some(renderer), Some(window)) = (self.renderer.as_mut(), self.window.as_ref()) else {
            return;
        };
        let ui = &mut self.ui;
        let mut actions = Vec::new();
        let result = renderer.render(window, &self.camera, &self.settings, |ctx| {
            actions = ui.show(ctx, &status);
        });

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                renderer.resize(window.inner_size());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Render error: out of memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {}", e),
        }

        for action in actions {
            if let Err(e) = self.apply(action, event_loop) {
                log::error!("{:#}", e);
                self.ui.show_error(format!("{:#}", e));
            }
        }
    }

    fn handle_pointer(&mut self, event: &WindowEvent, egui_consumed: bool) {
        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed if !egui_consumed => {
                    self.dragging = true;
                    self.autopan.pointer_pressed();
                }
                ElementState::Released => {
                    self.dragging = false;
                    self.autopan.pointer_released();
                }
                _ => {}
            },
            WindowEvent::CursorMoved { position, .. } => {
                if let (true, Some(last)) = (self.dragging, self.last_cursor) {
                    let dx = (position.x - last.x) as f32;
                    let dy = (position.y - last.y) as f32;
                    self.camera
                        .orbit(-dx * ORBIT_SENSITIVITY, dy * ORBIT_SENSITIVITY);
                }
                self.last_cursor = Some(*position);
            }
            WindowEvent::MouseWheel { delta, .. } if !egui_consumed => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
                };
                self.camera.zoom(lines);
            }
            _ => {}
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title(self.file_path.display().to_string())
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.window_width,
                    self.config.window_height,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.init_error = Some(anyhow!("Failed to create window: {}", e));
                event_loop.exit();
                return;
            }
        };

        let renderer = match pollster::block_on(MeshRenderer::new(
            window.clone(),
            &self.mesh,
            self.quality,
        )) {
            Ok(r) => r,
            Err(e) => {
                self.init_error = Some(anyhow!("Failed to initialize renderer: {}", e));
                event_loop.exit();
                return;
            }
        };

        log::info!(
            "viewer ready: {} triangles, camera distance {:.2}",
            self.mesh.triangle_count(),
            self.camera.distance
        );
        self.window = Some(window);
        self.renderer = Some(renderer);
        self.last_frame_time = Instant::now();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        let egui_consumed = match (&mut self.renderer, &self.window) {
            (Some(renderer), Some(window)) => {
                renderer.handle_event(window, &event) || renderer.egui_wants_pointer()
            }
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } if !egui_consumed => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            ref pointer => self.handle_pointer(pointer, egui_consumed),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
