//! Interactive mesh viewer: a winit window rendering one mesh with wgpu,
//! with egui menus for display settings, screenshots and reloading.

mod app;
pub mod autopan;
pub mod camera;
pub mod config;
pub mod dialogs;
pub mod geometry;
pub mod lighting;
pub mod renderer;
pub mod timer;
pub mod ui;

pub use app::ViewerApp;
pub use camera::OrbitCamera;
pub use config::ViewerConfig;
pub use lighting::EnvironmentLight;

use crate::mesh::Mesh;

/// Show `mesh` in a window configured by `config`; blocks until closed
pub fn run(config: ViewerConfig, mesh: Mesh) -> anyhow::Result<()> {
    ViewerApp::new(config, mesh)?.run()
}
