use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::Command;

use shape_scene::cli::DemoCli;
use shape_scene::demo::create_figure_scene;
use shape_scene::export::StlExporter;

const VIEWER_BINARY: &str = "mesh-viewer";

/// The viewer built alongside this binary, or whatever is on PATH
fn viewer_command() -> PathBuf {
    let sibling = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(VIEWER_BINARY)))
        .map(|path| path.with_extension(std::env::consts::EXE_EXTENSION));
    match sibling {
        Some(path) if path.is_file() => path,
        _ => PathBuf::from(VIEWER_BINARY),
    }
}

fn launch_viewer(file: &Path) -> Result<()> {
    let viewer = viewer_command();
    log::info!("launching {:?} on {:?}", viewer, file);
    let status = Command::new(&viewer)
        .arg(file)
        .status()
        .with_context(|| format!("Failed to launch {:?}", viewer))?;
    if !status.success() {
        anyhow::bail!("{} exited with {}", VIEWER_BINARY, status);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = DemoCli::parse();

    let mut scene = create_figure_scene().context("Failed to build the figure")?;
    let exporter = StlExporter::with_format(cli.format());
    scene
        .export_with(&exporter, &cli.output)
        .with_context(|| format!("Failed to export {:?}", cli.output))?;
    println!("Scene exported to {}", cli.output.display());

    if cli.view {
        launch_viewer(&cli.output)?;
    }
    Ok(())
}
