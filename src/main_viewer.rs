use clap::Parser;
use std::process;

use shape_scene::cli::ViewerCli;
use shape_scene::loaders::load_mesh;
use shape_scene::viewer;

fn main() {
    env_logger::init();
    let cli = ViewerCli::parse();

    let config = match cli.viewer_config().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    let mesh = match load_mesh(&config.file_path) {
        Ok(mesh) => mesh,
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(1);
        }
    };

    if let Err(e) = viewer::run(config, mesh) {
        eprintln!("Viewer error: {:#}", e);
        process::exit(1);
    }
}
