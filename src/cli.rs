// cli.rs - Command-line interfaces for the demo and the viewer
use clap::Parser;
use std::path::PathBuf;

use crate::error::Result;
use crate::export::StlFormat;
use crate::viewer::ViewerConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "shape-scene")]
#[command(about = "Assemble the reference figure and export it as STL", long_about = None)]
pub struct DemoCli {
    /// Destination STL file
    #[arg(short, long, default_value = "./target/model.stl")]
    pub output: PathBuf,

    /// Write ASCII STL instead of binary
    #[arg(long, default_value = "false")]
    pub ascii: bool,

    /// Open the exported file in mesh-viewer
    #[arg(long, default_value = "false")]
    pub view: bool,
}

impl DemoCli {
    pub fn format(&self) -> StlFormat {
        if self.ascii {
            StlFormat::Ascii
        } else {
            StlFormat::Binary
        }
    }
}

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "mesh-viewer")]
#[command(about = "Interactive 3D mesh viewer", long_about = None)]
pub struct ViewerCli {
    /// Mesh file to display (STL, OBJ, OFF, glTF)
    pub file: Option<PathBuf>,

    /// JSON file with viewer settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Vertical field of view in degrees
    #[arg(long)]
    pub fov: Option<f32>,

    /// Initial window width
    #[arg(long)]
    pub width: Option<u32>,

    /// Initial window height
    #[arg(long)]
    pub height: Option<u32>,

    /// Background color name or #rrggbb
    #[arg(long)]
    pub background: Option<String>,

    /// Antialiasing quality (0-16)
    #[arg(long)]
    pub quality: Option<u32>,
}

impl ViewerCli {
    /// Defaults, then the JSON file, then flags. Not validated.
    pub fn viewer_config(&self) -> Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::from_json_file(path)?,
            None => ViewerConfig::default(),
        };
        if let Some(file) = &self.file {
            config.file_path = file.clone();
        }
        if let Some(fov) = self.fov {
            config.fov = fov;
        }
        if let Some(width) = self.width {
            config.window_width = width;
        }
        if let Some(height) = self.height {
            config.window_height = height;
        }
        if let Some(background) = &self.background {
            config.background_color = background.clone();
        }
        if let Some(quality) = self.quality {
            config.quality = quality;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::io::Write;

    #[test]
    fn demo_defaults() {
        let cli = DemoCli::parse_from(["shape-scene"]);
        assert_eq!(cli.output, PathBuf::from("./target/model.stl"));
        assert_eq!(cli.format(), StlFormat::Binary);
        assert!(!cli.view);
    }

    #[test]
    fn demo_ascii_flag() {
        let cli = DemoCli::parse_from(["shape-scene", "--ascii", "-o", "out.stl"]);
        assert_eq!(cli.format(), StlFormat::Ascii);
        assert_eq!(cli.output, PathBuf::from("out.stl"));
    }

    #[test]
    fn viewer_without_arguments_uses_defaults() {
        let cli = ViewerCli::parse_from(["mesh-viewer"]);
        assert_eq!(cli.viewer_config().unwrap(), ViewerConfig::default());
    }

    #[test]
    fn flags_override_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"fov": 60.0, "window_width": 1024, "background_color": "white"}}"#)
            .unwrap();

        let args: Vec<OsString> = vec![
            "mesh-viewer".into(),
            "part.obj".into(),
            "--config".into(),
            file.path().into(),
            "--fov".into(),
            "30".into(),
        ];
        let cli = ViewerCli::parse_from(args);
        let config = cli.viewer_config().unwrap();

        assert_eq!(config.file_path, PathBuf::from("part.obj"));
        assert_eq!(config.fov, 30.0);
        assert_eq!(config.window_width, 1024);
        assert_eq!(config.window_height, 600);
        assert_eq!(config.background_color, "white");
    }
}
