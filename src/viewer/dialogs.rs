//! Native file pickers for screenshots and mesh reloading.

use std::path::{Path, PathBuf};

use crate::loaders::SUPPORTED_EXTENSIONS;

const SCREENSHOT_NAME: &str = "screenshot.png";

/// Ask where to save a screenshot; `None` when cancelled
pub fn pick_screenshot_path(current_mesh: &Path) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Save Screenshot")
        .add_filter("PNG image", &["png"])
        .set_file_name(SCREENSHOT_NAME);
    if let Some(dir) = start_directory(current_mesh) {
        dialog = dialog.set_directory(dir);
    }
    dialog.save_file().map(|path| png_path(&path))
}

/// Ask for a mesh file to load; `None` when cancelled
pub fn pick_mesh_path(current_mesh: &Path) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Open 3D Model")
        .add_filter("3D model", SUPPORTED_EXTENSIONS)
        .add_filter("All files", &["*"]);
    if let Some(dir) = start_directory(current_mesh) {
        dialog = dialog.set_directory(dir);
    }
    dialog.pick_file()
}

/// Screenshots are always written as PNG
pub fn png_path(path: &Path) -> PathBuf {
    path.with_extension("png")
}

/// Directory of the mesh on screen, when it has one
fn start_directory(current_mesh: &Path) -> Option<&Path> {
    current_mesh
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty() && dir.is_dir())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_extension_is_forced() {
        assert_eq!(png_path(Path::new("shot")), PathBuf::from("shot.png"));
        assert_eq!(png_path(Path::new("dir/shot.jpg")), PathBuf::from("dir/shot.png"));
        assert_eq!(png_path(Path::new("shot.png")), PathBuf::from("shot.png"));
    }

    #[test]
    fn start_directory_follows_current_mesh() {
        let dir = tempfile::tempdir().unwrap();
        let mesh = dir.path().join("model.stl");
        assert_eq!(start_directory(&mesh), Some(dir.path()));
        assert_eq!(start_directory(Path::new("model.stl")), None);
        assert_eq!(start_directory(Path::new("/no/such/dir/model.stl")), None);
    }
}
