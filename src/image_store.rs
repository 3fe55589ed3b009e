//! The well-known file holding the picture currently on display.
//!
//! The presence of this file is the only state that survives a restart: it
//! decides whether the frame starts on the picture or on the prompt screen.

use anyhow::{Context, Result};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Handle to the current-image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageStore {
    path: PathBuf,
}

impl ImageStore {
    /// Create a store for the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the current image.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the current image.
    ///
    /// Temporary generator output is placed here so that publishing is a
    /// same-filesystem rename.
    pub fn directory(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    /// Whether an image currently exists.
    pub fn has_image(&self) -> bool {
        self.path.is_file()
    }

    /// Create the directory holding the image if it is missing.
    pub fn ensure_directory(&self) -> Result<()> {
        let dir = self.directory();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create picture directory: {:?}", dir))
    }

    /// Replace the current image with `source` in a single rename.
    ///
    /// `source` must live on the same filesystem as the store (see
    /// [`ImageStore::directory`]). Readers see either the old file or the new
    /// one, never a partial write.
    pub fn publish(&self, source: &Path) -> Result<()> {
        self.ensure_directory()?;
        std::fs::rename(source, &self.path).with_context(|| {
            format!("Failed to move {:?} into place at {:?}", source, self.path)
        })?;
        info!("Published new image to {:?}", self.path);
        Ok(())
    }

    /// Decode the current image for display.
    pub fn load(&self) -> Result<DynamicImage> {
        debug!("Loading image from {:?}", self.path);
        image::open(&self.path).with_context(|| format!("Failed to load image {:?}", self.path))
    }

    /// Last modification time of the current image, if any.
    pub fn modified(&self) -> Option<std::time::SystemTime> {
        std::fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_has_image_reflects_file_presence() {
        let temp_dir = TempDir::new().unwrap();
        let store = ImageStore::new(temp_dir.path().join("current_image.png"));
        assert!(!store.has_image());

        std::fs::write(store.path(), b"png").unwrap();
        assert!(store.has_image());
    }

    #[test]
    fn test_directory_at_image_path_is_not_an_image() {
        let temp_dir = TempDir::new().unwrap();
        let store = ImageStore::new(temp_dir.path().join("current_image.png"));
        std::fs::create_dir_all(store.path()).unwrap();
        assert!(!store.has_image());
    }

    #[test]
    fn test_publish_replaces_existing_image() {
        let temp_dir = TempDir::new().unwrap();
        let store = ImageStore::new(temp_dir.path().join("pictures").join("current_image.png"));

        let first = temp_dir.path().join("first.png");
        std::fs::write(&first, b"first").unwrap();
        store.publish(&first).unwrap();
        assert_eq!(std::fs::read(store.path()).unwrap(), b"first");

        let second = store.directory().join("second.png");
        std::fs::write(&second, b"second image").unwrap();
        store.publish(&second).unwrap();

        assert_eq!(std::fs::read(store.path()).unwrap(), b"second image");
        assert!(!second.exists());
    }

    #[test]
    fn test_load_rejects_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = ImageStore::new(temp_dir.path().join("current_image.png"));
        std::fs::write(store.path(), b"definitely not a png").unwrap();
        assert!(store.load().is_err());
    }

    #[test]
    fn test_load_decodes_png() {
        let temp_dir = TempDir::new().unwrap();
        let store = ImageStore::new(temp_dir.path().join("current_image.png"));
        let img = image::RgbImage::from_pixel(4, 2, image::Rgb([10, 20, 30]));
        img.save(store.path()).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.width(), 4);
        assert_eq!(loaded.height(), 2);
    }
}
