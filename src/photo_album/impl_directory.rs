use crate::library::logger::interface::Logger;
use crate::photo_album::interface::PhotoAlbum;
use image::{DynamicImage, ImageFormat};
use std::path::PathBuf;
use std::sync::Arc;

/// Saves photos as timestamped PNG files in a folder, creating it on first save.
pub struct PhotoAlbumDirectory {
    directory: PathBuf,
    timezone: chrono::FixedOffset,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl PhotoAlbumDirectory {
    pub fn new(
        directory: impl Into<PathBuf>,
        timezone: chrono::FixedOffset,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            directory: directory.into(),
            timezone,
            logger: logger.with_namespace("photo_album.directory"),
        }
    }

    fn next_path(&self) -> PathBuf {
        let stamp = chrono::Utc::now()
            .with_timezone(&self.timezone)
            .format("%Y%m%d-%H%M%S%.3f");

        let mut path = self.directory.join(format!("photo-{}.png", stamp));
        let mut suffix = 1;
        while path.exists() {
            path = self.directory.join(format!("photo-{}-{}.png", stamp, suffix));
            suffix += 1;
        }
        path
    }
}

impl PhotoAlbum for PhotoAlbumDirectory {
    fn save(&self, image: &DynamicImage) -> Result<PathBuf, Box<dyn std::error::Error + Send + Sync>> {
        std::fs::create_dir_all(&self.directory)?;

        let path = self.next_path();
        image.save_with_format(&path, ImageFormat::Png)?;

        self.logger.info(&format!(
            "Saved {}x{} photo to {}",
            image.width(),
            image.height(),
            path.display()
        ))?;

        Ok(path)
    }
}
