use image::DynamicImage;
use std::path::PathBuf;

pub trait PhotoAlbum: Send + Sync {
    /// Stores the photo and returns where it ended up.
    fn save(&self, image: &DynamicImage) -> Result<PathBuf, Box<dyn std::error::Error + Send + Sync>>;
}
