use crate::classification::decode::decode_sample;
use crate::classification::sample::ImageSample;
use crate::image_source::interface::{ImageSource, SourceKind};
use crate::library::logger::interface::Logger;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "webp", "bmp", "tiff"];

/// A photo library backed by a folder. Each pick returns the next image
/// file in name order, wrapping around at the end.
pub struct ImageSourceDirectory {
    directory: PathBuf,
    cursor: AtomicUsize,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageSourceDirectory {
    pub fn new(directory: impl Into<PathBuf>, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            directory: directory.into(),
            cursor: AtomicUsize::new(0),
            logger: logger.with_namespace("image_source.directory"),
        }
    }
}

/// Image files directly inside `directory`, sorted by name.
pub fn image_files(directory: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error + Send + Sync>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let path = entry?.path();
        if path.is_file() && has_image_extension(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

impl ImageSource for ImageSourceDirectory {
    fn kind(&self) -> SourceKind {
        SourceKind::Library
    }

    fn is_available(&self) -> bool {
        self.directory.is_dir()
    }

    fn pick(&self) -> Result<Option<ImageSample>, Box<dyn std::error::Error + Send + Sync>> {
        let files = image_files(&self.directory)?;
        if files.is_empty() {
            self.logger.info(&format!(
                "No photos in {}, nothing to pick",
                self.directory.display()
            ))?;
            return Ok(None);
        }

        let index = self.cursor.fetch_add(1, Ordering::SeqCst) % files.len();
        let path = &files[index];
        self.logger.info(&format!("Picked {}", path.display()))?;

        let bytes = std::fs::read(path)?;
        let sample = decode_sample(&bytes)?;

        Ok(Some(sample))
    }
}
