use crate::library::logger::interface::Logger;
use crate::photo_album::interface::PhotoAlbum;
use image::DynamicImage;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub struct PhotoAlbumFake {
    pub saved: Arc<AtomicUsize>,
    failing: bool,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl PhotoAlbumFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            saved: Arc::new(AtomicUsize::new(0)),
            failing: false,
            logger: logger.with_namespace("photo_album.fake"),
        }
    }

    pub fn failing(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            failing: true,
            ..Self::new(logger)
        }
    }
}

impl PhotoAlbum for PhotoAlbumFake {
    fn save(&self, image: &DynamicImage) -> Result<PathBuf, Box<dyn std::error::Error + Send + Sync>> {
        if self.failing {
            return Err("album is read-only".into());
        }

        let count = self.saved.fetch_add(1, Ordering::SeqCst) + 1;
        self.logger.info(&format!(
            "PhotoAlbumFake::save({}x{}) #{}",
            image.width(),
            image.height(),
            count
        ))?;

        Ok(PathBuf::from(format!("fake-album/photo-{}.png", count)))
    }
}
