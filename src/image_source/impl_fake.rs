use crate::classification::orientation::Orientation;
use crate::classification::sample::ImageSample;
use crate::image_source::interface::{ImageSource, SourceKind};
use crate::library::logger::interface::Logger;
use image::{DynamicImage, ImageBuffer, Rgb};
use rand::Rng;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

enum Frames {
    Random { width: u32, height: u32 },
    Scripted(Mutex<VecDeque<ImageSample>>),
}

/// Produces solid-color frames with a random orientation tag, or replays a
/// fixed list of samples and then reports the picker as cancelled.
pub struct ImageSourceFake {
    kind: SourceKind,
    available: bool,
    frames: Frames,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageSourceFake {
    pub fn new(
        kind: SourceKind,
        frame_size: (u32, u32),
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            kind,
            available: true,
            frames: Frames::Random {
                width: frame_size.0,
                height: frame_size.1,
            },
            logger: logger.with_namespace("image_source.fake"),
        }
    }

    #[allow(dead_code)]
    pub fn scripted(
        kind: SourceKind,
        samples: Vec<ImageSample>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            kind,
            available: true,
            frames: Frames::Scripted(Mutex::new(samples.into())),
            logger: logger.with_namespace("image_source.fake"),
        }
    }

    #[allow(dead_code)]
    pub fn unavailable(kind: SourceKind, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            available: false,
            ..Self::scripted(kind, vec![], logger)
        }
    }
}

impl ImageSource for ImageSourceFake {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn pick(&self) -> Result<Option<ImageSample>, Box<dyn std::error::Error + Send + Sync>> {
        if !self.available {
            return Err(format!("{:?} is not available", self.kind).into());
        }

        match &self.frames {
            Frames::Random { width, height } => {
                let mut rng = rand::rng();
                let color = Rgb::<u8>([rng.random(), rng.random(), rng.random()]);
                // cameras report UIKit-numbered orientations
                let ui_code = rng.random_range(0..Orientation::ALL.len() as u32);
                let orientation = Orientation::from_ui_code(ui_code).unwrap_or_default();

                self.logger.info(&format!(
                    "Capturing {}x{} frame {:?} with UI orientation {} ({:?})",
                    width, height, color.0, ui_code, orientation
                ))?;

                let image = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(*width, *height, color));
                Ok(Some(ImageSample::new(image, orientation)))
            }
            Frames::Scripted(samples) => {
                let next = samples
                    .lock()
                    .map_err(|_| "scripted frames poisoned")?
                    .pop_front();

                if next.is_none() {
                    self.logger.info("No more scripted frames, picker cancelled")?;
                }
                Ok(next)
            }
        }
    }
}
