use crate::classification::orientation::Orientation;
use image::DynamicImage;

/// A decoded photo plus the raw EXIF-style orientation code it was
/// captured with. The code is kept unresolved so the pipeline can reject
/// tags it does not understand.
#[derive(Debug, Clone)]
pub struct ImageSample {
    image: DynamicImage,
    orientation_code: u32,
}

impl ImageSample {
    pub fn new(image: DynamicImage, orientation: Orientation) -> Self {
        Self {
            image,
            orientation_code: orientation.exif_code(),
        }
    }

    pub fn with_orientation_code(image: DynamicImage, orientation_code: u32) -> Self {
        Self {
            image,
            orientation_code,
        }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn orientation_code(&self) -> u32 {
        self.orientation_code
    }
}
