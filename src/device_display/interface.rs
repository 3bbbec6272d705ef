use image::DynamicImage;
use std::error::Error;

/// The photo view and the result label beneath it.
pub trait DeviceDisplay: Send + Sync {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Replace the photo view contents. The image is already upright.
    fn show_image(&mut self, image: &DynamicImage) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Replace the label text.
    fn write_text(&mut self, text: &str) -> Result<(), Box<dyn Error + Send + Sync>>;
}
