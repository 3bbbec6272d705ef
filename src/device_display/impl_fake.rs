use crate::device_display::interface::DeviceDisplay;
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// Records what was shown so tests can inspect it after the display has
/// been handed to the app.
pub struct DeviceDisplayFake {
    pub texts: Arc<Mutex<Vec<String>>>,
    pub images: Arc<Mutex<Vec<(u32, u32)>>>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceDisplayFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            texts: Arc::new(Mutex::new(Vec::new())),
            images: Arc::new(Mutex::new(Vec::new())),
            logger: logger.with_namespace("display.fake"),
        }
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.logger.info("DeviceDisplayFake::init()")?;
        Ok(())
    }

    fn show_image(&mut self, image: &DynamicImage) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.logger.info(&format!(
            "DeviceDisplayFake::show_image({}x{})",
            image.width(),
            image.height()
        ))?;
        self.images
            .lock()
            .map_err(|_| "image log poisoned")?
            .push((image.width(), image.height()));
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.logger
            .info(&format!("DeviceDisplayFake::write_text({})", text))?;
        self.texts
            .lock()
            .map_err(|_| "text log poisoned")?
            .push(text.to_string());
        Ok(())
    }
}
