use crate::classification::delivery::{CancelHandle, ClassificationOutcome};
use crate::classification::orientation::Orientation;
use crate::classification::pipeline::ClassificationPipeline;
use crate::classification::sample::ImageSample;
use crate::config::Config;
use crate::device_display::interface::DeviceDisplay;
use crate::image_classifier::model::ModelHandle;
use crate::image_source::interface::ImageSource;
use crate::library::logger::interface::Logger;
use crate::photo_album::interface::PhotoAlbum;
use crate::presentation::PresentationPolicy;
use image::DynamicImage;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const GREETING: &str = "Tap [Camera] or [Album] to pick a picture";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    TakePicture,
    ShowAlbum,
    SavePicture,
    Quit,
}

impl UiAction {
    pub fn from_command(command: &str) -> Option<Self> {
        match command.trim().to_ascii_lowercase().as_str() {
            "c" | "camera" => Some(UiAction::TakePicture),
            "a" | "album" => Some(UiAction::ShowAlbum),
            "s" | "save" => Some(UiAction::SavePicture),
            "q" | "quit" | "exit" => Some(UiAction::Quit),
            _ => None,
        }
    }
}

pub type SharedDisplay = Arc<Mutex<dyn DeviceDisplay>>;

pub struct Devices {
    pub camera: Arc<dyn ImageSource>,
    pub library: Arc<dyn ImageSource>,
    pub album: Arc<dyn PhotoAlbum>,
    pub display: SharedDisplay,
}

pub struct App {
    logger: Arc<dyn Logger + Send + Sync>,
    devices: Devices,
    pipeline: ClassificationPipeline,
    policy: PresentationPolicy,
    model: ModelHandle,
    current_image: Mutex<Option<DynamicImage>>,
    pending: Mutex<Option<CancelHandle>>,
    /// Bumped on every picked photo. A result may only reach the display
    /// while its generation is still current.
    generation: Arc<AtomicU64>,
}

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl App {
    pub fn new(
        config: &Config,
        logger: Arc<dyn Logger + Send + Sync>,
        devices: Devices,
        model: ModelHandle,
    ) -> Self {
        Self {
            logger: logger.with_namespace("app"),
            devices,
            pipeline: ClassificationPipeline::new(config.pipeline.clone()),
            policy: config.presentation.clone(),
            model,
            current_image: Mutex::new(None),
            pending: Mutex::new(None),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info("Starting app...")?;
        match self.model.model() {
            Ok(model) => self.logger.info(&format!("Using model {}", model.name()))?,
            Err(e) => self.logger.error(&format!("Classification unavailable: {}", e))?,
        }
        let mut display = lock(&self.devices.display);
        display.init()?;
        display.write_text(GREETING)?;
        Ok(())
    }

    /// Handles actions until `Quit` or until every sender is gone.
    pub fn run(&self, actions: Receiver<UiAction>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.start()?;

        for action in actions {
            if !self.handle(action)? {
                break;
            }
        }

        self.settle();
        self.logger.info("App stopped")?;
        Ok(())
    }

    /// Returns false once the app should stop.
    pub fn handle(&self, action: UiAction) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info(&format!("Handling {:?}", action))?;

        match action {
            UiAction::TakePicture => self.pick_and_classify(&self.devices.camera)?,
            UiAction::ShowAlbum => self.pick_and_classify(&self.devices.library)?,
            UiAction::SavePicture => self.save_picture()?,
            UiAction::Quit => return Ok(false),
        }

        Ok(true)
    }

    /// Blocks until the latest classification, if any, has been delivered.
    pub fn settle(&self) {
        let pending = lock(&self.pending).take();
        if let Some(pending) = pending {
            pending.join();
        }
    }

    fn write_text(&self, text: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        lock(&self.devices.display).write_text(text)
    }

    fn pick_and_classify(
        &self,
        source: &Arc<dyn ImageSource>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if !source.is_available() {
            self.logger
                .error(&format!("{:?} source is not available", source.kind()))?;
            return self.write_text("error");
        }

        let sample = match source.pick() {
            Ok(Some(sample)) => sample,
            Ok(None) => {
                self.logger.info("Picker cancelled")?;
                return Ok(());
            }
            Err(e) => {
                self.logger
                    .error(&format!("{:?} source failed: {}", source.kind(), e))?;
                return self.write_text("error");
            }
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let upright = upright_image(&sample);
        lock(&self.devices.display).show_image(&upright)?;
        *lock(&self.current_image) = Some(upright);

        self.cancel_pending()?;
        self.write_text("Classifying...")?;

        let handle = self.pipeline.classify_with(
            sample,
            self.model.clone(),
            deliver_to_display(
                self.devices.display.clone(),
                self.policy.clone(),
                self.logger.clone(),
                (self.generation.clone(), generation),
            ),
        );
        *lock(&self.pending) = Some(handle);

        Ok(())
    }

    fn cancel_pending(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let previous = lock(&self.pending).take();
        if let Some(previous) = previous {
            if previous.cancel() {
                self.logger.info("Discarded stale classification")?;
            } else if !previous.is_finished() {
                self.logger
                    .info("Stale classification still finishing, its result will not be shown")?;
            }
        }
        Ok(())
    }

    fn save_picture(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let image = lock(&self.current_image).clone();

        let Some(image) = image else {
            self.logger.error("Nothing to save yet")?;
            return self.write_text("image Failed !");
        };

        match self.devices.album.save(&image) {
            Ok(path) => {
                self.logger.info(&format!("Saved to {}", path.display()))?;
                self.write_text("Save Succeeded")
            }
            Err(e) => {
                self.logger.error(&format!("Save failed: {}", e))?;
                self.write_text("Save Failed !")
            }
        }
    }
}

/// The photo as the user expects to see it. Unknown tags are shown raw and
/// left for the pipeline to reject.
fn upright_image(sample: &ImageSample) -> DynamicImage {
    match Orientation::from_exif(sample.orientation_code()) {
        Some(orientation) => orientation.apply(sample.image()),
        None => sample.image().clone(),
    }
}

fn deliver_to_display(
    display: SharedDisplay,
    policy: PresentationPolicy,
    logger: Arc<dyn Logger + Send + Sync>,
    (current, generation): (Arc<AtomicU64>, u64),
) -> impl FnOnce(ClassificationOutcome) + Send + 'static {
    move |outcome| {
        let _ = match &outcome {
            Ok(result) => logger.info(&format!(
                "Top result {} at {:.4} of {} labels",
                result.top().label,
                result.top().confidence,
                result.len()
            )),
            Err(e) => logger.error(&format!("Classification failed: {}", e)),
        };

        let text = policy.describe_outcome(&outcome);
        let mut display = lock(&display);
        if current.load(Ordering::SeqCst) != generation {
            let _ = logger.info("Dropped result for a photo that was replaced");
            return;
        }
        if let Err(e) = display.write_text(&text) {
            let _ = logger.error(&format!("Could not show result: {}", e));
        }
    }
}
