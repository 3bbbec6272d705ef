use crate::app::UiAction;
use crate::device_display::interface::DeviceDisplay;
use eframe::egui;
use image::DynamicImage;
use std::error::Error;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

const PHOTO_VIEW_SIZE: f32 = 300.0;

#[derive(Default)]
struct Screen {
    new_photo: Option<egui::ColorImage>,
    text: String,
}

fn lock(screen: &Mutex<Screen>) -> MutexGuard<'_, Screen> {
    screen.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The native window. Must run on the main thread; the controller talks to
/// it through a [`DeviceDisplayGui`] and hears back through `UiAction`s.
pub struct PhotoWindow {
    screen: Arc<Mutex<Screen>>,
    actions: Sender<UiAction>,
    texture: Option<egui::TextureHandle>,
}

impl PhotoWindow {
    pub fn run(self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([PHOTO_VIEW_SIZE + 60.0, PHOTO_VIEW_SIZE + 180.0])
                .with_resizable(false),
            ..Default::default()
        };

        eframe::run_native("Photo Classifier", options, Box::new(|_cc| Box::new(self)))
            .map_err(|e| e.to_string())?;

        Ok(())
    }

    fn send(&self, action: UiAction) {
        // the controller is gone once it has handled Quit
        let _ = self.actions.send(action);
    }
}

/// Scale to fit inside a square view, keeping the aspect ratio.
fn fit_size(width: usize, height: usize) -> egui::Vec2 {
    let scale = PHOTO_VIEW_SIZE / width.max(height).max(1) as f32;
    egui::vec2(width as f32 * scale, height as f32 * scale)
}

impl eframe::App for PhotoWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let (new_photo, text) = {
            let mut screen = lock(&self.screen);
            (screen.new_photo.take(), screen.text.clone())
        };

        if let Some(photo) = new_photo {
            self.texture = Some(ctx.load_texture("photo", photo, egui::TextureOptions::default()));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(10.0);

                match &self.texture {
                    Some(texture) => {
                        let [width, height] = texture.size();
                        ui.image(egui::load::SizedTexture::new(
                            texture.id(),
                            fit_size(width, height),
                        ));
                    }
                    None => {
                        ui.add_space(PHOTO_VIEW_SIZE);
                    }
                }

                ui.add_space(10.0);
                ui.label(egui::RichText::new(text).size(18.0));
                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    if ui.button("Camera").clicked() {
                        self.send(UiAction::TakePicture);
                    }
                    if ui.button("Album").clicked() {
                        self.send(UiAction::ShowAlbum);
                    }
                    if ui.button("Save").clicked() {
                        self.send(UiAction::SavePicture);
                    }
                });
            });
        });

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

/// Large photos are shrunk to twice the view size; small ones are kept as is.
fn shrink_to_view(image: &DynamicImage) -> DynamicImage {
    let view = PHOTO_VIEW_SIZE as u32 * 2;
    if image.width() > view || image.height() > view {
        image.thumbnail(view, view)
    } else {
        image.clone()
    }
}

pub struct DeviceDisplayGui {
    screen: Arc<Mutex<Screen>>,
}

impl DeviceDisplayGui {
    pub fn new() -> Self {
        Self {
            screen: Arc::new(Mutex::new(Screen::default())),
        }
    }

    pub fn window(&self, actions: Sender<UiAction>) -> PhotoWindow {
        PhotoWindow {
            screen: self.screen.clone(),
            actions,
            texture: None,
        }
    }
}

impl DeviceDisplay for DeviceDisplayGui {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        *lock(&self.screen) = Screen::default();
        Ok(())
    }

    fn show_image(&mut self, image: &DynamicImage) -> Result<(), Box<dyn Error + Send + Sync>> {
        let rgba = shrink_to_view(image).to_rgba8();
        let size = [rgba.width() as usize, rgba.height() as usize];

        lock(&self.screen).new_photo = Some(egui::ColorImage::from_rgba_unmultiplied(
            size,
            rgba.as_raw(),
        ));
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        lock(&self.screen).text = text.to_string();
        Ok(())
    }
}
