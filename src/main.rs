use app::{App, Devices, SharedDisplay, UiAction};
use classification::pipeline::ClassificationPipeline;
use clap::Parser;
use cli::{Cli, Command};
use config::{Config, DisplayKind};
use device_display::impl_console::DeviceDisplayConsole;
use device_display::impl_gui::DeviceDisplayGui;
use image_classifier::model::{shared_model, ModelHandle};
use image_source::impl_directory::ImageSourceDirectory;
use image_source::impl_fake::ImageSourceFake;
use image_source::interface::SourceKind;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use photo_album::impl_directory::PhotoAlbumDirectory;
use std::sync::mpsc::{channel, Sender};
use std::sync::{Arc, Mutex};

mod app;
mod batch;
mod classification;
mod cli;
mod config;
mod device_display;
mod image_classifier;
mod image_source;
mod library;
mod photo_album;
mod presentation;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let config = cli.apply(Config::default());

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new(config.logger_timezone));

    let model = shared_model(&config.model, logger.clone()).clone();

    match &cli.command {
        Some(Command::Classify { file }) => batch::classify_file(
            file,
            &ClassificationPipeline::new(config.pipeline.clone()),
            &model,
            logger,
            &mut std::io::stdout(),
        ),
        Some(Command::Batch { directory }) => batch::classify_directory(
            directory,
            &ClassificationPipeline::new(config.pipeline.clone()),
            &model,
            &config.presentation,
            logger,
            &mut std::io::stdout(),
        ),
        None => run_app(&config, logger, model),
    }
}

fn run_app(
    config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
    model: ModelHandle,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let devices = |display: SharedDisplay| Devices {
        camera: Arc::new(ImageSourceFake::new(
            SourceKind::Camera,
            config.camera_frame_size,
            logger.clone(),
        )),
        library: Arc::new(ImageSourceDirectory::new(
            config.library_directory.clone(),
            logger.clone(),
        )),
        album: Arc::new(PhotoAlbumDirectory::new(
            config.album_directory.clone(),
            config.logger_timezone,
            logger.clone(),
        )),
        display,
    };

    let (actions, actions_rx) = channel();

    match config.display {
        DisplayKind::Console => {
            let display: SharedDisplay = Arc::new(Mutex::new(DeviceDisplayConsole::new()));
            let app = App::new(config, logger.clone(), devices(display), model);
            let controller = std::thread::spawn(move || app.run(actions_rx));

            read_commands(&actions, &logger)?;

            join(controller)
        }
        DisplayKind::Gui => {
            let gui = DeviceDisplayGui::new();
            let window = gui.window(actions.clone());
            let display: SharedDisplay = Arc::new(Mutex::new(gui));
            let app = App::new(config, logger.clone(), devices(display), model);
            let controller = std::thread::spawn(move || app.run(actions_rx));

            window.run()?;
            let _ = actions.send(UiAction::Quit);

            join(controller)
        }
    }
}

fn read_commands(
    actions: &Sender<UiAction>,
    logger: &Arc<dyn Logger + Send + Sync>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    println!("Commands: camera (c), album (a), save (s), quit (q)");

    for line in std::io::stdin().lines() {
        let line = line?;
        match UiAction::from_command(&line) {
            Some(action) => {
                if actions.send(action).is_err() || action == UiAction::Quit {
                    return Ok(());
                }
            }
            None => logger.error(&format!("Unknown command: {}", line.trim()))?,
        }
    }

    let _ = actions.send(UiAction::Quit);
    Ok(())
}

fn join(
    controller: std::thread::JoinHandle<Result<(), Box<dyn std::error::Error + Send + Sync>>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    controller
        .join()
        .map_err(|_| "controller thread panicked")?
}
