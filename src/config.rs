use crate::classification::pipeline::PipelineConfig;
use crate::image_classifier::models::model_config::ModelConfig;
use crate::presentation::PresentationPolicy;
use chrono::Offset;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DisplayKind {
    Console,
    Gui,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub logger_timezone: chrono::FixedOffset,
    pub model: ModelConfig,
    pub pipeline: PipelineConfig,
    pub presentation: PresentationPolicy,
    pub camera_frame_size: (u32, u32),
    pub library_directory: PathBuf,
    pub album_directory: PathBuf,
    pub display: DisplayKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logger_timezone: local_offset(),
            model: ModelConfig::default(),
            pipeline: PipelineConfig::default(),
            presentation: PresentationPolicy::default(),
            camera_frame_size: (640, 480),
            library_directory: PathBuf::from("./photos"),
            album_directory: PathBuf::from("./album"),
            display: DisplayKind::Console,
        }
    }
}

fn local_offset() -> chrono::FixedOffset {
    chrono::Local::now().offset().fix()
}
