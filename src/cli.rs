use crate::config::{Config, DisplayKind};
use crate::image_classifier::models::model_config::ClassifierBackendKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Front-end for the interactive app
    #[arg(long, value_enum, default_value_t = DisplayKind::Console)]
    pub display: DisplayKind,

    /// Classifier backend
    #[arg(long, value_enum, default_value_t = ClassifierBackendKind::TractOnnx)]
    pub backend: ClassifierBackendKind,

    /// Folder holding `<name>.onnx` and `<name>.labels.txt`
    #[arg(long)]
    pub model_dir: Option<PathBuf>,

    /// Folder the [Album] button picks photos from
    #[arg(long)]
    pub library_dir: Option<PathBuf>,

    /// Folder the [Save] button writes to
    #[arg(long)]
    pub album_dir: Option<PathBuf>,

    /// Keep only the best N predictions
    #[arg(long)]
    pub max_results: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Classify one image file and print the ranking
    Classify { file: PathBuf },
    /// Classify every photo in a folder
    Batch { directory: PathBuf },
}

impl Cli {
    pub fn apply(&self, mut config: Config) -> Config {
        config.display = self.display;
        config.model.backend = self.backend;
        if let Some(directory) = &self.model_dir {
            config.model.asset.directory = directory.clone();
        }
        if let Some(directory) = &self.library_dir {
            config.library_directory = directory.clone();
        }
        if let Some(directory) = &self.album_dir {
            config.album_directory = directory.clone();
        }
        if self.max_results.is_some() {
            config.pipeline.max_results = self.max_results;
        }
        config
    }
}
