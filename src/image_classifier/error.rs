use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelLoadError {
    #[error("model asset not found at {}", path.display())]
    AssetMissing { path: PathBuf },

    #[error("model asset at {} is malformed: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
}
