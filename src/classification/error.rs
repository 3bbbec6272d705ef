use crate::image_classifier::error::ModelLoadError;
use thiserror::Error;

/// Terminal failure of a single classification call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassificationError {
    #[error("classifier model is unavailable: {0}")]
    ModelUnavailable(ModelLoadError),

    #[error("image could not be prepared for the classifier: {0}")]
    ImageDecodeFailed(String),

    #[error("unknown orientation code {0}")]
    InvalidOrientation(u32),

    #[error("inference failed: {0}")]
    InferenceFailed(String),
}
