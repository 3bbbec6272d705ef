use crate::classification::sample::ImageSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Camera,
    Library,
}

/// A picker the user takes or chooses a photo with.
pub trait ImageSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    fn is_available(&self) -> bool;

    /// `None` when the user backs out without choosing a photo.
    fn pick(&self) -> Result<Option<ImageSample>, Box<dyn std::error::Error + Send + Sync>>;
}
