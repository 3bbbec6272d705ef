use crate::classification::crop::InputSize;
use image::RgbImage;

pub trait ImageClassifier: Send + Sync {
    fn input_size(&self) -> InputSize;

    fn labels(&self) -> &[String];

    /// Scores the image, one value in [0, 1] per class index. The image is
    /// already cropped and scaled to [`ImageClassifier::input_size`].
    fn infer(&self, image: &RgbImage) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>>;
}
