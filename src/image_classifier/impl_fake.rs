use crate::classification::crop::InputSize;
use crate::image_classifier::interface::ImageClassifier;
use crate::library::logger::interface::Logger;
use image::RgbImage;
use rand::distr::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Deterministic stand-in for a real model: the scores are drawn from an
/// RNG seeded with the pixel data, so the same image always ranks the same.
pub struct ImageClassifierFake {
    logger: Arc<dyn Logger + Send + Sync>,
    labels: Vec<String>,
    input_size: InputSize,
}

impl ImageClassifierFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        let labels = vec![
            "dog", "cat", "person", "car", "chair", "table", "bird", "tree", "bicycle", "book",
            "laptop", "phone", "cup", "bottle", "keyboard", "mouse", "plant", "clock",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        Self {
            logger: logger.with_namespace("image_classifier.fake"),
            labels,
            input_size: InputSize::square(224),
        }
    }
}

fn seed_from_pixels(image: &RgbImage) -> u64 {
    // FNV-1a
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in image.as_raw() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

impl ImageClassifier for ImageClassifierFake {
    fn input_size(&self) -> InputSize {
        self.input_size
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn infer(&self, image: &RgbImage) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info("Classifying image with fake classifier...")?;

        let mut rng = StdRng::seed_from_u64(seed_from_pixels(image));
        let weight_dist = Uniform::new(0.0f32, 1.0)?;

        // a high power makes one label clearly dominant most of the time
        let weights: Vec<f32> = self
            .labels
            .iter()
            .map(|_| weight_dist.sample(&mut rng).powi(8))
            .collect();
        let total: f32 = weights.iter().sum();

        if total <= f32::EPSILON {
            let uniform = 1.0 / self.labels.len() as f32;
            return Ok(vec![uniform; self.labels.len()]);
        }

        Ok(weights.into_iter().map(|w| w / total).collect())
    }
}
