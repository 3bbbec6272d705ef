use crate::classification::crop::InputSize;
use crate::image_classifier::error::ModelLoadError;
use crate::image_classifier::interface::ImageClassifier;
use crate::image_classifier::models::model_config::ModelConfig;
use crate::image_classifier::tract::image::{image_to_tensor, softmax};
use image::RgbImage;
use std::path::Path;
use tract_onnx::prelude::*;

pub struct ImageClassifierTractOnnx {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
    config: ModelConfig,
    labels: Vec<String>,
}

impl ImageClassifierTractOnnx {
    pub fn new(config: ModelConfig) -> Result<Self, ModelLoadError> {
        let model_path = config.asset.onnx_model_path();
        if !model_path.is_file() {
            return Err(ModelLoadError::AssetMissing { path: model_path });
        }

        let labels = read_labels(&config.asset.labels_path())?;

        let (height, width) = config.input_shape;
        let model = tract_onnx::onnx()
            .model_for_path(&model_path)
            .and_then(|model| {
                model.with_input_fact(
                    0,
                    f32::fact([1, 3, height as usize, width as usize]).into(),
                )
            })
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| ModelLoadError::Malformed {
                path: model_path.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            model,
            config,
            labels,
        })
    }
}

pub fn read_labels(path: &Path) -> Result<Vec<String>, ModelLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ModelLoadError::AssetMissing {
            path: path.to_path_buf(),
        },
        _ => ModelLoadError::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })?;

    let labels: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if labels.is_empty() {
        return Err(ModelLoadError::Malformed {
            path: path.to_path_buf(),
            reason: "label file is empty".to_string(),
        });
    }

    Ok(labels)
}

impl ImageClassifier for ImageClassifierTractOnnx {
    fn input_size(&self) -> InputSize {
        self.config.input_size()
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn infer(&self, image: &RgbImage) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>> {
        let input = image_to_tensor(image, self.config.mean, self.config.std);

        let outputs = self.model.run(tvec!(input.into_tvalue()))?;
        let output = outputs.first().ok_or("model produced no outputs")?;
        let scores: Vec<f32> = output.to_array_view::<f32>()?.iter().copied().collect();

        if self.config.apply_softmax {
            Ok(softmax(&scores))
        } else {
            Ok(scores)
        }
    }
}
