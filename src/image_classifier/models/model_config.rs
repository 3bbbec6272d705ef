use crate::classification::crop::InputSize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ClassifierBackendKind {
    TractOnnx,
    Fake,
}

/// The single bundled model: `<directory>/<name>.onnx` plus
/// `<directory>/<name>.labels.txt`, one label per line.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelAsset {
    pub directory: PathBuf,
    pub name: String,
    pub version: u32,
}

impl ModelAsset {
    pub fn onnx_model_path(&self) -> PathBuf {
        self.directory.join(format!("{}.onnx", self.name))
    }

    pub fn labels_path(&self) -> PathBuf {
        self.directory.join(format!("{}.labels.txt", self.name))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub backend: ClassifierBackendKind,
    pub asset: ModelAsset,
    /// (height, width)
    pub input_shape: (u32, u32),
    pub mean: [f32; 3],
    pub std: [f32; 3],
    /// MobileNet style exports emit logits rather than probabilities.
    pub apply_softmax: bool,
}

impl ModelConfig {
    pub fn input_size(&self) -> InputSize {
        InputSize::new(self.input_shape.1, self.input_shape.0)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: ClassifierBackendKind::TractOnnx,
            asset: ModelAsset {
                directory: PathBuf::from("./models"),
                name: "mobilenetv2-7".to_string(),
                version: 7,
            },
            input_shape: (224, 224),
            mean: [0.485, 0.456, 0.406],
            std: [0.229, 0.224, 0.225],
            apply_softmax: true,
        }
    }
}
