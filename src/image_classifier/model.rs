use crate::classification::crop::InputSize;
use crate::classification::error::ClassificationError;
use crate::image_classifier::error::ModelLoadError;
use crate::image_classifier::impl_fake::ImageClassifierFake;
use crate::image_classifier::impl_tract_onnx::ImageClassifierTractOnnx;
use crate::image_classifier::interface::ImageClassifier;
use crate::image_classifier::models::model_config::{ClassifierBackendKind, ModelConfig};
use crate::library::logger::interface::Logger;
use image::RgbImage;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// A loaded classifier. Read-only once constructed, shared across threads.
pub struct ClassifierModel {
    name: String,
    classifier: Box<dyn ImageClassifier + Send + Sync>,
}

impl ClassifierModel {
    pub fn load(
        config: &ModelConfig,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, ModelLoadError> {
        let classifier: Box<dyn ImageClassifier + Send + Sync> = match config.backend {
            ClassifierBackendKind::TractOnnx => {
                Box::new(ImageClassifierTractOnnx::new(config.clone())?)
            }
            ClassifierBackendKind::Fake => Box::new(ImageClassifierFake::new(logger)),
        };

        Ok(Self::from_classifier(
            format!("{}@{}", config.asset.name, config.asset.version),
            classifier,
        ))
    }

    pub fn from_classifier(
        name: impl Into<String>,
        classifier: Box<dyn ImageClassifier + Send + Sync>,
    ) -> Self {
        Self {
            name: name.into(),
            classifier,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input_size(&self) -> InputSize {
        self.classifier.input_size()
    }

    pub fn labels(&self) -> &[String] {
        self.classifier.labels()
    }

    pub fn infer(&self, image: &RgbImage) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>> {
        self.classifier.infer(image)
    }
}

impl fmt::Debug for ClassifierModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierModel")
            .field("name", &self.name)
            .field("input_size", &self.input_size())
            .field("labels", &self.labels().len())
            .finish()
    }
}

/// Outcome of the one load attempt, handed to every classification call.
#[derive(Debug, Clone)]
pub enum ModelHandle {
    Ready(Arc<ClassifierModel>),
    Unavailable(ModelLoadError),
}

impl ModelHandle {
    pub fn load(config: &ModelConfig, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        let logger = logger.with_namespace("model");
        let _ = logger.info(&format!(
            "Loading {:?} model {} v{}",
            config.backend, config.asset.name, config.asset.version
        ));

        match ClassifierModel::load(config, logger.clone()) {
            Ok(model) => {
                let _ = logger.info(&format!("Model ready: {:?}", model));
                ModelHandle::Ready(Arc::new(model))
            }
            Err(e) => {
                let _ = logger.error(&format!("Model failed to load: {}", e));
                ModelHandle::Unavailable(e)
            }
        }
    }

    #[allow(dead_code)]
    pub fn ready(model: ClassifierModel) -> Self {
        ModelHandle::Ready(Arc::new(model))
    }

    pub fn model(&self) -> Result<&Arc<ClassifierModel>, ClassificationError> {
        match self {
            ModelHandle::Ready(model) => Ok(model),
            ModelHandle::Unavailable(e) => Err(ClassificationError::ModelUnavailable(e.clone())),
        }
    }
}

static SHARED_MODEL: OnceLock<ModelHandle> = OnceLock::new();

/// Process-wide model. The first call loads it with `config`; every later
/// call returns that same handle and ignores its arguments.
pub fn shared_model(
    config: &ModelConfig,
    logger: Arc<dyn Logger + Send + Sync>,
) -> &'static ModelHandle {
    SHARED_MODEL.get_or_init(|| ModelHandle::load(config, logger))
}
