use crate::classification::crop::{center_crop_region, crop_and_scale, CropRegion, InputSize};
use crate::classification::decode::decode_sample;
use crate::classification::delivery::{
    one_shot, CallbackSlot, CancelHandle, ClassificationOutcome, PendingClassification,
};
use crate::classification::error::ClassificationError;
use crate::classification::orientation::Orientation;
use crate::classification::result::{Classification, ClassificationResult};
use crate::classification::sample::ImageSample;
use crate::image_classifier::model::ModelHandle;
use image::RgbImage;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineConfig {
    /// Keep only the best `n` predictions. `None` keeps the full ranking.
    pub max_results: Option<usize>,
}

/// Where the model input comes from, decided before any pixel is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropPlan {
    pub orientation: Orientation,
    pub upright_size: (u32, u32),
    pub region: CropRegion,
}

#[derive(Debug, Clone)]
pub struct PreparedInput {
    pub plan: CropPlan,
    pub image: RgbImage,
}

/// Turns an [`ImageSample`] into ranked label predictions.
///
/// Orientation is resolved first, then the upright image is center-cropped
/// to the model's aspect ratio and scaled to its input size.
#[derive(Debug, Clone, Default)]
pub struct ClassificationPipeline {
    config: PipelineConfig,
}

impl ClassificationPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn plan(
        &self,
        sample: &ImageSample,
        input_size: InputSize,
    ) -> Result<CropPlan, ClassificationError> {
        let code = sample.orientation_code();
        let orientation =
            Orientation::from_exif(code).ok_or(ClassificationError::InvalidOrientation(code))?;

        let (width, height) = (sample.image().width(), sample.image().height());
        if width == 0 || height == 0 {
            return Err(ClassificationError::ImageDecodeFailed(format!(
                "image has no pixels ({}x{})",
                width, height
            )));
        }

        let upright_size = orientation.upright_size(width, height);

        Ok(CropPlan {
            orientation,
            upright_size,
            region: center_crop_region(upright_size.0, upright_size.1, input_size),
        })
    }

    pub fn prepare(
        &self,
        sample: &ImageSample,
        input_size: InputSize,
    ) -> Result<PreparedInput, ClassificationError> {
        let plan = self.plan(sample, input_size)?;

        let upright = plan.orientation.apply(sample.image());
        let image = crop_and_scale(&upright, plan.region, input_size).to_rgb8();

        Ok(PreparedInput { plan, image })
    }

    pub fn classify(&self, sample: ImageSample, model: &ModelHandle) -> ClassificationOutcome {
        let model = model.model()?;

        let prepared = self.prepare(&sample, model.input_size())?;
        drop(sample);

        let scores = model
            .infer(&prepared.image)
            .map_err(|e| ClassificationError::InferenceFailed(e.to_string()))?;

        self.rank(model.labels(), scores)
    }

    /// Classifies encoded image bytes, taking the orientation from EXIF.
    pub fn classify_encoded(&self, bytes: &[u8], model: &ModelHandle) -> ClassificationOutcome {
        model.model()?;

        let sample = decode_sample(bytes)?;

        self.classify(sample, model)
    }

    /// Runs the classification on a worker thread.
    pub fn classify_async(&self, sample: ImageSample, model: ModelHandle) -> PendingClassification {
        let (delivery, pending) = one_shot();
        let pipeline = self.clone();

        // if the thread cannot start, the dropped delivery resolves
        // `pending` with an error
        let _ = thread::Builder::new()
            .name("classification".to_string())
            .spawn(move || delivery.deliver(pipeline.classify_guarded(sample, &model)));

        pending
    }

    /// Runs the classification on a worker thread and hands the outcome to
    /// `on_complete` exactly once, unless the returned handle cancels first.
    pub fn classify_with<F>(&self, sample: ImageSample, model: ModelHandle, on_complete: F) -> CancelHandle
    where
        F: FnOnce(ClassificationOutcome) + Send + 'static,
    {
        let slot = Arc::new(CallbackSlot::new(on_complete));
        let worker_slot = slot.clone();
        let pipeline = self.clone();

        let spawned = thread::Builder::new()
            .name("classification".to_string())
            .spawn(move || worker_slot.complete(pipeline.classify_guarded(sample, &model)));

        match spawned {
            Ok(worker) => CancelHandle::new(slot, Some(worker)),
            Err(e) => {
                slot.complete(Err(ClassificationError::InferenceFailed(format!(
                    "could not start classification worker: {}",
                    e
                ))));
                CancelHandle::new(slot, None)
            }
        }
    }

    fn classify_guarded(&self, sample: ImageSample, model: &ModelHandle) -> ClassificationOutcome {
        panic::catch_unwind(AssertUnwindSafe(|| self.classify(sample, model))).unwrap_or_else(
            |payload| {
                Err(ClassificationError::InferenceFailed(format!(
                    "classifier panicked: {}",
                    panic_message(payload.as_ref())
                )))
            },
        )
    }

    fn rank(&self, labels: &[String], scores: Vec<f32>) -> ClassificationOutcome {
        if let Some((index, score)) = scores
            .iter()
            .enumerate()
            .find(|(_, score)| !(0.0..=1.0).contains(*score))
        {
            return Err(ClassificationError::InferenceFailed(format!(
                "confidence {} for class {} is outside [0, 1]",
                score, index
            )));
        }

        let classifications = scores
            .into_iter()
            .enumerate()
            .map(|(index, confidence)| Classification {
                label: labels
                    .get(index)
                    .cloned()
                    .unwrap_or_else(|| format!("class_{}", index)),
                confidence,
            })
            .collect();

        let mut result = ClassificationResult::from_unranked(classifications).ok_or_else(|| {
            ClassificationError::InferenceFailed("classifier returned no scores".to_string())
        })?;

        if let Some(max_results) = self.config.max_results {
            result.truncate(max_results);
        }

        Ok(result)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
