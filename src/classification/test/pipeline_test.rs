use crate::classification::crop::InputSize;
use crate::classification::error::ClassificationError;
use crate::classification::orientation::Orientation;
use crate::classification::pipeline::{ClassificationPipeline, PipelineConfig};
use crate::classification::sample::ImageSample;
use crate::classification::test::fixture::{
    FailingClassifier, Fixture, GatedClassifier, PanickingClassifier, ScriptedClassifier,
};
use image::{DynamicImage, ImageFormat, Rgb};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};

#[test]
fn test_valid_sample_yields_sorted_confidences() {
    let f = Fixture::new();
    let sample = Fixture::solid_sample(640, 480, [120, 80, 40]);

    let result = f.pipeline.classify(sample, &f.fake_model).unwrap();

    assert!(result.len() > 0);
    assert!(result
        .ranked()
        .iter()
        .all(|c| (0.0..=1.0).contains(&c.confidence)));
    assert!(result
        .ranked()
        .windows(2)
        .all(|pair| pair[0].confidence >= pair[1].confidence));
}

#[test]
fn test_black_square_scenario() {
    let f = Fixture::new();
    let sample = Fixture::solid_sample(300, 300, [0, 0, 0]);

    let result = f.pipeline.classify(sample, &f.fake_model).unwrap();

    assert!(!result.top().label.is_empty());
    assert!(result.top().confidence >= 0.0);
    assert!(result.top().confidence <= 1.0);
}

#[test]
fn test_unknown_orientation_skips_inference() {
    let classifier = ScriptedClassifier::new(&["cat"], &[1.0]);
    let calls = classifier.calls.clone();
    let model = Fixture::model_with(classifier);
    let sample = ImageSample::with_orientation_code(Fixture::split_image(20, 10), 9);

    let result = ClassificationPipeline::default().classify(sample, &model);

    assert_eq!(result, Err(ClassificationError::InvalidOrientation(9)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_unavailable_model_fails_before_touching_the_image() {
    let f = Fixture::new();
    // an empty raster would fail preparation if it were attempted
    let sample = ImageSample::with_orientation_code(DynamicImage::new_rgb8(0, 0), 42);

    let result = f.pipeline.classify(sample, &f.unavailable_model);

    assert!(matches!(
        result,
        Err(ClassificationError::ModelUnavailable(_))
    ));
}

#[test]
fn test_empty_image_fails_to_prepare() {
    let f = Fixture::new();
    let sample = ImageSample::new(DynamicImage::new_rgb8(0, 10), Orientation::Normal);

    let result = f.pipeline.classify(sample, &f.fake_model);

    assert!(matches!(
        result,
        Err(ClassificationError::ImageDecodeFailed(_))
    ));
}

#[test]
fn test_same_sample_same_result() {
    let f = Fixture::new();
    let sample = ImageSample::new(Fixture::split_image(400, 300), Orientation::Rotated90);

    let first = f.pipeline.classify(sample.clone(), &f.fake_model).unwrap();
    let second = f.pipeline.classify(sample, &f.fake_model).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_quarter_turn_changes_crop_region() {
    let f = Fixture::new();
    let image = Fixture::split_image(400, 300);
    let normal = ImageSample::new(image.clone(), Orientation::Normal);
    let rotated = ImageSample::new(image, Orientation::Rotated90);

    let normal_plan = f.pipeline.plan(&normal, InputSize::square(224)).unwrap();
    let rotated_plan = f.pipeline.plan(&rotated, InputSize::square(224)).unwrap();

    assert_eq!(normal_plan.upright_size, (400, 300));
    assert_eq!(rotated_plan.upright_size, (300, 400));
    assert_ne!(normal_plan.region, rotated_plan.region);
    assert_eq!((normal_plan.region.x, normal_plan.region.y), (50, 0));
    assert_eq!((rotated_plan.region.x, rotated_plan.region.y), (0, 50));
}

#[test]
fn test_orientation_is_applied_before_inference() {
    let classifier = ScriptedClassifier::new(&["cat"], &[1.0]);
    let last_input = classifier.last_input.clone();
    let model = Fixture::model_with(classifier);
    let sample = ImageSample::new(Fixture::split_image(16, 16), Orientation::Mirrored);

    ClassificationPipeline::default()
        .classify(sample, &model)
        .unwrap();

    let input = last_input.lock().unwrap().take().unwrap();
    assert_eq!(input.dimensions(), (8, 8));
    assert_eq!(input.get_pixel(0, 4), &Rgb([0, 0, 255]));
    assert_eq!(input.get_pixel(7, 4), &Rgb([255, 0, 0]));
}

#[test]
fn test_prepared_input_matches_model_size() {
    let f = Fixture::new();
    let sample = Fixture::solid_sample(1000, 200, [9, 9, 9]);

    let prepared = f.pipeline.prepare(&sample, InputSize::new(32, 16)).unwrap();

    assert_eq!(prepared.image.dimensions(), (32, 16));
    assert_eq!(prepared.plan.region.width, 400);
    assert_eq!(prepared.plan.region.height, 200);
}

#[test]
fn test_backend_error_is_reported() {
    let model = Fixture::model_with(FailingClassifier);
    let sample = Fixture::solid_sample(10, 10, [0, 0, 0]);

    let result = ClassificationPipeline::default().classify(sample, &model);

    assert_eq!(
        result,
        Err(ClassificationError::InferenceFailed(
            "backend exploded".to_string()
        ))
    );
}

#[test]
fn test_out_of_range_scores_are_rejected() {
    let model = Fixture::model_with(ScriptedClassifier::new(&["cat", "dog"], &[1.5, -0.5]));
    let sample = Fixture::solid_sample(10, 10, [0, 0, 0]);

    let result = ClassificationPipeline::default().classify(sample, &model);

    assert!(matches!(
        result,
        Err(ClassificationError::InferenceFailed(_))
    ));
}

#[test]
fn test_nan_scores_are_rejected() {
    let model = Fixture::model_with(ScriptedClassifier::new(&["cat"], &[f32::NAN]));
    let sample = Fixture::solid_sample(10, 10, [0, 0, 0]);

    let result = ClassificationPipeline::default().classify(sample, &model);

    assert!(matches!(
        result,
        Err(ClassificationError::InferenceFailed(_))
    ));
}

#[test]
fn test_no_scores_is_a_failure() {
    let model = Fixture::model_with(ScriptedClassifier::new(&["cat"], &[]));
    let sample = Fixture::solid_sample(10, 10, [0, 0, 0]);

    let result = ClassificationPipeline::default().classify(sample, &model);

    assert!(matches!(
        result,
        Err(ClassificationError::InferenceFailed(_))
    ));
}

#[test]
fn test_unlabelled_classes_get_index_names() {
    let model = Fixture::model_with(ScriptedClassifier::new(&["cat"], &[0.1, 0.7, 0.2]));
    let sample = Fixture::solid_sample(10, 10, [0, 0, 0]);

    let result = ClassificationPipeline::default()
        .classify(sample, &model)
        .unwrap();

    let labels: Vec<&str> = result.ranked().iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["class_1", "class_2", "cat"]);
}

#[test]
fn test_max_results_truncates_ranking() {
    let model = Fixture::model_with(ScriptedClassifier::new(
        &["a", "b", "c", "d"],
        &[0.1, 0.4, 0.3, 0.2],
    ));
    let pipeline = ClassificationPipeline::new(PipelineConfig {
        max_results: Some(2),
    });

    let result = pipeline
        .classify(Fixture::solid_sample(10, 10, [0, 0, 0]), &model)
        .unwrap();

    let labels: Vec<&str> = result.ranked().iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["b", "c"]);
}

#[test]
fn test_classify_encoded_png() {
    let f = Fixture::new();
    let image = Fixture::split_image(64, 48);
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();

    let encoded = f.pipeline.classify_encoded(&bytes, &f.fake_model).unwrap();
    let decoded = f
        .pipeline
        .classify(ImageSample::new(image, Orientation::Normal), &f.fake_model)
        .unwrap();

    assert_eq!(encoded, decoded);
}

#[test]
fn test_classify_encoded_reads_exif_orientation() {
    let f = Fixture::new();
    let bytes = Fixture::jpeg_with_orientation(&Fixture::split_image(40, 20), 6);
    let pixels = image::load_from_memory(&bytes).unwrap();
    let classifier = ScriptedClassifier::new(&["cat"], &[1.0]);
    let last_input = classifier.last_input.clone();
    let model = Fixture::model_with(classifier);
    let pipeline = ClassificationPipeline::default();

    pipeline.classify_encoded(&bytes, &model).unwrap();
    let from_bytes = last_input.lock().unwrap().take().unwrap();
    pipeline
        .classify(ImageSample::new(pixels.clone(), Orientation::Rotated90), &model)
        .unwrap();
    let rotated = last_input.lock().unwrap().take().unwrap();
    pipeline
        .classify(ImageSample::new(pixels.clone(), Orientation::Normal), &model)
        .unwrap();
    let unrotated = last_input.lock().unwrap().take().unwrap();

    assert_eq!(from_bytes, rotated);
    assert_ne!(from_bytes, unrotated);
    assert_eq!(
        f.pipeline.classify_encoded(&bytes, &f.fake_model),
        f.pipeline.classify(ImageSample::new(pixels, Orientation::Rotated90), &f.fake_model)
    );
}

#[test]
fn test_classify_encoded_rejects_unknown_exif_orientation() {
    let classifier = ScriptedClassifier::new(&["cat"], &[1.0]);
    let calls = classifier.calls.clone();
    let model = Fixture::model_with(classifier);
    let bytes = Fixture::jpeg_with_orientation(&Fixture::split_image(16, 16), 9);

    let result = ClassificationPipeline::default().classify_encoded(&bytes, &model);

    assert_eq!(result, Err(ClassificationError::InvalidOrientation(9)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_classify_encoded_garbage() {
    let f = Fixture::new();

    let result = f.pipeline.classify_encoded(b"\x00\x01\x02", &f.fake_model);

    assert!(matches!(
        result,
        Err(ClassificationError::ImageDecodeFailed(_))
    ));
}

#[test]
fn test_async_matches_sync() {
    let f = Fixture::new();
    let sample = Fixture::solid_sample(120, 90, [30, 60, 90]);

    let expected = f.pipeline.classify(sample.clone(), &f.fake_model);
    let delivered = f
        .pipeline
        .classify_async(sample, f.fake_model.clone())
        .wait();

    assert_eq!(delivered, expected);
}

#[test]
fn test_async_reports_errors() {
    let f = Fixture::new();

    let delivered = f
        .pipeline
        .classify_async(
            Fixture::solid_sample(10, 10, [0, 0, 0]),
            f.unavailable_model.clone(),
        )
        .wait();

    assert!(matches!(
        delivered,
        Err(ClassificationError::ModelUnavailable(_))
    ));
}

#[test]
fn test_panicking_backend_is_reported_not_dropped() {
    let model = Fixture::model_with(PanickingClassifier);

    let delivered = ClassificationPipeline::default()
        .classify_async(Fixture::solid_sample(10, 10, [0, 0, 0]), model)
        .wait();

    match delivered {
        Err(ClassificationError::InferenceFailed(message)) => {
            assert!(message.contains("tensor shape mismatch"))
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn test_callback_invoked_exactly_once() {
    let f = Fixture::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let outcome = Arc::new(Mutex::new(None));

    let counter = calls.clone();
    let slot = outcome.clone();
    let handle = f.pipeline.classify_with(
        Fixture::solid_sample(50, 50, [1, 2, 3]),
        f.fake_model.clone(),
        move |result| {
            counter.fetch_add(1, Ordering::SeqCst);
            *slot.lock().unwrap() = Some(result);
        },
    );
    handle.join();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(matches!(*outcome.lock().unwrap(), Some(Ok(_))));
}

#[test]
fn test_cancelled_callback_is_not_invoked() {
    let (open_gate, gate) = mpsc::channel();
    let model = Fixture::model_with(GatedClassifier::new(gate));
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = calls.clone();
    let handle = ClassificationPipeline::default().classify_with(
        Fixture::solid_sample(10, 10, [0, 0, 0]),
        model,
        move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        },
    );

    assert!(handle.cancel());
    open_gate.send(()).unwrap();
    handle.join();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
