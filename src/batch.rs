use crate::classification::decode::decode_sample;
use crate::classification::delivery::{ClassificationOutcome, DeliveryPoll, PendingClassification};
use crate::classification::pipeline::ClassificationPipeline;
use crate::image_classifier::model::ModelHandle;
use crate::image_source::impl_directory::image_files;
use crate::library::logger::interface::Logger;
use crate::presentation::{confidence_percent, PresentationPolicy};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Prints the full ranking for one encoded image, or "error".
pub fn classify_file(
    file: &Path,
    pipeline: &ClassificationPipeline,
    model: &ModelHandle,
    logger: Arc<dyn Logger + Send + Sync>,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let logger = logger.with_namespace("classify");
    let bytes = std::fs::read(file)?;

    match pipeline.classify_encoded(&bytes, model) {
        Ok(result) => {
            for classification in result.ranked() {
                writeln!(
                    out,
                    "{:>3}% {}",
                    confidence_percent(classification.confidence),
                    classification.label
                )?;
            }
        }
        Err(e) => {
            logger.error(&format!("{}: {}", file.display(), e))?;
            writeln!(out, "error")?;
        }
    }

    Ok(())
}

/// Classifies every photo in `directory` on worker threads and prints one
/// line per photo as results arrive.
pub fn classify_directory(
    directory: &Path,
    pipeline: &ClassificationPipeline,
    model: &ModelHandle,
    policy: &PresentationPolicy,
    logger: Arc<dyn Logger + Send + Sync>,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let logger = logger.with_namespace("batch");
    let files = image_files(directory)?;
    logger.info(&format!("Classifying {} photos in {}", files.len(), directory.display()))?;

    let mut pending: Vec<(PathBuf, PendingClassification)> = Vec::new();
    for file in files {
        let sample = std::fs::read(&file)
            .map_err(|e| e.to_string())
            .and_then(|bytes| decode_sample(&bytes).map_err(|e| e.to_string()));

        match sample {
            Ok(sample) => {
                let classification = pipeline.classify_async(sample, model.clone());
                pending.push((file, classification));
            }
            Err(e) => {
                logger.error(&format!("{}: {}", file.display(), e))?;
                writeln!(out, "{}: error", file_name(&file))?;
            }
        }
    }

    while pending.len() > 1 {
        let mut still_pending = Vec::with_capacity(pending.len());
        for (file, classification) in pending {
            match classification.poll() {
                DeliveryPoll::Ready(outcome) => report(&file, &outcome, policy, &logger, out)?,
                DeliveryPoll::Pending(classification) => still_pending.push((file, classification)),
            }
        }
        pending = still_pending;
        if pending.len() > 1 {
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    if let Some((file, classification)) = pending.pop() {
        report(&file, &classification.wait(), policy, &logger, out)?;
    }

    Ok(())
}

fn file_name(file: &Path) -> String {
    file.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string())
}

fn report(
    file: &Path,
    outcome: &ClassificationOutcome,
    policy: &PresentationPolicy,
    logger: &Arc<dyn Logger + Send + Sync>,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if let Err(e) = outcome {
        logger.error(&format!("{}: {}", file.display(), e))?;
    }
    writeln!(out, "{}: {}", file_name(file), policy.describe_outcome(outcome))?;
    Ok(())
}
