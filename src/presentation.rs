use crate::classification::delivery::ClassificationOutcome;
use crate::classification::result::ClassificationResult;

/// How a ranked result is worded for the user. The core only hands back
/// numbers; the threshold belongs to whoever renders them.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationPolicy {
    /// Top confidence at or above this fraction is stated plainly,
    /// anything lower is hedged.
    pub assertive_threshold: f32,
}

impl Default for PresentationPolicy {
    fn default() -> Self {
        Self {
            assertive_threshold: 0.5,
        }
    }
}

impl PresentationPolicy {
    pub fn describe(&self, result: &ClassificationResult) -> String {
        let top = result.top();
        let percent = confidence_percent(top.confidence);

        if percent >= self.threshold_percent() {
            format!("This is {}, confidence {}%", top.label, percent)
        } else {
            format!("Possibly {}, confidence {}%", top.label, percent)
        }
    }

    fn threshold_percent(&self) -> u32 {
        (self.assertive_threshold.clamp(0.0, 1.0) * 100.0).round() as u32
    }

    pub fn describe_outcome(&self, outcome: &ClassificationOutcome) -> String {
        match outcome {
            Ok(result) => self.describe(result),
            Err(_) => "error".to_string(),
        }
    }
}

/// Whole percent, truncated.
pub fn confidence_percent(confidence: f32) -> u32 {
    (confidence.clamp(0.0, 1.0) * 100.0) as u32
}
