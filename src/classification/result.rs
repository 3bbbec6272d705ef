#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
}

/// Ranked predictions for one photo, best first. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    ranked: Vec<Classification>,
}

impl ClassificationResult {
    /// Sorts `classifications` by descending confidence. Returns `None`
    /// for an empty list.
    pub fn from_unranked(mut classifications: Vec<Classification>) -> Option<Self> {
        if classifications.is_empty() {
            return None;
        }
        classifications.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        Some(Self {
            ranked: classifications,
        })
    }

    pub fn top(&self) -> &Classification {
        &self.ranked[0]
    }

    pub fn ranked(&self) -> &[Classification] {
        &self.ranked
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub(crate) fn truncate(&mut self, max_results: usize) {
        self.ranked.truncate(max_results.max(1));
    }
}
