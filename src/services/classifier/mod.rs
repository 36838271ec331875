/// Image classification collaborator
///
/// Classification is best-effort: callers treat "no classifier configured" and
/// "classifier failed" the same way and carry on without image concepts.
use crate::{error::AppResult, models::ClassificationLabel};

pub mod huggingface;

pub use huggingface::HuggingFaceClassifier;

/// Most labels kept from one classification
pub const MAX_LABELS: usize = 10;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Classifier: Send + Sync {
    /// Classifies an encoded image, highest-scoring labels first
    async fn classify(&self, image: &[u8]) -> AppResult<Vec<ClassificationLabel>>;

    /// Classifier name for logging
    fn name(&self) -> &'static str;
}
