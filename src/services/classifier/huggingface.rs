use std::time::Duration;

use reqwest::{header::CONTENT_TYPE, Client as HttpClient};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::ClassificationLabel,
    services::classifier::{Classifier, MAX_LABELS},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Body of the inference API, either predictions or an error (e.g. model loading)
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Labels(Vec<ClassificationLabel>),
    Error { error: String },
}

/// Hugging Face inference API client for a ViT image classification model
#[derive(Clone)]
pub struct HuggingFaceClassifier {
    http_client: HttpClient,
    api_token: String,
    model_url: String,
}

impl HuggingFaceClassifier {
    pub fn new(api_token: String, model_url: String) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http_client,
            api_token,
            model_url,
        })
    }

    /// Keeps the best [`MAX_LABELS`] predictions, highest score first
    fn top_labels(mut labels: Vec<ClassificationLabel>) -> Vec<ClassificationLabel> {
        labels.sort_by(|a, b| b.score.total_cmp(&a.score));
        labels.truncate(MAX_LABELS);
        labels
    }
}

#[async_trait::async_trait]
impl Classifier for HuggingFaceClassifier {
    async fn classify(&self, image: &[u8]) -> AppResult<Vec<ClassificationLabel>> {
        let response = self
            .http_client
            .post(&self.model_url)
            .bearer_auth(&self.api_token)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Classifier returned status {}: {}",
                status, body
            )));
        }

        match response.json::<InferenceResponse>().await? {
            InferenceResponse::Labels(labels) => {
                let labels = Self::top_labels(labels);
                tracing::info!(
                    labels = ?labels.iter().map(|l| l.label.as_str()).collect::<Vec<_>>(),
                    "Image classified"
                );
                Ok(labels)
            }
            InferenceResponse::Error { error } => Err(AppError::ExternalApi(format!(
                "Classifier error: {}",
                error
            ))),
        }
    }

    fn name(&self) -> &'static str {
        "huggingface-vit"
    }
}
