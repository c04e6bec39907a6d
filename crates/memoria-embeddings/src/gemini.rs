use async_trait::async_trait;
use memoria_core::config::EmbeddingConfig;
use memoria_core::traits::{EmbeddingProvider, EmbeddingTaskType};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::fallback::fallback_vector;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Wraps the Gemini `embedContent` API (spec §4.3, C3). `taskType` is
/// forwarded on every call regardless of whether this particular model
/// is sensitive to it, per the spec's explicit "must be forwarded"
/// requirement.
pub struct GeminiEmbeddingClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    dimensions: usize,
}

#[derive(Serialize)]
struct EmbedContentRequest {
    content: Content,
    #[serde(rename = "taskType")]
    task_type: &'static str,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct EmbedContentResponse {
    embedding: EmbeddingValues,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

impl GeminiEmbeddingClient {
    pub fn new(config: &EmbeddingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            dimensions: config.dimensions,
        }
    }

    fn task_type_str(task_type: EmbeddingTaskType) -> &'static str {
        match task_type {
            EmbeddingTaskType::Query => "RETRIEVAL_QUERY",
            EmbeddingTaskType::Document => "RETRIEVAL_DOCUMENT",
        }
    }

    async fn call_api(&self, text: &str, task_type: EmbeddingTaskType) -> reqwest::Result<Vec<f32>> {
        let url = format!("{API_BASE}/{}:embedContent?key={}", self.model, self.api_key);
        let body = EmbedContentRequest {
            content: Content {
                parts: vec![Part { text: text.to_string() }],
            },
            task_type: Self::task_type_str(task_type),
        };
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<EmbedContentResponse>()
            .await?;
        Ok(response.embedding.values)
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddingClient {
    async fn embed(&self, text: &str, task_type: EmbeddingTaskType) -> Vec<f32> {
        match self.call_api(text, task_type).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!(error = %e, "embedding provider failed, using deterministic fallback");
                fallback_vector(text, self.dimensions)
            }
        }
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
