use async_trait::async_trait;
use memoria_core::errors::{MemoriaError, MemoriaResult};
use memoria_core::traits::SummarizationProvider;
use serde::{Deserialize, Serialize};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Wraps the Gemini `generateContent` API for consolidation summaries
/// (spec §4.5.7). Unlike the embedding client, a provider failure here
/// propagates to the caller as a `MemoriaError::Provider` — the
/// concatenation fallback is the consolidation protocol's job, not
/// this client's, so it can't block the whole consolidation step.
pub struct GeminiSummarizer {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
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
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: String,
}

impl GeminiSummarizer {
    pub fn new(api_key: String) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL.to_string())
    }

    pub fn with_model(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }
}

#[async_trait]
impl SummarizationProvider for GeminiSummarizer {
    async fn summarize(&self, prompt: &str) -> MemoriaResult<String> {
        let url = format!("{API_BASE}/{}:generateContent?key={}", self.model, self.api_key);
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt.to_string() }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| MemoriaError::Provider(format!("summarization request failed: {e}")))?
            .error_for_status()
            .map_err(|e| MemoriaError::Provider(format!("summarization API error: {e}")))?
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| MemoriaError::Provider(format!("summarization response parse failed: {e}")))?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| MemoriaError::Provider("summarization returned no candidates".to_string()))
    }
}
