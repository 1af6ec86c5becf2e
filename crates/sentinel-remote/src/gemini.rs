//! Client for the Gemini `embedContent` and `generateContent` endpoints.
//!
//! Every request picks the next key from a [`KeyRing`]. A quota failure
//! moves on to the following key; any other failure is returned at once.

use std::time::Duration;

use async_trait::async_trait;
use sentinel_ai::{Completer, CompletionError, EmbedError, EmbeddingProvider};
use sentinel_core::ProviderSettings;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::RemoteError;
use crate::keys::{KeyRing, preview};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// HTTP client for one Gemini-compatible endpoint.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    keys: KeyRing,
    embedding_model: String,
    completion_model: String,
    timeout: Duration,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("keys", &self.keys.len())
            .field("embedding_model", &self.embedding_model)
            .field("completion_model", &self.completion_model)
            .finish()
    }
}

impl GeminiClient {
    pub fn new(settings: &ProviderSettings, keys: KeyRing) -> Result<Self, RemoteError> {
        let timeout = Duration::from_secs(settings.timeout_secs);
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            keys,
            embedding_model: model_path(&settings.embedding_model),
            completion_model: model_path(&settings.completion_model),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    fn embed_url(&self) -> String {
        format!("{}/{}:embedContent", self.base_url, self.embedding_model)
    }

    fn generate_url(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.completion_model)
    }

    /// POST `body` with one key. Non-success statuses become
    /// [`RemoteError::Server`].
    async fn post(&self, url: &str, key: &str, body: &Value) -> Result<Value, RemoteError> {
        let resp = self
            .client
            .post(url)
            .header(API_KEY_HEADER, key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RemoteError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json::<Value>().await?)
    }

    /// Try keys in rotation until one answers or every key hit its quota.
    async fn post_rotating(&self, url: &str, body: &Value) -> Result<Value, CompletionError> {
        if self.keys.is_empty() {
            return Err(CompletionError::NoKeys);
        }
        for _ in 0..self.keys.len() {
            let Some((index, key)) = self.keys.next_key() else {
                break;
            };
            debug!(url = %url, key = index, "provider request");
            match self.post(url, key, body).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    let err = self.classify(e);
                    if err.is_quota() {
                        warn!(key = index, preview = %preview(key), "quota exhausted, rotating key");
                        continue;
                    }
                    return Err(err);
                }
            }
        }
        Err(CompletionError::KeysExhausted(self.keys.len()))
    }

    fn classify(&self, err: RemoteError) -> CompletionError {
        match err {
            RemoteError::Http(e) if e.is_timeout() => {
                CompletionError::Timeout(self.timeout.as_secs())
            }
            RemoteError::Server { status, body } => {
                CompletionError::from_response(Some(status), &body)
            }
            RemoteError::NoKeys => CompletionError::NoKeys,
            other => CompletionError::from_response(None, &other.to_string()),
        }
    }
}

/// Prefix bare model names with `models/`.
fn model_path(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

fn parse_embedding(value: Value) -> Result<Vec<f32>, RemoteError> {
    let resp: EmbedResponse = serde_json::from_value(value)?;
    if resp.embedding.values.is_empty() {
        return Err(RemoteError::Missing("embedding.values"));
    }
    Ok(resp.embedding.values)
}

/// Concatenated text of the first candidate.
fn parse_generation(value: Value) -> Result<String, CompletionError> {
    let resp: GenerateResponse = serde_json::from_value(value)
        .map_err(|e| CompletionError::Transport(e.to_string()))?;

    if resp
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_ref())
        .is_some()
    {
        return Err(CompletionError::SafetyBlocked);
    }

    let Some(candidate) = resp.candidates.into_iter().next() else {
        return Err(CompletionError::Empty);
    };
    if candidate.finish_reason.as_deref() == Some("SAFETY") {
        return Err(CompletionError::SafetyBlocked);
    }

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(CompletionError::Empty);
    }
    Ok(text)
}

#[async_trait]
impl EmbeddingProvider for GeminiClient {
    fn model(&self) -> &str {
        &self.embedding_model
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let url = self.embed_url();
        let body = json!({
            "model": self.embedding_model,
            "content": { "parts": [{ "text": text }] },
        });
        let value = self
            .post_rotating(&url, &body)
            .await
            .map_err(|e| EmbedError::Request(e.to_string()))?;
        parse_embedding(value).map_err(|e| EmbedError::Request(e.to_string()))
    }
}

#[async_trait]
impl Completer for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let url = self.generate_url();
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });
        let value = self.post_rotating(&url, &body).await?;
        let text = parse_generation(value)?;
        info!(model = %self.completion_model, chars = text.len(), "completion received");
        Ok(text)
    }
}
