//! Embedding index: provider seam, deterministic hash fallback, cosine ranking.
//!
//! [`Embedder`] wraps an optional remote [`EmbeddingProvider`] with a timeout.
//! Any failure (no provider, error, timeout, wrong dimension) yields the hash
//! vector instead, tagged [`Outcome::Degraded`] with the reason.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ring::digest;
use sentinel_core::{Degradation, EmbeddingSource, Outcome, ProviderSettings, VectorItem};
use thiserror::Error;
use tracing::{debug, warn};

use crate::rank::{self, Hit};

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("embedding request failed: {0}")]
    Request(String),

    #[error("provider returned no embedding")]
    Empty,

    #[error("embedding has {got} dimensions, expected {expected}")]
    Dimension { expected: usize, got: usize },
}

/// A remote embedding model. Implemented by the HTTP client crate.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Model identifier, recorded on every item this provider embeds.
    fn model(&self) -> &str;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;
}

/// Pure, reproducible stand-in vectors with no semantic signal.
///
/// SHA-256 of the text, each digest byte mapped to `b / 128 - 1` (so in
/// `[-1, 1)`), zero-padded to the configured dimension.
#[derive(Debug, Clone, Copy)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        let hash = digest::digest(&digest::SHA256, text.as_bytes());
        let mut v: Vec<f32> = hash
            .as_ref()
            .iter()
            .take(self.dim)
            .map(|&b| f32::from(b) / 128.0 - 1.0)
            .collect();
        v.resize(self.dim, 0.0);
        v
    }
}

/// A vector and the space it lives in.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcedEmbedding {
    pub vector: Vec<f32>,
    pub source: EmbeddingSource,
}

/// Embedding entry point used by corpus loading and retrieval.
#[derive(Clone)]
pub struct Embedder {
    provider: Option<Arc<dyn EmbeddingProvider>>,
    hash: HashEmbedder,
    timeout: Duration,
}

impl std::fmt::Debug for Embedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Embedder")
            .field("provider", &self.provider.as_ref().map(|p| p.model().to_string()))
            .field("dim", &self.hash.dim())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Embedder {
    pub fn new(provider: Option<Arc<dyn EmbeddingProvider>>, settings: &ProviderSettings) -> Self {
        Self {
            provider,
            hash: HashEmbedder::new(settings.dimension),
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    /// Embedder with no provider; every call degrades to the hash vector.
    pub fn hash_only(dim: usize) -> Self {
        Self {
            provider: None,
            hash: HashEmbedder::new(dim),
            timeout: Duration::ZERO,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn dim(&self) -> usize {
        self.hash.dim()
    }

    /// Source a successful provider call would produce.
    pub fn live_source(&self) -> Option<EmbeddingSource> {
        self.provider
            .as_ref()
            .map(|p| EmbeddingSource::Provider(p.model().to_string()))
    }

    /// Embed via the provider, falling back to the hash vector on any failure.
    pub async fn embed(&self, text: &str) -> Outcome<SourcedEmbedding> {
        let fallback = |reason: Degradation| {
            Outcome::degraded(
                SourcedEmbedding {
                    vector: self.hash.embed(text),
                    source: EmbeddingSource::HashFallback,
                },
                reason,
            )
        };

        let Some(provider) = &self.provider else {
            return fallback(Degradation::ProviderUnavailable);
        };

        match tokio::time::timeout(self.timeout, provider.embed(text)).await {
            Ok(Ok(vector)) if vector.len() == self.dim() => Outcome::ok(SourcedEmbedding {
                vector,
                source: EmbeddingSource::Provider(provider.model().to_string()),
            }),
            Ok(Ok(vector)) => {
                let err = EmbedError::Dimension {
                    expected: self.dim(),
                    got: vector.len(),
                };
                warn!(model = provider.model(), error = %err, "embedding rejected, using hash fallback");
                fallback(Degradation::ProviderError(err.to_string()))
            }
            Ok(Err(e)) => {
                warn!(model = provider.model(), error = %e, "embedding failed, using hash fallback");
                fallback(Degradation::ProviderError(e.to_string()))
            }
            Err(_) => {
                warn!(
                    model = provider.model(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "embedding timed out, using hash fallback"
                );
                fallback(Degradation::Timeout)
            }
        }
    }

    /// Hash vector without touching the provider.
    pub fn embed_hash(&self, text: &str) -> SourcedEmbedding {
        debug!(chars = text.len(), "hash embedding");
        SourcedEmbedding {
            vector: self.hash.embed(text),
            source: EmbeddingSource::HashFallback,
        }
    }
}

/// Cosine similarity rescaled to `[0, 1]` as `(1 + cos) / 2`.
///
/// Zero-norm or mismatched-length input gives 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let cos = (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0);
    (1.0 + cos) / 2.0
}

/// Rank `items` by similarity to `query`, descending, at most `top_k`.
///
/// Ties keep insertion order.
pub fn rank<'a>(query: &[f32], items: &'a [VectorItem], top_k: usize) -> Vec<Hit<'a, VectorItem>> {
    let hits = items
        .iter()
        .map(|item| Hit {
            item,
            score: cosine_similarity(query, &item.embedding),
        })
        .collect();
    rank::top_k(hits, top_k)
}
