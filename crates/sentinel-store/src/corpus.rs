//! Statute and reference corpora: parsing, loading, and embedding.
//!
//! Corpus files are plain text split into entries by separator lines (a line
//! starting with ten or more `=`). The first line of each entry is its title.
//! Entries shorter than 50 characters are headers or noise and are dropped.

use std::path::Path;
use std::sync::Arc;

use futures::StreamExt;
use sentinel_ai::Embedder;
use sentinel_core::{Corpus, CorpusKind, EmbeddingSource, ItemMetadata, VectorItem};
use serde::Serialize;
use tracing::{info, warn};

use crate::StoreError;

pub const BUILTIN_STATUTES: &str = include_str!("../data/statutes.txt");
pub const BUILTIN_REFERENCES: &str = include_str!("../data/reference_clauses.txt");

const SEPARATOR: &str = "==========";
const MIN_ENTRY_CHARS: usize = 50;
const EMBED_CONCURRENCY: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
    pub title: String,
    pub text: String,
    /// Position of the block in the source file.
    pub index: usize,
}

/// Split corpus text into titled entries.
pub fn parse_entries(raw: &str) -> Vec<CorpusEntry> {
    let mut blocks: Vec<String> = vec![String::new()];
    for line in raw.lines() {
        if line.trim_start().starts_with(SEPARATOR) {
            blocks.push(String::new());
        } else if let Some(current) = blocks.last_mut() {
            current.push_str(line);
            current.push('\n');
        }
    }

    blocks
        .into_iter()
        .enumerate()
        .filter_map(|(index, block)| {
            let text = block.trim();
            if text.chars().count() < MIN_ENTRY_CHARS {
                return None;
            }
            let title = text.lines().next().unwrap_or_default().trim().to_string();
            Some(CorpusEntry {
                title,
                text: text.to_string(),
                index,
            })
        })
        .collect()
}

/// Read a corpus file.
pub fn read_corpus_file(path: &Path) -> Result<String, StoreError> {
    if !path.exists() {
        return Err(StoreError::CorpusNotFound(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Embed entries into a corpus.
///
/// Every item in the result shares one embedding source: if the provider
/// fails for any entry, the whole corpus is re-embedded with the hash
/// fallback so no corpus mixes vector spaces.
pub async fn embed_entries(
    kind: CorpusKind,
    source: &str,
    entries: Vec<CorpusEntry>,
    embedder: &Embedder,
) -> Corpus {
    let embedded: Vec<_> = futures::stream::iter(entries)
        .map(|entry| async move {
            let outcome = embedder.embed(&entry.text).await;
            (entry, outcome)
        })
        .buffered(EMBED_CONCURRENCY)
        .collect()
        .await;

    let degraded = embedded.iter().filter(|(_, o)| !o.is_ok()).count();
    let all_hash = degraded > 0;
    if degraded > 0 && degraded < embedded.len() {
        warn!(
            corpus = %kind,
            degraded,
            total = embedded.len(),
            "partial provider failure, using hash embeddings for the whole corpus"
        );
    }

    let items = embedded
        .into_iter()
        .filter_map(|(entry, outcome)| {
            let embedding = if all_hash {
                embedder.embed_hash(&entry.text)
            } else {
                outcome.into_value()?
            };
            Some(VectorItem {
                text: entry.text,
                embedding: embedding.vector,
                embedding_source: embedding.source,
                metadata: ItemMetadata {
                    source: source.to_string(),
                    title: entry.title,
                    index: entry.index,
                },
            })
        })
        .collect();

    Corpus::new(kind, items)
}

/// Static corpora loaded once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    pub statutes: Arc<Corpus>,
    pub references: Arc<Corpus>,
}

impl KnowledgeBase {
    /// Load both corpora, from files when given, otherwise the built-in text.
    pub async fn load(
        statutes: Option<&Path>,
        references: Option<&Path>,
        embedder: &Embedder,
    ) -> Result<Self, StoreError> {
        let statutes = load_one(CorpusKind::Statute, statutes, BUILTIN_STATUTES, embedder).await?;
        let references =
            load_one(CorpusKind::Reference, references, BUILTIN_REFERENCES, embedder).await?;
        Ok(Self {
            statutes: Arc::new(statutes),
            references: Arc::new(references),
        })
    }

    /// Built-in corpora embedded with the hash fallback only.
    pub async fn builtin(dim: usize) -> Result<Self, StoreError> {
        Self::load(None, None, &Embedder::hash_only(dim)).await
    }

    pub fn stats(&self, dim: usize) -> Vec<CorpusStats> {
        vec![
            CorpusStats::of(&self.statutes, dim),
            CorpusStats::of(&self.references, dim),
        ]
    }
}

async fn load_one(
    kind: CorpusKind,
    path: Option<&Path>,
    builtin: &str,
    embedder: &Embedder,
) -> Result<Corpus, StoreError> {
    let (raw, source) = match path {
        Some(p) => (read_corpus_file(p)?, p.display().to_string()),
        None => (builtin.to_string(), "builtin".to_string()),
    };

    let entries = parse_entries(&raw);
    if entries.is_empty() {
        return Err(StoreError::EmptyCorpus(source));
    }

    let corpus = embed_entries(kind, &source, entries, embedder).await;
    info!(
        corpus = %kind,
        source = %source,
        items = corpus.len(),
        embedding = %corpus
            .embedding_source()
            .map(ToString::to_string)
            .unwrap_or_else(|| "none".into()),
        "loaded corpus"
    );
    Ok(corpus)
}

/// Size and provenance of one corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusStats {
    pub kind: CorpusKind,
    pub items: usize,
    pub embedding_source: Option<EmbeddingSource>,
    pub dim: usize,
}

impl CorpusStats {
    pub fn of(corpus: &Corpus, dim: usize) -> Self {
        Self {
            kind: corpus.kind,
            items: corpus.len(),
            embedding_source: corpus.embedding_source().cloned(),
            dim,
        }
    }
}
