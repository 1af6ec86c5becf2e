//! Retrievable text pools and their vector items.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three independent corpora.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorpusKind {
    /// Statute sections, loaded once at startup.
    Statute,
    /// Reference clauses with explanations, loaded once at startup.
    Reference,
    /// Clauses of the contract loaded into a session.
    SessionContract,
}

impl CorpusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Statute => "statute",
            Self::Reference => "reference",
            Self::SessionContract => "session_contract",
        }
    }
}

impl fmt::Display for CorpusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an embedding came from. Vectors from different sources live in
/// different spaces and must not be compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "model", rename_all = "snake_case")]
pub enum EmbeddingSource {
    Provider(String),
    HashFallback,
}

impl EmbeddingSource {
    pub fn is_semantic(&self) -> bool {
        matches!(self, Self::Provider(_))
    }
}

impl fmt::Display for EmbeddingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider(model) => write!(f, "provider:{model}"),
            Self::HashFallback => f.write_str("hash-fallback"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMetadata {
    pub source: String,
    pub title: String,
    /// Position within the corpus source (section order, clause number).
    pub index: usize,
}

/// A corpus entry. The embedding is computed once when the item enters a
/// corpus and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorItem {
    pub text: String,
    pub embedding: Vec<f32>,
    pub embedding_source: EmbeddingSource,
    pub metadata: ItemMetadata,
}

/// An immutable pool of items. Replacing a corpus means building a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    pub kind: CorpusKind,
    pub items: Vec<VectorItem>,
}

impl Corpus {
    pub fn new(kind: CorpusKind, items: Vec<VectorItem>) -> Self {
        Self { kind, items }
    }

    pub fn empty(kind: CorpusKind) -> Self {
        Self::new(kind, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The shared embedding source, if every item agrees on one.
    pub fn embedding_source(&self) -> Option<&EmbeddingSource> {
        let first = &self.items.first()?.embedding_source;
        self.items
            .iter()
            .all(|i| &i.embedding_source == first)
            .then_some(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(source: EmbeddingSource) -> VectorItem {
        VectorItem {
            text: "text".into(),
            embedding: vec![0.0; 4],
            embedding_source: source,
            metadata: ItemMetadata {
                source: "test".into(),
                title: "t".into(),
                index: 0,
            },
        }
    }

    #[test]
    fn uniform_source_is_reported() {
        let c = Corpus::new(
            CorpusKind::Statute,
            vec![item(EmbeddingSource::HashFallback), item(EmbeddingSource::HashFallback)],
        );
        assert_eq!(c.embedding_source(), Some(&EmbeddingSource::HashFallback));
    }

    #[test]
    fn mixed_sources_have_no_shared_source() {
        let c = Corpus::new(
            CorpusKind::Statute,
            vec![
                item(EmbeddingSource::HashFallback),
                item(EmbeddingSource::Provider("m".into())),
            ],
        );
        assert_eq!(c.embedding_source(), None);
        assert_eq!(Corpus::empty(CorpusKind::Reference).embedding_source(), None);
    }
}
