//! Contract sessions keyed by [`SessionId`].
//!
//! Each session holds one immutable [`SessionContext`] behind an `Arc`.
//! Loading a new contract swaps the `Arc`, so a reader holding the old one
//! keeps a complete, consistent view.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, TimeDelta, Utc};
use sentinel_ai::Embedder;
use sentinel_core::{Clause, ClauseRef, Corpus, CorpusKind, RiskNote};
use serde::Serialize;
use tracing::{debug, info};

use crate::StoreError;
use crate::corpus::{CorpusEntry, embed_entries};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Everything known about one uploaded contract.
#[derive(Debug)]
pub struct SessionContext {
    pub text: String,
    pub clauses: Vec<Clause>,
    /// Risky clauses found when the contract was loaded.
    pub risky: Vec<RiskNote>,
    /// Embedded clauses, for retrieval.
    pub corpus: Corpus,
    pub loaded_at: DateTime<Utc>,
}

impl SessionContext {
    /// Embed the clauses and assemble a context.
    pub async fn build(
        text: String,
        clauses: Vec<Clause>,
        risky: Vec<RiskNote>,
        embedder: &Embedder,
    ) -> Self {
        let entries = clauses
            .iter()
            .map(|c| CorpusEntry {
                title: format!("Clause {}", c.index),
                text: c.text.clone(),
                index: c.index,
            })
            .collect();
        let corpus = embed_entries(CorpusKind::SessionContract, "contract", entries, embedder).await;
        Self {
            text,
            clauses,
            risky,
            corpus,
            loaded_at: Utc::now(),
        }
    }

    pub fn clause(&self, r: ClauseRef) -> Option<&Clause> {
        self.clauses.iter().find(|c| c.index == r.0)
    }
}

/// Process-wide registry of sessions with TTL eviction.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Arc<SessionContext>>>,
    ttl: TimeDelta,
    next_id: AtomicU64,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(TimeDelta::hours(1))
    }
}

impl SessionStore {
    pub fn new(ttl: TimeDelta) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
            next_id: AtomicU64::new(1),
        }
    }

    /// Allocate a session identifier. No contract is loaded yet.
    pub fn open(&self) -> SessionId {
        SessionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Replace the session's context wholesale.
    pub fn set_context(&self, id: SessionId, context: SessionContext) {
        let clauses = context.clauses.len();
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let replaced = sessions.insert(id, Arc::new(context)).is_some();
        info!(session = %id, clauses, replaced, "contract context set");
    }

    /// Drop the session's context. Returns whether one was loaded.
    pub fn clear_context(&self, id: SessionId) -> bool {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.remove(&id).is_some()
    }

    pub fn has_contract(&self, id: SessionId) -> bool {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions.contains_key(&id)
    }

    /// Snapshot of the session's context, or [`StoreError::NoContract`].
    pub fn context(&self, id: SessionId) -> Result<Arc<SessionContext>, StoreError> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions.get(&id).cloned().ok_or(StoreError::NoContract(id))
    }

    /// Remove sessions loaded more than the TTL before `now`.
    pub fn evict_expired(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, ctx| now - ctx.loaded_at <= self.ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, remaining = sessions.len(), "evicted expired sessions");
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn context(clauses: &[&str]) -> SessionContext {
        let clauses = Clause::numbered(clauses.iter().copied());
        SessionContext::build(
            clauses.iter().map(|c| c.text.as_str()).collect::<Vec<_>>().join("\n\n"),
            clauses,
            vec![],
            &Embedder::hash_only(16),
        )
        .await
    }

    #[tokio::test]
    async fn new_session_has_no_contract() {
        let store = SessionStore::default();
        let id = store.open();
        assert!(!store.has_contract(id));
        assert!(matches!(store.context(id), Err(StoreError::NoContract(_))));
    }

    #[tokio::test]
    async fn set_context_replaces_wholesale() {
        let store = SessionStore::default();
        let id = store.open();
        store.set_context(id, context(&["First contract clause one."]).await);
        let old = store.context(id).unwrap();

        store.set_context(id, context(&["Second contract A.", "Second contract B."]).await);
        let new = store.context(id).unwrap();

        // The old snapshot is untouched by the swap.
        assert_eq!(old.clauses.len(), 1);
        assert_eq!(old.corpus.len(), 1);
        assert_eq!(new.clauses.len(), 2);
        assert_eq!(new.corpus.len(), 2);
        assert_eq!(new.corpus.kind, CorpusKind::SessionContract);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = SessionStore::default();
        let a = store.open();
        let b = store.open();
        assert_ne!(a, b);
        store.set_context(a, context(&["Clause for session A only."]).await);
        assert!(store.has_contract(a));
        assert!(!store.has_contract(b));
    }

    #[tokio::test]
    async fn clear_and_evict() {
        let store = SessionStore::new(TimeDelta::minutes(30));
        let a = store.open();
        let b = store.open();
        store.set_context(a, context(&["Clause text for session A."]).await);
        store.set_context(b, context(&["Clause text for session B."]).await);

        assert!(store.clear_context(a));
        assert!(!store.clear_context(a));

        assert_eq!(store.evict_expired(Utc::now()), 0);
        assert_eq!(store.evict_expired(Utc::now() + TimeDelta::hours(2)), 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn clause_lookup_by_ref() {
        let ctx = context(&["First clause text here.", "Second clause text here."]).await;
        assert_eq!(ctx.clause(ClauseRef(2)).unwrap().text, "Second clause text here.");
        assert!(ctx.clause(ClauseRef(3)).is_none());
    }
}
