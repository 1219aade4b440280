//! On-demand label resolution over the persisted cache
//!
//! Resolution order per identifier: syntax check, no-label set, cache,
//! remote query. A batch locks the store once, resolves sequentially
//! (two in-flight resolutions for the same identifier can therefore not
//! both reach the remote service) and flushes the store once at the end.

use crate::error::{LabelError, Result};
use crate::store::LabelStore;
use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Remote label lookup contract.
///
/// Implementations issue one parameterized query and return the
/// candidate label values of the result bindings, in source order.
/// An empty vector means the identifier has no known label.
#[async_trait]
pub trait LabelQuery: Send + Sync {
    async fn query_label(&self, uid: &str) -> Result<Vec<String>>;
}

/// Whether a token matches the entity-identifier syntax (Q or P + digits).
pub fn is_entity_id(token: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[QP]\d+$").expect("valid identifier regex"))
        .is_match(token)
}

/// Label resolver: exclusive owner of the label store, shared across
/// requests behind an async mutex.
pub struct LabelResolver {
    store: Mutex<LabelStore>,
    query: Arc<dyn LabelQuery>,
    entity_prefix: String,
}

impl LabelResolver {
    pub fn new(store: LabelStore, query: Arc<dyn LabelQuery>, entity_prefix: impl Into<String>) -> Self {
        Self {
            store: Mutex::new(store),
            query,
            entity_prefix: entity_prefix.into(),
        }
    }

    /// Resolve a batch of identifiers to labels.
    ///
    /// Each identifier resolves independently; the updated cache is
    /// flushed once per batch. A flush failure is logged and does not
    /// fail the batch (the lost entries re-derive cheaply on next run).
    pub async fn resolve_many<I, S>(&self, ids: I) -> Result<HashMap<String, String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut store = self.store.lock().await;
        let mut resolved = HashMap::new();
        for id in ids {
            let id = id.as_ref();
            let label = self.resolve_one(&mut store, id).await?;
            resolved.insert(id.to_string(), label);
        }
        if let Err(e) = store.flush() {
            warn!(error = %e, "failed to flush label store after batch");
        }
        Ok(resolved)
    }

    async fn resolve_one(&self, store: &mut LabelStore, uid: &str) -> Result<String> {
        // Non-entity tokens (literal URIs, plain strings) are already resolved.
        if !is_entity_id(uid) {
            return Ok(uid.to_string());
        }

        // Known to have no label: stable placeholder, no remote call.
        if store.has_no_label(uid) {
            return Ok(format!("{}{}", self.entity_prefix, uid));
        }

        if let Some(label) = store.get(uid) {
            return Ok(label.to_string());
        }

        let bindings = self.query.query_label(uid).await?;
        match bindings.into_iter().next() {
            // First result wins; upstream ordering is not guaranteed stable.
            Some(label) => {
                debug!(uid, label = %label, "label resolved remotely");
                store.insert(uid, label.clone());
                Ok(label)
            }
            None => {
                debug!(uid, "no label bindings, recording in no-label set");
                store.mark_no_label(uid);
                Ok(format!("{}{}", self.entity_prefix, uid))
            }
        }
    }

    /// (cached labels, no-label entries) counts, for the stats endpoint.
    pub async fn cache_sizes(&self) -> (usize, usize) {
        let store = self.store.lock().await;
        (store.len(), store.no_label_len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    const PREFIX: &str = "http://www.wikidata.org/entity/";

    /// Mock remote that counts queries and serves a fixed mapping.
    struct FixedQuery {
        answers: HashMap<String, Vec<String>>,
        calls: AtomicUsize,
    }

    impl FixedQuery {
        fn new(answers: &[(&str, &[&str])]) -> Self {
            Self {
                answers: answers
                    .iter()
                    .map(|(k, v)| {
                        (
                            k.to_string(),
                            v.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
                        )
                    })
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LabelQuery for FixedQuery {
        async fn query_label(&self, uid: &str) -> Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.answers.get(uid).cloned().unwrap_or_default())
        }
    }

    /// Mock remote that always fails with an upstream status.
    struct FailingQuery;

    #[async_trait]
    impl LabelQuery for FailingQuery {
        async fn query_label(&self, _uid: &str) -> Result<Vec<String>> {
            Err(LabelError::remote(503, "endpoint overloaded"))
        }
    }

    fn resolver(tmp: &TempDir, query: Arc<dyn LabelQuery>) -> LabelResolver {
        let store = LabelStore::open(tmp.path().join("labels_map.json")).unwrap();
        LabelResolver::new(store, query, PREFIX)
    }

    #[test]
    fn entity_id_syntax() {
        assert!(is_entity_id("Q1"));
        assert!(is_entity_id("P31"));
        assert!(!is_entity_id("q1"));
        assert!(!is_entity_id("Q1b"));
        assert!(!is_entity_id("http://example.org/Q1"));
        assert!(!is_entity_id(""));
    }

    #[tokio::test]
    async fn non_entity_tokens_resolve_to_themselves() {
        let tmp = TempDir::new().unwrap();
        let query = Arc::new(FixedQuery::new(&[]));
        let r = resolver(&tmp, query.clone());

        let out = r
            .resolve_many(["https://example.org/page", "plain text"])
            .await
            .unwrap();
        assert_eq!(out["https://example.org/page"], "https://example.org/page");
        assert_eq!(out["plain text"], "plain text");
        assert_eq!(query.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn second_resolution_hits_the_cache() {
        let tmp = TempDir::new().unwrap();
        let query = Arc::new(FixedQuery::new(&[("Q2", &["class"][..])]));
        let r = resolver(&tmp, query.clone());

        let first = r.resolve_many(["Q2"]).await.unwrap();
        let second = r.resolve_many(["Q2"]).await.unwrap();
        assert_eq!(first["Q2"], "class");
        assert_eq!(second["Q2"], "class");
        assert_eq!(query.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_bindings_uses_placeholder_and_never_requeries() {
        let tmp = TempDir::new().unwrap();
        let query = Arc::new(FixedQuery::new(&[("Q404", &[][..])]));
        let r = resolver(&tmp, query.clone());

        let first = r.resolve_many(["Q404"]).await.unwrap();
        let second = r.resolve_many(["Q404"]).await.unwrap();
        let placeholder = format!("{PREFIX}Q404");
        assert_eq!(first["Q404"], placeholder);
        assert_eq!(second["Q404"], placeholder);
        assert_eq!(query.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn first_binding_wins() {
        let tmp = TempDir::new().unwrap();
        let query = Arc::new(FixedQuery::new(&[("P31", &["instance of", "type"][..])]));
        let r = resolver(&tmp, query);

        let out = r.resolve_many(["P31"]).await.unwrap();
        assert_eq!(out["P31"], "instance of");
    }

    #[tokio::test]
    async fn remote_fault_aborts_the_batch() {
        let tmp = TempDir::new().unwrap();
        let r = resolver(&tmp, Arc::new(FailingQuery));

        let err = r.resolve_many(["Q2"]).await.unwrap_err();
        match err {
            LabelError::Remote { status, .. } => assert_eq!(status, 503),
            other => panic!("expected remote fault, got {other}"),
        }
    }

    #[tokio::test]
    async fn batch_flush_persists_new_labels() {
        let tmp = TempDir::new().unwrap();
        let query = Arc::new(FixedQuery::new(&[("Q2", &["class"][..])]));
        {
            let r = resolver(&tmp, query);
            r.resolve_many(["Q2"]).await.unwrap();
        }
        // Fresh resolver over the same file: no remote call needed.
        let counting = Arc::new(FixedQuery::new(&[]));
        let r = resolver(&tmp, counting.clone());
        let out = r.resolve_many(["Q2"]).await.unwrap();
        assert_eq!(out["Q2"], "class");
        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
    }
}
