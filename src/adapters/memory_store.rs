use crate::common::store::{
    Document, DocumentPath, DocumentStore, Mutation, StoreError, StoreResult, Transaction,
    TransactionBackend, field_matches,
};
use async_trait::async_trait;
use hashbrown::HashMap;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};

struct Entry {
    version: u64,
    document: Document,
}

/// A query predicate: documents of `collection` whose `field` matches `value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Predicate {
    collection: &'static str,
    field: String,
    value: String,
}

#[derive(Default)]
struct MemoryState {
    documents: HashMap<DocumentPath, Entry>,
    clock: u64,
}

impl MemoryState {
    fn version_of(&self, path: &DocumentPath) -> Option<u64> {
        self.documents.get(path).map(|entry| entry.version)
    }

    /// Ids and versions of the documents matching `predicate`, sorted by id.
    fn matching(&self, predicate: &Predicate) -> Vec<(&DocumentPath, &Entry)> {
        let mut matches: Vec<(&DocumentPath, &Entry)> = self
            .documents
            .iter()
            .filter(|(path, entry)| {
                path.collection == predicate.collection
                    && field_matches(&entry.document, &predicate.field, &predicate.value)
            })
            .collect();
        matches.sort_by(|a, b| a.0.id.cmp(&b.0.id));
        matches
    }

    fn snapshot_of(&self, predicate: &Predicate) -> Vec<(String, u64)> {
        self.matching(predicate)
            .into_iter()
            .map(|(path, entry)| (path.id.clone(), entry.version))
            .collect()
    }

    fn apply(&mut self, mutation: Mutation) {
        self.clock += 1;
        let version = self.clock;
        match mutation {
            Mutation::Set { path, document } => {
                self.documents.insert(path, Entry { version, document });
            }
            Mutation::Merge { path, fields } => {
                let entry = self.documents.entry(path).or_insert_with(|| Entry {
                    version,
                    document: Document::new(),
                });
                entry.version = version;
                entry.document.extend(fields);
            }
            Mutation::Increment { path, field, delta } => {
                let entry = self.documents.entry(path).or_insert_with(|| Entry {
                    version,
                    document: Document::new(),
                });
                entry.version = version;
                let current = entry
                    .document
                    .get(field)
                    .and_then(Value::as_i64)
                    .unwrap_or(0);
                entry
                    .document
                    .insert(field.to_owned(), Value::from(current + delta));
            }
            Mutation::Delete { path } => {
                self.documents.remove(&path);
            }
        }
    }
}

/// In-process document store with optimistic concurrency control.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock(state: &Mutex<MemoryState>) -> StoreResult<MutexGuard<'_, MemoryState>> {
    state
        .lock()
        .map_err(|_| StoreError::Backend(anyhow::anyhow!("memory store lock poisoned")))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn begin(&self) -> StoreResult<Transaction> {
        Ok(Transaction::new(Box::new(MemoryTransaction {
            state: self.state.clone(),
            reads: HashMap::new(),
            queries: HashMap::new(),
        })))
    }
}

struct MemoryTransaction {
    state: Arc<Mutex<MemoryState>>,
    reads: HashMap<DocumentPath, Option<u64>>,
    // matched ids and versions per predicate; a changed set means a phantom
    queries: HashMap<Predicate, Vec<(String, u64)>>,
}

#[async_trait]
impl TransactionBackend for MemoryTransaction {
    async fn get(&mut self, path: &DocumentPath) -> StoreResult<Option<Document>> {
        // behave like remote I/O so concurrent transactions interleave
        tokio::task::yield_now().await;
        let state = lock(&self.state)?;
        let entry = state.documents.get(path);
        self.reads
            .entry(path.clone())
            .or_insert(entry.map(|entry| entry.version));
        Ok(entry.map(|entry| entry.document.clone()))
    }

    async fn query(
        &mut self,
        collection: &'static str,
        field: &str,
        value: &str,
    ) -> StoreResult<Vec<(String, Document)>> {
        tokio::task::yield_now().await;
        let state = lock(&self.state)?;
        let predicate = Predicate {
            collection,
            field: field.to_owned(),
            value: value.to_owned(),
        };
        let matches = state.matching(&predicate);
        self.queries.entry(predicate).or_insert_with(|| {
            matches
                .iter()
                .map(|(path, entry)| (path.id.clone(), entry.version))
                .collect()
        });
        Ok(matches
            .into_iter()
            .map(|(path, entry)| (path.id.clone(), entry.document.clone()))
            .collect())
    }

    async fn commit(self: Box<Self>, mutations: Vec<Mutation>) -> StoreResult<()> {
        let mut state = lock(&self.state)?;
        let stale_read = self
            .reads
            .iter()
            .any(|(path, version)| state.version_of(path) != *version);
        let stale_query = self
            .queries
            .iter()
            .any(|(predicate, matched)| state.snapshot_of(predicate) != *matched);
        if stale_read || stale_query {
            return Err(StoreError::Conflict);
        }
        for mutation in mutations {
            state.apply(mutation);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(id: &str) -> DocumentPath {
        DocumentPath::new("users", id)
    }

    #[tokio::test]
    async fn concurrent_writers_of_a_read_document_conflict() {
        let store = MemoryStore::new();
        let mut first = store.begin().await.unwrap();
        let mut second = store.begin().await.unwrap();

        assert!(first.get(&path("alice")).await.unwrap().is_none());
        assert!(second.get(&path("alice")).await.unwrap().is_none());

        first.set(path("alice"), &json!({ "name": "first" })).unwrap();
        second.set(path("alice"), &json!({ "name": "second" })).unwrap();

        first.commit().await.unwrap();
        assert!(matches!(second.commit().await, Err(StoreError::Conflict)));

        let mut reader = store.begin().await.unwrap();
        let document = reader.get(&path("alice")).await.unwrap().unwrap();
        assert_eq!(document.get("name"), Some(&json!("first")));
    }

    #[tokio::test]
    async fn validate_detects_a_torn_snapshot() {
        let store = MemoryStore::new();
        let mut reader = store.begin().await.unwrap();
        assert!(reader.get(&path("alice")).await.unwrap().is_none());

        let mut writer = store.begin().await.unwrap();
        writer.increment(path("alice"), "friendsCount", 1);
        writer.commit().await.unwrap();

        assert!(matches!(reader.validate().await, Err(StoreError::Conflict)));

        let mut untouched = store.begin().await.unwrap();
        assert!(untouched.get(&path("bob")).await.unwrap().is_none());
        untouched.validate().await.unwrap();
    }

    #[tokio::test]
    async fn blind_increments_commute() {
        let store = MemoryStore::new();
        let mut first = store.begin().await.unwrap();
        let mut second = store.begin().await.unwrap();
        first.increment(path("bob"), "incomingCount", 1);
        second.increment(path("bob"), "incomingCount", 1);
        first.commit().await.unwrap();
        second.commit().await.unwrap();

        let mut reader = store.begin().await.unwrap();
        let document = reader.get(&path("bob")).await.unwrap().unwrap();
        assert_eq!(document.get("incomingCount"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn reads_after_writes_are_rejected() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.delete(path("alice"));
        assert!(matches!(
            tx.get(&path("alice")).await,
            Err(StoreError::ReadAfterWrite(_))
        ));
    }

    #[tokio::test]
    async fn queries_conflict_with_matching_inserts() {
        let store = MemoryStore::new();
        let mut reader = store.begin().await.unwrap();
        let found: Vec<(String, Document)> = reader
            .query_as("friend_categories", "userId", "alice")
            .await
            .unwrap();
        assert!(found.is_empty());

        let mut writer = store.begin().await.unwrap();
        writer
            .set(
                DocumentPath::new("friend_categories", "study"),
                &json!({ "userId": "alice", "friendIds": ["bob"] }),
            )
            .unwrap();
        writer.commit().await.unwrap();

        reader.merge(path("alice"), Document::new());
        assert!(matches!(reader.commit().await, Err(StoreError::Conflict)));
    }

    #[tokio::test]
    async fn queries_ignore_writes_outside_their_predicate() {
        let store = MemoryStore::new();
        let mut reader = store.begin().await.unwrap();
        let found: Vec<(String, Document)> = reader
            .query_as("friend_categories", "userId", "alice")
            .await
            .unwrap();
        assert!(found.is_empty());

        let mut writer = store.begin().await.unwrap();
        writer
            .set(
                DocumentPath::new("friend_categories", "work"),
                &json!({ "userId": "carol", "friendIds": ["dave"] }),
            )
            .unwrap();
        writer.commit().await.unwrap();

        reader.merge(path("alice"), Document::new());
        reader.commit().await.unwrap();
    }

    #[tokio::test]
    async fn queries_conflict_when_a_match_changes_or_leaves() {
        let store = MemoryStore::new();
        let category = DocumentPath::new("friend_categories", "study");
        let mut seed = store.begin().await.unwrap();
        seed.set(
            category.clone(),
            &json!({ "userId": "alice", "friendIds": ["bob"] }),
        )
        .unwrap();
        seed.commit().await.unwrap();

        let mut reader = store.begin().await.unwrap();
        let found: Vec<(String, Document)> = reader
            .query_as("friend_categories", "userId", "alice")
            .await
            .unwrap();
        assert_eq!(found.len(), 1);

        let mut writer = store.begin().await.unwrap();
        writer.delete(category);
        writer.commit().await.unwrap();

        assert!(matches!(reader.validate().await, Err(StoreError::Conflict)));
    }

    #[tokio::test]
    async fn array_fields_match_by_membership() {
        let store = MemoryStore::new();
        let mut writer = store.begin().await.unwrap();
        writer
            .set(
                DocumentPath::new("friendships", "alice__bob"),
                &json!({ "uids": ["alice", "bob"] }),
            )
            .unwrap();
        writer.commit().await.unwrap();

        let mut reader = store.begin().await.unwrap();
        let found: Vec<(String, Document)> =
            reader.query_as("friendships", "uids", "bob").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, "alice__bob");
    }
}
