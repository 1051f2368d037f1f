use crate::common::redis_pool::{Connection, RedisPool};
use crate::common::store::{
    Document, DocumentPath, DocumentStore, Mutation, StoreError, StoreResult, Transaction,
    TransactionBackend, field_matches,
};
use crate::entities;
use crate::repositories;
use async_trait::async_trait;
use hashbrown::{HashMap, HashSet};
use serde_json::Value;
use std::ops::DerefMut;

const DOCUMENTS_PREFIX: &str = "relationships:docs";
const INDEX_PREFIX: &str = "relationships:index";

fn make_document_key(path: &DocumentPath) -> String {
    format!("{DOCUMENTS_PREFIX}:{}:{}", path.collection, path.id)
}

fn make_index_key(collection: &str, field: &str, value: &str) -> String {
    format!("{INDEX_PREFIX}:{collection}:{field}:{value}")
}

/// Fields that can be queried. Every value of one has an index set holding
/// the ids of the documents carrying it.
fn indexed_fields(collection: &str) -> &'static [&'static str] {
    match collection {
        repositories::blocks::COLLECTION => &[entities::blocks::BLOCKER_FIELD],
        repositories::friend_categories::COLLECTION => {
            &[entities::friend_categories::USER_ID_FIELD]
        }
        repositories::friend_requests::COLLECTION => &[
            entities::friend_requests::FROM_UID_FIELD,
            entities::friend_requests::TO_UID_FIELD,
        ],
        repositories::friendships::COLLECTION => &[entities::friendships::UIDS_FIELD],
        repositories::notifications::COLLECTION => &[entities::notifications::USER_ID_FIELD],
        _ => &[],
    }
}

/// Index sets `document` belongs to. Array fields index each string element.
fn index_keys(collection: &str, document: &Document) -> HashSet<String> {
    let mut keys = HashSet::new();
    for field in indexed_fields(collection) {
        match document.get(*field) {
            Some(Value::String(value)) => {
                keys.insert(make_index_key(collection, field, value));
            }
            Some(Value::Array(items)) => keys.extend(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|value| make_index_key(collection, field, value)),
            ),
            _ => {}
        }
    }
    keys
}

/// Applies `mutation` to a local copy of the document. Counters are never
/// indexed, so increments are skipped.
fn apply_locally(document: &mut Option<Document>, mutation: &Mutation) {
    match mutation {
        Mutation::Set { document: new, .. } => *document = Some(new.clone()),
        Mutation::Merge { fields, .. } => document
            .get_or_insert_with(Document::new)
            .extend(fields.clone()),
        Mutation::Increment { .. } => {}
        Mutation::Delete { .. } => *document = None,
    }
}

#[derive(Debug, Default)]
struct IndexChanges {
    added: Vec<(String, String)>,
    removed: Vec<(String, String)>,
}

/// Documents are Redis hashes of field -> JSON value. Integer fields stay
/// plain numbers so `HINCRBY` applies deltas server side.
fn decode_document(fields: HashMap<String, String>) -> StoreResult<Option<Document>> {
    if fields.is_empty() {
        return Ok(None);
    }
    let mut document = Document::new();
    for (field, encoded) in fields {
        let value = match serde_json::from_str(&encoded) {
            Ok(value) => value,
            Err(_) => Value::String(encoded),
        };
        document.insert(field, value);
    }
    Ok(Some(document))
}

fn encode_fields(document: &Document) -> StoreResult<Vec<(String, String)>> {
    document
        .iter()
        .map(|(field, value)| Ok((field.clone(), serde_json::to_string(value)?)))
        .collect()
}

/// Document store over Redis using `WATCH`/`MULTI`/`EXEC` optimistic transactions.
#[derive(Clone)]
pub struct RedisStore {
    pool: RedisPool,
}

impl RedisStore {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for RedisStore {
    async fn begin(&self) -> StoreResult<Transaction> {
        // each transaction owns its pooled connection so WATCH state is not shared
        let conn = self.pool.get().await?;
        Ok(Transaction::new(Box::new(RedisTransaction { conn })))
    }
}

struct RedisTransaction {
    conn: Connection,
}

impl RedisTransaction {
    async fn watch(&mut self, keys: &[String]) -> StoreResult<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let _: () = redis::cmd("WATCH")
            .arg(keys)
            .query_async(self.conn.deref_mut())
            .await?;
        Ok(())
    }

    async fn fetch(&mut self, key: &str) -> StoreResult<Option<Document>> {
        let fields: HashMap<String, String> = redis::cmd("HGETALL")
            .arg(key)
            .query_async(self.conn.deref_mut())
            .await?;
        decode_document(fields)
    }

    /// Works out which index sets gain or lose an id once `mutations` apply.
    /// Every touched indexed document is watched so the diff stays valid
    /// until `EXEC`.
    async fn plan_index_changes(&mut self, mutations: &[Mutation]) -> StoreResult<IndexChanges> {
        let mut documents: HashMap<DocumentPath, (HashSet<String>, Option<Document>)> =
            HashMap::new();
        for mutation in mutations {
            let path = mutation.path();
            if indexed_fields(path.collection).is_empty() {
                continue;
            }
            if !documents.contains_key(path) {
                let key = make_document_key(path);
                self.watch(std::slice::from_ref(&key)).await?;
                let current = self.fetch(&key).await?;
                let before = current
                    .as_ref()
                    .map(|document| index_keys(path.collection, document))
                    .unwrap_or_default();
                documents.insert(path.clone(), (before, current));
            }
            if let Some((_, current)) = documents.get_mut(path) {
                apply_locally(current, mutation);
            }
        }

        let mut changes = IndexChanges::default();
        for (path, (before, current)) in documents {
            let after = current
                .as_ref()
                .map(|document| index_keys(path.collection, document))
                .unwrap_or_default();
            for key in before.difference(&after) {
                changes.removed.push((key.clone(), path.id.clone()));
            }
            for key in after.difference(&before) {
                changes.added.push((key.clone(), path.id.clone()));
            }
        }
        Ok(changes)
    }
}

#[async_trait]
impl TransactionBackend for RedisTransaction {
    async fn get(&mut self, path: &DocumentPath) -> StoreResult<Option<Document>> {
        let key = make_document_key(path);
        self.watch(std::slice::from_ref(&key)).await?;
        self.fetch(&key).await
    }

    async fn query(
        &mut self,
        collection: &'static str,
        field: &str,
        value: &str,
    ) -> StoreResult<Vec<(String, Document)>> {
        if !indexed_fields(collection).iter().any(|indexed| *indexed == field) {
            return Err(StoreError::Backend(anyhow::anyhow!(
                "{collection}.{field} is not indexed"
            )));
        }
        let index_key = make_index_key(collection, field, value);
        self.watch(std::slice::from_ref(&index_key)).await?;
        let mut ids: Vec<String> = redis::cmd("SMEMBERS")
            .arg(&index_key)
            .query_async(self.conn.deref_mut())
            .await?;
        ids.sort();

        let keys: Vec<String> = ids
            .iter()
            .map(|id| make_document_key(&DocumentPath::new(collection, id.clone())))
            .collect();
        self.watch(&keys).await?;

        let mut matches = Vec::new();
        for (id, key) in ids.into_iter().zip(keys) {
            if let Some(document) = self.fetch(&key).await? {
                if field_matches(&document, field, value) {
                    matches.push((id, document));
                }
            }
        }
        Ok(matches)
    }

    async fn commit(mut self: Box<Self>, mutations: Vec<Mutation>) -> StoreResult<()> {
        let changes = self.plan_index_changes(&mutations).await?;
        let mut conn = self.conn;
        let mut pipe = redis::pipe();
        pipe.atomic();
        for mutation in &mutations {
            let key = make_document_key(mutation.path());
            match mutation {
                Mutation::Set { document, .. } => {
                    pipe.del(&key).ignore();
                    let fields = encode_fields(document)?;
                    if !fields.is_empty() {
                        pipe.hset_multiple(&key, fields.as_slice()).ignore();
                    }
                }
                Mutation::Merge { fields, .. } => {
                    let fields = encode_fields(fields)?;
                    if !fields.is_empty() {
                        pipe.hset_multiple(&key, fields.as_slice()).ignore();
                    }
                }
                Mutation::Increment { field, delta, .. } => {
                    pipe.hincr(&key, *field, *delta).ignore();
                }
                Mutation::Delete { .. } => {
                    pipe.del(&key).ignore();
                }
            }
        }
        for (index_key, id) in &changes.removed {
            pipe.srem(index_key, id).ignore();
        }
        for (index_key, id) in &changes.added {
            pipe.sadd(index_key, id).ignore();
        }

        // EXEC replies nil when a watched key changed
        let committed: Option<()> = if mutations.is_empty() {
            let _: () = redis::cmd("MULTI").query_async(conn.deref_mut()).await?;
            redis::cmd("EXEC").query_async(conn.deref_mut()).await?
        } else {
            pipe.query_async(conn.deref_mut()).await?
        };
        match committed {
            Some(()) => Ok(()),
            None => Err(StoreError::Conflict),
        }
    }
}
