//! Document store abstraction with optimistic transactions.
//!
//! A [`Transaction`] buffers every write until [`Transaction::commit`]. Reads
//! after the first buffered write are rejected, so every transition performs
//! its reads up front and sees one snapshot. Backends validate at commit time
//! that nothing they read has changed and report [`StoreError::Conflict`]
//! otherwise.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;

pub type Document = Map<String, Value>;
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    pub collection: &'static str,
    pub id: String,
}

impl DocumentPath {
    pub fn new(collection: &'static str, id: impl Into<String>) -> Self {
        Self {
            collection,
            id: id.into(),
        }
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Replaces the whole document, creating it when missing.
    Set { path: DocumentPath, document: Document },
    /// Overwrites the given top level fields, creating the document when missing.
    Merge { path: DocumentPath, fields: Document },
    /// Adds `delta` to an integer field without reading it first.
    Increment {
        path: DocumentPath,
        field: &'static str,
        delta: i64,
    },
    Delete { path: DocumentPath },
}

impl Mutation {
    pub fn path(&self) -> &DocumentPath {
        match self {
            Mutation::Set { path, .. }
            | Mutation::Merge { path, .. }
            | Mutation::Increment { path, .. }
            | Mutation::Delete { path } => path,
        }
    }
}

#[derive(Debug)]
pub enum StoreError {
    Conflict,
    ReadAfterWrite(DocumentPath),
    Backend(anyhow::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Conflict => write!(f, "transaction conflicted with a concurrent write"),
            StoreError::ReadAfterWrite(path) => {
                write!(f, "read of {path} issued after a write in the same transaction")
            }
            StoreError::Backend(e) => write!(f, "store backend error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Backend(e.into())
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(e: redis::RedisError) -> Self {
        StoreError::Backend(e.into())
    }
}

impl From<deadpool::managed::PoolError<redis::RedisError>> for StoreError {
    fn from(e: deadpool::managed::PoolError<redis::RedisError>) -> Self {
        StoreError::Backend(e.into())
    }
}

/// Backend half of a transaction: snapshot reads plus the atomic commit.
#[async_trait]
pub trait TransactionBackend: Send {
    async fn get(&mut self, path: &DocumentPath) -> StoreResult<Option<Document>>;

    /// Documents of `collection` whose `field` equals `value`, or contains it
    /// when the field is an array.
    async fn query(
        &mut self,
        collection: &'static str,
        field: &str,
        value: &str,
    ) -> StoreResult<Vec<(String, Document)>>;

    /// Applies `mutations` atomically. With no mutations this only checks
    /// that the reads are still current.
    async fn commit(self: Box<Self>, mutations: Vec<Mutation>) -> StoreResult<()>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn begin(&self) -> StoreResult<Transaction>;
}

pub struct Transaction {
    backend: Box<dyn TransactionBackend>,
    mutations: Vec<Mutation>,
}

impl Transaction {
    pub fn new(backend: Box<dyn TransactionBackend>) -> Self {
        Self {
            backend,
            mutations: Vec::new(),
        }
    }

    fn ensure_readable(&self, path: &DocumentPath) -> StoreResult<()> {
        match self.mutations.is_empty() {
            true => Ok(()),
            false => Err(StoreError::ReadAfterWrite(path.clone())),
        }
    }

    pub async fn get(&mut self, path: &DocumentPath) -> StoreResult<Option<Document>> {
        self.ensure_readable(path)?;
        self.backend.get(path).await
    }

    pub async fn get_as<T: DeserializeOwned>(
        &mut self,
        path: &DocumentPath,
    ) -> StoreResult<Option<T>> {
        match self.get(path).await? {
            Some(document) => Ok(Some(from_document(document)?)),
            None => Ok(None),
        }
    }

    pub async fn query_as<T: DeserializeOwned>(
        &mut self,
        collection: &'static str,
        field: &str,
        value: &str,
    ) -> StoreResult<Vec<(String, T)>> {
        self.ensure_readable(&DocumentPath::new(collection, "*"))?;
        let documents = self.backend.query(collection, field, value).await?;
        documents
            .into_iter()
            .map(|(id, document)| Ok((id, from_document(document)?)))
            .collect()
    }

    pub fn set<T: Serialize>(&mut self, path: DocumentPath, value: &T) -> StoreResult<()> {
        let document = to_document(value)?;
        self.mutations.push(Mutation::Set { path, document });
        Ok(())
    }

    pub fn merge(&mut self, path: DocumentPath, fields: Document) {
        self.mutations.push(Mutation::Merge { path, fields });
    }

    pub fn increment(&mut self, path: DocumentPath, field: &'static str, delta: i64) {
        if delta != 0 {
            self.mutations.push(Mutation::Increment { path, field, delta });
        }
    }

    pub fn delete(&mut self, path: DocumentPath) {
        self.mutations.push(Mutation::Delete { path });
    }

    pub async fn commit(self) -> StoreResult<()> {
        self.backend.commit(self.mutations).await
    }

    /// Discards buffered writes, reporting `Conflict` when anything read has
    /// changed since, i.e. when the reads were not one consistent snapshot.
    pub async fn validate(self) -> StoreResult<()> {
        self.backend.commit(Vec::new()).await
    }
}

pub fn to_document<T: Serialize>(value: &T) -> StoreResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(document) => Ok(document),
        other => Err(StoreError::Backend(anyhow::anyhow!(
            "documents must serialize to objects, got {other}"
        ))),
    }
}

pub fn from_document<T: DeserializeOwned>(document: Document) -> StoreResult<T> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

/// Equality on a top level string field, or membership when the field is an array.
pub fn field_matches(document: &Document, field: &str, value: &str) -> bool {
    match document.get(field) {
        Some(Value::String(s)) => s == value,
        Some(Value::Array(items)) => items.iter().any(|item| item.as_str() == Some(value)),
        _ => false,
    }
}
