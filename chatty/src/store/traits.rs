//! Remote store trait definitions.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{StorePath, Subscription};
use crate::error::{Error, Result};
use crate::models::{parse_children, FromRecord, ToRecord};

/// A live query: a path plus optional ordering and limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub path: StorePath,
    /// Order children by this child field, ascending.
    pub order_by: Option<String>,
    /// Keep only the last `n` children after ordering.
    pub limit_to_last: Option<usize>,
}

impl Query {
    /// Query the node at `path`.
    pub fn new(path: StorePath) -> Self {
        Self {
            path,
            order_by: None,
            limit_to_last: None,
        }
    }

    /// Order children by a child field.
    pub fn order_by(mut self, child: impl Into<String>) -> Self {
        self.order_by = Some(child.into());
        self
    }

    /// Keep only the last `n` children.
    pub fn limit_to_last(mut self, n: usize) -> Self {
        self.limit_to_last = Some(n);
        self
    }
}

/// A keyed child of a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub key: String,
    pub value: Value,
}

/// The result of a query at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub path: StorePath,
    /// The node itself, `None` when nothing is stored there.
    pub value: Option<Value>,
    /// Children in query order.
    pub children: Vec<Document>,
}

impl Snapshot {
    /// A snapshot of an absent node.
    pub fn empty(path: StorePath) -> Self {
        Self {
            path,
            value: None,
            children: Vec::new(),
        }
    }

    /// Check if anything is stored at the path.
    pub fn exists(&self) -> bool {
        self.value.is_some()
    }

    /// Parse the node itself as a record.
    pub fn parse<T: FromRecord>(&self) -> Option<T> {
        let key = self.path.key().unwrap_or_default();
        self.value.as_ref().and_then(|v| T::from_record(key, v))
    }

    /// Parse every child as a record, skipping malformed ones.
    pub fn parse_children<T: FromRecord>(&self) -> Vec<T> {
        parse_children(
            self.children
                .iter()
                .map(|doc| (doc.key.as_str(), &doc.value)),
        )
    }
}

/// A realtime document store with subscribe/push semantics.
#[async_trait]
pub trait RemoteStore: Send + Sync + std::fmt::Debug {
    /// Subscribe to a query. The current result is delivered first, then a
    /// fresh snapshot after every change that touches the queried path.
    async fn subscribe(&self, query: Query) -> Result<Subscription>;

    /// Generate a unique, chronologically increasing child key.
    fn generate_key(&self) -> String;

    /// Replace the node at `path`. Writing `null` removes it.
    async fn set(&self, path: &StorePath, value: Value) -> Result<()>;

    /// Write the given child fields of the node at `path`, leaving the others.
    async fn update(&self, path: &StorePath, fields: Map<String, Value>) -> Result<()>;

    /// Append `value` under `path` with a generated key.
    async fn push(&self, path: &StorePath, value: Value) -> Result<String> {
        let key = self.generate_key();
        self.set(&path.child(key.as_str()), value).await?;
        Ok(key)
    }
}

/// Extension trait for remote stores with typed operations.
#[async_trait]
pub trait RemoteStoreExt: RemoteStore {
    /// Write a typed record.
    async fn set_record<T: ToRecord + Sync>(&self, path: &StorePath, record: &T) -> Result<()> {
        self.set(path, record.to_record()).await
    }

    /// Read the current result of a query once.
    async fn get_once(&self, query: Query) -> Result<Snapshot> {
        let mut subscription = self.subscribe(query).await?;
        subscription.next().await.unwrap_or(Err(Error::Closed))
    }
}

// Blanket implementation
impl<T: RemoteStore + ?Sized> RemoteStoreExt for T {}
