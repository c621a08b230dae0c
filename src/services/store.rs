//! Document store capability
//!
//! The directory only ever reads two collections with equality queries, so the
//! store is modelled as a narrow key-value query interface. Implementations
//! return raw documents; typed decoding happens in `models`.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::StoreQueryError;

/// Collections consumed by the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Categories,
    Channels,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Categories => "categories",
            Collection::Channels => "channels",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw document: store-assigned key plus untyped fields
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Map<String, Value>,
}

impl Document {
    /// Build a document from a JSON value; non-object values yield no fields
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        let data = match data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self { id: id.into(), data }
    }

    /// Non-empty string field, or `Malformed`
    pub fn required_str(&self, collection: Collection, key: &str) -> Result<String, StoreQueryError> {
        match self.optional_str(collection, key)? {
            Some(value) => Ok(value),
            None => Err(self.malformed(collection, format!("missing field `{}`", key))),
        }
    }

    /// String field where absent, null and "" all mean `None`
    pub fn optional_str(&self, collection: Collection, key: &str) -> Result<Option<String>, StoreQueryError> {
        match self.data.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.malformed(collection, format!("field `{}` is not a string", key))),
        }
    }

    fn malformed(&self, collection: Collection, reason: String) -> StoreQueryError {
        StoreQueryError::Malformed {
            collection: collection.as_str(),
            id: self.id.clone(),
            reason,
        }
    }
}

/// Read-only document store.
///
/// Results come back in store-defined order; callers rely on that order being
/// stable for "take the first match" semantics.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents in `collection` whose `field` equals `value`
    async fn query_eq(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreQueryError>;

    /// Every document in `collection`
    async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreQueryError>;

    /// Backend reachability for health probes
    async fn health_check(&self) -> bool;
}

#[cfg(test)]
pub mod testing {
    //! In-memory store double

    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    pub struct MemoryStore {
        docs: Mutex<Vec<(Collection, Document)>>,
        failing: HashSet<Collection>,
        delays: HashMap<Collection, Duration>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(self, collection: Collection, id: &str, data: Value) -> Self {
            self.docs
                .lock()
                .unwrap()
                .push((collection, Document::new(id, data)));
            self
        }

        pub fn failing(mut self, collection: Collection) -> Self {
            self.failing.insert(collection);
            self
        }

        pub fn delayed(mut self, collection: Collection, delay: Duration) -> Self {
            self.delays.insert(collection, delay);
            self
        }

        async fn gate(&self, collection: Collection) -> Result<(), StoreQueryError> {
            if let Some(delay) = self.delays.get(&collection) {
                tokio::time::sleep(*delay).await;
            }
            if self.failing.contains(&collection) {
                return Err(StoreQueryError::Backend(format!("{} unavailable", collection)));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl DocumentStore for MemoryStore {
        async fn query_eq(
            &self,
            collection: Collection,
            field: &str,
            value: &str,
        ) -> Result<Vec<Document>, StoreQueryError> {
            self.gate(collection).await?;
            let docs = self.docs.lock().unwrap();
            Ok(docs
                .iter()
                .filter(|(c, doc)| {
                    *c == collection && doc.data.get(field).and_then(Value::as_str) == Some(value)
                })
                .map(|(_, doc)| doc.clone())
                .collect())
        }

        async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreQueryError> {
            self.gate(collection).await?;
            let docs = self.docs.lock().unwrap();
            Ok(docs
                .iter()
                .filter(|(c, _)| *c == collection)
                .map(|(_, doc)| doc.clone())
                .collect())
        }

        async fn health_check(&self) -> bool {
            self.failing.is_empty()
        }
    }
}
