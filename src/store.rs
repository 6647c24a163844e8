use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use sqlx::PgPool;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};
use uuid::Uuid;

use crate::models::{Album, MediaImage, Profile};

/// Hard cap applied to every list operation. There is no pagination; the
/// collections of a single-operator portfolio never get close to this.
pub const LIST_CAP: i64 = 1000;

/// Collection holding the singleton profile document. It has no id of its own,
/// so it lives outside the [`Entity`] machinery under a fixed slot key.
const PROFILE_COLLECTION: &str = "profile";

/// StoreError
///
/// The only failure mode the store contract exposes. Missing documents and
/// empty result sets are ordinary return values, not errors; this variant
/// covers infrastructure trouble (connection loss, constraint violations,
/// corrupt documents) and surfaces to clients as a generic 500.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document store unavailable: {0}")]
    Unavailable(String),
}

/// DocumentStore
///
/// The abstract contract for the schemaless persistence layer: keyed JSON
/// documents grouped into named collections, with per-document atomicity and
/// no cross-document transactions. The trait keeps handlers independent of the
/// concrete backend, letting tests swap [`PgDocumentStore`] for the in-memory
/// [`MemoryStore`] — the same seam the codebase uses for storage and mail.
///
/// Send + Sync + async_trait are required to make the trait object
/// (`Arc<dyn DocumentStore>`) safely shareable across Axum's task boundaries.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a new document. A duplicate id violates the uniqueness
    /// constraint and is reported as `Unavailable`: ids are generated with
    /// cryptographically strong randomness, so a collision is an
    /// infrastructure-grade surprise, not a client error.
    async fn insert(&self, collection: &str, id: Uuid, doc: Value) -> Result<(), StoreError>;

    /// Exact key lookup.
    async fn find_one(&self, collection: &str, id: Uuid) -> Result<Option<Value>, StoreError>;

    /// All documents of a collection, newest first by `sort_field`, capped at
    /// [`LIST_CAP`]. An empty collection yields an empty vec.
    async fn find_all(&self, collection: &str, sort_field: &str) -> Result<Vec<Value>, StoreError>;

    /// Like `find_all`, restricted to documents whose `field` equals `value`.
    async fn find_where(
        &self,
        collection: &str,
        field: &str,
        value: &str,
        sort_field: &str,
    ) -> Result<Vec<Value>, StoreError>;

    /// Atomic full-document replace. Returns false when the id does not exist.
    async fn replace(&self, collection: &str, id: Uuid, doc: Value) -> Result<bool, StoreError>;

    /// Returns false when the id does not exist — the signal that makes the
    /// delete contract observably idempotent.
    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, StoreError>;

    /// Deletes every document whose `field` equals `value`; returns the count.
    async fn delete_where(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<u64, StoreError>;

    /// Empties a collection; returns the count.
    async fn delete_all(&self, collection: &str) -> Result<u64, StoreError>;
}

/// The concrete type used to share the persistence layer across the application state.
pub type StoreState = Arc<dyn DocumentStore>;

// --- Postgres Implementation ---

/// PgDocumentStore
///
/// Production backend: a single `documents` table with a JSONB payload column,
/// keyed `(collection, id)`. The primary key gives the unique-id guarantee and
/// each statement touches documents one at a time, which is exactly the
/// atomicity the contract promises — nothing here opens a transaction.
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Provisions the documents table. Idempotent; called once at startup so a
    /// fresh database needs no out-of-band migration step.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id UUID NOT NULL,
                doc JSONB NOT NULL,
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("ensure_schema error: {:?}", e);
            StoreError::Unavailable(e.to_string())
        })?;
        Ok(())
    }
}

/// Shared error funnel: log the real cause, hand back the opaque variant.
fn store_err(op: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |e| {
        tracing::error!("{op} error: {:?}", e);
        StoreError::Unavailable(e.to_string())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, collection: &str, id: Uuid, doc: Value) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO documents (collection, id, doc) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(id)
            .bind(doc)
            .execute(&self.pool)
            .await
            .map_err(store_err("insert"))?;
        Ok(())
    }

    async fn find_one(&self, collection: &str, id: Uuid) -> Result<Option<Value>, StoreError> {
        sqlx::query_scalar("SELECT doc FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err("find_one"))
    }

    async fn find_all(&self, collection: &str, sort_field: &str) -> Result<Vec<Value>, StoreError> {
        // Timestamps serialize as RFC 3339 / ISO dates, so a descending text
        // sort on the extracted field is a descending chronological sort.
        sqlx::query_scalar(
            "SELECT doc FROM documents WHERE collection = $1 ORDER BY doc->>$2 DESC LIMIT $3",
        )
        .bind(collection)
        .bind(sort_field)
        .bind(LIST_CAP)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err("find_all"))
    }

    async fn find_where(
        &self,
        collection: &str,
        field: &str,
        value: &str,
        sort_field: &str,
    ) -> Result<Vec<Value>, StoreError> {
        sqlx::query_scalar(
            "SELECT doc FROM documents WHERE collection = $1 AND doc->>$2 = $3 \
             ORDER BY doc->>$4 DESC LIMIT $5",
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .bind(sort_field)
        .bind(LIST_CAP)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err("find_where"))
    }

    async fn replace(&self, collection: &str, id: Uuid, doc: Value) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE documents SET doc = $3 WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .bind(doc)
            .execute(&self.pool)
            .await
            .map_err(store_err("replace"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_err("delete"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_where(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND doc->>$2 = $3")
            .bind(collection)
            .bind(field)
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(store_err("delete_where"))?;
        Ok(result.rows_affected())
    }

    async fn delete_all(&self, collection: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1")
            .bind(collection)
            .execute(&self.pool)
            .await
            .map_err(store_err("delete_all"))?;
        Ok(result.rows_affected())
    }
}

// --- In-Memory Implementation (For Tests) ---

/// MemoryStore
///
/// Implements the identical contract over a `HashMap`, so the full handler and
/// router stack can be exercised without a database. Documents are stored as
/// JSON values just like the JSONB column, which keeps the sorting and
/// field-match behavior honest.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, HashMap<Uuid, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Text value of a document field, for sorting and equality filters. Mirrors
/// the `doc->>field` extraction on the Postgres side.
fn field_text(doc: &Value, field: &str) -> String {
    doc.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, id: Uuid, doc: Value) -> Result<(), StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        let entries = collections.entry(collection.to_string()).or_default();
        if entries.contains_key(&id) {
            // Same outcome the primary key produces.
            return Err(StoreError::Unavailable(format!("duplicate id {id}")));
        }
        entries.insert(id, doc);
        Ok(())
    }

    async fn find_one(&self, collection: &str, id: Uuid) -> Result<Option<Value>, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(collections
            .get(collection)
            .and_then(|entries| entries.get(&id))
            .cloned())
    }

    async fn find_all(&self, collection: &str, sort_field: &str) -> Result<Vec<Value>, StoreError> {
        self.find_where(collection, "", "", sort_field).await
    }

    async fn find_where(
        &self,
        collection: &str,
        field: &str,
        value: &str,
        sort_field: &str,
    ) -> Result<Vec<Value>, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        let mut docs: Vec<Value> = collections
            .get(collection)
            .map(|entries| {
                entries
                    .values()
                    .filter(|doc| field.is_empty() || field_text(doc, field) == value)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        docs.sort_by(|a, b| field_text(b, sort_field).cmp(&field_text(a, sort_field)));
        docs.truncate(LIST_CAP as usize);
        Ok(docs)
    }

    async fn replace(&self, collection: &str, id: Uuid, doc: Value) -> Result<bool, StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        match collections
            .get_mut(collection)
            .and_then(|entries| entries.get_mut(&id))
        {
            Some(slot) => {
                *slot = doc;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(collections
            .get_mut(collection)
            .and_then(|entries| entries.remove(&id))
            .is_some())
    }

    async fn delete_where(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<u64, StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        let Some(entries) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let before = entries.len();
        entries.retain(|_, doc| field_text(doc, field) != value);
        Ok((before - entries.len()) as u64)
    }

    async fn delete_all(&self, collection: &str) -> Result<u64, StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(collections
            .remove(collection)
            .map(|entries| entries.len() as u64)
            .unwrap_or(0))
    }
}

// --- Typed Facade ---

/// Entity
///
/// Ties a model to its collection name, its listing order, and its id. The
/// generic CRUD on [`Documents`] is instantiated once per implementor, which
/// is what keeps six collections from needing six repositories.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;
    const SORT_FIELD: &'static str;
    fn id(&self) -> Uuid;
}

/// Documents
///
/// The typed store handle carried in the application state. Wraps the raw
/// `DocumentStore` with (de)serialization, the cross-collection cascade rule,
/// and the profile singleton's special semantics.
#[derive(Clone)]
pub struct Documents {
    store: StoreState,
}

impl Documents {
    pub fn new(store: StoreState) -> Self {
        Self { store }
    }

    fn decode<T: DeserializeOwned>(doc: Value) -> Result<T, StoreError> {
        serde_json::from_value(doc).map_err(|e| {
            tracing::error!("Corrupt document in store: {:?}", e);
            StoreError::Unavailable(e.to_string())
        })
    }

    fn encode<T: Serialize>(entity: &T) -> Result<Value, StoreError> {
        serde_json::to_value(entity).map_err(|e| {
            tracing::error!("Failed to serialize document: {:?}", e);
            StoreError::Unavailable(e.to_string())
        })
    }

    /// Newest first, capped at [`LIST_CAP`]. Empty is a normal result.
    pub async fn list<T: Entity>(&self) -> Result<Vec<T>, StoreError> {
        self.store
            .find_all(T::COLLECTION, T::SORT_FIELD)
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    pub async fn list_where<T: Entity>(
        &self,
        field: &str,
        value: &str,
    ) -> Result<Vec<T>, StoreError> {
        self.store
            .find_where(T::COLLECTION, field, value, T::SORT_FIELD)
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    pub async fn get<T: Entity>(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        self.store
            .find_one(T::COLLECTION, id)
            .await?
            .map(Self::decode)
            .transpose()
    }

    pub async fn create<T: Entity>(&self, entity: &T) -> Result<(), StoreError> {
        self.store
            .insert(T::COLLECTION, entity.id(), Self::encode(entity)?)
            .await
    }

    /// Full-document replace; false means the id vanished underneath us.
    pub async fn replace<T: Entity>(&self, entity: &T) -> Result<bool, StoreError> {
        self.store
            .replace(T::COLLECTION, entity.id(), Self::encode(entity)?)
            .await
    }

    pub async fn delete<T: Entity>(&self, id: Uuid) -> Result<bool, StoreError> {
        self.store.delete(T::COLLECTION, id).await
    }

    /// Cascade rule: deleting an album removes its media first, then the album.
    ///
    /// Existence is confirmed up front so a miss deletes nothing and reports
    /// false. The two deletes are not wrapped in a transaction: a media create
    /// racing this call can leave an orphaned document behind. That window is
    /// a known property of the store contract, not something this layer tries
    /// to close.
    pub async fn delete_album(&self, id: Uuid) -> Result<bool, StoreError> {
        if self.store.find_one(Album::COLLECTION, id).await?.is_none() {
            return Ok(false);
        }
        let removed = self
            .store
            .delete_where(MediaImage::COLLECTION, "albumId", &id.to_string())
            .await?;
        if removed > 0 {
            tracing::debug!(album = %id, media = removed, "Cascade removed album media");
        }
        self.store.delete(Album::COLLECTION, id).await
    }

    /// Singleton read. A profile that was never written yields the documented
    /// default — callers must treat that as a normal answer, not a miss.
    pub async fn profile(&self) -> Result<Profile, StoreError> {
        match self.store.find_one(PROFILE_COLLECTION, Uuid::nil()).await? {
            Some(doc) => Self::decode(doc),
            None => Ok(Profile::default()),
        }
    }

    /// Singleton replace: delete-everything-then-insert, never a partial merge.
    /// A reader in the gap sees the old profile, the default, or the new one —
    /// each document write is atomic, so never a mixed document.
    pub async fn replace_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let doc = Self::encode(profile)?;
        self.store.delete_all(PROFILE_COLLECTION).await?;
        self.store.insert(PROFILE_COLLECTION, Uuid::nil(), doc).await
    }
}
