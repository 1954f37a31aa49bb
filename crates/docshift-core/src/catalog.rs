//! Catalog collaborator traits and the immutable catalog snapshot.

use crate::error::Error;
use crate::index::IndexDescriptor;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};

/// Opaque shard key specification returned by catalog introspection.
/// Passed through to the destination verbatim, never parsed.
pub type ShardKeyDefinition = serde_json::Value;

/// Read-side catalog operations supplied by the source database client.
///
/// All methods are black-box, possibly-failing remote calls; the engine
/// never retries them.
#[async_trait]
pub trait SourceCatalog {
    /// Names of all databases currently visible.
    async fn list_databases(&self) -> Result<Vec<String>, Error>;

    /// Names of all collections currently in `db`.
    async fn list_collections(&self, db: &str) -> Result<Vec<String>, Error>;

    /// Shard key of a collection, or `None` when it is unsharded.
    async fn shard_key(
        &self,
        db: &str,
        collection: &str,
    ) -> Result<Option<ShardKeyDefinition>, Error>;

    /// Full index catalog of a collection, excluding nothing; the
    /// implementation strips only the key list and version marker from
    /// the per-index options.
    async fn list_indexes(
        &self,
        db: &str,
        collection: &str,
    ) -> Result<Vec<IndexDescriptor>, Error>;
}

/// Write-side catalog operations supplied by the destination database
/// client.
#[async_trait]
pub trait DestinationCatalog {
    /// Names of all collections currently in `db`.
    async fn list_collections(&self, db: &str) -> Result<Vec<String>, Error>;

    /// Drop a collection. Idempotent when the collection is absent.
    async fn drop_collection(&self, db: &str, collection: &str) -> Result<(), Error>;

    /// Explicitly create a collection.
    async fn create_collection(&self, db: &str, collection: &str) -> Result<(), Error>;

    /// Shard a collection with the given key specification. `namespace`
    /// is the fully-qualified `<db>.<collection>` name.
    async fn shard_collection(
        &self,
        db: &str,
        namespace: &str,
        key: &ShardKeyDefinition,
    ) -> Result<(), Error>;

    /// Create one index with its exact key list, options, and preserved
    /// name.
    async fn create_index(
        &self,
        db: &str,
        collection: &str,
        index: &IndexDescriptor,
    ) -> Result<(), Error>;
}

/// An immutable snapshot of a catalog: database name to the set of
/// collection names visible at snapshot time.
///
/// Taken once at the start of selection and passed by value into
/// pattern expansion, so the catalog is never re-queried per pattern
/// and enumeration cannot race with consumption.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    databases: BTreeMap<String, BTreeSet<String>>,
}

impl CatalogSnapshot {
    /// An empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a snapshot of a live source catalog.
    pub async fn load<C: SourceCatalog + ?Sized>(catalog: &C) -> Result<Self, Error> {
        let mut snapshot = Self::new();
        for db in catalog.list_databases().await? {
            let collections = catalog.list_collections(&db).await?;
            snapshot
                .databases
                .insert(db, collections.into_iter().collect());
        }
        Ok(snapshot)
    }

    /// Record a collection, builder style.
    pub fn with_collection(
        mut self,
        db: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        self.insert(db, collection);
        self
    }

    /// Record a collection.
    pub fn insert(&mut self, db: impl Into<String>, collection: impl Into<String>) {
        self.databases
            .entry(db.into())
            .or_default()
            .insert(collection.into());
    }

    /// All database names in the snapshot.
    pub fn databases(&self) -> impl Iterator<Item = &str> {
        self.databases.keys().map(String::as_str)
    }

    /// Collection names of one database; empty when the database is
    /// unknown.
    pub fn collections<'a>(&'a self, db: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.databases
            .get(db)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Whether `<db>.<collection>` exists in the snapshot.
    pub fn contains(&self, db: &str, collection: &str) -> bool {
        self.databases
            .get(db)
            .is_some_and(|colls| colls.contains(collection))
    }
}
