//! Schema reconciliation: brings destination collections into the
//! desired state relative to the source.
//!
//! Collections are processed one at a time; each collection's steps run
//! in strict order and no step proceeds past a failure of a prior step.
//! There is no shared mutable state between collections.

use crate::catalog::{DestinationCatalog, SourceCatalog};
use crate::config::ResolvedCollectionConfig;
use crate::error::Error;
use crate::optimize::optimize_compound_indexes;
use tracing::{debug, info, warn};

/// Per-collection outcome of a migration run.
///
/// A TTL safety violation fails its collection but does not stop the
/// run; the report records both buckets so the caller can surface which
/// collections succeeded and which did not. Driver errors are not
/// recorded here - they abort the run immediately.
#[derive(Debug, Default)]
pub struct MigrationReport {
    /// Fully-qualified names of collections migrated successfully.
    pub migrated: Vec<String>,
    /// Collections that failed validation, with the failure.
    pub failed: Vec<(String, Error)>,
}

impl MigrationReport {
    /// Whether every collection migrated.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Drives per-collection schema reconciliation against the collaborator
/// catalogs.
pub struct SchemaReconciler<'a, S: ?Sized, D: ?Sized> {
    source: &'a S,
    destination: &'a D,
}

impl<'a, S, D> SchemaReconciler<'a, S, D>
where
    S: SourceCatalog + ?Sized,
    D: DestinationCatalog + ?Sized,
{
    /// Create a reconciler over a source and destination catalog.
    pub fn new(source: &'a S, destination: &'a D) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// Reconcile every resolved collection, sequentially, in iteration
    /// order (the order carries no meaning).
    ///
    /// TTL safety violations fail their collection and the run moves on;
    /// any catalog/driver error aborts the whole run. Steps already
    /// applied to a failed collection (drop, create, shard) are left in
    /// place - there is no rollback.
    pub async fn run<I>(&self, configs: I) -> Result<MigrationReport, Error>
    where
        I: IntoIterator<Item = ResolvedCollectionConfig>,
    {
        let mut report = MigrationReport::default();

        for config in configs {
            let namespace = config.namespace();
            match self.reconcile_collection(&config).await {
                Ok(()) => {
                    info!(collection = %namespace, "collection migrated");
                    report.migrated.push(namespace);
                }
                Err(violation @ Error::TtlOnInternalTimestamp { .. }) => {
                    warn!(collection = %namespace, error = %violation, "collection failed validation");
                    report.failed.push((namespace, violation));
                }
                Err(err) => return Err(err),
            }
        }

        Ok(report)
    }

    /// Run the reconciliation steps for one collection.
    async fn reconcile_collection(&self, config: &ResolvedCollectionConfig) -> Result<(), Error> {
        let db = &config.database;
        let collection = &config.collection;

        // Step 1: optional drop. Idempotent when the collection is
        // absent, and always followed by a fresh create below.
        if config.drop_if_exists {
            debug!(collection = %config.namespace(), "dropping destination collection");
            self.destination.drop_collection(db, collection).await?;
        }

        // Step 2: ensure the destination collection exists.
        let existing = self.destination.list_collections(db).await?;
        if !existing.iter().any(|name| name == collection) {
            debug!(collection = %config.namespace(), "creating destination collection");
            self.destination.create_collection(db, collection).await?;
        }

        // Step 3: shard key propagation, before any index creation -
        // destinations may require sharding ahead of secondary indexes.
        if config.migrate_shard_key {
            match self.source.shard_key(db, collection).await? {
                Some(key) => {
                    let namespace = config.namespace();
                    info!(collection = %namespace, "sharding destination collection");
                    self.destination
                        .shard_collection(db, &namespace, &key)
                        .await?;
                }
                None => {
                    // Not every source collection is sharded.
                    debug!(collection = %config.namespace(), "source collection is unsharded");
                }
            }
        }

        // Step 4: enumerate source indexes.
        let mut indexes = self.source.list_indexes(db, collection).await?;

        // Step 5: optional compound-index optimization.
        if config.optimize_compound_indexes {
            let before = indexes.len();
            indexes = optimize_compound_indexes(indexes);
            if indexes.len() < before {
                info!(
                    collection = %config.namespace(),
                    eliminated = before - indexes.len(),
                    "eliminated redundant compound indexes"
                );
            }
        }

        // Step 6: TTL safety check, against the final index list.
        for index in &indexes {
            if index.is_ttl_on_internal_timestamp() {
                return Err(Error::TtlOnInternalTimestamp {
                    collection: config.namespace(),
                    index: index.name.clone(),
                });
            }
        }

        // Step 7: create the surviving indexes.
        for index in &indexes {
            debug!(collection = %config.namespace(), index = %index.name, "creating index");
            self.destination.create_index(db, collection, index).await?;
        }

        Ok(())
    }
}
