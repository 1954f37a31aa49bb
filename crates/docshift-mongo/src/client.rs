//! Catalog trait implementations over a `mongodb::Client`.

use crate::convert::{
    descriptor_from_index_doc, document_to_json, index_doc_from_descriptor, json_to_document,
};
use async_trait::async_trait;
use bson::{doc, Document};
use docshift_core::{DestinationCatalog, Error, IndexDescriptor, ShardKeyDefinition, SourceCatalog};
use futures::stream::TryStreamExt;
use mongodb::error::ErrorKind;
use mongodb::Client;
use tracing::debug;

/// Server error code for dropping a collection that does not exist.
const NAMESPACE_NOT_FOUND: i32 = 26;

/// A source or destination catalog backed by a MongoDB deployment.
///
/// One instance wraps one client; a migration run uses two instances,
/// one per side.
#[derive(Debug, Clone)]
pub struct MongoCatalog {
    client: Client,
}

impl MongoCatalog {
    /// Connect to a deployment by connection string.
    pub async fn connect(uri: &str) -> Result<Self, Error> {
        let client = Client::with_uri_str(uri).await.map_err(Error::catalog)?;
        Ok(Self { client })
    }

    /// Wrap an already-configured client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn run_command(&self, db: &str, command: Document) -> Result<Document, Error> {
        debug!(db, command = %command, "running command");
        self.client
            .database(db)
            .run_command(command)
            .await
            .map_err(Error::catalog)
    }
}

#[async_trait]
impl SourceCatalog for MongoCatalog {
    async fn list_databases(&self) -> Result<Vec<String>, Error> {
        self.client
            .list_database_names()
            .await
            .map_err(Error::catalog)
    }

    async fn list_collections(&self, db: &str) -> Result<Vec<String>, Error> {
        self.client
            .database(db)
            .list_collection_names()
            .await
            .map_err(Error::catalog)
    }

    async fn shard_key(
        &self,
        db: &str,
        collection: &str,
    ) -> Result<Option<ShardKeyDefinition>, Error> {
        // Cosmos DB RU exposes the shard key through a custom action;
        // an unsharded collection simply has no shardKeyDefinition in
        // the reply.
        let reply = self
            .run_command(
                db,
                doc! { "customAction": "GetCollection", "collection": collection },
            )
            .await?;
        Ok(reply
            .get_document("shardKeyDefinition")
            .ok()
            .map(|key| document_to_json(key.clone())))
    }

    async fn list_indexes(
        &self,
        db: &str,
        collection: &str,
    ) -> Result<Vec<IndexDescriptor>, Error> {
        let cursor = self
            .client
            .database(db)
            .run_cursor_command(doc! { "listIndexes": collection })
            .await
            .map_err(Error::catalog)?;
        let docs: Vec<Document> = cursor.try_collect().await.map_err(Error::catalog)?;

        docs.iter().map(descriptor_from_index_doc).collect()
    }
}

#[async_trait]
impl DestinationCatalog for MongoCatalog {
    async fn list_collections(&self, db: &str) -> Result<Vec<String>, Error> {
        self.client
            .database(db)
            .list_collection_names()
            .await
            .map_err(Error::catalog)
    }

    async fn drop_collection(&self, db: &str, collection: &str) -> Result<(), Error> {
        let result = self
            .client
            .database(db)
            .collection::<Document>(collection)
            .drop()
            .await;
        match result {
            Ok(()) => Ok(()),
            // Dropping an absent collection is a no-op.
            Err(err) => match *err.kind {
                ErrorKind::Command(ref command) if command.code == NAMESPACE_NOT_FOUND => Ok(()),
                _ => Err(Error::catalog(err)),
            },
        }
    }

    async fn create_collection(&self, db: &str, collection: &str) -> Result<(), Error> {
        self.client
            .database(db)
            .create_collection(collection)
            .await
            .map_err(Error::catalog)
    }

    async fn shard_collection(
        &self,
        _db: &str,
        namespace: &str,
        key: &ShardKeyDefinition,
    ) -> Result<(), Error> {
        let key_doc = json_to_document(key)?;
        self.run_command(
            "admin",
            doc! { "shardCollection": namespace, "key": key_doc },
        )
        .await?;
        Ok(())
    }

    async fn create_index(
        &self,
        db: &str,
        collection: &str,
        index: &IndexDescriptor,
    ) -> Result<(), Error> {
        let index_doc = index_doc_from_descriptor(index)?;
        self.run_command(
            db,
            doc! { "createIndexes": collection, "indexes": [index_doc] },
        )
        .await?;
        Ok(())
    }
}
