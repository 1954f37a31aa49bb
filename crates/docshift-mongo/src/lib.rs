//! MongoDB adapter for the docshift schema migration engine.
//!
//! Implements [`docshift_core::SourceCatalog`] and
//! [`docshift_core::DestinationCatalog`] over a `mongodb::Client`.
//! Catalog reads and writes go through raw database commands
//! (`listIndexes`, `createIndexes`, `shardCollection`) so that index
//! names and options cross the wire verbatim, untouched by driver-side
//! typed models.
//!
//! Shard-key introspection uses the Cosmos DB RU `customAction:
//! GetCollection` command, matching the deployments this tool migrates
//! from.

mod client;
mod convert;

pub use client::MongoCatalog;
