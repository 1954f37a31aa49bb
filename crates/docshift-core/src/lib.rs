//! docshift core - schema migration engine for document databases.
//!
//! This crate resolves a declarative include/exclude selection of
//! collections against an immutable catalog snapshot, then reconciles
//! destination schema state (collection existence, shard key, secondary
//! indexes) against the source for each selected collection.
//!
//! The engine never talks to a database directly; it drives the
//! [`SourceCatalog`] and [`DestinationCatalog`] collaborator traits,
//! which a driver crate implements.
//!
//! # Example
//!
//! ```ignore
//! use docshift_core::{resolve, CatalogSnapshot, SchemaReconciler, SelectionConfig};
//!
//! let config = SelectionConfig::from_json_str(&file_contents)?;
//! let snapshot = CatalogSnapshot::load(&source).await?;
//! let resolved = resolve(&config.sections, &snapshot)?;
//!
//! let reconciler = SchemaReconciler::new(&source, &destination);
//! let report = reconciler.run(resolved.into_values()).await?;
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod index;
pub mod optimize;
pub mod reconcile;
pub mod select;

pub use catalog::{CatalogSnapshot, DestinationCatalog, ShardKeyDefinition, SourceCatalog};
pub use config::{ResolvedCollectionConfig, SelectionConfig, SelectionSection};
pub use error::Error;
pub use index::{IndexDescriptor, IndexKey};
pub use optimize::optimize_compound_indexes;
pub use reconcile::{MigrationReport, SchemaReconciler};
pub use select::{resolve, Pattern};
