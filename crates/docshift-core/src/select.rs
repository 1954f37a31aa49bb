//! Collection selection: expands declarative include/exclude patterns
//! against a catalog snapshot into a deduplicated, conflict-checked set
//! of per-collection configs.

use crate::catalog::CatalogSnapshot;
use crate::config::{ResolvedCollectionConfig, SelectionSection};
use crate::error::Error;
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// A collection selection pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// `*` - every collection in every database.
    All,
    /// `<db>.*` - every collection in one database.
    Database(String),
    /// `<db>.<collection>` - one exact collection.
    Collection(String, String),
}

impl FromStr for Pattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        if s == "*" {
            return Ok(Pattern::All);
        }
        if let Some(db) = s.strip_suffix(".*") {
            if db.is_empty() {
                return Err(Error::InvalidPattern {
                    pattern: s.to_string(),
                });
            }
            return Ok(Pattern::Database(db.to_string()));
        }
        match s.split_once('.') {
            Some((db, collection)) if !db.is_empty() && !collection.is_empty() => Ok(
                Pattern::Collection(db.to_string(), collection.to_string()),
            ),
            _ => Err(Error::InvalidPattern {
                pattern: s.to_string(),
            }),
        }
    }
}

impl Pattern {
    /// Expand this pattern into the `(db, collection)` pairs it matches
    /// in the snapshot. An exact pattern naming a collection absent
    /// from the snapshot matches nothing.
    fn expand(&self, snapshot: &CatalogSnapshot, into: &mut BTreeSet<(String, String)>) {
        match self {
            Pattern::All => {
                for db in snapshot.databases() {
                    for collection in snapshot.collections(db) {
                        into.insert((db.to_string(), collection.to_string()));
                    }
                }
            }
            Pattern::Database(db) => {
                for collection in snapshot.collections(db) {
                    into.insert((db.clone(), collection.to_string()));
                }
            }
            Pattern::Collection(db, collection) => {
                if snapshot.contains(db, collection) {
                    into.insert((db.clone(), collection.clone()));
                }
            }
        }
    }
}

/// Expand a pattern list into the set of concrete collections it names.
fn expand_patterns(
    patterns: &[String],
    snapshot: &CatalogSnapshot,
) -> Result<BTreeSet<(String, String)>, Error> {
    let mut expanded = BTreeSet::new();
    for raw in patterns {
        let pattern = Pattern::from_str(raw)?;
        pattern.expand(snapshot, &mut expanded);
    }
    Ok(expanded)
}

/// Resolve the selection sections against a catalog snapshot.
///
/// Each section's collections are `include − exclude`, expanded
/// independently. A fully-qualified collection produced by two
/// different sections is a hard [`Error::DuplicateCollection`] - the
/// failure surfaces before any destination mutation occurs.
///
/// The returned map's ordering carries no meaning; the reconciler
/// treats it as an unordered collection.
pub fn resolve(
    sections: &[SelectionSection],
    snapshot: &CatalogSnapshot,
) -> Result<BTreeMap<String, ResolvedCollectionConfig>, Error> {
    let mut resolved = BTreeMap::new();

    for section in sections {
        let include = expand_patterns(&section.include, snapshot)?;
        let exclude = expand_patterns(&section.exclude, snapshot)?;

        for (database, collection) in include.difference(&exclude) {
            let namespace = format!("{database}.{collection}");
            if resolved.contains_key(&namespace) {
                return Err(Error::DuplicateCollection { name: namespace });
            }
            resolved.insert(
                namespace,
                ResolvedCollectionConfig {
                    database: database.clone(),
                    collection: collection.clone(),
                    migrate_shard_key: section.migrate_shard_key,
                    drop_if_exists: section.drop_if_exists,
                    optimize_compound_indexes: section.optimize_compound_indexes,
                },
            );
        }
    }

    Ok(resolved)
}
