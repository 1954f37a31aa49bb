//! Index descriptors read from a source catalog.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Field name reserved for the destination's internal timestamp.
pub const INTERNAL_TIMESTAMP_FIELD: &str = "_ts";

/// Option key for TTL expiry.
pub const OPT_EXPIRE_AFTER_SECONDS: &str = "expireAfterSeconds";

/// Option key for unique indexes.
pub const OPT_UNIQUE: &str = "unique";

/// Option key for sparse indexes.
pub const OPT_SPARSE: &str = "sparse";

/// One component of an index key: a field name plus its direction or
/// index type (`1`, `-1`, `"hashed"`, `"text"`, ...).
///
/// Component order is semantically significant - it defines prefix
/// relationships between indexes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexKey {
    /// Indexed field name.
    pub field: String,
    /// Direction or index type, passed through verbatim.
    pub value: Value,
}

impl IndexKey {
    /// An ascending key component over `field`.
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: Value::from(1),
        }
    }

    /// A descending key component over `field`.
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: Value::from(-1),
        }
    }
}

/// A secondary index as reported by the source catalog.
///
/// `options` holds every reported index option except the key list and
/// the internal `v` version marker. The index name is preserved verbatim
/// across migration - destination index identity derives from source
/// identity, never regenerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDescriptor {
    /// Source index name, preserved verbatim.
    pub name: String,
    /// Ordered key components.
    pub keys: Vec<IndexKey>,
    /// Remaining index options (`unique`, `sparse`, `expireAfterSeconds`, ...).
    #[serde(default)]
    pub options: BTreeMap<String, Value>,
}

impl IndexDescriptor {
    /// Create a descriptor with no extra options.
    pub fn new(name: impl Into<String>, keys: Vec<IndexKey>) -> Self {
        Self {
            name: name.into(),
            keys,
            options: BTreeMap::new(),
        }
    }

    /// Attach an option, builder style.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Whether this index is eligible for compound-index redundancy
    /// elimination: more than one key component and none of the
    /// `unique`, `sparse`, or `expireAfterSeconds` modifiers.
    ///
    /// The predicate gates optimization eligibility only; a compound
    /// index carrying a modifier still migrates as-is.
    pub fn is_compound(&self) -> bool {
        self.keys.len() > 1
            && !self.options.contains_key(OPT_UNIQUE)
            && !self.options.contains_key(OPT_SPARSE)
            && !self.options.contains_key(OPT_EXPIRE_AFTER_SECONDS)
    }

    /// Whether this is a TTL index whose first key component is the
    /// internal `_ts` field. Such an index must never be migrated.
    pub fn is_ttl_on_internal_timestamp(&self) -> bool {
        self.options.contains_key(OPT_EXPIRE_AFTER_SECONDS)
            && self
                .keys
                .first()
                .is_some_and(|k| k.field == INTERNAL_TIMESTAMP_FIELD)
    }
}
