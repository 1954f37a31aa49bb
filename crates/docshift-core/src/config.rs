//! Selection configuration: the declarative file format and the
//! per-collection configs produced by resolution.

use crate::error::Error;
use serde::{Deserialize, Deserializer};

/// The parsed selection file: a sequence of sections, each naming the
/// collections it covers and the flags that apply to them.
///
/// ```json
/// {
///   "sections": [
///     {
///       "include": ["app.*"],
///       "exclude": ["app.scratch"],
///       "migrate_shard_key": "true",
///       "drop_if_exists": "false"
///     }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectionConfig {
    /// Selection sections, evaluated in order.
    #[serde(default)]
    pub sections: Vec<SelectionSection>,
}

impl SelectionConfig {
    /// Parse a selection configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }
}

/// One logical section of the selection file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SelectionSection {
    /// Patterns naming collections to migrate: `*`, `<db>.*`, or
    /// `<db>.<collection>`.
    pub include: Vec<String>,
    /// Patterns naming collections to withhold from `include`.
    pub exclude: Vec<String>,
    /// Propagate the source shard key to the destination.
    #[serde(deserialize_with = "lenient_bool")]
    pub migrate_shard_key: bool,
    /// Drop the destination collection before recreating it.
    #[serde(deserialize_with = "lenient_bool")]
    pub drop_if_exists: bool,
    /// Eliminate prefix-redundant compound indexes before creation.
    #[serde(deserialize_with = "lenient_bool")]
    pub optimize_compound_indexes: bool,
}

/// Accepts a JSON boolean or a free-form string flag. Historical config
/// files carry `"true"` / `"false"` as text; the string form is matched
/// case-insensitively and anything other than `"true"` means false.
/// This is the only place string booleans are interpreted - the engine
/// sees `bool` everywhere else.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Text(s) => s.eq_ignore_ascii_case("true"),
    })
}

/// Migration settings for one concrete collection, produced by the
/// selector from a section plus a catalog snapshot. Immutable; consumed
/// exactly once by the reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCollectionConfig {
    /// Database name (non-empty).
    pub database: String,
    /// Collection name (non-empty).
    pub collection: String,
    /// Propagate the source shard key.
    pub migrate_shard_key: bool,
    /// Drop the destination collection first.
    pub drop_if_exists: bool,
    /// Run compound-index redundancy elimination.
    pub optimize_compound_indexes: bool,
}

impl ResolvedCollectionConfig {
    /// The fully-qualified `<db>.<collection>` name.
    pub fn namespace(&self) -> String {
        format!("{}.{}", self.database, self.collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_string_booleans() {
        let config = SelectionConfig::from_json_str(
            r#"{
                "sections": [{
                    "include": ["app.*"],
                    "exclude": [],
                    "migrate_shard_key": "TRUE",
                    "drop_if_exists": "false",
                    "optimize_compound_indexes": "yes"
                }]
            }"#,
        )
        .unwrap();

        let section = &config.sections[0];
        assert!(section.migrate_shard_key);
        assert!(!section.drop_if_exists);
        // Anything other than "true" means false.
        assert!(!section.optimize_compound_indexes);
    }

    #[test]
    fn test_parse_native_booleans() {
        let config = SelectionConfig::from_json_str(
            r#"{"sections": [{"include": ["*"], "drop_if_exists": true}]}"#,
        )
        .unwrap();
        assert!(config.sections[0].drop_if_exists);
        assert!(!config.sections[0].migrate_shard_key);
    }

    #[test]
    fn test_flags_default_false() {
        let config =
            SelectionConfig::from_json_str(r#"{"sections": [{"include": ["db.coll"]}]}"#).unwrap();
        let section = &config.sections[0];
        assert!(!section.migrate_shard_key);
        assert!(!section.drop_if_exists);
        assert!(!section.optimize_compound_indexes);
        assert!(section.exclude.is_empty());
    }

    #[test]
    fn test_empty_config() {
        let config = SelectionConfig::from_json_str("{}").unwrap();
        assert!(config.sections.is_empty());
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = SelectionConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_namespace() {
        let config = ResolvedCollectionConfig {
            database: "app".to_string(),
            collection: "users.archive".to_string(),
            migrate_shard_key: false,
            drop_if_exists: false,
            optimize_compound_indexes: false,
        };
        assert_eq!(config.namespace(), "app.users.archive");
    }
}
