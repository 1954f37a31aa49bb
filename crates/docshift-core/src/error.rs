//! Engine error types.

use thiserror::Error;

/// Errors raised by the schema migration engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The same fully-qualified collection was produced by two different
    /// configuration sections. Sections are mutually exclusive by
    /// construction and are never merged.
    #[error("duplicate collection entry found: {name}")]
    DuplicateCollection {
        /// Fully-qualified `<db>.<collection>` name.
        name: String,
    },

    /// A selection pattern was not `*`, `<db>.*`, or `<db>.<collection>`.
    #[error("invalid collection pattern: {pattern:?}")]
    InvalidPattern {
        /// The offending pattern text.
        pattern: String,
    },

    /// A TTL index on the internal `_ts` timestamp field must never be
    /// propagated to the destination.
    #[error("cannot migrate TTL index {index:?} on _ts field for collection {collection}")]
    TtlOnInternalTimestamp {
        /// Fully-qualified collection name.
        collection: String,
        /// Name of the offending index.
        index: String,
    },

    /// The selection configuration file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// A catalog call returned data the engine cannot interpret, such
    /// as an index document without a name or key list.
    #[error("malformed catalog reply: {0}")]
    MalformedReply(String),

    /// A source or destination catalog call failed. Driver errors
    /// propagate as-is; the engine never retries or masks them.
    #[error("catalog error: {0}")]
    Catalog(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap a driver/catalog collaborator failure.
    pub fn catalog(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::Catalog(Box::new(err))
    }
}
