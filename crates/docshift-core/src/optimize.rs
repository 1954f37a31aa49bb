//! Compound-index redundancy elimination.
//!
//! When compound indexes form a prefix-redundancy chain (one index's
//! key sequence is a contiguous run inside another's), only the most
//! general one is worth migrating - the narrower index adds no query
//! capability the wider one lacks.

use crate::index::{IndexDescriptor, IndexKey};

/// Drop compound indexes whose key sequence is contained in an already
/// kept compound index.
///
/// Only indexes satisfying [`IndexDescriptor::is_compound`] take part;
/// everything else passes through unconditionally, in its original
/// order, after the kept compound indexes. Candidates are considered
/// longest first; ties keep source enumeration order.
pub fn optimize_compound_indexes(indexes: Vec<IndexDescriptor>) -> Vec<IndexDescriptor> {
    let (compound, other): (Vec<_>, Vec<_>) =
        indexes.into_iter().partition(IndexDescriptor::is_compound);

    let mut candidates = compound;
    // Stable sort: equal lengths keep enumeration order.
    candidates.sort_by(|a, b| b.keys.len().cmp(&a.keys.len()));

    let mut kept: Vec<IndexDescriptor> = Vec::new();
    for candidate in candidates {
        let redundant = kept
            .iter()
            .any(|k| contains_contiguous(&k.keys, &candidate.keys));
        if redundant {
            tracing::debug!(index = %candidate.name, "dropping redundant compound index");
        } else {
            kept.push(candidate);
        }
    }

    kept.extend(other);
    kept
}

/// Whether `needle` occurs as a contiguous run inside `haystack`,
/// comparing full `(field, direction)` components.
fn contains_contiguous(haystack: &[IndexKey], needle: &[IndexKey]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|window| window == needle)
}
