//! BSON <-> engine model conversions.

use bson::{Bson, Document};
use docshift_core::{Error, IndexDescriptor, IndexKey};
use serde_json::Value;

/// Fields of a `listIndexes` reply document that are not index options:
/// the key list (modeled separately), the internal version marker, and
/// the name (preserved on the descriptor itself). Everything else is
/// copied through verbatim.
const NON_OPTION_FIELDS: [&str; 3] = ["key", "v", "name"];

pub(crate) fn bson_to_json(value: Bson) -> Value {
    value.into()
}

pub(crate) fn json_to_bson(value: &Value) -> Result<Bson, Error> {
    Bson::try_from(value.clone()).map_err(Error::catalog)
}

pub(crate) fn document_to_json(doc: Document) -> Value {
    bson_to_json(Bson::Document(doc))
}

pub(crate) fn json_to_document(value: &Value) -> Result<Document, Error> {
    match json_to_bson(value)? {
        Bson::Document(doc) => Ok(doc),
        other => Err(Error::MalformedReply(format!(
            "expected a document, got {other}"
        ))),
    }
}

/// Build an [`IndexDescriptor`] from one `listIndexes` reply document.
pub(crate) fn descriptor_from_index_doc(doc: &Document) -> Result<IndexDescriptor, Error> {
    let name = doc
        .get_str("name")
        .map_err(|_| Error::MalformedReply("index document has no name".to_string()))?
        .to_string();
    let key_doc = doc
        .get_document("key")
        .map_err(|_| Error::MalformedReply(format!("index {name} has no key document")))?;

    // Document iteration preserves server key order, which defines the
    // index's prefix relationships.
    let keys = key_doc
        .iter()
        .map(|(field, value)| IndexKey {
            field: field.clone(),
            value: bson_to_json(value.clone()),
        })
        .collect();

    let options = doc
        .iter()
        .filter(|(field, _)| !NON_OPTION_FIELDS.contains(&field.as_str()))
        .map(|(field, value)| (field.clone(), bson_to_json(value.clone())))
        .collect();

    Ok(IndexDescriptor {
        name,
        keys,
        options,
    })
}

/// Build the `createIndexes` element for a descriptor: key list, then
/// the preserved name, then every option verbatim.
pub(crate) fn index_doc_from_descriptor(index: &IndexDescriptor) -> Result<Document, Error> {
    let mut key_doc = Document::new();
    for key in &index.keys {
        key_doc.insert(key.field.clone(), json_to_bson(&key.value)?);
    }

    let mut doc = Document::new();
    doc.insert("key", key_doc);
    doc.insert("name", index.name.clone());
    for (option, value) in &index.options {
        doc.insert(option.clone(), json_to_bson(value)?);
    }
    Ok(doc)
}
