//! Splitting a manifest stream into classified documents.

use super::errors::{SplitError, SplitErrors};
use super::reader::{is_blank, DocumentReader};
use crate::typemeta::{TypeIdentity, TypeMeta};
use crate::value::{self, Value};
use std::collections::{btree_map, BTreeMap, HashSet};
use tracing::{debug, trace, warn};

/// Document holds the raw bytes of one document of a manifest stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    position: usize,
    bytes: Vec<u8>,
}

impl Document {
    pub fn new(position: usize, bytes: impl Into<Vec<u8>>) -> Self {
        Document {
            position,
            bytes: bytes.into(),
        }
    }

    /// Index of the document among the non-blank documents of its stream.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_str(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.bytes)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Fully decodes the document into a value tree.
    pub fn decode(&self) -> Result<Value, serde_yaml::Error> {
        value::from_yaml_slice(&self.bytes)
    }
}

/// DocumentSet maps each type identity of a stream to its document.
///
/// No two entries share a kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSet {
    documents: BTreeMap<TypeIdentity, Document>,
}

impl DocumentSet {
    pub(crate) fn new() -> Self {
        DocumentSet {
            documents: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, identity: TypeIdentity, document: Document) {
        self.documents.insert(identity, document);
    }

    pub fn get(&self, identity: &TypeIdentity) -> Option<&Document> {
        self.documents.get(identity)
    }

    /// Looks a document up by kind alone.
    pub fn get_by_kind(&self, kind: &str) -> Option<(&TypeIdentity, &Document)> {
        self.documents.iter().find(|(identity, _)| identity.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TypeIdentity, &Document)> {
        self.documents.iter()
    }

    pub fn type_identities(&self) -> Vec<TypeIdentity> {
        self.documents.keys().cloned().collect()
    }

    pub fn contains_kind(&self, kind: &str) -> bool {
        self.documents.keys().any(|identity| identity.kind == kind)
    }

    /// Returns the documents in stream order.
    pub fn in_stream_order(&self) -> Vec<(&TypeIdentity, &Document)> {
        let mut documents: Vec<_> = self.documents.iter().collect();
        documents.sort_by_key(|(_, document)| document.position);
        documents
    }
}

impl IntoIterator for DocumentSet {
    type Item = (TypeIdentity, Document);
    type IntoIter = btree_map::IntoIter<TypeIdentity, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_iter()
    }
}

impl<'a> IntoIterator for &'a DocumentSet {
    type Item = (&'a TypeIdentity, &'a Document);
    type IntoIter = btree_map::Iter<'a, TypeIdentity, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

/// Split is the outcome of classifying one stream: every document that
/// passed validation, and every error for the ones that did not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Split {
    pub documents: DocumentSet,
    pub errors: SplitErrors,
}

impl Split {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns the documents, or the aggregate error if any document was
    /// rejected.
    pub fn into_result(self) -> Result<DocumentSet, SplitErrors> {
        if self.errors.is_empty() {
            Ok(self.documents)
        } else {
            Err(self.errors)
        }
    }
}

/// Splits a YAML stream into documents keyed by their type identity.
///
/// Validation is not fail-fast: a rejected document is recorded in
/// [`Split::errors`] and the remaining documents are still classified.
/// Blank documents (whitespace and comments only) are skipped silently and
/// do not count towards document positions.
pub fn split(stream: &[u8]) -> Split {
    let mut documents = DocumentSet::new();
    let mut errors = SplitErrors::new();
    let mut seen_kinds = HashSet::new();

    let non_blank = DocumentReader::new(stream).filter(|raw| {
        let blank = is_blank(raw);
        if blank {
            trace!("skipping blank document");
        }
        !blank
    });

    for (position, raw) in non_blank.enumerate() {
        match classify(position, raw, &mut seen_kinds) {
            Ok(identity) => {
                debug!(position, %identity, "classified document");
                documents.insert(identity, Document::new(position, raw));
            }
            Err(error) => {
                warn!(position, %error, "skipping document");
                errors.add(error);
            }
        }
    }

    Split { documents, errors }
}

/// Decodes the type fields of one document and validates them.
///
/// A kind is marked as seen as soon as it is known, so a later document of
/// the same kind is reported as a duplicate even if this one fails on its
/// apiVersion.
fn classify(
    position: usize,
    raw: &[u8],
    seen_kinds: &mut HashSet<String>,
) -> Result<TypeIdentity, SplitError> {
    let meta = TypeMeta::from_yaml_slice(raw).map_err(|e| SplitError::Decode {
        position,
        message: e.to_string(),
    })?;

    let (api_version, kind) = meta
        .identity_fields()
        .ok_or(SplitError::MissingTypeIdentity { position })?;

    if !seen_kinds.insert(kind.to_string()) {
        return Err(SplitError::DuplicateKind {
            position,
            kind: kind.to_string(),
        });
    }

    TypeIdentity::parse(api_version, kind).map_err(|source| SplitError::InvalidApiVersion {
        position,
        api_version: api_version.to_string(),
        source,
    })
}

/// Lists the type identities of a DocumentSet.
pub fn list_type_identities(documents: &DocumentSet) -> Vec<TypeIdentity> {
    documents.type_identities()
}

/// Reports whether any identity has exactly the given kind.
pub fn contains_kind(identities: &[TypeIdentity], kind: &str) -> bool {
    identities.iter().any(|identity| identity.kind == kind)
}

/// Reports whether any of `kinds` is present. Used to accept a kind together
/// with the older names it replaced.
pub fn contains_any_of_kinds(identities: &[TypeIdentity], kinds: &[&str]) -> bool {
    kinds.iter().any(|kind| contains_kind(identities, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_document_accessors() {
        let doc = Document::new(1, b"kind: Pod\n".to_vec());
        assert_eq!(doc.position(), 1);
        assert_eq!(doc.as_str().unwrap(), "kind: Pod\n");
        assert_eq!(doc.decode().unwrap().as_map().unwrap().get("kind"), Some(&Value::from("Pod")));
        assert_eq!(doc.into_bytes(), b"kind: Pod\n".to_vec());
    }

    #[test]
    fn test_contains_kind_is_exact() {
        let identities = vec![TypeIdentity::new("apps", "v1", "Deployment")];
        assert!(contains_kind(&identities, "Deployment"));
        assert!(!contains_kind(&identities, "deployment"));
        assert!(!contains_kind(&identities, "Deploy"));
        assert!(!contains_kind(&[], "Deployment"));
    }

    #[test]
    fn test_contains_any_of_kinds() {
        let identities = vec![TypeIdentity::new("", "v1", "Endpoints")];
        assert!(contains_any_of_kinds(&identities, &["EndpointSlice", "Endpoints"]));
        assert!(!contains_any_of_kinds(&identities, &["EndpointSlice"]));
        assert!(!contains_any_of_kinds(&identities, &[]));
    }

    #[test]
    fn test_into_result() {
        let ok = split(b"apiVersion: v1\nkind: Pod\n");
        assert!(!ok.has_errors());
        assert_eq!(ok.into_result().unwrap().len(), 1);

        let failed = split(b"kind: Pod\n");
        assert!(failed.has_errors());
        assert_eq!(failed.into_result().unwrap_err().len(), 1);
    }
}
