//! Errors detected while classifying the documents of a stream.

use crate::typemeta::GroupVersionParseError;
use std::fmt;
use thiserror::Error;

/// SplitError describes why a single document was left out of a DocumentSet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    #[error("document {position}: kind and apiVersion is mandatory")]
    MissingTypeIdentity { position: usize },

    #[error("document {position}: kind {kind} is specified twice")]
    DuplicateKind { position: usize, kind: String },

    #[error("document {position}: unable to parse apiVersion {api_version:?}")]
    InvalidApiVersion {
        position: usize,
        api_version: String,
        #[source]
        source: GroupVersionParseError,
    },

    #[error("document {position}: unable to decode apiVersion and kind: {message}")]
    Decode { position: usize, message: String },
}

impl SplitError {
    /// Position of the offending document within its stream.
    pub fn position(&self) -> usize {
        match self {
            SplitError::MissingTypeIdentity { position }
            | SplitError::DuplicateKind { position, .. }
            | SplitError::InvalidApiVersion { position, .. }
            | SplitError::Decode { position, .. } => *position,
        }
    }

    /// Reports whether the document's apiVersion/kind pair is absent or unusable.
    pub fn is_malformed_type_identity(&self) -> bool {
        matches!(
            self,
            SplitError::MissingTypeIdentity { .. }
                | SplitError::InvalidApiVersion { .. }
                | SplitError::Decode { .. }
        )
    }
}

/// SplitErrors collects every SplitError found in one stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitErrors {
    errors: Vec<SplitError>,
}

impl SplitErrors {
    pub fn new() -> Self {
        SplitErrors { errors: Vec::new() }
    }

    pub fn add(&mut self, error: SplitError) {
        self.errors.push(error);
    }

    /// Returns true if no document was rejected.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SplitError> {
        self.errors.iter()
    }
}

impl IntoIterator for SplitErrors {
    type Item = SplitError;
    type IntoIter = std::vec::IntoIter<SplitError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a SplitErrors {
    type Item = &'a SplitError;
    type IntoIter = std::slice::Iter<'a, SplitError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for SplitErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for SplitErrors {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_error_display() {
        let err = SplitError::DuplicateKind { position: 2, kind: "Deployment".into() };
        assert_eq!(err.to_string(), "document 2: kind Deployment is specified twice");
        assert_eq!(err.position(), 2);
        assert!(!err.is_malformed_type_identity());

        let err = SplitError::MissingTypeIdentity { position: 0 };
        assert!(err.to_string().contains("kind and apiVersion is mandatory"));
        assert!(err.is_malformed_type_identity());
    }

    #[test]
    fn test_split_errors_display_one_per_line() {
        let mut errs = SplitErrors::new();
        assert!(errs.is_empty());

        errs.add(SplitError::MissingTypeIdentity { position: 0 });
        errs.add(SplitError::DuplicateKind { position: 3, kind: "Pod".into() });
        assert_eq!(errs.len(), 2);
        assert_eq!(
            errs.to_string(),
            "document 0: kind and apiVersion is mandatory\ndocument 3: kind Pod is specified twice"
        );
    }
}
