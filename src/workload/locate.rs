//! Locating and editing the workload template of a document.

use super::kind::{PathDescriptor, WorkloadKind};
use crate::value::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// LocateError reports why a workload template could not be reached.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocateError {
    #[error("cannot look up {key:?} of path {path}: expected a map, found {found}")]
    NotAMap {
        key: String,
        path: PathDescriptor,
        found: &'static str,
    },

    #[error("key {key:?} of path {path} not found in {searched}")]
    MissingKey {
        key: String,
        path: PathDescriptor,
        searched: Map,
    },

    #[error("workload template at {path} is a {found}, expected a map")]
    TemplateNotAMap {
        path: PathDescriptor,
        found: &'static str,
    },

    #[error("kind {kind:?} has no known workload template")]
    UnsupportedKind { kind: String },
}

impl LocateError {
    fn not_a_map(key: &str, path: PathDescriptor, found: &Value) -> Self {
        LocateError::NotAMap {
            key: key.to_string(),
            path,
            found: found.type_name(),
        }
    }

    fn missing_key(key: &str, path: PathDescriptor, searched: &Map) -> Self {
        LocateError::MissingKey {
            key: key.to_string(),
            path,
            searched: searched.clone(),
        }
    }

    /// The path segment that could not be resolved, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            LocateError::NotAMap { key, .. } | LocateError::MissingKey { key, .. } => Some(key),
            LocateError::TemplateNotAMap { .. } | LocateError::UnsupportedKind { .. } => None,
        }
    }
}

/// Returns the workload template of `document`, or `None` for a Pod.
pub fn locate(document: &Value, kind: WorkloadKind) -> Result<Option<&Map>, LocateError> {
    let Some(path) = kind.template_path() else {
        return Ok(None);
    };

    let mut current = document;
    for key in path.keys() {
        let map = current
            .as_map()
            .ok_or_else(|| LocateError::not_a_map(key, path, current))?;
        current = map
            .get(key)
            .ok_or_else(|| LocateError::missing_key(key, path, map))?;
    }

    current
        .as_map()
        .map(Some)
        .ok_or(LocateError::TemplateNotAMap {
            path,
            found: current.type_name(),
        })
}

/// Finds the workload template of `document` and hands it to `mutator`.
///
/// Every key of the kind's template path must exist and hold a map; the
/// first one that does not aborts the call before `mutator` runs. Pods are
/// their own template and are left untouched. Errors returned by `mutator`
/// are passed through unchanged.
pub fn locate_and_mutate<F, E>(document: &mut Value, kind: WorkloadKind, mutator: F) -> Result<(), E>
where
    F: FnOnce(&mut Map) -> Result<(), E>,
    E: From<LocateError>,
{
    let Some(path) = kind.template_path() else {
        debug!(%kind, "pod has no nested template, nothing to mutate");
        return Ok(());
    };

    let mut current = document;
    for key in path.keys() {
        let map = match current {
            Value::Map(map) => map,
            other => return Err(LocateError::not_a_map(key, path, other).into()),
        };
        // The error carries the searched map, so presence is checked before
        // the map is borrowed mutably.
        if !map.has(key) {
            return Err(LocateError::missing_key(key, path, map).into());
        }
        current = match map.fields.get_mut(*key) {
            Some(next) => next,
            None => unreachable!("presence of {key:?} checked above"),
        };
    }

    let template = match current {
        Value::Map(template) => template,
        other => {
            return Err(LocateError::TemplateNotAMap {
                path,
                found: other.type_name(),
            }
            .into())
        }
    };

    debug!(%kind, %path, "mutating workload template");
    mutator(template)
}

/// Like [`locate_and_mutate`], but takes the document's kind label.
///
/// Labels that are not workload kinds fail with
/// [`LocateError::UnsupportedKind`].
pub fn mutate_template<F, E>(document: &mut Value, kind: &str, mutator: F) -> Result<(), E>
where
    F: FnOnce(&mut Map) -> Result<(), E>,
    E: From<LocateError>,
{
    let kind = WorkloadKind::from_kind(kind).ok_or_else(|| LocateError::UnsupportedKind {
        kind: kind.to_string(),
    })?;
    locate_and_mutate(document, kind, mutator)
}
