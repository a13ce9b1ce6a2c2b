//! # Workload Manifests
//!
//! Splitting of multi-document Kubernetes manifests and kind-aware editing
//! of the workload templates they embed.
//!
//! ## Modules
//!
//! - [`document`] - Split a YAML stream into documents keyed by type identity
//! - [`typemeta`] - apiVersion/kind parsing and the shallow type decode
//! - [`value`] - Schema-free in-memory representation of decoded documents
//! - [`workload`] - Kind table and the workload template locator

pub mod document;
pub mod typemeta;
pub mod value;
pub mod workload;

pub use document::{
    contains_any_of_kinds, contains_kind, list_type_identities, split, Document, DocumentSet,
    Split, SplitError, SplitErrors,
};
pub use typemeta::{GroupVersion, TypeIdentity, TypeMeta};
pub use value::{Map, Value};
pub use workload::{locate, locate_and_mutate, mutate_template, LocateError, PathDescriptor, WorkloadKind};
