//! Typemeta module - apiVersion/kind handling.
//!
//! Provides [`TypeIdentity`], its `apiVersion` parser and the shallow
//! [`TypeMeta`] decode used to classify documents without parsing their
//! bodies.

mod identity;

pub use identity::*;
