//! Workload module - Kind-dispatched access to workload templates.
//!
//! Each workload kind keeps its pod template at a fixed path. The kind
//! table maps a kind to that path; the locator walks it and hands the
//! template to a caller-supplied mutator.

mod kind;
mod locate;


pub use kind::*;
pub use locate::*;
