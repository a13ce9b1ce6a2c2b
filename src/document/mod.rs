//! Document module - Splitting and classifying manifest streams.
//!
//! A stream is read document by document, each document is classified by
//! its apiVersion and kind, and every problem found along the way is
//! collected into one [`SplitErrors`] value.

mod errors;
mod reader;
mod split;


pub use errors::*;
pub use reader::*;
pub use split::*;
