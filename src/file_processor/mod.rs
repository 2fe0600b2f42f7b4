//! File discovery and conversion.
//!
//! This module finds `.qmd` documents and turns each one into a line-aligned
//! `.py` file on disk.

mod discovery;
mod processing;

pub use discovery::*;
pub use processing::*;
