//! Terminal output helpers for the buildcfg tools
//!
//! Status glyphs and human rendering of configuration plans and reports.

#![warn(missing_docs)]

pub mod output;
pub mod render;

pub use output::Status;
