//! Profile format classification and artifact types.
//!
//! This module handles:
//! - Inferring a profile's format from its file name
//! - Describing the artifacts each pipeline stage hands to the next

pub mod artifact;
pub mod rules;

// Re-export main types
pub use artifact::{GraphDescription, ProfileArtifact, RenderedGraph};
pub use rules::{classify, classify_with, FormatTag, DEFAULT_FORMAT, FORMAT_RULES};
