//! Output writers for everything the pipeline generates itself.
//!
//! External tools write their own artifacts; this module handles:
//! - The interactive HTML viewer around a rendered graph
//! - JSON run reports
//! - Example sources for trying the pipeline out

pub mod example;
pub mod report;
pub mod viewer;

use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

// Re-export main functions
pub use example::{create_example, EXAMPLE_C_FILE, EXAMPLE_SCRIPT_FILE, EXAMPLE_SETUP_FILE};
pub use report::{read_report, write_report, ReportArtifact, RunReport};
pub use viewer::{render_viewer, write_viewer};

/// Validate an output path
///
/// **Public** - shared by every writer
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Create the parent directories of `path` if needed
pub(crate) fn ensure_parent(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}
