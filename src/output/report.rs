//! JSON run report writer.
//!
//! Records which files a pipeline run produced, stage by stage.

use super::{ensure_parent, validate_path};
use crate::utils::config::REPORT_VERSION;
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Summary of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Report schema version
    pub version: String,

    /// Profiling method name
    pub method: String,

    /// Profiled target
    pub target: PathBuf,

    /// Every file produced, in stage order
    pub artifacts: Vec<ReportArtifact>,

    /// Final image
    pub rendered_graph: PathBuf,

    /// Interactive viewer, when one was generated
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub viewer: Option<PathBuf>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

/// A file produced by a single stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportArtifact {
    pub stage: String,
    pub path: PathBuf,

    /// Inferred profile format, for profiling artifacts
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub format: Option<String>,
}

impl RunReport {
    pub fn new(
        method: impl Into<String>,
        target: impl Into<PathBuf>,
        rendered_graph: impl Into<PathBuf>,
    ) -> Self {
        Self {
            version: REPORT_VERSION.to_string(),
            method: method.into(),
            target: target.into(),
            artifacts: Vec::new(),
            rendered_graph: rendered_graph.into(),
            viewer: None,
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Write a run report to a JSON file
///
/// **Public** - main entry point for report output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_report(report: &RunReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing run report to: {}", output_path.display());

    validate_path(output_path)?;
    ensure_parent(output_path)?;

    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;

    Ok(())
}

/// Read a run report from a JSON file
///
/// **Public** - useful for tooling and tests
pub fn read_report(input_path: impl AsRef<Path>) -> Result<RunReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading run report from: {}", input_path.display());

    let file = File::open(input_path)?;
    let report: RunReport = serde_json::from_reader(file)?;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    fn create_test_report() -> RunReport {
        let mut report = RunReport::new("cprofile", "test.py", "out/profile_graph.svg");
        report.artifacts.push(ReportArtifact {
            stage: "profiling".to_string(),
            path: PathBuf::from("out/python_profile.pstats"),
            format: Some("counts-table".to_string()),
        });
        report
    }

    #[test]
    fn test_write_and_read_report() {
        let report = create_test_report();
        let temp_file = NamedTempFile::new().unwrap();

        write_report(&report, temp_file.path()).unwrap();
        let loaded = read_report(temp_file.path()).unwrap();

        assert_eq!(loaded, report);
    }

    #[test]
    fn test_viewer_omitted_when_absent() {
        let report = create_test_report();
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("viewer"));
    }

    #[test]
    fn test_write_report_rejects_empty_path() {
        let result = write_report(&create_test_report(), Path::new(""));
        assert!(result.is_err());
    }
}
