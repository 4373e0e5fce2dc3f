//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while running a single external tool
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("`{program}` not found on PATH")]
    NotFound { program: String },

    #[error("`{program}` exited with {}", exit_label(.code))]
    NonZeroExit { program: String, code: Option<i32> },

    #[error("failed to run `{program}`: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

impl ToolError {
    /// Name of the program that failed
    pub fn program(&self) -> &str {
        match self {
            ToolError::NotFound { program }
            | ToolError::NonZeroExit { program, .. }
            | ToolError::Io { program, .. } => program,
        }
    }
}

/// Pipeline stage names, used to attribute failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Compilation,
    Profiling,
    SymbolResolution,
    Normalization,
    Rendering,
    Viewer,
    Reporting,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Compilation => "compilation",
            Stage::Profiling => "profiling",
            Stage::SymbolResolution => "symbol resolution",
            Stage::Normalization => "normalization",
            Stage::Rendering => "rendering",
            Stage::Viewer => "viewer",
            Stage::Reporting => "reporting",
        };
        f.write_str(name)
    }
}

/// Errors that abort a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{stage} stage failed: {source}")]
    Tool {
        stage: Stage,
        #[source]
        source: ToolError,
    },

    #[error("{stage} stage produced no output at {}", .path.display())]
    MissingArtifact { stage: Stage, path: PathBuf },

    #[error("unsupported profiling method: {0}")]
    UnsupportedMethod(String),

    #[error("method {method} cannot profile {}", .target.display())]
    IncompatibleTarget { method: String, target: PathBuf },

    #[error("target not found: {}", .0.display())]
    TargetNotFound(PathBuf),

    #[error("{} holds {format} data, which has no graph conversion", .path.display())]
    NotConvertible { path: PathBuf, format: String },

    #[error("{stage} stage could not write output: {source}")]
    Output {
        stage: Stage,
        #[source]
        source: OutputError,
    },
}

impl PipelineError {
    /// Stage the failure is attributed to, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Tool { stage, .. }
            | PipelineError::MissingArtifact { stage, .. }
            | PipelineError::Output { stage, .. } => Some(*stage),
            PipelineError::IncompatibleTarget { .. } => Some(Stage::Profiling),
            PipelineError::NotConvertible { .. } => Some(Stage::Normalization),
            PipelineError::UnsupportedMethod(_) | PipelineError::TargetNotFound(_) => None,
        }
    }

    /// True when an external executable could not be located
    pub fn is_tool_not_found(&self) -> bool {
        matches!(
            self,
            PipelineError::Tool {
                source: ToolError::NotFound { .. },
                ..
            }
        )
    }

    /// True when an external process ran but exited unsuccessfully
    pub fn is_tool_failed(&self) -> bool {
        matches!(
            self,
            PipelineError::Tool {
                source: ToolError::NonZeroExit { .. },
                ..
            }
        )
    }
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
