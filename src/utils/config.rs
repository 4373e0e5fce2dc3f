//! Configuration and constants for the pipeline.

use std::path::PathBuf;

/// Default directory for every intermediate and final artifact
pub const DEFAULT_OUTPUT_DIR: &str = "profiling_results";

/// Current run report schema version
pub const REPORT_VERSION: &str = "1.0.0";

// Converter thresholds. Nodes below NODE_THRESHOLD percent of cumulative
// time are dropped, edges below EDGE_THRESHOLD percent likewise.
pub const NODE_THRESHOLD: &str = "0.5";
pub const EDGE_THRESHOLD: &str = "0.1";

/// Austin sampling interval
pub const AUSTIN_INTERVAL: &str = "1ms";

// Default base names per stage, combined with a stage-specific suffix
pub const PYTHON_PROFILE_BASE: &str = "python_profile";
pub const NATIVE_PROFILE_BASE: &str = "c_profile";
pub const AUSTIN_PROFILE_BASE: &str = "austin";
pub const PERF_PROFILE_BASE: &str = "perf_profile";
pub const CALLGRIND_PROFILE_BASE: &str = "valgrind";
pub const GRAPH_BASE: &str = "profile";
pub const COMBINED_GRAPH_BASE: &str = "combined";

// Stage-specific suffixes
pub const PSTATS_SUFFIX: &str = ".pstats";
pub const PYINSTRUMENT_SUFFIX: &str = "_pyinstrument.json";
pub const FLAME_SUFFIX: &str = "_flame.svg";
pub const AUSTIN_SUFFIX: &str = "_austin.txt";
pub const PERF_DATA_SUFFIX: &str = ".perf";
pub const PERF_SCRIPT_SUFFIX: &str = "_script.txt";
pub const CALLGRIND_RAW_PREFIX: &str = "callgrind.out.";
pub const CALLGRIND_TEXT_SUFFIX: &str = "_callgrind.txt";
pub const DOT_SUFFIX: &str = ".dot";
pub const GRAPH_SUFFIX: &str = "_graph";
pub const VIEWER_SVG_SUFFIX: &str = "_viewer.svg";
pub const VIEWER_SUFFIX: &str = "_interactive.html";
pub const REPORT_SUFFIX: &str = "_run.json";

/// Appended to a captured stdout file until its tool succeeds
pub const PARTIAL_SUFFIX: &str = ".partial";

/// Executable names for every external collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSet {
    pub python: String,
    pub gprof2dot: String,
    pub dot: String,
    pub py_spy: String,
    pub austin: String,
    pub perf: String,
    pub valgrind: String,
    pub callgrind_annotate: String,
    pub cc: String,
    pub cxx: String,
    pub sudo: String,
}

impl Default for ToolSet {
    fn default() -> Self {
        Self {
            python: "python3".to_string(),
            gprof2dot: "gprof2dot".to_string(),
            dot: "dot".to_string(),
            py_spy: "py-spy".to_string(),
            austin: "austin".to_string(),
            perf: "perf".to_string(),
            valgrind: "valgrind".to_string(),
            callgrind_annotate: "callgrind_annotate".to_string(),
            cc: "gcc".to_string(),
            cxx: "g++".to_string(),
            sudo: "sudo".to_string(),
        }
    }
}

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory receiving all artifacts (created if absent)
    pub output_dir: PathBuf,

    /// Overrides every per-stage default base name when set
    pub base_name: Option<String>,

    /// Wrap the final graph in an HTML viewer
    pub interactive: bool,

    /// Run py-spy through sudo
    pub sudo: bool,

    /// Extra arguments forwarded to the profiled target
    pub target_args: Vec<String>,

    /// Executables to invoke
    pub tools: ToolSet,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            base_name: None,
            interactive: false,
            sudo: false,
            target_args: Vec::new(),
            tools: ToolSet::default(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_base_name(mut self, name: impl Into<String>) -> Self {
        self.base_name = Some(name.into());
        self
    }

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn with_sudo(mut self, sudo: bool) -> Self {
        self.sudo = sudo;
        self
    }

    pub fn with_target_args(mut self, args: Vec<String>) -> Self {
        self.target_args = args;
        self
    }

    pub fn with_tools(mut self, tools: ToolSet) -> Self {
        self.tools = tools;
        self
    }

    /// Base name for a profiling artifact, falling back to the stage default
    pub fn profile_base<'a>(&'a self, default: &'a str) -> &'a str {
        self.base_name.as_deref().unwrap_or(default)
    }

    /// Base name for graph description, rendered graph and viewer files
    pub fn graph_base(&self) -> &str {
        self.base_name.as_deref().unwrap_or(GRAPH_BASE)
    }
}
