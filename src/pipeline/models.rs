use crate::classify::{GraphDescription, ProfileArtifact, RenderedGraph};
use crate::utils::error::PipelineError;
use clap::ValueEnum;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Profiling method, each backed by a distinct external tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Method {
    /// Deterministic Python profiler (cProfile) emitting a counts table
    #[value(name = "cprofile", alias = "plain-sampling")]
    PlainSampling,

    /// pyinstrument emitting a JSON trace
    #[value(name = "pyinstrument", alias = "instrumented-sampling")]
    InstrumentedSampling,

    /// py-spy with native frames, emitting a flamegraph directly
    #[value(name = "py-spy", alias = "native-stack-sampling")]
    NativeStackSampling,

    /// Austin frame stack sampler emitting collapsed sample text
    #[value(name = "austin", alias = "frame-stack-sampling")]
    FrameStackSampling,

    /// perf record followed by perf script symbol resolution
    #[value(name = "perf", alias = "kernel-level-sampling")]
    KernelLevelSampling,

    /// valgrind callgrind followed by callgrind_annotate
    #[value(name = "valgrind", alias = "emulated-tracing")]
    EmulatedTracing,
}

impl Method {
    pub const ALL: [Method; 6] = [
        Method::PlainSampling,
        Method::InstrumentedSampling,
        Method::NativeStackSampling,
        Method::FrameStackSampling,
        Method::KernelLevelSampling,
        Method::EmulatedTracing,
    ];

    /// Tool-oriented name, as accepted on the command line
    pub fn name(self) -> &'static str {
        match self {
            Method::PlainSampling => "cprofile",
            Method::InstrumentedSampling => "pyinstrument",
            Method::NativeStackSampling => "py-spy",
            Method::FrameStackSampling => "austin",
            Method::KernelLevelSampling => "perf",
            Method::EmulatedTracing => "valgrind",
        }
    }

    /// Descriptive alias
    pub fn descriptive_name(self) -> &'static str {
        match self {
            Method::PlainSampling => "plain-sampling",
            Method::InstrumentedSampling => "instrumented-sampling",
            Method::NativeStackSampling => "native-stack-sampling",
            Method::FrameStackSampling => "frame-stack-sampling",
            Method::KernelLevelSampling => "kernel-level-sampling",
            Method::EmulatedTracing => "emulated-tracing",
        }
    }

    /// Methods that can only run a Python script
    pub fn requires_script(self) -> bool {
        matches!(
            self,
            Method::PlainSampling
                | Method::InstrumentedSampling
                | Method::NativeStackSampling
                | Method::FrameStackSampling
        )
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.name() == s || m.descriptive_name() == s)
            .ok_or_else(|| PipelineError::UnsupportedMethod(s.to_string()))
    }
}

/// Image format requested from the layout tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Svg,
    Png,
    Pdf,
    Ps,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Ps => "ps",
        }
    }

    /// Graphviz `-T` flag selecting this format
    pub fn layout_flag(self) -> String {
        format!("-T{}", self.extension())
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Source language of a target that needs compiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    C,
    Cpp,
}

/// What kind of program is being profiled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Python script run through the interpreter
    Script,
    /// C/C++ source compiled before profiling
    Source(Language),
    /// Anything else, run directly
    Executable,
}

impl TargetKind {
    pub fn detect(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "py" => TargetKind::Script,
            "c" => TargetKind::Source(Language::C),
            "cpp" | "cc" | "cxx" => TargetKind::Source(Language::Cpp),
            _ => TargetKind::Executable,
        }
    }
}

/// Everything a successful run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub method: Method,
    pub target: PathBuf,

    /// Binary compiled from a source target, if any
    pub compiled: Option<PathBuf>,

    pub profile: ProfileArtifact,

    /// Absent when the profiler emitted a renderable image directly
    pub graph: Option<GraphDescription>,

    pub rendered: RenderedGraph,
    pub viewer: Option<PathBuf>,
    pub report: PathBuf,
}

/// Result of a multi-method run
#[derive(Debug, Clone)]
pub struct CombinedOutcome {
    /// One slot per requested method, `None` where profiling failed
    pub candidates: Vec<Option<ProfileArtifact>>,

    pub graph: Option<GraphDescription>,
    pub rendered: RenderedGraph,
    pub viewer: Option<PathBuf>,
}
