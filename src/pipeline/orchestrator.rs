//! Pipeline orchestration.
//!
//! A run:
//! 1. Compiles the target if it is C/C++ source
//! 2. Profiles it with the chosen method
//! 3. Classifies the profile and converts it to a dot call graph
//! 4. Renders the graph with the layout tool
//! 5. Optionally wraps the image in an interactive viewer
//! 6. Writes a JSON run report
//!
//! Every stage blocks until its tool exits, and the first failure aborts
//! the run.

use super::models::{Language, Method, OutputFormat, RunOutcome, TargetKind};
use crate::classify::{GraphDescription, ProfileArtifact, RenderedGraph};
use crate::deps::install_hint;
use crate::invoke::{Invocation, SystemRunner, ToolRunner};
use crate::output::{self, ReportArtifact, RunReport};
use crate::utils::config::*;
use crate::utils::error::{OutputError, PipelineError, Stage, ToolError};
use log::{debug, error, info, warn};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};

/// Sequences external tools over a single output directory
pub struct Pipeline<R = SystemRunner> {
    config: PipelineConfig,
    runner: R,
}

impl Pipeline<SystemRunner> {
    /// Pipeline that spawns real processes
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_runner(config, SystemRunner)
    }
}

impl<R: ToolRunner> Pipeline<R> {
    pub fn with_runner(config: PipelineConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run the full pipeline for one method
    ///
    /// **Public** - main entry point
    ///
    /// # Arguments
    /// * `target` - Python script, C/C++ source file, or executable
    /// * `method` - Profiling method
    /// * `format` - Image format for the rendered graph
    ///
    /// # Returns
    /// The rendered graph and every intermediate artifact. The rendered
    /// graph exists on disk whenever this returns `Ok`.
    ///
    /// # Errors
    /// The first failing stage's error; no later stage runs.
    pub fn run(
        &self,
        target: &Path,
        method: Method,
        format: OutputFormat,
    ) -> Result<RunOutcome, PipelineError> {
        let start_time = Instant::now();

        info!("Starting profiling pipeline");
        info!("Method: {} ({})", method, method.descriptive_name());
        info!("Target: {}", target.display());

        info!("Step 1/4: Profiling...");
        let (profile, compiled) = self.profile_target(target, method)?;

        let graph_base = self.config.graph_base().to_string();

        let (graph, rendered) = if profile.format().is_rendered() {
            info!(
                "Steps 2-3/4: {} emitted a renderable {} directly, skipping conversion",
                method,
                profile.format()
            );
            (None, RenderedGraph::new(profile.path()))
        } else {
            info!("Step 2/4: Converting {} data to a call graph...", profile.format());
            let graph = self.normalize(&profile, &graph_base)?;

            info!("Step 3/4: Rendering {} graph...", format);
            let rendered = self.render(&graph, format, &graph_base)?;
            (Some(graph), rendered)
        };

        info!("Step 4/4: Writing viewer and run report...");
        let viewer = self.viewer(&rendered, graph.as_ref(), &graph_base)?;

        let mut outcome = RunOutcome {
            method,
            target: target.to_path_buf(),
            compiled,
            profile,
            graph,
            rendered,
            viewer,
            report: PathBuf::new(),
        };
        outcome.report = self.report(&outcome, &graph_base)?;

        info!("✓ Graph saved to: {}", outcome.rendered.path().display());
        info!("Pipeline completed in {:.2}s", start_time.elapsed().as_secs_f64());

        Ok(outcome)
    }

    /// Profile `target` with `method`, compiling it first if needed
    ///
    /// **Public** - used on its own by multi-method runs
    pub fn profile(&self, target: &Path, method: Method) -> Result<ProfileArtifact, PipelineError> {
        self.profile_target(target, method).map(|(artifact, _)| artifact)
    }

    fn profile_target(
        &self,
        target: &Path,
        method: Method,
    ) -> Result<(ProfileArtifact, Option<PathBuf>), PipelineError> {
        let kind = self.check_target(target, method)?;
        let compiled = self.build_target(target, kind)?;
        let artifact = self.profile_built(target, kind, compiled.as_deref(), method)?;
        Ok((artifact, compiled))
    }

    /// Verify that `target` exists and that `method` can profile it
    pub(crate) fn check_target(
        &self,
        target: &Path,
        method: Method,
    ) -> Result<TargetKind, PipelineError> {
        if !target.exists() {
            error!("Target not found: {}", target.display());
            return Err(PipelineError::TargetNotFound(target.to_path_buf()));
        }

        let kind = TargetKind::detect(target);
        if method.requires_script() && kind != TargetKind::Script {
            error!("{} can only profile Python scripts", method);
            return Err(PipelineError::IncompatibleTarget {
                method: method.name().to_string(),
                target: target.to_path_buf(),
            });
        }

        Ok(kind)
    }

    /// Prepare the output directory and compile source targets
    ///
    /// # Returns
    /// The compiled binary, or `None` for scripts and executables
    pub(crate) fn build_target(
        &self,
        target: &Path,
        kind: TargetKind,
    ) -> Result<Option<PathBuf>, PipelineError> {
        self.prepare_output_dir()?;

        match kind {
            TargetKind::Source(language) => {
                let name = target
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "target".to_string());
                Ok(Some(self.compile(&[target.to_path_buf()], &name, language)?))
            }
            TargetKind::Script | TargetKind::Executable => Ok(None),
        }
    }

    /// Run the profiler for `method` against an already built target
    pub(crate) fn profile_built(
        &self,
        target: &Path,
        kind: TargetKind,
        compiled: Option<&Path>,
        method: Method,
    ) -> Result<ProfileArtifact, PipelineError> {
        let artifact = match method {
            Method::PlainSampling => self.profile_cprofile(target)?,
            Method::InstrumentedSampling => self.profile_pyinstrument(target)?,
            Method::NativeStackSampling => self.profile_py_spy(target)?,
            Method::FrameStackSampling => self.profile_austin(target)?,
            Method::KernelLevelSampling => {
                let command = self.target_command(target, kind, compiled);
                self.profile_perf(&command)?
            }
            Method::EmulatedTracing => {
                let command = self.target_command(target, kind, compiled);
                self.profile_callgrind(&command)?
            }
        };

        info!(
            "✓ Profile saved to: {} ({})",
            artifact.path().display(),
            artifact.format()
        );

        Ok(artifact)
    }

    /// Compile C/C++ sources with debug symbols and gprof instrumentation
    ///
    /// **Public** - also usable on its own for multi-file builds
    ///
    /// # Returns
    /// Path of the binary, `<output_dir>/<output_name>`
    pub fn compile(
        &self,
        sources: &[PathBuf],
        output_name: &str,
        language: Language,
    ) -> Result<PathBuf, PipelineError> {
        self.prepare_output_dir()?;

        let (compiler, hint, label) = match language {
            Language::C => (&self.config.tools.cc, "gcc", "C"),
            Language::Cpp => (&self.config.tools.cxx, "g++", "C++"),
        };
        info!("Compiling {} code with profiling enabled...", label);

        let binary = self.output_path(output_name);
        let invocation = Invocation::new(compiler)
            .args(["-g", "-pg", "-O2", "-fno-omit-frame-pointer", "-o"])
            .arg(&binary)
            .args(sources);

        self.run_stage(Stage::Compilation, hint, &invocation, &binary)?;

        info!("Compiled to: {}", binary.display());
        Ok(binary)
    }

    fn profile_cprofile(&self, script: &Path) -> Result<ProfileArtifact, PipelineError> {
        let tools = &self.config.tools;
        let out = self.profile_path(PYTHON_PROFILE_BASE, PSTATS_SUFFIX);

        let invocation = Invocation::new(&tools.python)
            .args(["-m", "cProfile", "-o"])
            .arg(&out)
            .arg(script)
            .args(&self.config.target_args);

        self.run_stage(Stage::Profiling, "python", &invocation, &out)?;
        Ok(ProfileArtifact::classified(out))
    }

    fn profile_pyinstrument(&self, script: &Path) -> Result<ProfileArtifact, PipelineError> {
        let tools = &self.config.tools;
        let out = self.profile_path(PYTHON_PROFILE_BASE, PYINSTRUMENT_SUFFIX);

        let invocation = Invocation::new(&tools.python)
            .args(["-m", "pyinstrument", "--renderer", "json", "-o"])
            .arg(&out)
            .arg(script)
            .args(&self.config.target_args);

        self.run_stage(Stage::Profiling, "pyinstrument", &invocation, &out)?;
        Ok(ProfileArtifact::classified(out))
    }

    fn profile_py_spy(&self, script: &Path) -> Result<ProfileArtifact, PipelineError> {
        let tools = &self.config.tools;
        let out = self.profile_path(NATIVE_PROFILE_BASE, FLAME_SUFFIX);

        let mut invocation = if self.config.sudo {
            Invocation::new(&tools.sudo).arg(&tools.py_spy)
        } else {
            Invocation::new(&tools.py_spy)
        };
        invocation = invocation.arg("record");

        // py-spy only supports native frames on Linux
        if cfg!(target_os = "linux") {
            invocation = invocation.arg("--native");
        } else {
            info!("Native frames unsupported on this platform, profiling Python frames only");
        }

        let invocation = invocation
            .arg("--output")
            .arg(&out)
            .args(["--format", "flamegraph", "--"])
            .arg(&tools.python)
            .arg(script)
            .args(&self.config.target_args);

        let hint = if self.config.sudo { "sudo" } else { "py-spy" };
        self.run_stage(Stage::Profiling, hint, &invocation, &out)?;
        Ok(ProfileArtifact::classified(out))
    }

    fn profile_austin(&self, script: &Path) -> Result<ProfileArtifact, PipelineError> {
        let tools = &self.config.tools;
        let out = self.profile_path(AUSTIN_PROFILE_BASE, AUSTIN_SUFFIX);

        let invocation = Invocation::new(&tools.austin)
            .args(["-s", "-i", AUSTIN_INTERVAL, "-o"])
            .arg(&out)
            .arg(&tools.python)
            .arg(script)
            .args(&self.config.target_args);

        self.run_stage(Stage::Profiling, "austin", &invocation, &out)?;
        Ok(ProfileArtifact::classified(out))
    }

    fn profile_perf(&self, command: &[OsString]) -> Result<ProfileArtifact, PipelineError> {
        let tools = &self.config.tools;
        let base = self.config.profile_base(PERF_PROFILE_BASE);
        let data = self.output_path(format!("{}{}", base, PERF_DATA_SUFFIX));
        let script = self.output_path(format!("{}{}", base, PERF_SCRIPT_SUFFIX));

        let record = Invocation::new(&tools.perf)
            .args(["record", "-g", "--call-graph", "dwarf", "-o"])
            .arg(&data)
            .args(command);

        self.run_stage(Stage::Profiling, "perf", &record, &data)?;
        debug!("Perf data saved to: {}", data.display());

        // Raw samples only become text once symbols are resolved
        let resolve = Invocation::new(&tools.perf).args(["script", "-i"]).arg(&data);

        self.run_captured(Stage::SymbolResolution, "perf", resolve, &script)?;
        Ok(ProfileArtifact::classified(script))
    }

    fn profile_callgrind(&self, command: &[OsString]) -> Result<ProfileArtifact, PipelineError> {
        let tools = &self.config.tools;
        let base = self.config.profile_base(CALLGRIND_PROFILE_BASE);
        let raw = self.output_path(format!("{}{}", CALLGRIND_RAW_PREFIX, base));
        let text = self.output_path(format!("{}{}", base, CALLGRIND_TEXT_SUFFIX));

        let mut out_flag = OsString::from("--callgrind-out-file=");
        out_flag.push(&raw);

        let trace = Invocation::new(&tools.valgrind)
            .arg("--tool=callgrind")
            .arg(out_flag)
            .args(command);

        self.run_stage(Stage::Profiling, "valgrind", &trace, &raw)?;
        debug!("Callgrind output: {}", raw.display());

        let annotate = Invocation::new(&tools.callgrind_annotate).arg(&raw);

        self.run_captured(Stage::SymbolResolution, "callgrind_annotate", annotate, &text)?;
        Ok(ProfileArtifact::classified(text))
    }

    /// Convert a profile into a dot call graph
    ///
    /// **Public** - also used by the combiner
    ///
    /// Nodes under 0.5% of cumulative time and edges under 0.1% are
    /// dropped; nodes are colored by self time.
    ///
    /// # Errors
    /// * `PipelineError::NotConvertible` - the artifact is already an image
    /// * `PipelineError::Tool` - the converter is missing or failed
    /// * `PipelineError::MissingArtifact` - the converter wrote nothing
    pub fn normalize(
        &self,
        artifact: &ProfileArtifact,
        graph_base: &str,
    ) -> Result<GraphDescription, PipelineError> {
        let format = artifact.format();
        let converter_format =
            format
                .converter_format()
                .ok_or_else(|| PipelineError::NotConvertible {
                    path: artifact.path().to_path_buf(),
                    format: format.to_string(),
                })?;

        debug!("Processing profile: {} as {}", artifact.path().display(), converter_format);

        let dot = self.output_path(format!("{}{}", graph_base, DOT_SUFFIX));
        let invocation = Invocation::new(&self.config.tools.gprof2dot)
            .args([
                "-f",
                converter_format,
                "--node-thres",
                NODE_THRESHOLD,
                "--edge-thres",
                EDGE_THRESHOLD,
                "--color-nodes-by-selftime",
                "-o",
            ])
            .arg(&dot);

        let invocation = if format.reads_stdin() {
            invocation.stdin_from(artifact.path())
        } else {
            invocation.arg(artifact.path())
        };

        self.run_stage(Stage::Normalization, "gprof2dot", &invocation, &dot)?;

        info!("Dot file created: {}", dot.display());
        Ok(GraphDescription::new(dot))
    }

    /// Lay out a dot graph as an image
    ///
    /// **Public** - also used by the combiner
    pub fn render(
        &self,
        graph: &GraphDescription,
        format: OutputFormat,
        graph_base: &str,
    ) -> Result<RenderedGraph, PipelineError> {
        let out = self.output_path(format!(
            "{}{}.{}",
            graph_base,
            GRAPH_SUFFIX,
            format.extension()
        ));

        self.layout(graph, format, &out, Stage::Rendering)?;

        info!("Graph generated: {}", out.display());
        Ok(RenderedGraph::new(out))
    }

    fn layout(
        &self,
        graph: &GraphDescription,
        format: OutputFormat,
        out: &Path,
        stage: Stage,
    ) -> Result<(), PipelineError> {
        let invocation = Invocation::new(&self.config.tools.dot)
            .arg(format.layout_flag())
            .arg("-o")
            .arg(out)
            .arg(graph.path());

        self.run_stage(stage, "dot", &invocation, out)
    }

    /// Write the interactive viewer when configured
    pub(crate) fn viewer(
        &self,
        rendered: &RenderedGraph,
        graph: Option<&GraphDescription>,
        graph_base: &str,
    ) -> Result<Option<PathBuf>, PipelineError> {
        if !self.config.interactive {
            return Ok(None);
        }

        info!("Generating interactive HTML visualization...");

        let svg = if rendered.is_svg() {
            rendered.path().to_path_buf()
        } else {
            let Some(graph) = graph else {
                warn!(
                    "No call graph available to build an SVG from {}, skipping viewer",
                    rendered.path().display()
                );
                return Ok(None);
            };
            let svg = self.output_path(format!("{}{}", graph_base, VIEWER_SVG_SUFFIX));
            self.layout(graph, OutputFormat::Svg, &svg, Stage::Viewer)?;
            svg
        };

        let html = self.output_path(format!("{}{}", graph_base, VIEWER_SUFFIX));
        output::write_viewer(&svg, graph_base, &html).map_err(|source| {
            error!("Failed to write viewer: {}", source);
            PipelineError::Output {
                stage: Stage::Viewer,
                source,
            }
        })?;

        Ok(Some(html))
    }

    fn report(&self, outcome: &RunOutcome, graph_base: &str) -> Result<PathBuf, PipelineError> {
        let mut report = RunReport::new(
            outcome.method.name(),
            &outcome.target,
            outcome.rendered.path(),
        );

        if let Some(binary) = &outcome.compiled {
            report.artifacts.push(report_artifact(Stage::Compilation, binary, None));
        }
        report.artifacts.push(report_artifact(
            Stage::Profiling,
            outcome.profile.path(),
            Some(outcome.profile.format().to_string()),
        ));
        if let Some(graph) = &outcome.graph {
            report
                .artifacts
                .push(report_artifact(Stage::Normalization, graph.path(), None));
            report.artifacts.push(report_artifact(
                Stage::Rendering,
                outcome.rendered.path(),
                None,
            ));
        }
        if let Some(viewer) = &outcome.viewer {
            report.artifacts.push(report_artifact(Stage::Viewer, viewer, None));
            report.viewer = Some(viewer.clone());
        }

        let path = self.output_path(format!("{}{}", graph_base, REPORT_SUFFIX));
        output::write_report(&report, &path).map_err(|source| PipelineError::Output {
            stage: Stage::Reporting,
            source,
        })?;

        Ok(path)
    }

    /// Argument vector that launches the target for non-Python profilers
    fn target_command(
        &self,
        target: &Path,
        kind: TargetKind,
        compiled: Option<&Path>,
    ) -> Vec<OsString> {
        let mut command = match (kind, compiled) {
            (TargetKind::Script, _) => vec![
                OsString::from(&self.config.tools.python),
                target.as_os_str().to_os_string(),
            ],
            (_, Some(binary)) => vec![runnable_path(binary).into_os_string()],
            (_, None) => vec![runnable_path(target).into_os_string()],
        };
        command.extend(self.config.target_args.iter().map(OsString::from));
        command
    }

    pub(crate) fn prepare_output_dir(&self) -> Result<(), PipelineError> {
        let dir = &self.config.output_dir;
        if !dir.is_dir() {
            debug!("Creating output directory: {}", dir.display());
            std::fs::create_dir_all(dir).map_err(|e| PipelineError::Output {
                stage: Stage::Profiling,
                source: OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    dir.display(),
                    e
                )),
            })?;
        }
        Ok(())
    }

    pub(crate) fn output_path(&self, name: impl AsRef<Path>) -> PathBuf {
        self.config.output_dir.join(name)
    }

    fn profile_path(&self, default_base: &str, suffix: &str) -> PathBuf {
        let base = self.config.profile_base(default_base);
        self.output_path(format!("{}{}", base, suffix))
    }

    /// Run one tool for `stage` and check that it wrote `produces`
    ///
    /// On failure the output file is discarded unless it existed before
    /// the stage ran. A pre-existing file the tool left untouched counts
    /// as missing output.
    fn run_stage(
        &self,
        stage: Stage,
        tool: &str,
        invocation: &Invocation,
        produces: &Path,
    ) -> Result<(), PipelineError> {
        let before = FileStamp::of(produces);

        if let Err(source) = self.runner.run(invocation) {
            if before.is_none() {
                discard_scratch(produces);
            }

            error!("{} stage failed: {}", stage, source);
            match &source {
                ToolError::NotFound { .. } => error!("Install it with: {}", install_hint(tool)),
                _ => error!("Check the {} output above for details", source.program()),
            }

            return Err(PipelineError::Tool { stage, source });
        }

        match FileStamp::of(produces) {
            Some(after) if before != Some(after) => Ok(()),
            Some(_) => {
                error!(
                    "{} stage left {} unchanged from a previous run",
                    stage,
                    produces.display()
                );
                Err(PipelineError::MissingArtifact {
                    stage,
                    path: produces.to_path_buf(),
                })
            }
            None => {
                error!("{} stage produced no output at {}", stage, produces.display());
                Err(PipelineError::MissingArtifact {
                    stage,
                    path: produces.to_path_buf(),
                })
            }
        }
    }

    /// Run a tool whose standard output is the artifact
    ///
    /// Output goes to a scratch file that replaces `sink` only once the
    /// tool succeeds, so a failure never clobbers an earlier run's file.
    fn run_captured(
        &self,
        stage: Stage,
        tool: &str,
        invocation: Invocation,
        sink: &Path,
    ) -> Result<(), PipelineError> {
        let scratch = scratch_path(sink);
        discard_scratch(&scratch);

        let invocation = invocation.stdout_to(&scratch);
        self.run_stage(stage, tool, &invocation, &scratch)?;

        std::fs::rename(&scratch, sink).map_err(|e| {
            error!("Could not move {} into place: {}", scratch.display(), e);
            discard_scratch(&scratch);
            PipelineError::Output {
                stage,
                source: OutputError::WriteFailed(e),
            }
        })
    }
}

/// Size and modification time of a file, used to tell fresh output
/// from a leftover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    len: u64,
    modified: Option<SystemTime>,
}

impl FileStamp {
    fn of(path: &Path) -> Option<Self> {
        let meta = std::fs::metadata(path).ok().filter(|m| m.is_file())?;
        Some(Self {
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

/// Run the full pipeline with real processes
///
/// **Public** - convenience wrapper around [`Pipeline::run`]
pub fn run_pipeline(
    target: impl AsRef<Path>,
    method: Method,
    format: OutputFormat,
    config: PipelineConfig,
) -> Result<RunOutcome, PipelineError> {
    Pipeline::new(config).run(target.as_ref(), method, format)
}

fn report_artifact(stage: Stage, path: &Path, format: Option<String>) -> ReportArtifact {
    ReportArtifact {
        stage: stage.to_string(),
        path: path.to_path_buf(),
        format,
    }
}

/// Remove a partial output left behind by a failed tool
fn discard_scratch(path: &Path) {
    if path.is_file() {
        match std::fs::remove_file(path) {
            Ok(()) => debug!("Removed partial output: {}", path.display()),
            Err(e) => warn!("Could not remove partial output {}: {}", path.display(), e),
        }
    }
}

/// Sibling path a captured stdout is written to before it is moved into place
fn scratch_path(sink: &Path) -> PathBuf {
    let mut name = sink.file_name().map(OsString::from).unwrap_or_default();
    name.push(PARTIAL_SUFFIX);
    sink.with_file_name(name)
}

/// Make bare file names explicit so they are not looked up on PATH
fn runnable_path(path: &Path) -> PathBuf {
    let has_dir = path
        .parent()
        .map(|p| !p.as_os_str().is_empty())
        .unwrap_or(false);

    if path.is_absolute() || has_dir {
        path.to_path_buf()
    } else {
        Path::new(".").join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runnable_path() {
        assert_eq!(runnable_path(Path::new("a.out")), PathBuf::from("./a.out"));
        assert_eq!(runnable_path(Path::new("bin/a.out")), PathBuf::from("bin/a.out"));
        assert_eq!(runnable_path(Path::new("/usr/bin/true")), PathBuf::from("/usr/bin/true"));
    }

    #[test]
    fn test_target_command_for_script() {
        let pipeline = Pipeline::new(
            PipelineConfig::new().with_target_args(vec!["--size".to_string(), "10".to_string()]),
        );
        let command = pipeline.target_command(Path::new("bench.py"), TargetKind::Script, None);

        assert_eq!(command, vec!["python3", "bench.py", "--size", "10"]);
    }

    #[test]
    fn test_target_command_for_compiled_source() {
        let pipeline = Pipeline::new(PipelineConfig::new());
        let command = pipeline.target_command(
            Path::new("lib.c"),
            TargetKind::Source(Language::C),
            Some(Path::new("profiling_results/lib")),
        );

        assert_eq!(command, vec!["profiling_results/lib"]);
    }

    #[test]
    fn test_output_paths_use_base_name() {
        let pipeline = Pipeline::new(
            PipelineConfig::new()
                .with_output_dir("out")
                .with_base_name("run1"),
        );

        assert_eq!(
            pipeline.profile_path(PYTHON_PROFILE_BASE, PSTATS_SUFFIX),
            PathBuf::from("out/run1.pstats")
        );
    }

    #[test]
    fn test_discard_scratch_ignores_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        discard_scratch(&temp_dir.path().join("absent.svg"));
    }
}
