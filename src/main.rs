//! profgraph CLI
//!
//! Profiles a Python script, C/C++ source file or executable with an
//! external profiler and renders the call graph.

use anyhow::Result;
use clap::{Args, Parser};
use env_logger::Env;
use std::path::{Path, PathBuf};

use profgraph::commands::{
    create_example_files, display_dependency_status, display_install_instructions,
    execute_profile, ProfileArgs,
};
use profgraph::pipeline::{Method, OutputFormat};
use profgraph::utils::config::{PipelineConfig, ToolSet, DEFAULT_OUTPUT_DIR};

/// profgraph - call-graph visualization for mixed Python/C/C++ code
#[derive(Parser, Debug)]
#[command(name = "profgraph")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Python script, C/C++ source file or executable to profile
    target: Option<PathBuf>,

    /// Arguments passed through to the target (after `--`)
    #[arg(last = true)]
    target_args: Vec<String>,

    /// Profiling method for a single pipeline run
    #[arg(long, value_enum, default_value_t = Method::PlainSampling, conflicts_with = "methods")]
    method: Method,

    /// Profile with several methods and combine the results
    #[arg(long, value_enum, num_args = 1..)]
    methods: Vec<Method>,

    /// Output graph format
    #[arg(long, value_enum, default_value_t = OutputFormat::Svg)]
    format: OutputFormat,

    /// Directory for output files
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Base name for output files (defaults differ per stage)
    #[arg(long)]
    name: Option<String>,

    /// Generate an interactive HTML visualization
    #[arg(long)]
    interactive: bool,

    /// Run py-spy through sudo
    #[arg(long)]
    sudo: bool,

    /// Check installed dependencies
    #[arg(long)]
    check_deps: bool,

    /// Create an example C extension and driver script
    #[arg(long)]
    create_example: bool,

    /// Show installation commands for dependencies
    #[arg(long)]
    install_deps: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(flatten)]
    tools: ToolArgs,
}

/// Executable overrides for the external tools
#[derive(Args, Debug)]
#[command(next_help_heading = "Tools")]
struct ToolArgs {
    #[arg(long, env = "PROFGRAPH_PYTHON", default_value = "python3")]
    python_bin: String,

    #[arg(long, env = "PROFGRAPH_GPROF2DOT", default_value = "gprof2dot")]
    gprof2dot_bin: String,

    #[arg(long, env = "PROFGRAPH_DOT", default_value = "dot")]
    dot_bin: String,

    #[arg(long, env = "PROFGRAPH_PY_SPY", default_value = "py-spy")]
    py_spy_bin: String,

    #[arg(long, env = "PROFGRAPH_AUSTIN", default_value = "austin")]
    austin_bin: String,

    #[arg(long, env = "PROFGRAPH_PERF", default_value = "perf")]
    perf_bin: String,

    #[arg(long, env = "PROFGRAPH_VALGRIND", default_value = "valgrind")]
    valgrind_bin: String,

    #[arg(long, env = "PROFGRAPH_CALLGRIND_ANNOTATE", default_value = "callgrind_annotate")]
    callgrind_annotate_bin: String,

    #[arg(long, env = "PROFGRAPH_CC", default_value = "gcc")]
    cc: String,

    #[arg(long, env = "PROFGRAPH_CXX", default_value = "g++")]
    cxx: String,
}

impl From<ToolArgs> for ToolSet {
    fn from(args: ToolArgs) -> Self {
        Self {
            python: args.python_bin,
            gprof2dot: args.gprof2dot_bin,
            dot: args.dot_bin,
            py_spy: args.py_spy_bin,
            austin: args.austin_bin,
            perf: args.perf_bin,
            valgrind: args.valgrind_bin,
            callgrind_annotate: args.callgrind_annotate_bin,
            cc: args.cc,
            cxx: args.cxx,
            ..ToolSet::default()
        }
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let tools = ToolSet::from(cli.tools);

    // Informational flags never run the pipeline
    if cli.install_deps {
        display_install_instructions();
        return Ok(());
    }

    if cli.check_deps {
        display_dependency_status(&tools);
        return Ok(());
    }

    if cli.create_example {
        create_example_files(Path::new("."))?;
        return Ok(());
    }

    let mut config = PipelineConfig::new()
        .with_output_dir(cli.output_dir)
        .with_interactive(cli.interactive)
        .with_sudo(cli.sudo)
        .with_target_args(cli.target_args)
        .with_tools(tools);

    if let Some(name) = cli.name {
        config = config.with_base_name(name);
    }

    let args = ProfileArgs {
        target: cli.target,
        method: cli.method,
        methods: cli.methods,
        format: cli.format,
        config,
    };

    execute_profile(args)?;

    Ok(())
}
