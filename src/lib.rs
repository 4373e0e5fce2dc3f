//! profgraph
//!
//! Call-graph visualization for mixed Python/C/C++ programs.
//!
//! This crate drives external profilers (cProfile, pyinstrument, py-spy,
//! perf, valgrind), normalizes their output with gprof2dot and renders
//! the result with Graphviz. It does no measurement of its own.
//!
//! ## Getting Started
//!
//! ```bash
//! cargo install profgraph
//! profgraph --check-deps
//! profgraph script.py --method cprofile --format svg
//! ```
//!
//! ## Library use
//!
//! ```ignore
//! use profgraph::pipeline::{run_pipeline, Method, OutputFormat};
//! use profgraph::utils::PipelineConfig;
//!
//! let outcome = run_pipeline(
//!     "test.py",
//!     Method::PlainSampling,
//!     OutputFormat::Svg,
//!     PipelineConfig::new(),
//! )?;
//! println!("{}", outcome.rendered.path().display());
//! ```

pub mod classify;
pub mod commands;
pub mod deps;
pub mod invoke;
pub mod output;
pub mod pipeline;
pub mod utils;
