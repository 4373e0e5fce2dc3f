//! Profiling pipeline: compile, profile, normalize, render.
//!
//! Stages run strictly one after another; each hands a single file to
//! the next through the output directory.

pub mod combine;
pub mod models;
pub mod orchestrator;

// Re-export main types and functions
pub use combine::select_first_existing;
pub use models::{CombinedOutcome, Language, Method, OutputFormat, RunOutcome, TargetKind};
pub use orchestrator::{run_pipeline, Pipeline};
