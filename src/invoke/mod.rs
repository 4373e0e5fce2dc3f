//! External tool invocation.
//!
//! Compilation, sampling, conversion, rendering and dependency probes all
//! run through the same blocking `invoke` call.

pub mod process;
pub mod types;

// Re-export main types
pub use process::{invoke, probe, SystemRunner, ToolRunner};
pub use types::Invocation;
