//! External dependency checks and installation hints.

pub mod status;

pub use status::{install_hint, install_instructions, DependencyStatus, ToolStatus};
