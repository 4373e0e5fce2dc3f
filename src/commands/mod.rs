//! CLI command implementations.
//!
//! Commands orchestrate the library components to perform user tasks.

pub mod models;
pub mod profile;
pub mod utils;

// Re-export main command functions
pub use models::ProfileArgs;
pub use profile::{execute_profile, execute_with, validate_args};
pub use utils::{create_example_files, display_dependency_status, display_install_instructions};
