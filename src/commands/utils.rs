use crate::deps::{install_instructions, DependencyStatus};
use crate::invoke::SystemRunner;
use crate::output::create_example;
use crate::utils::config::ToolSet;
use anyhow::{Context, Result};
use std::path::Path;

/// Probe every external tool and print the status table
pub fn display_dependency_status(tools: &ToolSet) -> DependencyStatus {
    let status = DependencyStatus::probe(&SystemRunner, tools);
    println!("\n{}", status.table());
    status
}

/// Print installation commands for every dependency
pub fn display_install_instructions() {
    println!("\n{}", install_instructions());
}

/// Write the example extension sources into `dir`
pub fn create_example_files(dir: &Path) -> Result<()> {
    let written = create_example(dir)
        .with_context(|| format!("Failed to create example files in {}", dir.display()))?;

    println!("Created example files:");
    for path in &written {
        println!("  {}", path.display());
    }
    println!("To build: python setup_extension.py build_ext --inplace");
    println!("To profile: profgraph test_mixed_code.py --method py-spy");

    Ok(())
}
