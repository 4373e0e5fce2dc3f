//! Profile command implementation.
//!
//! Runs either a single full pipeline or a multi-method run whose
//! profiles are combined, then prints where the results went.

use super::models::ProfileArgs;
use crate::invoke::ToolRunner;
use crate::pipeline::Pipeline;
use anyhow::{bail, Context, Result};
use log::info;
use std::path::{Path, PathBuf};

/// Execute the profile command with real processes
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// Path of the final graph
pub fn execute_profile(args: ProfileArgs) -> Result<PathBuf> {
    let pipeline = Pipeline::new(args.config.clone());
    execute_with(&pipeline, &args)
}

/// Execute the profile command on a caller-supplied pipeline
pub fn execute_with<R: ToolRunner>(pipeline: &Pipeline<R>, args: &ProfileArgs) -> Result<PathBuf> {
    validate_args(args)?;
    let target = args
        .target
        .as_deref()
        .context("Please provide a target to profile")?;

    let graph = if args.methods.is_empty() {
        let outcome = pipeline
            .run(target, args.method, args.format)
            .with_context(|| {
                format!("Profiling {} with {} failed", target.display(), args.method)
            })?;

        if let Some(viewer) = &outcome.viewer {
            println!("Interactive viewer: {}", viewer.display());
        }
        info!("Run report: {}", outcome.report.display());
        outcome.rendered.into_path()
    } else {
        let outcome = pipeline
            .run_many(target, &args.methods, args.format)
            .with_context(|| format!("Profiling {} failed", target.display()))?;

        let Some(outcome) = outcome else {
            bail!("None of the requested methods produced a profile");
        };

        if let Some(viewer) = &outcome.viewer {
            println!("Interactive viewer: {}", viewer.display());
        }
        outcome.rendered.into_path()
    };

    print_success(&graph, &args.config.output_dir);
    Ok(graph)
}

/// Validate profile arguments
///
/// **Public** - can be called before execute_profile for early validation
pub fn validate_args(args: &ProfileArgs) -> Result<()> {
    let Some(target) = &args.target else {
        bail!("Please provide a target to profile\nUse --help for more information");
    };

    if !target.exists() {
        bail!("Target '{}' not found", target.display());
    }

    if args.config.output_dir.as_os_str().is_empty() {
        bail!("Output directory cannot be empty");
    }

    if let Some(name) = &args.config.base_name {
        if name.is_empty() || name.contains(std::path::MAIN_SEPARATOR) || name.contains('/') {
            bail!("Base name must be a plain file name");
        }
    }

    Ok(())
}

fn print_success(graph: &Path, output_dir: &Path) {
    println!("\n{}", "=".repeat(60));
    println!("SUCCESS! Graph saved to: {}", graph.display());
    println!("Open with: xdg-open {}  # Linux", graph.display());
    println!("           open {}       # macOS", graph.display());
    println!("All artifacts are in: {}", output_dir.display());
    println!("{}", "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args_missing_target() {
        let args = ProfileArgs::default();
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_nonexistent_target() {
        let args = ProfileArgs {
            target: Some(PathBuf::from("definitely/not/here.py")),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_valid() {
        let temp_dir = tempfile::tempdir().unwrap();
        let script = temp_dir.path().join("test.py");
        std::fs::write(&script, "print('hi')\n").unwrap();

        let args = ProfileArgs {
            target: Some(script),
            ..Default::default()
        };
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_rejects_nested_base_name() {
        let temp_dir = tempfile::tempdir().unwrap();
        let script = temp_dir.path().join("test.py");
        std::fs::write(&script, "").unwrap();

        let mut args = ProfileArgs {
            target: Some(script),
            ..Default::default()
        };
        args.config = args.config.with_base_name("a/b");
        assert!(validate_args(&args).is_err());
    }
}
