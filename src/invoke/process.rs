//! Blocking execution of external tools.
//!
//! Every subprocess the pipeline starts goes through [`invoke`], so all
//! stages share the same error mapping and redirection handling.

use super::types::Invocation;
use crate::utils::error::ToolError;
use log::debug;
use std::fs::File;
use std::io;
use std::process::{Command, Stdio};

/// Something able to run an [`Invocation`] to completion
pub trait ToolRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), ToolError>;
}

impl<R: ToolRunner + ?Sized> ToolRunner for &R {
    fn run(&self, invocation: &Invocation) -> Result<(), ToolError> {
        (**self).run(invocation)
    }
}

/// Runner that spawns real processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), ToolError> {
        invoke(invocation)
    }
}

/// Spawn one process, wait for it, and map its outcome
///
/// **Public** - the single subprocess entry point
///
/// # Arguments
/// * `invocation` - Program, arguments and optional redirections
///
/// # Errors
/// * `ToolError::NotFound` - the executable could not be located
/// * `ToolError::NonZeroExit` - the process finished unsuccessfully
/// * `ToolError::Io` - a redirection file could not be opened, or spawning failed
///
/// Redirection files are owned by the `Command` and closed when this
/// function returns, whatever the outcome. Never retries.
pub fn invoke(invocation: &Invocation) -> Result<(), ToolError> {
    let program = invocation.program();
    debug!("Running: {}", invocation.command_line());

    let mut command = Command::new(program);
    command.args(invocation.arguments());

    if let Some(path) = invocation.stdin_path() {
        let file = File::open(path).map_err(|source| io_error(program, source))?;
        command.stdin(Stdio::from(file));
    } else if invocation.is_quiet() {
        command.stdin(Stdio::null());
    }

    if let Some(path) = invocation.stdout_path() {
        let file = File::create(path).map_err(|source| io_error(program, source))?;
        command.stdout(Stdio::from(file));
    } else if invocation.is_quiet() {
        command.stdout(Stdio::null());
    }

    if invocation.is_quiet() {
        command.stderr(Stdio::null());
    }

    let status = command.status().map_err(|source| spawn_error(program, source))?;

    if status.success() {
        Ok(())
    } else {
        debug!("{} exited with {}", program, status);
        Err(ToolError::NonZeroExit {
            program: program.to_string(),
            code: status.code(),
        })
    }
}

/// Check whether `invocation` runs successfully, discarding its output
pub fn probe(runner: &dyn ToolRunner, invocation: &Invocation) -> bool {
    runner.run(&invocation.clone().quiet()).is_ok()
}

fn spawn_error(program: &str, source: io::Error) -> ToolError {
    if source.kind() == io::ErrorKind::NotFound {
        ToolError::NotFound {
            program: program.to_string(),
        }
    } else {
        io_error(program, source)
    }
}

fn io_error(program: &str, source: io::Error) -> ToolError {
    ToolError::Io {
        program: program.to_string(),
        source,
    }
}
