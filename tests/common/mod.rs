#![allow(dead_code)]

use profgraph::invoke::{Invocation, ToolRunner};
use profgraph::utils::error::ToolError;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Flags after which tools name the file they write
const OUTPUT_FLAGS: &[&str] = &["-o", "--output", "--callgrind-out-file"];

/// Runner that records invocations and simulates each tool by writing
/// the file it was asked to produce
#[derive(Default)]
pub struct FakeRunner {
    calls: RefCell<Vec<Invocation>>,
    missing: HashSet<String>,
    failing: HashMap<String, i32>,
    silent: HashSet<String>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// `program` behaves as if absent from PATH
    pub fn missing(mut self, program: &str) -> Self {
        self.missing.insert(program.to_string());
        self
    }

    /// `program` writes partial output, then exits with `code`
    pub fn failing(mut self, program: &str, code: i32) -> Self {
        self.failing.insert(program.to_string(), code);
        self
    }

    /// `program` fails like [`FakeRunner::failing`], but only when its
    /// first argument is `subcommand`
    pub fn failing_subcommand(mut self, program: &str, subcommand: &str, code: i32) -> Self {
        self.failing.insert(format!("{} {}", program, subcommand), code);
        self
    }

    /// `program` succeeds without writing anything
    pub fn silent(mut self, program: &str) -> Self {
        self.silent.insert(program.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|c| c.program().to_string())
            .collect()
    }
}

impl ToolRunner for FakeRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), ToolError> {
        self.calls.borrow_mut().push(invocation.clone());
        let program = invocation.program();

        if self.missing.contains(program) {
            return Err(ToolError::NotFound {
                program: program.to_string(),
            });
        }

        if self.silent.contains(program) {
            return Ok(());
        }

        let contents = format!("{} output\n", program);
        if let Some(sink) = invocation.stdout_path() {
            std::fs::write(sink, &contents).unwrap();
        }
        for flag in OUTPUT_FLAGS {
            if let Some(path) = invocation.value_of(flag) {
                std::fs::write(path, &contents).unwrap();
            }
        }

        let subcommand = invocation
            .arguments()
            .first()
            .map(|a| format!("{} {}", program, a.to_string_lossy()));
        let failure = subcommand
            .and_then(|key| self.failing.get(&key))
            .or_else(|| self.failing.get(program));

        match failure {
            Some(&code) => Err(ToolError::NonZeroExit {
                program: program.to_string(),
                code: Some(code),
            }),
            None => Ok(()),
        }
    }
}

/// Write a small file and return its path
pub fn touch(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

pub fn assert_non_empty(path: &Path) {
    let meta = std::fs::metadata(path)
        .unwrap_or_else(|e| panic!("{} missing: {}", path.display(), e));
    assert!(meta.len() > 0, "{} is empty", path.display());
}
