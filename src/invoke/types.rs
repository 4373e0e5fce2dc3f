//! Description of a single external tool invocation.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// One external command with its arguments and I/O redirections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<OsString>,
    stdin: Option<PathBuf>,
    stdout: Option<PathBuf>,
    quiet: bool,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
            stdout: None,
            quiet: false,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Feed the contents of `path` to the process's standard input
    pub fn stdin_from(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdin = Some(path.into());
        self
    }

    /// Write the process's standard output to `path` (truncating it)
    pub fn stdout_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdout = Some(path.into());
        self
    }

    /// Discard standard output and error, used for presence probes
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    pub fn stdin_path(&self) -> Option<&Path> {
        self.stdin.as_deref()
    }

    pub fn stdout_path(&self) -> Option<&Path> {
        self.stdout.as_deref()
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Value following `flag` in the argument list, if present
    ///
    /// Also understands the `--flag=value` spelling.
    pub fn value_of(&self, flag: &str) -> Option<&OsStr> {
        let prefix = format!("{}=", flag);
        let mut iter = self.args.iter();
        while let Some(arg) = iter.next() {
            if arg == flag {
                return iter.next().map(OsString::as_os_str);
            }
            if let Some(value) = arg.to_str().and_then(|a| a.strip_prefix(&prefix)) {
                return Some(OsStr::new(value));
            }
        }
        None
    }

    /// Shell-like rendering for logs
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        if let Some(stdin) = &self.stdin {
            line.push_str(&format!(" < {}", stdin.display()));
        }
        if let Some(stdout) = &self.stdout {
            line.push_str(&format!(" > {}", stdout.display()));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_rendering() {
        let inv = Invocation::new("gprof2dot")
            .args(["-f", "pstats", "-o", "out/profile.dot"])
            .stdin_from("out/python_profile.pstats");

        assert_eq!(
            inv.command_line(),
            "gprof2dot -f pstats -o out/profile.dot < out/python_profile.pstats"
        );
    }

    #[test]
    fn test_value_of() {
        let inv = Invocation::new("valgrind")
            .arg("--tool=callgrind")
            .arg("--callgrind-out-file=out/callgrind.out.valgrind")
            .args(["-o", "x"]);

        assert_eq!(inv.value_of("-o"), Some(OsStr::new("x")));
        assert_eq!(
            inv.value_of("--callgrind-out-file"),
            Some(OsStr::new("out/callgrind.out.valgrind"))
        );
        assert_eq!(inv.value_of("--output"), None);
    }
}
