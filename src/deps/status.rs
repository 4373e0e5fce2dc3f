//! Presence checks for the external tools the pipeline drives.
//!
//! Status is computed on demand and handed to the caller; nothing is
//! cached between calls.

use crate::invoke::{probe, Invocation, ToolRunner};
use crate::utils::config::ToolSet;
use log::debug;

/// Presence of a single tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub name: String,
    pub installed: bool,
}

/// Result of probing every known tool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyStatus {
    pub tools: Vec<ToolStatus>,
}

impl DependencyStatus {
    /// Probe each tool with a cheap version/help invocation
    pub fn probe(runner: &dyn ToolRunner, tools: &ToolSet) -> Self {
        let tools = probe_invocations(tools)
            .into_iter()
            .map(|(name, invocation)| {
                let installed = probe(runner, &invocation);
                debug!("{}: {}", name, if installed { "found" } else { "missing" });
                ToolStatus { name, installed }
            })
            .collect();

        Self { tools }
    }

    pub fn is_installed(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name == name && t.installed)
    }

    /// Names of tools that were not found
    pub fn missing(&self) -> Vec<&str> {
        self.tools
            .iter()
            .filter(|t| !t.installed)
            .map(|t| t.name.as_str())
            .collect()
    }

    /// Human-readable table, one line per tool
    pub fn table(&self) -> String {
        let rule = "-".repeat(40);
        let mut out = String::new();
        out.push_str("Dependency Status:\n");
        out.push_str(&rule);
        out.push('\n');
        for tool in &self.tools {
            let status = if tool.installed { "✓ Installed" } else { "✗ Not found" };
            out.push_str(&format!("{:18} : {}\n", tool.name, status));
        }
        out.push_str(&rule);
        out
    }
}

/// Probe invocation for every tool, keyed by display name
fn probe_invocations(tools: &ToolSet) -> Vec<(String, Invocation)> {
    vec![
        ("gprof2dot".to_string(), Invocation::new(&tools.gprof2dot).arg("--help")),
        ("dot".to_string(), Invocation::new(&tools.dot).arg("-V")),
        ("py-spy".to_string(), Invocation::new(&tools.py_spy).arg("--version")),
        ("austin".to_string(), Invocation::new(&tools.austin).arg("--version")),
        ("perf".to_string(), Invocation::new(&tools.perf).arg("--version")),
        ("valgrind".to_string(), Invocation::new(&tools.valgrind).arg("--version")),
        (
            "callgrind_annotate".to_string(),
            Invocation::new(&tools.callgrind_annotate).arg("--version"),
        ),
        ("gcc".to_string(), Invocation::new(&tools.cc).arg("--version")),
        ("g++".to_string(), Invocation::new(&tools.cxx).arg("--version")),
        ("python".to_string(), Invocation::new(&tools.python).arg("--version")),
        (
            "pyinstrument".to_string(),
            Invocation::new(&tools.python).args(["-m", "pyinstrument", "--version"]),
        ),
    ]
}

/// Installation suggestion for a tool, by executable or display name
pub fn install_hint(tool: &str) -> &'static str {
    match tool {
        "gprof2dot" => "pip install gprof2dot",
        "dot" => "apt-get install graphviz (or: brew install graphviz)",
        "py-spy" => "pip install py-spy",
        "pyinstrument" => "pip install pyinstrument",
        "austin" => "pip install austin-python",
        "perf" => "apt-get install linux-tools-common linux-tools-generic",
        "valgrind" | "callgrind_annotate" => "apt-get install valgrind",
        "gcc" | "g++" | "cc" | "c++" => "apt-get install build-essential",
        "python" | "python3" => "install Python 3 from your package manager",
        "sudo" => "run as a user allowed to use sudo, or drop --sudo",
        _ => "check that the tool is installed and on PATH",
    }
}

/// Text printed by `--install-deps`
pub fn install_instructions() -> String {
    let rule = "-".repeat(40);
    [
        "Installation commands for dependencies:",
        rule.as_str(),
        "# Python packages:",
        "pip install gprof2dot py-spy pyinstrument austin-python",
        "",
        "# System packages (Ubuntu/Debian):",
        "sudo apt-get install graphviz valgrind build-essential linux-tools-common linux-tools-generic",
        "",
        "# System packages (macOS):",
        "brew install graphviz",
        rule.as_str(),
    ]
    .join("\n")
}
