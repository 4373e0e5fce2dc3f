//! Artifacts passed between pipeline stages.
//!
//! Every artifact is a path on disk produced by exactly one stage.
//! Fields are private so an artifact cannot change after creation.

use super::rules::{classify, FormatTag};
use std::path::{Path, PathBuf};

/// Raw or semi-processed profile data and its inferred format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileArtifact {
    path: PathBuf,
    format: FormatTag,
}

impl ProfileArtifact {
    pub fn new(path: impl Into<PathBuf>, format: FormatTag) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    /// Build an artifact whose format is inferred from its path
    pub fn classified(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = classify(&path);
        Self { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FormatTag {
        self.format
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

/// Unified weighted call graph in Graphviz dot form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphDescription {
    path: PathBuf,
}

impl GraphDescription {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Final image produced from a graph description (or emitted directly)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedGraph {
    path: PathBuf,
}

impl RenderedGraph {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }

    /// True when the image is an SVG the viewer can embed directly
    pub fn is_svg(&self) -> bool {
        self.path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("svg"))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classified_artifact() {
        let artifact = ProfileArtifact::classified("results/valgrind_callgrind.txt");
        assert_eq!(artifact.format(), FormatTag::AnnotatedText);
        assert_eq!(artifact.path(), Path::new("results/valgrind_callgrind.txt"));
        assert!(!artifact.exists());
    }

    #[test]
    fn test_rendered_graph_is_svg() {
        assert!(RenderedGraph::new("a/profile_graph.svg").is_svg());
        assert!(RenderedGraph::new("a/profile_graph.SVG").is_svg());
        assert!(!RenderedGraph::new("a/profile_graph.png").is_svg());
    }
}
