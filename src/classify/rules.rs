//! Ordered rule table mapping file name markers to profile formats.
//!
//! Classification is first-match-wins over [`FORMAT_RULES`]. Specific
//! markers (`_callgrind.txt`) sit above the generic extensions (`.txt`)
//! they contain, so rule order rather than match length decides.
//! Only the final path component is matched, so directory names never
//! influence the result.

use std::fmt;
use std::path::Path;

/// Profile data format held by a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTag {
    /// Function call counts and times (cProfile pstats)
    CountsTable,
    /// JSON trace (pyinstrument renderer output)
    TraceJson,
    /// callgrind_annotate text or raw callgrind output
    AnnotatedText,
    /// `perf script` text
    PerfText,
    /// Austin collapsed sample text
    SampledStacks,
    /// Already-rendered flamegraph image
    FlamegraphSvg,
}

impl FormatTag {
    /// Format name understood by the converter's `-f` flag
    ///
    /// Returns `None` for formats that are already renderable images.
    pub fn converter_format(self) -> Option<&'static str> {
        match self {
            FormatTag::CountsTable => Some("pstats"),
            FormatTag::TraceJson => Some("json"),
            FormatTag::AnnotatedText => Some("callgrind"),
            FormatTag::PerfText => Some("perf"),
            FormatTag::SampledStacks => Some("austin"),
            FormatTag::FlamegraphSvg => None,
        }
    }

    /// Whether the converter can read this format from standard input
    ///
    /// pstats files are binary and must be passed by name.
    pub fn reads_stdin(self) -> bool {
        !matches!(self, FormatTag::CountsTable | FormatTag::FlamegraphSvg)
    }

    /// True when the artifact needs no normalization or rendering
    pub fn is_rendered(self) -> bool {
        self.converter_format().is_none()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FormatTag::CountsTable => "counts-table",
            FormatTag::TraceJson => "trace-json",
            FormatTag::AnnotatedText => "annotated-text",
            FormatTag::PerfText => "perf-text",
            FormatTag::SampledStacks => "sampled-stacks",
            FormatTag::FlamegraphSvg => "flamegraph-svg",
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format assumed when no rule matches
pub const DEFAULT_FORMAT: FormatTag = FormatTag::CountsTable;

/// `(marker, tag)` pairs, most specific first
pub const FORMAT_RULES: &[(&str, FormatTag)] = &[
    ("_callgrind.txt", FormatTag::AnnotatedText),
    ("callgrind.out", FormatTag::AnnotatedText),
    ("_austin.txt", FormatTag::SampledStacks),
    ("_script.txt", FormatTag::PerfText),
    ("_flame.svg", FormatTag::FlamegraphSvg),
    (".pstats", FormatTag::CountsTable),
    (".prof", FormatTag::CountsTable),
    (".json", FormatTag::TraceJson),
    (".perf", FormatTag::PerfText),
    (".svg", FormatTag::FlamegraphSvg),
    (".txt", FormatTag::PerfText),
];

/// Infer the profile format of `path`
///
/// **Public** - main entry point for classification
///
/// The path does not need to exist; only its file name is inspected.
pub fn classify(path: impl AsRef<Path>) -> FormatTag {
    classify_with(path, FORMAT_RULES)
}

/// Classify against a caller-supplied rule table
pub fn classify_with(path: impl AsRef<Path>, rules: &[(&str, FormatTag)]) -> FormatTag {
    let name = path
        .as_ref()
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();

    rules
        .iter()
        .find(|(marker, _)| name.contains(marker))
        .map(|&(_, tag)| tag)
        .unwrap_or(DEFAULT_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_suffixes() {
        assert_eq!(classify("out/python_profile.pstats"), FormatTag::CountsTable);
        assert_eq!(classify("out/run_pyinstrument.json"), FormatTag::TraceJson);
        assert_eq!(classify("out/perf_profile_script.txt"), FormatTag::PerfText);
        assert_eq!(classify("out/perf_profile.perf"), FormatTag::PerfText);
        assert_eq!(classify("out/c_profile_flame.svg"), FormatTag::FlamegraphSvg);
        assert_eq!(classify("out/callgrind.out.valgrind"), FormatTag::AnnotatedText);
    }

    #[test]
    fn test_specific_marker_beats_generic_extension() {
        assert_eq!(classify("valgrind_callgrind.txt"), FormatTag::AnnotatedText);
        assert_eq!(classify("notes.txt"), FormatTag::PerfText);
    }

    #[test]
    fn test_rule_order_not_longest_match() {
        let rules = [(".txt", FormatTag::PerfText), ("_callgrind.txt", FormatTag::AnnotatedText)];
        assert_eq!(classify_with("a_callgrind.txt", &rules), FormatTag::PerfText);
    }

    #[test]
    fn test_directory_names_are_ignored() {
        assert_eq!(
            classify(".profiling/python_profile_pyinstrument.json"),
            FormatTag::TraceJson
        );
        assert_eq!(classify("/home/u/.profile/perf_profile_script.txt"), FormatTag::PerfText);
        assert_eq!(classify("traces.json/raw"), FormatTag::CountsTable);
    }

    #[test]
    fn test_austin_output() {
        assert_eq!(classify("out/austin_austin.txt"), FormatTag::SampledStacks);
        assert_eq!(FormatTag::SampledStacks.converter_format(), Some("austin"));
        assert!(FormatTag::SampledStacks.reads_stdin());
    }

    #[test]
    fn test_unknown_falls_back_to_default() {
        assert_eq!(classify("profile.bin"), FormatTag::CountsTable);
        assert_eq!(classify(""), FormatTag::CountsTable);
    }

    #[test]
    fn test_converter_formats() {
        assert_eq!(FormatTag::CountsTable.converter_format(), Some("pstats"));
        assert_eq!(FormatTag::AnnotatedText.converter_format(), Some("callgrind"));
        assert!(FormatTag::FlamegraphSvg.is_rendered());
        assert!(!FormatTag::PerfText.is_rendered());
    }
}
