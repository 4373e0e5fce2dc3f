use profgraph::classify::{classify, FormatTag, ProfileArtifact, FORMAT_RULES};

#[test]
fn test_callgrind_text_wins_wherever_it_appears() {
    let paths = [
        "valgrind_callgrind.txt",
        "out/valgrind_callgrind.txt",
        "nightly_callgrind.txt.bak",
        "deep/a.json/b_callgrind.txt",
        "x_script.txt_callgrind.txt",
    ];

    for path in paths {
        assert_eq!(classify(path), FormatTag::AnnotatedText, "{}", path);
    }
}

#[test]
fn test_classification_is_deterministic() {
    let paths = [
        "python_profile.pstats",
        "run.prof",
        "python_profile_pyinstrument.json",
        "perf_profile_script.txt",
        "austin_austin.txt",
        "c_profile_flame.svg",
        "callgrind.out.12345",
        "mystery",
    ];

    for path in paths {
        assert_eq!(classify(path), classify(path));
    }
}

#[test]
fn test_pipeline_artifact_names_classify_as_produced() {
    assert_eq!(classify("results/python_profile.pstats"), FormatTag::CountsTable);
    assert_eq!(
        classify("results/python_profile_pyinstrument.json"),
        FormatTag::TraceJson
    );
    assert_eq!(classify("results/perf_profile_script.txt"), FormatTag::PerfText);
    assert_eq!(classify("results/valgrind_callgrind.txt"), FormatTag::AnnotatedText);
    assert_eq!(classify("results/c_profile_flame.svg"), FormatTag::FlamegraphSvg);
}

#[test]
fn test_markers_in_directory_names_are_ignored() {
    assert_eq!(
        classify(".profiling/python_profile_pyinstrument.json"),
        FormatTag::TraceJson
    );
    assert_eq!(
        classify("results.json/perf_profile_script.txt"),
        FormatTag::PerfText
    );
    assert_eq!(classify("flame.svg/callgrind.out.1"), FormatTag::AnnotatedText);
    assert_eq!(classify("traces.json/raw"), FormatTag::CountsTable);
}

#[test]
fn test_marker_anywhere_in_file_name_counts() {
    // Matching is on the file name text, not just the extension
    assert_eq!(classify("out/traces.json.gz"), FormatTag::TraceJson);
    assert_eq!(classify("austin_austin.txt"), FormatTag::SampledStacks);
}

#[test]
fn test_rule_table_puts_specific_markers_first() {
    let position = |marker: &str| FORMAT_RULES.iter().position(|(m, _)| *m == marker).unwrap();

    assert!(position("_callgrind.txt") < position(".txt"));
    assert!(position("_script.txt") < position(".txt"));
    assert!(position("_austin.txt") < position(".txt"));
    assert!(position("_flame.svg") < position(".svg"));
}

#[test]
fn test_artifact_exists_tracks_disk() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("python_profile.pstats");

    let artifact = ProfileArtifact::classified(&path);
    assert_eq!(artifact.format(), FormatTag::CountsTable);
    assert!(!artifact.exists());

    std::fs::write(&path, "data").unwrap();
    assert!(artifact.exists());
}
