#![cfg(unix)]

use profgraph::invoke::{invoke, probe, Invocation, SystemRunner};
use profgraph::utils::error::ToolError;

#[test]
fn test_successful_process() {
    assert!(invoke(&Invocation::new("true")).is_ok());
}

#[test]
fn test_exit_code_is_reported() {
    let err = invoke(&Invocation::new("sh").args(["-c", "exit 3"])).unwrap_err();

    match err {
        ToolError::NonZeroExit { program, code } => {
            assert_eq!(program, "sh");
            assert_eq!(code, Some(3));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_missing_program_is_not_found() {
    let err = invoke(&Invocation::new("profgraph-no-such-tool")).unwrap_err();
    assert!(matches!(err, ToolError::NotFound { .. }));
}

#[test]
fn test_stdin_and_stdout_redirection() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = temp_dir.path().join("perf_profile_script.txt");
    let output = temp_dir.path().join("copy.txt");
    std::fs::write(&input, "main;work 42\n").unwrap();

    invoke(&Invocation::new("cat").stdin_from(&input).stdout_to(&output)).unwrap();

    assert_eq!(std::fs::read_to_string(&output).unwrap(), "main;work 42\n");
}

#[test]
fn test_stdout_sink_is_released_after_failure() {
    let temp_dir = tempfile::tempdir().unwrap();
    let output = temp_dir.path().join("partial.txt");

    let result = invoke(
        &Invocation::new("sh")
            .args(["-c", "echo partial; exit 1"])
            .stdout_to(&output),
    );

    assert!(result.is_err());
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "partial\n");
    std::fs::remove_file(&output).unwrap();
}

#[test]
fn test_missing_stdin_file_is_io_error() {
    let temp_dir = tempfile::tempdir().unwrap();

    let invocation = Invocation::new("cat").stdin_from(temp_dir.path().join("absent"));
    let err = invoke(&invocation).unwrap_err();
    assert!(matches!(err, ToolError::Io { .. }));
}

#[test]
fn test_probe() {
    assert!(probe(&SystemRunner, &Invocation::new("sh").args(["-c", "echo noisy"])));
    assert!(!probe(&SystemRunner, &Invocation::new("sh").args(["-c", "exit 1"])));
    assert!(!probe(&SystemRunner, &Invocation::new("profgraph-no-such-tool")));
}
