//! Integration tests for nlc-cli functionality.
//! Tests the underlying library functions that the CLI commands invoke.

use std::path::PathBuf;

use nlc_core::languages::{Language, TargetKind, output_stem};
use nlc_core::validate::CompileContext;
use nlc_core::{PromptInputs, build_system_prompt, validate, write_artifact};

#[test]
fn test_generate_prompt_from_on_disk_inputs() {
    let tmpdir = tempfile::tempdir().unwrap();
    let dep = tmpdir.path().join("math_utils.py");
    std::fs::write(&dep, "def add(a: int, b: int) -> int:\n    return a + b\n").unwrap();

    let inputs = PromptInputs {
        dependencies: vec![(
            dep.display().to_string(),
            std::fs::read_to_string(&dep).unwrap(),
        )],
        docs: vec![],
        resources: vec![],
        target: TargetKind::Library,
        output_name: "calculator".to_string(),
        package: "tools.calc".to_string(),
    };
    let prompt = build_system_prompt(Language::Python, &inputs);

    assert!(prompt.contains(&format!("# Dependency: {}", dep.display())));
    assert!(prompt.contains("def add(a: int, b: int)"));
}

#[test]
fn test_java_output_name_follows_output_file() {
    let output_file = PathBuf::from("/work/out/Calculator.java");
    let inputs = PromptInputs {
        output_name: output_stem(&output_file),
        package: "tools.calc".to_string(),
        ..Default::default()
    };
    let prompt = build_system_prompt(Language::Java, &inputs);
    assert!(prompt.contains("name the primary public class 'Calculator'"));
    assert!(prompt.contains("package tools.calc;"));
}

#[test]
fn test_artifact_then_validate_python() {
    let tmpdir = tempfile::tempdir().unwrap();
    let output = tmpdir.path().join("adder.py");
    let code = "def add(a: int, b: int) -> int:\n    return a + b\n";

    write_artifact(&output, Language::Python, "tools.adder", code).unwrap();
    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("# Usage: Import from this package"));

    let compile = CompileContext {
        output_path: &output,
        dep_jars: &[],
    };
    let verdict = validate(code, Language::Python, Some(&compile));
    assert!(verdict.is_valid);
}

#[test]
fn test_validate_rejects_broken_python_with_location() {
    let verdict = validate("def add(a, b:\n    return a + b\n", Language::Python, None);
    assert!(!verdict.is_valid);
    let message = verdict.error_message.unwrap();
    assert!(message.starts_with("Python syntax error:"));
}

#[test]
fn test_validate_java_without_compile_context_is_structural() {
    let verdict = validate("public class A {}", Language::Java, None);
    assert!(verdict.is_valid);

    let verdict = validate("int x = 1;", Language::Java, None);
    assert!(!verdict.is_valid);
    assert_eq!(
        verdict.error_message.unwrap(),
        "Java code must contain at least one class, interface, or enum."
    );
}
