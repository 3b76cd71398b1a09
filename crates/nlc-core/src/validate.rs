//! Structural validation of generated code.
//!
//! Validation failures are expected and returned as data; they drive the
//! feedback-and-retry path rather than propagating as errors. Python gets a
//! syntax-only tree-sitter parse; Java gets a cheap structural pre-check and,
//! when a [`CompileContext`] is supplied, a full `javac` compile with the
//! dependency jars on the classpath.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::error;

use crate::languages::Language;

/// Verdict from validating one generated candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Human- and LLM-readable diagnostic; present iff `is_valid` is false.
    pub error_message: Option<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error_message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error_message: Some(message.into()),
        }
    }
}

/// Context for compiled-language validation: where the candidate was written
/// and which dependency artifacts belong on the compiler's resolution path.
#[derive(Debug, Clone)]
pub struct CompileContext<'a> {
    pub output_path: &'a Path,
    pub dep_jars: &'a [PathBuf],
}

/// Validate generated code for a target language.
///
/// The empty-code check is language-independent and runs first. Without a
/// compile context, compiled languages degrade to the structural pre-check
/// only; that weaker guarantee is deliberate for contexts where compilation
/// is not possible.
pub fn validate(
    code: &str,
    language: Language,
    compile: Option<&CompileContext<'_>>,
) -> ValidationResult {
    if code.trim().is_empty() {
        return ValidationResult::invalid("Generated code is empty.");
    }
    language.spec().validate(code, compile)
}

// ---------------------------------------------------------------------------
// Python: syntax-only parse, no execution
// ---------------------------------------------------------------------------

pub(crate) fn python_syntax(code: &str) -> ValidationResult {
    let mut parser = tree_sitter::Parser::new();
    if parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .is_err()
    {
        return ValidationResult::invalid("Python syntax error: grammar failed to load.");
    }
    let Some(tree) = parser.parse(code, None) else {
        return ValidationResult::invalid("Python syntax error: parser produced no tree.");
    };

    let root = tree.root_node();
    if !root.has_error() {
        return ValidationResult::valid();
    }

    let message = first_error_node(root)
        .map(|node| describe_error_node(node, code))
        .unwrap_or_else(|| "invalid syntax".to_string());
    ValidationResult::invalid(format!("Python syntax error: {message}"))
}

/// Depth-first search for the first ERROR or MISSING node, pruning subtrees
/// that tree-sitter marks error-free.
fn first_error_node(node: tree_sitter::Node<'_>) -> Option<tree_sitter::Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error_node(child) {
            return Some(found);
        }
    }
    None
}

fn describe_error_node(node: tree_sitter::Node<'_>, source: &str) -> String {
    let pos = node.start_position();
    let line_text = source.lines().nth(pos.row).unwrap_or("").trim_end();
    if node.is_missing() {
        format!(
            "missing {} at line {}, column {}: {}",
            node.kind(),
            pos.row + 1,
            pos.column + 1,
            line_text
        )
    } else {
        format!(
            "invalid syntax at line {}, column {}: {}",
            pos.row + 1,
            pos.column + 1,
            line_text
        )
    }
}

// ---------------------------------------------------------------------------
// Java: structural pre-check, then external compiler
// ---------------------------------------------------------------------------

const JAVA_STRUCTURE_DIAGNOSTIC: &str =
    "Java code must contain at least one class, interface, or enum.";

pub(crate) fn java_structure_and_compile(
    code: &str,
    compile: Option<&CompileContext<'_>>,
) -> ValidationResult {
    // Cheap pre-check before the expensive compile path.
    let has_type_decl =
        code.contains("class ") || code.contains("interface ") || code.contains("enum ");
    if !has_type_decl {
        return ValidationResult::invalid(JAVA_STRUCTURE_DIAGNOSTIC);
    }

    let Some(ctx) = compile else {
        return ValidationResult::valid();
    };

    let mut cmd = Command::new("javac");
    cmd.arg(ctx.output_path);
    if !ctx.dep_jars.is_empty() {
        cmd.arg("-classpath").arg(join_classpath(ctx.dep_jars));
    }

    let output = match cmd.output() {
        Ok(output) => output,
        Err(e) => {
            let message = format!("Error during Java compilation: {e}");
            error!("{message}");
            return ValidationResult::invalid(message);
        }
    };

    if output.status.success() {
        return ValidationResult::valid();
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let mut message = String::from("Java compilation failed:\n");
    if !stdout.is_empty() {
        message.push_str(&format!("Compiler stdout: {stdout}\n"));
    }
    if !stderr.is_empty() {
        message.push_str(&format!("Compiler stderr: {stderr}"));
    }

    error!(
        "Java compilation failed with exit code {:?} for {}",
        output.status.code(),
        ctx.output_path.display()
    );

    ValidationResult::invalid(message)
}

/// Join dependency artifacts with the platform's classpath separator.
fn join_classpath(jars: &[PathBuf]) -> String {
    let separator = if cfg!(windows) { ";" } else { ":" };
    jars.iter()
        .map(|jar| jar.display().to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_code_is_invalid_for_every_language() {
        for &language in Language::all() {
            for code in ["", "   \n\t  "] {
                let result = validate(code, language, None);
                assert!(!result.is_valid);
                assert_eq!(
                    result.error_message.as_deref(),
                    Some("Generated code is empty.")
                );
            }
        }
    }

    #[test]
    fn valid_python_passes() {
        let code = "def add(a: int, b: int) -> int:\n    \"\"\"Add two integers.\"\"\"\n    return a + b\n";
        let result = validate(code, Language::Python, None);
        assert!(result.is_valid, "{:?}", result.error_message);
    }

    #[test]
    fn invalid_python_reports_a_diagnostic() {
        let code = "def add(a, b:\n    return a + b\n";
        let result = validate(code, Language::Python, None);
        assert!(!result.is_valid);
        let message = result.error_message.unwrap();
        assert!(message.starts_with("Python syntax error:"));
        assert!(message.contains("line"));
    }

    #[test]
    fn python_unbalanced_brackets_fail() {
        let result = validate("x = [1, 2,\n", Language::Python, None);
        assert!(!result.is_valid);
        assert!(!result.error_message.unwrap().is_empty());
    }

    #[test]
    fn java_without_type_declaration_fails_fast() {
        let result = validate("int x = 3;", Language::Java, None);
        assert!(!result.is_valid);
        assert_eq!(
            result.error_message.as_deref(),
            Some(JAVA_STRUCTURE_DIAGNOSTIC)
        );
    }

    #[test]
    fn java_structural_check_alone_passes_without_compile_context() {
        let code = "public class Widget { }";
        let result = validate(code, Language::Java, None);
        assert!(result.is_valid);
    }

    #[test]
    fn classpath_joins_with_platform_separator() {
        let jars = vec![PathBuf::from("a.jar"), PathBuf::from("b.jar")];
        let joined = join_classpath(&jars);
        if cfg!(windows) {
            assert_eq!(joined, "a.jar;b.jar");
        } else {
            assert_eq!(joined, "a.jar:b.jar");
        }
    }

    fn javac_available() -> bool {
        Command::new("javac").arg("-version").output().is_ok()
    }

    #[test]
    fn java_compile_reports_compiler_diagnostics() {
        if !javac_available() {
            eprintln!("javac not installed; skipping compile test");
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Broken.java");
        let code = "public class Broken { void f() { int x = } }";
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(code.as_bytes()).unwrap();

        let ctx = CompileContext {
            output_path: &path,
            dep_jars: &[],
        };
        let result = validate(code, Language::Java, Some(&ctx));
        assert!(!result.is_valid);
        assert!(
            result
                .error_message
                .unwrap()
                .starts_with("Java compilation failed:")
        );
    }
}
