//! Output artifact writing.
//!
//! The candidate is persisted before validation on every attempt so compiled
//! languages always have a real file to compile, and so the artifact reflects
//! the latest attempt for external inspection.

use std::io::Write;
use std::path::Path;

use crate::languages::Language;

/// Write generated code to its output location, prefixed with the language's
/// import header when it has one.
pub fn write_artifact(
    path: &Path,
    language: Language,
    package: &str,
    code: &str,
) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::File::create(path)?;
    if let Some(header) = language.spec().artifact_header(package) {
        file.write_all(header.as_bytes())?;
    }
    file.write_all(code.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn python_artifact_carries_import_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adder.py");
        write_artifact(&path, Language::Python, "tools.adder", "def add(a, b):\n    return a + b\n")
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Usage: Import from this package using the following:\n"));
        assert!(written.contains("# from tools.adder import <name to import>"));
        assert!(written.ends_with("def add(a, b):\n    return a + b\n"));
    }

    #[test]
    fn java_artifact_is_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Widget.java");
        let code = "package tools.widgets;\n\npublic class Widget { }\n";
        write_artifact(&path, Language::Java, "tools.widgets", code).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), code);
    }

    #[test]
    fn missing_parent_directories_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep/nested/out.py");
        write_artifact(&path, Language::Python, "pkg", "x = 1\n").unwrap();
        assert!(path.exists());
    }
}
