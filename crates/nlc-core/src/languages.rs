//! Target-language registry.
//!
//! Each supported language maps to a [`LanguageSpec`] strategy bundle that
//! carries its prompt phrasing rules, artifact header, and validator. Adding
//! a language means adding one impl and one registry entry; the shared
//! control flow in `prompt` and `validate` never branches on language names.

use std::path::{Path, PathBuf};

use crate::validate::{CompileContext, ValidationResult};

/// A target language the generator can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    Java,
}

/// Raised when a language identifier is not in the registry.
#[derive(Debug, thiserror::Error)]
#[error("unsupported language: '{0}'. Supported: python, java")]
pub struct UnsupportedLanguageError(pub String);

impl Language {
    /// Look up a language by identifier (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "python" | "py" => Some(Self::Python),
            "java" => Some(Self::Java),
            _ => None,
        }
    }

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Java => "java",
        }
    }

    /// All registered languages.
    pub fn all() -> &'static [Self] {
        &[Self::Python, Self::Java]
    }

    /// The strategy bundle for this language.
    pub fn spec(self) -> &'static dyn LanguageSpec {
        match self {
            Self::Python => &PythonSpec,
            Self::Java => &JavaSpec,
        }
    }
}

impl std::str::FromStr for Language {
    type Err = UnsupportedLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnsupportedLanguageError(s.to_string()))
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether the generated target is importable code or a standalone program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TargetKind {
    #[default]
    Library,
    Binary,
}

impl TargetKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "library" => Some(Self::Library),
            "binary" => Some(Self::Binary),
            _ => None,
        }
    }
}

impl std::str::FromStr for TargetKind {
    type Err = UnsupportedTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnsupportedTargetError(s.to_string()))
    }
}

/// Raised when a target type is neither `library` nor `binary`.
#[derive(Debug, thiserror::Error)]
#[error("unsupported target type: '{0}'. Supported: library, binary")]
pub struct UnsupportedTargetError(pub String);

/// Per-language strategy bundle: prompt phrasing rules plus validator.
pub trait LanguageSpec: Sync {
    /// Opening line of the system prompt.
    fn intro(&self) -> &'static str;

    /// Preamble for the dependency-snippets section.
    fn dependency_preamble(&self) -> &'static str;

    /// Requirements section, including resource, entry-point, and naming
    /// sub-instructions where the language demands them.
    fn requirements(
        &self,
        resources: &[PathBuf],
        target: TargetKind,
        output_name: &str,
        package: &str,
    ) -> String;

    /// Header comment prepended to the output artifact, if any.
    fn artifact_header(&self, package: &str) -> Option<String>;

    /// Structural validation of generated code. Failures are returned as
    /// data, never as errors.
    fn validate(&self, code: &str, compile: Option<&CompileContext<'_>>) -> ValidationResult;
}

// ---------------------------------------------------------------------------
// Python
// ---------------------------------------------------------------------------

pub(crate) struct PythonSpec;

impl LanguageSpec for PythonSpec {
    fn intro(&self) -> &'static str {
        "You are a helpful assistant that translates English descriptions into Python code."
    }

    fn dependency_preamble(&self) -> &'static str {
        "\n\nThe following Python code snippets are dependencies that can be used in the \
         generated implementation.\nDO NOT DUPLICATE THE CODE IN THESE DEPENDENCIES.\n\
         Ensure the generated code correctly interacts with them via import statements \
         if necessary:\n\n"
    }

    fn requirements(
        &self,
        resources: &[PathBuf],
        target: TargetKind,
        _output_name: &str,
        _package: &str,
    ) -> String {
        let mut resource_instruction = String::new();
        if !resources.is_empty() {
            resource_instruction.push_str(
                "\nCRITICAL: When accessing resource files, you should read them using \
                 appropriate file handling methods.\nThe following resource files are \
                 available:\n\n",
            );
            for resource in resources {
                resource_instruction.push_str(&format!("- {}\n", resource.display()));
            }
        }

        let binary_instruction = if target == TargetKind::Binary {
            "\nCRITICAL: You MUST create an executable Python program with a \
             `if __name__ == \"__main__\":` block.\n"
        } else {
            ""
        };

        format!(
            "\nRequirements for the generated code:\n\
             1. Add proper type hints to all functions and variables\n\
             2. Use Python 3.10+ syntax (e.g., use `list[str]` instead of `List[str]`)\n\
             3. Use union syntax in Python types (e.g., `str | None` instead of `Optional[str]`)\n\
             4. Include docstrings for all functions and classes\n\
             5. Add appropriate error handling\n\
             6. Ensure the code is well-structured and follows best practices\
             {resource_instruction}{binary_instruction}\n\
             Generate Python code for the natural language description the user will provide.\n"
        )
    }

    fn artifact_header(&self, package: &str) -> Option<String> {
        Some(format!(
            "# Usage: Import from this package using the following:\n\
             # from {package} import <name to import>\n\n"
        ))
    }

    fn validate(&self, code: &str, _compile: Option<&CompileContext<'_>>) -> ValidationResult {
        crate::validate::python_syntax(code)
    }
}

// ---------------------------------------------------------------------------
// Java
// ---------------------------------------------------------------------------

pub(crate) struct JavaSpec;

impl LanguageSpec for JavaSpec {
    fn intro(&self) -> &'static str {
        "You are a helpful assistant that translates English descriptions into Java code."
    }

    fn dependency_preamble(&self) -> &'static str {
        "\n\nThe following Java code snippets are dependencies that can be used in the \
         generated implementation.\nDO NOT DUPLICATE THE CODE IN THESE DEPENDENCIES.\n\
         Ensure the generated code correctly interacts with them via import statements \
         if necessary:\n\n"
    }

    fn requirements(
        &self,
        resources: &[PathBuf],
        target: TargetKind,
        output_name: &str,
        package: &str,
    ) -> String {
        let class_instruction = format!(
            "\nCRITICAL: You MUST name the primary public class '{output_name}' to match \
             the output file name.\nThis is a strict Java requirement when the class is \
             defined in a file named '{output_name}.java'.\n"
        );

        let package_instruction = format!(
            "\nCRITICAL: The Java code MUST start with 'package {package};' as the first \
             line of the file (after any comments).\nThis package declaration is required \
             by the Java compiler and must exactly match the build system path.\n"
        );

        let mut resource_instruction = String::new();
        if !resources.is_empty() {
            resource_instruction.push_str(
                "\nCRITICAL: When accessing resource files, you MUST use the following \
                 method to load each resource as an InputStream:\n\n",
            );
            for resource in resources {
                resource_instruction.push_str(&format!(
                    "For resource '{path}', use:\n\
                     InputStream is = {output_name}.class.getResourceAsStream(\"/{path}\");\n\n",
                    path = resource.display()
                ));
            }
        }

        let binary_instruction = if target == TargetKind::Binary {
            format!(
                "\nCRITICAL: This is a Java executable. Your code MUST include a \
                 `public static void main(String[] args)` method in the {output_name} class.\n\
                 The main method should serve as the entry point for the program and provide \
                 complete functionality for a standalone application.\n"
            )
        } else {
            String::new()
        };

        format!(
            "\nRequirements for the generated code:\n\
             1. Use Java 8 features when appropriate\n\
             2. Include proper exception handling\n\
             3. Add JavaDoc comments for all classes, methods, and fields\n\
             4. Follow Java naming conventions (camelCase for variables/methods, \
             PascalCase for classes){class_instruction}{package_instruction}\
             5. Ensure imports come after the package declaration\n\
             6. Ensure the code is well-structured and follows best practices\
             {resource_instruction}{binary_instruction}\n\
             Generate Java code for the natural language description the user will provide.\n"
        )
    }

    // Java artifacts carry their own package declaration; no header.
    fn artifact_header(&self, _package: &str) -> Option<String> {
        None
    }

    fn validate(&self, code: &str, compile: Option<&CompileContext<'_>>) -> ValidationResult {
        crate::validate::java_structure_and_compile(code, compile)
    }
}

/// Base name of the output file without extension, used for class naming.
pub fn output_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}
