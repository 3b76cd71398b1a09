//! System-prompt assembly.
//!
//! [`build_system_prompt`] is a pure function of its inputs: identical inputs
//! yield byte-identical prompts. Sections are concatenated in a fixed order:
//! intro → dependencies → documentation → resources → requirements.

use std::path::PathBuf;

use crate::languages::{Language, TargetKind};

/// Everything the prompt builder needs for one generation session.
///
/// Dependency and documentation entries are ordered name/content pairs so
/// the assembled prompt is deterministic.
#[derive(Debug, Clone, Default)]
pub struct PromptInputs {
    pub dependencies: Vec<(String, String)>,
    pub docs: Vec<(String, String)>,
    pub resources: Vec<PathBuf>,
    pub target: TargetKind,
    /// Base name of the output file without extension (Java class naming).
    pub output_name: String,
    /// Package or namespace qualifier for importing the generated file.
    pub package: String,
}

/// Assemble the system prompt for a generation session.
pub fn build_system_prompt(language: Language, inputs: &PromptInputs) -> String {
    let spec = language.spec();
    let mut prompt = String::from(spec.intro());

    if !inputs.dependencies.is_empty() {
        prompt.push_str(spec.dependency_preamble());
        for (name, content) in &inputs.dependencies {
            prompt.push_str(&format!("# Dependency: {name}\n{content}\n---\n"));
        }
    }

    if !inputs.docs.is_empty() {
        prompt.push_str(
            "\n\nThe following is collected documentation that should be referenced in \
             planning the approach. This\ndocumentation includes necessary information \
             for correct implementation:\n\n",
        );
        for (name, content) in &inputs.docs {
            prompt.push_str(&format!("# Documentation: {name}\n{content}\n---\n"));
        }
    }

    if !inputs.resources.is_empty() {
        prompt.push_str("\n\nThe following resource files will be available to the generated program:\n\n");
        for resource in &inputs.resources {
            let name = resource
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            prompt.push_str(&format!("# Resource file: {name}\n"));
        }
    }

    prompt.push_str(&spec.requirements(
        &inputs.resources,
        inputs.target,
        &inputs.output_name,
        &inputs.package,
    ));

    prompt
}

/// Corrective feedback appended to the system prompt after a failed attempt.
///
/// Carries the validator's diagnostic and the full failed candidate so the
/// model returns a complete corrected implementation, not a diff.
pub fn feedback_block(error_message: &str, failed_code: &str) -> String {
    format!(
        "\n\nIMPORTANT: Your previous attempt at generating code failed validation with \
         the following error:\n\n{error_message}\n\nHere is your previous code that needs \
         to be fixed:\n\n```\n{failed_code}\n```\n\nPlease fix the issues and provide a \
         COMPLETE implementation of the code, not just the changes.\nMake sure your code \
         handles the errors mentioned above.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_inputs() -> PromptInputs {
        PromptInputs {
            output_name: "Widget".to_string(),
            package: "tools.widgets".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn builder_is_deterministic() {
        let mut inputs = base_inputs();
        inputs.dependencies = vec![("helpers.py".to_string(), "def f(): ...".to_string())];
        inputs.docs = vec![("api.md".to_string(), "call f first".to_string())];
        inputs.resources = vec![PathBuf::from("data/table.csv")];

        let a = build_system_prompt(Language::Python, &inputs);
        let b = build_system_prompt(Language::Python, &inputs);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_optional_sections_are_omitted() {
        let prompt = build_system_prompt(Language::Python, &base_inputs());
        assert!(prompt.starts_with("You are a helpful assistant"));
        assert!(!prompt.contains("# Dependency:"));
        assert!(!prompt.contains("# Documentation:"));
        assert!(!prompt.contains("# Resource file:"));
        assert!(prompt.contains("Requirements for the generated code"));
    }

    #[test]
    fn dependency_section_forbids_duplication() {
        let mut inputs = base_inputs();
        inputs.dependencies = vec![(
            "math_utils.py".to_string(),
            "def add(a, b): return a + b".to_string(),
        )];
        let prompt = build_system_prompt(Language::Python, &inputs);
        assert!(prompt.contains("DO NOT DUPLICATE THE CODE IN THESE DEPENDENCIES"));
        assert!(prompt.contains("# Dependency: math_utils.py"));
        assert!(prompt.contains("def add(a, b): return a + b"));
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let mut inputs = base_inputs();
        inputs.dependencies = vec![("d".to_string(), "dep-code".to_string())];
        inputs.docs = vec![("m".to_string(), "doc-text".to_string())];
        inputs.resources = vec![PathBuf::from("r.txt")];
        let prompt = build_system_prompt(Language::Java, &inputs);

        let dep = prompt.find("# Dependency:").unwrap();
        let doc = prompt.find("# Documentation:").unwrap();
        let res = prompt.find("# Resource file:").unwrap();
        let req = prompt.find("Requirements for the generated code").unwrap();
        assert!(dep < doc && doc < res && res < req);
    }

    #[test]
    fn binary_target_requires_entry_point() {
        let mut inputs = base_inputs();
        inputs.target = TargetKind::Binary;
        let py = build_system_prompt(Language::Python, &inputs);
        assert!(py.contains("if __name__ == \"__main__\":"));

        let java = build_system_prompt(Language::Java, &inputs);
        assert!(java.contains("public static void main(String[] args)"));
    }

    #[test]
    fn java_prompt_pins_class_name_and_package() {
        let prompt = build_system_prompt(Language::Java, &base_inputs());
        assert!(prompt.contains("name the primary public class 'Widget'"));
        assert!(prompt.contains("package tools.widgets;"));
    }

    #[test]
    fn java_resources_use_class_relative_streams() {
        let mut inputs = base_inputs();
        inputs.resources = vec![PathBuf::from("conf/settings.properties")];
        let prompt = build_system_prompt(Language::Java, &inputs);
        assert!(
            prompt.contains("Widget.class.getResourceAsStream(\"/conf/settings.properties\")")
        );
    }

    #[test]
    fn python_resources_are_listed_by_path() {
        let mut inputs = base_inputs();
        inputs.resources = vec![PathBuf::from("conf/settings.toml")];
        let prompt = build_system_prompt(Language::Python, &inputs);
        assert!(prompt.contains("- conf/settings.toml"));
        // Section listing uses the base name only.
        assert!(prompt.contains("# Resource file: settings.toml"));
    }

    #[test]
    fn feedback_carries_error_and_code_verbatim() {
        let block = feedback_block("line 3: unexpected indent", "def broken(:\n  pass");
        assert!(block.contains("line 3: unexpected indent"));
        assert!(block.contains("def broken(:\n  pass"));
        assert!(block.contains("COMPLETE implementation"));
    }
}
