//! Single-shot usage-description generation.
//!
//! Given a source file, asks the model for a concise usage guide aimed at LLM
//! consumers of that file, then formats it as a javadoc comment with the raw
//! header appended. No validation or retry: there is no machine-checkable
//! correctness criterion for prose.

use tracing::debug;

use crate::provider::{GenerationRequest, LlmProvider, ProviderError, TokenUsage};
use crate::schema::UsageDescription;

/// User-turn content for a describe call. The source code itself travels in
/// the system prompt.
pub const DESCRIBE_TASK: &str =
    "Generate a usage description for the provided source code.";

/// Build the system prompt for a usage-description request.
pub fn describe_system_prompt(source_code: &str) -> String {
    format!(
        "You are a helpful assistant that generates clear, concise usage descriptions for source code.\n\
         \n\
         Write a concise but effective usage guide for the following given Java file in 300 words or less for consumption by an LLM (not a human).\n\
         Start by very briefly describing the purpose and intention of this class.\n\
         \n\
         CRITICAL: Only describe the PUBLIC interface of this class, do not describe any internal details unless they're absolutely essential for correct usage..\n\
         CRITICAL: Clarify the semantic interpretation of any primitive arguments to public methods. The LLM should be able to understand what to pass in there, and WON'T HAVE ACCESS TO parameter names when they are given this code.\n\
         \n\
         \n\
         Here is the source code to describe:\n\
         \n\
         ```\n\
         {source_code}\n\
         ```\n"
    )
}

/// Wrap a description in a javadoc comment and append the raw header.
///
/// Embedded `*/` sequences are defanged so the comment cannot terminate
/// early.
pub fn format_usage_comment(description: &str, raw_header: &str) -> String {
    let body = description.replace('\n', "\n* ").replace("*/", "* /");
    format!("/**\n* {body}\n*/\n{raw_header}")
}

/// Outcome of a describe call.
#[derive(Debug, Clone)]
pub struct DescribeReport {
    /// Javadoc comment followed by the raw header.
    pub formatted: String,
    pub usage: TokenUsage,
}

/// Generate a usage description for `source_code` in a single provider call.
pub async fn generate_description(
    provider: &dyn LlmProvider,
    source_code: &str,
    raw_header: &str,
    model: &str,
    temperature: f32,
    max_output_tokens: u32,
) -> Result<DescribeReport, ProviderError> {
    let request = GenerationRequest {
        system_prompt: describe_system_prompt(source_code),
        task_description: DESCRIBE_TASK.to_string(),
        model: model.to_string(),
        temperature,
        max_output_tokens,
    };

    let response = provider
        .generate_structured(&request, &UsageDescription::response_schema())
        .await?;

    let parsed: UsageDescription =
        serde_json::from_value(response.payload).map_err(|e| ProviderError::Parse {
            message: format!("structured payload did not match the expected shape: {e}"),
            usage: response.usage,
        })?;
    debug!("describe reasoning: {}", parsed.reasoning);

    Ok(DescribeReport {
        formatted: format_usage_comment(&parsed.usage_description, raw_header),
        usage: response.usage,
    })
}
