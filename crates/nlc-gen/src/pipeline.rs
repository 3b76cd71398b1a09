//! Bounded retry–validate–feedback session.
//!
//! Orchestrates one generation task: prompt → provider call → artifact write
//! → validation, feeding each failure's diagnostic and candidate code back
//! into the next attempt's system prompt. The session makes at most
//! [`DEFAULT_MAX_ATTEMPTS`] provider calls: one initial attempt plus
//! `max_attempts - 1` feedback retries.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use nlc_core::languages::Language;
use nlc_core::validate::CompileContext;
use nlc_core::{feedback_block, validate, write_artifact};

use crate::provider::{GenerationRequest, LlmProvider, TokenUsage};
use crate::schema::GeneratedCode;

/// Total provider calls per session (initial attempt + feedback retries).
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Session-constant configuration for one generation task.
#[derive(Debug, Clone)]
pub struct SessionConfig<'a> {
    pub language: Language,
    pub output_path: &'a Path,
    /// Package or namespace qualifier, used for the artifact import header.
    pub package: &'a str,
    /// Dependency artifacts for compiled-language validation.
    pub dep_jars: &'a [PathBuf],
    pub max_attempts: usize,
}

/// Outcome of a successful session.
#[derive(Debug, Clone)]
pub struct SessionReport {
    /// The validated generated code (also persisted to the output path).
    pub code: String,
    /// Provider calls made, counting the successful one.
    pub attempts: usize,
    /// Usage of the final successful call.
    pub usage: TokenUsage,
    /// Usage accumulated across all attempts.
    pub total_usage: TokenUsage,
    pub finish_reason: Option<String>,
}

/// Terminal failures of a session. Validation failures never appear here
/// mid-session; they drive retries and only surface through `Exhausted`.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("generated code failed validation after {attempts} attempts. Last error: {last_error}")]
    Exhausted { attempts: usize, last_error: String },
    #[error("failed to write output artifact {path}: {source}")]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Run one bounded generation session.
///
/// `request.system_prompt` is the initial prompt; it accumulates feedback
/// blocks across attempts. The candidate is written to the output path before
/// validation on every attempt, so the artifact always reflects the latest
/// attempt even when the session ends exhausted.
pub async fn run_session(
    provider: &dyn LlmProvider,
    mut request: GenerationRequest,
    config: &SessionConfig<'_>,
) -> Result<SessionReport, PipelineError> {
    let schema = GeneratedCode::response_schema();
    let mut total_usage = TokenUsage::default();
    let mut last_error = String::from("no generation attempts were made");

    for attempt in 1..=config.max_attempts {
        let response = match provider.generate_structured(&request, &schema).await {
            Ok(response) => response,
            Err(e) => {
                // Filtered and malformed calls are still billed; fold their
                // usage in. No candidate code exists, so the next attempt
                // retries with the prompt unchanged.
                total_usage.add(e.usage());
                warn!(
                    "generation attempt {attempt}/{} failed: {e}",
                    config.max_attempts
                );
                last_error = e.to_string();
                continue;
            }
        };
        total_usage.add(response.usage);

        let parsed: GeneratedCode = match serde_json::from_value(response.payload) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(
                    "attempt {attempt}/{}: structured payload did not match the expected shape: {e}",
                    config.max_attempts
                );
                last_error = format!("structured payload did not match the expected shape: {e}");
                continue;
            }
        };
        debug!("attempt {attempt} reasoning: {}", parsed.reasoning);

        write_artifact(
            config.output_path,
            config.language,
            config.package,
            &parsed.generated_code,
        )
        .map_err(|source| PipelineError::Artifact {
            path: config.output_path.to_path_buf(),
            source,
        })?;

        let compile_ctx = CompileContext {
            output_path: config.output_path,
            dep_jars: config.dep_jars,
        };
        let verdict = validate(&parsed.generated_code, config.language, Some(&compile_ctx));

        if verdict.is_valid {
            info!("attempt {attempt}: validation passed");
            return Ok(SessionReport {
                code: parsed.generated_code,
                attempts: attempt,
                usage: response.usage,
                total_usage,
                finish_reason: response.finish_reason,
            });
        }

        let message = verdict
            .error_message
            .unwrap_or_else(|| "validation failed".to_string());
        info!(
            "validation failed on attempt {attempt}/{}: {message}",
            config.max_attempts
        );
        last_error = message.clone();

        if attempt < config.max_attempts {
            request
                .system_prompt
                .push_str(&feedback_block(&message, &parsed.generated_code));
        }
    }

    Err(PipelineError::Exhausted {
        attempts: config.max_attempts,
        last_error,
    })
}
