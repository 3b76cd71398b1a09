//! LLM provider abstraction.
//!
//! The provider is the sole network boundary of the generation core: prompt
//! and response schema in, structured payload and usage counters out. It is
//! stateless across calls, so independent sessions can share one provider.

use async_trait::async_trait;
use serde_json::Value;

/// Errors from LLM provider calls.
///
/// Transport and parse failures are eligible for retry by the pipeline;
/// safety filtering consumes an attempt but produces no candidate code.
/// Failures that still received a response body carry that call's token
/// usage, since filtered and malformed calls are billed like any other.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("response parse error: {message}")]
    Parse { message: String, usage: TokenUsage },
    #[error("response blocked by safety filter: {reason}")]
    ContentFiltered { reason: String, usage: TokenUsage },
}

impl ProviderError {
    /// Token usage of the failed call. Zero for transport and API errors,
    /// which never reached a billable response.
    pub fn usage(&self) -> TokenUsage {
        match self {
            Self::Parse { usage, .. } | Self::ContentFiltered { usage, .. } => *usage,
            Self::Http(_) | Self::Api { .. } => TokenUsage::default(),
        }
    }
}

/// One generation request. The system prompt accumulates feedback between
/// attempts within a session; every other field is session-constant.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub task_description: String,
    pub model: String,
    /// Sampling temperature in `[0, 1]`.
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// Token counters for one provider call.
///
/// Exact when the provider reports usage metadata, otherwise estimated with
/// the 4-chars-per-token heuristic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl TokenUsage {
    /// Estimate usage from character counts when the provider reports none.
    pub fn estimate(prompt_chars: usize, completion_chars: usize) -> Self {
        let input_tokens = (prompt_chars as u64) / 4;
        let completion_tokens = (completion_chars as u64) / 4;
        Self {
            input_tokens,
            completion_tokens,
            total_tokens: input_tokens + completion_tokens,
        }
    }

    /// Accumulate another call's usage into a running total.
    pub fn add(&mut self, other: Self) {
        self.input_tokens += other.input_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
    }
}

impl std::fmt::Display for TokenUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "input={} completion={} total={}",
            self.input_tokens, self.completion_tokens, self.total_tokens
        )
    }
}

/// A structured provider response: the JSON payload conforming to the
/// requested schema, plus usage counters and the provider's finish reason.
#[derive(Debug, Clone)]
pub struct StructuredResponse {
    pub payload: Value,
    pub usage: TokenUsage,
    pub finish_reason: Option<String>,
}

/// Abstraction over structured-output LLM providers.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send one generation request constrained to a single candidate whose
    /// JSON output conforms to `response_schema`.
    async fn generate_structured(
        &self,
        request: &GenerationRequest,
        response_schema: &Value,
    ) -> Result<StructuredResponse, ProviderError>;
}
