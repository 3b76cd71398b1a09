//! LLM boundary and generation control loop for nlc.
//!
//! # Architecture
//!
//! - **provider**: [`LlmProvider`] trait — the sole network boundary, with
//!   request/usage types and the provider error taxonomy
//! - **gemini**: Gemini `generateContent` implementation over `reqwest`
//! - **schema**: structured response shapes and their JSON schema descriptors
//! - **pipeline**: bounded retry–validate–feedback session
//! - **describe**: single-shot usage-description generation

pub mod describe;
pub mod gemini;
pub mod pipeline;
pub mod provider;
pub mod schema;

pub use describe::{DescribeReport, generate_description};
pub use gemini::GeminiProvider;
pub use pipeline::{DEFAULT_MAX_ATTEMPTS, PipelineError, SessionConfig, SessionReport, run_session};
pub use provider::{GenerationRequest, LlmProvider, ProviderError, StructuredResponse, TokenUsage};
pub use schema::{GeneratedCode, UsageDescription};
