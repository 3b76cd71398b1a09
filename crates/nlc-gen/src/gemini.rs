//! Gemini `generateContent` provider.
//!
//! Talks to the Generative Language REST API with structured output enforced
//! via `responseSchema`, a single candidate, and safety thresholds relaxed to
//! block-only-high across all harm categories so legitimate code-generation
//! content is not over-filtered.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use crate::provider::{
    GenerationRequest, LlmProvider, ProviderError, StructuredResponse, TokenUsage,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Harm categories that get the relaxed block-only-high threshold.
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Gemini API client.
pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        Ok(Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client,
        })
    }

    /// Point the client at a different endpoint (local proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate_structured(
        &self,
        request: &GenerationRequest,
        response_schema: &Value,
    ) -> Result<StructuredResponse, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            request.model
        );
        let body = request_body(request, response_schema);

        debug!("calling {} (temperature={})", request.model, request.temperature);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let json: Value = serde_json::from_str(&text).map_err(|e| ProviderError::Parse {
            message: format!("response body is not valid JSON: {e}"),
            usage: TokenUsage::estimate(
                request.system_prompt.len() + request.task_description.len(),
                0,
            ),
        })?;
        parse_response(&json, request)
    }
}

/// Build the generateContent request body.
fn request_body(request: &GenerationRequest, response_schema: &Value) -> Value {
    let safety_settings: Vec<Value> = SAFETY_CATEGORIES
        .iter()
        .map(|category| json!({ "category": category, "threshold": "BLOCK_ONLY_HIGH" }))
        .collect();

    json!({
        "system_instruction": { "parts": [{ "text": request.system_prompt }] },
        "contents": [{ "role": "user", "parts": [{ "text": request.task_description }] }],
        "generationConfig": {
            "temperature": request.temperature,
            "maxOutputTokens": request.max_output_tokens,
            "candidateCount": 1,
            "responseMimeType": "application/json",
            "responseSchema": response_schema
        },
        "safetySettings": safety_settings
    })
}

/// Extract the structured payload, usage counters, and finish reason from a
/// generateContent response.
///
/// Usage is extracted before any failure exit: safety-blocked and malformed
/// responses are still billed, so their errors carry the usage too.
pub(crate) fn parse_response(
    json: &Value,
    request: &GenerationRequest,
) -> Result<StructuredResponse, ProviderError> {
    let text = json
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .unwrap_or("");
    let usage = extract_usage(json, request, text);

    if let Some(reason) = json
        .pointer("/promptFeedback/blockReason")
        .and_then(Value::as_str)
    {
        return Err(ProviderError::ContentFiltered {
            reason: reason.to_string(),
            usage,
        });
    }

    let candidate = json
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .ok_or_else(|| ProviderError::Parse {
            message: "response has no candidates".to_string(),
            usage,
        })?;

    let finish_reason = candidate
        .get("finishReason")
        .and_then(Value::as_str)
        .map(String::from);

    if finish_reason.as_deref() == Some("SAFETY") {
        return Err(ProviderError::ContentFiltered {
            reason: "candidate finished with SAFETY".to_string(),
            usage,
        });
    }

    let text = candidate
        .pointer("/content/parts/0/text")
        .and_then(Value::as_str)
        .ok_or_else(|| ProviderError::Parse {
            message: "candidate has no text part".to_string(),
            usage,
        })?;

    let payload: Value = serde_json::from_str(text).map_err(|e| ProviderError::Parse {
        message: format!("structured payload is not valid JSON: {e}"),
        usage,
    })?;

    Ok(StructuredResponse {
        payload,
        usage,
        finish_reason,
    })
}

/// Exact usage when the provider reports it, chars/4 estimate otherwise.
///
/// Blocked prompts report `promptTokenCount` without `candidatesTokenCount`;
/// a present prompt count is treated as exact with zero completion tokens.
fn extract_usage(json: &Value, request: &GenerationRequest, completion_text: &str) -> TokenUsage {
    let metadata = json.get("usageMetadata");
    let count = |key: &str| {
        metadata
            .and_then(|m| m.get(key))
            .and_then(Value::as_u64)
    };

    match count("promptTokenCount") {
        Some(input_tokens) => {
            let completion_tokens = count("candidatesTokenCount").unwrap_or(0);
            TokenUsage {
                input_tokens,
                completion_tokens,
                total_tokens: count("totalTokenCount").unwrap_or(input_tokens + completion_tokens),
            }
        }
        None => TokenUsage::estimate(
            request.system_prompt.len() + request.task_description.len(),
            completion_text.len(),
        ),
    }
}
