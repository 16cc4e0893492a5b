//! Google Gemini provider over the Generative Language REST API.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::provider::{
    ChatMessage, CompletionRequest, CompletionResponse, FinishReason, LlmProvider, Role,
};
use super::{LlmConfig, http_client, status_error};
use crate::error::LlmError;

const PROVIDER: &str = "gemini";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        Ok(Self {
            client: http_client(PROVIDER)?,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }
}

// ── Wire types ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

fn to_content(message: &ChatMessage) -> Content {
    let role = match message.role {
        Role::Assistant => "model",
        Role::User | Role::System => "user",
    };

    let mut parts = Vec::with_capacity(1 + message.images.len());
    if !message.content.is_empty() {
        parts.push(Part {
            text: Some(message.content.clone()),
            inline_data: None,
        });
    }
    for image in &message.images {
        parts.push(Part {
            text: None,
            inline_data: Some(InlineData {
                mime_type: image.mime_type().to_string(),
                data: image.base64_data().to_string(),
            }),
        });
    }

    Content {
        role: Some(role.to_string()),
        parts,
    }
}

fn build_request(request: &CompletionRequest) -> GenerateRequest {
    let system_text: Vec<&str> = request
        .messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();

    let system_instruction = (!system_text.is_empty()).then(|| Content {
        role: None,
        parts: vec![Part {
            text: Some(system_text.join("\n\n")),
            inline_data: None,
        }],
    });

    GenerateRequest {
        system_instruction,
        contents: request
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(to_content)
            .collect(),
        generation_config: GenerationConfig {
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
            response_mime_type: request.json_output.then_some("application/json"),
        },
    }
}

fn finish_reason(raw: Option<&str>) -> FinishReason {
    match raw {
        Some("STOP") => FinishReason::Stop,
        Some("MAX_TOKENS") => FinishReason::Length,
        Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") => FinishReason::ContentFilter,
        _ => FinishReason::Unknown,
    }
}

fn parse_response(body: GenerateResponse) -> Result<CompletionResponse, LlmError> {
    let candidate = body
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse {
            provider: PROVIDER.to_string(),
            reason: "response contained no candidates".to_string(),
        })?;

    let content: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let usage = body.usage_metadata;
    Ok(CompletionResponse {
        content,
        input_tokens: usage.as_ref().map_or(0, |u| u.prompt_token_count),
        output_tokens: usage.as_ref().map_or(0, |u| u.candidates_token_count),
        finish_reason: finish_reason(candidate.finish_reason.as_deref()),
    })
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = build_request(&request);

        debug!(model = %self.model, messages = body.contents.len(), "Gemini request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await.map_err(|e| LlmError::RequestFailed {
            provider: PROVIDER.to_string(),
            reason: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(status_error(PROVIDER, status, &headers, &text));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)?;
        parse_response(parsed)
    }
}
