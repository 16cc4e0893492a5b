//! OpenAI provider over the Chat Completions API.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use super::provider::{
    ChatMessage, CompletionRequest, CompletionResponse, FinishReason, LlmProvider, Role,
};
use super::{LlmConfig, http_client, status_error};
use crate::error::LlmError;

const PROVIDER: &str = "openai";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl OpenAiProvider {
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

#[derive(Debug, Serialize)]
struct ChatRequestBody<'a> {
    model: &'a str,
    messages: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseBody {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

fn to_message(message: &ChatMessage) -> Value {
    let role = match message.role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    };

    if message.images.is_empty() {
        return json!({ "role": role, "content": message.content });
    }

    let mut parts = vec![json!({ "type": "text", "text": message.content })];
    parts.extend(message.images.iter().map(|image| {
        json!({ "type": "image_url", "image_url": { "url": image.as_str() } })
    }));
    json!({ "role": role, "content": parts })
}

fn build_request<'a>(model: &'a str, request: &CompletionRequest) -> ChatRequestBody<'a> {
    ChatRequestBody {
        model,
        messages: request.messages.iter().map(to_message).collect(),
        temperature: request.temperature,
        max_tokens: request.max_tokens,
        response_format: request
            .json_output
            .then(|| json!({ "type": "json_object" })),
    }
}

fn parse_response(body: ChatResponseBody) -> Result<CompletionResponse, LlmError> {
    let choice = body
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse {
            provider: PROVIDER.to_string(),
            reason: "response contained no choices".to_string(),
        })?;

    let finish_reason = match choice.finish_reason.as_deref() {
        Some("stop") => FinishReason::Stop,
        Some("length") => FinishReason::Length,
        Some("content_filter") => FinishReason::ContentFilter,
        _ => FinishReason::Unknown,
    };

    Ok(CompletionResponse {
        content: choice.message.content.unwrap_or_default(),
        input_tokens: body.usage.as_ref().map_or(0, |u| u.prompt_tokens),
        output_tokens: body.usage.as_ref().map_or(0, |u| u.completion_tokens),
        finish_reason,
    })
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = build_request(&self.model, &request);

        debug!(model = %self.model, messages = body.messages.len(), "OpenAI request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
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

        let parsed: ChatResponseBody = serde_json::from_str(&text)?;
        parse_response(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{ImageDataUri, SAMPLE_FRAME};

    #[test]
    fn plain_messages_use_string_content() {
        let request = CompletionRequest::new(vec![
            ChatMessage::system("be helpful"),
            ChatMessage::user("hi"),
        ]);
        let body = serde_json::to_value(build_request("gpt-4o", &request)).unwrap();

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn images_become_content_parts() {
        let request = CompletionRequest::new(vec![
            ChatMessage::user("what is this?")
                .with_image(ImageDataUri::parse(SAMPLE_FRAME).unwrap()),
        ])
        .with_json_output();
        let body = serde_json::to_value(build_request("gpt-4o", &request)).unwrap();

        let content = body["messages"][0]["content"].as_array().unwrap();
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[1]["type"], "image_url");
        assert_eq!(content[1]["image_url"]["url"], SAMPLE_FRAME);
        assert_eq!(body["response_format"]["type"], "json_object");
    }

    #[test]
    fn parses_first_choice() {
        let raw = r#"{
            "choices": [{"message": {"content": "{\"answer\": \"wear it\"}"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 30, "completion_tokens": 8}
        }"#;
        let parsed: ChatResponseBody = serde_json::from_str(raw).unwrap();
        let response = parse_response(parsed).unwrap();

        assert_eq!(response.content, r#"{"answer": "wear it"}"#);
        assert_eq!(response.input_tokens, 30);
        assert_eq!(response.finish_reason, FinishReason::Stop);
    }
}
