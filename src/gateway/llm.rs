//! `FashionGateway` backed by an `LlmProvider`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::prompts::{
    ASSISTANCE_SYSTEM_PROMPT, KEYWORDS_SYSTEM_PROMPT, KEYWORDS_USER_PROMPT, assistance_prompt,
};
use super::types::{
    AssistanceRequest, AssistanceResponse, KeywordsRequest, KeywordsResponse, parse_assistance,
    parse_keywords,
};
use super::FashionGateway;
use crate::error::GatewayError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};

/// Sampling settings for gateway calls.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Temperature for keyword extraction (kept low, runs on a fixed frame).
    pub keywords_temperature: f32,
    /// Temperature for conversational answers.
    pub assistance_temperature: f32,
    /// Max tokens for either response.
    pub max_tokens: u32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            keywords_temperature: 0.2,
            assistance_temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

pub struct LlmGateway {
    llm: Arc<dyn LlmProvider>,
    config: GatewayConfig,
}

impl LlmGateway {
    pub fn new(llm: Arc<dyn LlmProvider>, config: GatewayConfig) -> Self {
        Self { llm, config }
    }
}

#[async_trait]
impl FashionGateway for LlmGateway {
    async fn extract_keywords(
        &self,
        request: KeywordsRequest,
    ) -> Result<KeywordsResponse, GatewayError> {
        info!(
            model = self.llm.model_name(),
            mime = request.photo_data_uri.mime_type(),
            "Extracting fashion keywords"
        );

        let completion = CompletionRequest::new(vec![
            ChatMessage::system(KEYWORDS_SYSTEM_PROMPT),
            ChatMessage::user(KEYWORDS_USER_PROMPT).with_image(request.photo_data_uri),
        ])
        .with_temperature(self.config.keywords_temperature)
        .with_max_tokens(self.config.max_tokens)
        .with_json_output();

        let response = self.llm.complete(completion).await?;
        debug!(
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "Keyword extraction completed"
        );

        parse_keywords(extract_json_object(&response.content)).inspect_err(|e| {
            warn!(error = ?e, raw = %response.content, "Keyword extraction returned invalid output");
        })
    }

    async fn answer_fashion_question(
        &self,
        request: AssistanceRequest,
    ) -> Result<AssistanceResponse, GatewayError> {
        request.validate()?;

        info!(
            model = self.llm.model_name(),
            has_context = request.context.is_some(),
            has_image = request.photo_data_uri.is_some(),
            "Answering fashion question"
        );

        let mut user = ChatMessage::user(assistance_prompt(&request));
        if let Some(photo) = request.photo_data_uri {
            user = user.with_image(photo);
        }

        let completion =
            CompletionRequest::new(vec![ChatMessage::system(ASSISTANCE_SYSTEM_PROMPT), user])
                .with_temperature(self.config.assistance_temperature)
                .with_max_tokens(self.config.max_tokens)
                .with_json_output();

        let response = self.llm.complete(completion).await?;
        debug!(
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "Fashion assistance completed"
        );

        parse_assistance(extract_json_object(&response.content)).inspect_err(|e| {
            warn!(error = ?e, raw = %response.content, "Fashion assistance returned invalid output");
        })
    }
}

/// Pull the outermost JSON object out of a model reply that may be wrapped
/// in a markdown fence or surrounded by prose.
pub(crate) fn extract_json_object(text: &str) -> &str {
    let trimmed = text.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if end > start => &trimmed[start..=end],
        _ => trimmed,
    }
}
