//! Request/response records for the two gateway operations, plus the
//! validation that turns raw model JSON into them.

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::image::ImageDataUri;

/// Caller-visible message when keyword extraction returns a malformed structure.
pub const KEYWORDS_INVALID_RESPONSE: &str =
    "AI model did not provide a valid response structure for keywords.";

/// Caller-visible message when question answering returns a malformed structure.
pub const ASSISTANCE_INVALID_RESPONSE: &str = "AI model did not provide a valid response structure.";

/// Input for keyword extraction: one captured frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordsRequest {
    pub photo_data_uri: ImageDataUri,
}

/// Fashion keywords found in an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordsResponse {
    pub keywords: String,
}

/// A fashion question with optional DripSeek context and image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistanceRequest {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_data_uri: Option<ImageDataUri>,
}

impl AssistanceRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            context: None,
            photo_data_uri: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_photo(mut self, photo: ImageDataUri) -> Self {
        self.photo_data_uri = Some(photo);
        self
    }

    /// Reject requests that carry nothing for the model to answer.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.question.trim().is_empty() && self.photo_data_uri.is_none() {
            return Err(GatewayError::InvalidRequest {
                reason: "a question or an image is required".to_string(),
            });
        }
        Ok(())
    }
}

/// The assistant's answer, with an optional shopping search link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistanceResponse {
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawKeywords {
    keywords: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAssistance {
    answer: Option<String>,
    #[serde(rename = "searchLink", alias = "search_link")]
    search_link: Option<String>,
}

fn invalid(message: &'static str, detail: impl Into<String>) -> GatewayError {
    GatewayError::InvalidResponse {
        message,
        detail: detail.into(),
    }
}

/// Validate model JSON as a keyword extraction result.
pub fn parse_keywords(json: &str) -> Result<KeywordsResponse, GatewayError> {
    let raw: RawKeywords =
        serde_json::from_str(json).map_err(|e| invalid(KEYWORDS_INVALID_RESPONSE, e.to_string()))?;

    let keywords = raw
        .keywords
        .ok_or_else(|| invalid(KEYWORDS_INVALID_RESPONSE, "missing field `keywords`"))?;

    Ok(KeywordsResponse { keywords })
}

/// Validate model JSON as an assistance result.
///
/// An empty `searchLink` is treated as absent; a present one must be an
/// absolute http(s) URL.
pub fn parse_assistance(json: &str) -> Result<AssistanceResponse, GatewayError> {
    let raw: RawAssistance = serde_json::from_str(json)
        .map_err(|e| invalid(ASSISTANCE_INVALID_RESPONSE, e.to_string()))?;

    let answer = raw
        .answer
        .ok_or_else(|| invalid(ASSISTANCE_INVALID_RESPONSE, "missing field `answer`"))?;

    let search_link = match raw.search_link.map(|s| s.trim().to_string()) {
        Some(link) if link.is_empty() => None,
        Some(link) => {
            if !is_absolute_http_url(&link) {
                return Err(invalid(
                    ASSISTANCE_INVALID_RESPONSE,
                    format!("searchLink is not an absolute URL: {link}"),
                ));
            }
            Some(link)
        }
        None => None,
    };

    Ok(AssistanceResponse {
        answer,
        search_link,
    })
}

fn is_absolute_http_url(link: &str) -> bool {
    match reqwest::Url::parse(link) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_present() {
        let parsed = parse_keywords(r#"{"keywords": "red silk dress"}"#).unwrap();
        assert_eq!(parsed.keywords, "red silk dress");
    }

    #[test]
    fn keywords_missing_is_generic_error() {
        let err = parse_keywords(r#"{"tags": ["dress"]}"#).unwrap_err();
        assert_eq!(err.to_string(), KEYWORDS_INVALID_RESPONSE);
    }

    #[test]
    fn assistance_with_link() {
        let parsed = parse_assistance(
            r#"{"answer": "Try a cream turtleneck.", "searchLink": "https://www.amazon.com/s?k=cream+turtleneck"}"#,
        )
        .unwrap();
        assert_eq!(parsed.answer, "Try a cream turtleneck.");
        assert_eq!(
            parsed.search_link.as_deref(),
            Some("https://www.amazon.com/s?k=cream+turtleneck")
        );
    }

    #[test]
    fn assistance_accepts_snake_case_link_and_blank_link() {
        let parsed =
            parse_assistance(r#"{"answer": "a", "search_link": "http://shop.example/s?q=x"}"#)
                .unwrap();
        assert!(parsed.search_link.is_some());

        let parsed = parse_assistance(r#"{"answer": "a", "searchLink": "  "}"#).unwrap();
        assert!(parsed.search_link.is_none());
    }

    #[test]
    fn assistance_rejects_relative_link() {
        let err = parse_assistance(r#"{"answer": "a", "searchLink": "/s?k=dress"}"#).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse { .. }));
        assert_eq!(err.to_string(), ASSISTANCE_INVALID_RESPONSE);
    }

    #[test]
    fn assistance_missing_answer() {
        let err = parse_assistance(r#"{"searchLink": "https://a.example"}"#).unwrap_err();
        assert_eq!(err.to_string(), ASSISTANCE_INVALID_RESPONSE);
    }

    #[test]
    fn request_needs_question_or_image() {
        assert!(AssistanceRequest::new("   ").validate().is_err());
        assert!(AssistanceRequest::new("What shoes?").validate().is_ok());

        let photo = ImageDataUri::parse(crate::image::SAMPLE_FRAME).unwrap();
        assert!(AssistanceRequest::new("").with_photo(photo).validate().is_ok());
    }

    #[test]
    fn request_serializes_camel_case() {
        let req = AssistanceRequest::new("q").with_context("denim");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["context"], "denim");
        assert!(json.get("photoDataUri").is_none());
    }
}
