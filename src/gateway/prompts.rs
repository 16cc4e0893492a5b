//! Prompt templates for the gateway operations.
//!
//! Sections are appended only when their input is present; the image
//! itself travels as an inline part on the user message, not as text.

use super::types::AssistanceRequest;

pub const KEYWORDS_SYSTEM_PROMPT: &str = "You are a fashion expert. Extract keywords that \
     describe the fashion items present in the following image. Only extract keywords related \
     to fashion.\n\n\
     Respond with a JSON object of the form {\"keywords\": \"<space separated keywords>\"}. \
     ONLY output the JSON object. No other text.";

pub const KEYWORDS_USER_PROMPT: &str = "Image attached. Keywords:";

pub const ASSISTANCE_SYSTEM_PROMPT: &str = "You are a helpful AI assistant specializing in \
     fashion.\n\n\
     Answer the user's question based on your knowledge of fashion trends, styles, and brands.\n\n\
     Respond with a JSON object with:\n\
     - \"answer\": your answer to the question\n\
     - \"searchLink\": optional absolute URL searching a major e-commerce site for the \
     identified items; omit it when you have none\n\n\
     ONLY output the JSON object. No other text.";

/// Build the user turn for a fashion question.
pub fn assistance_prompt(request: &AssistanceRequest) -> String {
    let mut prompt = format!("Question: {}\n", request.question);

    if request.photo_data_uri.is_some() {
        prompt.push_str("\nThe user has also provided the attached image for context.\n");
    }

    if let Some(context) = request.context.as_deref().filter(|c| !c.trim().is_empty()) {
        prompt.push_str(&format!(
            "\nContext from DripSeek (fashion keywords identified from an image): {context}\n\
             Based on these keywords, if relevant to the user's question or as additional \
             helpful information, please try to generate a search link for a major e-commerce \
             site (like Amazon).\n\
             For example, if keywords are \"red silk dress\", the search link could be \
             \"https://www.amazon.com/s?k=red+silk+dress\".\n\
             Incorporate this link naturally into your answer if you generate one, and ensure \
             the link is populated in the 'searchLink' field of the output. If no specific \
             question is asked but context is provided, you can proactively offer a search link.\n"
        ));
    }

    prompt.push_str("\nAnswer:");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{ImageDataUri, SAMPLE_FRAME};

    #[test]
    fn bare_question_has_no_optional_sections() {
        let prompt = assistance_prompt(&AssistanceRequest::new("What goes with a navy peacoat?"));
        assert!(prompt.starts_with("Question: What goes with a navy peacoat?"));
        assert!(!prompt.contains("attached image"));
        assert!(!prompt.contains("DripSeek"));
        assert!(prompt.ends_with("Answer:"));
    }

    #[test]
    fn image_and_context_sections_are_conditional() {
        let request = AssistanceRequest::new("Where can I buy this?")
            .with_context("red silk dress")
            .with_photo(ImageDataUri::parse(SAMPLE_FRAME).unwrap());
        let prompt = assistance_prompt(&request);

        assert!(prompt.contains("attached image"));
        assert!(prompt.contains("identified from an image): red silk dress"));
        assert!(prompt.contains("searchLink"));
    }

    #[test]
    fn blank_context_is_ignored() {
        let prompt = assistance_prompt(&AssistanceRequest::new("hi").with_context("  "));
        assert!(!prompt.contains("DripSeek"));
    }
}
