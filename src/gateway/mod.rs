//! AI assistance gateway: the single-shot model calls behind the UI.
//!
//! Two operations, each a typed request validated on the way in and a
//! typed response validated on the way out. Callers never see prompt text.

mod llm;
pub mod prompts;
pub mod types;

pub use llm::{GatewayConfig, LlmGateway};
pub use types::{AssistanceRequest, AssistanceResponse, KeywordsRequest, KeywordsResponse};

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::error::GatewayError;

/// The external generative-AI boundary.
#[async_trait]
pub trait FashionGateway: Send + Sync {
    /// Extract fashion keywords from an image.
    async fn extract_keywords(
        &self,
        request: KeywordsRequest,
    ) -> Result<KeywordsResponse, GatewayError>;

    /// Answer a fashion question, optionally with DripSeek context and an image.
    async fn answer_fashion_question(
        &self,
        request: AssistanceRequest,
    ) -> Result<AssistanceResponse, GatewayError>;
}

/// Bound a gateway call so a stuck upstream cannot hold a session forever.
pub async fn with_timeout<T>(
    after: Duration,
    call: impl Future<Output = Result<T, GatewayError>>,
) -> Result<T, GatewayError> {
    match tokio::time::timeout(after, call).await {
        Ok(result) => result,
        Err(_) => {
            warn!(?after, "Gateway call timed out");
            Err(GatewayError::Timeout { after })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn with_timeout_passes_through_fast_results() {
        let result = with_timeout(Duration::from_secs(1), async { Ok::<_, GatewayError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn with_timeout_bounds_slow_calls() {
        let result = with_timeout(Duration::from_millis(20), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok::<_, GatewayError>(())
        })
        .await;
        assert!(matches!(result, Err(GatewayError::Timeout { .. })));
    }
}
