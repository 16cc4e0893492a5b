//! DripSeek: scan the current scene for fashion keywords and hand them to
//! the assistant as session context. Also handles X-Ray item picks, which
//! produce context without a model call.

use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::XRayItem;
use crate::gateway::{FashionGateway, KeywordsRequest, with_timeout};
use crate::image::ImageDataUri;
use crate::notify::Notifier;

/// Context used when the scan fails; the session still opens.
pub const SCAN_FALLBACK_CONTEXT: &str =
    "Could not identify items from the scene. You can still ask general fashion questions!";

/// What a scan produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanOutcome {
    /// Context to seed the assistant with.
    pub context: String,
    /// Keywords from the model; `None` when the scan failed.
    pub keywords: Option<String>,
}

/// Scan `frame` for fashion keywords, giving up after `timeout`. Never
/// fails: errors degrade to the fallback context plus an error notification.
pub async fn scan(
    gateway: &dyn FashionGateway,
    frame: ImageDataUri,
    notifier: &Notifier,
    timeout: Duration,
) -> ScanOutcome {
    info!(mime = frame.mime_type(), "DripSeek scan started");

    let request = KeywordsRequest {
        photo_data_uri: frame,
    };
    match with_timeout(timeout, gateway.extract_keywords(request)).await {
        Ok(response) => {
            info!(keywords = %response.keywords, "DripSeek identified keywords");
            notifier.info(
                "Fashion Keywords Identified!",
                format!(
                    "AI found: \"{}\". Ask the assistant for details or shopping links!",
                    response.keywords
                ),
            );
            ScanOutcome {
                context: response.keywords.clone(),
                keywords: Some(response.keywords),
            }
        }
        Err(e) => {
            warn!(error = %e, "DripSeek scan failed");
            notifier.error("DripSeek Error", e.to_string());
            ScanOutcome {
                context: SCAN_FALLBACK_CONTEXT.to_string(),
                keywords: None,
            }
        }
    }
}

/// Context for an X-Ray item the user picked.
pub fn explore_xray_item(item: &XRayItem, notifier: &Notifier) -> String {
    let context = if item.search_keywords.trim().is_empty() {
        item.name.clone()
    } else {
        item.search_keywords.clone()
    };

    info!(item = %item.id, "Exploring X-Ray item");
    notifier.info(
        format!("Exploring: {}", item.name),
        "Ask the AI assistant for more details, styling tips, or where to find similar items!",
    );
    context
}
