//! Self-contained image references (`data:<mime>;base64,<payload>`).
//!
//! Every image that crosses into the gateway or the transcript is carried
//! as a validated data URI, so nothing downstream has to re-check the shape.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::AttachmentError;

/// 1x1 transparent PNG used as the captured frame for the simulated scan.
pub const SAMPLE_FRAME: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

const BASE64_MARKER: &str = ";base64,";

/// A validated base64 image data URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageDataUri {
    uri: String,
    /// Byte offset where the base64 payload starts.
    payload_start: usize,
}

impl ImageDataUri {
    /// Parse and validate an existing data URI.
    pub fn parse(uri: &str) -> Result<Self, AttachmentError> {
        let rest = uri.strip_prefix("data:").ok_or_else(|| read_failure("missing data: prefix"))?;

        let marker = rest
            .find(BASE64_MARKER)
            .ok_or_else(|| read_failure("image is not base64 encoded"))?;

        let mime = &rest[..marker];
        if !mime.starts_with("image/") || mime.len() == "image/".len() {
            return Err(read_failure(&format!("unsupported media type {mime:?}")));
        }

        let payload_start = "data:".len() + marker + BASE64_MARKER.len();
        let payload = &uri[payload_start..];
        if payload.is_empty() {
            return Err(read_failure("empty image payload"));
        }
        STANDARD
            .decode(payload)
            .map_err(|e| read_failure(&format!("invalid base64 payload: {e}")))?;

        Ok(Self {
            uri: uri.to_string(),
            payload_start,
        })
    }

    /// Encode raw image bytes, sniffing the MIME type from the file signature.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AttachmentError> {
        if bytes.is_empty() {
            return Err(read_failure("file is empty"));
        }
        let mime = sniff_mime(bytes).ok_or_else(|| read_failure("not a recognised image format"))?;

        let prefix = format!("data:{mime}{BASE64_MARKER}");
        let payload_start = prefix.len();
        let uri = prefix + &STANDARD.encode(bytes);

        Ok(Self { uri, payload_start })
    }

    /// MIME type declared by the URI, e.g. `image/png`.
    pub fn mime_type(&self) -> &str {
        &self.uri["data:".len()..self.payload_start - BASE64_MARKER.len()]
    }

    /// The base64 payload without the `data:` header.
    pub fn base64_data(&self) -> &str {
        &self.uri[self.payload_start..]
    }

    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

impl fmt::Display for ImageDataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl TryFrom<String> for ImageDataUri {
    type Error = AttachmentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ImageDataUri> for String {
    fn from(value: ImageDataUri) -> Self {
        value.uri
    }
}

fn read_failure(reason: &str) -> AttachmentError {
    AttachmentError::ReadFailure {
        reason: reason.to_string(),
    }
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

    if bytes.starts_with(PNG) {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else if bytes.starts_with(b"BM") && bytes.len() > 14 {
        Some("image/bmp")
    } else {
        None
    }
}
