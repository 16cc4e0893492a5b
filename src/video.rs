//! Demo video resolution: YouTube URL -> video id -> embed URL.

use std::sync::LazyLock;

use regex::Regex;

/// Video shown before the user loads their own.
pub const DEFAULT_VIDEO_ID: &str = "ia2Ph61bYzc";

// watch?v=, youtu.be/, embed/, v/, e/ and /user/... forms; ids are 11 chars.
static YOUTUBE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#,
    )
    .unwrap()
});

/// Extract the 11-character video id from a YouTube URL.
pub fn extract_video_id(url: &str) -> Option<String> {
    YOUTUBE_ID
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn embed_url(video_id: &str) -> String {
    format!("https://www.youtube.com/embed/{video_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_common_url_forms() {
        for url in [
            "https://www.youtube.com/watch?v=ia2Ph61bYzc",
            "https://youtube.com/watch?feature=share&v=ia2Ph61bYzc",
            "https://youtu.be/ia2Ph61bYzc",
            "https://www.youtube.com/embed/ia2Ph61bYzc",
            "https://www.youtube.com/v/ia2Ph61bYzc?version=3",
            "  https://youtu.be/ia2Ph61bYzc?t=42  ",
        ] {
            assert_eq!(extract_video_id(url).as_deref(), Some("ia2Ph61bYzc"), "{url}");
        }
    }

    #[test]
    fn rejects_non_youtube_and_short_ids() {
        assert_eq!(extract_video_id(""), None);
        assert_eq!(extract_video_id("https://vimeo.com/123456789"), None);
        assert_eq!(extract_video_id("https://youtu.be/short"), None);
    }

    #[test]
    fn builds_embed_url() {
        assert_eq!(
            embed_url(DEFAULT_VIDEO_ID),
            "https://www.youtube.com/embed/ia2Ph61bYzc"
        );
    }
}
