//! Media service — upload keys and content types for memento blobs.
//!
//! DESIGN
//! ======
//! Blobs are namespaced by user and wall:
//! `{user or "anon"}/{wall}/{temp_id}-{millis}.{ext}`, with `-poster` before
//! the extension for video posters. The extension is the subtype of the
//! content type, falling back per slot when the type is missing.

use time::OffsetDateTime;
use uuid::Uuid;

#[cfg(test)]
#[path = "media_test.rs"]
mod media_test;

/// Which blob of a draft is being uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSlot {
    Photo,
    Video,
    Poster,
}

impl MediaSlot {
    #[must_use]
    pub fn default_content_type(self) -> &'static str {
        match self {
            Self::Photo | Self::Poster => "image/jpeg",
            Self::Video => "video/mp4",
        }
    }

    #[must_use]
    pub fn default_extension(self) -> &'static str {
        match self {
            Self::Photo | Self::Poster => "jpg",
            Self::Video => "mp4",
        }
    }

    /// The content type to store, defaulting a blank one.
    #[must_use]
    pub fn content_type(self, declared: &str) -> String {
        if declared.trim().is_empty() {
            self.default_content_type().to_string()
        } else {
            declared.to_string()
        }
    }

    /// File extension for `content_type`: its subtype, or the slot default.
    ///
    /// Photos and posters fall back to `jpg` even for a blank type; videos
    /// take the subtype of the defaulted `video/mp4`.
    #[must_use]
    pub fn extension(self, content_type: &str) -> String {
        let declared = match self {
            Self::Video => self.content_type(content_type),
            Self::Photo | Self::Poster => content_type.to_string(),
        };
        match declared.split('/').nth(1) {
            Some(sub) if !sub.is_empty() => sub.to_string(),
            _ => self.default_extension().to_string(),
        }
    }
}

/// Milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> i128 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000
}

/// Storage key for one blob of a draft.
#[must_use]
pub fn upload_path(
    user_id: Option<Uuid>,
    wall_id: Uuid,
    temp_id: Uuid,
    millis: i128,
    slot: MediaSlot,
    content_type: &str,
) -> String {
    let owner = user_id.map_or_else(|| "anon".to_string(), |id| id.to_string());
    let ext = slot.extension(content_type);
    let suffix = if slot == MediaSlot::Poster { "-poster" } else { "" };
    format!("{owner}/{wall_id}/{temp_id}-{millis}{suffix}.{ext}")
}
