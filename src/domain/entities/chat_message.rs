use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserSummary;
use crate::shared::utils::timestamp::now_rfc3339;

/// Maximum text length for a single chat message
pub const MAX_CONTENT_LENGTH: usize = 10_000;

/// Renderer hint derived from an attachment's MIME type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Audio,
    Video,
    File,
}

impl AttachmentKind {
    pub fn from_mime(mime_type: &str) -> Self {
        let top_level = mime_type.split('/').next().unwrap_or("").to_ascii_lowercase();
        match top_level.as_str() {
            "image" => AttachmentKind::Image,
            "audio" => AttachmentKind::Audio,
            "video" => AttachmentKind::Video,
            _ => AttachmentKind::File,
        }
    }
}

/// Which parts a message carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentMode {
    TextOnly,
    FileOnly,
    TextAndFile,
}

/// One entry of a ticket's chat transcript. Immutable once appended;
/// `seq` is assigned by the store and defines transcript order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub ticket_id: String,
    pub seq: i64,
    pub user_id: String,
    pub content: Option<String>,
    pub attachment_url: Option<String>,
    pub attachment_mime_type: Option<String>,
    pub attachment_name: Option<String>,
    pub created_at: String,
}

impl ChatMessage {
    /// Build an unsaved message. `attachment` is the already-stored object.
    pub fn new(
        ticket_id: String,
        user_id: String,
        content: Option<String>,
        attachment: Option<&StoredObject>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ticket_id,
            seq: 0,
            user_id,
            content,
            attachment_url: attachment.map(|a| a.url.clone()),
            attachment_mime_type: attachment.map(|a| a.mime_type.clone()),
            attachment_name: attachment.map(|a| a.file_name.clone()),
            created_at: now_rfc3339(),
        }
    }

    pub fn content_mode(&self) -> Option<ContentMode> {
        match (self.content.is_some(), self.attachment_url.is_some()) {
            (true, false) => Some(ContentMode::TextOnly),
            (false, true) => Some(ContentMode::FileOnly),
            (true, true) => Some(ContentMode::TextAndFile),
            (false, false) => None,
        }
    }

    pub fn attachment_kind(&self) -> Option<AttachmentKind> {
        self.attachment_mime_type
            .as_deref()
            .map(AttachmentKind::from_mime)
    }
}

/// Message as returned to clients and pushed to room subscribers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageView {
    #[serde(flatten)]
    pub message: ChatMessage,
    pub attachment_kind: Option<AttachmentKind>,
    pub user: UserSummary,
}

impl ChatMessageView {
    pub fn new(message: ChatMessage, user: UserSummary) -> Self {
        Self {
            attachment_kind: message.attachment_kind(),
            message,
            user,
        }
    }
}

/// Binary attachment as received at the request boundary
#[derive(Debug, Clone)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Object-storage receipt for a persisted attachment
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub url: String,
    pub mime_type: String,
    pub storage_id: String,
    pub file_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct PostMessageRequest {
    pub content: Option<String>,
    pub attachment: Option<AttachmentUpload>,
}

impl PostMessageRequest {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            attachment: None,
        }
    }

    /// Trims text, drops empty text, and checks that something is being sent.
    pub fn normalized(mut self) -> Result<Self, String> {
        self.content = self
            .content
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        if let Some(ref content) = self.content {
            if content.len() > MAX_CONTENT_LENGTH {
                return Err(format!(
                    "Message content too long: {} characters (max {})",
                    content.len(),
                    MAX_CONTENT_LENGTH
                ));
            }
        }

        if let Some(ref attachment) = self.attachment {
            if attachment.data.is_empty() {
                return Err("Attachment is empty".to_string());
            }
            if attachment.file_name.trim().is_empty() {
                return Err("Attachment file name is required".to_string());
            }
        }

        if self.content.is_none() && self.attachment.is_none() {
            return Err("Message must contain text, an attachment, or both".to_string());
        }

        Ok(self)
    }
}
