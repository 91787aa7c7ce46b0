use crate::domain::entities::{AttachmentUpload, ChatMessageView, PostMessageRequest};
use crate::infrastructure::http::middleware::{ApiError, ApiResult, AppState, AuthenticatedUser};
use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    Extension, Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

/// Attachment sent inline in a JSON or WebSocket frame
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedAttachment {
    pub file_name: String,
    pub mime_type: Option<String>,
    /// Base64, standard alphabet
    pub data: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagePayload {
    pub content: Option<String>,
    pub attachment: Option<EncodedAttachment>,
}

impl MessagePayload {
    pub fn into_request(self) -> ApiResult<PostMessageRequest> {
        let attachment = match self.attachment {
            Some(encoded) => {
                let data = STANDARD
                    .decode(encoded.data.trim())
                    .map_err(|_| ApiError::BadRequest("Attachment data is not valid base64".to_string()))?;
                Some(AttachmentUpload {
                    file_name: encoded.file_name,
                    mime_type: encoded
                        .mime_type
                        .filter(|m| !m.trim().is_empty())
                        .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
                    data,
                })
            }
            None => None,
        };

        Ok(PostMessageRequest {
            content: self.content,
            attachment,
        })
    }
}

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

pub async fn get_messages(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Path(ticket_id): Path<String>,
) -> ApiResult<Json<Vec<ChatMessageView>>> {
    Ok(Json(state.chat_service.get_messages(&ticket_id).await?))
}

/// Accepts `application/json` ([`MessagePayload`]) or `multipart/form-data`
/// with a `content` field and at most one `file` or `audio` part.
pub async fn post_message(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(ticket_id): Path<String>,
    request: Request,
) -> ApiResult<(StatusCode, Json<ChatMessageView>)> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("multipart/form-data"))
        .unwrap_or(false);

    let message_request = if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?;
        read_multipart(multipart).await?
    } else {
        let Json(payload) = Json::<MessagePayload>::from_request(request, &state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        payload.into_request()?
    };

    let message = state
        .chat_service
        .post_message(&ticket_id, &auth_user.user.id, message_request)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

async fn read_multipart(mut multipart: Multipart) -> ApiResult<PostMessageRequest> {
    let mut request = PostMessageRequest::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge("Upload exceeds the size limit".to_string())
        } else {
            ApiError::BadRequest(format!("Failed to parse multipart: {}", e))
        }
    })? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "content" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid content field: {}", e)))?;
                request.content = Some(text);
            }
            "file" | "audio" => {
                if request.attachment.is_some() {
                    return Err(ApiError::BadRequest(
                        "Only one attachment is allowed per message".to_string(),
                    ));
                }
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| name.clone());
                let mime_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());
                let data = field.bytes().await.map_err(|e| {
                    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                        ApiError::PayloadTooLarge("Upload exceeds the size limit".to_string())
                    } else {
                        ApiError::BadRequest(format!("Failed to read upload: {}", e))
                    }
                })?;
                request.attachment = Some(AttachmentUpload {
                    file_name,
                    mime_type,
                    data: data.to_vec(),
                });
            }
            other => {
                tracing::debug!("Ignoring unexpected multipart field {}", other);
            }
        }
    }

    Ok(request)
}
