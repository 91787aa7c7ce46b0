use serde::{Deserialize, Serialize};

use crate::domain::entities::ChatMessageView;

/// Events pushed to every subscriber of a ticket room
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum RoomEvent {
    #[serde(rename_all = "camelCase")]
    NewMessage {
        ticket_id: String,
        message: ChatMessageView,
    },
}

impl RoomEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RoomEvent::NewMessage { .. } => "newMessage",
        }
    }

    pub fn ticket_id(&self) -> &str {
        match self {
            RoomEvent::NewMessage { ticket_id, .. } => ticket_id,
        }
    }
}
