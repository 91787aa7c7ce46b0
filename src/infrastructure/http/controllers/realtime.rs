use crate::application::services::ChatService;
use crate::domain::entities::{ChatMessageView, User};
use crate::domain::events::RoomEvent;
use crate::infrastructure::http::controllers::messages::MessagePayload;
use crate::infrastructure::http::middleware::{ApiResult, AppState, AuthenticatedUser};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::{
        sse::{Event, KeepAlive, Sse},
        Response,
    },
    Extension,
};
use futures::{stream::Stream, SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Frames a socket client may send
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ClientFrame {
    #[serde(rename_all = "camelCase")]
    JoinTicket { ticket_id: String },
    #[serde(rename_all = "camelCase")]
    LeaveTicket { ticket_id: String },
    #[serde(rename_all = "camelCase")]
    SendMessage {
        ticket_id: String,
        #[serde(flatten)]
        payload: MessagePayload,
    },
    Ping,
}

/// Frames pushed to a socket client
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ServerFrame {
    #[serde(rename_all = "camelCase")]
    Joined { ticket_id: String },
    #[serde(rename_all = "camelCase")]
    Left { ticket_id: String },
    #[serde(rename_all = "camelCase")]
    NewMessage {
        ticket_id: String,
        message: ChatMessageView,
    },
    Error { message: String },
    Pong,
}

impl From<RoomEvent> for ServerFrame {
    fn from(event: RoomEvent) -> Self {
        match event {
            RoomEvent::NewMessage { ticket_id, message } => {
                ServerFrame::NewMessage { ticket_id, message }
            }
        }
    }
}

/// `GET /ws`. Anyone may join rooms; posting needs an authenticated socket.
pub async fn ws_handler(
    State(state): State<AppState>,
    auth_user: Option<Extension<AuthenticatedUser>>,
    ws: WebSocketUpgrade,
) -> Response {
    let user = auth_user.map(|Extension(auth)| auth.user);
    ws.on_upgrade(move |socket| handle_socket(socket, state.chat_service, user))
}

async fn handle_socket(socket: WebSocket, chat: ChatService, user: Option<User>) {
    let (mut sender, mut receiver) = socket.split();
    let (out_tx, mut out_rx) = mpsc::channel::<ServerFrame>(64);

    let writer = tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            let json = match serde_json::to_string(&frame) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize socket frame: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    let mut rooms: HashMap<String, JoinHandle<()>> = HashMap::new();
    tracing::debug!(
        "Socket connected ({})",
        user.as_ref().map(|u| u.id.as_str()).unwrap_or("anonymous")
    );

    while let Some(Ok(message)) = receiver.next().await {
        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        let frame: ClientFrame = match serde_json::from_str(&text) {
            Ok(frame) => frame,
            Err(e) => {
                let _ = out_tx
                    .send(ServerFrame::Error {
                        message: format!("Malformed frame: {}", e),
                    })
                    .await;
                continue;
            }
        };

        let reply = match frame {
            ClientFrame::JoinTicket { ticket_id } => {
                join_room(&chat, &mut rooms, &out_tx, ticket_id).await
            }
            ClientFrame::LeaveTicket { ticket_id } => {
                if let Some(task) = rooms.remove(&ticket_id) {
                    task.abort();
                }
                ServerFrame::Left { ticket_id }
            }
            ClientFrame::SendMessage { ticket_id, payload } => {
                match send_message(&chat, user.as_ref(), &ticket_id, payload).await {
                    // The author sees the message through the room like everyone else
                    Ok(()) => continue,
                    Err(message) => ServerFrame::Error { message },
                }
            }
            ClientFrame::Ping => ServerFrame::Pong,
        };

        if out_tx.send(reply).await.is_err() {
            break;
        }
    }

    for (_, task) in rooms.drain() {
        task.abort();
    }
    drop(out_tx);
    let _ = writer.await;
    tracing::debug!("Socket closed");
}

async fn join_room(
    chat: &ChatService,
    rooms: &mut HashMap<String, JoinHandle<()>>,
    out_tx: &mpsc::Sender<ServerFrame>,
    ticket_id: String,
) -> ServerFrame {
    if rooms.contains_key(&ticket_id) {
        return ServerFrame::Joined { ticket_id };
    }

    let mut stream = match chat.join_room(&ticket_id).await {
        Ok(stream) => stream,
        Err(e) => {
            return ServerFrame::Error {
                message: e.public_message(),
            }
        }
    };

    let forward_tx = out_tx.clone();
    let task = tokio::spawn(async move {
        while let Some(event) = stream.next().await {
            if forward_tx.send(ServerFrame::from(event)).await.is_err() {
                break;
            }
        }
    });
    rooms.insert(ticket_id.clone(), task);

    ServerFrame::Joined { ticket_id }
}

async fn send_message(
    chat: &ChatService,
    user: Option<&User>,
    ticket_id: &str,
    payload: MessagePayload,
) -> Result<(), String> {
    let user = user.ok_or_else(|| "Authentication required to send messages".to_string())?;
    let request = payload.into_request().map_err(|e| e.public_message())?;
    chat.post_message(ticket_id, &user.id, request)
        .await
        .map(|_| ())
        .map_err(|e| e.public_message())
}

/// `GET /api/tickets/:ticketId/events`, the same room feed as Server-Sent Events
pub async fn ticket_event_stream(
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let room = state.chat_service.join_room(&ticket_id).await?;
    tracing::info!("SSE subscriber joined room {}", ticket_id);

    let stream = room.map(|event| {
        let json_data = serde_json::to_string(&event).unwrap_or_else(|e| {
            tracing::error!("Failed to serialize room event: {}", e);
            "{}".to_string()
        });
        Ok(Event::default().event(event.name()).data(json_data))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
