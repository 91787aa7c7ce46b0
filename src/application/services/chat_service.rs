use crate::application::services::{load_summaries, referenced_ids, summary_or_unknown};
use crate::domain::entities::{ChatMessage, ChatMessageView, PostMessageRequest};
use crate::domain::events::RoomEvent;
use crate::domain::ports::chat_repository::ChatRepository;
use crate::domain::ports::message_broker::{MessageBroker, RoomStream};
use crate::domain::ports::object_storage::ObjectStorage;
use crate::domain::ports::ticket_repository::TicketRepository;
use crate::domain::ports::user_repository::UserRepository;
use crate::infrastructure::http::middleware::error::{ApiError, ApiResult};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One relay lock per ticket room. Holding it across append and publish makes
/// broadcast order match store order for concurrent posts to the same room.
#[derive(Clone, Default)]
struct RoomLocks {
    rooms: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl RoomLocks {
    async fn acquire(&self, ticket_id: &str) -> OwnedMutexGuard<()> {
        let room = {
            let mut rooms = self.rooms.lock().await;
            rooms
                .entry(ticket_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        room.lock_owned().await
    }

    /// Drop the room entry once nobody holds or waits on it.
    async fn release(&self, ticket_id: &str, guard: OwnedMutexGuard<()>) {
        drop(guard);
        let mut rooms = self.rooms.lock().await;
        if rooms
            .get(ticket_id)
            .is_some_and(|room| Arc::strong_count(room) == 1)
        {
            rooms.remove(ticket_id);
        }
    }
}

/// Ticket chat relay: the store is the source of truth, the broker only
/// fans out to whoever is subscribed right now.
#[derive(Clone)]
pub struct ChatService {
    ticket_repo: Arc<dyn TicketRepository>,
    chat_repo: Arc<dyn ChatRepository>,
    user_repo: Arc<dyn UserRepository>,
    storage: Arc<dyn ObjectStorage>,
    broker: Arc<dyn MessageBroker>,
    max_attachment_bytes: usize,
    room_locks: RoomLocks,
}

impl ChatService {
    pub fn new(
        ticket_repo: Arc<dyn TicketRepository>,
        chat_repo: Arc<dyn ChatRepository>,
        user_repo: Arc<dyn UserRepository>,
        storage: Arc<dyn ObjectStorage>,
        broker: Arc<dyn MessageBroker>,
        max_attachment_bytes: usize,
    ) -> Self {
        Self {
            ticket_repo,
            chat_repo,
            user_repo,
            storage,
            broker,
            max_attachment_bytes,
            room_locks: RoomLocks::default(),
        }
    }

    /// Append a message to the ticket transcript and broadcast it to the room.
    ///
    /// The attachment, if any, is stored before anything is persisted; an
    /// upload failure leaves the transcript untouched.
    pub async fn post_message(
        &self,
        ticket_id: &str,
        author_id: &str,
        request: PostMessageRequest,
    ) -> ApiResult<ChatMessageView> {
        self.require_ticket(ticket_id).await?;

        let author = self
            .user_repo
            .get_user_by_id(author_id)
            .await?
            .ok_or_else(|| ApiError::BadRequest("Author does not match a known user".to_string()))?;

        let request = request.normalized().map_err(ApiError::BadRequest)?;

        let stored = match request.attachment {
            Some(ref attachment) => {
                if attachment.data.len() > self.max_attachment_bytes {
                    return Err(ApiError::PayloadTooLarge(format!(
                        "Attachment exceeds the {} byte limit",
                        self.max_attachment_bytes
                    )));
                }

                let stored = self
                    .storage
                    .upload(&attachment.data, &attachment.file_name, &attachment.mime_type)
                    .await
                    .map_err(|e| match e {
                        ApiError::UploadFailed(msg) => ApiError::UploadFailed(msg),
                        other => ApiError::UploadFailed(other.to_string()),
                    })?;
                if stored.url.trim().is_empty() {
                    self.storage.delete(&stored.storage_id).await;
                    return Err(ApiError::UploadFailed(
                        "Object storage returned no URL".to_string(),
                    ));
                }
                Some(stored)
            }
            None => None,
        };

        let message = ChatMessage::new(
            ticket_id.to_string(),
            author.id.clone(),
            request.content,
            stored.as_ref(),
        );

        let relay = self.room_locks.acquire(ticket_id).await;
        let message = match self.chat_repo.append_chat_message(&message).await {
            Ok(message) => message,
            Err(e) => {
                self.room_locks.release(ticket_id, relay).await;
                if let Some(ref stored) = stored {
                    self.storage.delete(&stored.storage_id).await;
                }
                return Err(e);
            }
        };

        let view = ChatMessageView::new(message, author.summary());
        let receivers = self
            .broker
            .publish(
                ticket_id,
                RoomEvent::NewMessage {
                    ticket_id: ticket_id.to_string(),
                    message: view.clone(),
                },
            )
            .await;
        self.room_locks.release(ticket_id, relay).await;

        metrics::counter!("chat_messages_posted_total").increment(1);
        tracing::info!(
            "Chat message {} posted on ticket {} by {} ({} live receivers)",
            view.message.id,
            ticket_id,
            author.id,
            receivers
        );

        Ok(view)
    }

    /// Full transcript in store order, authors populated
    pub async fn get_messages(&self, ticket_id: &str) -> ApiResult<Vec<ChatMessageView>> {
        self.require_ticket(ticket_id).await?;

        let messages = self.chat_repo.list_chat_messages(ticket_id).await?;
        let ids = referenced_ids(messages.iter().map(|m| &m.user_id));
        let summaries = load_summaries(self.user_repo.as_ref(), ids).await?;

        Ok(messages
            .into_iter()
            .map(|message| {
                let user = summary_or_unknown(&summaries, &message.user_id);
                ChatMessageView::new(message, user)
            })
            .collect())
    }

    /// Subscribe to a ticket's room. Anonymous callers may join.
    pub async fn join_room(&self, ticket_id: &str) -> ApiResult<RoomStream> {
        self.require_ticket(ticket_id).await?;
        Ok(self.broker.subscribe(ticket_id).await)
    }

    pub fn max_attachment_bytes(&self) -> usize {
        self.max_attachment_bytes
    }

    async fn require_ticket(&self, ticket_id: &str) -> ApiResult<()> {
        match self.ticket_repo.get_ticket(ticket_id).await? {
            Some(_) => Ok(()),
            None => Err(ApiError::NotFound(format!("Ticket {} not found", ticket_id))),
        }
    }
}
