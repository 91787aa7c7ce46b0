use crate::domain::events::RoomEvent;
use crate::domain::ports::message_broker::{MessageBroker, RoomStream};
use async_trait::async_trait;
use futures::{future, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

/// Process-local room fan-out: one broadcast channel per ticket id.
///
/// Rooms are created on first subscribe and dropped once nobody listens.
/// A subscriber that falls more than `capacity` events behind skips the
/// events it missed.
#[derive(Clone)]
pub struct InMemoryRoomBroker {
    rooms: Arc<Mutex<HashMap<String, broadcast::Sender<RoomEvent>>>>,
    capacity: usize,
}

impl InMemoryRoomBroker {
    pub fn new(capacity: usize) -> Self {
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Number of rooms with at least one subscriber
    pub async fn room_count(&self) -> usize {
        let mut rooms = self.rooms.lock().await;
        rooms.retain(|_, tx| tx.receiver_count() > 0);
        rooms.len()
    }
}

impl Default for InMemoryRoomBroker {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl MessageBroker for InMemoryRoomBroker {
    async fn publish(&self, room: &str, event: RoomEvent) -> usize {
        let mut rooms = self.rooms.lock().await;
        let Some(tx) = rooms.get(room) else {
            tracing::debug!("No subscribers in room {}, dropping {}", room, event.name());
            return 0;
        };

        match tx.send(event) {
            Ok(receivers) => {
                tracing::debug!("Broadcast to {} subscribers in room {}", receivers, room);
                metrics::counter!("chat_broadcast_receivers_total").increment(receivers as u64);
                receivers
            }
            Err(_) => {
                rooms.remove(room);
                0
            }
        }
    }

    async fn subscribe(&self, room: &str) -> RoomStream {
        let rx = {
            let mut rooms = self.rooms.lock().await;
            rooms.retain(|_, tx| tx.receiver_count() > 0);
            rooms
                .entry(room.to_string())
                .or_insert_with(|| broadcast::channel(self.capacity).0)
                .subscribe()
        };

        let room = room.to_string();
        let stream = BroadcastStream::new(rx).filter_map(move |item| {
            future::ready(match item {
                Ok(event) => Some(event),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    tracing::warn!("Subscriber in room {} lagged, skipped {} events", room, skipped);
                    None
                }
            })
        });

        Box::pin(stream)
    }

    async fn subscriber_count(&self, room: &str) -> usize {
        let rooms = self.rooms.lock().await;
        rooms.get(room).map(|tx| tx.receiver_count()).unwrap_or(0)
    }
}
