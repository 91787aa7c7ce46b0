use crate::domain::events::RoomEvent;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

pub type RoomStream = Pin<Box<dyn Stream<Item = RoomEvent> + Send>>;

/// Publish/subscribe channel keyed by ticket id.
///
/// Delivery is at-most-once to subscribers connected at publish time.
#[async_trait]
pub trait MessageBroker: Send + Sync {
    /// Fan an event out to the room; returns how many subscribers it reached
    async fn publish(&self, room: &str, event: RoomEvent) -> usize;

    /// Join a room. Dropping the stream leaves it.
    async fn subscribe(&self, room: &str) -> RoomStream;

    async fn subscriber_count(&self, room: &str) -> usize;
}
