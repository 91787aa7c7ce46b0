pub mod room_broker;

pub use room_broker::InMemoryRoomBroker;
