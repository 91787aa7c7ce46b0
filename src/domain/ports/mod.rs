pub mod activity_repository;
pub mod chat_repository;
pub mod message_broker;
pub mod notification_dispatcher;
pub mod object_storage;
pub mod session_repository;
pub mod stats_repository;
pub mod task_spawner;
pub mod ticket_repository;
pub mod user_repository;
