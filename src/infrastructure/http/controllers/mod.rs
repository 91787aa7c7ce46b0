pub mod activities;
pub mod auth;
pub mod comments;
pub mod messages;
pub mod realtime;
pub mod stats;
pub mod tickets;
pub mod users;
