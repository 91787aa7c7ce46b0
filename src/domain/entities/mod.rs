pub mod chat_message;
pub mod comment;
pub mod progress;
pub mod session;
pub mod stats;
pub mod ticket;
pub mod user;

pub use chat_message::*;
pub use comment::*;
pub use progress::*;
pub use session::*;
pub use stats::*;
pub use ticket::*;
pub use user::*;
