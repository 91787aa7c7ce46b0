pub mod logging_notifier;
pub mod smtp_notifier;

pub use logging_notifier::LoggingNotificationDispatcher;
pub use smtp_notifier::{SmtpNotificationDispatcher, SmtpSettings};
