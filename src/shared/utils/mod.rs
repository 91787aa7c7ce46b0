/// Utility modules
pub mod email_validator;
pub mod timestamp;
pub mod token;
