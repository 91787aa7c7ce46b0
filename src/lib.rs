pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use application::services::*;
pub use config::{Config, ConfigError};
pub use infrastructure::http::middleware::{ApiError, ApiResult, AppState};
pub use infrastructure::persistence::Database;
