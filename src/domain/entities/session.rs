use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::user::User;
use crate::shared::utils::timestamp::format_rfc3339;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub created_at: String,
    pub expires_at: String,
}

impl Session {
    pub fn new(user_id: String, token: String, duration_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            token,
            user_id,
            created_at: format_rfc3339(now),
            expires_at: format_rfc3339(now + Duration::hours(duration_hours)),
        }
    }

    pub fn is_expired(&self) -> bool {
        match DateTime::parse_from_rfc3339(&self.expires_at) {
            Ok(expires_at) => expires_at.with_timezone(&Utc) < Utc::now(),
            Err(_) => true,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_not_expired() {
        let session = Session::new("u1".to_string(), "tok".to_string(), 1);
        assert!(!session.is_expired());
    }

    #[test]
    fn test_negative_duration_is_expired() {
        let session = Session::new("u1".to_string(), "tok".to_string(), -1);
        assert!(session.is_expired());
    }

    #[test]
    fn test_unparseable_expiry_is_expired() {
        let mut session = Session::new("u1".to_string(), "tok".to_string(), 1);
        session.expires_at = "tomorrow".to_string();
        assert!(session.is_expired());
    }
}
