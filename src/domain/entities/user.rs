use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ticket::Department;
use crate::shared::utils::timestamp::now_rfc3339;

pub const DEFAULT_PROFILE_PICTURE: &str =
    "https://cdn.pixabay.com/photo/2015/10/05/22/37/blank-profile-picture-973460_1280.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserRole {
    User,
    Admin,
    SuperAdmin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
            UserRole::SuperAdmin => "super-admin",
        }
    }

    /// Admin and super-admin
    pub fn is_staff_admin(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::SuperAdmin)
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self, UserRole::SuperAdmin)
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::User
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            "super-admin" => Ok(UserRole::SuperAdmin),
            other => Err(format!(
                "Invalid role '{}'. Must be one of: user, admin, super-admin",
                other
            )),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub role: UserRole,
    pub department: Department,
    pub profile_picture: String,
    pub primary_phone: Option<String>,
    pub telegram_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    pub fn new(email: String, name: String, role: UserRole, department: Department) -> Self {
        let now = now_rfc3339();
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            name,
            password_hash: None,
            role,
            department,
            profile_picture: DEFAULT_PROFILE_PICTURE.to_string(),
            primary_phone: None,
            telegram_id: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            profile_picture: self.profile_picture.clone(),
        }
    }
}

/// Author/assignee fields embedded in tickets, messages and audit entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub profile_picture: String,
}

impl UserSummary {
    /// Placeholder for a reference whose user record is gone
    pub fn unknown(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: "Unknown user".to_string(),
            email: String::new(),
            profile_picture: DEFAULT_PROFILE_PICTURE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub password: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub department: Department,
    pub primary_phone: Option<String>,
    pub telegram_id: Option<String>,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        if let Some(ref password) = self.password {
            if password.len() < 8 || password.len() > 72 {
                return Err("Password must be 8-72 characters long".to_string());
            }
        }
        if let Some(ref telegram_id) = self.telegram_id {
            if telegram_id.trim().is_empty() {
                return Err("Telegram id cannot be blank".to_string());
            }
        }
        Ok(())
    }
}
