use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::user::UserSummary;
use crate::shared::utils::timestamp::now_rfc3339;

/// Ticket lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in-progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TicketStatus::Open),
            "in-progress" => Ok(TicketStatus::InProgress),
            "resolved" => Ok(TicketStatus::Resolved),
            "closed" => Ok(TicketStatus::Closed),
            other => Err(format!(
                "Invalid status '{}'. Must be one of: open, in-progress, resolved, closed",
                other
            )),
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Department owning a ticket (or a user's home department)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "IT")]
    It,
    DevOps,
    Software,
    Networking,
    Cybersecurity,
    #[serde(alias = "NA")]
    Other,
}

impl Department {
    pub const ALL: [Department; 6] = [
        Department::It,
        Department::DevOps,
        Department::Software,
        Department::Networking,
        Department::Cybersecurity,
        Department::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::It => "IT",
            Department::DevOps => "DevOps",
            Department::Software => "Software",
            Department::Networking => "Networking",
            Department::Cybersecurity => "Cybersecurity",
            Department::Other => "Other",
        }
    }
}

impl Default for Department {
    fn default() -> Self {
        Department::Other
    }
}

impl FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IT" => Ok(Department::It),
            "DevOps" => Ok(Department::DevOps),
            "Software" => Ok(Department::Software),
            "Networking" => Ok(Department::Networking),
            "Cybersecurity" => Ok(Department::Cybersecurity),
            "Other" | "NA" => Ok(Department::Other),
            other => Err(format!(
                "Invalid department '{}'. Must be one of: IT, DevOps, Software, Networking, Cybersecurity, Other",
                other
            )),
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!(
                "Invalid priority '{}'. Must be one of: low, medium, high",
                other
            )),
        }
    }
}

/// Ticket record. `id` is storage-internal, `ticket_id` is the human-facing
/// identifier used on every route and as the real-time room key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub ticket_id: String,
    pub title: String,
    pub department: Department,
    #[serde(rename = "type")]
    pub ticket_type: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: Priority,
    pub accepted: bool,
    pub created_by: String,
    pub assigned_to: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Ticket {
    pub fn new(create: CreateTicketRequest, created_by: String) -> Self {
        let now = now_rfc3339();
        let title = match create.title {
            Some(title) if !title.trim().is_empty() => title.trim().to_string(),
            _ => derive_title(&create.description),
        };

        Self {
            id: Uuid::new_v4().to_string(),
            ticket_id: create
                .ticket_id
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            title,
            department: create.department.unwrap_or_default(),
            ticket_type: create
                .ticket_type
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "general".to_string()),
            description: create.description,
            status: TicketStatus::Open,
            priority: create.priority.unwrap_or_default(),
            accepted: false,
            created_by,
            assigned_to: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Checks the accepted/assignee/status coupling every transition must preserve.
    pub fn check_invariants(&self) -> Result<(), String> {
        let claimed = self.assigned_to.is_some()
            && matches!(self.status, TicketStatus::InProgress | TicketStatus::Resolved);
        if self.accepted != claimed {
            return Err(format!(
                "accepted={} but assigned_to={:?} and status={}",
                self.accepted, self.assigned_to, self.status
            ));
        }
        if self.status == TicketStatus::Open && self.accepted {
            return Err("open ticket cannot be accepted".to_string());
        }
        Ok(())
    }
}

fn derive_title(description: &str) -> String {
    let first_line = description.lines().next().unwrap_or("").trim();
    first_line.chars().take(80).collect()
}

/// Request to file a new ticket; the requester comes from the acting identity.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    pub ticket_id: Option<String>,
    pub title: Option<String>,
    pub department: Option<Department>,
    #[serde(rename = "type")]
    pub ticket_type: Option<String>,
    pub description: String,
    pub priority: Option<Priority>,
}

impl CreateTicketRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.description.trim().is_empty() {
            return Err("Description is required".to_string());
        }
        if let Some(ref ticket_id) = self.ticket_id {
            if ticket_id.len() > 64 {
                return Err("Ticket id must be at most 64 characters".to_string());
            }
        }
        Ok(())
    }
}

/// Listing filter, mirrors the query string of the ticket list endpoints
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketFilter {
    pub department: Option<Department>,
    pub status: Option<TicketStatus>,
    pub priority: Option<Priority>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[serde(skip)]
    pub assigned_to: Option<String>,
    #[serde(skip)]
    pub created_by: Option<String>,
}

impl TicketFilter {
    pub const DEFAULT_LIMIT: i64 = 10;
    pub const MAX_SEARCH_TERMS: usize = 5;

    /// Returns (page, limit), both validated positive
    pub fn pagination(&self) -> Result<(i64, i64), String> {
        let page = self.page.unwrap_or(1);
        let limit = self.limit.unwrap_or(Self::DEFAULT_LIMIT);
        if page < 1 || limit < 1 {
            return Err("Page and limit must be positive integers".to_string());
        }
        Ok((page, limit.min(100)))
    }

    pub fn search_terms(&self) -> Vec<String> {
        self.search
            .as_deref()
            .unwrap_or("")
            .split_whitespace()
            .take(Self::MAX_SEARCH_TERMS)
            .map(|t| t.to_lowercase())
            .collect()
    }
}

/// Ticket with creator and assignee resolved for display
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketView {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub creator: Option<UserSummary>,
    pub assignee: Option<UserSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        Self {
            total,
            page,
            limit,
            total_pages: (total + limit - 1) / limit,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketPage {
    pub tickets: Vec<TicketView>,
    pub pagination: Pagination,
}
