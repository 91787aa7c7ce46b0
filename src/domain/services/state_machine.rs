use crate::domain::entities::{Ticket, TicketStatus, UserRole};
use std::fmt;
use thiserror::Error;

pub const CREATED_AUDIT_TEXT: &str = "created the ticket";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Accept,
    Unaccept,
    Resolve,
    Reopen,
    Close,
}

impl Transition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::Accept => "accept",
            Transition::Unaccept => "unaccept",
            Transition::Resolve => "resolve",
            Transition::Reopen => "reopen",
            Transition::Close => "close",
        }
    }

    pub fn audit_text(&self) -> &'static str {
        match self {
            Transition::Accept => "accepted ticket",
            Transition::Unaccept => "unclaimed ticket",
            Transition::Resolve => "ticket resolved",
            Transition::Reopen => "ticket opened again",
            Transition::Close => "closed the ticket",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Cannot {transition} a ticket that is {status}")]
    InvalidTransition {
        transition: Transition,
        status: TicketStatus,
    },
    #[error("Cannot {0} a ticket that has not been accepted")]
    NotAccepted(Transition),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

/// Lifecycle fields a transition reads and writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketState {
    pub status: TicketStatus,
    pub accepted: bool,
    pub assigned_to: Option<String>,
}

impl TicketState {
    pub fn initial() -> Self {
        Self {
            status: TicketStatus::Open,
            accepted: false,
            assigned_to: None,
        }
    }
}

impl From<&Ticket> for TicketState {
    fn from(ticket: &Ticket) -> Self {
        Self {
            status: ticket.status,
            accepted: ticket.accepted,
            assigned_to: ticket.assigned_to.clone(),
        }
    }
}

/// Identity performing a transition
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: String,
    pub role: UserRole,
}

/// Outcome of a valid transition, applied by the caller in one store write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    pub transition: Transition,
    pub from: TicketState,
    pub to: TicketState,
    pub audit_text: &'static str,
    pub notify: bool,
}

/// Validates a transition against the current state and computes the next state.
///
/// Re-accepting an in-progress ticket reassigns it to the new actor. Resolving
/// is limited to the current assignee or an admin; closing to admins.
pub fn plan_transition(
    current: &TicketState,
    transition: Transition,
    actor: &Actor,
) -> Result<TransitionPlan, TransitionError> {
    use TicketStatus::*;

    let to = match transition {
        Transition::Accept => match current.status {
            Open | InProgress => TicketState {
                status: InProgress,
                accepted: true,
                assigned_to: Some(actor.user_id.clone()),
            },
            status => return Err(TransitionError::InvalidTransition { transition, status }),
        },
        Transition::Unaccept => {
            if !current.accepted {
                return Err(TransitionError::NotAccepted(transition));
            }
            TicketState {
                status: Open,
                accepted: false,
                assigned_to: None,
            }
        }
        Transition::Resolve => {
            if !current.accepted {
                return Err(TransitionError::NotAccepted(transition));
            }
            if current.status != InProgress {
                return Err(TransitionError::InvalidTransition {
                    transition,
                    status: current.status,
                });
            }
            let is_assignee = current.assigned_to.as_deref() == Some(actor.user_id.as_str());
            if !is_assignee && !actor.role.is_staff_admin() {
                return Err(TransitionError::PermissionDenied(
                    "Only the assignee or an admin can resolve this ticket".to_string(),
                ));
            }
            TicketState {
                status: Resolved,
                accepted: true,
                assigned_to: current.assigned_to.clone(),
            }
        }
        Transition::Reopen => match current.status {
            Resolved => TicketState {
                status: Open,
                accepted: false,
                assigned_to: None,
            },
            status => return Err(TransitionError::InvalidTransition { transition, status }),
        },
        Transition::Close => {
            if !actor.role.is_staff_admin() {
                return Err(TransitionError::PermissionDenied(
                    "Only admins can close tickets".to_string(),
                ));
            }
            match current.status {
                Resolved => TicketState {
                    status: Closed,
                    accepted: false,
                    assigned_to: current.assigned_to.clone(),
                },
                status => {
                    return Err(TransitionError::InvalidTransition { transition, status })
                }
            }
        }
    };

    Ok(TransitionPlan {
        transition,
        from: current.clone(),
        to,
        audit_text: transition.audit_text(),
        notify: true,
    })
}
