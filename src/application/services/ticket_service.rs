use crate::application::services::{
    load_summaries, referenced_ids, summary_or_unknown, NotificationService,
};
use crate::domain::entities::{
    CreateTicketRequest, Pagination, ProgressEntry, Ticket, TicketFilter, TicketPage, TicketView,
    User,
};
use crate::domain::ports::ticket_repository::TicketRepository;
use crate::domain::ports::user_repository::UserRepository;
use crate::domain::services::state_machine::{
    plan_transition, Actor, TicketState, Transition, CREATED_AUDIT_TEXT,
};
use crate::infrastructure::http::middleware::error::{ApiError, ApiResult};
use std::sync::Arc;

#[derive(Clone)]
pub struct TicketService {
    ticket_repo: Arc<dyn TicketRepository>,
    user_repo: Arc<dyn UserRepository>,
    notifications: NotificationService,
}

impl TicketService {
    pub fn new(
        ticket_repo: Arc<dyn TicketRepository>,
        user_repo: Arc<dyn UserRepository>,
        notifications: NotificationService,
    ) -> Self {
        Self {
            ticket_repo,
            user_repo,
            notifications,
        }
    }

    /// File a ticket on behalf of `requester_id`. Writes the "created the ticket"
    /// audit entry in the same store operation.
    pub async fn create_ticket(
        &self,
        requester_id: &str,
        request: CreateTicketRequest,
    ) -> ApiResult<TicketView> {
        request.validate().map_err(ApiError::BadRequest)?;

        let requester = self
            .user_repo
            .get_user_by_id(requester_id)
            .await?
            .ok_or_else(|| ApiError::BadRequest("Requester does not match a known user".to_string()))?;

        let ticket = Ticket::new(request, requester.id.clone());

        // Duplicate ids surface as Conflict from the unique index on tickets.ticket_id.
        let created = ProgressEntry::new(
            ticket.ticket_id.clone(),
            requester.id.clone(),
            CREATED_AUDIT_TEXT,
            ticket.status,
        );
        self.ticket_repo.create_ticket(&ticket, &created).await?;

        tracing::info!(
            "Ticket created: ticket_id={}, department={}, requester={}",
            ticket.ticket_id,
            ticket.department,
            requester.id
        );

        Ok(TicketView {
            creator: Some(requester.summary()),
            assignee: None,
            ticket,
        })
    }

    pub async fn get_ticket(&self, ticket_id: &str) -> ApiResult<TicketView> {
        let ticket = self.require_ticket(ticket_id).await?;
        let mut views = self.to_views(vec![ticket]).await?;
        views
            .pop()
            .ok_or_else(|| ApiError::Internal("Ticket view missing".to_string()))
    }

    pub async fn list_tickets(&self, filter: TicketFilter) -> ApiResult<TicketPage> {
        let (page, limit) = filter.pagination().map_err(ApiError::BadRequest)?;
        let offset = (page - 1) * limit;

        let (tickets, total) = self.ticket_repo.list_tickets(&filter, limit, offset).await?;
        let tickets = self.to_views(tickets).await?;

        Ok(TicketPage {
            tickets,
            pagination: Pagination::new(total, page, limit),
        })
    }

    pub async fn list_assigned(&self, actor_id: &str, mut filter: TicketFilter) -> ApiResult<TicketPage> {
        filter.assigned_to = Some(actor_id.to_string());
        self.list_tickets(filter).await
    }

    pub async fn list_created(&self, actor_id: &str, mut filter: TicketFilter) -> ApiResult<TicketPage> {
        filter.created_by = Some(actor_id.to_string());
        self.list_tickets(filter).await
    }

    pub async fn accept_ticket(&self, ticket_id: &str, actor_id: &str) -> ApiResult<TicketView> {
        self.transition(ticket_id, actor_id, Transition::Accept).await
    }

    pub async fn unaccept_ticket(&self, ticket_id: &str, actor_id: &str) -> ApiResult<TicketView> {
        self.transition(ticket_id, actor_id, Transition::Unaccept).await
    }

    pub async fn resolve_ticket(&self, ticket_id: &str, actor_id: &str) -> ApiResult<TicketView> {
        self.transition(ticket_id, actor_id, Transition::Resolve).await
    }

    pub async fn reopen_ticket(&self, ticket_id: &str, actor_id: &str) -> ApiResult<TicketView> {
        self.transition(ticket_id, actor_id, Transition::Reopen).await
    }

    pub async fn close_ticket(&self, ticket_id: &str, actor_id: &str) -> ApiResult<TicketView> {
        self.transition(ticket_id, actor_id, Transition::Close).await
    }

    /// Administrative removal of a ticket and everything embedded in it
    pub async fn delete_ticket(&self, ticket_id: &str, actor_id: &str) -> ApiResult<()> {
        let actor = self
            .user_repo
            .get_user_by_id(actor_id)
            .await?
            .ok_or(ApiError::Unauthorized)?;
        if !actor.role.is_super_admin() {
            return Err(ApiError::Forbidden(
                "Only super-admins can delete tickets".to_string(),
            ));
        }

        if !self.ticket_repo.delete_ticket(ticket_id).await? {
            return Err(ApiError::NotFound(format!("Ticket {} not found", ticket_id)));
        }

        tracing::warn!("Ticket {} deleted by {}", ticket_id, actor.id);
        Ok(())
    }

    /// Validate, apply and audit one lifecycle transition.
    ///
    /// Concurrent transitions on the same ticket are not serialized here:
    /// the last write to land wins.
    async fn transition(
        &self,
        ticket_id: &str,
        actor_id: &str,
        transition: Transition,
    ) -> ApiResult<TicketView> {
        let ticket = self.require_ticket(ticket_id).await?;
        let actor = self.resolve_actor(actor_id, transition).await?;

        let plan = plan_transition(
            &TicketState::from(&ticket),
            transition,
            &Actor {
                user_id: actor.id.clone(),
                role: actor.role,
            },
        )?;

        let entry = ProgressEntry::new(
            ticket.ticket_id.clone(),
            actor.id.clone(),
            plan.audit_text,
            plan.to.status,
        );

        let updated = self
            .ticket_repo
            .apply_transition(&ticket.ticket_id, &plan.to, &entry)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Ticket {} not found", ticket_id)))?;

        if let Err(violation) = updated.check_invariants() {
            tracing::error!(
                "Ticket {} violates lifecycle invariant after {}: {}",
                updated.ticket_id,
                transition,
                violation
            );
        }

        metrics::counter!("ticket_transitions_total", "transition" => transition.as_str())
            .increment(1);
        tracing::info!(
            "Ticket {} {}: {} -> {} by {}",
            updated.ticket_id,
            transition,
            plan.from.status,
            plan.to.status,
            actor.id
        );

        if plan.notify {
            self.notifications
                .notify_status_change(&updated, plan.audit_text);
        }

        let mut views = self.to_views(vec![updated]).await?;
        views
            .pop()
            .ok_or_else(|| ApiError::Internal("Ticket view missing".to_string()))
    }

    async fn require_ticket(&self, ticket_id: &str) -> ApiResult<Ticket> {
        self.ticket_repo
            .get_ticket(ticket_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Ticket {} not found", ticket_id)))
    }

    /// Accept assigns the actor, so a missing record is NotFound there;
    /// for the other transitions it is a validation failure.
    async fn resolve_actor(&self, actor_id: &str, transition: Transition) -> ApiResult<User> {
        match self.user_repo.get_user_by_id(actor_id).await? {
            Some(user) => Ok(user),
            None if transition == Transition::Accept => {
                Err(ApiError::NotFound(format!("User {} not found", actor_id)))
            }
            None => Err(ApiError::BadRequest(
                "Acting user does not match a known user".to_string(),
            )),
        }
    }

    async fn to_views(&self, tickets: Vec<Ticket>) -> ApiResult<Vec<TicketView>> {
        let ids = referenced_ids(
            tickets
                .iter()
                .flat_map(|t| std::iter::once(&t.created_by).chain(t.assigned_to.iter())),
        );
        let summaries = load_summaries(self.user_repo.as_ref(), ids).await?;

        Ok(tickets
            .into_iter()
            .map(|ticket| TicketView {
                creator: Some(summary_or_unknown(&summaries, &ticket.created_by)),
                assignee: ticket
                    .assigned_to
                    .as_deref()
                    .map(|id| summary_or_unknown(&summaries, id)),
                ticket,
            })
            .collect())
    }
}
