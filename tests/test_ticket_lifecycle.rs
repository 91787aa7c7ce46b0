use ticketdesk::domain::entities::{Department, TicketFilter, TicketStatus, UserRole};
use ticketdesk::domain::ports::ticket_repository::TicketRepository;
use ticketdesk::ApiError;

mod helpers;
use helpers::*;

#[tokio::test]
async fn test_create_accept_resolve_reopen_audit_trail() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let services = build_services(db);
    let requester = create_test_user(db, "requester@example.com", UserRole::User, Department::It).await;
    let agent = create_test_user(db, "agent@example.com", UserRole::User, Department::It).await;

    let created = create_test_ticket(&services, &requester, "T-1").await;
    assert_eq!(created.ticket.status, TicketStatus::Open);
    assert!(!created.ticket.accepted);
    assert_eq!(created.ticket.created_by, requester.id);
    assert_eq!(services.activities.get_activities("T-1").await.unwrap().len(), 1);

    let accepted = services.tickets.accept_ticket("T-1", &agent.id).await.unwrap();
    assert_eq!(accepted.ticket.status, TicketStatus::InProgress);
    assert!(accepted.ticket.accepted);
    assert_eq!(accepted.ticket.assigned_to.as_deref(), Some(agent.id.as_str()));
    assert_eq!(accepted.assignee.as_ref().map(|a| a.id.as_str()), Some(agent.id.as_str()));
    assert_eq!(services.activities.get_activities("T-1").await.unwrap().len(), 2);

    let resolved = services.tickets.resolve_ticket("T-1", &agent.id).await.unwrap();
    assert_eq!(resolved.ticket.status, TicketStatus::Resolved);
    assert_eq!(resolved.ticket.assigned_to.as_deref(), Some(agent.id.as_str()));
    assert_eq!(services.activities.get_activities("T-1").await.unwrap().len(), 3);

    let reopened = services.tickets.reopen_ticket("T-1", &requester.id).await.unwrap();
    assert_eq!(reopened.ticket.status, TicketStatus::Open);
    assert!(!reopened.ticket.accepted);
    assert!(reopened.ticket.assigned_to.is_none());

    let activities = services.activities.get_activities("T-1").await.unwrap();
    let descriptions: Vec<&str> = activities
        .iter()
        .map(|a| a.entry.description.as_str())
        .collect();
    assert_eq!(
        descriptions,
        vec![
            "ticket opened again",
            "ticket resolved",
            "accepted ticket",
            "created the ticket"
        ]
    );
    assert_eq!(activities[0].user.id, requester.id);
    assert_eq!(activities[0].entry.status, TicketStatus::Open);
}

#[tokio::test]
async fn test_accept_then_unaccept_restores_open_state() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let services = build_services(db);
    let requester = create_test_user(db, "requester@example.com", UserRole::User, Department::DevOps).await;
    let agent = create_test_user(db, "agent@example.com", UserRole::User, Department::DevOps).await;
    create_test_ticket(&services, &requester, "T-2").await;

    services.tickets.accept_ticket("T-2", &agent.id).await.unwrap();
    let unclaimed = services.tickets.unaccept_ticket("T-2", &agent.id).await.unwrap();

    assert_eq!(unclaimed.ticket.status, TicketStatus::Open);
    assert!(!unclaimed.ticket.accepted);
    assert!(unclaimed.ticket.assigned_to.is_none());
    assert!(unclaimed.assignee.is_none());
    assert!(unclaimed.ticket.check_invariants().is_ok());

    let latest = &services.activities.get_activities("T-2").await.unwrap()[0];
    assert_eq!(latest.entry.description, "unclaimed ticket");
}

#[tokio::test]
async fn test_invalid_transitions_leave_ticket_untouched() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let services = build_services(db);
    let requester = create_test_user(db, "requester@example.com", UserRole::User, Department::It).await;
    let other = create_test_user(db, "other@example.com", UserRole::User, Department::It).await;
    create_test_ticket(&services, &requester, "T-3").await;

    let err = services.tickets.unaccept_ticket("T-3", &requester.id).await.unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
    let err = services.tickets.resolve_ticket("T-3", &requester.id).await.unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
    let err = services.tickets.reopen_ticket("T-3", &requester.id).await.unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));

    services.tickets.accept_ticket("T-3", &requester.id).await.unwrap();
    let err = services.tickets.resolve_ticket("T-3", &other.id).await.unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));

    let ticket = db.get_ticket("T-3").await.unwrap().unwrap();
    assert_eq!(ticket.status, TicketStatus::InProgress);
    assert_eq!(services.activities.get_activities("T-3").await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_close_requires_admin() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let services = build_services(db);
    let requester = create_test_user(db, "requester@example.com", UserRole::User, Department::It).await;
    let admin = create_test_user(db, "admin@example.com", UserRole::Admin, Department::It).await;
    create_test_ticket(&services, &requester, "T-4").await;
    services.tickets.accept_ticket("T-4", &requester.id).await.unwrap();
    services.tickets.resolve_ticket("T-4", &requester.id).await.unwrap();

    let err = services.tickets.close_ticket("T-4", &requester.id).await.unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));

    let closed = services.tickets.close_ticket("T-4", &admin.id).await.unwrap();
    assert_eq!(closed.ticket.status, TicketStatus::Closed);
    assert!(!closed.ticket.accepted);
    assert!(closed.ticket.check_invariants().is_ok());
}

#[tokio::test]
async fn test_concurrent_accepts_last_write_wins() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let services = build_services(db);
    let requester = create_test_user(db, "requester@example.com", UserRole::User, Department::It).await;
    let a = create_test_user(db, "a@example.com", UserRole::User, Department::It).await;
    let b = create_test_user(db, "b@example.com", UserRole::User, Department::It).await;
    create_test_ticket(&services, &requester, "T-5").await;

    let (first, second) = tokio::join!(
        services.tickets.accept_ticket("T-5", &a.id),
        services.tickets.accept_ticket("T-5", &b.id)
    );
    assert!(first.is_ok());
    assert!(second.is_ok());

    let ticket = db.get_ticket("T-5").await.unwrap().unwrap();
    assert_eq!(ticket.status, TicketStatus::InProgress);
    let assignee = ticket.assigned_to.clone().unwrap();
    assert!(assignee == a.id || assignee == b.id);
    assert!(ticket.check_invariants().is_ok());

    // Both accepts are audited even though only one assignment survives
    let activities = services.activities.get_activities("T-5").await.unwrap();
    assert_eq!(activities.len(), 3);
    assert!(activities.iter().all(|a| a.entry.status != TicketStatus::Resolved));
}

#[tokio::test]
async fn test_status_change_notifies_requester() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let services = build_services(db);
    let requester = create_test_user(db, "requester@example.com", UserRole::User, Department::It).await;
    let agent = create_test_user(db, "agent@example.com", UserRole::User, Department::It).await;
    create_test_ticket(&services, &requester, "T-6").await;

    services.tickets.accept_ticket("T-6", &agent.id).await.unwrap();
    services.spawner.wait_all().await;

    let notices = services.dispatcher.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].recipient_email, "requester@example.com");
    assert_eq!(notices[0].ticket_id, "T-6");
    assert_eq!(notices[0].new_status, TicketStatus::InProgress);
    assert_eq!(notices[0].remark, "accepted ticket");
}

#[tokio::test]
async fn test_notification_failure_does_not_fail_transition() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let services = build_services_with(db, RecordingDispatcher::failing(), StorageBehavior::Succeed);
    let requester = create_test_user(db, "requester@example.com", UserRole::User, Department::It).await;
    create_test_ticket(&services, &requester, "T-7").await;

    let accepted = services.tickets.accept_ticket("T-7", &requester.id).await;
    assert!(accepted.is_ok());
    services.spawner.wait_all().await;

    assert_eq!(services.dispatcher.notices().len(), 1);
    let ticket = db.get_ticket("T-7").await.unwrap().unwrap();
    assert_eq!(ticket.status, TicketStatus::InProgress);
}

#[tokio::test]
async fn test_missing_ticket_and_actor() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let services = build_services(db);
    let requester = create_test_user(db, "requester@example.com", UserRole::User, Department::It).await;
    create_test_ticket(&services, &requester, "T-8").await;

    let err = services.tickets.accept_ticket("NOPE", &requester.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = services.tickets.accept_ticket("T-8", "ghost").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = services.tickets.reopen_ticket("T-8", "ghost").await.unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));

    assert_eq!(services.spawner.spawned(), 0);
}

#[tokio::test]
async fn test_create_ticket_validation_and_duplicates() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let services = build_services(db);
    let requester = create_test_user(db, "requester@example.com", UserRole::User, Department::It).await;

    let mut blank = ticket_request("T-9", Department::It);
    blank.description = "   ".to_string();
    let err = services.tickets.create_ticket(&requester.id, blank).await.unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));

    let err = services
        .tickets
        .create_ticket("ghost", ticket_request("T-9", Department::It))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));

    create_test_ticket(&services, &requester, "T-9").await;
    let err = services
        .tickets
        .create_ticket(&requester.id, ticket_request("T-9", Department::It))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[tokio::test]
async fn test_concurrent_create_with_same_id_yields_one_ticket() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let services = build_services(db);
    let requester = create_test_user(db, "requester@example.com", UserRole::User, Department::It).await;

    let (first, second) = tokio::join!(
        services
            .tickets
            .create_ticket(&requester.id, ticket_request("T-10", Department::It)),
        services
            .tickets
            .create_ticket(&requester.id, ticket_request("T-10", Department::It)),
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(ApiError::Conflict(_)))));
    assert_eq!(services.activities.get_activities("T-10").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_filters_and_search() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let services = build_services(db);
    let it_user = create_test_user(db, "it@example.com", UserRole::User, Department::It).await;
    let net_user = create_test_user(db, "net@example.com", UserRole::User, Department::Networking).await;

    create_test_ticket(&services, &it_user, "IT-1").await;
    create_test_ticket(&services, &it_user, "IT-2").await;
    let mut vpn = ticket_request("NET-1", Department::Networking);
    vpn.description = "VPN drops every 10 minutes".to_string();
    services.tickets.create_ticket(&net_user.id, vpn).await.unwrap();
    services.tickets.accept_ticket("IT-2", &it_user.id).await.unwrap();

    let it_only = services
        .tickets
        .list_tickets(TicketFilter {
            department: Some(Department::It),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(it_only.pagination.total, 2);

    let searched = services
        .tickets
        .list_tickets(TicketFilter {
            search: Some("vpn".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(searched.tickets.len(), 1);
    assert_eq!(searched.tickets[0].ticket.ticket_id, "NET-1");

    let assigned = services
        .tickets
        .list_assigned(&it_user.id, TicketFilter::default())
        .await
        .unwrap();
    assert_eq!(assigned.tickets.len(), 1);
    assert_eq!(assigned.tickets[0].ticket.ticket_id, "IT-2");

    let created = services
        .tickets
        .list_created(&net_user.id, TicketFilter::default())
        .await
        .unwrap();
    assert_eq!(created.pagination.total, 1);

    let paged = services
        .tickets
        .list_tickets(TicketFilter {
            page: Some(2),
            limit: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(paged.tickets.len(), 1);
    assert_eq!(paged.pagination.total_pages, 2);
}

#[tokio::test]
async fn test_delete_ticket_requires_super_admin() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let services = build_services(db);
    let requester = create_test_user(db, "requester@example.com", UserRole::User, Department::It).await;
    let admin = create_test_user(db, "admin@example.com", UserRole::Admin, Department::It).await;
    let root = create_test_user(db, "root@example.com", UserRole::SuperAdmin, Department::Other).await;
    create_test_ticket(&services, &requester, "T-10").await;

    let err = services.tickets.delete_ticket("T-10", &admin.id).await.unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));

    services.tickets.delete_ticket("T-10", &root.id).await.unwrap();
    assert!(db.get_ticket("T-10").await.unwrap().is_none());

    let err = services.tickets.delete_ticket("T-10", &root.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
