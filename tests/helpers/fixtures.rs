use std::sync::Arc;
use ticketdesk::application::services::auth_service::hash_password;
use ticketdesk::domain::entities::{
    CreateTicketRequest, Department, Priority, TicketView, User, UserRole,
};
use ticketdesk::domain::ports::object_storage::ObjectStorage;
use ticketdesk::domain::ports::user_repository::UserRepository;
use ticketdesk::infrastructure::persistence::Database;
use ticketdesk::infrastructure::realtime::InMemoryRoomBroker;
use ticketdesk::*;

use super::fakes::{FakeStorage, RecordingDispatcher, RecordingTaskSpawner, StorageBehavior};

pub const TEST_PASSWORD: &str = "correct-horse-42";

pub async fn create_test_user(
    db: &Database,
    email: &str,
    role: UserRole,
    department: Department,
) -> User {
    let name = email.split('@').next().unwrap_or(email).to_string();
    let mut user = User::new(email.to_string(), name, role, department);
    user.password_hash = Some(hash_password(TEST_PASSWORD).unwrap());
    db.create_user(&user).await.expect("Failed to create user");
    user
}

pub fn ticket_request(ticket_id: &str, department: Department) -> CreateTicketRequest {
    CreateTicketRequest {
        ticket_id: Some(ticket_id.to_string()),
        title: None,
        department: Some(department),
        ticket_type: Some("hardware".to_string()),
        description: format!("Printer on floor 3 is jammed ({})", ticket_id),
        priority: Some(Priority::High),
    }
}

/// Every service wired against one database, with recording fakes at the seams
pub struct TestServices {
    pub tickets: TicketService,
    pub chat: ChatService,
    pub activities: ActivityService,
    pub comments: CommentService,
    pub stats: StatsService,
    pub users: UserService,
    pub auth: AuthService,
    pub dispatcher: Arc<RecordingDispatcher>,
    pub spawner: Arc<RecordingTaskSpawner>,
    pub storage: Arc<FakeStorage>,
    pub broker: Arc<InMemoryRoomBroker>,
}

pub fn build_services(db: &Database) -> TestServices {
    build_services_with(db, RecordingDispatcher::default(), StorageBehavior::Succeed)
}

pub fn build_services_with(
    db: &Database,
    dispatcher: RecordingDispatcher,
    storage: StorageBehavior,
) -> TestServices {
    let repo = Arc::new(db.clone());
    let dispatcher = Arc::new(dispatcher);
    let spawner = Arc::new(RecordingTaskSpawner::default());
    let storage = Arc::new(FakeStorage::new(storage));
    let broker = Arc::new(InMemoryRoomBroker::new(16));

    let notifications = NotificationService::new(dispatcher.clone(), repo.clone(), spawner.clone());

    TestServices {
        tickets: TicketService::new(repo.clone(), repo.clone(), notifications),
        chat: ChatService::new(
            repo.clone(),
            repo.clone(),
            repo.clone(),
            storage.clone() as Arc<dyn ObjectStorage>,
            broker.clone(),
            1024,
        ),
        activities: ActivityService::new(repo.clone(), repo.clone(), repo.clone()),
        comments: CommentService::new(repo.clone(), repo.clone()),
        stats: StatsService::new(repo.clone(), repo.clone()),
        users: UserService::new(repo.clone()),
        auth: AuthService::new(repo.clone(), repo, 24),
        dispatcher,
        spawner,
        storage,
        broker,
    }
}

pub async fn create_test_ticket(
    services: &TestServices,
    requester: &User,
    ticket_id: &str,
) -> TicketView {
    services
        .tickets
        .create_ticket(&requester.id, ticket_request(ticket_id, requester.department))
        .await
        .expect("Failed to create ticket")
}
