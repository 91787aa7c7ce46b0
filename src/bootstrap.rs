use crate::application::services::*;
use crate::config::Config;
use crate::domain::entities::{CreateUserRequest, Department, UserRole};
use crate::domain::ports::activity_repository::ActivityRepository;
use crate::domain::ports::chat_repository::ChatRepository;
use crate::domain::ports::message_broker::MessageBroker;
use crate::domain::ports::notification_dispatcher::NotificationDispatcher;
use crate::domain::ports::object_storage::ObjectStorage;
use crate::domain::ports::session_repository::SessionRepository;
use crate::domain::ports::stats_repository::StatsRepository;
use crate::domain::ports::task_spawner::TaskSpawner;
use crate::domain::ports::ticket_repository::TicketRepository;
use crate::domain::ports::user_repository::UserRepository;
use crate::infrastructure::http::middleware::{ApiResult, AppState};
use crate::infrastructure::persistence::Database;
use crate::infrastructure::providers::{LoggingNotificationDispatcher, SmtpNotificationDispatcher};
use crate::infrastructure::realtime::InMemoryRoomBroker;
use crate::infrastructure::runtime::TokioTaskSpawner;
use crate::infrastructure::storage::LocalObjectStorage;
use std::sync::Arc;

pub async fn build_app_state(db: Database, config: &Config) -> anyhow::Result<AppState> {
    tokio::fs::create_dir_all(&config.attachment_storage_path).await?;

    let ticket_repo: Arc<dyn TicketRepository> = Arc::new(db.clone());
    let chat_repo: Arc<dyn ChatRepository> = Arc::new(db.clone());
    let activity_repo: Arc<dyn ActivityRepository> = Arc::new(db.clone());
    let stats_repo: Arc<dyn StatsRepository> = Arc::new(db.clone());
    let user_repo: Arc<dyn UserRepository> = Arc::new(db.clone());
    let session_repo: Arc<dyn SessionRepository> = Arc::new(db);

    let task_spawner: Arc<dyn TaskSpawner> = Arc::new(TokioTaskSpawner::new());

    let dispatcher: Arc<dyn NotificationDispatcher> = match &config.smtp {
        Some(settings) => {
            tracing::info!("SMTP notifications enabled via {}:{}", settings.host, settings.port);
            Arc::new(SmtpNotificationDispatcher::new(settings.clone()))
        }
        None => {
            tracing::warn!("SMTP_HOST not set; status change notices will only be logged");
            Arc::new(LoggingNotificationDispatcher::new())
        }
    };

    let broker: Arc<dyn MessageBroker> =
        Arc::new(InMemoryRoomBroker::new(config.room_channel_capacity));
    tracing::info!(
        "Room broker initialized with capacity {}",
        config.room_channel_capacity
    );

    let storage: Arc<dyn ObjectStorage> = Arc::new(LocalObjectStorage::new(
        &config.attachment_storage_path,
        config.attachment_public_url.clone(),
    ));

    let notification_service =
        NotificationService::new(dispatcher, user_repo.clone(), task_spawner);

    let auth_service = AuthService::new(
        user_repo.clone(),
        session_repo,
        config.session_duration_hours,
    );
    let user_service = UserService::new(user_repo.clone());
    let ticket_service = TicketService::new(
        ticket_repo.clone(),
        user_repo.clone(),
        notification_service,
    );
    let chat_service = ChatService::new(
        ticket_repo.clone(),
        chat_repo,
        user_repo.clone(),
        storage,
        broker,
        config.max_attachment_bytes,
    );
    let activity_service =
        ActivityService::new(ticket_repo.clone(), activity_repo, user_repo.clone());
    let comment_service = CommentService::new(ticket_repo, user_repo.clone());
    let stats_service = StatsService::new(stats_repo, user_repo);

    Ok(AppState {
        auth_service,
        user_service,
        ticket_service,
        chat_service,
        activity_service,
        comment_service,
        stats_service,
    })
}

/// Ensure the configured super-admin exists
pub async fn initialize_admin(users: &UserService, config: &Config) -> ApiResult<()> {
    tracing::info!("Checking for admin user initialization");

    if users.get_user_by_email(&config.admin_email).await?.is_some() {
        tracing::info!("Admin user already exists: {}", config.admin_email);
        return Ok(());
    }

    tracing::info!("Creating admin user: {}", config.admin_email);

    let admin = users
        .register(CreateUserRequest {
            email: config.admin_email.clone(),
            name: config.admin_name.clone(),
            password: Some(config.admin_password.clone()),
            role: UserRole::SuperAdmin,
            department: Department::Other,
            primary_phone: None,
            telegram_id: None,
        })
        .await?;

    tracing::info!("Admin user created successfully: {} ({})", admin.email, admin.id);
    Ok(())
}
